//! Pairwise Jaccard similarity over token sets.
//!
//! O(n²) in the number of documents: fine for tens to low hundreds of
//! documents, a cliff beyond that. `Settings::similarity_max_documents`
//! caps it.

use std::collections::HashSet;

use itertools::Itertools;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// `|A ∩ B| / |A ∪ B|`, 0.0 when both sets are empty.
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = small.iter().filter(|t| large.contains(*t)).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

pub fn token_set(tokens: &[String]) -> HashSet<&str> {
    tokens.iter().map(String::as_str).collect()
}

/// Similarity for every unordered pair `(i, j)` with `i < j`, in that order.
#[cfg(feature = "rayon")]
pub fn pairwise(sets: &[HashSet<&str>]) -> Vec<(usize, usize, f64)> {
    let pairs: Vec<(usize, usize)> = (0..sets.len()).tuple_combinations().collect();
    pairs
        .into_par_iter()
        .map(|(i, j)| (i, j, jaccard(&sets[i], &sets[j])))
        .collect()
}

#[cfg(not(feature = "rayon"))]
pub fn pairwise(sets: &[HashSet<&str>]) -> Vec<(usize, usize, f64)> {
    (0..sets.len())
        .tuple_combinations()
        .map(|(i, j)| (i, j, jaccard(&sets[i], &sets[j])))
        .collect()
}
