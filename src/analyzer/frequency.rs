//! Token and n-gram frequency tables.

use std::collections::HashMap;

/// Counter that remembers first-seen order, so ties rank by first appearance.
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&idx) => self.entries[idx].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn extend<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            self.add(key.as_ref());
        }
    }

    /// Number of distinct keys seen.
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Highest counts first; equal counts keep insertion order.
    pub fn most_common(&self, limit: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<&(String, usize)> = self.entries.iter().collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(limit).cloned().collect()
    }
}

/// Space-joined runs of `n` consecutive tokens.
pub fn ngrams(tokens: &[String], n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    tokens.windows(n).map(|w| w.join(" ")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let mut t = FrequencyTable::new();
        t.extend(["b", "a", "c", "a", "b", "d"]);
        assert_eq!(
            t.most_common(10),
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 2),
                ("c".to_string(), 1),
                ("d".to_string(), 1)
            ]
        );
        assert_eq!(t.most_common(1), vec![("b".to_string(), 2)]);
        assert_eq!(t.distinct(), 4);
    }

    #[test]
    fn test_top_cut() {
        let mut t = FrequencyTable::new();
        for i in 0..150 {
            t.add(&format!("w{i}"));
        }
        assert_eq!(t.most_common(100).len(), 100);
        assert_eq!(t.most_common(100)[99].0, "w99");
    }

    #[test]
    fn test_ngrams() {
        let tokens = toks("the cat sat on");
        assert_eq!(ngrams(&tokens, 2), vec!["the cat", "cat sat", "sat on"]);
        assert_eq!(ngrams(&tokens, 3), vec!["the cat sat", "cat sat on"]);
        assert!(ngrams(&toks("one two"), 3).is_empty());
        assert!(ngrams(&[], 2).is_empty());
        assert!(ngrams(&tokens, 0).is_empty());
    }
}
