//! Analyzer stage: every processed record -> one corpus report.

pub mod frequency;
pub mod similarity;

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::{PipelineError, Result};
use crate::layout::{file_name, list_pages, SharedLayout};
use crate::marker::MarkerWatch;
use crate::record::{
    BigramEntry, CorpusReport, ProcessingSummary, Readability, RecordView, SimilarityEntry,
    TrigramEntry, WordEntry,
};
use crate::stats::tokenize_lower;
use crate::utils::{iso_utc, round_to, write_json_atomic};
use frequency::{ngrams, FrequencyTable};
use similarity::{pairwise, token_set};

pub const TOP_N: usize = 100;
const PRECISION: usize = 6;

/// One processed record, identified by its file name.
#[derive(Debug, Clone)]
pub struct CorpusDocument {
    pub name: String,
    pub record: RecordView,
}

pub struct Analyzer<W: MarkerWatch> {
    layout: SharedLayout,
    watch: W,
    similarity_max_documents: Option<usize>,
}

impl<W: MarkerWatch> Analyzer<W> {
    pub fn new(layout: SharedLayout, watch: W, similarity_max_documents: Option<usize>) -> Self {
        Analyzer {
            layout,
            watch,
            similarity_max_documents,
        }
    }

    pub fn run(&self) -> Result<CorpusReport> {
        SharedLayout::ensure_dirs(&[self.layout.analysis_dir()])?;

        let marker = self.layout.process_marker();
        self.watch.wait_for(&marker)?;
        log_summary(&marker);

        let files = list_pages(&self.layout.processed_dir(), "json")?;
        info!(count = files.len(), "Found processed documents");
        let docs = load_documents(&files);

        let report = build_report(&docs, self.similarity_max_documents, iso_utc());
        let out = self.layout.final_report();
        write_json_atomic(&out, &report)?;
        info!(
            path = %out.display(),
            documents = report.documents_processed,
            unique_words = report.unique_words,
            "Analyzer complete"
        );
        Ok(report)
    }
}

/// The marker's content is informational only; its existence is the signal.
fn log_summary(marker: &Path) {
    let parsed = fs::read_to_string(marker)
        .map_err(|e| PipelineError::io(marker, e))
        .and_then(|s| {
            serde_json::from_str::<ProcessingSummary>(&s).map_err(|e| PipelineError::json(marker, e))
        });
    match parsed {
        Ok(summary) => info!(
            files_seen = summary.files_seen,
            success = summary.processed_success,
            failed = summary.processed_failed,
            "Processing summary"
        ),
        Err(e) => warn!(error = %e, "Unreadable processing summary"),
    }
}

/// Read records in the given order. Records that are not JSON at all are
/// skipped; records with missing fields are kept with defaults.
pub fn load_documents(files: &[impl AsRef<Path>]) -> Vec<CorpusDocument> {
    let mut docs = Vec::with_capacity(files.len());
    for path in files {
        match load_document(path.as_ref()) {
            Ok(doc) => docs.push(doc),
            Err(e) => warn!(error = %e, "Skipping unreadable record"),
        }
    }
    docs
}

fn load_document(path: &Path) -> Result<CorpusDocument> {
    let name = file_name(path)?.to_string();
    let raw = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| PipelineError::json(path, e))?;
    Ok(CorpusDocument {
        name,
        record: RecordView::from_value(&value),
    })
}

#[cfg(feature = "rayon")]
fn tokenize_all(docs: &[CorpusDocument]) -> Vec<Vec<String>> {
    docs.par_iter()
        .map(|d| tokenize_lower(&d.record.text))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn tokenize_all(docs: &[CorpusDocument]) -> Vec<Vec<String>> {
    docs.iter()
        .map(|d| tokenize_lower(&d.record.text))
        .collect()
}

/// Aggregate `docs` (already in canonical order) into the corpus report.
///
/// Tables are filled sequentially in document order so ties always rank
/// the same way, whether or not tokenizing ran in parallel.
pub fn build_report(
    docs: &[CorpusDocument],
    similarity_max_documents: Option<usize>,
    timestamp: String,
) -> CorpusReport {
    let tokens = tokenize_all(docs);

    let mut words = FrequencyTable::new();
    let mut bigrams = FrequencyTable::new();
    let mut trigrams = FrequencyTable::new();
    let mut total_words: u64 = 0;
    let mut total_sentences: u64 = 0;
    let mut total_token_chars: u64 = 0;

    for (doc, doc_tokens) in docs.iter().zip(&tokens) {
        words.extend(doc_tokens);
        bigrams.extend(ngrams(doc_tokens, 2));
        trigrams.extend(ngrams(doc_tokens, 3));

        total_words += doc.record.word_count.unwrap_or(doc_tokens.len() as u64);
        total_sentences += doc.record.sentence_count;
        total_token_chars += doc_tokens.iter().map(|t| t.len() as u64).sum::<u64>();
    }

    let top_100_words = words
        .most_common(TOP_N)
        .into_iter()
        .map(|(word, count)| WordEntry {
            frequency: round_to(ratio(count as u64, total_words), PRECISION),
            word,
            count,
        })
        .collect();

    let document_similarity = similarity_entries(docs, &tokens, similarity_max_documents);

    let top_bigrams = bigrams
        .most_common(TOP_N)
        .into_iter()
        .map(|(bigram, count)| BigramEntry { bigram, count })
        .collect();
    let top_trigrams = trigrams
        .most_common(TOP_N)
        .into_iter()
        .map(|(trigram, count)| TrigramEntry { trigram, count })
        .collect();

    let avg_sentence_length = ratio(total_words, total_sentences);
    let avg_word_length = ratio(total_token_chars, total_words);
    let readability = Readability {
        avg_sentence_length: round_to(avg_sentence_length, PRECISION),
        avg_word_length: round_to(avg_word_length, PRECISION),
        complexity_score: round_to(avg_sentence_length * avg_word_length, PRECISION),
    };

    CorpusReport {
        processing_timestamp: timestamp,
        documents_processed: docs.len(),
        total_words,
        unique_words: words.distinct(),
        top_100_words,
        document_similarity,
        top_bigrams,
        top_trigrams,
        readability,
    }
}

fn similarity_entries(
    docs: &[CorpusDocument],
    tokens: &[Vec<String>],
    max_documents: Option<usize>,
) -> Vec<SimilarityEntry> {
    if let Some(cap) = max_documents {
        if docs.len() > cap {
            warn!(
                documents = docs.len(),
                cap, "Corpus exceeds similarity cap; skipping pairwise similarity"
            );
            return Vec::new();
        }
    }
    let sets: Vec<_> = tokens.iter().map(|t| token_set(t)).collect();
    pairwise(&sets)
        .into_iter()
        .map(|(i, j, sim)| SimilarityEntry {
            doc1: docs[i].name.clone(),
            doc2: docs[j].name.clone(),
            similarity: round_to(sim, PRECISION),
        })
        .collect()
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, text: &str, words: Option<u64>, sentences: u64) -> CorpusDocument {
        CorpusDocument {
            name: name.to_string(),
            record: RecordView {
                text: text.to_string(),
                word_count: words,
                sentence_count: sentences,
            },
        }
    }

    #[test]
    fn test_two_document_report() {
        let docs = vec![
            doc("page_1.json", "A b c.", Some(3), 1),
            doc("page_2.json", "b C d.", Some(3), 1),
        ];
        let r = build_report(&docs, None, "ts".into());

        assert_eq!(r.documents_processed, 2);
        assert_eq!(r.total_words, 6);
        assert_eq!(r.unique_words, 4);
        assert_eq!(r.document_similarity.len(), 1);
        assert_eq!(r.document_similarity[0].doc1, "page_1.json");
        assert_eq!(r.document_similarity[0].doc2, "page_2.json");
        assert_eq!(r.document_similarity[0].similarity, 0.5);

        let top: Vec<(&str, usize)> = r
            .top_100_words
            .iter()
            .map(|w| (w.word.as_str(), w.count))
            .collect();
        assert_eq!(top, vec![("b", 2), ("c", 2), ("a", 1), ("d", 1)]);
        assert_eq!(r.top_100_words[0].frequency, 0.333333);

        // bigrams never cross the document boundary ("c b" must not appear)
        let bigrams: Vec<&str> = r.top_bigrams.iter().map(|b| b.bigram.as_str()).collect();
        assert_eq!(bigrams, vec!["b c", "a b", "c d"]);
        assert_eq!(r.top_bigrams[0].count, 2);
        let trigrams: Vec<&str> = r.top_trigrams.iter().map(|t| t.trigram.as_str()).collect();
        assert_eq!(trigrams, vec!["a b c", "b c d"]);

        assert_eq!(r.readability.avg_sentence_length, 3.0);
        assert_eq!(r.readability.avg_word_length, 1.0);
        assert_eq!(r.readability.complexity_score, 3.0);
    }

    #[test]
    fn test_empty_document_contributes_nothing() {
        let docs = vec![doc("page_1.json", "", Some(0), 0)];
        let r = build_report(&docs, None, "ts".into());
        assert_eq!(r.documents_processed, 1);
        assert_eq!(r.total_words, 0);
        assert!(r.top_100_words.is_empty());
        assert!(r.top_bigrams.is_empty());
        assert!(r.top_trigrams.is_empty());
        assert!(r.document_similarity.is_empty());
        assert_eq!(
            r.readability,
            Readability {
                avg_sentence_length: 0.0,
                avg_word_length: 0.0,
                complexity_score: 0.0
            }
        );
    }

    #[test]
    fn test_missing_word_count_uses_tokens() {
        let docs = vec![doc("page_1.json", "one two three", None, 0)];
        let r = build_report(&docs, None, "ts".into());
        assert_eq!(r.total_words, 3);
        assert_eq!(r.readability.avg_sentence_length, 0.0);
        assert_eq!(r.readability.avg_word_length, round_to(11.0 / 3.0, 6));
    }

    #[test]
    fn test_similarity_cap() {
        let docs = vec![
            doc("page_1.json", "a", None, 1),
            doc("page_2.json", "a", None, 1),
            doc("page_3.json", "b", None, 1),
        ];
        assert_eq!(build_report(&docs, Some(3), "ts".into()).document_similarity.len(), 3);
        assert!(build_report(&docs, Some(2), "ts".into()).document_similarity.is_empty());
    }

    #[test]
    fn test_report_is_deterministic() {
        let docs: Vec<_> = (0..12)
            .map(|i| {
                doc(
                    &format!("page_{i}.json"),
                    &format!("w{} shared tie{} x y x y z{}", i % 3, i % 5, i),
                    None,
                    1,
                )
            })
            .collect();
        let a = build_report(&docs, None, "ts".into());
        let b = build_report(&docs, None, "ts".into());
        assert_eq!(a, b);
        assert_eq!(a.document_similarity.len(), 66);
    }

    #[test]
    fn test_load_documents_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("page_1.json");
        let bad = dir.path().join("page_2.json");
        let sparse = dir.path().join("page_3.json");
        fs::write(&good, r#"{"text": "Hi.", "statistics": {"word_count": 1, "sentence_count": 1}}"#).unwrap();
        fs::write(&bad, "{ not json").unwrap();
        fs::write(&sparse, "{}").unwrap();

        let docs = load_documents(&[good, bad, sparse]);
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["page_1.json", "page_3.json"]);
        assert_eq!(docs[1].record.text, "");
    }
}
