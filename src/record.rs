//! JSON records exchanged through the shared tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::stats::DocumentStatistics;

/// `processed/page_<n>.json`, written once per raw document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    pub source_file: String,
    pub text: String,
    pub statistics: DocumentStatistics,
    pub links: Vec<String>,
    pub images: Vec<String>,
    pub processed_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingOutcome {
    pub input: String,
    pub output: Option<String>,
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingOutcome {
    pub fn success(input: &str, output: String) -> Self {
        ProcessingOutcome {
            input: input.to_string(),
            output: Some(output),
            status: OutcomeStatus::Success,
            error: None,
        }
    }

    pub fn failed(input: &str, error: String) -> Self {
        ProcessingOutcome {
            input: input.to_string(),
            output: None,
            status: OutcomeStatus::Failed,
            error: Some(error),
        }
    }
}

/// `status/process_complete.json`. Its existence is the processor's done signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub timestamp: String,
    pub files_seen: usize,
    pub processed_success: usize,
    pub processed_failed: usize,
    pub results: Vec<ProcessingOutcome>,
}

impl ProcessingSummary {
    pub fn from_outcomes(timestamp: String, files_seen: usize, results: Vec<ProcessingOutcome>) -> Self {
        let processed_success = results
            .iter()
            .filter(|r| r.status == OutcomeStatus::Success)
            .count();
        ProcessingSummary {
            timestamp,
            files_seen,
            processed_success,
            processed_failed: results.len() - processed_success,
            results,
        }
    }
}

/// What the analyzer needs from a processed record, read leniently.
///
/// Missing or ill-typed fields fall back to defaults instead of failing the
/// whole corpus: no text means empty text, no word count means "count the
/// tokens yourself", no sentence count means zero. Negative counts clamp to 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    pub text: String,
    pub word_count: Option<u64>,
    pub sentence_count: u64,
}

impl RecordView {
    pub fn from_value(value: &Value) -> Self {
        let text = value
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let stats = value.get("statistics");
        let count = |key: &str| -> Option<u64> {
            let v = stats?.get(key)?;
            v.as_i64()
                .map(|n| n.max(0) as u64)
                .or_else(|| v.as_f64().map(|f| f.max(0.0) as u64))
        };
        RecordView {
            text,
            word_count: count("word_count"),
            sentence_count: count("sentence_count").unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub count: usize,
    pub frequency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEntry {
    pub doc1: String,
    pub doc2: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigramEntry {
    pub bigram: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrigramEntry {
    pub trigram: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readability {
    pub avg_sentence_length: f64,
    pub avg_word_length: f64,
    pub complexity_score: f64,
}

/// `analysis/final_report.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    pub processing_timestamp: String,
    pub documents_processed: usize,
    pub total_words: u64,
    pub unique_words: usize,
    pub top_100_words: Vec<WordEntry>,
    pub document_similarity: Vec<SimilarityEntry>,
    pub top_bigrams: Vec<BigramEntry>,
    pub top_trigrams: Vec<TrigramEntry>,
    pub readability: Readability,
}
