//! Processor stage: raw HTML pages -> normalized per-document records.
//!
//! Walks `AwaitingUpstream -> Enumerating -> ProcessingEach -> Finalizing -> Done`.
//! Each document yields its own `Result`; a failed document becomes a failed
//! outcome and the loop moves on. The summary marker is written exactly once,
//! after every record is on disk.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::html;
use crate::layout::{file_name, list_pages, record_name_for, SharedLayout};
use crate::marker::{write_marker, MarkerWatch};
use crate::record::{NormalizedDocument, ProcessingOutcome, ProcessingSummary};
use crate::stats;
use crate::utils::{decode_utf8_dropping_invalid, iso_utc, write_json_atomic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingUpstream,
    Enumerating,
    ProcessingEach,
    Finalizing,
    Done,
}

pub struct Processor<W: MarkerWatch> {
    layout: SharedLayout,
    watch: W,
    delay: Duration,
}

impl<W: MarkerWatch> Processor<W> {
    pub fn new(layout: SharedLayout, watch: W, delay: Duration) -> Self {
        Processor {
            layout,
            watch,
            delay,
        }
    }

    pub fn run(&self) -> Result<ProcessingSummary> {
        let out_dir = self.layout.processed_dir();
        SharedLayout::ensure_dirs(&[out_dir.clone(), self.layout.status_dir()])?;

        enter(Stage::AwaitingUpstream);
        self.watch.wait_for(&self.layout.fetch_marker())?;

        enter(Stage::Enumerating);
        let pages = list_pages(&self.layout.raw_dir(), "html")?;
        info!(count = pages.len(), dir = %self.layout.raw_dir().display(), "Found HTML files");

        enter(Stage::ProcessingEach);
        let mut results = Vec::with_capacity(pages.len());
        for path in &pages {
            let input = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let outcome = match process_document(path, &out_dir) {
                Ok(output) => {
                    info!(input = %input, output = %output, "Processed");
                    ProcessingOutcome::success(&input, output)
                }
                Err(e) => {
                    warn!(input = %input, error = %e, "Failed to process");
                    ProcessingOutcome::failed(&input, e.to_string())
                }
            };
            results.push(outcome);
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }

        enter(Stage::Finalizing);
        let summary = ProcessingSummary::from_outcomes(iso_utc(), pages.len(), results);
        write_marker(&self.layout.process_marker(), &summary)?;

        enter(Stage::Done);
        info!(
            success = summary.processed_success,
            failed = summary.processed_failed,
            "Processor complete"
        );
        Ok(summary)
    }
}

fn enter(stage: Stage) {
    info!(stage = ?stage, "Processor stage");
}

/// Normalize one raw page and write its record. Returns the record's file name.
pub fn process_document(raw_path: &Path, out_dir: &Path) -> Result<String> {
    let source_file = file_name(raw_path)?;
    let bytes = fs::read(raw_path).map_err(|e| PipelineError::io(raw_path, e))?;
    let html = decode_utf8_dropping_invalid(&bytes);

    let record = build_record(source_file, &html);
    let output = record_name_for(source_file);
    write_json_atomic(&out_dir.join(&output), &record)?;
    Ok(output)
}

pub fn build_record(source_file: &str, html: &str) -> NormalizedDocument {
    let normalized = html::normalize(html);
    let statistics = stats::compute(html, &normalized.text);
    NormalizedDocument {
        source_file: source_file.to_string(),
        text: normalized.text,
        statistics,
        links: normalized.links,
        images: normalized.images,
        processed_at: iso_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::PollingWatch;
    use crate::record::OutcomeStatus;

    fn layout_with_fetch_done() -> (tempfile::TempDir, SharedLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = SharedLayout::new(dir.path());
        fs::create_dir_all(layout.raw_dir()).unwrap();
        fs::create_dir_all(layout.status_dir()).unwrap();
        fs::write(layout.fetch_marker(), "{}").unwrap();
        (dir, layout)
    }

    fn processor(layout: &SharedLayout) -> Processor<PollingWatch<crate::marker::SystemClock>> {
        Processor::new(
            layout.clone(),
            PollingWatch::new(Duration::from_millis(5)),
            Duration::ZERO,
        )
    }

    #[test]
    fn test_build_record() {
        let rec = build_record(
            "page_1.html",
            "<p>Hello <a href=\"/x\">there</a>.</p><img src=\"a.png\">",
        );
        assert_eq!(rec.source_file, "page_1.html");
        assert_eq!(rec.text, "Hello there .");
        assert_eq!(rec.links, vec!["/x"]);
        assert_eq!(rec.images, vec!["a.png"]);
        assert_eq!(rec.statistics.word_count, 2);
        assert_eq!(rec.statistics.sentence_count, 1);
        assert!(rec.processed_at.ends_with('Z'));
    }

    #[test]
    fn test_bad_document_does_not_abort_run() {
        let (_dir, layout) = layout_with_fetch_done();
        fs::write(layout.raw_dir().join("page_1.html"), "<p>One.</p>").unwrap();
        // A directory with a page name cannot be read as a file.
        fs::create_dir(layout.raw_dir().join("page_2.html")).unwrap();
        fs::write(layout.raw_dir().join("page_3.html"), b"<p>Thr\xffee.</p>").unwrap();

        let summary = processor(&layout).run().unwrap();

        assert_eq!(summary.files_seen, 3);
        assert_eq!(summary.processed_success, 2);
        assert_eq!(summary.processed_failed, 1);
        let statuses: Vec<_> = summary.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![OutcomeStatus::Success, OutcomeStatus::Failed, OutcomeStatus::Success]
        );
        assert_eq!(summary.results[1].input, "page_2.html");
        assert!(summary.results[1].output.is_none());
        assert!(summary.results[1].error.is_some());

        let rec: NormalizedDocument = serde_json::from_str(
            &fs::read_to_string(layout.processed_dir().join("page_3.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(rec.text, "Three.");
        assert!(!layout.processed_dir().join("page_2.json").exists());

        let on_disk: ProcessingSummary =
            serde_json::from_str(&fs::read_to_string(layout.process_marker()).unwrap()).unwrap();
        assert_eq!(on_disk, summary);
    }

    #[test]
    fn test_empty_raw_dir_still_signals() {
        let (_dir, layout) = layout_with_fetch_done();
        let summary = processor(&layout).run().unwrap();
        assert_eq!(summary.files_seen, 0);
        assert!(summary.results.is_empty());
        assert!(layout.process_marker().exists());
    }
}
