//! Analyzer stage binary.
//!
//! Waits for `status/process_complete.json`, aggregates every processed
//! record and writes `analysis/final_report.json`.

use std::thread;

use anyhow::{Context, Result};
use doc_pipeline::analyzer::Analyzer;
use doc_pipeline::marker::PollingWatch;
use doc_pipeline::{SharedLayout, Settings};
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let settings = Settings::from_env().context("Failed to load PIPELINE_* settings")?;
    info!(settings = ?settings, msg = "Starting corpus analyzer");

    println!("Corpus Analyzer");
    println!("===============\n");

    let layout = SharedLayout::new(&settings.root);
    println!("Shared root: {:?}\n", layout.root());
    let report_path = layout.final_report();

    let analyzer = Analyzer::new(
        layout,
        PollingWatch::new(settings.poll_interval()),
        settings.similarity_max_documents,
    );
    let report = analyzer.run().context("Analyzer stage failed")?;

    println!(
        "\nDone: {} documents, {} words ({} unique) -> {:?}",
        report.documents_processed, report.total_words, report.unique_words, report_path
    );

    if settings.linger_secs > 0 {
        info!(secs = settings.linger_secs, "Lingering before exit");
        thread::sleep(settings.linger());
    }
    Ok(())
}
