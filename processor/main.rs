//! Processor stage binary.
//!
//! Waits for the fetch stage's marker, normalizes every raw page into
//! `processed/`, then signals with `status/process_complete.json`.

use anyhow::{Context, Result};
use doc_pipeline::marker::PollingWatch;
use doc_pipeline::processor::Processor;
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
    info!(settings = ?settings, msg = "Starting document processor");

    println!("Document Processor");
    println!("==================\n");

    let layout = SharedLayout::new(&settings.root);
    println!("Shared root: {:?}\n", layout.root());

    let processor = Processor::new(
        layout,
        PollingWatch::new(settings.poll_interval()),
        settings.document_delay(),
    );
    let summary = processor.run().context("Processor stage failed")?;

    println!(
        "\nDone: {} files ({} ok, {} failed).",
        summary.files_seen, summary.processed_success, summary.processed_failed
    );
    Ok(())
}
