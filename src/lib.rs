//! Shared-directory document pipeline.
//!
//! Two independent stages cooperate through a directory tree:
//!   1. processor: waits for `status/fetch_complete.json`, turns every
//!      `raw/page_*.html` into `processed/page_*.json`, then writes
//!      `status/process_complete.json`.
//!   2. analyzer: waits for `status/process_complete.json`, aggregates every
//!      processed record and writes `analysis/final_report.json`.
//!
//! The only signal between stages is the existence of a marker file.

pub mod analyzer;
pub mod error;
pub mod html;
pub mod layout;
pub mod marker;
pub mod processor;
pub mod record;
pub mod settings;
pub mod stats;
pub mod utils;

pub use error::{PipelineError, Result};
pub use layout::SharedLayout;
pub use settings::Settings;
