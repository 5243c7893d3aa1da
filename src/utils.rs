//! Common helpers shared by both stages.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{PipelineError, Result};

/// Current UTC time as RFC 3339 with millisecond precision and a `Z` suffix.
pub fn iso_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Round to `places` decimals, half-to-even on the exact binary value.
///
/// Goes through `{:.N}` formatting, which rounds the exact value of the
/// float; scaling by a power of ten first would round ties away from zero.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Decode bytes as UTF-8, silently dropping invalid sequences.
pub fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Pretty-print `value` to `path` so readers never observe a partial file.
///
/// The bytes go to a hidden sibling first, are flushed to disk, and only then
/// renamed over `path`.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_vec_pretty(value).map_err(|e| PipelineError::json(path, e))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PipelineError::FileName(path.to_path_buf()))?;
    let tmp = path.with_file_name(format!(".{name}.tmp"));

    let mut file = File::create(&tmp).map_err(|e| PipelineError::io(&tmp, e))?;
    file.write_all(&body).map_err(|e| PipelineError::io(&tmp, e))?;
    file.sync_all().map_err(|e| PipelineError::io(&tmp, e))?;
    drop(file);

    fs::rename(&tmp, path).map_err(|e| PipelineError::io(path, e))
}
