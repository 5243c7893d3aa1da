//! Fixed directory layout of the shared tree, and the canonical document order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

pub const RAW_DIR: &str = "raw";
pub const PROCESSED_DIR: &str = "processed";
pub const STATUS_DIR: &str = "status";
pub const ANALYSIS_DIR: &str = "analysis";

pub const FETCH_MARKER: &str = "fetch_complete.json";
pub const PROCESS_MARKER: &str = "process_complete.json";
pub const FINAL_REPORT: &str = "final_report.json";

const PAGE_PREFIX: &str = "page_";

#[derive(Debug, Clone)]
pub struct SharedLayout {
    root: PathBuf,
}

impl SharedLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SharedLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.root.join(RAW_DIR)
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.root.join(PROCESSED_DIR)
    }

    pub fn status_dir(&self) -> PathBuf {
        self.root.join(STATUS_DIR)
    }

    pub fn analysis_dir(&self) -> PathBuf {
        self.root.join(ANALYSIS_DIR)
    }

    pub fn fetch_marker(&self) -> PathBuf {
        self.status_dir().join(FETCH_MARKER)
    }

    pub fn process_marker(&self) -> PathBuf {
        self.status_dir().join(PROCESS_MARKER)
    }

    pub fn final_report(&self) -> PathBuf {
        self.analysis_dir().join(FINAL_REPORT)
    }

    /// Create the given directories if absent. Idempotent.
    pub fn ensure_dirs(dirs: &[PathBuf]) -> Result<()> {
        for dir in dirs {
            fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
        }
        Ok(())
    }
}

/// List `page_*.<extension>` entries of `dir` in canonical order.
///
/// Canonical order is ascending byte-wise comparison of the file name
/// (so `page_10` sorts before `page_2`). Every document identifier
/// downstream is the file name, so both stages must use this function.
pub fn list_pages(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{extension}");
    let mut pages: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))? {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.starts_with(PAGE_PREFIX) && name.ends_with(&suffix) {
            pages.push((name, entry.path()));
        }
    }
    pages.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// File name of `path` as UTF-8.
pub fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PipelineError::FileName(path.to_path_buf()))
}

/// `page_3.html` -> `page_3.json`
pub fn record_name_for(raw_name: &str) -> String {
    let stem = match raw_name.rfind('.') {
        Some(idx) if idx > 0 => &raw_name[..idx],
        _ => raw_name,
    };
    format!("{stem}.json")
}
