//! Runtime settings from `PIPELINE_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::Result;

pub const ENV_PREFIX: &str = "PIPELINE";

/// Runtime knobs, read from `PIPELINE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root of the shared tree; the layout below it is fixed.
    pub root: PathBuf,
    pub poll_interval_ms: u64,
    /// Pause after each processed document. 0 disables it.
    pub document_delay_ms: u64,
    /// Skip pairwise similarity when the corpus is larger than this.
    #[serde(default)]
    pub similarity_max_documents: Option<usize>,
    /// How long the analyzer stays alive after writing its report.
    pub linger_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            root: PathBuf::from("/shared"),
            poll_interval_ms: 2000,
            document_delay_ms: 200,
            similarity_max_documents: None,
            linger_secs: 0,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn from_source(env: Environment) -> Result<Self> {
        let defaults = Settings::default();
        let settings = Config::builder()
            .set_default("root", defaults.root.to_string_lossy().to_string())?
            .set_default("poll_interval_ms", defaults.poll_interval_ms)?
            .set_default("document_delay_ms", defaults.document_delay_ms)?
            .set_default("linger_secs", defaults.linger_secs)?
            .add_source(env)
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn document_delay(&self) -> Duration {
        Duration::from_millis(self.document_delay_ms)
    }

    pub fn linger(&self) -> Duration {
        Duration::from_secs(self.linger_secs)
    }
}
