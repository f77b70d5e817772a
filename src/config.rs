use crate::error::{ReportError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Configuration key holding the reporter's options.
pub const REPORTER_KEY: &str = "junit-reporter";

/// Directory the report lands in when no `dest` is configured.
pub const DEFAULT_REPORT_DIR: &str = "report";

/// Read access to the host's configuration.
pub trait ConfigLookup {
    fn get(&self, key: &str) -> Option<Value>;
}

impl ConfigLookup for Value {
    fn get(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|map| map.get(key)).cloned()
    }
}

/// Empty configuration; every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfig;

impl ConfigLookup for NoConfig {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }
}

/// Options read from the `junit-reporter` configuration entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterOptions {
    /// Destination file or directory.
    pub dest: Option<PathBuf>,
}

impl ReporterOptions {
    pub fn from_config(config: &dyn ConfigLookup) -> Self {
        let Some(entry) = config.get(REPORTER_KEY) else {
            return Self::default();
        };
        let dest = match entry.get("dest") {
            None | Some(Value::Null) => None,
            Some(Value::String(dest)) if !dest.is_empty() => Some(PathBuf::from(dest)),
            Some(other) => {
                tracing::warn!(
                    dest = %other,
                    "ignoring unusable {REPORTER_KEY}.dest, using {DEFAULT_REPORT_DIR}"
                );
                None
            }
        };
        Self { dest }
    }

    /// Configured destination, or the default report directory.
    pub fn destination(&self) -> PathBuf {
        self.dest
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DIR))
    }
}

/// Load a JSON host configuration file.
pub fn load_config(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ReportError::Config {
        path: path.to_path_buf(),
        source,
    })
}
