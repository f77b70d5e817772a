use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or persisting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create report directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Xml(#[from] xml::writer::Error),

    #[error("serialized report is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("invalid event on line {line}: {source}")]
    InvalidEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An event arrived that the current open entities cannot accept.
    #[error("{event} received while {problem}")]
    OutOfOrder {
        event: &'static str,
        problem: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
