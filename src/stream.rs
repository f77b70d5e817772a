use crate::error::{ReportError, Result};
use crate::events::Event;
use serde::Deserialize;
use std::path::Path;

/// One recorded line of an event stream (NDJSON).
#[derive(Debug, Deserialize)]
struct Record {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Parse an NDJSON event stream.
///
/// Blank lines and events with unknown names are skipped. Line numbers in
/// errors are 1-based.
pub fn parse_events(content: &str) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(line)
            .map_err(|source| ReportError::InvalidEvent { line: line_no, source })?;
        match Event::from_parts(&record.event, record.data) {
            Some(event) => {
                events.push(event.map_err(|source| ReportError::InvalidEvent { line: line_no, source })?)
            }
            None => tracing::debug!(line = line_no, event = %record.event, "skipping unknown event"),
        }
    }
    Ok(events)
}

/// Read event stream entries from a file.
pub fn read_events(path: &Path) -> Result<Vec<Event>> {
    let content = std::fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_events(&content)
}
