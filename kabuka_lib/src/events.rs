//! Append-only event log.
//!
//! Records are newline-delimited JSON objects:
//! `{"ts": <RFC 3339>, "type": <event type>, ...fields}`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventSinkError {
    #[error("event log I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("event serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Destination for tracking events. Nothing is read back.
///
/// `record` is synchronous and runs on the caller's thread, including from
/// inside [`crate::QuoteService::get_quote`]. Implementations should stay
/// cheap; a sink that may block for long should hand work off itself.
pub trait EventSink: Send + Sync {
    fn record(&self, event_type: &str, fields: Map<String, Value>) -> Result<(), EventSinkError>;
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn record(&self, _event_type: &str, _fields: Map<String, Value>) -> Result<(), EventSinkError> {
        Ok(())
    }
}

/// Appends one JSON line per event to a file, creating parent directories
/// on first write. Each record is a small blocking append, so the event is
/// on disk by the time `record` returns.
#[derive(Debug)]
pub struct JsonlEventSink {
    path: PathBuf,
    /// Serializes appends from this process.
    write_lock: Mutex<()>,
}

impl JsonlEventSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for JsonlEventSink {
    fn record(&self, event_type: &str, fields: Map<String, Value>) -> Result<(), EventSinkError> {
        let mut line = serde_json::to_string(&build_record(event_type, fields))?;
        line.push('\n');

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// `ts` and `type` always win over caller fields of the same name.
fn build_record(event_type: &str, fields: Map<String, Value>) -> Map<String, Value> {
    let mut record = fields;
    record.insert(
        "ts".to_string(),
        Value::String(chrono::Utc::now().to_rfc3339()),
    );
    record.insert("type".to_string(), Value::String(event_type.to_string()));
    record
}
