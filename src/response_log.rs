//! Response log: one record per correlated response with its round-trip latency.
//!
//! Line format for [`FileResponseLog`]: `<order_id>,<Accept|Reject>,<latency>s` with the
//! latency in seconds to six decimals. Sink: append-only file or in-memory (tests).

use crate::error::Result;
use crate::types::OrderResponse;
use log::warn;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

pub trait ResponseLog: Send + Sync {
    fn log_response(&self, response: &OrderResponse, latency_secs: f64);
}

pub fn format_line(response: &OrderResponse, latency_secs: f64) -> String {
    format!("{},{},{:.6}s", response.order_id, response.kind, latency_secs)
}

/// Appends lines to a file. Safe to use from multiple threads.
#[derive(Debug)]
pub struct FileResponseLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileResponseLog {
    /// Opens (creating if needed) `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResponseLog for FileResponseLog {
    fn log_response(&self, response: &OrderResponse, latency_secs: f64) {
        let line = format_line(response, latency_secs);
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(file, "{}", line) {
            warn!("response log write failed path={} error={}", self.path.display(), e);
        }
    }
}

/// One entry captured by [`InMemoryResponseLog`].
#[derive(Clone, Debug, PartialEq)]
pub struct LoggedResponse {
    pub response: OrderResponse,
    pub latency_secs: f64,
}

/// In-memory log for tests. Clone shares the same backing buffer.
#[derive(Clone, Debug, Default)]
pub struct InMemoryResponseLog {
    entries: Arc<Mutex<Vec<LoggedResponse>>>,
}

impl InMemoryResponseLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LoggedResponse> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl ResponseLog for InMemoryResponseLog {
    fn log_response(&self, response: &OrderResponse, latency_secs: f64) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LoggedResponse {
                response: response.clone(),
                latency_secs,
            });
    }
}
