//! In-memory sink
//!
//! Collects records in a shared buffer. Clones share the same buffer, so a
//! test can hand one clone to a logger and read records from another.

use crate::core::Sink;
use parking_lot::Mutex;
use serde_json::Value;
use std::io;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, as UTF-8 text
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Parse each line as a JSON record, skipping lines that do not parse
    pub fn records(&self) -> Vec<Value> {
        self.contents()
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        self.buffer.lock().extend_from_slice(record);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
