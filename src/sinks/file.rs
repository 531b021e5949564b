//! File sink implementation

use crate::core::{LoggerError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Appends records to a file opened by path.
///
/// Writes are unbuffered: every record reaches the OS in its own
/// `write_all` call, and nothing is lost if the process exits right after.
#[derive(Debug)]
pub struct FileSink {
    file: File,
    path: PathBuf,
}

impl FileSink {
    /// Open `path` for appending, creating it if missing
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}' for appending", path.display()),
                    e,
                )
            })?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush file contents and metadata to disk
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

impl Sink for FileSink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut file = &self.file;
        file.write_all(record)
    }

    fn flush(&self) -> io::Result<()> {
        let mut file = &self.file;
        Write::flush(&mut file)
    }

    fn name(&self) -> &str {
        "file"
    }
}
