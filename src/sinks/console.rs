//! Console sinks
//!
//! Both streams go through the standard library's own handle lock, so a
//! record is never interleaved with another `print!` from the process.

use crate::core::Sink;
use std::io::{self, Stderr, Stdout, Write};

impl Sink for Stdout {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        self.lock().write_all(record)
    }

    fn flush(&self) -> io::Result<()> {
        Write::flush(&mut self.lock())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

impl Sink for Stderr {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        self.lock().write_all(record)
    }

    fn flush(&self) -> io::Result<()> {
        Write::flush(&mut self.lock())
    }

    fn name(&self) -> &str {
        "stderr"
    }
}
