//! Sink trait for record output destinations
//!
//! A sink receives each serialized record, newline included, in a single
//! `write_record` call. The logger adds no locking around it: a sink that
//! is shared between threads must tolerate concurrent calls itself, or be
//! wrapped in a [`Mutex`] (see `LoggerBuilder::writer`).

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

pub trait Sink: Send + Sync {
    fn write_record(&self, record: &[u8]) -> io::Result<()>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// Any writer behind a lock. This is the way to log into a plain
/// `io::Write` value that cannot be written through a shared reference.
impl<W: Write + Send> Sink for Mutex<W> {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        self.lock().write_all(record)
    }

    fn flush(&self) -> io::Result<()> {
        Write::flush(&mut *self.lock())
    }

    fn name(&self) -> &str {
        "locked-writer"
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        (**self).write_record(record)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        (**self).write_record(record)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_writer_sink() {
        let sink = Mutex::new(Vec::<u8>::new());
        sink.write_record(b"{\"a\":1}\n").unwrap();
        sink.write_record(b"{\"a\":2}\n").unwrap();
        assert_eq!(sink.lock().as_slice(), b"{\"a\":1}\n{\"a\":2}\n");
        assert_eq!(sink.name(), "locked-writer");
    }

    #[test]
    fn test_shared_sink_delegates() {
        let sink: Arc<dyn Sink> = Arc::new(Mutex::new(Vec::<u8>::new()));
        let shared = Arc::clone(&sink);
        shared.write_record(b"x\n").unwrap();
        assert_eq!(shared.name(), "locked-writer");
        assert!(sink.flush().is_ok());
    }
}
