//! Byte streams that are writable through a shared reference
//!
//! Each record is handed to the OS with `write_all`. Whether concurrent
//! records can interleave depends on the stream: appends to a file opened
//! with `O_APPEND` are not split for small records on most platforms,
//! socket writes carry no such guarantee.

use crate::core::Sink;
use std::fs::File;
use std::io::{self, Write};
use std::net::TcpStream;

impl Sink for File {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut file: &File = self;
        file.write_all(record)
    }

    fn flush(&self) -> io::Result<()> {
        let mut file: &File = self;
        Write::flush(&mut file)
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Sink for TcpStream {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut stream: &TcpStream = self;
        stream.write_all(record)
    }

    fn flush(&self) -> io::Result<()> {
        let mut stream: &TcpStream = self;
        Write::flush(&mut stream)
    }

    fn name(&self) -> &str {
        "tcp"
    }
}

#[cfg(unix)]
impl Sink for std::os::unix::net::UnixStream {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut stream: &std::os::unix::net::UnixStream = self;
        stream.write_all(record)
    }

    fn name(&self) -> &str {
        "unix"
    }
}
