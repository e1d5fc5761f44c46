//! Package writer.

use crate::format::{encode_checksum, encode_directory, encode_file};
use pairpack_bpe::{BpeConfig, MultiPassCompressor};
use pairpack_core::error::Result;
use pairpack_core::{ArchiveWriter, CompressionLevel, SourceEntry};
use std::io::{self, Write};
use tracing::debug;

/// Serialize one traversal entry at the given level.
///
/// Pure function of its inputs, so entries may be encoded on any thread and
/// written later in traversal order.
pub fn encode_entry(entry: &SourceEntry, level: CompressionLevel) -> Result<Vec<u8>> {
    match entry {
        SourceEntry::Directory { path } => encode_directory(path),
        SourceEntry::File { path, content } => {
            let compressed = MultiPassCompressor::new(BpeConfig::from(level)).compress(content);
            encode_file(path, &compressed)
        }
    }
}

/// Streaming package writer.
///
/// Entries are compressed and written one at a time; only the running byte
/// count is kept so the checksum can be appended by [`finish`](Self::finish).
pub struct PackageWriter<W: Write> {
    writer: W,
    compressor: MultiPassCompressor,
    written: u64,
    entries: usize,
    finished: bool,
}

impl<W: Write> PackageWriter<W> {
    /// Create a package writer at the default level.
    pub fn new(writer: W) -> Self {
        Self::with_level(writer, CompressionLevel::default())
    }

    /// Create a package writer with a specific compression level.
    pub fn with_level(writer: W, level: CompressionLevel) -> Self {
        Self {
            writer,
            compressor: MultiPassCompressor::new(BpeConfig::from(level)),
            written: 0,
            entries: 0,
            finished: false,
        }
    }

    /// Write an entry already serialized by [`encode_entry`].
    pub fn write_encoded(&mut self, record: &[u8]) -> Result<()> {
        if self.finished {
            return Err(
                io::Error::new(io::ErrorKind::InvalidInput, "package already finished").into(),
            );
        }
        self.writer.write_all(record)?;
        self.written += record.len() as u64;
        self.entries += 1;
        Ok(())
    }

    /// Bytes written so far, excluding the checksum.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Number of entries written.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Finish the package and return the inner writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.finish()?;
        Ok(self.writer)
    }
}

impl<W: Write> ArchiveWriter for PackageWriter<W> {
    fn add_directory(&mut self, name: &str) -> Result<()> {
        let record = encode_directory(name)?;
        self.write_encoded(&record)?;
        debug!(name, "directory written");
        Ok(())
    }

    fn add_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let compressed = self.compressor.compress(data);
        let record = encode_file(name, &compressed)?;
        self.write_encoded(&record)?;
        debug!(
            name,
            size = data.len(),
            stored = compressed.content.len(),
            passes = compressed.passes(),
            "file written"
        );
        Ok(())
    }

    /// Append the checksum. Calling it again is a no-op.
    fn finish(&mut self) -> Result<()> {
        if !self.finished {
            let checksum = encode_checksum(self.written)?;
            self.writer.write_all(&checksum)?;
            self.writer.flush()?;
            self.finished = true;
            debug!(entries = self.entries, body = self.written, "package finished");
        }
        Ok(())
    }
}
