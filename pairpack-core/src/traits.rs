//! Core traits for package operations.
//!
//! The traversal layer only knows [`ArchiveWriter`]; the CLI only knows
//! [`ArchiveReader`]. The concrete package types live in `pairpack-archive`.

use crate::entry::{Entry, SourceEntry};
use crate::error::{PairPackError, Result};

/// A package writer that accepts entries in traversal order.
pub trait ArchiveWriter {
    /// Add a directory entry.
    fn add_directory(&mut self, name: &str) -> Result<()>;

    /// Compress and add a file entry.
    fn add_file(&mut self, name: &str, data: &[u8]) -> Result<()>;

    /// Finalize the package (appends the trailing checksum).
    fn finish(&mut self) -> Result<()>;

    /// Add an entry produced by the traversal.
    fn add_entry(&mut self, entry: &SourceEntry) -> Result<()> {
        match entry {
            SourceEntry::Directory { path } => self.add_directory(path),
            SourceEntry::File { path, content } => self.add_file(path, content),
        }
    }
}

/// A package reader that can list and expand entries.
pub trait ArchiveReader {
    /// Get the list of entries in the package.
    fn entries(&self) -> &[Entry];

    /// Expand a specific file entry to its original content.
    fn extract(&self, entry: &Entry) -> Result<Vec<u8>>;

    /// Get an entry by name.
    fn entry_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries().iter().find(|e| e.name == name)
    }

    /// Expand an entry by name.
    fn extract_by_name(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.entry_by_name(name) {
            Some(entry) => Ok(Some(self.extract(entry)?)),
            None => Ok(None),
        }
    }
}

/// Compression level: the maximum number of substitution passes per entry.
///
/// The package stores the pass count in a single byte, so valid levels are
/// 1 through 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// Single pass.
    pub const FAST: Self = Self(1);
    /// Default level (four passes).
    pub const DEFAULT: Self = Self(4);
    /// Largest level the package format can describe.
    pub const MAX: Self = Self(u8::MAX);

    /// Create a compression level, rejecting zero.
    pub fn new(passes: u8) -> Result<Self> {
        if passes == 0 {
            return Err(PairPackError::invalid_config(
                "compression level must be at least 1",
            ));
        }
        Ok(Self(passes))
    }

    /// Get the maximum pass count.
    pub fn passes(&self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for CompressionLevel {
    type Error = PairPackError;

    fn try_from(level: i64) -> Result<Self> {
        match u8::try_from(level) {
            Ok(passes) => Self::new(passes),
            Err(_) => Err(PairPackError::invalid_config(format!(
                "compression level {} out of range 1-{}",
                level,
                u8::MAX
            ))),
        }
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
