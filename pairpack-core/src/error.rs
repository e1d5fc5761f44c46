//! Error types for PairPack operations.
//!
//! Every layer of the stack (codec, package container, traversal) reports
//! failures through [`PairPackError`]. All variants are fatal to the current
//! pack or unpack invocation; nothing in PairPack retries.

use std::io;
use thiserror::Error;

/// The main error type for PairPack operations.
#[derive(Debug, Error)]
pub enum PairPackError {
    /// I/O error from the underlying filesystem or writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration (bad source path, bad compression level).
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration problem.
        message: String,
    },

    /// The trailing checksum does not match the package length.
    #[error("Malformed package: checksum declares {declared} bytes, package holds {actual}")]
    ChecksumMismatch {
        /// Length declared by the checksum field.
        declared: u64,
        /// Actual length of the package minus the checksum field.
        actual: u64,
    },

    /// A field runs past the end of the package body.
    #[error(
        "Truncated package at offset {offset}: {field} needs {needed} bytes, {available} available"
    )]
    Truncated {
        /// Byte offset where the field starts.
        offset: u64,
        /// Name of the field being read.
        field: &'static str,
        /// Number of bytes the field needs.
        needed: usize,
        /// Number of bytes left before the checksum boundary.
        available: usize,
    },

    /// A dictionary block whose length is not a whole number of records.
    #[error("Malformed dictionary at offset {offset}: {length} bytes is not a multiple of 3")]
    MalformedDictionary {
        /// Byte offset of the dictionary block.
        offset: u64,
        /// Declared dictionary length.
        length: usize,
    },

    /// An entry tag that is neither file nor directory.
    #[error("Unknown entry type {tag:#06x} at offset {offset}")]
    UnknownEntryType {
        /// The tag that was read.
        tag: u16,
        /// Byte offset of the tag.
        offset: u64,
    },

    /// An entry name that is not valid UTF-8.
    #[error("Entry name at offset {offset} is not valid UTF-8")]
    NonUtf8Name {
        /// Byte offset of the entry.
        offset: u64,
    },

    /// A value too large for its fixed-width package field.
    #[error("{field} value {value} exceeds field maximum {max}")]
    FieldOverflow {
        /// Name of the field.
        field: &'static str,
        /// The value that did not fit.
        value: u64,
        /// Largest value the field can hold.
        max: u64,
    },

    /// Path traversal attempt (e.g., "../" in an entry name).
    #[error("Path traversal detected in entry: {path}")]
    PathTraversal {
        /// The suspicious path.
        path: String,
    },
}

/// Result type alias for PairPack operations.
pub type Result<T> = std::result::Result<T, PairPackError>;

impl PairPackError {
    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a checksum mismatch error.
    pub fn checksum_mismatch(declared: u64, actual: u64) -> Self {
        Self::ChecksumMismatch { declared, actual }
    }

    /// Create a truncated field error.
    pub fn truncated(offset: u64, field: &'static str, needed: usize, available: usize) -> Self {
        Self::Truncated {
            offset,
            field,
            needed,
            available,
        }
    }

    /// Create a malformed dictionary error.
    pub fn malformed_dictionary(offset: u64, length: usize) -> Self {
        Self::MalformedDictionary { offset, length }
    }

    /// Create an unknown entry type error.
    pub fn unknown_entry_type(tag: u16, offset: u64) -> Self {
        Self::UnknownEntryType { tag, offset }
    }

    /// Create a non-UTF-8 entry name error.
    pub fn non_utf8_name(offset: u64) -> Self {
        Self::NonUtf8Name { offset }
    }

    /// Create a field overflow error.
    pub fn field_overflow(field: &'static str, value: u64, max: u64) -> Self {
        Self::FieldOverflow { field, value, max }
    }

    /// Create a path traversal error.
    pub fn path_traversal(path: impl Into<String>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Whether this error means the package bytes themselves are bad.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::ChecksumMismatch { .. }
                | Self::Truncated { .. }
                | Self::MalformedDictionary { .. }
                | Self::UnknownEntryType { .. }
                | Self::NonUtf8Name { .. }
        )
    }
}
