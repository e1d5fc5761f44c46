//! # PairPack Core
//!
//! Core components for the PairPack package library.
//!
//! - [`entry`]: Entries going into and coming out of a package
//! - [`traits`]: Writer/reader traits and the compression level
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! PairPack is a small layered stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: CLI                                                 │
//! │     create / extract / list / test                      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Container (pairpack-archive)                        │
//! │     package writer/reader, checksum, tree traversal     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec (pairpack-bpe)                                │
//! │     multi-pass byte-pair substitution                   │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Core (this crate)                                   │
//! │     Entry, CompressionLevel, traits, PairPackError      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pairpack_core::{CompressionLevel, Entry};
//!
//! let level = CompressionLevel::try_from(4i64).unwrap();
//! assert_eq!(level.passes(), 4);
//! assert!(CompressionLevel::try_from(0i64).is_err());
//!
//! let entry = Entry::file("./docs/readme.txt", 120);
//! assert_eq!(entry.sanitized_name(), "docs/readme.txt");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod entry;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use entry::{Entry, EntryType, SourceEntry};
pub use error::{PairPackError, Result};
pub use traits::{ArchiveReader, ArchiveWriter, CompressionLevel};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::entry::{Entry, EntryType, SourceEntry};
    pub use crate::error::{PairPackError, Result};
    pub use crate::traits::{ArchiveReader, ArchiveWriter, CompressionLevel};
}
