//! # PairPack Archive
//!
//! The package container for PairPack.
//!
//! - [`format`]: byte layout, field codecs, trailing checksum
//! - [`writer`]: [`PackageWriter`], one entry at a time
//! - [`reader`]: [`PackageReader`], checksum first, then a full parse, then extraction
//! - [`walk`]: source traversal and [`ExcludeRules`]
//! - `parallel` (feature `parallel`): rayon-backed packing with identical output
//!
//! ## Example
//!
//! ```rust
//! use pairpack_archive::{PackageReader, PackageWriter};
//! use pairpack_core::{ArchiveReader, ArchiveWriter, CompressionLevel};
//!
//! let mut writer = PackageWriter::with_level(Vec::new(), CompressionLevel::new(1).unwrap());
//! writer.add_directory("./docs").unwrap();
//! writer.add_file("./docs/a.txt", b"AAAA").unwrap();
//! let package = writer.into_inner().unwrap();
//!
//! let reader = PackageReader::new(package).unwrap();
//! assert_eq!(reader.entries().len(), 2);
//! assert_eq!(reader.extract_by_name("./docs/a.txt").unwrap().unwrap(), b"AAAA");
//! ```
//!
//! Packing a directory on disk:
//!
//! ```rust,no_run
//! use pairpack_archive::{ExcludeRules, PackOptions, default_output_path, pack, unpack};
//!
//! // `*.git` skips entries named `.git`; `**.tmp` skips every name ending in `.tmp`.
//! let excludes = ExcludeRules::parse("target, *.git, **.tmp").unwrap();
//! let options = PackOptions::default().with_excludes(excludes);
//! let output = default_output_path("project");
//! pack("project", &output, &options).unwrap();
//! unpack(&output, "restored").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod format;
mod pack;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod reader;
pub mod walk;
pub mod writer;

// Re-exports
pub use pack::{
    PACKAGE_EXTENSION, PackOptions, PackSummary, default_output_path, pack, pack_observed,
    pack_with, unpack,
};
#[cfg(feature = "parallel")]
pub use parallel::{encode_entries_parallel, pack_entries_parallel, pack_parallel};
pub use reader::{ExtractSummary, PackageReader, VerifySummary};
pub use walk::{ExcludeRules, collect_entries, walk_source};
pub use writer::{PackageWriter, encode_entry};
