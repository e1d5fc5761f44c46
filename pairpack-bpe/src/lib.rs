//! # PairPack-BPE: Multi-Pass Byte-Pair Substitution
//!
//! This crate provides the codec behind PairPack packages: byte pair
//! encoding driven by a fixed pass budget, with one substitution dictionary
//! per pass.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **Buffer-relative codes**: Each pass substitutes byte values that do not
//!   occur in its own input
//! - **Nested passes**: Later passes compress pairs of earlier codes
//! - **Deterministic**: Ties between equally frequent pairs go to the pair
//!   discovered first
//!
//! ## Algorithm
//!
//! One pass:
//!
//! - **Free codes**: every byte value absent from the input, ascending
//! - **Census**: repeated adjacent pairs with their non-overlapping counts
//! - **Assignment**: most frequent pair first, each bound to the next free
//!   code and replaced throughout the buffer
//!
//! Passes chain until the budget is spent, no free code remains, or a pass
//! finds nothing to substitute. Expansion undoes the passes newest first.
//!
//! ## Example
//!
//! ```rust
//! use pairpack_bpe::{BpeConfig, compress, expand};
//!
//! let original = b"AAAA";
//!
//! let entry = compress(original, BpeConfig::new(1));
//! assert_eq!(entry.content, vec![0x00, 0x00]);
//! assert_eq!(entry.dictionaries[0].to_bytes(), vec![0x00, 0x41, 0x41]);
//!
//! assert_eq!(expand(&entry), original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod builder;
mod config;
mod decoder;
mod dictionary;
mod encoder;
mod scanner;

pub use builder::{
    PairCount, PairDictionaryBuilder, PassOutput, count_occurrences, pair_census, replace_pair,
};
pub use config::BpeConfig;
pub use decoder::MultiPassExpander;
pub use dictionary::{PairDictionary, PairRecord, RECORD_LEN};
pub use encoder::{CompressedEntry, MultiPassCompressor};
pub use scanner::{FreeCodes, free_codes};

/// Compress a buffer with the given configuration.
///
/// # Example
///
/// ```rust
/// use pairpack_bpe::{compress, BpeConfig};
///
/// let data = b"abababababababab";
/// let entry = compress(data, BpeConfig::DEFAULT);
/// assert!(entry.content.len() < data.len());
/// assert!(entry.passes() <= 4);
/// ```
pub fn compress(data: &[u8], config: BpeConfig) -> CompressedEntry {
    MultiPassCompressor::new(config).compress(data)
}

/// Restore the original buffer from a compressed entry.
///
/// # Example
///
/// ```rust
/// use pairpack_bpe::{compress, expand, BpeConfig};
///
/// let original = b"Hello, Hello, Hello!";
/// let entry = compress(original, BpeConfig::DEFAULT);
/// assert_eq!(expand(&entry), original);
/// ```
pub fn expand(entry: &CompressedEntry) -> Vec<u8> {
    MultiPassExpander::expand(&entry.content, &entry.dictionaries)
}
