//! Byte-pair codec configuration.

use pairpack_core::CompressionLevel;

/// Byte-pair codec configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BpeConfig {
    /// Maximum number of substitution passes per buffer.
    ///
    /// Zero is accepted here and leaves the buffer untouched; packages only
    /// ever see a validated [`CompressionLevel`].
    pub passes: u8,
}

impl BpeConfig {
    /// Default configuration: four passes.
    pub const DEFAULT: Self = Self { passes: 4 };

    /// Create a configuration with the given pass budget.
    pub fn new(passes: u8) -> Self {
        Self { passes }
    }
}

impl Default for BpeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<CompressionLevel> for BpeConfig {
    fn from(level: CompressionLevel) -> Self {
        Self::new(level.passes())
    }
}
