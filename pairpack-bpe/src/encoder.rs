//! Multi-pass byte-pair encoder (compression).

use crate::builder::PairDictionaryBuilder;
use crate::config::BpeConfig;
use crate::decoder::MultiPassExpander;
use crate::dictionary::PairDictionary;
use crate::scanner::FreeCodes;
use tracing::debug;

/// A buffer after all passes, with the dictionaries needed to restore it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressedEntry {
    /// Content after every pass's substitutions.
    pub content: Vec<u8>,
    /// One dictionary per pass, pass 0 first.
    pub dictionaries: Vec<PairDictionary>,
}

impl CompressedEntry {
    /// Number of passes that produced substitutions.
    pub fn passes(&self) -> usize {
        self.dictionaries.len()
    }

    /// Restore the original buffer.
    pub fn expand(&self) -> Vec<u8> {
        MultiPassExpander::expand(&self.content, &self.dictionaries)
    }
}

/// Multi-pass byte-pair encoder.
///
/// Each pass scans its own input for free codes, so codes are only unique
/// within a pass; later passes may substitute pairs made of earlier codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiPassCompressor {
    config: BpeConfig,
}

impl MultiPassCompressor {
    /// Create an encoder with the given configuration.
    pub fn new(config: BpeConfig) -> Self {
        Self { config }
    }

    /// Compress a borrowed buffer.
    pub fn compress(&self, data: &[u8]) -> CompressedEntry {
        self.compress_owned(data.to_vec())
    }

    /// Compress a buffer, taking ownership of it.
    ///
    /// Stops before the pass budget is spent when a pass finds no free code
    /// or no repeated pair.
    pub fn compress_owned(&self, data: Vec<u8>) -> CompressedEntry {
        let original_len = data.len();
        let mut content = data;
        let mut dictionaries = Vec::new();

        for pass in 0..self.config.passes {
            let codes = FreeCodes::scan(&content);
            if codes.is_empty() {
                debug!(pass, "no free codes, stopping");
                break;
            }

            let free = codes.remaining();
            let output = PairDictionaryBuilder::new(codes).build(content);
            content = output.content;

            if output.dictionary.is_empty() {
                debug!(pass, "no repeated pairs, stopping");
                break;
            }

            debug!(
                pass,
                free,
                records = output.dictionary.len(),
                size = content.len(),
                "pass complete"
            );
            dictionaries.push(output.dictionary);
        }

        debug!(
            original = original_len,
            compressed = content.len(),
            passes = dictionaries.len(),
            "buffer compressed"
        );

        CompressedEntry {
            content,
            dictionaries,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &BpeConfig {
        &self.config
    }
}
