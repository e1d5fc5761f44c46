//! Per-pass substitution dictionary.

use pairpack_core::error::{PairPackError, Result};

/// Size of one serialized record: code byte followed by the two pair bytes.
pub const RECORD_LEN: usize = 3;

/// One substitution: every `code` byte in the pass output stands for `pair`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairRecord {
    /// Substitution code (a byte value absent from the pass input).
    pub code: u8,
    /// The two bytes the code replaces.
    pub pair: [u8; 2],
}

/// The ordered records produced by one compression pass.
///
/// Records are kept in assignment order, which is ascending code order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairDictionary {
    records: Vec<PairRecord>,
}

impl PairDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, code: u8, pair: [u8; 2]) {
        self.records.push(PairRecord { code, pair });
    }

    /// Get the records in stored order.
    pub fn records(&self) -> &[PairRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dictionary has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialized length in bytes.
    pub fn byte_len(&self) -> usize {
        self.records.len() * RECORD_LEN
    }

    /// Append the flat `code, pair_hi, pair_lo` triples to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(self.byte_len());
        for record in &self.records {
            out.push(record.code);
            out.extend_from_slice(&record.pair);
        }
    }

    /// Serialize to the flat record layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        self.write_to(&mut out);
        out
    }

    /// Parse the flat record layout.
    ///
    /// `offset` is the package offset of `bytes`, used for error context.
    pub fn from_bytes(bytes: &[u8], offset: u64) -> Result<Self> {
        if bytes.len() % RECORD_LEN != 0 {
            return Err(PairPackError::malformed_dictionary(offset, bytes.len()));
        }

        let records = bytes
            .chunks_exact(RECORD_LEN)
            .map(|chunk| PairRecord {
                code: chunk[0],
                pair: [chunk[1], chunk[2]],
            })
            .collect();

        Ok(Self { records })
    }

    /// Undo this dictionary's substitutions.
    ///
    /// Equivalent to replacing every occurrence of each record's code with its
    /// pair, record by record in stored order. Dictionaries built by this
    /// crate never expand a code into another code of the same dictionary, so
    /// a single lookup-table sweep suffices; dictionaries that do alias (only
    /// possible in hand-made packages) take the record-by-record path.
    pub fn expand(&self, data: &[u8]) -> Vec<u8> {
        if self.records.is_empty() {
            return data.to_vec();
        }

        let mut table: [Option<[u8; 2]>; 256] = [None; 256];
        for record in &self.records {
            let slot = &mut table[record.code as usize];
            if slot.is_none() {
                *slot = Some(record.pair);
            }
        }

        let aliased = self
            .records
            .iter()
            .any(|r| r.pair.iter().any(|&b| table[b as usize].is_some()));
        if aliased {
            return self.expand_sequential(data);
        }

        let extra = data
            .iter()
            .filter(|&&b| table[b as usize].is_some())
            .count();
        let mut out = Vec::with_capacity(data.len() + extra);
        for &byte in data {
            match table[byte as usize] {
                Some(pair) => out.extend_from_slice(&pair),
                None => out.push(byte),
            }
        }
        out
    }

    fn expand_sequential(&self, data: &[u8]) -> Vec<u8> {
        let mut current = data.to_vec();
        for record in &self.records {
            let mut next = Vec::with_capacity(current.len());
            for &byte in &current {
                if byte == record.code {
                    next.extend_from_slice(&record.pair);
                } else {
                    next.push(byte);
                }
            }
            current = next;
        }
        current
    }
}
