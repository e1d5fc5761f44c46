//! Single-pass dictionary construction.
//!
//! A pass runs in two phases:
//!
//! 1. **Census**: a scratch copy of the buffer is walked left to right. At
//!    every position the pair starting there is counted (non-overlapping,
//!    across the whole scratch copy); a pair seen more than once is recorded
//!    with that count and then deleted from the scratch copy, so bytes that
//!    belong to an already-counted pair cannot be counted again as part of a
//!    neighbouring pair. The resulting table is a one-shot snapshot.
//! 2. **Assignment**: pairs are taken highest count first (ties in discovery
//!    order). Each one receives the next free code and every non-overlapping
//!    occurrence in the real buffer is replaced by that code.
//!
//! The pass ends when the table is empty or the free codes run out.

use crate::dictionary::PairDictionary;
use crate::scanner::FreeCodes;
use tracing::trace;

const PAIR_SLOTS: usize = 1 << 16;
const NO_SLOT: u32 = u32::MAX;

/// A pair recorded by the census with its occurrence count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCount {
    /// The adjacent byte pair.
    pub pair: [u8; 2],
    /// Non-overlapping occurrences at the time it was counted.
    pub count: usize,
}

#[inline]
fn slot(pair: [u8; 2]) -> usize {
    ((pair[0] as usize) << 8) | pair[1] as usize
}

/// Non-overlapping occurrence counts of every pair in `data`, indexed by
/// `(first << 8) | second`.
///
/// A pair of two distinct bytes cannot overlap itself, so its count is its
/// number of positions. A doubled byte `xx` inside a run of `n` equal bytes
/// matches `n / 2` times when scanned left to right.
fn count_pairs_into(data: &[u8], counts: &mut [u32]) {
    counts.fill(0);

    for window in data.windows(2) {
        if window[0] != window[1] {
            counts[slot([window[0], window[1]])] += 1;
        }
    }

    let mut i = 0;
    while i < data.len() {
        let byte = data[i];
        let mut run = 1;
        while i + run < data.len() && data[i + run] == byte {
            run += 1;
        }
        if run >= 2 {
            counts[slot([byte, byte])] += (run / 2) as u32;
        }
        i += run;
    }
}

/// Number of non-overlapping occurrences of `pair` in `data`.
pub fn count_occurrences(data: &[u8], pair: [u8; 2]) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i + 1 < data.len() {
        if data[i] == pair[0] && data[i + 1] == pair[1] {
            count += 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    count
}

/// Replace every non-overlapping occurrence of `pair`, scanning left to
/// right, with `replacement` (which may be empty).
fn substitute(data: &[u8], pair: [u8; 2], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if i + 1 < data.len() && data[i] == pair[0] && data[i + 1] == pair[1] {
            out.extend_from_slice(replacement);
            i += 2;
        } else {
            out.push(data[i]);
            i += 1;
        }
    }
    out
}

/// Replace every non-overlapping occurrence of `pair` with `code`.
pub fn replace_pair(data: &[u8], pair: [u8; 2], code: u8) -> Vec<u8> {
    substitute(data, pair, &[code])
}

/// Run the census over `data` and return the frequency table in discovery
/// order.
///
/// Counting a position is a table lookup; the table is recounted, and the
/// scratch copy rebuilt, once per recorded pair. A census therefore costs
/// O(n) per distinct repeated pair, which is still roughly quadratic on large
/// buffers with many distinct pairs.
pub fn pair_census(data: &[u8]) -> Vec<PairCount> {
    let mut scratch = data.to_vec();
    let mut counts = vec![0u32; PAIR_SLOTS];
    count_pairs_into(&scratch, &mut counts);

    let mut table: Vec<PairCount> = Vec::new();
    let mut position = vec![NO_SLOT; PAIR_SLOTS];

    let mut i = 0;
    while i + 1 < scratch.len() {
        let pair = [scratch[i], scratch[i + 1]];
        let count = counts[slot(pair)] as usize;

        if count > 1 {
            scratch = substitute(&scratch, pair, &[]);
            count_pairs_into(&scratch, &mut counts);

            // A removal can splice together a pair that was already recorded;
            // the later count replaces the earlier one in place.
            match position[slot(pair)] {
                NO_SLOT => {
                    position[slot(pair)] = table.len() as u32;
                    table.push(PairCount { pair, count });
                }
                index => table[index as usize].count = count,
            }
        }

        i += 1;
    }

    table
}

/// Output of one dictionary-building pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutput {
    /// The buffer with this pass's substitutions applied.
    pub content: Vec<u8>,
    /// The records needed to undo them.
    pub dictionary: PairDictionary,
}

/// Builds one pass's dictionary from a buffer and its free codes.
#[derive(Debug)]
pub struct PairDictionaryBuilder {
    codes: FreeCodes,
}

impl PairDictionaryBuilder {
    /// Create a builder that allocates from `codes`.
    pub fn new(codes: FreeCodes) -> Self {
        Self { codes }
    }

    /// Create a builder whose free codes are scanned from `data`.
    pub fn for_buffer(data: &[u8]) -> Self {
        Self::new(FreeCodes::scan(data))
    }

    /// Run the pass over `content`.
    ///
    /// A census pair that no longer occurs at least twice in the real buffer
    /// (earlier substitutions in this pass consumed its bytes) is dropped
    /// without spending a code on it.
    pub fn build(mut self, content: Vec<u8>) -> PassOutput {
        let mut content = content;
        let mut dictionary = PairDictionary::new();
        let mut table = pair_census(&content);

        'assign: while !table.is_empty() && !self.codes.is_empty() {
            let max = table.iter().map(|e| e.count).max().unwrap_or(0);
            let (top, rest): (Vec<PairCount>, Vec<PairCount>) =
                table.into_iter().partition(|e| e.count == max);
            table = rest;

            for entry in top {
                if count_occurrences(&content, entry.pair) < 2 {
                    trace!(pair = ?entry.pair, "pair no longer repeats, skipped");
                    continue;
                }

                let Some(code) = self.codes.next_code() else {
                    break 'assign;
                };

                content = replace_pair(&content, entry.pair, code);
                dictionary.push(code, entry.pair);
                trace!(code, pair = ?entry.pair, census = entry.count, "assigned");
            }
        }

        PassOutput {
            content,
            dictionary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts_of(data: &[u8]) -> Vec<u32> {
        let mut counts = vec![0u32; PAIR_SLOTS];
        count_pairs_into(data, &mut counts);
        counts
    }

    #[test]
    fn test_count_pairs_non_overlapping() {
        let counts = counts_of(b"AAAAB");
        assert_eq!(counts[slot(*b"AA")], 2);
        assert_eq!(counts[slot(*b"AB")], 1);

        let counts = counts_of(b"AAA");
        assert_eq!(counts[slot(*b"AA")], 1);
    }

    #[test]
    fn test_count_pairs_matches_direct_count() {
        let data = b"abababcccccabcaaab";
        let counts = counts_of(data);
        for pair in [*b"ab", *b"ba", *b"cc", *b"aa", *b"ca", *b"bc"] {
            assert_eq!(
                counts[slot(pair)] as usize,
                count_occurrences(data, pair),
                "pair {:?}",
                pair
            );
        }
    }

    #[test]
    fn test_replace_pair() {
        assert_eq!(replace_pair(b"AAAA", *b"AA", 0), vec![0, 0]);
        assert_eq!(replace_pair(b"AAA", *b"AA", 0), vec![0, b'A']);
        assert_eq!(replace_pair(b"xABy", *b"AB", 7), vec![b'x', 7, b'y']);
        assert_eq!(replace_pair(b"", *b"AB", 7), Vec::<u8>::new());
    }

    #[test]
    fn test_census_removes_counted_pairs() {
        // "AB" is counted first (3 times) and removed, leaving "CC".
        let table = pair_census(b"ABCABCAB");
        assert_eq!(
            table,
            vec![PairCount {
                pair: *b"AB",
                count: 3
            }]
        );
    }

    #[test]
    fn test_census_ignores_single_pairs() {
        assert!(pair_census(b"abcdef").is_empty());
        assert!(pair_census(b"").is_empty());
        assert!(pair_census(b"x").is_empty());
    }

    #[test]
    fn test_census_discovery_order() {
        let table = pair_census(b"xyxyabab");
        let pairs: Vec<[u8; 2]> = table.iter().map(|e| e.pair).collect();
        assert_eq!(pairs, vec![*b"xy", *b"ab"]);
    }

    /// Census that counts every position directly against the scratch copy.
    fn direct_census(data: &[u8]) -> Vec<PairCount> {
        let mut scratch = data.to_vec();
        let mut table: Vec<PairCount> = Vec::new();
        let mut i = 0;
        while i + 1 < scratch.len() {
            let pair = [scratch[i], scratch[i + 1]];
            let count = count_occurrences(&scratch, pair);
            if count > 1 {
                scratch = substitute(&scratch, pair, &[]);
                match table.iter_mut().find(|e| e.pair == pair) {
                    Some(entry) => entry.count = count,
                    None => table.push(PairCount { pair, count }),
                }
            }
            i += 1;
        }
        table
    }

    #[test]
    fn test_census_matches_direct_count() {
        let mut state = 0x2545_f491u32;
        for (len, alphabet) in [(64, 4u32), (300, 8), (1000, 16), (2000, 3), (512, 256)] {
            let data: Vec<u8> = (0..len)
                .map(|_| {
                    state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                    ((state >> 16) % alphabet) as u8
                })
                .collect();
            assert_eq!(pair_census(&data), direct_census(&data), "len {len}");
        }
        for data in [&b"AAAAAAA"[..], b"ABABABAB", b"abcabcaabbcc", b"zzzAzzzA"] {
            assert_eq!(pair_census(data), direct_census(data));
        }
    }

    #[test]
    fn test_build_aaaa() {
        let output = PairDictionaryBuilder::for_buffer(b"AAAA").build(b"AAAA".to_vec());
        assert_eq!(output.content, vec![0x00, 0x00]);
        assert_eq!(output.dictionary.records().len(), 1);
        assert_eq!(output.dictionary.records()[0].code, 0x00);
        assert_eq!(output.dictionary.records()[0].pair, [0x41, 0x41]);
    }

    #[test]
    fn test_build_highest_count_first() {
        // Census: "xy" x2 is found first, then "bc" x3 in what remains.
        // "bc" outranks "xy" and takes the lowest code.
        let data = b"xyxyabcabcabc".to_vec();
        let output = PairDictionaryBuilder::for_buffer(&data).build(data);
        let records = output.dictionary.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pair, *b"bc");
        assert_eq!(records[0].code, 0x00);
        assert_eq!(records[1].pair, *b"xy");
        assert_eq!(records[1].code, 0x01);
        assert_eq!(output.content, vec![1, 1, b'a', 0, b'a', 0, b'a', 0]);
    }

    #[test]
    fn test_build_no_repeats() {
        let data = b"abcdefg".to_vec();
        let output = PairDictionaryBuilder::for_buffer(&data).build(data.clone());
        assert!(output.dictionary.is_empty());
        assert_eq!(output.content, data);
    }

    #[test]
    fn test_build_without_free_codes() {
        let mut data: Vec<u8> = (0..=255).collect();
        data.extend_from_slice(b"zzzz");
        let output = PairDictionaryBuilder::for_buffer(&data).build(data.clone());
        assert!(output.dictionary.is_empty());
        assert_eq!(output.content, data);
    }

    #[test]
    fn test_build_stops_when_codes_run_out() {
        // Every byte but 0x00 is present, so only one substitution fits.
        let mut data: Vec<u8> = (1..=255).collect();
        data.extend_from_slice(b"ababcdcd");
        let output = PairDictionaryBuilder::for_buffer(&data).build(data.clone());
        assert_eq!(output.dictionary.len(), 1);
        assert_eq!(output.dictionary.expand(&output.content), data);
    }
}
