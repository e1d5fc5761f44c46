//! Multi-pass byte-pair decoder (expansion).

use crate::dictionary::PairDictionary;

/// Multi-pass byte-pair decoder.
///
/// A pass's codes are only meaningful once every later pass has been undone,
/// so dictionaries are peeled off newest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiPassExpander;

impl MultiPassExpander {
    /// Restore a buffer from its substituted content and its dictionaries
    /// (pass 0 first, as produced by the encoder).
    pub fn expand(content: &[u8], dictionaries: &[PairDictionary]) -> Vec<u8> {
        let mut current = content.to_vec();
        for dictionary in dictionaries.iter().rev() {
            current = dictionary.expand(&current);
        }
        current
    }

    /// Restore a buffer whose dictionaries are listed newest pass first, the
    /// order they are stored in a package.
    pub fn expand_newest_first(content: &[u8], dictionaries: &[PairDictionary]) -> Vec<u8> {
        let mut current = content.to_vec();
        for dictionary in dictionaries {
            current = dictionary.expand(&current);
        }
        current
    }

    /// Length [`expand_newest_first`](Self::expand_newest_first) would
    /// produce, computed without materializing the buffer.
    pub fn expanded_len_newest_first(content: &[u8], dictionaries: &[PairDictionary]) -> u64 {
        // lengths[b]: bytes that `b` becomes once every remaining step runs.
        let mut lengths = [1u64; 256];
        for dictionary in dictionaries.iter().rev() {
            for record in dictionary.records().iter().rev() {
                let [hi, lo] = record.pair;
                lengths[record.code as usize] =
                    lengths[hi as usize].saturating_add(lengths[lo as usize]);
            }
        }
        content
            .iter()
            .fold(0u64, |acc, &b| acc.saturating_add(lengths[b as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BpeConfig;
    use crate::encoder::MultiPassCompressor;

    #[test]
    fn test_no_dictionaries_is_identity() {
        assert_eq!(MultiPassExpander::expand(b"plain", &[]), b"plain");
        assert_eq!(MultiPassExpander::expand(b"", &[]), b"");
    }

    #[test]
    fn test_newest_pass_is_applied_first() {
        // Pass 0: 0x00 -> "AB"; pass 1: 0x01 -> 0x00 0x00.
        let mut pass0 = PairDictionary::new();
        pass0.push(0x00, *b"AB");
        let mut pass1 = PairDictionary::new();
        pass1.push(0x01, [0x00, 0x00]);

        let restored = MultiPassExpander::expand(&[0x01, 0x01], &[pass0.clone(), pass1.clone()]);
        assert_eq!(restored, b"ABABABAB");

        // Applying the oldest pass first leaves codes behind.
        let wrong = MultiPassExpander::expand_newest_first(&[0x01, 0x01], &[pass0, pass1]);
        assert_ne!(wrong, b"ABABABAB");
    }

    #[test]
    fn test_expanded_len_matches_expansion() {
        let data = b"she sells sea shells by the sea shore, the shells she sells".to_vec();
        let entry = MultiPassCompressor::new(BpeConfig::new(5)).compress(&data);
        let mut newest_first = entry.dictionaries.clone();
        newest_first.reverse();

        assert_eq!(
            MultiPassExpander::expanded_len_newest_first(&entry.content, &newest_first),
            data.len() as u64
        );
    }

    #[test]
    fn test_expanded_len_self_referencing_dictionary() {
        // 0x00 -> 0x00 'x', then 0x00 -> "ab": record-by-record gives "abx".
        let mut dict = PairDictionary::new();
        dict.push(0x00, [0x00, b'x']);
        dict.push(0x00, *b"ab");

        let expanded = MultiPassExpander::expand_newest_first(&[0x00], &[dict.clone()]);
        assert_eq!(expanded, b"abx");
        assert_eq!(
            MultiPassExpander::expanded_len_newest_first(&[0x00], &[dict]),
            3
        );
    }

    #[test]
    fn test_orders_agree() {
        let data = b"the cat sat on the mat, the cat sat on the hat".to_vec();
        let entry = MultiPassCompressor::new(BpeConfig::new(4)).compress(&data);

        let mut newest_first = entry.dictionaries.clone();
        newest_first.reverse();

        assert_eq!(MultiPassExpander::expand(&entry.content, &entry.dictionaries), data);
        assert_eq!(
            MultiPassExpander::expand_newest_first(&entry.content, &newest_first),
            data
        );
    }
}
