//! Package byte layout.
//!
//! ```text
//! entry     := type(2) nameLen(2) name [file-body]
//! file-body := contentLen(4) content dictCount(1) { dictLen(2) dictBytes }*dictCount
//! dictBytes := { code(1) pairHi(1) pairLo(1) }*
//! package   := entry* checksum(4)
//! ```
//!
//! All integers are big-endian and fixed width. `file-body` follows only
//! file entries. Dictionaries are stored newest pass first. The checksum is
//! the byte length of everything before it.

use pairpack_bpe::{CompressedEntry, PairDictionary};
use pairpack_core::error::{PairPackError, Result};

/// Type tag of a file entry.
pub const FILE_TAG: u16 = 0x0A00;

/// Type tag of a directory entry.
pub const DIRECTORY_TAG: u16 = 0x0A01;

/// Width of the trailing checksum field.
pub const CHECKSUM_LEN: usize = 4;

fn put_u8(out: &mut Vec<u8>, field: &'static str, value: usize) -> Result<()> {
    let value = u8::try_from(value)
        .map_err(|_| PairPackError::field_overflow(field, value as u64, u8::MAX as u64))?;
    out.push(value);
    Ok(())
}

fn put_u16(out: &mut Vec<u8>, field: &'static str, value: usize) -> Result<()> {
    let value = u16::try_from(value)
        .map_err(|_| PairPackError::field_overflow(field, value as u64, u16::MAX as u64))?;
    out.extend_from_slice(&value.to_be_bytes());
    Ok(())
}

fn put_u32(out: &mut Vec<u8>, field: &'static str, value: u64) -> Result<()> {
    let value = u32::try_from(value)
        .map_err(|_| PairPackError::field_overflow(field, value, u32::MAX as u64))?;
    out.extend_from_slice(&value.to_be_bytes());
    Ok(())
}

fn put_header(out: &mut Vec<u8>, tag: u16, name: &str) -> Result<()> {
    out.extend_from_slice(&tag.to_be_bytes());
    put_u16(out, "name length", name.len())?;
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

/// Serialize a directory entry.
pub fn encode_directory(name: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(4 + name.len());
    put_header(&mut out, DIRECTORY_TAG, name)?;
    Ok(out)
}

/// Serialize a file entry from its compressed form.
pub fn encode_file(name: &str, entry: &CompressedEntry) -> Result<Vec<u8>> {
    let dict_bytes: usize = entry
        .dictionaries
        .iter()
        .map(|d| 2 + d.byte_len())
        .sum();
    let mut out = Vec::with_capacity(4 + name.len() + 5 + entry.content.len() + dict_bytes);

    put_header(&mut out, FILE_TAG, name)?;
    put_u32(&mut out, "content length", entry.content.len() as u64)?;
    out.extend_from_slice(&entry.content);
    put_u8(&mut out, "dictionary count", entry.dictionaries.len())?;

    for dictionary in entry.dictionaries.iter().rev() {
        put_u16(&mut out, "dictionary length", dictionary.byte_len())?;
        dictionary.write_to(&mut out);
    }

    Ok(out)
}

/// Encode the trailing checksum for a body of `body_len` bytes.
pub fn encode_checksum(body_len: u64) -> Result<[u8; CHECKSUM_LEN]> {
    let value = u32::try_from(body_len)
        .map_err(|_| PairPackError::field_overflow("checksum", body_len, u32::MAX as u64))?;
    Ok(value.to_be_bytes())
}

/// Verify the trailing checksum and return the body (package minus checksum).
pub fn split_checksum(package: &[u8]) -> Result<&[u8]> {
    if package.len() < CHECKSUM_LEN {
        return Err(PairPackError::truncated(
            0,
            "checksum",
            CHECKSUM_LEN,
            package.len(),
        ));
    }

    let (body, tail) = package.split_at(package.len() - CHECKSUM_LEN);
    let declared = u32::from_be_bytes([tail[0], tail[1], tail[2], tail[3]]) as u64;
    let actual = body.len() as u64;
    if declared != actual {
        return Err(PairPackError::checksum_mismatch(declared, actual));
    }

    Ok(body)
}

/// Bounds-checked big-endian reader over a package body.
#[derive(Debug)]
pub struct FieldCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldCursor<'a> {
    /// Create a cursor at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the package.
    pub fn position(&self) -> u64 {
        self.pos as u64
    }

    /// Whether the cursor has reached the checksum boundary.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Bytes left before the end.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take the next `len` bytes.
    pub fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(PairPackError::truncated(
                self.position(),
                field,
                len,
                self.remaining(),
            ));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read a one-byte field.
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.take(1, field)?[0])
    }

    /// Read a two-byte big-endian field.
    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        let b = self.take(2, field)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Read a four-byte big-endian field.
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        let b = self.take(4, field)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read one length-prefixed dictionary.
    pub fn read_dictionary(&mut self) -> Result<PairDictionary> {
        let len = self.read_u16("dictionary length")? as usize;
        let offset = self.position();
        let bytes = self.take(len, "dictionary")?;
        PairDictionary::from_bytes(bytes, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairpack_bpe::{BpeConfig, compress};

    #[test]
    fn test_directory_layout() {
        let bytes = encode_directory("./docs").unwrap();
        assert_eq!(&bytes[..4], &[0x0A, 0x01, 0x00, 0x06]);
        assert_eq!(&bytes[4..], b"./docs");
    }

    #[test]
    fn test_file_layout_aaaa() {
        let entry = compress(b"AAAA", BpeConfig::new(1));
        let bytes = encode_file("a", &entry).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x0A, 0x00, // file tag
                0x00, 0x01, b'a', // name
                0x00, 0x00, 0x00, 0x02, 0x00, 0x00, // content
                0x01, // one dictionary
                0x00, 0x03, 0x00, 0x41, 0x41, // dictionary
            ]
        );
    }

    #[test]
    fn test_dictionaries_stored_newest_first() {
        let entry = compress(&[b'Q'; 8], BpeConfig::new(2));
        assert_eq!(entry.passes(), 2);
        let bytes = encode_file("q", &entry).unwrap();

        // content: 2 bytes of code 0x01; then pass 1 (0x01 -> 00 00) first.
        let tail = &bytes[5 + 4 + 2..];
        assert_eq!(tail[0], 2);
        assert_eq!(&tail[1..6], &[0x00, 0x03, 0x01, 0x00, 0x00]);
        assert_eq!(&tail[6..11], &[0x00, 0x03, 0x00, b'Q', b'Q']);
    }

    #[test]
    fn test_name_too_long() {
        let name = "n".repeat(70_000);
        let err = encode_directory(&name).unwrap_err();
        assert!(matches!(
            err,
            PairPackError::FieldOverflow {
                field: "name length",
                ..
            }
        ));
    }

    #[test]
    fn test_checksum_roundtrip() {
        let mut package = vec![1, 2, 3];
        package.extend_from_slice(&encode_checksum(3).unwrap());
        assert_eq!(split_checksum(&package).unwrap(), &[1, 2, 3]);

        package[6] ^= 1;
        assert!(matches!(
            split_checksum(&package),
            Err(PairPackError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_checksum_too_short() {
        assert!(matches!(
            split_checksum(&[0, 0]),
            Err(PairPackError::Truncated { .. })
        ));
    }

    #[test]
    fn test_cursor_bounds() {
        let mut cursor = FieldCursor::new(&[0x00, 0x05, 0xFF]);
        assert_eq!(cursor.read_u16("a").unwrap(), 5);
        assert_eq!(cursor.position(), 2);
        let err = cursor.read_u32("content length").unwrap_err();
        assert!(matches!(
            err,
            PairPackError::Truncated {
                offset: 2,
                needed: 4,
                available: 1,
                ..
            }
        ));
    }
}
