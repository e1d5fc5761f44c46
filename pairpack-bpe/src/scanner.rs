//! Free-code scanning.
//!
//! A byte value that never occurs in a buffer can stand in for a byte pair
//! without ambiguity. [`FreeCodes`] finds those values and hands them out in
//! ascending order.

/// Ascending list of byte values absent from a buffer, with an allocation
/// cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeCodes {
    codes: Vec<u8>,
    next: usize,
}

impl FreeCodes {
    /// Scan a buffer for byte values that do not occur in it.
    pub fn scan(data: &[u8]) -> Self {
        let mut seen = [false; 256];
        for &byte in data {
            seen[byte as usize] = true;
        }

        let codes = (0..=u8::MAX).filter(|&b| !seen[b as usize]).collect();
        Self { codes, next: 0 }
    }

    /// Allocate the lowest code not yet handed out.
    pub fn next_code(&mut self) -> Option<u8> {
        let code = self.codes.get(self.next).copied()?;
        self.next += 1;
        Some(code)
    }

    /// Number of codes still available.
    pub fn remaining(&self) -> usize {
        self.codes.len() - self.next
    }

    /// Whether no codes are left to allocate.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// All free codes found by the scan, allocated or not.
    pub fn as_slice(&self) -> &[u8] {
        &self.codes
    }
}

/// Byte values absent from `data`, ascending.
pub fn free_codes(data: &[u8]) -> Vec<u8> {
    FreeCodes::scan(data).codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_frees_everything() {
        let codes = FreeCodes::scan(b"");
        assert_eq!(codes.remaining(), 256);
        assert_eq!(codes.as_slice()[0], 0x00);
        assert_eq!(codes.as_slice()[255], 0xFF);
    }

    #[test]
    fn test_scan_excludes_present_bytes() {
        let codes = free_codes(b"\x00\x02\xFF");
        assert_eq!(codes.len(), 253);
        assert_eq!(&codes[..3], &[0x01, 0x03, 0x04]);
        assert!(!codes.contains(&0xFF));
    }

    #[test]
    fn test_all_bytes_present() {
        let data: Vec<u8> = (0..=255).collect();
        let codes = FreeCodes::scan(&data);
        assert!(codes.is_empty());
        assert_eq!(free_codes(&data), Vec::<u8>::new());
    }

    #[test]
    fn test_allocation_is_ascending() {
        let mut codes = FreeCodes::scan(&[0x00, 0x01, 0x03]);
        assert_eq!(codes.next_code(), Some(0x02));
        assert_eq!(codes.next_code(), Some(0x04));
        assert_eq!(codes.remaining(), 251);
    }

    #[test]
    fn test_allocation_exhausts() {
        let data: Vec<u8> = (1..=255).collect();
        let mut codes = FreeCodes::scan(&data);
        assert_eq!(codes.next_code(), Some(0x00));
        assert_eq!(codes.next_code(), None);
        assert!(codes.is_empty());
    }
}
