// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line framing for the code scanner.
//!
//! The scanner sends each decoded code as ASCII followed by CR and/or LF. Only the first
//! [`SCAN_TOKEN_LEN`] bytes of a line are kept, and lines shorter than three bytes are noise.

use heapless::Vec;

pub const SCAN_TOKEN_LEN: usize = 15;
const MIN_TOKEN_LEN: usize = 3;

pub type ScanToken = Vec<u8, SCAN_TOKEN_LEN>;

#[derive(Default)]
pub struct ScanFramer {
    line: ScanToken,
}

impl ScanFramer {
    pub fn new() -> Self {
        Self { line: Vec::new() }
    }

    /// Process a single incoming byte. Returns the finished token on a line terminator.
    pub fn push(&mut self, byte: u8) -> Option<ScanToken> {
        match byte {
            b'\r' | b'\n' => self.flush(),
            _ => {
                // Bytes past capacity are dropped, the token is truncated.
                let _ = self.line.push(byte);
                None
            }
        }
    }

    /// Close the current line, e.g. on a receiver idle condition.
    pub fn flush(&mut self) -> Option<ScanToken> {
        let line = core::mem::take(&mut self.line);
        (line.len() >= MIN_TOKEN_LEN).then_some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_lines() {
        let mut f = ScanFramer::new();
        let tokens: std::vec::Vec<ScanToken> =
            b"123+231\r\n".iter().filter_map(|&b| f.push(b)).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].as_slice(), b"123+231");
    }

    #[test]
    fn drops_short_lines() {
        let mut f = ScanFramer::new();
        assert!(b"12\n\n".iter().filter_map(|&b| f.push(b)).next().is_none());
    }

    #[test]
    fn truncates_long_lines() {
        let mut f = ScanFramer::new();
        let token = b"0123456789abcdefghij\n"
            .iter()
            .filter_map(|&b| f.push(b))
            .last();
        assert_eq!(token.as_deref(), Some(&b"0123456789abcde"[..]));
    }

    #[test]
    fn flush_emits_pending_line() {
        let mut f = ScanFramer::new();
        for &b in b"312+123" {
            assert!(f.push(b).is_none());
        }
        assert_eq!(f.flush().as_deref(), Some(&b"312+123"[..]));
        assert!(f.flush().is_none());
    }
}
