// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Decoder for camera detection frames.
//!
//! Frame: `'a' I X X X Y Y Y 'c'`, nine ASCII bytes, where `I` is the target id digit and
//! `XXX`/`YYY` the zero-padded pixel coordinates of its centre.

pub const FRAME_START: u8 = b'a';
pub const FRAME_END: u8 = b'c';

const PAYLOAD_LEN: usize = 7;

/// One decoded detection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Detection {
    pub target_id: u8,
    pub x: u16,
    pub y: u16,
}

/// Latest detection as published to the rest of the firmware.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VisionRecord {
    pub target_id: u8,
    pub x: u16,
    pub y: u16,
    pub found: bool,
    /// Increments with every decoded frame, so consumers can tell fresh from stale.
    pub sequence: u32,
}

pub struct VisionParser {
    payload: [u8; PAYLOAD_LEN],
    len: usize,
    in_frame: bool,
}

impl VisionParser {
    pub fn new() -> Self {
        Self {
            payload: [0; PAYLOAD_LEN],
            len: 0,
            in_frame: false,
        }
    }

    /// Process a single incoming byte. Returns `Some(Detection)` when a well-formed frame closes.
    pub fn push(&mut self, byte: u8) -> Option<Detection> {
        if byte == FRAME_START {
            self.in_frame = true;
            self.len = 0;
            return None;
        }
        if !self.in_frame {
            return None;
        }

        if self.len == PAYLOAD_LEN {
            self.in_frame = false;
            return if byte == FRAME_END {
                self.decode()
            } else {
                None
            };
        }

        if !byte.is_ascii_digit() {
            self.in_frame = false;
            return None;
        }
        self.payload[self.len] = byte - b'0';
        self.len += 1;
        None
    }

    fn decode(&self) -> Option<Detection> {
        let p = &self.payload;
        let number = |d: &[u8]| d.iter().fold(0u16, |acc, &v| acc * 10 + v as u16);
        Some(Detection {
            target_id: p[0],
            x: number(&p[1..4]),
            y: number(&p[4..7]),
        })
    }
}

impl Default for VisionParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(parser: &mut VisionParser, bytes: &[u8]) -> Option<Detection> {
        bytes.iter().filter_map(|&b| parser.push(b)).last()
    }

    #[test]
    fn decodes_frame() {
        let mut p = VisionParser::new();
        assert_eq!(
            feed(&mut p, b"a4158143c"),
            Some(Detection {
                target_id: 4,
                x: 158,
                y: 143
            })
        );
    }

    #[test]
    fn skips_noise_between_frames() {
        let mut p = VisionParser::new();
        let got = feed(&mut p, b"\r\nxx a1\x00a2001002c zz");
        assert_eq!(
            got,
            Some(Detection {
                target_id: 2,
                x: 1,
                y: 2
            })
        );
    }

    #[test]
    fn rejects_bad_terminator_and_non_digits() {
        let mut p = VisionParser::new();
        assert_eq!(feed(&mut p, b"a1160140d"), None);
        assert_eq!(feed(&mut p, b"a1x60140c"), None);
        assert_eq!(feed(&mut p, b"a11601400c"), None);
    }
}
