// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Decoder for the WIT inertial module's 11-byte serial packets.
//!
//! ```text
//! 0x55 | type | d0 d1 | d2 d3 | d4 d5 | d6 d7 | sum
//! ```
//!
//! The data bytes are four little-endian `i16`s, the fourth being temperature (ignored). `sum` is
//! the wrapping sum of the first ten bytes.

pub const HEADER: u8 = 0x55;
pub const TYPE_ACCEL: u8 = 0x51;
pub const TYPE_GYRO: u8 = 0x52;
pub const TYPE_ANGLE: u8 = 0x53;

const PACKET_LEN: usize = 11;

/// Full-scale ranges.
const ACCEL_RANGE_G: f32 = 16.0;
const GYRO_RANGE_DPS: f32 = 2000.0;
const ANGLE_RANGE_DEG: f32 = 180.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ImuFrame {
    /// Linear acceleration, g.
    Accel(Vector3),
    /// Angular rate, °/s.
    Gyro(Vector3),
    /// Euler angles, degrees in `[-180, 180)`. `z` is yaw.
    Angle(Vector3),
}

enum State {
    WaitHeader,
    Collect,
}

pub struct ImuParser {
    state: State,
    buf: [u8; PACKET_LEN],
    len: usize,
}

impl ImuParser {
    pub fn new() -> Self {
        Self {
            state: State::WaitHeader,
            buf: [0; PACKET_LEN],
            len: 0,
        }
    }

    /// Process a single incoming byte. Returns `Some(ImuFrame)` when a valid packet of a known
    /// type completes.
    pub fn push(&mut self, byte: u8) -> Option<ImuFrame> {
        match self.state {
            State::WaitHeader => {
                if byte == HEADER {
                    self.buf[0] = byte;
                    self.len = 1;
                    self.state = State::Collect;
                }
                None
            }
            State::Collect => {
                self.buf[self.len] = byte;
                self.len += 1;
                if self.len < PACKET_LEN {
                    return None;
                }
                self.state = State::WaitHeader;
                self.finish()
            }
        }
    }

    fn finish(&mut self) -> Option<ImuFrame> {
        let sum = self.buf[..10]
            .iter()
            .fold(0u8, |acc, &b| acc.wrapping_add(b));

        if sum != self.buf[10] {
            self.resync();
            return None;
        }

        let frame = match self.buf[1] {
            TYPE_ACCEL => ImuFrame::Accel(self.vector(ACCEL_RANGE_G)),
            TYPE_GYRO => ImuFrame::Gyro(self.vector(GYRO_RANGE_DPS)),
            TYPE_ANGLE => ImuFrame::Angle(self.vector(ANGLE_RANGE_DEG)),
            _ => return None,
        };
        Some(frame)
    }

    /// After a bad checksum, restart from the next header byte already in the buffer.
    fn resync(&mut self) {
        if let Some(pos) = self.buf[1..].iter().position(|&b| b == HEADER) {
            let start = pos + 1;
            self.buf.copy_within(start.., 0);
            self.len = PACKET_LEN - start;
            self.state = State::Collect;
        }
    }

    fn vector(&self, range: f32) -> Vector3 {
        Vector3 {
            x: self.scaled(2, range),
            y: self.scaled(4, range),
            z: self.scaled(6, range),
        }
    }

    #[inline]
    fn scaled(&self, offset: usize, range: f32) -> f32 {
        let raw = i16::from_le_bytes([self.buf[offset], self.buf[offset + 1]]);
        raw as f32 / 32768.0 * range
    }
}

impl Default for ImuParser {
    fn default() -> Self {
        Self::new()
    }
}
