// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Color plan decoded from the scanned task code.
//!
//! The code reads `ABC+DEF`: three color digits for the first batch, a separator, and three for
//! the second. Only the digit positions are checked; the separator may be any byte.

use core::fmt;

/// Item color, numbered as the camera reports it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Red = 1,
    Green = 2,
    Blue = 3,
}

impl Color {
    pub fn from_digit(byte: u8) -> Option<Self> {
        match byte {
            b'1' => Some(Color::Red),
            b'2' => Some(Color::Green),
            b'3' => Some(Color::Blue),
            _ => None,
        }
    }

    /// Camera id of the item itself.
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Camera id of the matching floor ring.
    #[inline]
    pub fn ring_id(self, offset: u8) -> u8 {
        self.id() + offset
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Batch {
    First,
    Second,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanError {
    /// Token shorter than the seven bytes a plan needs.
    TooShort(usize),
    /// A digit position holds something other than `1`, `2` or `3`.
    BadSymbol { index: usize, byte: u8 },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::TooShort(len) => write!(f, "token too short ({len} bytes)"),
            ScanError::BadSymbol { index, byte } => {
                write!(f, "bad color symbol {byte:#04x} at {index}")
            }
        }
    }
}

const FIRST_DIGITS: [usize; 3] = [0, 1, 2];
const SECOND_DIGITS: [usize; 3] = [4, 5, 6];

/// Item colors in pick order, for both batches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MissionPlan {
    pub first: [Color; 3],
    pub second: [Color; 3],
}

impl MissionPlan {
    /// Placeholder used before any code is scanned.
    pub const DEFAULT: Self = Self {
        first: [Color::Red, Color::Green, Color::Blue],
        second: [Color::Red, Color::Green, Color::Blue],
    };

    pub fn parse(token: &[u8]) -> Result<Self, ScanError> {
        if token.len() < 7 {
            return Err(ScanError::TooShort(token.len()));
        }
        Ok(Self {
            first: colors(token, FIRST_DIGITS)?,
            second: colors(token, SECOND_DIGITS)?,
        })
    }

    pub fn batch(&self, batch: Batch) -> &[Color; 3] {
        match batch {
            Batch::First => &self.first,
            Batch::Second => &self.second,
        }
    }
}

impl Default for MissionPlan {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn colors(token: &[u8], positions: [usize; 3]) -> Result<[Color; 3], ScanError> {
    let mut out = [Color::Red; 3];
    for (slot, index) in out.iter_mut().zip(positions) {
        let byte = token[index];
        *slot = Color::from_digit(byte).ok_or(ScanError::BadSymbol { index, byte })?;
    }
    Ok(out)
}
