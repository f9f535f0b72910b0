// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Mecanum wheel mixing.
//!
//! Wheel layout seen from above, rollers forming an X:
//!
//! ```text
//!   FL(m1) \\   // FR(m2)
//!   RL(m3) //   \\ RR(m4)
//! ```
//!
//! Positive wheel speed drives that wheel forward. The heading correction is added to the right
//! side and removed from the left side, so a positive correction turns the chassis left.

use super::command::MoveMode;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Wheel {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl Wheel {
    pub const ALL: [Wheel; 4] = [
        Wheel::FrontLeft,
        Wheel::FrontRight,
        Wheel::RearLeft,
        Wheel::RearRight,
    ];

    /// Stepper channel index (m1..m4 → 0..3).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Signed speed command per wheel, already clamped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WheelSpeeds {
    pub front_left: i32,
    pub front_right: i32,
    pub rear_left: i32,
    pub rear_right: i32,
}

impl WheelSpeeds {
    pub const ZERO: Self = Self {
        front_left: 0,
        front_right: 0,
        rear_left: 0,
        rear_right: 0,
    };

    fn clamped(fl: f32, fr: f32, rl: f32, rr: f32, limit: i32) -> Self {
        let lim = limit as f32;
        let c = |v: f32| v.clamp(-lim, lim) as i32;
        Self {
            front_left: c(fl),
            front_right: c(fr),
            rear_left: c(rl),
            rear_right: c(rr),
        }
    }

    pub fn get(&self, wheel: Wheel) -> i32 {
        match wheel {
            Wheel::FrontLeft => self.front_left,
            Wheel::FrontRight => self.front_right,
            Wheel::RearLeft => self.rear_left,
            Wheel::RearRight => self.rear_right,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Straight travel. Negative `speed` drives backwards; the correction sign is unchanged.
pub fn straight(speed: f32, correction: f32, limit: i32) -> WheelSpeeds {
    let left = speed - correction;
    let right = speed + correction;
    WheelSpeeds::clamped(left, right, left, right, limit)
}

/// Sideways travel. Positive `speed` slides right.
pub fn slide(speed: f32, limit: i32) -> WheelSpeeds {
    WheelSpeeds::clamped(speed, -speed, -speed, speed, limit)
}

/// Rotation in place. Positive `rate` spins left (counter-clockwise).
pub fn spin(rate: f32, limit: i32) -> WheelSpeeds {
    WheelSpeeds::clamped(-rate, rate, -rate, rate, limit)
}

/// Mix a non-negative scaled speed and a heading correction for `mode`.
///
/// For [`MoveMode::TurnAbsolute`] only `correction` is used, as the spin rate.
pub fn mix(mode: MoveMode, speed: f32, correction: f32, limit: i32) -> WheelSpeeds {
    match mode {
        MoveMode::Stop => WheelSpeeds::ZERO,
        MoveMode::Forward => straight(speed, correction, limit),
        MoveMode::Backward => straight(-speed, correction, limit),
        MoveMode::SlideLeft => slide(-speed, limit),
        MoveMode::SlideRight => slide(speed, limit),
        MoveMode::TurnLeft => spin(speed, limit),
        MoveMode::TurnRight => spin(-speed, limit),
        MoveMode::TurnAbsolute => spin(correction, limit),
    }
}
