// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motion commands accepted by the chassis.

/// What the chassis is asked to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveMode {
    Stop,
    Forward,
    Backward,
    SlideLeft,
    SlideRight,
    /// Open-loop spin counter-clockwise.
    TurnLeft,
    /// Open-loop spin clockwise.
    TurnRight,
    /// Closed-loop turn to an absolute heading.
    TurnAbsolute,
}

impl MoveMode {
    /// Modes that use the wheel step counters as odometry.
    pub fn tracks_distance(self) -> bool {
        !matches!(self, MoveMode::Stop | MoveMode::TurnAbsolute)
    }
}

/// One entry of the chassis command mailbox.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionCommand {
    pub mode: MoveMode,
    /// Cruise speed, mm/s. Always non-negative.
    pub speed_mm_s: f32,
    /// Distance in mm for translation modes (`0` = unbounded), heading in degrees for
    /// [`MoveMode::TurnAbsolute`].
    pub target: f32,
}

impl MotionCommand {
    pub const STOP: Self = Self {
        mode: MoveMode::Stop,
        speed_mm_s: 0.0,
        target: 0.0,
    };

    /// Translate or spin. Signs are dropped, direction comes from `mode` only.
    pub fn drive(mode: MoveMode, speed_mm_s: f32, distance_mm: f32) -> Self {
        Self {
            mode,
            speed_mm_s: speed_mm_s.abs(),
            target: distance_mm.abs(),
        }
    }

    /// Rotate in place to `angle_deg` relative to the heading zero.
    pub fn turn_absolute(angle_deg: f32) -> Self {
        Self {
            mode: MoveMode::TurnAbsolute,
            speed_mm_s: 0.0,
            target: angle_deg,
        }
    }
}
