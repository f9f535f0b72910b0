// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Camera-guided fine alignment over a floor ring.
//!
//! The camera looks down past the gripper; image x runs along the robot's long axis and image y
//! across it. The x error is fixed first with forward/backward nudges, then y with slides.

use crate::chassis::{MotionCommand, MoveMode};
use crate::config::AlignConfig;

/// Nudge that moves the target toward the reference pixel, or `None` once it sits inside the
/// dead band on both axes.
pub fn correction(
    x: i16,
    y: i16,
    cfg: &AlignConfig,
    speed_mm_s: f32,
    distance_mm: f32,
) -> Option<MotionCommand> {
    let dx = x - cfg.reference_x;
    let dy = y - cfg.reference_y;

    let mode = if dx.abs() > cfg.tolerance_px {
        if dx > 0 {
            MoveMode::Backward
        } else {
            MoveMode::Forward
        }
    } else if dy.abs() > cfg.tolerance_px {
        if dy > 0 {
            MoveMode::SlideRight
        } else {
            MoveMode::SlideLeft
        }
    } else {
        return None;
    };
    Some(MotionCommand::drive(mode, speed_mm_s, distance_mm))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CFG: AlignConfig = AlignConfig::DEFAULT;

    fn mode(x: i16, y: i16) -> Option<MoveMode> {
        correction(x, y, &CFG, 20.0, 10.0).map(|c| c.mode)
    }

    #[test]
    fn inside_dead_band_is_aligned() {
        assert_eq!(mode(160, 140), None);
        assert_eq!(mode(170, 130), None);
        assert_eq!(mode(150, 150), None);
    }

    #[test]
    fn x_is_fixed_before_y() {
        assert_eq!(mode(171, 300), Some(MoveMode::Backward));
        assert_eq!(mode(149, 0), Some(MoveMode::Forward));
    }

    #[test]
    fn y_uses_slides() {
        assert_eq!(mode(160, 151), Some(MoveMode::SlideRight));
        assert_eq!(mode(165, 129), Some(MoveMode::SlideLeft));
    }

    #[test]
    fn nudge_carries_requested_step() {
        let cmd = correction(0, 0, &CFG, 50.0, 15.0).unwrap();
        assert_eq!(cmd, MotionCommand::drive(MoveMode::Forward, 50.0, 15.0));
    }
}
