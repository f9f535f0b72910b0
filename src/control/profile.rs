// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Trapezoidal speed profile for distance moves.

use micromath::F32Ext;

use crate::config::MotionConfig;

/// Acceleration-limited ramp plus a braking boundary `v = sqrt(2·a·d)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpeedProfile {
    accel: f32,
    step: f32,
    floor_distance: f32,
    floor_speed: f32,
}

impl SpeedProfile {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            accel: config.accel_mm_s2,
            step: config.accel_mm_s2 * config.tick_s(),
            floor_distance: config.floor_distance_mm,
            floor_speed: config.floor_speed_mm_s,
        }
    }

    /// Highest speed from which the chassis can still stop within `remaining_mm`.
    pub fn boundary(&self, remaining_mm: f32) -> f32 {
        if remaining_mm <= self.floor_distance {
            self.floor_speed
        } else {
            (2.0 * self.accel * remaining_mm).sqrt()
        }
    }

    /// Move `current` one tick's worth of acceleration towards `target`.
    pub fn ramp(&self, current: f32, target: f32) -> f32 {
        step_towards(current, target, self.step)
    }

    /// Speed change allowed per tick, mm/s.
    pub fn step(&self) -> f32 {
        self.step
    }
}

/// Move `current` towards `target` by at most `step`, never overshooting.
pub fn step_towards(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else if current > target {
        (current - step).max(target)
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn boundary_floor_and_growth() {
        let p = SpeedProfile::new(&MotionConfig::DEFAULT);
        assert_eq!(p.boundary(0.0), 1.0);
        assert_eq!(p.boundary(0.5), 1.0);
        assert_relative_eq!(p.boundary(200.0), 400.0, max_relative = 0.01);

        let mut prev = p.boundary(1.0);
        for d in [2.0, 10.0, 50.0, 300.0, 2000.0] {
            let v = p.boundary(d);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn ramp_moves_one_step_per_tick() {
        let p = SpeedProfile::new(&MotionConfig::DEFAULT);
        assert_relative_eq!(p.step(), 8.0);
        assert_relative_eq!(p.ramp(0.0, 300.0), 8.0);
        assert_relative_eq!(p.ramp(296.0, 300.0), 300.0);
        assert_relative_eq!(p.ramp(100.0, 0.0), 92.0);
        assert_relative_eq!(p.ramp(3.0, 0.0), 0.0);
    }
}
