// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Continuous heading estimation.
//!
//! The IMU reports yaw in `(-180, 180]`. Crossing ±180° makes the raw value jump by ~360°, which a
//! heading-hold loop would see as a huge error. [`ContinuousHeading`] counts those wraps and
//! produces an unbounded angle, plus a re-zeroable relative heading built on top of it.

use crate::config::HeadingConfig;

/// One heading sample handed to the motion loop.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HeadingSnapshot {
    /// Continuous heading minus the zero reference captured at the last reset, degrees.
    pub relative_deg: f32,
    /// Raw yaw plus 360° per counted wrap, degrees.
    pub continuous_deg: f32,
}

impl HeadingSnapshot {
    pub const ZERO: Self = Self {
        relative_deg: 0.0,
        continuous_deg: 0.0,
    };
}

/// Wrap-counting yaw unwrapper.
#[derive(Clone, Debug)]
pub struct ContinuousHeading {
    wrap_threshold: f32,
    armed: bool,
    last_raw: f32,
    wrap_count: i32,
    zero_reference: f32,
}

impl ContinuousHeading {
    pub fn new(config: &HeadingConfig) -> Self {
        Self {
            wrap_threshold: config.wrap_threshold_deg,
            armed: false,
            last_raw: 0.0,
            wrap_count: 0,
            zero_reference: 0.0,
        }
    }

    /// Disarm. The next sample becomes the new zero reference and the wrap count restarts.
    pub fn reset(&mut self) {
        self.armed = false;
        self.wrap_count = 0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn wrap_count(&self) -> i32 {
        self.wrap_count
    }

    /// Feed one raw yaw sample in degrees.
    pub fn update(&mut self, raw_deg: f32) -> HeadingSnapshot {
        if !self.armed {
            self.armed = true;
            self.last_raw = raw_deg;
            self.wrap_count = 0;
            self.zero_reference = raw_deg;
        } else {
            let jump = raw_deg - self.last_raw;
            if jump > self.wrap_threshold {
                self.wrap_count -= 1;
            } else if jump < -self.wrap_threshold {
                self.wrap_count += 1;
            }
            self.last_raw = raw_deg;
        }

        let continuous = raw_deg + 360.0 * self.wrap_count as f32;
        HeadingSnapshot {
            relative_deg: continuous - self.zero_reference,
            continuous_deg: continuous,
        }
    }
}

impl Default for ContinuousHeading {
    fn default() -> Self {
        Self::new(&HeadingConfig::DEFAULT)
    }
}

/// Map any angle into `(-180, 180]`.
pub fn normalize_deg(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Signed shortest rotation from `current` to `target`, in `(-180, 180]`.
#[inline]
pub fn shortest_error_deg(target: f32, current: f32) -> f32 {
    normalize_deg(target - current)
}
