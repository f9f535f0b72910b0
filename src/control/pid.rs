// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Generic PID controller for closed-loop control.
//!
//! Works in `no_std` and does not allocate memory. Two update laws share the same state:
//!
//! - [`Pid::compute_positional`] – textbook P + I + D on the current error.
//! - [`Pid::compute_incremental`] – velocity form, accumulates a delta into the held output.
//!
//! Both work per call (no `dt`), so gains are tuned for the caller's fixed loop period.

use crate::config::PidGains;

/// Fraction of the output limit the integrator may hold.
const INTEGRAL_HEADROOM: f32 = 0.8;

/// PID controller with tunable gains and symmetric output clamping.
#[derive(Clone, Debug)]
pub struct Pid {
    /// Proportional gain
    kp: f32,
    /// Integral gain
    ki: f32,
    /// Derivative gain
    kd: f32,

    target: f32,
    /// Output clamp, applied as `[-limit, limit]`
    limit: f32,

    /// Integrator state
    integral: f32,
    /// Error history for the derivative terms
    last_error: f32,
    prev_error: f32,

    /// Held output (incremental law accumulates into this)
    output: f32,
}

impl Pid {
    /// Create a new PID controller with target `0` and limit `±1`.
    pub fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self {
            kp,
            ki,
            kd,

            target: 0.0,
            limit: 1.0,

            integral: 0.0,
            last_error: 0.0,
            prev_error: 0.0,

            output: 0.0,
        }
    }

    /// Build a controller from a gain set, target `0`.
    pub fn from_gains(gains: PidGains) -> Self {
        Self::new(gains.kp, gains.ki, gains.kd).with_output_limit(gains.limit)
    }

    /// Set the symmetric output limit.
    pub fn with_output_limit(mut self, limit: f32) -> Self {
        self.limit = limit.abs();
        self
    }

    pub fn with_target(mut self, target: f32) -> Self {
        self.target = target;
        self
    }

    /// Re-initialize gains, target and limit, clearing all history.
    pub fn init(&mut self, kp: f32, ki: f32, kd: f32, target: f32, limit: f32) {
        *self = Self::new(kp, ki, kd)
            .with_target(target)
            .with_output_limit(limit);
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_gains(&mut self, kp: f32, ki: f32, kd: f32) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    /// Last computed output.
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Reset integrator, error history and held output.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
        self.prev_error = 0.0;
        self.output = 0.0;
    }

    /// Positional law: `kp·e + ki·∫e + kd·Δe`, clamped to `±limit`.
    pub fn compute_positional(&mut self, measurement: f32) -> f32 {
        let error = self.target - measurement;

        let int_max = self.limit * INTEGRAL_HEADROOM;
        self.integral = (self.integral + error).clamp(-int_max, int_max);

        let p = self.kp * error;
        let i = self.ki * self.integral;
        let d = self.kd * (error - self.last_error);

        self.output = self.clamp(p + i + d);
        self.last_error = error;

        self.output
    }

    /// Incremental law. Adds `kp·(e − e₁) + ki·e + kd·(e − 2e₁ + e₂)` to the held output and
    /// returns the accumulated, clamped result. The held output persists across calls until
    /// [`Pid::reset`].
    pub fn compute_incremental(&mut self, measurement: f32) -> f32 {
        let error = self.target - measurement;

        let delta = self.kp * (error - self.last_error)
            + self.ki * error
            + self.kd * (error - 2.0 * self.last_error + self.prev_error);

        self.output = self.clamp(self.output + delta);
        self.prev_error = self.last_error;
        self.last_error = error;

        self.output
    }

    #[inline]
    fn clamp(&self, value: f32) -> f32 {
        value.clamp(-self.limit, self.limit)
    }
}
