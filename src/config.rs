// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Tunables for the chassis, heading estimator, arm and mission.
//!
//! Every struct has a `DEFAULT` constant so it can be built in `const` context (the board keeps
//! its configuration in statics) plus `with_*` builder methods for the knobs that get retuned.

/// Gains and symmetric output limit for one PID loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub limit: f32,
}

impl PidGains {
    pub const fn new(kp: f32, ki: f32, kd: f32, limit: f32) -> Self {
        Self { kp, ki, kd, limit }
    }
}

/// Motion control loop parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionConfig {
    /// Control period in milliseconds.
    pub tick_ms: u32,
    /// Acceleration and deceleration limit, mm/s².
    pub accel_mm_s2: f32,
    /// Wheel step pulses per millimetre of travel.
    pub pulses_per_mm: f32,
    /// Converts mm/s into wheel speed command units.
    pub speed_scale: f32,
    /// Remaining distance reported for unbounded moves (`distance == 0`).
    pub cruise_distance_mm: f32,
    /// At or below this remaining distance the braking boundary collapses to `floor_speed_mm_s`.
    pub floor_distance_mm: f32,
    pub floor_speed_mm_s: f32,
    /// A bounded move finishes once both remaining distance and speed fall to these.
    pub arrive_distance_mm: f32,
    pub arrive_speed_mm_s: f32,
    /// Absolute turns finish inside this heading error, degrees.
    pub turn_threshold_deg: f32,
    /// Magnitude clamp for every wheel command.
    pub wheel_limit: i32,
    /// Heading hold while driving straight.
    pub heading_lock: PidGains,
    /// Closed-loop absolute turn.
    pub turn: PidGains,
}

impl MotionConfig {
    pub const DEFAULT: Self = Self {
        tick_ms: 20,
        accel_mm_s2: 400.0,
        // 200 full steps * 16 microsteps over an 80 mm wheel
        pulses_per_mm: 12.73,
        speed_scale: 5.0,
        cruise_distance_mm: 999_999.0,
        floor_distance_mm: 0.5,
        floor_speed_mm_s: 1.0,
        arrive_distance_mm: 0.1,
        arrive_speed_mm_s: 5.0,
        turn_threshold_deg: 1.0,
        wheel_limit: 10_000,
        heading_lock: PidGains::new(8.0, 0.0, 2.0, 200.0),
        turn: PidGains::new(6.0, 0.0, 1.5, 300.0),
    };

    /// Control period in seconds.
    #[inline]
    pub fn tick_s(&self) -> f32 {
        self.tick_ms as f32 / 1000.0
    }

    /// Step frequency per unit of wheel speed command, so that a command of
    /// `v * speed_scale` moves the wheel at `v` mm/s.
    #[inline]
    pub fn step_hz_per_unit(&self) -> f32 {
        self.pulses_per_mm / self.speed_scale
    }

    pub fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_ms = tick_ms.max(1);
        self
    }

    pub fn with_accel(mut self, accel_mm_s2: f32) -> Self {
        self.accel_mm_s2 = accel_mm_s2;
        self
    }

    pub fn with_pulses_per_mm(mut self, pulses_per_mm: f32) -> Self {
        self.pulses_per_mm = pulses_per_mm;
        self
    }

    pub fn with_speed_scale(mut self, speed_scale: f32) -> Self {
        self.speed_scale = speed_scale;
        self
    }

    pub fn with_turn_threshold(mut self, degrees: f32) -> Self {
        self.turn_threshold_deg = degrees;
        self
    }

    pub fn with_heading_lock(mut self, gains: PidGains) -> Self {
        self.heading_lock = gains;
        self
    }

    pub fn with_turn_gains(mut self, gains: PidGains) -> Self {
        self.turn = gains;
        self
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Continuous heading estimator parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeadingConfig {
    /// A jump between consecutive raw yaw samples larger than this counts as a ±180° wrap.
    pub wrap_threshold_deg: f32,
}

impl HeadingConfig {
    pub const DEFAULT: Self = Self {
        wrap_threshold_deg: 300.0,
    };
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Camera-guided fine alignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlignConfig {
    /// Pixel coordinate of the target when the gripper sits over it.
    pub reference_x: i16,
    pub reference_y: i16,
    /// Dead band around the reference, pixels.
    pub tolerance_px: i16,
}

impl AlignConfig {
    pub const DEFAULT: Self = Self {
        reference_x: 160,
        reference_y: 140,
        tolerance_px: 10,
    };
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Mission sequencer parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MissionConfig {
    /// Upper bound on any single wait. `None` waits forever.
    pub wait_timeout_ms: Option<u32>,
    /// Ring marker id = color id + this offset.
    pub ring_id_offset: u8,
    /// Pause after each alignment nudge before looking again.
    pub align_settle_ms: u32,
    pub align: AlignConfig,
}

impl MissionConfig {
    pub const DEFAULT: Self = Self {
        wait_timeout_ms: None,
        ring_id_offset: 3,
        align_settle_ms: 20,
        align: AlignConfig::DEFAULT,
    };

    pub fn with_wait_timeout(mut self, timeout_ms: u32) -> Self {
        self.wait_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_align(mut self, align: AlignConfig) -> Self {
        self.align = align;
        self
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Lift travel and servo set points for the arm.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArmConfig {
    /// Lift stepper speed command while travelling.
    pub lift_speed: i32,
    /// Period for polling lift progress, ms.
    pub lift_poll_ms: u32,
    /// Lift travel in steps down to each working height.
    pub depth_plate: i32,
    pub depth_car: i32,
    pub depth_stack: i32,
    pub depth_floor: i32,
    pub claw_open_deg: f32,
    pub claw_close_deg: f32,
    pub base_front_deg: f32,
    pub base_car_deg: f32,
    /// Turntable angle for carrier slots 1, 2 and 3.
    pub turntable_slots_deg: [f32; 3],
}

impl ArmConfig {
    pub const DEFAULT: Self = Self {
        lift_speed: 5000,
        lift_poll_ms: 10,
        depth_plate: 8000,
        depth_car: 4000,
        depth_stack: 10_000,
        depth_floor: 15_000,
        claw_open_deg: 10.0,
        claw_close_deg: 60.0,
        base_front_deg: 0.0,
        base_car_deg: 98.0,
        turntable_slots_deg: [17.0, 77.0, 137.0],
    };

    /// Turntable angle for a 1-based carrier slot. Unknown slots fall back to slot 1.
    pub fn turntable_angle(&self, slot: u8) -> f32 {
        match slot {
            1..=3 => self.turntable_slots_deg[slot as usize - 1],
            _ => self.turntable_slots_deg[0],
        }
    }
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_slot_falls_back_to_first() {
        let cfg = ArmConfig::DEFAULT;
        assert_eq!(cfg.turntable_angle(2), 77.0);
        assert_eq!(cfg.turntable_angle(0), 17.0);
        assert_eq!(cfg.turntable_angle(9), 17.0);
    }

    #[test]
    fn tick_is_never_zero() {
        let cfg = MotionConfig::DEFAULT.with_tick_ms(0);
        assert_eq!(cfg.tick_ms, 1);
        assert_eq!(MotionConfig::DEFAULT.tick_s(), 0.02);
    }
}
