// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Per-tick motion controller.
//!
//! Pure state machine, no I/O. The motion loop feeds it the latest command, the wheel step count
//! and the heading, then writes the returned wheel speeds to the steppers.

use log::debug;

use super::command::{MotionCommand, MoveMode};
use super::kinematics::{self, WheelSpeeds};
use crate::config::MotionConfig;
use crate::control::{shortest_error_deg, HeadingSnapshot, Pid, SpeedProfile};

/// Result of one control tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TickOutcome {
    pub wheels: WheelSpeeds,
    /// The active command completed on this tick. Fires once per command.
    pub finished: bool,
}

impl TickOutcome {
    const IDLE: Self = Self {
        wheels: WheelSpeeds::ZERO,
        finished: false,
    };

    const FINISHED: Self = Self {
        wheels: WheelSpeeds::ZERO,
        finished: true,
    };
}

pub struct MotionController {
    config: MotionConfig,
    profile: SpeedProfile,

    mode: MoveMode,
    /// Requested cruise speed, mm/s
    target_speed: f32,
    /// Ramped speed, mm/s. Carries over between commands so a new command starts from the
    /// speed the chassis already has.
    current_speed: f32,
    /// Travel goal in wheel pulses
    target_pulses: i32,
    /// A distance was requested, possibly shorter than one pulse. `false` = unbounded
    bounded: bool,
    /// Absolute turn goal, degrees (relative heading frame)
    target_heading: f32,

    heading_pid: Pid,
    turn_pid: Pid,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            profile: SpeedProfile::new(&config),

            mode: MoveMode::Stop,
            target_speed: 0.0,
            current_speed: 0.0,
            target_pulses: 0,
            bounded: false,
            target_heading: 0.0,

            heading_pid: Pid::from_gains(config.heading_lock),
            turn_pid: Pid::from_gains(config.turn),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn mode(&self) -> MoveMode {
        self.mode
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// Heading held by the straight-line lock.
    pub fn locked_heading(&self) -> f32 {
        self.heading_pid.target()
    }

    /// Accept a new command. The caller zeroes the wheel step counters when
    /// [`MoveMode::tracks_distance`] holds for the command's mode.
    pub fn apply(&mut self, cmd: MotionCommand, heading: &HeadingSnapshot) {
        debug!(
            "motion: {:?} speed {} target {}",
            cmd.mode, cmd.speed_mm_s, cmd.target
        );

        match cmd.mode {
            MoveMode::Stop => self.halt(),
            MoveMode::TurnAbsolute => {
                self.turn_pid.reset();
                self.turn_pid.set_target(0.0);
                self.mode = MoveMode::TurnAbsolute;
                self.target_heading = cmd.target;
                self.target_speed = 0.0;
                self.target_pulses = 0;
                self.bounded = false;
            }
            mode => {
                if matches!(mode, MoveMode::Forward | MoveMode::Backward) {
                    self.heading_pid.reset();
                    self.heading_pid.set_target(heading.relative_deg);
                }
                self.mode = mode;
                self.target_speed = cmd.speed_mm_s;
                self.target_pulses = (cmd.target * self.config.pulses_per_mm) as i32;
                self.bounded = cmd.target > 0.0;
            }
        }
    }

    /// Run one control period.
    ///
    /// `traveled_pulses` is the front-left step count since the command was applied, used as
    /// longitudinal odometry for every translation mode. `heading_deg` is the relative heading.
    pub fn tick(&mut self, traveled_pulses: i32, heading_deg: f32) -> TickOutcome {
        if self.mode == MoveMode::Stop {
            self.current_speed = 0.0;
            return TickOutcome::IDLE;
        }

        let bounded = self.bounded;
        let remaining_mm = if bounded {
            let left = self.target_pulses as f32 - traveled_pulses.unsigned_abs() as f32;
            (left / self.config.pulses_per_mm).max(0.0)
        } else {
            self.config.cruise_distance_mm
        };

        let effective = self.target_speed.min(self.profile.boundary(remaining_mm));
        self.current_speed = self.profile.ramp(self.current_speed, effective);

        if bounded
            && remaining_mm <= self.config.arrive_distance_mm
            && self.current_speed <= self.config.arrive_speed_mm_s
        {
            debug!("motion: {:?} arrived", self.mode);
            self.halt();
            return TickOutcome::FINISHED;
        }

        let speed = self.current_speed * self.config.speed_scale;
        let limit = self.config.wheel_limit;

        let wheels = match self.mode {
            MoveMode::Forward | MoveMode::Backward => {
                let correction = self.heading_pid.compute_positional(heading_deg);
                kinematics::mix(self.mode, speed, correction, limit)
            }
            MoveMode::TurnAbsolute => {
                let error = shortest_error_deg(self.target_heading, heading_deg);
                if error.abs() < self.config.turn_threshold_deg {
                    debug!("motion: reached heading {}", self.target_heading);
                    self.halt();
                    return TickOutcome::FINISHED;
                }
                // Target is zero error, so feeding `-error` yields `kp·error`.
                let rate = self.turn_pid.compute_positional(-error);
                kinematics::mix(self.mode, 0.0, rate, limit)
            }
            mode => kinematics::mix(mode, speed, 0.0, limit),
        };

        TickOutcome {
            wheels,
            finished: false,
        }
    }

    fn halt(&mut self) {
        self.mode = MoveMode::Stop;
        self.target_speed = 0.0;
        self.current_speed = 0.0;
        self.target_pulses = 0;
        self.bounded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> MotionController {
        MotionController::new(MotionConfig::DEFAULT)
    }

    #[test]
    fn stop_is_idle_and_silent() {
        let mut c = controller();
        c.apply(MotionCommand::STOP, &HeadingSnapshot::ZERO);
        for _ in 0..3 {
            let out = c.tick(0, 0.0);
            assert!(out.wheels.is_zero());
            assert!(!out.finished);
        }
    }

    #[test]
    fn speed_ramps_up_by_accel_step() {
        let mut c = controller();
        c.apply(
            MotionCommand::drive(MoveMode::Forward, 300.0, 686.0),
            &HeadingSnapshot::ZERO,
        );
        c.tick(0, 0.0);
        assert_eq!(c.current_speed(), 8.0);
        c.tick(10, 0.0);
        assert_eq!(c.current_speed(), 16.0);
    }

    #[test]
    fn forward_locks_heading_at_apply() {
        let mut c = controller();
        let heading = HeadingSnapshot {
            relative_deg: 12.0,
            continuous_deg: 12.0,
        };
        c.apply(MotionCommand::drive(MoveMode::Forward, 300.0, 0.0), &heading);
        assert_eq!(c.locked_heading(), 12.0);

        // Drifted clockwise: right side must speed up.
        let out = c.tick(0, 10.0);
        assert!(out.wheels.front_right > out.wheels.front_left);
    }

    #[test]
    fn unbounded_move_never_finishes() {
        let mut c = controller();
        c.apply(
            MotionCommand::drive(MoveMode::SlideLeft, 100.0, 0.0),
            &HeadingSnapshot::ZERO,
        );
        for i in 0..500 {
            assert!(!c.tick(i * 50, 0.0).finished);
        }
        assert_eq!(c.current_speed(), 100.0);
    }

    #[test]
    fn sub_pulse_distance_still_finishes() {
        let mut c = controller();
        c.apply(
            MotionCommand::drive(MoveMode::Forward, 100.0, 0.05),
            &HeadingSnapshot::ZERO,
        );
        let out = c.tick(0, 0.0);
        assert!(out.finished);
        assert!(out.wheels.is_zero());
        assert_eq!(c.mode(), MoveMode::Stop);
        assert!(!c.tick(0, 0.0).finished);
    }

    #[test]
    fn absolute_turn_spins_towards_target() {
        let mut c = controller();
        c.apply(MotionCommand::turn_absolute(90.0), &HeadingSnapshot::ZERO);
        let out = c.tick(0, 0.0);
        assert!(!out.finished);
        // Counter-clockwise: left side backwards, right side forwards.
        assert!(out.wheels.front_left < 0 && out.wheels.front_right > 0);

        let out = c.tick(0, 89.5);
        assert!(out.finished);
        assert_eq!(c.mode(), MoveMode::Stop);
        assert!(!c.tick(0, 89.5).finished);
    }

    #[test]
    fn absolute_turn_takes_short_way_round() {
        let mut c = controller();
        c.apply(MotionCommand::turn_absolute(270.0), &HeadingSnapshot::ZERO);
        let out = c.tick(0, 0.0);
        assert!(out.wheels.front_left > 0 && out.wheels.front_right < 0);
    }

    #[test]
    fn wheel_commands_respect_limit() {
        let mut c = MotionController::new(MotionConfig::DEFAULT.with_speed_scale(1000.0));
        c.apply(
            MotionCommand::drive(MoveMode::Forward, 5000.0, 0.0),
            &HeadingSnapshot::ZERO,
        );
        for _ in 0..200 {
            let out = c.tick(0, 45.0);
            for wheel in kinematics::Wheel::ALL {
                assert!(out.wheels.get(wheel).abs() <= 10_000);
            }
        }
    }
}
