// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side stand-ins for the board: a yielding delay and a kinematic chassis model.

#![allow(dead_code)]

use embedded_hal_async::delay::DelayNs;
use mecabot::chassis::{Wheel, WheelDrive, WheelSpeeds};
use mecabot::config::MotionConfig;
use mecabot::control::HeadingSnapshot;
use mecabot::sync::HeadingCell;

/// Every delay is one executor turn, so loops advance in lock step under `join`/`select`.
pub struct YieldDelay;

impl DelayNs for YieldDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        embassy_futures::yield_now().await;
    }
}

/// Yaw rate per unit of net spin command, deg/s.
const DEG_S_PER_UNIT: f32 = 0.3;

/// Ideal mecanum chassis. Each [`WheelDrive::apply`] is one control period: the commanded wheel
/// speeds are integrated into step counts and heading, and the heading is published.
pub struct SimChassis<'a> {
    speeds: WheelSpeeds,
    steps: [f32; 4],
    heading_deg: f32,
    dt_s: f32,
    hz_per_unit: f32,
    heading: &'a HeadingCell,
    pub ticks: u32,
}

impl<'a> SimChassis<'a> {
    pub fn new(config: &MotionConfig, heading: &'a HeadingCell) -> Self {
        heading.publish(HeadingSnapshot::ZERO);
        Self {
            speeds: WheelSpeeds::ZERO,
            steps: [0.0; 4],
            heading_deg: 0.0,
            dt_s: config.tick_s(),
            hz_per_unit: config.step_hz_per_unit(),
            heading,
            ticks: 0,
        }
    }

    pub fn heading_deg(&self) -> f32 {
        self.heading_deg
    }

    pub fn speeds(&self) -> WheelSpeeds {
        self.speeds
    }

    pub fn set_heading(&mut self, deg: f32) {
        self.heading_deg = deg;
        self.publish();
    }

    fn publish(&self) {
        self.heading.publish(HeadingSnapshot {
            relative_deg: self.heading_deg,
            continuous_deg: self.heading_deg,
        });
    }
}

impl WheelDrive for SimChassis<'_> {
    fn set_speed(&mut self, wheel: Wheel, speed: i32) {
        match wheel {
            Wheel::FrontLeft => self.speeds.front_left = speed,
            Wheel::FrontRight => self.speeds.front_right = speed,
            Wheel::RearLeft => self.speeds.rear_left = speed,
            Wheel::RearRight => self.speeds.rear_right = speed,
        }
    }

    fn stop_all(&mut self) {
        self.speeds = WheelSpeeds::ZERO;
    }

    fn steps(&self, wheel: Wheel) -> i32 {
        self.steps[wheel.index()] as i32
    }

    fn reset_steps(&mut self) {
        self.steps = [0.0; 4];
    }

    fn apply(&mut self, speeds: &WheelSpeeds) {
        self.speeds = *speeds;
        self.ticks += 1;
        for wheel in Wheel::ALL {
            self.steps[wheel.index()] += speeds.get(wheel) as f32 * self.hz_per_unit * self.dt_s;
        }
        let spin = (-speeds.front_left + speeds.front_right - speeds.rear_left + speeds.rear_right)
            as f32
            / 4.0;
        self.heading_deg += spin * DEG_S_PER_UNIT * self.dt_s;
        self.publish();
    }
}
