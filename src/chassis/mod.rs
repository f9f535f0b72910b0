// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Chassis
//!
//! Mecanum chassis motion: commands, wheel mixing and the per-tick controller. The async loop
//! that drives it lives in [`crate::tasks::motion`].

pub mod command;
pub mod controller;
pub mod kinematics;

pub use command::{MotionCommand, MoveMode};
pub use controller::{MotionController, TickOutcome};
pub use kinematics::{Wheel, WheelSpeeds};

use crate::sync::{CommandMailbox, RawMutex};
use embassy_sync::signal::Signal;

/// Wheel actuators plus their step counters, as seen by the motion loop.
pub trait WheelDrive {
    fn set_speed(&mut self, wheel: Wheel, speed: i32);

    fn stop_all(&mut self);

    /// Signed steps since the last [`WheelDrive::reset_steps`].
    fn steps(&self, wheel: Wheel) -> i32;

    fn reset_steps(&mut self);

    fn apply(&mut self, speeds: &WheelSpeeds) {
        for wheel in Wheel::ALL {
            self.set_speed(wheel, speeds.get(wheel));
        }
    }
}

/// Command side of the chassis, used by whoever plans motion.
#[derive(Copy, Clone)]
pub struct Chassis<'a> {
    mailbox: &'a CommandMailbox,
    finished: &'a Signal<RawMutex, ()>,
}

impl<'a> Chassis<'a> {
    pub fn new(mailbox: &'a CommandMailbox, finished: &'a Signal<RawMutex, ()>) -> Self {
        Self { mailbox, finished }
    }

    /// Start a translation or open-loop spin. `distance_mm == 0` runs until the next command.
    pub fn drive(&self, mode: MoveMode, speed_mm_s: f32, distance_mm: f32) {
        self.post(MotionCommand::drive(mode, speed_mm_s, distance_mm));
    }

    /// Rotate to `angle_deg` in the relative heading frame.
    pub fn turn_absolute(&self, angle_deg: f32) {
        self.post(MotionCommand::turn_absolute(angle_deg));
    }

    /// Halt. Never signals completion.
    pub fn stop(&self) {
        self.mailbox.post(MotionCommand::STOP);
    }

    /// Post `cmd`, clearing any stale completion first so the next
    /// [`Chassis::wait_finished`] belongs to this command.
    pub fn post(&self, cmd: MotionCommand) {
        self.finished.reset();
        self.mailbox.post(cmd);
    }

    pub async fn wait_finished(&self) {
        self.finished.wait().await;
    }

    /// Post `cmd` and wait for it to complete.
    pub async fn execute(&self, cmd: MotionCommand) {
        self.post(cmd);
        self.wait_finished().await;
    }
}
