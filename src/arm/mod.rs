// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Lift/Gripper Arm
//!
//! The arm is a stepper-driven lift carrying three servos: the claw, the arm base (swings between
//! the front of the robot and the on-board carrier) and the carrier turntable that selects one of
//! three slots. Heights are reached by counting lift steps down from the top position.

pub mod choreography;

pub use choreography::Arm;

use crate::drivers::{ServoPulses, StepperBank};

/// Requests served by the arm task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArmTask {
    /// Base to the front, claw open.
    Ready,
    /// Base swung over the carrier for driving.
    Stow,
    /// Claw open, base front, turntable to slot 1, lift stopped.
    Reset,
    PickFromRaw,
    /// Drop the held item into carrier slot `1..=3`.
    PlaceToCar(u8),
    PickFromCar(u8),
    PlaceToFloor,
    PickFromFloor,
    /// Place on top of an item already on the floor.
    PlaceToStack,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ServoId {
    Claw,
    Base,
    Turntable,
}

impl ServoId {
    pub const COUNT: usize = 3;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

pub trait ServoBank {
    fn set_angle(&mut self, servo: ServoId, angle_deg: f32);
}

pub trait LiftDrive {
    /// Positive runs the lift down.
    fn set_speed(&mut self, speed: i32);

    fn steps(&self) -> i32;

    fn reset_steps(&mut self);

    fn stop(&mut self) {
        self.set_speed(0);
    }
}

impl<const N: usize> ServoBank for &ServoPulses<N> {
    fn set_angle(&mut self, servo: ServoId, angle_deg: f32) {
        ServoPulses::set_angle(*self, servo.index(), angle_deg);
    }
}

/// The lift as one channel of the stepper bank.
pub struct LiftChannel<'a, const N: usize> {
    bank: &'a StepperBank<N>,
    channel: usize,
}

impl<'a, const N: usize> LiftChannel<'a, N> {
    pub fn new(bank: &'a StepperBank<N>, channel: usize) -> Self {
        Self { bank, channel }
    }
}

impl<const N: usize> LiftDrive for LiftChannel<'_, N> {
    fn set_speed(&mut self, speed: i32) {
        self.bank.set_speed(self.channel, speed);
    }

    fn steps(&self) -> i32 {
        self.bank.steps(self.channel)
    }

    fn reset_steps(&mut self) {
        self.bank.reset_steps(self.channel);
    }
}
