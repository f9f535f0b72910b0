// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Step/direction stepper drivers.
//!
//! Step pulses are generated in software from a fixed-rate timer interrupt with one phase
//! accumulator per channel, so any GPIO can be a step pin and every pulse is counted exactly.
//!
//! [`StepperBank`] is the shared half: speed commands in, signed step counts out, both behind a
//! critical section. [`StepChannel`] is the interrupt-owned half that toggles the pins.

use core::cell::Cell;

use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

use crate::chassis::{Wheel, WheelDrive};

/// Magnitude clamp for speed commands.
pub const SPEED_LIMIT: i32 = 10_000;

/// Channel layout on this robot: four wheels (m1..m4) then the lift.
pub const LIFT_CHANNEL: usize = 4;
pub const CHANNELS: usize = 5;

/// Speed commands and step counters shared between tasks and the step interrupt.
pub struct StepperBank<const N: usize> {
    speeds: Mutex<Cell<[i32; N]>>,
    steps: Mutex<Cell<[i32; N]>>,
}

impl<const N: usize> StepperBank<N> {
    pub const fn new() -> Self {
        Self {
            speeds: Mutex::new(Cell::new([0; N])),
            steps: Mutex::new(Cell::new([0; N])),
        }
    }

    /// Command a channel. Clamped to ±[`SPEED_LIMIT`]; out-of-range channels are ignored.
    pub fn set_speed(&self, channel: usize, speed: i32) {
        if channel >= N {
            return;
        }
        let speed = speed.clamp(-SPEED_LIMIT, SPEED_LIMIT);
        critical_section::with(|cs| {
            let cell = self.speeds.borrow(cs);
            let mut speeds = cell.get();
            speeds[channel] = speed;
            cell.set(speeds);
        });
    }

    pub fn speed(&self, channel: usize) -> i32 {
        critical_section::with(|cs| self.speeds.borrow(cs).get().get(channel).copied())
            .unwrap_or(0)
    }

    /// Signed steps since the last reset of this channel.
    pub fn steps(&self, channel: usize) -> i32 {
        critical_section::with(|cs| self.steps.borrow(cs).get().get(channel).copied())
            .unwrap_or(0)
    }

    pub fn reset_steps(&self, channel: usize) {
        if channel >= N {
            return;
        }
        critical_section::with(|cs| {
            let cell = self.steps.borrow(cs);
            let mut steps = cell.get();
            steps[channel] = 0;
            cell.set(steps);
        });
    }

    /// Advance every channel by one timer tick and accumulate the emitted steps.
    ///
    /// Call from the step timer interrupt with the channels in bank order.
    pub fn service(&self, outputs: &mut [&mut dyn StepOutput; N]) {
        critical_section::with(|cs| {
            let speeds = self.speeds.borrow(cs).get();
            let cell = self.steps.borrow(cs);
            let mut steps = cell.get();
            for (i, output) in outputs.iter_mut().enumerate() {
                steps[i] = steps[i].wrapping_add(output.tick(speeds[i]));
            }
            cell.set(steps);
        });
    }
}

impl<const N: usize> Default for StepperBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> WheelDrive for &StepperBank<N> {
    fn set_speed(&mut self, wheel: Wheel, speed: i32) {
        StepperBank::set_speed(*self, wheel.index(), speed);
    }

    fn stop_all(&mut self) {
        for wheel in Wheel::ALL {
            StepperBank::set_speed(*self, wheel.index(), 0);
        }
    }

    fn steps(&self, wheel: Wheel) -> i32 {
        StepperBank::steps(*self, wheel.index())
    }

    fn reset_steps(&mut self) {
        for wheel in Wheel::ALL {
            StepperBank::reset_steps(*self, wheel.index());
        }
    }
}

/// Interrupt-side pulse generator for one channel.
pub trait StepOutput {
    /// Advance one timer tick at `speed`. Returns the signed steps completed (`-1`, `0` or `1`).
    fn tick(&mut self, speed: i32) -> i32;
}

/// Phase-accumulator step generator on a STEP/DIR pin pair.
pub struct StepChannel<STEP, DIR> {
    step: STEP,
    dir: DIR,
    reverse: bool,

    /// Step rate per unit of speed command, Hz
    hz_per_unit: f32,
    tick_hz: u32,

    last_speed: i32,
    increment: u32,
    phase: u32,
    level: bool,
}

impl<STEP: OutputPin, DIR: OutputPin> StepChannel<STEP, DIR> {
    /// `tick_hz` is the rate [`StepOutput::tick`] is called at. The generator can emit at most
    /// `tick_hz / 2` steps per second.
    pub fn new(step: STEP, dir: DIR, hz_per_unit: f32, tick_hz: u32) -> Self {
        let mut ch = Self {
            step,
            dir,
            reverse: false,
            hz_per_unit,
            tick_hz: tick_hz.max(1),
            last_speed: 0,
            increment: 0,
            phase: 0,
            level: false,
        };
        let _ = ch.step.set_low();
        let _ = ch.dir.set_low();
        ch
    }

    /// Invert the DIR pin for motors mounted mirrored.
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    fn retune(&mut self, speed: i32) {
        self.last_speed = speed;

        // Two phase wraps (high + low) per step.
        let step_hz = speed.unsigned_abs() as f32 * self.hz_per_unit;
        let fraction = (2.0 * step_hz / self.tick_hz as f32).min(1.0);
        self.increment = (fraction * u32::MAX as f32) as u32;

        let backwards = (speed < 0) != self.reverse;
        let _ = if backwards {
            self.dir.set_high()
        } else {
            self.dir.set_low()
        };
    }
}

impl<STEP: OutputPin, DIR: OutputPin> StepOutput for StepChannel<STEP, DIR> {
    fn tick(&mut self, speed: i32) -> i32 {
        if speed != self.last_speed {
            self.retune(speed);
        }
        if self.increment == 0 {
            return 0;
        }

        let (phase, wrapped) = self.phase.overflowing_add(self.increment);
        self.phase = phase;
        if !wrapped {
            return 0;
        }

        self.level = !self.level;
        if self.level {
            let _ = self.step.set_high();
            speed.signum()
        } else {
            let _ = self.step.set_low();
            0
        }
    }
}
