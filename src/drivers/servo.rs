// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hobby servos driven by a software PWM.
//!
//! Standard 50 Hz servo framing: a 20 ms period with a 0.5 ms (0°) to 2.5 ms (180°) high pulse.
//! The pulse is produced by the same fixed-rate timer interrupt that generates step pulses.

use core::cell::Cell;

use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

pub const FRAME_US: u32 = 20_000;
pub const MIN_PULSE_US: u16 = 500;
pub const MAX_PULSE_US: u16 = 2_500;
pub const MAX_ANGLE_DEG: f32 = 180.0;

/// Pulse width for `angle` degrees. Out-of-range angles are clamped to `[0, 180]`.
pub fn angle_to_pulse_us(angle: f32) -> u16 {
    let angle = angle.clamp(0.0, MAX_ANGLE_DEG);
    let span = (MAX_PULSE_US - MIN_PULSE_US) as f32;
    MIN_PULSE_US + (angle * span / MAX_ANGLE_DEG) as u16
}

/// Commanded pulse widths, shared between tasks and the timer interrupt.
pub struct ServoPulses<const N: usize> {
    widths: Mutex<Cell<[u16; N]>>,
}

impl<const N: usize> ServoPulses<N> {
    pub const fn new() -> Self {
        Self {
            widths: Mutex::new(Cell::new([MIN_PULSE_US; N])),
        }
    }

    pub fn set_angle(&self, channel: usize, angle: f32) {
        if channel >= N {
            return;
        }
        let pulse = angle_to_pulse_us(angle);
        critical_section::with(|cs| {
            let cell = self.widths.borrow(cs);
            let mut widths = cell.get();
            widths[channel] = pulse;
            cell.set(widths);
        });
    }

    pub fn pulse_us(&self, channel: usize) -> Option<u16> {
        critical_section::with(|cs| self.widths.borrow(cs).get().get(channel).copied())
    }

    /// Advance every servo output by one timer tick.
    pub fn service(&self, outputs: &mut [&mut dyn ServoOutput; N]) {
        let widths = critical_section::with(|cs| self.widths.borrow(cs).get());
        for (output, width) in outputs.iter_mut().zip(widths) {
            output.tick(width);
        }
    }
}

impl<const N: usize> Default for ServoPulses<N> {
    fn default() -> Self {
        Self::new()
    }
}

pub trait ServoOutput {
    fn tick(&mut self, pulse_us: u16);
}

/// One servo signal pin.
pub struct SoftServo<P> {
    pin: P,
    tick_us: u32,
    elapsed_us: u32,
}

impl<P: OutputPin> SoftServo<P> {
    /// `tick_us` is the interrupt period.
    pub fn new(mut pin: P, tick_us: u32) -> Self {
        let _ = pin.set_low();
        Self {
            pin,
            tick_us: tick_us.max(1),
            elapsed_us: 0,
        }
    }
}

impl<P: OutputPin> ServoOutput for SoftServo<P> {
    fn tick(&mut self, pulse_us: u16) {
        if self.elapsed_us == 0 {
            let _ = self.pin.set_high();
        }
        self.elapsed_us += self.tick_us;
        if self.elapsed_us >= pulse_us as u32 {
            let _ = self.pin.set_low();
        }
        if self.elapsed_us >= FRAME_US {
            self.elapsed_us = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::stepper::tests::ProbePin;

    #[test]
    fn angle_mapping_is_clamped() {
        assert_eq!(angle_to_pulse_us(0.0), 500);
        assert_eq!(angle_to_pulse_us(90.0), 1500);
        assert_eq!(angle_to_pulse_us(180.0), 2500);
        assert_eq!(angle_to_pulse_us(-30.0), 500);
        assert_eq!(angle_to_pulse_us(400.0), 2500);
    }

    #[test]
    fn pulse_high_for_commanded_width() {
        let pin = ProbePin::default();
        let mut servo = SoftServo::new(pin.clone(), 20);
        let mut high_ticks = 0;
        for _ in 0..(FRAME_US / 20) {
            servo.tick(1500);
            if pin.is_high() {
                high_ticks += 1;
            }
        }
        // High for ticks covering 0..1500 µs.
        assert_eq!(high_ticks, 1500 / 20 - 1);
        assert_eq!(pin.rising_edges(), 1);

        // Next frame starts a new pulse.
        servo.tick(1500);
        assert!(pin.is_high());
        assert_eq!(pin.rising_edges(), 2);
    }

    #[test]
    fn shared_widths() {
        let pulses: ServoPulses<3> = ServoPulses::new();
        pulses.set_angle(1, 98.0);
        pulses.set_angle(5, 10.0);
        assert_eq!(pulses.pulse_us(0), Some(500));
        assert_eq!(pulses.pulse_us(1), Some(angle_to_pulse_us(98.0)));
        assert_eq!(pulses.pulse_us(5), None);
    }
}
