// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the `embedded-hal` pin traits and
//! below the application logic.
//!
//! ## Existing drivers
//!
//! - [`stepper`] – STEP/DIR stepper drivers (four wheels and the lift) with software step timing
//! - [`servo`] – 50 Hz hobby servos with software PWM (claw, arm base, turntable)
//! - [`button`] – Polled active-low start button

pub mod button;
pub mod servo;
pub mod stepper;

pub use button::{Button, EdgeDetector};
pub use servo::{ServoOutput, ServoPulses, SoftServo};
pub use stepper::{StepChannel, StepOutput, StepperBank};
