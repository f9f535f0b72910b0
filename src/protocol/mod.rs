// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Serial Protocols
//!
//! Byte-at-a-time decoders for the three serial peripherals. Each one is fed straight from its
//! UART receive queue and never blocks.
//!
//! - [`imu`] - WIT inertial module packets (acceleration, rate, Euler angles).
//! - [`vision`] - Camera detection frames.
//! - [`scan`] - Code scanner lines.

pub mod imu;
pub mod scan;
pub mod vision;

pub use imu::{ImuFrame, ImuParser};
pub use scan::{ScanFramer, ScanToken};
pub use vision::{Detection, VisionParser, VisionRecord};
