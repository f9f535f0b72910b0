// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Mecabot Firmware
//!
//! Firmware for a four-wheel mecanum robot carrying a lift/gripper arm, written in Rust, targeting
//! an STM32F767 MCU. The robot scans a task code, picks colored items from a raw-material plate,
//! carries them to floor rings in the scanned order, and stacks a second batch on top.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`control`] | PID, continuous heading estimator, speed profile |
//! | [`chassis`] | Motion commands, mecanum mixing, per-tick motion controller |
//! | [`mission`] | Mission state machine, per-state scripts and executor |
//! | [`arm`] | Lift/gripper choreography |
//! | [`protocol`] | Byte-stream decoders for the IMU, camera and code scanner |
//! | [`drivers`] | Software step generator, servo pulses, push button |
//! | [`tasks`] | Long-running async loops wiring everything together |
//! | [`sync`] | State shared between tasks and interrupts |
//! | [`config`] | Tunables |
//! | [`logging`] | Buffered `log` backend |
//! | `hw` | MCU-level wrappers (`board` feature only) |
//!
//! Everything except `hw` is hardware-agnostic and builds on the host, so the test suite runs
//! with a plain `cargo test`.
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features board --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod arm;
pub mod chassis;
pub mod config;
pub mod control;
pub mod drivers;
#[cfg(feature = "board")]
pub mod hw;
pub mod logging;
pub mod mission;
pub mod protocol;
pub mod sync;
pub mod tasks;
