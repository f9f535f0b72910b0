// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! Reusable building blocks for the chassis loops.
//!
//! ## Modules
//!
//! - [`pid`] - General-purpose PID controller (positional and incremental laws).
//! - [`heading`] - Wrap-counting continuous heading estimator.
//! - [`profile`] - Trapezoidal speed profile for distance moves.

pub mod heading;
pub mod pid;
pub mod profile;

pub use heading::{normalize_deg, shortest_error_deg, ContinuousHeading, HeadingSnapshot};
pub use pid::Pid;
pub use profile::SpeedProfile;
