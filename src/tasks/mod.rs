// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Tasks
//!
//! Long-running loops that tie the library together. Each one is an `async fn` over
//! [`crate::sync::Shared`] and, where it sleeps, a [`embedded_hal_async::delay::DelayNs`], so the
//! board can spawn them on any executor and the host tests can step them by hand.
//!
//! | Task | Feeds on | Produces |
//! | ---- | -------- | -------- |
//! | [`motion`] | command mailbox, heading, wheel steps | wheel speeds, move-finished |
//! | [`heading`] | IMU bytes | heading snapshot |
//! | [`vision`] | camera bytes | vision record |
//! | [`scan`] | scanner bytes | scan tokens |
//! | [`arm`] | arm requests | servo angles, lift speed, arm-finished |
//! | [`start`] | start button | mission-start |

pub mod arm;
pub mod heading;
pub mod motion;
pub mod scan;
pub mod start;
pub mod vision;

pub use heading::HeadingProvider;
pub use motion::MotionLoop;
pub use vision::VisionConsumer;
