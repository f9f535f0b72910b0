// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Arm task: serves [`ArmTask`](crate::arm::ArmTask) requests one at a time.

use embedded_hal_async::delay::DelayNs;

use crate::arm::{Arm, LiftDrive, ServoBank};
use crate::sync::Shared;

pub async fn run<S, L, D>(arm: &mut Arm<S, L, D>, shared: &Shared) -> !
where
    S: ServoBank,
    L: LiftDrive,
    D: DelayNs,
{
    arm.reset();
    loop {
        let task = shared.arm_requests.receive().await;
        arm.perform(task).await;
        shared.events.arm_finished.signal(());
    }
}
