// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! [`MissionIo`] over the firmware's [`Shared`] state.

use super::runner::MissionIo;
use crate::arm::ArmTask;
use crate::chassis::{Chassis, MotionCommand};
use crate::protocol::ScanToken;
use crate::sync::Shared;

pub struct SharedIo<'a> {
    shared: &'a Shared,
    chassis: Chassis<'a>,
}

impl<'a> SharedIo<'a> {
    pub fn new(shared: &'a Shared) -> Self {
        Self {
            shared,
            chassis: Chassis::new(&shared.motion, &shared.events.move_finished),
        }
    }
}

impl MissionIo for SharedIo<'_> {
    async fn wait_start(&mut self) {
        // Presses made while a mission was running do not count.
        let start = &self.shared.events.mission_start;
        start.reset();
        start.wait().await;
    }

    fn rezero_heading(&mut self) {
        self.shared.heading.request_rezero();
    }

    async fn next_scan_token(&mut self) -> ScanToken {
        self.shared.scans.receive().await
    }

    async fn drive(&mut self, cmd: MotionCommand) {
        self.chassis.execute(cmd).await;
    }

    fn halt(&mut self) {
        self.chassis.stop();
    }

    async fn arm(&mut self, task: ArmTask) {
        let finished = &self.shared.events.arm_finished;
        finished.reset();
        self.shared.arm_requests.send(task).await;
        finished.wait().await;
    }

    async fn wait_for_target(&mut self, target_id: u8) {
        self.shared
            .vision
            .wait_for(|r| r.found && r.target_id == target_id)
            .await;
    }

    async fn sight(&mut self, target_id: u8) -> (i16, i16) {
        let r = self
            .shared
            .vision
            .wait_fresh(|r| r.found && r.target_id == target_id)
            .await;
        (r.x as i16, r.y as i16)
    }
}
