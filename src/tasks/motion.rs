// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-period chassis control loop.

use embedded_hal_async::delay::DelayNs;
use log::info;

use crate::chassis::{MotionController, TickOutcome, Wheel, WheelDrive};
use crate::sync::Shared;

pub struct MotionLoop<W> {
    controller: MotionController,
    drive: W,
}

impl<W: WheelDrive> MotionLoop<W> {
    pub fn new(controller: MotionController, mut drive: W) -> Self {
        drive.stop_all();
        drive.reset_steps();
        Self { controller, drive }
    }

    pub fn controller(&self) -> &MotionController {
        &self.controller
    }

    pub fn drive(&self) -> &W {
        &self.drive
    }

    /// One control period: pick up a new command, run the controller, write the wheels.
    pub fn step(&mut self, shared: &Shared) -> TickOutcome {
        if let Some(cmd) = shared.motion.take() {
            if cmd.mode.tracks_distance() {
                self.drive.reset_steps();
            }
            self.controller.apply(cmd, &shared.heading.snapshot());
        }

        let heading = shared.heading.snapshot();
        let traveled = self.drive.steps(Wheel::FrontLeft);
        let outcome = self.controller.tick(traveled, heading.relative_deg);
        self.drive.apply(&outcome.wheels);

        if outcome.finished {
            info!("motion: finished at {} pulses", traveled);
            shared.events.move_finished.signal(());
        }
        outcome
    }

    pub async fn run<D: DelayNs>(&mut self, shared: &Shared, mut delay: D) -> ! {
        let period = self.controller.config().tick_ms;
        loop {
            self.step(shared);
            delay.delay_ms(period).await;
        }
    }
}
