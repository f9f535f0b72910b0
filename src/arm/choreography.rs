// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Servo and lift sequences for each [`ArmTask`].
//!
//! Every pick or place starts and ends with the lift at the top. The pauses give the servos
//! time to reach their set point before the lift moves.

use embedded_hal_async::delay::DelayNs;
use log::{debug, info};

use super::{ArmTask, LiftDrive, ServoBank, ServoId};
use crate::config::ArmConfig;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Travel {
    Down,
    Up,
}

pub struct Arm<S, L, D> {
    servos: S,
    lift: L,
    delay: D,
    config: ArmConfig,
}

impl<S: ServoBank, L: LiftDrive, D: DelayNs> Arm<S, L, D> {
    pub fn new(servos: S, lift: L, delay: D, config: ArmConfig) -> Self {
        Self {
            servos,
            lift,
            delay,
            config,
        }
    }

    pub async fn perform(&mut self, task: ArmTask) {
        info!("arm: {:?}", task);
        match task {
            ArmTask::Ready => self.ready(),
            ArmTask::Stow => self.servo(ServoId::Base, self.config.base_car_deg),
            ArmTask::Reset => self.reset(),
            ArmTask::PickFromRaw => self.pick_front(self.config.depth_plate).await,
            ArmTask::PlaceToCar(slot) => self.place_to_car(slot).await,
            ArmTask::PickFromCar(slot) => self.pick_from_car(slot).await,
            ArmTask::PlaceToFloor => self.place_front(self.config.depth_floor).await,
            ArmTask::PickFromFloor => self.pick_front(self.config.depth_floor).await,
            ArmTask::PlaceToStack => self.place_front(self.config.depth_stack).await,
        }
    }

    /// Safe pose at power-up. The lift is assumed to be at the top already.
    pub fn reset(&mut self) {
        self.servo(ServoId::Claw, self.config.claw_open_deg);
        self.servo(ServoId::Base, self.config.base_front_deg);
        self.servo(ServoId::Turntable, self.config.turntable_angle(1));
        self.lift.stop();
    }

    fn ready(&mut self) {
        self.servo(ServoId::Base, self.config.base_front_deg);
        self.servo(ServoId::Claw, self.config.claw_open_deg);
    }

    async fn pick_front(&mut self, depth: i32) {
        self.servo(ServoId::Base, self.config.base_front_deg);
        self.servo(ServoId::Claw, self.config.claw_open_deg);
        self.delay.delay_ms(300).await;
        self.grab_at(depth).await;
    }

    async fn place_front(&mut self, depth: i32) {
        self.servo(ServoId::Base, self.config.base_front_deg);
        self.delay.delay_ms(400).await;
        self.release_at(depth).await;
    }

    async fn place_to_car(&mut self, slot: u8) {
        self.servo(ServoId::Base, self.config.base_car_deg);
        self.servo(ServoId::Turntable, self.config.turntable_angle(slot));
        self.delay.delay_ms(500).await;
        self.release_at(self.config.depth_car).await;
    }

    async fn pick_from_car(&mut self, slot: u8) {
        self.servo(ServoId::Base, self.config.base_car_deg);
        self.servo(ServoId::Turntable, self.config.turntable_angle(slot));
        self.servo(ServoId::Claw, self.config.claw_open_deg);
        self.delay.delay_ms(500).await;
        self.grab_at(self.config.depth_car).await;
    }

    async fn grab_at(&mut self, depth: i32) {
        self.move_lift(depth, Travel::Down).await;
        self.delay.delay_ms(200).await;
        self.servo(ServoId::Claw, self.config.claw_close_deg);
        self.delay.delay_ms(500).await;
        self.move_lift(depth, Travel::Up).await;
    }

    async fn release_at(&mut self, depth: i32) {
        self.move_lift(depth, Travel::Down).await;
        self.delay.delay_ms(200).await;
        self.servo(ServoId::Claw, self.config.claw_open_deg);
        self.delay.delay_ms(400).await;
        self.move_lift(depth, Travel::Up).await;
    }

    /// Run the lift `distance` steps, polling its step counter.
    async fn move_lift(&mut self, distance: i32, travel: Travel) {
        if distance <= 0 {
            return;
        }
        debug!("arm: lift {:?} {} steps", travel, distance);

        self.lift.reset_steps();
        let speed = match travel {
            Travel::Down => self.config.lift_speed,
            Travel::Up => -self.config.lift_speed,
        };
        self.lift.set_speed(speed);
        while self.lift.steps().unsigned_abs() < distance.unsigned_abs() {
            self.delay.delay_ms(self.config.lift_poll_ms).await;
        }
        self.lift.stop();
    }

    #[inline]
    fn servo(&mut self, servo: ServoId, angle: f32) {
        self.servos.set_angle(servo, angle);
    }
}
