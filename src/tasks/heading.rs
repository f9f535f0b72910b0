// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Heading provider: IMU bytes in, continuous heading out.

use log::{debug, info};

use crate::config::HeadingConfig;
use crate::control::{ContinuousHeading, HeadingSnapshot};
use crate::protocol::{ImuFrame, ImuParser};
use crate::sync::{HeadingCell, Shared};

pub struct HeadingProvider {
    parser: ImuParser,
    estimator: ContinuousHeading,
}

impl HeadingProvider {
    pub fn new(config: &HeadingConfig) -> Self {
        Self {
            parser: ImuParser::new(),
            estimator: ContinuousHeading::new(config),
        }
    }

    /// Feed one received byte. Publishes and returns a snapshot when it completes an angle packet.
    pub fn feed(&mut self, byte: u8, cell: &HeadingCell) -> Option<HeadingSnapshot> {
        let frame = self.parser.push(byte)?;
        let ImuFrame::Angle(angles) = frame else {
            return None;
        };

        if cell.take_rezero() {
            info!("heading: zero at yaw {}", angles.z);
            self.estimator.reset();
        }
        let snapshot = self.estimator.update(angles.z);
        cell.publish(snapshot);

        if self.estimator.wrap_count() != 0 {
            debug!(
                "heading: {} ({} wraps)",
                snapshot.continuous_deg,
                self.estimator.wrap_count()
            );
        }
        Some(snapshot)
    }

    pub async fn run(&mut self, shared: &Shared) -> ! {
        loop {
            let byte = shared.imu_rx.receive().await;
            self.feed(byte, &shared.heading);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::imu::tests::angle_packet;
    use approx::assert_relative_eq;

    fn feed_packet(
        p: &mut HeadingProvider,
        cell: &HeadingCell,
        yaw: f32,
    ) -> Option<HeadingSnapshot> {
        angle_packet(0.0, 0.0, yaw)
            .iter()
            .fold(None, |_, &b| p.feed(b, cell))
    }

    #[test]
    fn publishes_unwrapped_heading() {
        let cell = HeadingCell::new();
        let mut p = HeadingProvider::new(&HeadingConfig::DEFAULT);

        feed_packet(&mut p, &cell, 170.0).unwrap();
        let s = feed_packet(&mut p, &cell, -170.0).unwrap();
        assert_relative_eq!(s.continuous_deg, 190.0, epsilon = 0.05);
        assert_relative_eq!(cell.snapshot().relative_deg, 20.0, epsilon = 0.05);
    }

    #[test]
    fn rezero_applies_to_next_angle_packet() {
        let cell = HeadingCell::new();
        let mut p = HeadingProvider::new(&HeadingConfig::DEFAULT);
        feed_packet(&mut p, &cell, 10.0);
        feed_packet(&mut p, &cell, 40.0);
        assert_relative_eq!(cell.snapshot().relative_deg, 30.0, epsilon = 0.05);

        cell.request_rezero();
        let s = feed_packet(&mut p, &cell, 50.0).unwrap();
        assert_relative_eq!(s.relative_deg, 0.0);
        assert!(!cell.take_rezero());
    }
}
