// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Camera byte stream to [`VisionRecord`]s.

use log::trace;

use crate::protocol::{VisionParser, VisionRecord};
use crate::sync::{Shared, VisionBoard};

#[derive(Default)]
pub struct VisionConsumer {
    parser: VisionParser,
    sequence: u32,
}

impl VisionConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, byte: u8, board: &VisionBoard) -> Option<VisionRecord> {
        let detection = self.parser.push(byte)?;
        self.sequence = self.sequence.wrapping_add(1);
        let record = VisionRecord {
            target_id: detection.target_id,
            x: detection.x,
            y: detection.y,
            found: true,
            sequence: self.sequence,
        };
        trace!("vision: {:?}", record);
        board.publish(record);
        Some(record)
    }

    pub async fn run(&mut self, shared: &Shared) -> ! {
        loop {
            let byte = shared.vision_rx.receive().await;
            self.feed(byte, &shared.vision);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_get_increasing_sequence() {
        let board = VisionBoard::new();
        let mut c = VisionConsumer::new();
        let mut out = None;
        for &b in b"xxa4160140ca5023099c".iter() {
            if let Some(r) = c.feed(b, &board) {
                out = Some(r);
            }
        }
        let last = out.unwrap();
        assert_eq!((last.target_id, last.x, last.y), (5, 23, 99));
        assert_eq!(last.sequence, 2);
        assert_eq!(board.latest(), Some(last));
    }
}
