// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Code scanner byte stream to [`ScanToken`]s.

use log::{info, warn};

use crate::protocol::{ScanFramer, ScanToken};
use crate::sync::{ScanQueue, Shared};

/// Frame one byte and queue any completed token. Tokens arriving while the queue is full are
/// dropped.
pub fn feed(framer: &mut ScanFramer, byte: u8, queue: &ScanQueue) -> Option<ScanToken> {
    let token = framer.push(byte)?;
    info!("scan: {} byte token", token.len());
    if queue.try_send(token.clone()).is_err() {
        warn!("scan: queue full, token dropped");
    }
    Some(token)
}

pub async fn run(shared: &Shared) -> ! {
    let mut framer = ScanFramer::new();
    loop {
        let byte = shared.scan_rx.receive().await;
        feed(&mut framer, byte, &shared.scans);
    }
}
