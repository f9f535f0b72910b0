// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! State shared between tasks.
//!
//! Everything here is `const`-constructible so the board can keep a single `static Shared`, and
//! every primitive is interrupt-safe (`CriticalSectionRawMutex`), so UART interrupts can feed the
//! byte channels directly.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::arm::ArmTask;
use crate::chassis::MotionCommand;
use crate::control::HeadingSnapshot;
use crate::protocol::{ScanToken, VisionRecord};

pub type RawMutex = CriticalSectionRawMutex;

/// Capacity of each UART receive channel.
pub const RX_QUEUE_LEN: usize = 64;
/// Decoded scan tokens not yet consumed by the mission.
pub const SCAN_QUEUE_LEN: usize = 2;

pub type ByteQueue = Channel<RawMutex, u8, RX_QUEUE_LEN>;
pub type ScanQueue = Channel<RawMutex, ScanToken, SCAN_QUEUE_LEN>;
pub type ArmQueue = Channel<RawMutex, ArmTask, 1>;

/// One-shot completion notifications.
pub struct Events {
    pub move_finished: Signal<RawMutex, ()>,
    pub arm_finished: Signal<RawMutex, ()>,
    pub mission_start: Signal<RawMutex, ()>,
}

impl Events {
    pub const fn new() -> Self {
        Self {
            move_finished: Signal::new(),
            arm_finished: Signal::new(),
            mission_start: Signal::new(),
        }
    }
}

/// Latest heading published by the heading provider.
pub struct HeadingCell {
    snapshot: Mutex<RawMutex, Cell<HeadingSnapshot>>,
    rezero: Signal<RawMutex, ()>,
}

impl HeadingCell {
    pub const fn new() -> Self {
        Self {
            snapshot: Mutex::new(Cell::new(HeadingSnapshot::ZERO)),
            rezero: Signal::new(),
        }
    }

    pub fn publish(&self, snapshot: HeadingSnapshot) {
        self.snapshot.lock(|s| s.set(snapshot));
    }

    pub fn snapshot(&self) -> HeadingSnapshot {
        self.snapshot.lock(|s| s.get())
    }

    /// Ask the provider to take the next sample as heading zero.
    pub fn request_rezero(&self) {
        self.rezero.signal(());
    }

    /// Consume a pending re-zero request.
    pub fn take_rezero(&self) -> bool {
        self.rezero.try_take().is_some()
    }
}

/// Single-slot command mailbox. A newer command overwrites one not yet picked up.
pub struct CommandMailbox {
    slot: Signal<RawMutex, MotionCommand>,
}

impl CommandMailbox {
    pub const fn new() -> Self {
        Self {
            slot: Signal::new(),
        }
    }

    pub fn post(&self, cmd: MotionCommand) {
        self.slot.signal(cmd);
    }

    pub fn take(&self) -> Option<MotionCommand> {
        self.slot.try_take()
    }
}

/// Most recent vision record plus a change notification.
pub struct VisionBoard {
    latest: Mutex<RawMutex, Cell<Option<VisionRecord>>>,
    changed: Signal<RawMutex, VisionRecord>,
}

impl VisionBoard {
    pub const fn new() -> Self {
        Self {
            latest: Mutex::new(Cell::new(None)),
            changed: Signal::new(),
        }
    }

    pub fn publish(&self, record: VisionRecord) {
        self.latest.lock(|l| l.set(Some(record)));
        self.changed.signal(record);
    }

    pub fn latest(&self) -> Option<VisionRecord> {
        self.latest.lock(|l| l.get())
    }

    /// Resolve with the first record matching `accept`, starting with the one already held.
    pub async fn wait_for(&self, mut accept: impl FnMut(&VisionRecord) -> bool) -> VisionRecord {
        if let Some(record) = self.latest().filter(|r| accept(r)) {
            return record;
        }
        loop {
            let record = self.changed.wait().await;
            if accept(&record) {
                return record;
            }
        }
    }

    /// Like [`VisionBoard::wait_for`], but ignores everything published before the call.
    pub async fn wait_fresh(&self, mut accept: impl FnMut(&VisionRecord) -> bool) -> VisionRecord {
        self.changed.reset();
        loop {
            let record = self.changed.wait().await;
            if accept(&record) {
                return record;
            }
        }
    }
}

/// All cross-task state.
pub struct Shared {
    pub events: Events,
    pub heading: HeadingCell,
    pub motion: CommandMailbox,
    pub vision: VisionBoard,
    pub scans: ScanQueue,
    pub arm_requests: ArmQueue,
    pub imu_rx: ByteQueue,
    pub vision_rx: ByteQueue,
    pub scan_rx: ByteQueue,
}

impl Shared {
    pub const fn new() -> Self {
        Self {
            events: Events::new(),
            heading: HeadingCell::new(),
            motion: CommandMailbox::new(),
            vision: VisionBoard::new(),
            scans: Channel::new(),
            arm_requests: Channel::new(),
            imu_rx: Channel::new(),
            vision_rx: Channel::new(),
            scan_rx: Channel::new(),
        }
    }
}

impl Default for Shared {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chassis::MoveMode;
    use core::task::Poll;
    use embassy_futures::{block_on, poll_once};

    fn record(target_id: u8, sequence: u32) -> VisionRecord {
        VisionRecord {
            target_id,
            x: 100,
            y: 120,
            found: true,
            sequence,
        }
    }

    #[test]
    fn mailbox_keeps_latest_command() {
        let mailbox = CommandMailbox::new();
        assert!(mailbox.take().is_none());
        mailbox.post(MotionCommand::drive(MoveMode::Forward, 100.0, 10.0));
        mailbox.post(MotionCommand::STOP);
        assert_eq!(mailbox.take(), Some(MotionCommand::STOP));
        assert!(mailbox.take().is_none());
    }

    #[test]
    fn rezero_request_is_consumed_once() {
        let cell = HeadingCell::new();
        assert!(!cell.take_rezero());
        cell.request_rezero();
        assert!(cell.take_rezero());
        assert!(!cell.take_rezero());
    }

    #[test]
    fn wait_for_uses_held_record() {
        let board = VisionBoard::new();
        board.publish(record(2, 1));
        let got = block_on(board.wait_for(|r| r.target_id == 2));
        assert_eq!(got.sequence, 1);
    }

    #[test]
    fn wait_fresh_ignores_stale_notification() {
        let board = VisionBoard::new();
        board.publish(record(5, 1));
        let mut fut = core::pin::pin!(board.wait_fresh(|r| r.target_id == 5));
        assert!(poll_once(fut.as_mut()).is_pending());
        board.publish(record(5, 2));
        match poll_once(fut.as_mut()) {
            Poll::Ready(r) => assert_eq!(r.sequence, 2),
            Poll::Pending => panic!("fresh record not seen"),
        }
    }
}
