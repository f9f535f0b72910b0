// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Whole-mission replays through the executor.

mod common;

use std::collections::VecDeque;

use common::{SimChassis, YieldDelay};
use embassy_futures::block_on;
use embassy_futures::select::{select, Either};
use mecabot::arm::ArmTask;
use mecabot::chassis::{MotionCommand, MotionController, MoveMode, Wheel, WheelDrive};
use mecabot::config::{MissionConfig, MotionConfig};
use mecabot::mission::{
    Color, MissionError, MissionIo, MissionRunner, MissionState, SharedIo, WaitKind,
};
use mecabot::protocol::ScanToken;
use mecabot::sync::Shared;
use mecabot::tasks::MotionLoop;

/// Completes every request at once and records it.
#[derive(Default)]
struct Recorder {
    starts: u32,
    tokens: VecDeque<&'static [u8]>,
    drives: Vec<MotionCommand>,
    arms: Vec<ArmTask>,
    targets: Vec<u8>,
    sighted: Vec<u8>,
    stall_arm: bool,
    halted: bool,
}

impl Recorder {
    fn with_tokens(tokens: &[&'static [u8]]) -> Self {
        Self {
            tokens: tokens.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn count(&self, task: ArmTask) -> usize {
        self.arms.iter().filter(|&&t| t == task).count()
    }
}

impl MissionIo for Recorder {
    async fn wait_start(&mut self) {
        self.starts += 1;
    }

    fn rezero_heading(&mut self) {}

    async fn next_scan_token(&mut self) -> ScanToken {
        match self.tokens.pop_front() {
            Some(t) => ScanToken::from_slice(t).unwrap(),
            None => core::future::pending().await,
        }
    }

    async fn drive(&mut self, cmd: MotionCommand) {
        self.drives.push(cmd);
    }

    fn halt(&mut self) {
        self.halted = true;
    }

    async fn arm(&mut self, task: ArmTask) {
        if self.stall_arm {
            core::future::pending::<()>().await;
        }
        self.arms.push(task);
    }

    async fn wait_for_target(&mut self, target_id: u8) {
        self.targets.push(target_id);
    }

    async fn sight(&mut self, target_id: u8) -> (i16, i16) {
        self.sighted.push(target_id);
        (160, 140)
    }
}

fn run_to_idle<IO: MissionIo>(runner: &mut MissionRunner<IO, YieldDelay>) -> Vec<MissionState> {
    let mut visited = vec![runner.state()];
    loop {
        let next = block_on(runner.run_state()).expect("no watchdog configured");
        if next == MissionState::Idle {
            return visited;
        }
        visited.push(next);
    }
}

#[test]
fn full_run_visits_every_state_once() {
    let io = Recorder::with_tokens(&[b"231+312"]);
    let mut runner = MissionRunner::new(io, YieldDelay, MissionConfig::DEFAULT);

    let visited = run_to_idle(&mut runner);
    assert_eq!(visited, MissionState::ALL);
    assert_eq!(runner.state(), MissionState::Idle);

    let io = runner.io();
    assert_eq!(io.starts, 1);
    assert_eq!(io.count(ArmTask::PickFromRaw), 6);
    assert_eq!(io.count(ArmTask::PickFromFloor), 6);
    assert_eq!(io.count(ArmTask::PlaceToFloor), 9);
    assert_eq!(io.count(ArmTask::PlaceToStack), 3);
    assert_eq!(io.count(ArmTask::Stow), 1);
    for slot in 1..=3 {
        assert_eq!(io.count(ArmTask::PlaceToCar(slot)), 4);
        assert_eq!(io.count(ArmTask::PickFromCar(slot)), 4);
    }

    // Items are picked in scanned order
    let picked: Vec<u8> = [Color::Green, Color::Blue, Color::Red, Color::Blue, Color::Red, Color::Green]
        .iter()
        .map(|c| c.id())
        .collect();
    assert_eq!(io.targets, picked);

    // First batch rings on both floor visits and the stack, second batch rings once
    let first: [u8; 3] = [5, 6, 4];
    let second: [u8; 3] = [6, 4, 5];
    let expected: Vec<u8> = [first, first, second, first].concat();
    assert_eq!(io.sighted, expected);

    assert!(!io.halted);
    assert_eq!(
        io.drives.first(),
        Some(&MotionCommand::drive(MoveMode::SlideLeft, 100.0, 132.0))
    );
    assert_eq!(
        io.drives.last(),
        Some(&MotionCommand::drive(MoveMode::SlideRight, 300.0, 120.0))
    );
}

#[test]
fn bad_codes_are_skipped() {
    let io = Recorder::with_tokens(&[b"12", b"124+123", b"321+123"]);
    let mut runner = MissionRunner::new(io, YieldDelay, MissionConfig::DEFAULT);

    assert_eq!(block_on(runner.run_state()), Ok(MissionState::ScanCode));
    assert_eq!(block_on(runner.run_state()), Ok(MissionState::GoPlate1));
    assert_eq!(runner.plan().first, [Color::Blue, Color::Green, Color::Red]);
    assert!(runner.io().tokens.is_empty());
}

#[test]
fn stalled_arm_trips_watchdog() {
    let io = Recorder {
        stall_arm: true,
        ..Recorder::with_tokens(&[b"123+123"])
    };
    let config = MissionConfig::DEFAULT.with_wait_timeout(1_000);
    let mut runner = MissionRunner::new(io, YieldDelay, config);

    assert_eq!(block_on(runner.run_state()), Ok(MissionState::ScanCode));
    assert_eq!(block_on(runner.run_state()), Ok(MissionState::GoPlate1));
    assert_eq!(block_on(runner.run_state()), Ok(MissionState::PickPlate1));
    assert_eq!(
        block_on(runner.run_state()),
        Err(MissionError::Timeout(WaitKind::Arm))
    );
    assert_eq!(runner.state(), MissionState::Idle);
    assert!(runner.io().halted);

    // The next run waits for the button again
    assert_eq!(block_on(runner.run_state()), Ok(MissionState::ScanCode));
    assert_eq!(runner.io().starts, 2);
}

#[test]
fn scan_leg_on_shared_state() {
    let cfg = MotionConfig::DEFAULT;
    let shared = Shared::new();
    let mut motion = MotionLoop::new(
        MotionController::new(cfg),
        SimChassis::new(&cfg, &shared.heading),
    );
    let mut runner = MissionRunner::new(SharedIo::new(&shared), YieldDelay, MissionConfig::DEFAULT);

    shared.events.mission_start.signal(());
    shared
        .scans
        .try_send(ScanToken::from_slice(b"123+321").unwrap())
        .unwrap();

    let mission = async {
        {
            // A press left over from before the wait does not count.
            let mut idle = core::pin::pin!(runner.run_state());
            assert!(embassy_futures::poll_once(idle.as_mut()).is_pending());
            shared.events.mission_start.signal(());
            assert_eq!(idle.await, Ok(MissionState::ScanCode));
        }
        runner.run_state().await
    };

    match block_on(select(motion.run(&shared, YieldDelay), mission)) {
        Either::First(never) => never,
        Either::Second(result) => assert_eq!(result, Ok(MissionState::GoPlate1)),
    }

    assert!(shared.heading.take_rezero());
    let forward_mm = motion.drive().steps(Wheel::FrontLeft) as f32 / cfg.pulses_per_mm;
    assert!((forward_mm - 686.0).abs() < 5.0);
    assert!(motion.drive().speeds().is_zero());
}
