// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Mission executor.
//!
//! [`MissionRunner`] owns the mission cursor and the scanned plan. For the current state it
//! expands the script, performs each action through [`MissionIo`], then feeds the resulting
//! event to [`transition`]. Waits are unbounded unless [`MissionConfig::wait_timeout_ms`] is set.

use core::fmt;
use core::future::Future;

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;
use log::{debug, error, info, warn};

use super::align;
use super::plan::MissionPlan;
use super::script::{script, Action};
use super::state::{transition, MissionEvent, MissionState};
use crate::arm::ArmTask;
use crate::chassis::MotionCommand;
use crate::config::MissionConfig;
use crate::protocol::ScanToken;

/// Side effects the mission needs from the rest of the firmware.
#[allow(async_fn_in_trait)]
pub trait MissionIo {
    /// Resolve on the next start button press.
    ///
    /// Only presses made after the call count. A press latched while the previous run was still
    /// going is discarded rather than starting the next run straight away.
    async fn wait_start(&mut self);

    /// Take the current heading as zero.
    fn rezero_heading(&mut self);

    async fn next_scan_token(&mut self) -> ScanToken;

    /// Run `cmd` to completion.
    async fn drive(&mut self, cmd: MotionCommand);

    /// Stop the chassis without waiting.
    fn halt(&mut self);

    /// Run an arm task to completion.
    async fn arm(&mut self, task: ArmTask);

    /// Resolve once the camera reports `target_id` in view.
    async fn wait_for_target(&mut self, target_id: u8);

    /// Pixel position of `target_id` from the next detection of it.
    async fn sight(&mut self, target_id: u8) -> (i16, i16);
}

/// Which wait ran out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitKind {
    Scan,
    Move,
    Arm,
    Target,
    Sight,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MissionError {
    Timeout(WaitKind),
}

impl fmt::Display for MissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionError::Timeout(kind) => write!(f, "timed out waiting for {kind:?}"),
        }
    }
}

pub struct MissionRunner<IO, D> {
    io: IO,
    delay: D,
    config: MissionConfig,
    state: MissionState,
    plan: MissionPlan,
}

impl<IO: MissionIo, D: DelayNs> MissionRunner<IO, D> {
    pub fn new(io: IO, delay: D, config: MissionConfig) -> Self {
        Self {
            io,
            delay,
            config,
            state: MissionState::Idle,
            plan: MissionPlan::DEFAULT,
        }
    }

    pub fn state(&self) -> MissionState {
        self.state
    }

    pub fn plan(&self) -> &MissionPlan {
        &self.plan
    }

    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Run forever, one state after another.
    pub async fn run(&mut self) -> ! {
        loop {
            // Failures are logged and already reset the cursor.
            let _ = self.run_state().await;
        }
    }

    /// Execute the current state's script and advance. On a watchdog expiry the chassis is
    /// stopped and the cursor goes back to [`MissionState::Idle`].
    pub async fn run_state(&mut self) -> Result<MissionState, MissionError> {
        let state = self.state;
        info!("mission: enter {:?}", state);

        match self.execute(state).await {
            Ok(event) => {
                self.state = transition(state, event);
                Ok(self.state)
            }
            Err(e) => {
                self.io.halt();
                error!("mission: {} in {:?}, back to idle", e, state);
                self.state = MissionState::Idle;
                self.plan = MissionPlan::DEFAULT;
                Err(e)
            }
        }
    }

    async fn execute(&mut self, state: MissionState) -> Result<MissionEvent, MissionError> {
        let mut event = MissionEvent::Completed;
        for action in script(state, &self.plan, self.config.ring_id_offset) {
            match action {
                Action::AwaitStart => {
                    self.io.wait_start().await;
                    event = MissionEvent::Start;
                }
                Action::RezeroHeading => self.io.rezero_heading(),
                Action::AwaitScan => {
                    self.plan = self.await_plan().await?;
                    event = MissionEvent::Scanned;
                }
                Action::Drive(cmd) => self.drive(cmd).await?,
                Action::Arm(task) => {
                    let Self { io, delay, config, .. } = self;
                    guarded(delay, config.wait_timeout_ms, WaitKind::Arm, io.arm(task)).await?;
                }
                Action::Settle(ms) => self.delay.delay_ms(ms).await,
                Action::AwaitTarget(color) => {
                    info!("mission: waiting for {:?}", color);
                    let Self { io, delay, config, .. } = self;
                    let fut = io.wait_for_target(color.id());
                    guarded(delay, config.wait_timeout_ms, WaitKind::Target, fut).await?;
                }
                Action::Align {
                    ring,
                    speed_mm_s,
                    distance_mm,
                } => self.align(ring, speed_mm_s, distance_mm).await?,
            }
        }
        Ok(event)
    }

    async fn await_plan(&mut self) -> Result<MissionPlan, MissionError> {
        loop {
            let Self { io, delay, config, .. } = self;
            let token =
                guarded(delay, config.wait_timeout_ms, WaitKind::Scan, io.next_scan_token()).await?;
            match MissionPlan::parse(&token) {
                Ok(plan) => {
                    info!("mission: plan {:?} then {:?}", plan.first, plan.second);
                    return Ok(plan);
                }
                Err(e) => warn!("mission: rejected scan token: {}", e),
            }
        }
    }

    async fn drive(&mut self, cmd: MotionCommand) -> Result<(), MissionError> {
        let Self { io, delay, config, .. } = self;
        guarded(delay, config.wait_timeout_ms, WaitKind::Move, io.drive(cmd)).await?;
        debug!("mission: {:?} done", cmd.mode);
        Ok(())
    }

    async fn align(
        &mut self,
        ring: u8,
        speed_mm_s: f32,
        distance_mm: f32,
    ) -> Result<(), MissionError> {
        loop {
            let (x, y) = {
                let Self { io, delay, config, .. } = self;
                guarded(delay, config.wait_timeout_ms, WaitKind::Sight, io.sight(ring)).await?
            };
            let Some(nudge) = align::correction(x, y, &self.config.align, speed_mm_s, distance_mm)
            else {
                info!("mission: aligned on ring {} at ({}, {})", ring, x, y);
                return Ok(());
            };
            debug!("mission: ring {} at ({}, {}), nudge {:?}", ring, x, y, nudge.mode);
            self.drive(nudge).await?;
            self.delay.delay_ms(self.config.align_settle_ms).await;
        }
    }
}

/// Await `fut`, giving up after `timeout_ms` when set.
async fn guarded<D: DelayNs, F: Future>(
    delay: &mut D,
    timeout_ms: Option<u32>,
    kind: WaitKind,
    fut: F,
) -> Result<F::Output, MissionError> {
    let Some(ms) = timeout_ms else {
        return Ok(fut.await);
    };
    match select(fut, delay.delay_ms(ms)).await {
        Either::First(out) => Ok(out),
        Either::Second(()) => Err(MissionError::Timeout(kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chassis::MoveMode;
    use embassy_futures::block_on;
    use std::collections::VecDeque;
    use std::vec::Vec;

    struct NoDelay;

    impl DelayNs for NoDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Records every call; sightings come from a queue.
    #[derive(Default)]
    struct FakeIo {
        tokens: VecDeque<&'static [u8]>,
        sightings: VecDeque<(i16, i16)>,
        drives: Vec<MotionCommand>,
        arms: Vec<ArmTask>,
        halted: bool,
        rezeroed: bool,
    }

    impl MissionIo for FakeIo {
        async fn wait_start(&mut self) {}

        fn rezero_heading(&mut self) {
            self.rezeroed = true;
        }

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
            self.arms.push(task);
        }

        async fn wait_for_target(&mut self, _target_id: u8) {}

        async fn sight(&mut self, _target_id: u8) -> (i16, i16) {
            self.sightings.pop_front().unwrap_or((160, 140))
        }
    }

    fn runner(io: FakeIo) -> MissionRunner<FakeIo, NoDelay> {
        MissionRunner::new(io, NoDelay, MissionConfig::DEFAULT)
    }

    #[test]
    fn start_then_scan() {
        let mut r = runner(FakeIo {
            tokens: [&b"12"[..], &b"321+123"[..]].into(),
            ..Default::default()
        });
        assert_eq!(block_on(r.run_state()), Ok(MissionState::ScanCode));
        assert_eq!(block_on(r.run_state()), Ok(MissionState::GoPlate1));
        assert!(r.io().rezeroed);
        assert_eq!(r.io().drives.len(), 2);
        assert_eq!(r.plan().first[0], crate::mission::Color::Blue);
    }

    #[test]
    fn align_nudges_until_centered() {
        let mut r = runner(FakeIo {
            sightings: [(200, 140), (165, 100), (160, 140)].into(),
            ..Default::default()
        });
        block_on(r.align(4, 20.0, 10.0)).unwrap();
        let modes: Vec<MoveMode> = r.io().drives.iter().map(|c| c.mode).collect();
        assert_eq!(modes, [MoveMode::Backward, MoveMode::SlideLeft]);
    }

    #[test]
    fn timeout_returns_to_idle() {
        let io = FakeIo::default();
        let mut r = MissionRunner::new(io, NoDelay, MissionConfig::DEFAULT.with_wait_timeout(50));
        r.state = MissionState::ScanCode;
        assert_eq!(
            block_on(r.run_state()),
            Err(MissionError::Timeout(WaitKind::Scan))
        );
        assert_eq!(r.state(), MissionState::Idle);
        assert!(r.io().halted);
    }
}
