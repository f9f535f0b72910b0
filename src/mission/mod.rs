// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Mission
//!
//! The competition run as an explicit state machine. [`state`] holds the cursor and the pure
//! transition function, [`script`] expands each state into actions, and [`runner`] performs
//! them through the [`MissionIo`] seam so the whole run can be replayed on the host.

pub mod align;
pub mod io;
pub mod plan;
pub mod runner;
pub mod script;
pub mod state;

pub use io::SharedIo;
pub use plan::{Batch, Color, MissionPlan, ScanError};
pub use runner::{MissionError, MissionIo, MissionRunner, WaitKind};
pub use script::{script, Action, Script};
pub use state::{transition, MissionEvent, MissionState};

/// Advance on `event` and expand the state entered.
pub fn step(
    state: MissionState,
    event: MissionEvent,
    plan: &MissionPlan,
    ring_offset: u8,
) -> (MissionState, Script) {
    let next = transition(state, event);
    (next, script(next, plan, ring_offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_expands_entered_state() {
        let (next, actions) = step(
            MissionState::Idle,
            MissionEvent::Start,
            &MissionPlan::DEFAULT,
            3,
        );
        assert_eq!(next, MissionState::ScanCode);
        assert_eq!(actions.last(), Some(&Action::AwaitScan));

        let (next, actions) = step(
            MissionState::GoHome,
            MissionEvent::Completed,
            &MissionPlan::DEFAULT,
            3,
        );
        assert_eq!(next, MissionState::Done);
        assert!(actions.is_empty());
    }
}
