// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Mission states and the transition function.

/// Mission cursor. The run is linear from [`MissionState::ScanCode`] to [`MissionState::Done`];
/// the two batches use structurally identical state blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MissionState {
    Idle,
    ScanCode,
    GoPlate1,
    PickPlate1,
    GoFloor1,
    UnloadFloor1,
    ReloadFloor1,
    GoFloorEnd1,
    UnloadFloorEnd1,
    GoPlate2,
    PickPlate2,
    GoFloor2,
    UnloadFloor2,
    ReloadFloor2,
    GoFloorEnd2,
    StackFloorEnd2,
    GoHome,
    Done,
}

/// What ends a state's script.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MissionEvent {
    /// Start button pressed.
    Start,
    /// A valid task code was scanned.
    Scanned,
    /// Every action in the script finished.
    Completed,
}

impl MissionState {
    pub const ALL: [MissionState; 18] = [
        MissionState::Idle,
        MissionState::ScanCode,
        MissionState::GoPlate1,
        MissionState::PickPlate1,
        MissionState::GoFloor1,
        MissionState::UnloadFloor1,
        MissionState::ReloadFloor1,
        MissionState::GoFloorEnd1,
        MissionState::UnloadFloorEnd1,
        MissionState::GoPlate2,
        MissionState::PickPlate2,
        MissionState::GoFloor2,
        MissionState::UnloadFloor2,
        MissionState::ReloadFloor2,
        MissionState::GoFloorEnd2,
        MissionState::StackFloorEnd2,
        MissionState::GoHome,
        MissionState::Done,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Next state in the linear run. `Done` wraps to `Idle`.
    pub fn successor(self) -> MissionState {
        Self::ALL
            .get(self.index() + 1)
            .copied()
            .unwrap_or(MissionState::Idle)
    }
}

/// Pure transition function. Pairs not listed leave the state unchanged.
pub fn transition(state: MissionState, event: MissionEvent) -> MissionState {
    match (state, event) {
        (MissionState::Idle, MissionEvent::Start) => MissionState::ScanCode,
        (MissionState::ScanCode, MissionEvent::Scanned) => MissionState::GoPlate1,
        (MissionState::Idle | MissionState::ScanCode, _) => state,
        (_, MissionEvent::Completed) => state.successor(),
        _ => state,
    }
}
