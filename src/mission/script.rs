// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Per-state action scripts.
//!
//! [`script`] expands a state into the ordered actions the runner executes. It is a pure
//! function of the state and the scanned plan, so the whole route can be checked without
//! hardware. Distances are in mm, speeds in mm/s, turns are absolute headings in degrees.

use heapless::Vec;

use super::plan::{Batch, Color, MissionPlan};
use super::state::MissionState;
use crate::arm::ArmTask;
use crate::chassis::{MotionCommand, MoveMode};

pub const SCRIPT_CAPACITY: usize = 24;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Action {
    /// Wait for the start button.
    AwaitStart,
    /// Take the current heading as zero.
    RezeroHeading,
    /// Wait for a valid task code; ends the state with [`super::MissionEvent::Scanned`].
    AwaitScan,
    /// Issue a motion command and wait for it to finish.
    Drive(MotionCommand),
    /// Run an arm task and wait for it to finish.
    Arm(ArmTask),
    /// Let the mechanics and the camera settle, ms.
    Settle(u32),
    /// Wait until the camera reports an item of this color.
    AwaitTarget(Color),
    /// Nudge the chassis until the ring with camera id `ring` sits under the gripper.
    Align {
        ring: u8,
        speed_mm_s: f32,
        distance_mm: f32,
    },
}

pub type Script = Vec<Action, SCRIPT_CAPACITY>;

/// Slot spacing on the floor: slot 2 is ahead of slot 1, slot 3 behind it.
const SLOT_AHEAD_MM: f32 = 150.0;
const SLOT_BEHIND_MM: f32 = 300.0;

/// Forward and backward speeds for the moves between the three floor slots.
#[derive(Copy, Clone)]
struct SlotMoves {
    ahead: f32,
    behind: f32,
}

#[derive(Copy, Clone)]
struct Nudge {
    speed: f32,
    distance: f32,
}

const FINE_NUDGE: Nudge = Nudge {
    speed: 20.0,
    distance: 10.0,
};
const COARSE_NUDGE: Nudge = Nudge {
    speed: 50.0,
    distance: 15.0,
};

pub fn script(state: MissionState, plan: &MissionPlan, ring_offset: u8) -> Script {
    use MissionState::*;

    let s = ScriptBuilder::new();
    match state {
        Idle => s.then(Action::AwaitStart),
        ScanCode => s
            .then(Action::RezeroHeading)
            .drive(MoveMode::SlideLeft, 100.0, 132.0)
            .drive(MoveMode::Forward, 300.0, 686.0)
            .then(Action::AwaitScan),
        GoPlate1 => s.drive(MoveMode::Forward, 300.0, 699.0),
        PickPlate1 => s.pick_batch(plan.batch(Batch::First)),
        GoFloor1 => s.go_floor(550.0, 1672.0),
        UnloadFloor1 => s.unload(
            rings(plan, Batch::First, ring_offset),
            SlotMoves {
                ahead: 100.0,
                behind: 200.0,
            },
            FINE_NUDGE,
            ArmTask::PlaceToFloor,
        ),
        ReloadFloor1 => s.reload(SlotMoves {
            ahead: 400.0,
            behind: 500.0,
        }),
        GoFloorEnd1 => s.go_floor_end(360.0, 876.0),
        UnloadFloorEnd1 => s.unload(
            rings(plan, Batch::First, ring_offset),
            SlotMoves {
                ahead: 200.0,
                behind: 250.0,
            },
            COARSE_NUDGE,
            ArmTask::PlaceToFloor,
        ),
        GoPlate2 => s
            .drive(MoveMode::Backward, 466.0, 565.0)
            .turn(0.0)
            .drive(MoveMode::Backward, 350.0, 369.0),
        PickPlate2 => s.pick_batch(plan.batch(Batch::Second)),
        GoFloor2 => s.go_floor(600.0, 1665.0),
        UnloadFloor2 => s.unload(
            rings(plan, Batch::Second, ring_offset),
            SlotMoves {
                ahead: 100.0,
                behind: 100.0,
            },
            COARSE_NUDGE,
            ArmTask::PlaceToFloor,
        ),
        ReloadFloor2 => s.reload(SlotMoves {
            ahead: 200.0,
            behind: 250.0,
        }),
        GoFloorEnd2 => s.go_floor_end(450.0, 874.0),
        // Second layer goes on top of the first batch, so align on the first batch's rings.
        StackFloorEnd2 => s.unload(
            rings(plan, Batch::First, ring_offset),
            SlotMoves {
                ahead: 150.0,
                behind: 250.0,
            },
            COARSE_NUDGE,
            ArmTask::PlaceToStack,
        ),
        GoHome => s
            .then(Action::Arm(ArmTask::Stow))
            .then(Action::Settle(500))
            .drive(MoveMode::Backward, 450.0, 1090.0)
            .turn(0.0)
            .drive(MoveMode::Backward, 700.0, 2162.0)
            .drive(MoveMode::SlideRight, 300.0, 120.0),
        Done => s,
    }
    .build()
}

fn rings(plan: &MissionPlan, batch: Batch, offset: u8) -> [u8; 3] {
    plan.batch(batch).map(|c| c.ring_id(offset))
}

struct ScriptBuilder {
    actions: Script,
}

impl ScriptBuilder {
    fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    fn then(mut self, action: Action) -> Self {
        let pushed = self.actions.push(action).is_ok();
        debug_assert!(pushed, "mission script overflow");
        self
    }

    fn drive(self, mode: MoveMode, speed: f32, distance: f32) -> Self {
        self.then(Action::Drive(MotionCommand::drive(mode, speed, distance)))
    }

    fn turn(self, heading: f32) -> Self {
        self.then(Action::Drive(MotionCommand::turn_absolute(heading)))
    }

    /// Move from one floor slot to the next before working slot `index` (0-based).
    fn to_slot(self, index: usize, moves: SlotMoves) -> Self {
        match index {
            1 => self.drive(MoveMode::Forward, moves.ahead, SLOT_AHEAD_MM),
            2 => self.drive(MoveMode::Backward, moves.behind, SLOT_BEHIND_MM),
            _ => self,
        }
    }

    fn ready(self, settle_ms: u32) -> Self {
        self.then(Action::Arm(ArmTask::Ready))
            .then(Action::Settle(settle_ms))
    }

    fn pick_batch(self, colors: &[Color; 3]) -> Self {
        colors.iter().enumerate().fold(self, |s, (i, &color)| {
            s.ready(1000)
                .then(Action::AwaitTarget(color))
                .then(Action::Arm(ArmTask::PickFromRaw))
                .then(Action::Arm(ArmTask::PlaceToCar(i as u8 + 1)))
        })
    }

    fn go_floor(self, speed: f32, distance: f32) -> Self {
        self.drive(MoveMode::Backward, 350.0, 323.0)
            .turn(270.0)
            .drive(MoveMode::Backward, speed, distance)
            .turn(180.0)
    }

    fn go_floor_end(self, speed: f32, first_leg: f32) -> Self {
        self.drive(MoveMode::Backward, speed, first_leg)
            .turn(90.0)
            .drive(MoveMode::Backward, speed, 864.0)
    }

    fn unload(self, rings: [u8; 3], moves: SlotMoves, nudge: Nudge, place: ArmTask) -> Self {
        rings.iter().enumerate().fold(self, |s, (i, &ring)| {
            s.to_slot(i, moves)
                .ready(1500)
                .then(Action::Align {
                    ring,
                    speed_mm_s: nudge.speed,
                    distance_mm: nudge.distance,
                })
                .then(Action::Arm(ArmTask::PickFromCar(i as u8 + 1)))
                .then(Action::Arm(place))
        })
    }

    fn reload(self, moves: SlotMoves) -> Self {
        let s = self.drive(MoveMode::Forward, 50.0, SLOT_AHEAD_MM);
        (0..3).fold(s, |s, i| {
            s.to_slot(i, moves)
                .ready(800)
                .then(Action::Arm(ArmTask::PickFromFloor))
                .then(Action::Arm(ArmTask::PlaceToCar(i as u8 + 1)))
        })
    }

    fn build(self) -> Script {
        self.actions
    }
}
