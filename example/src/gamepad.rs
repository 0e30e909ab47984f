use std::cell::Cell;

use swerve_teleop::input::{Axis, Button, Gamepad};

/// One stretch of the scripted drive.
pub struct Phase {
    pub name: &'static str,
    pub axes: &'static [(Axis, f64)],
    pub buttons: &'static [Button],
}

/// A lap of the practice field, as stick positions. HID Y is down-positive.
pub const LAP: &[Phase] = &[
    Phase {
        name: "idle",
        axes: &[],
        buttons: &[],
    },
    Phase {
        name: "forward",
        axes: &[(Axis::LeftY, -1.0)],
        buttons: &[],
    },
    Phase {
        name: "forward, boost",
        axes: &[(Axis::LeftY, -1.0)],
        buttons: &[Button::RightBumper],
    },
    Phase {
        name: "strafe left and turn, precision",
        axes: &[(Axis::LeftX, -0.8), (Axis::RightX, -0.6)],
        buttons: &[Button::LeftBumper],
    },
    Phase {
        name: "robot-centric forward",
        axes: &[(Axis::LeftY, -0.5)],
        buttons: &[Button::Start],
    },
    Phase {
        name: "sticks released",
        axes: &[],
        buttons: &[],
    },
    Phase {
        name: "zero gyro",
        axes: &[],
        buttons: &[Button::Y],
    },
];

/// Plays back [`Phase`]s, each held for a fixed number of ticks.
pub struct ScriptedGamepad {
    phases: &'static [Phase],
    phase_ticks: u32,
    tick: Cell<u32>,
}

impl ScriptedGamepad {
    pub fn new(phases: &'static [Phase], phase_ticks: u32) -> Self {
        Self {
            phases,
            phase_ticks: phase_ticks.max(1),
            tick: Cell::new(0),
        }
    }

    pub fn total_ticks(&self) -> u32 {
        self.phases.len() as u32 * self.phase_ticks
    }

    fn phase(&self) -> Option<&Phase> {
        self.phases
            .get((self.tick.get() / self.phase_ticks) as usize)
    }

    pub fn phase_name(&self) -> &'static str {
        self.phase().map_or("done", |phase| phase.name)
    }

    /// Move to the next tick. Returns true when a new phase starts.
    pub fn advance(&self) -> bool {
        let tick = self.tick.get() + 1;
        self.tick.set(tick);
        tick % self.phase_ticks == 0
    }
}

impl Gamepad for ScriptedGamepad {
    fn axis(&self, axis: Axis) -> f64 {
        self.phase()
            .and_then(|phase| phase.axes.iter().find(|(a, _)| *a == axis))
            .map_or(0.0, |&(_, value)| value)
    }

    fn button(&self, button: Button) -> bool {
        self.phase()
            .is_some_and(|phase| phase.buttons.contains(&button))
    }
}
