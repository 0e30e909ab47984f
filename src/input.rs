//! Where driver input comes from.
//!
//! The conditioner never reads a device itself. It is handed a
//! [`DriveSample`] built from a [`TeleopInputs`] implementation, which for the
//! real robot is [`DriverControls`]: a gamepad plus the shared [`SpeedCap`].

use alloc::{rc::Rc, vec::Vec};
use core::cell::RefCell;

use crate::conditioner::DriveSample;

/// Analog axes of an Xbox-style gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

/// Digital buttons of an Xbox-style gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    Back,
    Start,
    LeftStick,
    RightStick,
}

/// A driver station gamepad. Stick axes read in [-1, 1] with +Y pointing down,
/// the usual HID convention.
pub trait Gamepad {
    fn axis(&self, axis: Axis) -> f64;
    fn button(&self, button: Button) -> bool;
}

#[derive(Debug)]
struct CapState {
    resting: f64,
    /// Active overrides, oldest first.
    holds: Vec<(u32, f64)>,
    next_id: u32,
}

impl CapState {
    fn current(&self) -> f64 {
        self.holds.last().map_or(self.resting, |&(_, value)| value)
    }
}

/// Identifies one override placed with [`SpeedCap::hold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapHold(u32);

/// The current speed cap, shared between the teleop command that reads it and
/// the modifier commands that change it.
///
/// The cap is the most recent override still held, or the resting value when
/// none is. Releasing an override that is not the newest leaves the cap alone.
#[derive(Debug, Clone)]
pub struct SpeedCap(Rc<RefCell<CapState>>);

impl SpeedCap {
    pub fn new(resting: f64) -> Self {
        Self(Rc::new(RefCell::new(CapState {
            resting,
            holds: Vec::new(),
            next_id: 0,
        })))
    }

    pub fn get(&self) -> f64 {
        self.0.borrow().current()
    }

    pub fn set_resting(&self, value: f64) {
        self.update(|state| state.resting = value);
    }

    /// Override the cap with `value` until the returned hold is released.
    pub fn hold(&self, value: f64) -> CapHold {
        self.update(|state| {
            let id = state.next_id;
            state.next_id = state.next_id.wrapping_add(1);
            state.holds.push((id, value));
            CapHold(id)
        })
    }

    pub fn release(&self, hold: CapHold) {
        self.update(|state| state.holds.retain(|&(id, _)| id != hold.0));
    }

    fn update<T>(&self, change: impl FnOnce(&mut CapState) -> T) -> T {
        let mut state = self.0.borrow_mut();
        let previous = state.current();
        let out = change(&mut *state);
        let value = state.current();
        if previous != value {
            tracing::debug!(previous, value, "speed cap changed");
        }
        out
    }
}

/// Everything the teleop drive command reads each tick.
pub trait TeleopInputs {
    /// Forward/back demand, +1 forward.
    fn translation(&self) -> f64;
    /// Sideways demand, +1 left.
    fn strafe(&self) -> f64;
    /// Turn demand, +1 counter-clockwise.
    fn rotation(&self) -> f64;
    fn robot_centric(&self) -> bool;
    fn speed_cap(&self) -> f64;

    fn sample(&self) -> DriveSample {
        DriveSample {
            translation: self.translation(),
            strafe: self.strafe(),
            rotation: self.rotation(),
            speed_cap: self.speed_cap(),
            robot_centric: self.robot_centric(),
        }
    }
}

/// Which gamepad controls feed which drive channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveMapping {
    pub translation: Axis,
    pub strafe: Axis,
    pub rotation: Axis,
    pub robot_centric: Button,
    /// Negate every axis, turning HID "down/right is positive" into robot
    /// "forward/left/counter-clockwise is positive".
    pub inverted: bool,
}

impl Default for DriveMapping {
    fn default() -> Self {
        Self {
            translation: Axis::LeftY,
            strafe: Axis::LeftX,
            rotation: Axis::RightX,
            robot_centric: Button::Start,
            inverted: true,
        }
    }
}

/// [`TeleopInputs`] read from a gamepad.
#[derive(Debug)]
pub struct DriverControls<G> {
    gamepad: Rc<G>,
    speed_cap: SpeedCap,
    mapping: DriveMapping,
}

impl<G: Gamepad> DriverControls<G> {
    pub fn new(gamepad: Rc<G>, speed_cap: SpeedCap, mapping: DriveMapping) -> Self {
        Self {
            gamepad,
            speed_cap,
            mapping,
        }
    }

    fn read(&self, axis: Axis) -> f64 {
        let value = self.gamepad.axis(axis);
        if self.mapping.inverted {
            -value
        } else {
            value
        }
    }
}

impl<G: Gamepad> TeleopInputs for DriverControls<G> {
    fn translation(&self) -> f64 {
        self.read(self.mapping.translation)
    }

    fn strafe(&self) -> f64 {
        self.read(self.mapping.strafe)
    }

    fn rotation(&self) -> f64 {
        self.read(self.mapping.rotation)
    }

    fn robot_centric(&self) -> bool {
        self.gamepad.button(self.mapping.robot_centric)
    }

    fn speed_cap(&self) -> f64 {
        self.speed_cap.get()
    }
}
