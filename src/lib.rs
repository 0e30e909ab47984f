//! Teleoperated swerve drive wiring for a command-based robot.
//!
//! The heart of the crate is [`conditioner::TeleopConditioner`], which turns raw
//! joystick axes into a smooth, bounded [`conditioner::VelocityCommand`] once per
//! control tick. Around it sit the command-based pieces that put it to work:
//! the [`command::Command`] and [`subsystem::Subsystem`] seams, the
//! [`command::teleop::TeleopSwerve`] default command, trigger bindings and the
//! [`container::RobotContainer`] that declares the driver controls.
//!
//! Scheduling itself is done by an external [`Scheduler`].
#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::{rc::Rc, string::String};
use core::{cell::RefCell, hash::Hash, ops::Deref};

use command::Command;
use config::ConfigError;
use snafu::Snafu;
use subsystem::Subsystem;

pub mod command;
pub mod conditioner;
pub mod config;
pub mod container;
pub mod drivetrain;
pub mod event;
pub mod filter;
pub mod input;
pub mod subsystem;

/// Shared handle to a subsystem, compared by pointer identity.
#[derive(Clone)]
pub struct SubsystemRef(Rc<RefCell<dyn Subsystem>>);

impl SubsystemRef {
    pub fn new<S: Subsystem + 'static>(subsystem: &Rc<RefCell<S>>) -> Self {
        Self(subsystem.clone())
    }
}

impl PartialEq for SubsystemRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for SubsystemRef {}

impl Hash for SubsystemRef {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).cast::<()>().hash(state);
    }
}

impl From<Rc<RefCell<dyn Subsystem>>> for SubsystemRef {
    fn from(subsystem: Rc<RefCell<dyn Subsystem>>) -> Self {
        Self(subsystem)
    }
}

impl<T: Subsystem + 'static> From<T> for SubsystemRef {
    fn from(subsystem: T) -> Self {
        Self(Rc::new(RefCell::new(subsystem)))
    }
}

impl Deref for SubsystemRef {
    type Target = Rc<RefCell<dyn Subsystem>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl core::fmt::Debug for SubsystemRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SubsystemRef")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Shared handle to a command, compared by pointer identity.
#[derive(Clone)]
pub struct CommandRef(Rc<RefCell<dyn Command>>);

impl PartialEq for CommandRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for CommandRef {}

impl Hash for CommandRef {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).cast::<()>().hash(state);
    }
}

impl From<Rc<RefCell<dyn Command>>> for CommandRef {
    fn from(command: Rc<RefCell<dyn Command>>) -> Self {
        Self(command)
    }
}

impl<T: Command + 'static> From<T> for CommandRef {
    fn from(command: T) -> Self {
        Self(Rc::new(RefCell::new(command)))
    }
}

impl Deref for CommandRef {
    type Target = Rc<RefCell<dyn Command>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl core::fmt::Debug for CommandRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("CommandRef")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid drive configuration: {source}"))]
    InvalidConfig { source: ConfigError },
    #[snafu(display("Drivetrain rejected the request: {message}"))]
    Drivetrain { message: String },
    #[snafu(display("Scheduler rejected the request: {message}"))]
    Scheduler { message: String },
}

pub type Result<T = (), E = Error> = core::result::Result<T, E>;

/// The command scheduler the robot program runs on.
///
/// Scheduling is owned by the surrounding framework; this crate only hands
/// commands to it. Implementations are expected to be single-threaded and to
/// run every scheduled command's [`Command::execute`] once per control tick.
pub trait Scheduler {
    /// Schedule a command to run.
    fn schedule(&self, command: &CommandRef) -> Result;
    /// Interrupt a running command. Cancelling an idle command is not an error.
    fn cancel(&self, command: &CommandRef) -> Result;
    fn is_scheduled(&self, command: &CommandRef) -> bool;
    /// Run `command` whenever nothing else requires `subsystem`.
    fn set_default_command(&self, subsystem: &SubsystemRef, command: CommandRef) -> Result;
}
