use alloc::{boxed::Box, vec::Vec};

use crate::{Result, SubsystemRef};

pub mod button;
pub mod speed;
pub mod teleop;

/// An action the robot can perform. Runs when scheduled, until it is interrupted or it finishes.
pub trait Command {
    /// Subsystems this command needs exclusive use of while it runs.
    fn get_requirements(&self) -> &[SubsystemRef];

    /// The initial subroutine of a command. Called once when the command is initially scheduled.
    fn initialize(&mut self) -> Result {
        Ok(())
    }
    /// Called once per scheduler run while the command is scheduled.
    fn execute(&mut self) -> Result {
        Ok(())
    }
    /// Called once when the command ends, either by finishing or by being interrupted.
    #[allow(unused_variables)]
    fn end(&mut self, interrupted: bool) -> Result {
        Ok(())
    }

    fn is_finished(&self) -> Result<bool> {
        Ok(false)
    }

    fn runs_when_disabled(&self) -> bool {
        false
    }

    fn get_interruption_behavior(&self) -> InterruptionBehavior {
        InterruptionBehavior::default()
    }
}

/// What happens when another command wants a subsystem this command requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptionBehavior {
    #[default]
    CancelSelf,
    CancelIncoming,
}

/// A command assembled from closures.
pub struct FunctionalCommand {
    on_init: Box<dyn FnMut() -> Result>,
    on_execute: Box<dyn FnMut() -> Result>,
    on_end: Box<dyn FnMut(bool) -> Result>,
    is_finished: Box<dyn Fn() -> Result<bool>>,
    requirements: Vec<SubsystemRef>,
}

impl FunctionalCommand {
    pub fn new(
        on_init: impl FnMut() -> Result + 'static,
        on_execute: impl FnMut() -> Result + 'static,
        on_end: impl FnMut(bool) -> Result + 'static,
        is_finished: impl Fn() -> Result<bool> + 'static,
        requirements: Vec<SubsystemRef>,
    ) -> Self {
        Self {
            on_init: Box::new(on_init),
            on_execute: Box::new(on_execute),
            on_end: Box::new(on_end),
            is_finished: Box::new(is_finished),
            requirements,
        }
    }

    /// A command that runs `action` when scheduled and finishes straight away.
    pub fn instant(
        action: impl FnMut() -> Result + 'static,
        requirements: Vec<SubsystemRef>,
    ) -> Self {
        Self::new(action, || Ok(()), |_| Ok(()), || Ok(true), requirements)
    }
}

impl Command for FunctionalCommand {
    fn get_requirements(&self) -> &[SubsystemRef] {
        &self.requirements
    }

    fn initialize(&mut self) -> Result {
        (self.on_init)()
    }

    fn execute(&mut self) -> Result {
        (self.on_execute)()
    }

    fn end(&mut self, interrupted: bool) -> Result {
        (self.on_end)(interrupted)
    }

    fn is_finished(&self) -> Result<bool> {
        (self.is_finished)()
    }
}
