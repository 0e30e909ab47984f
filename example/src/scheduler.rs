use std::cell::{Cell, RefCell};

use hashbrown::{HashMap, HashSet};
use swerve_teleop::{command::InterruptionBehavior, CommandRef, Result, Scheduler, SubsystemRef};

/// A small host-side command scheduler so the demo has something to run on.
///
/// Schedules and cancels requested while commands are executing are queued
/// and applied after the pass.
#[derive(Default)]
pub struct TickScheduler {
    subsystems: RefCell<HashMap<SubsystemRef, Option<CommandRef>>>,
    in_run_loop: Cell<bool>,
    to_schedule: RefCell<Vec<CommandRef>>,
    to_cancel: RefCell<Vec<CommandRef>>,
    scheduled_commands: RefCell<HashSet<CommandRef>>,
    requirements: RefCell<HashMap<SubsystemRef, CommandRef>>,
}

impl TickScheduler {
    fn requirements_of(command: &CommandRef) -> Vec<SubsystemRef> {
        command.borrow().get_requirements().to_vec()
    }

    fn release(&self, command: &CommandRef) {
        self.scheduled_commands.borrow_mut().remove(command);
        for requirement in Self::requirements_of(command) {
            self.requirements.borrow_mut().remove(&requirement);
        }
    }

    fn schedule_now(&self, command: &CommandRef) -> Result {
        if self.is_scheduled(command) {
            return Ok(());
        }

        let requirements = Self::requirements_of(command);
        let requiring = requirements
            .iter()
            .filter_map(|r| self.requirements.borrow().get(r).cloned())
            .collect::<Vec<_>>();

        for running in &requiring {
            if running.borrow().get_interruption_behavior() == InterruptionBehavior::CancelIncoming
            {
                return Ok(());
            }
        }
        for running in &requiring {
            self.cancel(running)?;
        }

        self.requirements
            .borrow_mut()
            .extend(requirements.into_iter().map(|r| (r, command.clone())));
        self.scheduled_commands.borrow_mut().insert(command.clone());
        command.borrow_mut().initialize()
    }

    /// One pass: subsystem periodics, scheduled commands, queued changes, then defaults.
    pub fn run(&self) -> Result {
        for subsystem in self.subsystems.borrow().keys() {
            let mut subsystem = subsystem.borrow_mut();
            subsystem.periodic();
            subsystem.sim_periodic();
        }

        self.in_run_loop.set(true);
        let scheduled = self
            .scheduled_commands
            .borrow()
            .iter()
            .cloned()
            .collect::<Vec<_>>();
        for command in scheduled {
            let finished = {
                let mut command = command.borrow_mut();
                command.execute()?;
                command.is_finished()?
            };
            if finished {
                command.borrow_mut().end(false)?;
                self.release(&command);
            }
        }
        self.in_run_loop.set(false);

        for command in self.to_schedule.take() {
            self.schedule_now(&command)?;
        }
        for command in self.to_cancel.take() {
            self.cancel(&command)?;
        }

        let idle = self
            .subsystems
            .borrow()
            .iter()
            .filter(|(subsystem, _)| !self.requirements.borrow().contains_key(*subsystem))
            .filter_map(|(_, default)| default.clone())
            .collect::<Vec<_>>();
        for default in idle {
            self.schedule_now(&default)?;
        }
        Ok(())
    }
}

impl Scheduler for TickScheduler {
    fn schedule(&self, command: &CommandRef) -> Result {
        if self.in_run_loop.get() {
            self.to_schedule.borrow_mut().push(command.clone());
            return Ok(());
        }
        self.schedule_now(command)
    }

    fn cancel(&self, command: &CommandRef) -> Result {
        if self.in_run_loop.get() {
            self.to_cancel.borrow_mut().push(command.clone());
            return Ok(());
        }
        if !self.is_scheduled(command) {
            return Ok(());
        }
        self.release(command);
        command.borrow_mut().end(true)
    }

    fn is_scheduled(&self, command: &CommandRef) -> bool {
        self.scheduled_commands.borrow().contains(command)
    }

    fn set_default_command(&self, subsystem: &SubsystemRef, command: CommandRef) -> Result {
        self.subsystems
            .borrow_mut()
            .insert(subsystem.clone(), Some(command));
        Ok(())
    }
}

