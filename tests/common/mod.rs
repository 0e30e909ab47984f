#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use swerve_teleop::{
    command::{Command, InterruptionBehavior},
    drivetrain::{SwerveDrive, Translation2d},
    input::{Axis, Button, Gamepad},
    subsystem::Subsystem,
    CommandRef, DrivetrainSnafu, Result, Scheduler, SubsystemRef,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveCall {
    pub translation: Translation2d,
    pub rotation: f64,
    pub field_relative: bool,
    pub open_loop: bool,
}

#[derive(Debug, Default)]
pub struct MockSwerve {
    pub calls: Vec<DriveCall>,
    pub gyro_zeroed: usize,
    pub fail_drive: bool,
}

impl MockSwerve {
    pub fn last(&self) -> DriveCall {
        *self.calls.last().expect("drive was never called")
    }
}

impl Subsystem for MockSwerve {}

impl SwerveDrive for MockSwerve {
    fn drive(
        &mut self,
        translation: Translation2d,
        rotation: f64,
        field_relative: bool,
        open_loop: bool,
    ) -> Result {
        if self.fail_drive {
            return DrivetrainSnafu {
                message: "module fault",
            }
            .fail();
        }
        self.calls.push(DriveCall {
            translation,
            rotation,
            field_relative,
            open_loop,
        });
        Ok(())
    }

    fn zero_gyro(&mut self) -> Result {
        self.gyro_zeroed += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockGamepad {
    axes: RefCell<HashMap<Axis, f64>>,
    buttons: RefCell<HashMap<Button, bool>>,
}

impl MockGamepad {
    pub fn set_axis(&self, axis: Axis, value: f64) {
        self.axes.borrow_mut().insert(axis, value);
    }

    pub fn set_button(&self, button: Button, pressed: bool) {
        self.buttons.borrow_mut().insert(button, pressed);
    }
}

impl Gamepad for MockGamepad {
    fn axis(&self, axis: Axis) -> f64 {
        self.axes.borrow().get(&axis).copied().unwrap_or(0.0)
    }

    fn button(&self, button: Button) -> bool {
        self.buttons.borrow().get(&button).copied().unwrap_or(false)
    }
}

/// Just enough of a command scheduler to drive the bindings in tests.
#[derive(Default)]
pub struct TestScheduler {
    scheduled: RefCell<Vec<CommandRef>>,
    defaults: RefCell<Vec<(SubsystemRef, CommandRef)>>,
    pub ticks: Cell<usize>,
}

impl TestScheduler {
    fn requires(command: &CommandRef, subsystem: &SubsystemRef) -> bool {
        command.borrow().get_requirements().contains(subsystem)
    }

    fn conflicts(&self, command: &CommandRef) -> Vec<CommandRef> {
        let requirements = command.borrow().get_requirements().to_vec();
        self.scheduled
            .borrow()
            .iter()
            .filter(|running| requirements.iter().any(|r| Self::requires(running, r)))
            .cloned()
            .collect()
    }

    /// One scheduler pass: execute everything, retire finished commands,
    /// then fill idle subsystems with their default commands.
    pub fn run(&self) -> Result {
        self.ticks.set(self.ticks.get() + 1);
        let scheduled = self.scheduled.borrow().clone();
        for command in scheduled {
            let finished = {
                let mut command = command.borrow_mut();
                command.execute()?;
                command.is_finished()?
            };
            if finished {
                command.borrow_mut().end(false)?;
                self.scheduled.borrow_mut().retain(|c| c != &command);
            }
        }

        let defaults = self.defaults.borrow().clone();
        for (subsystem, command) in defaults {
            let idle = !self
                .scheduled
                .borrow()
                .iter()
                .any(|running| Self::requires(running, &subsystem));
            if idle {
                self.schedule(&command)?;
            }
        }
        Ok(())
    }
}

impl Scheduler for TestScheduler {
    fn schedule(&self, command: &CommandRef) -> Result {
        if self.is_scheduled(command) {
            return Ok(());
        }
        let conflicts = self.conflicts(command);
        if conflicts.iter().any(|c| {
            c.borrow().get_interruption_behavior() == InterruptionBehavior::CancelIncoming
        }) {
            return Ok(());
        }
        for running in &conflicts {
            self.cancel(running)?;
        }
        command.borrow_mut().initialize()?;
        self.scheduled.borrow_mut().push(command.clone());
        Ok(())
    }

    fn cancel(&self, command: &CommandRef) -> Result {
        if !self.is_scheduled(command) {
            return Ok(());
        }
        self.scheduled.borrow_mut().retain(|c| c != command);
        command.borrow_mut().end(true)
    }

    fn is_scheduled(&self, command: &CommandRef) -> bool {
        self.scheduled.borrow().contains(command)
    }

    fn set_default_command(&self, subsystem: &SubsystemRef, command: CommandRef) -> Result {
        self.defaults
            .borrow_mut()
            .retain(|(existing, _)| existing != subsystem);
        self.defaults.borrow_mut().push((subsystem.clone(), command));
        Ok(())
    }
}
