use alloc::{rc::Rc, vec, vec::Vec};
use core::cell::RefCell;

use snafu::ResultExt;

use super::Command;
use crate::{
    conditioner::TeleopConditioner,
    config::DriveConfig,
    drivetrain::SwerveDrive,
    input::TeleopInputs,
    InvalidConfigSnafu, Result, SubsystemRef,
};

/// Drives the swerve from the sticks. Meant to be the drivetrain's default command.
pub struct TeleopSwerve<D, I> {
    drivetrain: Rc<RefCell<D>>,
    inputs: I,
    conditioner: TeleopConditioner,
    requirements: Vec<SubsystemRef>,
}

impl<D, I> TeleopSwerve<D, I>
where
    D: SwerveDrive + 'static,
    I: TeleopInputs,
{
    pub fn new(drivetrain: Rc<RefCell<D>>, inputs: I, config: DriveConfig) -> Result<Self> {
        let conditioner = TeleopConditioner::new(config).context(InvalidConfigSnafu)?;
        Ok(Self {
            requirements: vec![SubsystemRef::new(&drivetrain)],
            drivetrain,
            inputs,
            conditioner,
        })
    }
}

impl<D, I> Command for TeleopSwerve<D, I>
where
    D: SwerveDrive + 'static,
    I: TeleopInputs,
{
    fn get_requirements(&self) -> &[SubsystemRef] {
        &self.requirements
    }

    fn initialize(&mut self) -> Result {
        self.conditioner.reset();
        Ok(())
    }

    fn execute(&mut self) -> Result {
        let command = self
            .conditioner
            .compute_velocity_command(self.inputs.sample());
        self.drivetrain.borrow_mut().drive(
            command.translation,
            command.rotation,
            command.field_relative,
            command.open_loop,
        )
    }
}
