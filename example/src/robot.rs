use std::{cell::RefCell, rc::Rc};

use swerve_teleop::{
    config::{DriveConfig, SpeedPresets},
    container::RobotContainer,
    Result,
};

use crate::{
    gamepad::{ScriptedGamepad, LAP},
    scheduler::TickScheduler,
    subsystems::drivetrain::SimSwerve,
};

pub struct Robot {
    container: RobotContainer<SimSwerve, ScriptedGamepad>,
    scheduler: Rc<TickScheduler>,
    gamepad: Rc<ScriptedGamepad>,
}

impl Robot {
    pub fn new(phase_ticks: u32) -> Result<Self> {
        let drivetrain = Rc::new(RefCell::new(SimSwerve::default()));
        let gamepad = Rc::new(ScriptedGamepad::new(LAP, phase_ticks));
        let scheduler = Rc::new(TickScheduler::default());
        let container = RobotContainer::new(
            drivetrain,
            gamepad.clone(),
            scheduler.clone(),
            DriveConfig::default(),
            SpeedPresets::default(),
        )?;

        Ok(Self {
            container,
            scheduler,
            gamepad,
        })
    }

    pub fn total_ticks(&self) -> u32 {
        self.gamepad.total_ticks()
    }

    /// One robot loop iteration.
    pub fn periodic(&mut self) -> Result {
        self.container.poll_bindings();
        self.scheduler.run()?;
        if self.gamepad.advance() {
            tracing::info!(
                phase = self.gamepad.phase_name(),
                speed_cap = self.container.speed_cap().get(),
                "next phase"
            );
        }
        Ok(())
    }

    pub fn final_speed(&self) -> f64 {
        self.container.drivetrain().borrow().speed()
    }
}
