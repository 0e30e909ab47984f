//! Declares the robot: its drivetrain, driver controls and button bindings.
//!
//! | Control            | Action                                             |
//! |--------------------|----------------------------------------------------|
//! | left stick Y / X   | translate / strafe                                 |
//! | right stick X      | rotate                                             |
//! | Start (held)       | robot-centric driving                              |
//! | Y                  | zero the gyro                                      |
//! | X                  | drive to the staging point, field-relative         |
//! | right bumper (held)| boost speed cap                                    |
//! | left bumper (held) | precision speed cap                                |

use alloc::rc::Rc;
use core::cell::RefCell;

use snafu::ResultExt;

use crate::{
    command::{button::Trigger, speed::ChangeMaxSpeed, teleop::TeleopSwerve},
    config::{DriveConfig, SpeedPresets},
    drivetrain::{SwerveDrive, Translation2d},
    event::EventLoop,
    input::{Button, DriveMapping, DriverControls, Gamepad, SpeedCap},
    subsystem::SubsystemRefExt,
    CommandRef, InvalidConfigSnafu, Result, Scheduler, SubsystemRef,
};

/// Field position the X button drives towards.
pub const STAGING_POINT: Translation2d = Translation2d::new(14.21, 4.05);

pub struct RobotContainer<D, G> {
    drivetrain: Rc<RefCell<D>>,
    gamepad: Rc<G>,
    scheduler: Rc<dyn Scheduler>,
    event_loop: Rc<RefCell<EventLoop>>,
    speed_cap: SpeedCap,
    presets: SpeedPresets,
    teleop: CommandRef,
}

impl<D, G> RobotContainer<D, G>
where
    D: SwerveDrive + 'static,
    G: Gamepad + 'static,
{
    /// Build the teleop default command, hand it to the scheduler and bind the buttons.
    pub fn new(
        drivetrain: Rc<RefCell<D>>,
        gamepad: Rc<G>,
        scheduler: Rc<dyn Scheduler>,
        config: DriveConfig,
        presets: SpeedPresets,
    ) -> Result<Self> {
        presets.validate().context(InvalidConfigSnafu)?;
        let speed_cap = SpeedCap::new(presets.drive);

        let controls = DriverControls::new(gamepad.clone(), speed_cap.clone(), DriveMapping::default());
        let teleop = TeleopSwerve::new(drivetrain.clone(), controls, config)?;
        let teleop = CommandRef::from(teleop);
        scheduler.set_default_command(&SubsystemRef::new(&drivetrain), teleop.clone())?;

        let container = Self {
            drivetrain,
            gamepad,
            scheduler,
            event_loop: Rc::new(RefCell::new(EventLoop::default())),
            speed_cap,
            presets,
            teleop,
        };
        container.configure_button_bindings();
        tracing::info!(?config, ?presets, "robot container ready");
        Ok(container)
    }

    fn configure_button_bindings(&self) {
        let drivetrain = self.drivetrain.clone();
        self.button(Button::Y)
            .on_true(self.drivetrain.run_once(move || drivetrain.borrow_mut().zero_gyro()));

        let drivetrain = self.drivetrain.clone();
        self.button(Button::X).on_true(self.drivetrain.run_once(move || {
            drivetrain
                .borrow_mut()
                .drive(STAGING_POINT, 0.0, true, false)
        }));

        self.button(Button::RightBumper).while_true(ChangeMaxSpeed::new(
            self.speed_cap.clone(),
            self.presets.boost,
        ));
        self.button(Button::LeftBumper).while_true(ChangeMaxSpeed::new(
            self.speed_cap.clone(),
            self.presets.precision,
        ));
    }

    /// A trigger on one of the driver's buttons, polled with the other bindings.
    pub fn button(&self, button: Button) -> Trigger {
        Trigger::button(
            self.event_loop.clone(),
            self.scheduler.clone(),
            self.gamepad.clone(),
            button,
        )
    }

    /// Check every binding. Call once per tick, before the scheduler runs commands.
    pub fn poll_bindings(&self) {
        self.event_loop.borrow_mut().poll();
    }

    pub fn teleop_command(&self) -> &CommandRef {
        &self.teleop
    }

    pub fn speed_cap(&self) -> &SpeedCap {
        &self.speed_cap
    }

    pub fn drivetrain(&self) -> &Rc<RefCell<D>> {
        &self.drivetrain
    }
}
