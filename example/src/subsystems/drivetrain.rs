use swerve_teleop::{
    drivetrain::{SwerveDrive, Translation2d},
    subsystem::Subsystem,
    Result,
};

/// Stands in for the swerve modules: remembers the last request and logs it once per tick.
#[derive(Debug, Default)]
pub struct SimSwerve {
    tick_number: u32,
    translation: Translation2d,
    rotation: f64,
    field_relative: bool,
    open_loop: bool,
}

impl SimSwerve {
    pub fn speed(&self) -> f64 {
        self.translation.norm()
    }
}

impl SwerveDrive for SimSwerve {
    fn drive(
        &mut self,
        translation: Translation2d,
        rotation: f64,
        field_relative: bool,
        open_loop: bool,
    ) -> Result {
        self.translation = translation;
        self.rotation = rotation;
        self.field_relative = field_relative;
        self.open_loop = open_loop;
        Ok(())
    }

    fn zero_gyro(&mut self) -> Result {
        tracing::info!(tick = self.tick_number, "gyro zeroed");
        Ok(())
    }
}

impl Subsystem for SimSwerve {
    fn periodic(&mut self) {
        tracing::info!(
            tick = self.tick_number,
            vx = format_args!("{:+.3}", self.translation.x),
            vy = format_args!("{:+.3}", self.translation.y),
            omega = format_args!("{:+.3}", self.rotation),
            field_relative = self.field_relative,
            open_loop = self.open_loop,
        );
        self.tick_number += 1;
    }
}
