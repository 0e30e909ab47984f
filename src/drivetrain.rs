use core::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::{subsystem::Subsystem, Result};

/// A planar vector in meters or meters per second. `x` points forward, `y` left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation2d {
    pub x: f64,
    pub y: f64,
}

impl Translation2d {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm(&self) -> f64 {
        libm::hypot(self.x, self.y)
    }
}

impl Mul<f64> for Translation2d {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

/// The swerve drivetrain subsystem, provided by the robot program.
pub trait SwerveDrive: Subsystem {
    /// Command a chassis velocity.
    ///
    /// With `field_relative` the translation is interpreted in the field frame
    /// using the gyro heading. With `open_loop` the modules convert speed to
    /// output directly instead of running velocity feedback.
    fn drive(
        &mut self,
        translation: Translation2d,
        rotation: f64,
        field_relative: bool,
        open_loop: bool,
    ) -> Result;

    /// Treat the current heading as field-forward.
    fn zero_gyro(&mut self) -> Result;
}
