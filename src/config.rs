//! Drive tuning constants.
//!
//! Everything here is fixed once a conditioner or container is built. Both
//! structs deserialize with serde, and every missing field falls back to the
//! competition defaults, so a partial table only needs to name what it changes.

use core::time::Duration;

use serde::{Deserialize, Serialize};
use snafu::{ensure, Snafu};

/// Scheduler loop period.
pub const ITERATION_PERIOD: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("stick deadband must lie in [0, 1), got {value}"))]
    Deadband { value: f64 },
    #[snafu(display("{channel} slew rate must be positive, got {value}"))]
    SlewRate { channel: &'static str, value: f64 },
    #[snafu(display("maximum drive speed must be positive, got {value}"))]
    MaxSpeed { value: f64 },
    #[snafu(display("maximum angular velocity must be positive, got {value}"))]
    MaxAngularVelocity { value: f64 },
    #[snafu(display("control period must be positive, got {value}s"))]
    ControlPeriod { value: f64 },
    #[snafu(display("snap-to-zero fraction must lie in [0, 1), got {value}"))]
    SnapFraction { value: f64 },
    #[snafu(display("{name} speed must be finite and non-negative, got {value}"))]
    SpeedPreset { name: &'static str, value: f64 },
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn unit_fraction(value: f64) -> bool {
    (0.0..1.0).contains(&value)
}

/// Swerve teleop tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Stick magnitudes below this read as zero.
    pub deadband: f64,
    /// Max change per second of the translation and strafe channels.
    pub translation_slew_rate: f64,
    /// Max change per second of the rotation channel.
    pub rotation_slew_rate: f64,
    /// Full-scale linear speed of the drivetrain (m/s).
    pub max_speed: f64,
    /// Full-scale angular velocity of the drivetrain (rad/s).
    pub max_angular_velocity: f64,
    /// Seconds between conditioner updates.
    pub control_period_s: f64,
    /// Outputs at or below this fraction of full scale are forced to zero.
    pub snap_fraction: f64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            deadband: 0.1,
            translation_slew_rate: 1.8,
            rotation_slew_rate: 1.5,
            max_speed: 4.5,
            max_angular_velocity: 10.0,
            control_period_s: ITERATION_PERIOD.as_secs_f64(),
            snap_fraction: 0.01,
        }
    }
}

impl DriveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(
            unit_fraction(self.deadband),
            DeadbandSnafu {
                value: self.deadband
            }
        );
        ensure!(
            positive(self.translation_slew_rate),
            SlewRateSnafu {
                channel: "translation",
                value: self.translation_slew_rate,
            }
        );
        ensure!(
            positive(self.rotation_slew_rate),
            SlewRateSnafu {
                channel: "rotation",
                value: self.rotation_slew_rate,
            }
        );
        ensure!(
            positive(self.max_speed),
            MaxSpeedSnafu {
                value: self.max_speed
            }
        );
        ensure!(
            positive(self.max_angular_velocity),
            MaxAngularVelocitySnafu {
                value: self.max_angular_velocity
            }
        );
        ensure!(
            positive(self.control_period_s),
            ControlPeriodSnafu {
                value: self.control_period_s
            }
        );
        ensure!(
            unit_fraction(self.snap_fraction),
            SnapFractionSnafu {
                value: self.snap_fraction
            }
        );
        Ok(())
    }
}

/// Speed caps the driver switches between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedPresets {
    /// Cap while no modifier is held.
    pub drive: f64,
    /// Cap while boost is held.
    pub boost: f64,
    /// Cap while precision is held.
    pub precision: f64,
}

impl Default for SpeedPresets {
    fn default() -> Self {
        Self {
            drive: 0.7,
            boost: 1.0,
            precision: 0.3,
        }
    }
}

impl SpeedPresets {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("drive", self.drive),
            ("boost", self.boost),
            ("precision", self.precision),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                SpeedPresetSnafu { name, value }
            );
        }
        Ok(())
    }
}
