//! Teleop drive signal conditioning.
//!
//! Every control tick the driver's three sticks go through the same chain,
//! independently per axis:
//!
//! 1. deadband, rescaled so full deflection is still 1
//! 2. signed square
//! 3. multiply by the current speed cap
//! 4. slew-rate limit against the channel's previous output
//! 5. scale to drivetrain units and snap tiny residuals to exactly zero
//!
//! Translation and strafe share a slew limit; rotation gets its own, smaller one.
//!
//! # Example
//! ```rust
//! use swerve_teleop::conditioner::{DriveSample, TeleopConditioner};
//! use swerve_teleop::config::DriveConfig;
//!
//! let mut conditioner = TeleopConditioner::new(DriveConfig::default()).unwrap();
//! let command = conditioner.compute_velocity_command(DriveSample {
//!     translation: 1.0,
//!     speed_cap: 1.0,
//!     ..Default::default()
//! });
//! assert!(command.translation.x > 0.0);
//! assert!(command.field_relative);
//! ```

use crate::{
    config::{ConfigError, DriveConfig},
    drivetrain::Translation2d,
    filter::{apply_deadband, shape_response, SlewRateLimiter},
};

/// Driver input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveSample {
    /// Forward/back stick, +1 is full forward.
    pub translation: f64,
    /// Sideways stick, +1 is full left.
    pub strafe: f64,
    /// Turning stick, +1 is full counter-clockwise.
    pub rotation: f64,
    /// Fraction of full speed the driver is allowed right now.
    pub speed_cap: f64,
    pub robot_centric: bool,
}

impl DriveSample {
    /// Clamp axes to [-1, 1] and the speed cap to non-negative. Non-finite
    /// readings become zero.
    pub fn sanitized(self) -> Self {
        Self {
            translation: clamp_axis("translation", self.translation),
            strafe: clamp_axis("strafe", self.strafe),
            rotation: clamp_axis("rotation", self.rotation),
            speed_cap: clamp_speed_cap(self.speed_cap),
            robot_centric: self.robot_centric,
        }
    }
}

fn clamp_axis(name: &str, value: f64) -> f64 {
    if !value.is_finite() {
        tracing::warn!(axis = name, value, "non-finite axis reading, using 0");
        return 0.0;
    }
    if !(-1.0..=1.0).contains(&value) {
        tracing::warn!(axis = name, value, "axis reading out of range, clamping");
    }
    value.clamp(-1.0, 1.0)
}

fn clamp_speed_cap(value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        tracing::warn!(value, "invalid speed cap, using 0");
        return 0.0;
    }
    value
}

/// What the drivetrain is told to do this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityCommand {
    /// Chassis velocity (m/s).
    pub translation: Translation2d,
    /// Angular velocity (rad/s), counter-clockwise positive.
    pub rotation: f64,
    pub field_relative: bool,
    /// Always true for teleop: velocity feedback is the drivetrain's business.
    pub open_loop: bool,
}

impl VelocityCommand {
    pub fn is_stopped(&self) -> bool {
        self.translation == Translation2d::ZERO && self.rotation == 0.0
    }
}

/// Turns raw stick readings into a [`VelocityCommand`], one tick at a time.
///
/// Holds the only state in the pipeline: one slew-rate limiter per channel.
#[derive(Debug, Clone)]
pub struct TeleopConditioner {
    config: DriveConfig,
    translation: SlewRateLimiter,
    strafe: SlewRateLimiter,
    rotation: SlewRateLimiter,
}

impl TeleopConditioner {
    pub fn new(config: DriveConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            translation: SlewRateLimiter::new(config.translation_slew_rate),
            strafe: SlewRateLimiter::new(config.translation_slew_rate),
            rotation: SlewRateLimiter::new(config.rotation_slew_rate),
            config,
        })
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Bring every channel back to rest.
    pub fn reset(&mut self) {
        self.translation.reset(0.0);
        self.strafe.reset(0.0);
        self.rotation.reset(0.0);
    }

    /// Deadbanded, shaped and capped value of one axis, before rate limiting.
    pub fn shape_axis(&self, raw: f64, speed_cap: f64) -> f64 {
        shape_response(apply_deadband(raw, self.config.deadband)) * speed_cap
    }

    /// Advance the conditioner by one control tick.
    pub fn compute_velocity_command(&mut self, sample: DriveSample) -> VelocityCommand {
        let sample = sample.sanitized();
        let dt = self.config.control_period_s;
        let snap = self.config.snap_fraction;
        let max_speed = self.config.max_speed;
        let max_angular = self.config.max_angular_velocity;

        let x = self.shape_axis(sample.translation, sample.speed_cap);
        let y = self.shape_axis(sample.strafe, sample.speed_cap);
        let omega = self.shape_axis(sample.rotation, sample.speed_cap);

        let x = self.translation.calculate(x, dt);
        let y = self.strafe.calculate(y, dt);
        let omega = self.rotation.calculate(omega, dt);

        let translation = Translation2d::new(x, y) * max_speed;
        let command = VelocityCommand {
            translation: Translation2d::new(
                snap_to_zero(translation.x, max_speed, snap),
                snap_to_zero(translation.y, max_speed, snap),
            ),
            rotation: snap_to_zero(omega * max_angular, max_angular, snap),
            field_relative: !sample.robot_centric,
            open_loop: true,
        };
        tracing::trace!(
            vx = command.translation.x,
            vy = command.translation.y,
            omega = command.rotation,
            field_relative = command.field_relative,
            "teleop tick"
        );
        command
    }

    /// Last limiter outputs for translation, strafe and rotation, in stick units.
    pub fn limiter_outputs(&self) -> [f64; 3] {
        [
            self.translation.last_value(),
            self.strafe.last_value(),
            self.rotation.last_value(),
        ]
    }
}

fn snap_to_zero(value: f64, full_scale: f64, fraction: f64) -> f64 {
    if libm::fabs(value) <= full_scale * fraction {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditioner() -> TeleopConditioner {
        TeleopConditioner::new(DriveConfig::default()).unwrap()
    }

    fn forward(translation: f64) -> DriveSample {
        DriveSample {
            translation,
            speed_cap: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn half_stick_first_tick() {
        let mut c = conditioner();
        let shaped = c.shape_axis(0.5, 1.0);
        let expected = (0.4 / 0.9) * (0.4 / 0.9);
        assert!((shaped - expected).abs() < 1e-12);
        assert!((shaped - 0.1975).abs() < 1e-4);

        let command = c.compute_velocity_command(forward(0.5));
        let max_step = 1.8 * 0.02;
        assert!((c.limiter_outputs()[0] - max_step).abs() < 1e-12);
        assert!((command.translation.x - max_step * 4.5).abs() < 1e-9);
        assert_eq!(command.translation.y, 0.0);
        assert_eq!(command.rotation, 0.0);
        assert!(command.open_loop);
    }

    #[test]
    fn inside_deadband_is_zero_everywhere() {
        let mut c = conditioner();
        assert_eq!(c.shape_axis(0.05, 1.0), 0.0);
        let command = c.compute_velocity_command(DriveSample {
            translation: 0.05,
            strafe: -0.05,
            rotation: 0.05,
            speed_cap: 1.0,
            robot_centric: false,
        });
        assert!(command.is_stopped());
        assert_eq!(c.limiter_outputs(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn robot_centric_clears_field_relative() {
        let mut c = conditioner();
        let command = c.compute_velocity_command(DriveSample {
            robot_centric: true,
            ..forward(0.0)
        });
        assert!(!command.field_relative);
        assert!(c.compute_velocity_command(forward(0.0)).field_relative);
    }

    #[test]
    fn full_stick_reaches_full_speed() {
        let mut c = conditioner();
        let mut command = c.compute_velocity_command(forward(1.0));
        for _ in 0..100 {
            command = c.compute_velocity_command(forward(1.0));
        }
        assert_eq!(command.translation.x, 4.5);
    }

    #[test]
    fn speed_cap_scales_the_target() {
        let mut c = conditioner();
        let mut command = c.compute_velocity_command(forward(-1.0));
        for _ in 0..100 {
            command = c.compute_velocity_command(DriveSample {
                speed_cap: 0.3,
                ..forward(-1.0)
            });
        }
        assert!((command.translation.x + 0.3 * 4.5).abs() < 1e-9);
    }

    #[test]
    fn rotation_uses_its_own_rate_and_scale() {
        let mut c = conditioner();
        let command = c.compute_velocity_command(DriveSample {
            rotation: 1.0,
            speed_cap: 1.0,
            ..Default::default()
        });
        assert!((c.limiter_outputs()[2] - 1.5 * 0.02).abs() < 1e-12);
        assert!((command.rotation - 1.5 * 0.02 * 10.0).abs() < 1e-9);
    }

    #[test]
    fn residual_limiter_output_is_snapped() {
        let mut c = conditioner();
        for _ in 0..50 {
            c.compute_velocity_command(forward(1.0));
        }
        // Release the stick and watch the ramp down: never a tiny nonzero value.
        for _ in 0..100 {
            let command = c.compute_velocity_command(forward(0.0));
            let vx = command.translation.x;
            assert!(vx == 0.0 || vx.abs() > 4.5 * 0.01, "residual {vx}");
        }
        assert_eq!(c.limiter_outputs()[0], 0.0);
    }

    #[test]
    fn small_output_is_snapped_but_the_limiter_keeps_it() {
        let mut c = conditioner();
        let command = c.compute_velocity_command(forward(0.15));

        // (0.05 / 0.9)^2 of full stick, about 0.0139 m/s: under 1% of max speed.
        let expected = (0.05 / 0.9) * (0.05 / 0.9);
        let limited = c.limiter_outputs()[0];
        assert!((limited - expected).abs() < 1e-12);
        assert!((limited - 0.00309).abs() < 1e-5);
        assert_eq!(command.translation.x, 0.0);
        assert!(command.is_stopped());

        // The ramp continues from the unsnapped value.
        let command = c.compute_velocity_command(forward(0.5));
        let step = 1.8 * 0.02;
        assert!((c.limiter_outputs()[0] - (expected + step)).abs() < 1e-12);
        assert!((command.translation.x - (expected + step) * 4.5).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let mut wild = conditioner();
        let mut tame = conditioner();
        for _ in 0..100 {
            let a = wild.compute_velocity_command(DriveSample {
                translation: 3.0,
                strafe: f64::NAN,
                rotation: -7.0,
                speed_cap: 1.0,
                robot_centric: false,
            });
            let b = tame.compute_velocity_command(DriveSample {
                translation: 1.0,
                strafe: 0.0,
                rotation: -1.0,
                speed_cap: 1.0,
                robot_centric: false,
            });
            assert_eq!(a, b);
        }

        let mut c = conditioner();
        let command = c.compute_velocity_command(DriveSample {
            speed_cap: -1.0,
            ..forward(1.0)
        });
        assert!(command.is_stopped());
    }

    #[test]
    fn reset_returns_to_rest() {
        let mut c = conditioner();
        for _ in 0..10 {
            c.compute_velocity_command(forward(1.0));
        }
        c.reset();
        assert_eq!(c.limiter_outputs(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = DriveConfig {
            max_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            TeleopConditioner::new(config),
            Err(ConfigError::MaxSpeed { .. })
        ));
    }
}
