//! Per-axis signal conditioning: deadband, response shaping and slew-rate limiting.

/// Zero out stick noise near center and rescale the rest so the band edge maps
/// to 0 and full deflection still maps to 1.
pub fn apply_deadband(value: f64, deadband: f64) -> f64 {
    let magnitude = libm::fabs(value);
    if magnitude < deadband {
        return 0.0;
    }
    libm::copysign((magnitude - deadband) / (1.0 - deadband), value)
}

/// Square the input keeping its sign: fine control near center, full authority at the ends.
pub fn shape_response(value: f64) -> f64 {
    libm::copysign(value * value, value)
}

/// Bounds how fast a signal may change.
#[derive(Debug, Clone, PartialEq)]
pub struct SlewRateLimiter {
    /// Units per second
    rate_limit: f64,
    previous: f64,
}

impl SlewRateLimiter {
    pub fn new(rate_limit: f64) -> Self {
        Self::with_initial(rate_limit, 0.0)
    }

    pub fn with_initial(rate_limit: f64, initial: f64) -> Self {
        Self {
            rate_limit,
            previous: initial,
        }
    }

    /// Step towards `input`, moving at most `rate_limit * dt` from the last output.
    ///
    /// Once the target is within one step it is returned exactly, so a held
    /// input is reached without overshoot.
    pub fn calculate(&mut self, input: f64, dt: f64) -> f64 {
        let max_step = self.rate_limit * dt;
        let delta = input - self.previous;
        self.previous = if libm::fabs(delta) <= max_step {
            input
        } else {
            self.previous + libm::copysign(max_step, delta)
        };
        self.previous
    }

    pub fn reset(&mut self, value: f64) {
        self.previous = value;
    }

    pub fn last_value(&self) -> f64 {
        self.previous
    }

    pub fn rate_limit(&self) -> f64 {
        self.rate_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.02;

    #[test]
    fn deadband_zeroes_small_inputs() {
        for raw in [0.0, 0.05, -0.05, 0.099, -0.099] {
            assert_eq!(apply_deadband(raw, 0.1), 0.0, "raw = {raw}");
        }
    }

    #[test]
    fn deadband_rescales_to_full_range() {
        assert_eq!(apply_deadband(1.0, 0.1), 1.0);
        assert_eq!(apply_deadband(-1.0, 0.1), -1.0);
        assert!((apply_deadband(0.5, 0.1) - 0.4 / 0.9).abs() < 1e-12);
        assert!((apply_deadband(-0.5, 0.1) + 0.4 / 0.9).abs() < 1e-12);
    }

    #[test]
    fn shaping_is_odd_and_monotonic() {
        let mut last = 0.0;
        for step in 1..=100 {
            let x = f64::from(step) / 100.0;
            let y = shape_response(x);
            assert!(y > last, "not increasing at {x}");
            assert_eq!(shape_response(-x), -y);
            last = y;
        }
        assert_eq!(shape_response(1.0), 1.0);
    }

    #[test]
    fn limiter_bounds_each_step() {
        let mut limiter = SlewRateLimiter::new(1.8);
        let max_step = 1.8 * DT;
        let mut previous = limiter.last_value();
        for target in [1.0, 1.0, -1.0, 0.3, 0.3, 0.3, -0.7, 0.0] {
            let out = limiter.calculate(target, DT);
            assert!((out - previous).abs() <= max_step + 1e-12);
            previous = out;
        }
    }

    #[test]
    fn limiter_settles_exactly_on_held_input() {
        let mut limiter = SlewRateLimiter::with_initial(1.5, 0.73);
        let mut ticks = 0;
        while limiter.calculate(0.0, DT) != 0.0 {
            ticks += 1;
            assert!(ticks < 100, "limiter never settled");
        }
        for _ in 0..10 {
            assert_eq!(limiter.calculate(0.0, DT), 0.0);
        }
    }

    #[test]
    fn reset_jumps_without_limiting() {
        let mut limiter = SlewRateLimiter::new(1.8);
        limiter.reset(0.9);
        assert_eq!(limiter.last_value(), 0.9);
        assert_eq!(limiter.rate_limit(), 1.8);
    }
}
