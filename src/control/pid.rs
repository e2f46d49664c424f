//! Proportional-integral-derivative controller

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Gains for one PID axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Symmetric clamp on the integral accumulator; `None` leaves it unbounded.
    pub integral_limit: Option<f64>,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            integral_limit: None,
        }
    }

    /// Clamp the integral accumulator to `[-limit, limit]`.
    pub fn with_integral_limit(mut self, limit: f64) -> Self {
        self.integral_limit = Some(limit);
        self
    }

    pub(crate) fn validate(&self, axis: &str) -> Result<()> {
        for (name, value) in [("kp", self.kp), ("ki", self.ki), ("kd", self.kd)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::config(format!(
                    "{axis} PID gain {name} must be non-negative and finite, got {value}"
                )));
            }
        }
        if let Some(limit) = self.integral_limit
            && (!limit.is_finite() || limit <= 0.0)
        {
            return Err(Error::config(format!(
                "{axis} PID integral limit must be positive and finite, got {limit}"
            )));
        }
        Ok(())
    }
}

impl Default for PidGains {
    fn default() -> Self {
        Self::new(1.0, 0.1, 0.01)
    }
}

/// PID controller for a single error signal.
///
/// Each controlled axis needs its own instance: the integral accumulator and
/// previous error belong to one signal's history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidController {
    gains: PidGains,
    integral: f64,
    previous_error: f64,
}

impl PidController {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            previous_error: 0.0,
        }
    }

    /// Advance the controller by one step and return its output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimeStep`] when `dt` is not positive and
    /// finite; the controller state is left untouched.
    pub fn control(&mut self, error: f64, dt: f64) -> Result<f64> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(Error::InvalidTimeStep { dt });
        }

        self.integral += error * dt;
        if let Some(limit) = self.gains.integral_limit {
            self.integral = self.integral.clamp(-limit, limit);
        }
        let derivative = (error - self.previous_error) / dt;
        self.previous_error = error;

        Ok(self.gains.kp * error + self.gains.ki * self.integral + self.gains.kd * derivative)
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
    }

    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn previous_error(&self) -> f64 {
        self.previous_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_error_on_fresh_controller() {
        let mut pid = PidController::new(PidGains::default());
        assert_eq!(pid.control(0.0, 0.1).unwrap(), 0.0);
    }

    #[test]
    fn test_proportional_only() {
        let mut pid = PidController::new(PidGains::new(2.0, 0.0, 0.0));
        let out = pid.control(5.0, 0.1).unwrap();
        assert!((out - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_error_accumulates_integral() {
        let gains = PidGains::new(1.0, 0.1, 0.01);
        let mut pid = PidController::new(gains);
        let (error, dt, n) = (0.5, 0.1, 40);

        let mut last = 0.0;
        for _ in 0..n {
            last = pid.control(error, dt).unwrap();
        }

        let expected_integral = n as f64 * error * dt;
        assert!((pid.integral() - expected_integral).abs() < 1e-9);
        // Derivative vanishes once the error stops changing.
        let expected = gains.kp * error + gains.ki * expected_integral;
        assert!((last - expected).abs() < 1e-9, "got {last}, expected {expected}");
    }

    #[test]
    fn test_first_step_derivative_uses_zero_history() {
        let mut pid = PidController::new(PidGains::new(0.0, 0.0, 1.0));
        let out = pid.control(0.2, 0.1).unwrap();
        assert!((out - 2.0).abs() < 1e-12);
        assert_eq!(pid.previous_error(), 0.2);
    }

    #[test]
    fn test_rejects_non_positive_dt_without_mutation() {
        let mut pid = PidController::new(PidGains::default());
        pid.control(1.0, 0.1).unwrap();
        let before = pid;

        for dt in [0.0, -0.1, f64::NAN] {
            let err = pid.control(3.0, dt).unwrap_err();
            assert!(matches!(err, Error::InvalidTimeStep { .. }));
        }
        assert_eq!(pid, before);
    }

    #[test]
    fn test_integral_limit_clamps_accumulator() {
        let mut pid = PidController::new(PidGains::new(0.0, 1.0, 0.0).with_integral_limit(0.25));
        for _ in 0..100 {
            pid.control(1.0, 0.1).unwrap();
        }
        assert_eq!(pid.integral(), 0.25);

        for _ in 0..100 {
            pid.control(-1.0, 0.1).unwrap();
        }
        assert_eq!(pid.integral(), -0.25);
    }

    #[test]
    fn test_unbounded_by_default() {
        let mut pid = PidController::new(PidGains::default());
        for _ in 0..1000 {
            pid.control(10.0, 1.0).unwrap();
        }
        assert!((pid.integral() - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut pid = PidController::new(PidGains::default());
        pid.control(1.0, 0.1).unwrap();
        pid.reset();
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.previous_error(), 0.0);
    }

    #[test]
    fn test_gain_validation() {
        assert!(PidGains::default().validate("velocity").is_ok());
        assert!(PidGains::new(-1.0, 0.0, 0.0).validate("velocity").is_err());
        assert!(PidGains::new(1.0, f64::NAN, 0.0).validate("heading").is_err());
        assert!(
            PidGains::default()
                .with_integral_limit(0.0)
                .validate("heading")
                .is_err()
        );
    }
}
