//! Fire-rate to re-fire interval conversion

use std::time::Duration;

use volley_types::AutoFirePolicy;

use crate::cooldowns::{SchedulerError, secs_to_duration};

/// Extension trait computing re-fire intervals from an `AutoFirePolicy`
pub trait FireInterval {
    /// `max(minimum_interval, 1 / fire_rate - safety_margin)`
    ///
    /// Fails for non-positive or non-finite rates, and for rates so high that
    /// the interval rounds to zero under a zero floor.
    fn fire_interval(&self, fire_rate: f64) -> Result<Duration, SchedulerError>;
}

impl FireInterval for AutoFirePolicy {
    fn fire_interval(&self, fire_rate: f64) -> Result<Duration, SchedulerError> {
        let invalid = SchedulerError::InvalidFireRate { rate: fire_rate };
        if !fire_rate.is_finite() || fire_rate <= 0.0 {
            return Err(invalid);
        }

        let nominal = secs_to_duration(fire_rate.recip()).ok_or(invalid.clone())?;
        let minimum = Duration::from_millis(self.minimum_interval_ms);
        let margin = Duration::from_millis(self.safety_margin_ms);

        let interval = nominal.saturating_sub(margin).max(minimum);
        if interval.is_zero() {
            return Err(invalid);
        }
        Ok(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_subtracts_margin() {
        let policy = AutoFirePolicy::default();
        assert_eq!(policy.fire_interval(2.0), Ok(Duration::from_millis(450)));
        assert_eq!(policy.fire_interval(1.0), Ok(Duration::from_millis(950)));
    }

    #[test]
    fn fast_weapons_clamp_to_minimum() {
        let policy = AutoFirePolicy::default();
        // 1/20 s = 50ms, minus 50ms margin, floored at 50ms
        assert_eq!(policy.fire_interval(20.0), Ok(Duration::from_millis(50)));
        assert_eq!(policy.fire_interval(1000.0), Ok(Duration::from_millis(50)));
    }

    #[test]
    fn exact_policy_uses_nominal_interval() {
        assert_eq!(
            AutoFirePolicy::exact().fire_interval(4.0),
            Ok(Duration::from_millis(250))
        );
    }

    #[test]
    fn invalid_rates_rejected() {
        let policy = AutoFirePolicy::default();
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    policy.fire_interval(rate),
                    Err(SchedulerError::InvalidFireRate { .. })
                ),
                "rate {rate} should be rejected"
            );
        }
        assert!(AutoFirePolicy::exact().fire_interval(1e12).is_err());
    }
}
