//! Scheduler parameters.

use serde::{Deserialize, Serialize};

use crate::error::{RepriseError, RepriseResult};
use crate::types::{INITIAL_EASE_FACTOR, INITIAL_INTERVAL_DAYS, MIN_EASE_FACTOR};

/// Tunable SM-2 parameters.
///
/// The defaults are the classic SM-2 constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ease factor assigned to newly created cards.
    /// Default: 2.5
    pub initial_ease_factor: f64,

    /// Floor applied after every ease factor update. Cannot be set below 1.3.
    /// Default: 1.3
    pub min_ease_factor: f64,

    /// Interval after the first successful review in a streak.
    /// Default: 1 day
    pub first_interval_days: u32,

    /// Interval after the second successful review in a streak.
    /// Default: 6 days
    pub second_interval_days: u32,

    /// Interval after a failed review.
    /// Default: 1 day
    pub failure_interval_days: u32,

    /// Upper bound on any computed interval.
    /// Default: 36500 days
    pub max_interval_days: u32,
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that the parameters keep every card within its invariants.
    pub fn validate(&self) -> RepriseResult<()> {
        if !self.min_ease_factor.is_finite() || self.min_ease_factor < MIN_EASE_FACTOR {
            return Err(RepriseError::Configuration(format!(
                "min_ease_factor must be at least {}, got {}",
                MIN_EASE_FACTOR, self.min_ease_factor
            )));
        }
        if !self.initial_ease_factor.is_finite() || self.initial_ease_factor < self.min_ease_factor {
            return Err(RepriseError::Configuration(format!(
                "initial_ease_factor {} is below min_ease_factor {}",
                self.initial_ease_factor, self.min_ease_factor
            )));
        }
        for (name, days) in [
            ("first_interval_days", self.first_interval_days),
            ("second_interval_days", self.second_interval_days),
            ("failure_interval_days", self.failure_interval_days),
        ] {
            if days == 0 {
                return Err(RepriseError::Configuration(format!("{name} must be at least 1")));
            }
            if days > self.max_interval_days {
                return Err(RepriseError::Configuration(format!(
                    "{name} ({days}) exceeds max_interval_days ({})",
                    self.max_interval_days
                )));
            }
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_ease_factor: INITIAL_EASE_FACTOR,
            min_ease_factor: MIN_EASE_FACTOR,
            first_interval_days: INITIAL_INTERVAL_DAYS,
            second_interval_days: 6,
            failure_interval_days: 1,
            max_interval_days: 36_500,
        }
    }
}
