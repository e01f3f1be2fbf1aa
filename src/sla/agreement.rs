//! SLA agreements per tier.
//!
//! Defines the targets each tier is held to and the tracker configuration.

use crate::core::{duration_secs, Error, Result, SlaTier, TierMap};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Targets for a single tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlaConfiguration {
    /// Availability target in (0, 1]
    pub availability_target: f64,
    /// Response time target (seconds)
    pub response_time_target: f64,
    /// Period the error budget is granted over
    #[serde(with = "duration_secs")]
    pub error_budget_period: Duration,
    /// Remaining budget below which the tier is in warning
    pub alert_threshold: f64,
    /// Remaining budget below which the tier is critical
    pub critical_threshold: f64,
}

impl SlaConfiguration {
    /// Create a configuration with a 30 day period and default thresholds.
    pub fn new(availability_target: f64, response_time_target: f64) -> Self {
        Self {
            availability_target,
            response_time_target,
            error_budget_period: DAY * 30,
            alert_threshold: 0.5,
            critical_threshold: 0.2,
        }
    }

    /// Set the error budget period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.error_budget_period = period;
        self
    }

    /// Set alert and critical thresholds.
    pub fn with_thresholds(mut self, alert: f64, critical: f64) -> Self {
        self.alert_threshold = alert;
        self.critical_threshold = critical;
        self
    }

    /// Check every field is in range.
    pub fn validate(&self, tier: SlaTier) -> Result<()> {
        let fail = |reason: String| Err(Error::invalid_config(tier.as_str(), reason));

        if !(self.availability_target > 0.0 && self.availability_target <= 1.0) {
            return fail(format!(
                "availability_target {} must be in (0, 1]",
                self.availability_target
            ));
        }
        if !(self.response_time_target.is_finite() && self.response_time_target > 0.0) {
            return fail(format!(
                "response_time_target {} must be a positive number of seconds",
                self.response_time_target
            ));
        }
        if self.error_budget_period.is_zero() {
            return fail("error_budget_period must be non-zero".to_string());
        }
        for (name, value) in [
            ("alert_threshold", self.alert_threshold),
            ("critical_threshold", self.critical_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return fail(format!("{} {} must be in [0, 1]", name, value));
            }
        }
        if self.critical_threshold >= self.alert_threshold {
            return fail(format!(
                "critical_threshold {} must be below alert_threshold {}",
                self.critical_threshold, self.alert_threshold
            ));
        }

        Ok(())
    }

    /// Fraction of requests allowed to fail.
    pub fn allowable_error_rate(&self) -> f64 {
        1.0 - self.availability_target
    }
}

/// Tracker configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Service name reported to the metrics sink
    pub service_name: String,
    /// Per-tier targets
    pub tiers: TierMap<SlaConfiguration>,
    /// How often derived metrics are recomputed
    #[serde(with = "duration_secs")]
    pub recompute_interval: Duration,
    /// Response time samples kept per tier
    pub sample_capacity: usize,
}

impl TrackerConfig {
    /// Create the default configuration for a service.
    pub fn new(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            tiers: TierMap {
                gold: SlaConfiguration::new(0.999, 0.2),
                silver: SlaConfiguration::new(0.995, 1.0),
                bronze: SlaConfiguration::new(0.99, 5.0),
            },
            recompute_interval: Duration::from_secs(30),
            sample_capacity: 1000,
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set service name.
    pub fn with_service_name(mut self, name: &str) -> Self {
        self.service_name = name.to_string();
        self
    }

    /// Set recompute interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.recompute_interval = interval;
        self
    }

    /// Replace one tier's targets.
    pub fn with_tier(mut self, tier: SlaTier, config: SlaConfiguration) -> Self {
        *self.tiers.get_mut(tier) = config;
        self
    }

    /// Set sample buffer capacity.
    pub fn with_sample_capacity(mut self, capacity: usize) -> Self {
        self.sample_capacity = capacity;
        self
    }

    /// Get targets for a tier.
    pub fn tier(&self, tier: SlaTier) -> &SlaConfiguration {
        self.tiers.get(tier)
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(Error::invalid_config("tracker", "service_name must not be empty"));
        }
        if self.recompute_interval.is_zero() {
            return Err(Error::invalid_config("tracker", "recompute_interval must be non-zero"));
        }
        if self.sample_capacity == 0 {
            return Err(Error::invalid_config("tracker", "sample_capacity must be non-zero"));
        }

        for (tier, config) in self.tiers.iter() {
            config.validate(tier)?;
        }

        let gold = self.tiers.gold.response_time_target;
        let silver = self.tiers.silver.response_time_target;
        if gold > silver {
            return Err(Error::invalid_config(
                "tracker",
                format!(
                    "gold response_time_target {} exceeds silver response_time_target {}",
                    gold, silver
                ),
            ));
        }

        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new("default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recompute_interval, Duration::from_secs(30));
        assert_eq!(config.sample_capacity, 1000);
        assert_eq!(config.tier(SlaTier::Gold).response_time_target, 0.2);
    }

    #[test]
    fn test_availability_target_out_of_range() {
        for target in [0.0, -0.5, 1.01, f64::NAN] {
            let config = SlaConfiguration::new(target, 0.2);
            assert!(config.validate(SlaTier::Gold).is_err(), "target {}", target);
        }
        assert!(SlaConfiguration::new(1.0, 0.2).validate(SlaTier::Gold).is_ok());
    }

    #[test]
    fn test_threshold_ordering() {
        let config = SlaConfiguration::new(0.99, 1.0).with_thresholds(0.2, 0.2);
        assert!(config.validate(SlaTier::Silver).is_err());

        let config = SlaConfiguration::new(0.99, 1.0).with_thresholds(1.5, 0.2);
        assert!(config.validate(SlaTier::Silver).is_err());
    }

    #[test]
    fn test_zero_period_rejected() {
        let config = SlaConfiguration::new(0.99, 1.0).with_period(Duration::ZERO);
        assert!(config.validate(SlaTier::Bronze).is_err());
    }

    #[test]
    fn test_gold_slower_than_silver_rejected() {
        let config = TrackerConfig::default()
            .with_tier(SlaTier::Gold, SlaConfiguration::new(0.999, 2.0));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds silver"));
    }

    #[test]
    fn test_tracker_fields_rejected() {
        assert!(TrackerConfig::new("  ").validate().is_err());
        assert!(TrackerConfig::default()
            .with_interval(Duration::ZERO)
            .validate()
            .is_err());
        assert!(TrackerConfig::default()
            .with_sample_capacity(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::to_string(&TrackerConfig::new("api")).unwrap();
        let parsed = TrackerConfig::from_json(&json).unwrap();
        assert_eq!(parsed.service_name, "api");
        assert_eq!(parsed.tiers.bronze.error_budget_period, DAY * 30);

        let broken = json.replace("0.999", "1.5");
        assert!(TrackerConfig::from_json(&broken).is_err());
    }

    #[test]
    fn test_allowable_error_rate() {
        let config = SlaConfiguration::new(1.0, 0.2);
        assert_eq!(config.allowable_error_rate(), 0.0);
    }
}
