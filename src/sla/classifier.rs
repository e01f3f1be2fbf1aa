//! Latency-based tier classification.

use crate::core::{Error, Result, SlaTier};
use crate::sla::agreement::TrackerConfig;
use parking_lot::RwLock;

/// Upper latency bounds (seconds) for the two faster tiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierThresholds {
    /// Inclusive upper bound for gold
    pub gold: f64,
    /// Inclusive upper bound for silver
    pub silver: f64,
}

impl TierThresholds {
    fn validate(&self) -> Result<()> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.gold) || !valid(self.silver) {
            return Err(Error::invalid_config(
                "classifier",
                format!("thresholds {:?} must be positive and finite", self),
            ));
        }
        if self.gold > self.silver {
            return Err(Error::invalid_config(
                "classifier",
                format!("gold threshold {} exceeds silver threshold {}", self.gold, self.silver),
            ));
        }
        Ok(())
    }

    /// Pick the tier for a latency sample. Boundaries go to the faster tier.
    pub fn classify(&self, response_time: f64) -> SlaTier {
        if response_time <= self.gold {
            SlaTier::Gold
        } else if response_time <= self.silver {
            SlaTier::Silver
        } else {
            SlaTier::Bronze
        }
    }
}

/// Maps latency samples to tiers.
///
/// Thresholds may be swapped at runtime; each classification reads one
/// consistent copy of both bounds.
#[derive(Debug)]
pub struct TierClassifier {
    thresholds: RwLock<TierThresholds>,
}

impl TierClassifier {
    /// Create a classifier with explicit thresholds.
    pub fn new(gold: f64, silver: f64) -> Result<Self> {
        let thresholds = TierThresholds { gold, silver };
        thresholds.validate()?;
        Ok(Self {
            thresholds: RwLock::new(thresholds),
        })
    }

    /// Create from the gold and silver response time targets.
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        Self::new(
            config.tiers.gold.response_time_target,
            config.tiers.silver.response_time_target,
        )
    }

    /// Classify a response time in seconds.
    pub fn determine_tier(&self, response_time: f64) -> SlaTier {
        let thresholds = *self.thresholds.read();
        thresholds.classify(response_time)
    }

    /// Current thresholds.
    pub fn thresholds(&self) -> TierThresholds {
        *self.thresholds.read()
    }

    /// Replace both thresholds at once.
    pub fn set_thresholds(&self, gold: f64, silver: f64) -> Result<()> {
        let thresholds = TierThresholds { gold, silver };
        thresholds.validate()?;
        *self.thresholds.write() = thresholds;
        tracing::info!(gold, silver, "Tier thresholds updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_classification() {
        let classifier = TierClassifier::new(0.2, 1.0).unwrap();
        assert_eq!(classifier.determine_tier(0.15), SlaTier::Gold);
        assert_eq!(classifier.determine_tier(0.5), SlaTier::Silver);
        assert_eq!(classifier.determine_tier(1.5), SlaTier::Bronze);
    }

    #[test]
    fn test_boundaries_inclusive() {
        let classifier = TierClassifier::new(0.2, 1.0).unwrap();
        assert_eq!(classifier.determine_tier(0.2), SlaTier::Gold);
        assert_eq!(classifier.determine_tier(1.0), SlaTier::Silver);
    }

    #[test]
    fn test_from_default_config() {
        let classifier = TierClassifier::from_config(&TrackerConfig::default()).unwrap();
        assert_eq!(classifier.thresholds(), TierThresholds { gold: 0.2, silver: 1.0 });
    }

    #[test]
    fn test_invalid_thresholds() {
        assert!(TierClassifier::new(1.0, 0.2).is_err());
        assert!(TierClassifier::new(0.0, 1.0).is_err());
        assert!(TierClassifier::new(0.2, f64::INFINITY).is_err());

        let classifier = TierClassifier::new(0.2, 1.0).unwrap();
        assert!(classifier.set_thresholds(2.0, 1.0).is_err());
        assert_eq!(classifier.thresholds().gold, 0.2);
    }

    #[test]
    fn test_set_thresholds() {
        let classifier = TierClassifier::new(0.2, 1.0).unwrap();
        classifier.set_thresholds(0.5, 2.0).unwrap();
        assert_eq!(classifier.determine_tier(0.4), SlaTier::Gold);
        assert_eq!(classifier.determine_tier(1.5), SlaTier::Silver);
    }

    #[test]
    fn test_concurrent_reload_sees_consistent_pair() {
        // Both threshold pairs put 0.6s in silver; a torn read of
        // (gold of one pair, silver of the other) would not.
        let classifier = Arc::new(TierClassifier::new(0.1, 0.7).unwrap());

        std::thread::scope(|s| {
            let writer = Arc::clone(&classifier);
            s.spawn(move || {
                for i in 0..1000 {
                    if i % 2 == 0 {
                        writer.set_thresholds(0.5, 0.9).unwrap();
                    } else {
                        writer.set_thresholds(0.1, 0.7).unwrap();
                    }
                }
            });

            for _ in 0..4 {
                let reader = Arc::clone(&classifier);
                s.spawn(move || {
                    for _ in 0..1000 {
                        let t = reader.thresholds();
                        assert!(t == TierThresholds { gold: 0.5, silver: 0.9 }
                            || t == TierThresholds { gold: 0.1, silver: 0.7 });
                        assert_eq!(reader.determine_tier(0.6), SlaTier::Silver);
                    }
                });
            }
        });
    }
}
