//! Health status classification against targets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Health of one indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warning band below the availability target, as a fraction of it.
const AVAILABILITY_WARNING_FACTOR: f64 = 0.95;
/// Warning band above the response time target, as a multiple of it.
const RESPONSE_TIME_WARNING_FACTOR: f64 = 1.5;

/// Classify availability against its target.
pub fn availability_status(current: f64, target: f64) -> HealthStatus {
    if current >= target {
        HealthStatus::Healthy
    } else if current >= AVAILABILITY_WARNING_FACTOR * target {
        HealthStatus::Warning
    } else {
        HealthStatus::Critical
    }
}

/// Classify mean response time against its target.
pub fn response_time_status(current: f64, target: f64) -> HealthStatus {
    if current <= target {
        HealthStatus::Healthy
    } else if current <= RESPONSE_TIME_WARNING_FACTOR * target {
        HealthStatus::Warning
    } else {
        HealthStatus::Critical
    }
}

/// Classify remaining error budget against alert and critical thresholds.
pub fn error_budget_status(remaining: f64, alert: f64, critical: f64) -> HealthStatus {
    if remaining >= alert {
        HealthStatus::Healthy
    } else if remaining >= critical {
        HealthStatus::Warning
    } else {
        HealthStatus::Critical
    }
}

/// Whether the remaining budget has dropped below the critical threshold.
pub fn is_budget_critical(remaining: f64, critical: f64) -> bool {
    remaining < critical
}
