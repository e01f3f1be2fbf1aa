//! SLA reporting.
//!
//! Builds per-tier summaries and renders them for operators.

use crate::core::{SlaTier, TierMap};
use crate::sla::agreement::TrackerConfig;
use crate::sla::status::{self, HealthStatus};
use crate::sla::tracker::SlaMetrics;
use serde::{Deserialize, Serialize};

/// A measured indicator next to its target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSummary {
    /// Current value
    pub current: f64,
    /// Target value
    pub target: f64,
    /// Health against target
    pub status: HealthStatus,
}

/// Error budget state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Fraction of budget left
    pub remaining: f64,
    /// Consumption speed relative to sustainable
    pub burn_rate: f64,
    /// Health against alert/critical thresholds
    pub status: HealthStatus,
}

/// Request counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub total: u64,
    pub success: u64,
    pub fail: u64,
}

/// Summary for a single tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierSummary {
    pub availability: IndicatorSummary,
    pub response_time: IndicatorSummary,
    pub error_budget: BudgetSummary,
    pub requests: RequestSummary,
}

impl TierSummary {
    /// Summarize metrics against one tier's targets.
    pub fn build(tier: SlaTier, config: &TrackerConfig, metrics: &SlaMetrics) -> Self {
        let targets = config.tier(tier);

        Self {
            availability: IndicatorSummary {
                current: metrics.current_availability,
                target: targets.availability_target,
                status: status::availability_status(
                    metrics.current_availability,
                    targets.availability_target,
                ),
            },
            response_time: IndicatorSummary {
                current: metrics.current_response_time,
                target: targets.response_time_target,
                status: status::response_time_status(
                    metrics.current_response_time,
                    targets.response_time_target,
                ),
            },
            error_budget: BudgetSummary {
                remaining: metrics.error_budget_remaining,
                burn_rate: metrics.error_budget_burn_rate,
                status: status::error_budget_status(
                    metrics.error_budget_remaining,
                    targets.alert_threshold,
                    targets.critical_threshold,
                ),
            },
            requests: RequestSummary {
                total: metrics.total_requests,
                success: metrics.successful_requests,
                fail: metrics.failed_requests,
            },
        }
    }
}

/// Summary across all tiers of a service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlaSummary {
    /// Service name
    pub service: String,
    /// Per-tier summaries
    pub tiers: TierMap<TierSummary>,
}

impl SlaSummary {
    /// Build from a metrics snapshot.
    pub fn build(config: &TrackerConfig, metrics: &TierMap<SlaMetrics>) -> Self {
        Self {
            service: config.service_name.clone(),
            tiers: metrics.map(|tier, m| TierSummary::build(tier, config, m)),
        }
    }

    /// Worst status across every indicator of every tier.
    pub fn overall_status(&self) -> HealthStatus {
        self.tiers
            .iter()
            .flat_map(|(_, t)| {
                [
                    t.availability.status,
                    t.response_time.status,
                    t.error_budget.status,
                ]
            })
            .max()
            .unwrap_or(HealthStatus::Healthy)
    }
}

/// SLA reporter.
pub struct SlaReporter;

impl SlaReporter {
    /// Render a summary as JSON.
    pub fn to_json(summary: &SlaSummary) -> String {
        serde_json::to_string_pretty(summary).unwrap_or_default()
    }

    /// Render a summary as text.
    pub fn to_text(summary: &SlaSummary) -> String {
        let mut output = String::new();

        output.push_str(&format!("SLA Report: {}\n", summary.service));
        output.push_str(&format!(
            "Status: {}\n",
            summary.overall_status().as_str().to_uppercase()
        ));

        for (tier, t) in summary.tiers.iter() {
            output.push_str(&format!(
                "\n[{}] {} requests ({} ok, {} failed)\n",
                tier, t.requests.total, t.requests.success, t.requests.fail
            ));
            output.push_str(&format!(
                "  availability: {:.4} (target: {:.4}) {}\n",
                t.availability.current, t.availability.target, t.availability.status
            ));
            output.push_str(&format!(
                "  response time: {:.3}s (target: {:.3}s) {}\n",
                t.response_time.current, t.response_time.target, t.response_time.status
            ));
            output.push_str(&format!(
                "  error budget: {:.1}% remaining, burn rate {:.2} {}\n",
                t.error_budget.remaining * 100.0,
                t.error_budget.burn_rate,
                t.error_budget.status
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> TierMap<SlaMetrics> {
        TierMap::from_fn(|_| SlaMetrics::new(10))
    }

    #[test]
    fn test_fresh_summary_is_healthy() {
        let config = TrackerConfig::new("api");
        let summary = SlaSummary::build(&config, &metrics());

        assert_eq!(summary.service, "api");
        assert_eq!(summary.overall_status(), HealthStatus::Healthy);
        assert_eq!(summary.tiers.gold.availability.current, 1.0);
        assert_eq!(summary.tiers.gold.availability.target, 0.999);
        assert_eq!(summary.tiers.silver.error_budget.remaining, 1.0);
        assert_eq!(summary.tiers.bronze.requests.total, 0);
    }

    #[test]
    fn test_summary_reflects_degraded_tier() {
        let config = TrackerConfig::new("api");
        let mut m = metrics();
        m.silver.current_availability = 0.9855;
        m.silver.error_budget_remaining = 0.1;
        m.silver.current_response_time = 2.0;

        let summary = SlaSummary::build(&config, &m);
        let silver = &summary.tiers.silver;
        assert_eq!(silver.availability.status, HealthStatus::Warning);
        assert_eq!(silver.error_budget.status, HealthStatus::Critical);
        assert_eq!(silver.response_time.status, HealthStatus::Critical);
        assert_eq!(summary.overall_status(), HealthStatus::Critical);
    }

    #[test]
    fn test_report_formats() {
        let config = TrackerConfig::new("checkout");
        let summary = SlaSummary::build(&config, &metrics());

        let json = SlaReporter::to_json(&summary);
        assert!(json.contains("\"gold\""));
        assert!(json.contains("\"response_time\""));
        assert!(json.contains("\"healthy\""));

        let text = SlaReporter::to_text(&summary);
        assert!(text.contains("SLA Report: checkout"));
        assert!(text.contains("[bronze]"));
        assert!(text.contains("HEALTHY"));
    }
}
