//! SLA metrics tracking.
//!
//! Records request outcomes into per-tier state and recomputes derived
//! availability, error budget and burn rate.

use crate::core::{now, Result, SlaTier, TierMap, Timestamp};
use crate::monitoring::alerts::AlertManager;
use crate::monitoring::metrics::MetricsSink;
use crate::sla::agreement::TrackerConfig;
use crate::sla::calculator::{self, CounterSnapshot};
use crate::sla::classifier::TierClassifier;
use crate::sla::reporter::SlaSummary;
use crate::sla::scheduler::RecomputeTask;
use crate::sla::status;
use crate::sla::window::SampleWindow;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Live metrics for one tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlaMetrics {
    /// Successful / total, in [0, 1]
    pub current_availability: f64,
    /// Mean of buffered response times (seconds)
    pub current_response_time: f64,
    /// Fraction of error budget left, in [0, 1]
    pub error_budget_remaining: f64,
    /// Error rate relative to the allowable rate
    pub error_budget_burn_rate: f64,
    /// Last time a request was recorded
    pub last_update: Timestamp,
    /// Last time derived values were recomputed
    pub last_calculated: Option<Timestamp>,
    /// Requests recorded
    pub total_requests: u64,
    /// Successful requests
    pub successful_requests: u64,
    /// Failed requests
    pub failed_requests: u64,
    /// Most recent response times
    pub response_times: SampleWindow,
}

impl SlaMetrics {
    /// Fresh metrics: fully available, full budget, no requests.
    pub fn new(sample_capacity: usize) -> Self {
        Self {
            current_availability: 1.0,
            current_response_time: 0.0,
            error_budget_remaining: 1.0,
            error_budget_burn_rate: 0.0,
            last_update: now(),
            last_calculated: None,
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            response_times: SampleWindow::new(sample_capacity),
        }
    }

    fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            total_requests: self.total_requests,
            successful_requests: self.successful_requests,
            failed_requests: self.failed_requests,
            samples: self.response_times.to_vec(),
            previous_availability: self.current_availability,
        }
    }
}

/// Tiered SLA tracker.
///
/// Owned by the composition root and shared as `Arc<SlaTracker>`; every
/// method takes `&self`.
pub struct SlaTracker {
    pub(crate) config: TrackerConfig,
    classifier: TierClassifier,
    metrics: TierMap<Mutex<SlaMetrics>>,
    sink: Arc<dyn MetricsSink>,
    alerts: Option<Mutex<AlertManager>>,
    pub(crate) task: Mutex<Option<RecomputeTask>>,
}

impl SlaTracker {
    /// Create a tracker; fails if the configuration is out of range.
    pub fn new(config: TrackerConfig, sink: Arc<dyn MetricsSink>) -> Result<Self> {
        config.validate()?;
        let classifier = TierClassifier::from_config(&config)?;
        let capacity = config.sample_capacity;

        Ok(Self {
            config,
            classifier,
            metrics: TierMap::from_fn(|_| Mutex::new(SlaMetrics::new(capacity))),
            sink,
            alerts: None,
            task: Mutex::new(None),
        })
    }

    /// Evaluate alert rules after every recompute.
    pub fn with_alerts(mut self, alerts: AlertManager) -> Self {
        self.alerts = Some(Mutex::new(alerts));
        self
    }

    /// Tracker configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Tier classifier, for threshold reloads.
    pub fn classifier(&self) -> &TierClassifier {
        &self.classifier
    }

    /// Record a completed request.
    ///
    /// Never fails. Negative latencies are clamped to zero. NaN or infinite
    /// latencies are counted against Bronze but add no response time sample.
    pub fn record_request(&self, response_time: f64, success: bool, endpoint: &str) {
        let sample = if response_time.is_finite() {
            Some(response_time.max(0.0))
        } else {
            None
        };
        let tier = match sample {
            Some(latency) => self.classifier.determine_tier(latency),
            None => SlaTier::Bronze,
        };
        if sample != Some(response_time) {
            debug!(response_time, endpoint, tier = %tier, "Sanitized response time");
        }

        {
            let mut metrics = self.metrics.get(tier).lock();
            metrics.total_requests += 1;
            if success {
                metrics.successful_requests += 1;
            } else {
                metrics.failed_requests += 1;
            }
            if let Some(latency) = sample {
                metrics.response_times.push(latency);
            }
            metrics.last_update = now();
        }

        trace!(tier = %tier, endpoint, success, "Request recorded");
    }

    /// Recompute derived metrics for every tier and publish them.
    pub fn recompute_metrics(&self) {
        let service = self.config.service_name.as_str();

        for (tier, slot) in self.metrics.iter() {
            let snapshot = slot.lock().snapshot();
            let result = calculator::calculate(&snapshot, self.config.tier(tier));

            {
                let mut metrics = slot.lock();
                metrics.current_availability = result.availability;
                metrics.current_response_time = result.response_time;
                metrics.error_budget_remaining = result.error_budget_remaining;
                metrics.error_budget_burn_rate = result.burn_rate;
                metrics.last_calculated = Some(now());
            }

            self.sink.update_sla_metrics(
                service,
                tier.as_str(),
                result.availability,
                result.error_budget_remaining,
                result.burn_rate,
            );

            debug!(
                service,
                tier = %tier,
                total = snapshot.total_requests,
                availability = result.availability,
                error_budget_remaining = result.error_budget_remaining,
                burn_rate = result.burn_rate,
                "SLA metrics recomputed"
            );
        }

        if let Some(alerts) = &self.alerts {
            let snapshot = self.get_all_metrics();
            alerts.lock().evaluate(&snapshot);
        }
    }

    /// Copy of one tier's metrics.
    pub fn get_metrics(&self, tier: SlaTier) -> SlaMetrics {
        self.metrics.get(tier).lock().clone()
    }

    /// Copy of one tier's metrics by tier name.
    pub fn get_metrics_by_name(&self, tier: &str) -> Option<SlaMetrics> {
        tier.parse::<SlaTier>().ok().map(|t| self.get_metrics(t))
    }

    /// Copies of every tier's metrics.
    pub fn get_all_metrics(&self) -> TierMap<SlaMetrics> {
        self.metrics.map(|_, slot| slot.lock().clone())
    }

    /// Summary of every tier against its targets.
    pub fn get_summary(&self) -> SlaSummary {
        SlaSummary::build(&self.config, &self.get_all_metrics())
    }

    /// Alias of [`get_all_metrics`](Self::get_all_metrics).
    pub fn get_sla_status(&self) -> TierMap<SlaMetrics> {
        self.get_all_metrics()
    }

    /// Alias of [`get_metrics`](Self::get_metrics).
    pub fn get_sla_status_for_tier(&self, tier: SlaTier) -> SlaMetrics {
        self.get_metrics(tier)
    }

    /// Alias of [`get_summary`](Self::get_summary).
    pub fn get_sla_summary(&self) -> SlaSummary {
        self.get_summary()
    }

    /// Whether a tier's remaining budget is below its critical threshold.
    pub fn is_error_budget_critical(&self, tier: SlaTier) -> bool {
        let remaining = self.metrics.get(tier).lock().error_budget_remaining;
        status::is_budget_critical(remaining, self.config.tier(tier).critical_threshold)
    }

    /// Tiers whose budget is critical, fastest first.
    pub fn critical_tiers(&self) -> Vec<SlaTier> {
        SlaTier::ALL
            .into_iter()
            .filter(|&tier| self.is_error_budget_critical(tier))
            .collect()
    }

    /// Whether any tier's budget is critical.
    pub fn any_error_budget_critical(&self) -> bool {
        !self.critical_tiers().is_empty()
    }

    /// Run `f` against the alert manager, if one is attached.
    pub fn with_alert_manager<R>(&self, f: impl FnOnce(&AlertManager) -> R) -> Option<R> {
        self.alerts.as_ref().map(|alerts| f(&*alerts.lock()))
    }
}

impl Drop for SlaTracker {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.cancel.cancel();
        }
    }
}
