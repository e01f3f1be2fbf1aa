//! Prometheus-style export of SLA metrics.
//!
//! Provides the [`MetricsSink`] seam the tracker publishes through, and a
//! labelled gauge collector implementing it.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Receives one update per tier per recompute cycle.
pub trait MetricsSink: Send + Sync {
    /// Publish derived metrics for a tier.
    fn update_sla_metrics(
        &self,
        service: &str,
        tier: &str,
        availability: f64,
        error_budget_remaining: f64,
        burn_rate: f64,
    );
}

/// Sink that drops every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn update_sla_metrics(&self, _: &str, _: &str, _: f64, _: f64, _: f64) {}
}

/// A counter metric (monotonically increasing).
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Increment by 1.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current value.
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicU64, // Store as bits for f64
}

impl Gauge {
    /// Set the gauge value.
    pub fn set(&self, value: f64) {
        self.value.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Get current value.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }
}

/// Metric metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricInfo {
    /// Metric name
    pub name: String,
    /// Help text
    pub help: String,
    /// Metric type
    pub metric_type: MetricType,
}

/// Metric type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricType {
    Counter,
    Gauge,
}

impl MetricType {
    fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
        }
    }
}

pub const AVAILABILITY_METRIC: &str = "sla_availability";
pub const ERROR_BUDGET_METRIC: &str = "sla_error_budget_remaining";
pub const BURN_RATE_METRIC: &str = "sla_error_budget_burn_rate";
pub const UPDATES_METRIC: &str = "sla_metric_updates_total";

/// Labelled series key, e.g. `sla_availability{service="api",tier="gold"}`.
fn series_key(name: &str, service: &str, tier: &str) -> String {
    format!("{}{{service=\"{}\",tier=\"{}\"}}", name, service, tier)
}

/// Metrics collector for SLA series.
pub struct MetricsCollector {
    /// Gauges by series key
    gauges: RwLock<BTreeMap<String, Gauge>>,
    /// Counters by series key
    counters: RwLock<BTreeMap<String, Counter>>,
    /// Metric info by metric name
    info: BTreeMap<String, MetricInfo>,
}

impl MetricsCollector {
    /// Create a collector with the SLA metric families registered.
    pub fn new() -> Self {
        let mut info = BTreeMap::new();
        for (name, help, metric_type) in [
            (AVAILABILITY_METRIC, "Current availability ratio per tier", MetricType::Gauge),
            (ERROR_BUDGET_METRIC, "Fraction of error budget remaining per tier", MetricType::Gauge),
            (BURN_RATE_METRIC, "Error budget burn rate per tier", MetricType::Gauge),
            (UPDATES_METRIC, "SLA metric updates received per tier", MetricType::Counter),
        ] {
            info.insert(
                name.to_string(),
                MetricInfo {
                    name: name.to_string(),
                    help: help.to_string(),
                    metric_type,
                },
            );
        }

        Self {
            gauges: RwLock::new(BTreeMap::new()),
            counters: RwLock::new(BTreeMap::new()),
            info,
        }
    }

    fn set_gauge(&self, name: &str, service: &str, tier: &str, value: f64) {
        let key = series_key(name, service, tier);
        if let Some(gauge) = self.gauges.read().get(&key) {
            gauge.set(value);
            return;
        }
        self.gauges.write().entry(key).or_default().set(value);
    }

    fn inc_counter(&self, name: &str, service: &str, tier: &str) {
        let key = series_key(name, service, tier);
        if let Some(counter) = self.counters.read().get(&key) {
            counter.inc();
            return;
        }
        self.counters.write().entry(key).or_default().inc();
    }

    /// Get a gauge value for a service and tier.
    pub fn get_gauge(&self, name: &str, service: &str, tier: &str) -> Option<f64> {
        self.gauges
            .read()
            .get(&series_key(name, service, tier))
            .map(|g| g.get())
    }

    /// Get a counter value for a service and tier.
    pub fn get_counter(&self, name: &str, service: &str, tier: &str) -> Option<u64> {
        self.counters
            .read()
            .get(&series_key(name, service, tier))
            .map(|c| c.get())
    }

    /// Export metrics in Prometheus text format.
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();
        let gauges = self.gauges.read();
        let counters = self.counters.read();

        for (name, info) in &self.info {
            output.push_str(&format!("# HELP {} {}\n", name, info.help));
            output.push_str(&format!("# TYPE {} {}\n", name, info.metric_type.as_str()));

            let prefix = format!("{}{{", name);
            match info.metric_type {
                MetricType::Gauge => {
                    for (key, gauge) in gauges.range(prefix.clone()..) {
                        if !key.starts_with(&prefix) {
                            break;
                        }
                        output.push_str(&format!("{} {}\n", key, gauge.get()));
                    }
                }
                MetricType::Counter => {
                    for (key, counter) in counters.range(prefix.clone()..) {
                        if !key.starts_with(&prefix) {
                            break;
                        }
                        output.push_str(&format!("{} {}\n", key, counter.get()));
                    }
                }
            }
        }

        output
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for MetricsCollector {
    fn update_sla_metrics(
        &self,
        service: &str,
        tier: &str,
        availability: f64,
        error_budget_remaining: f64,
        burn_rate: f64,
    ) {
        self.set_gauge(AVAILABILITY_METRIC, service, tier, availability);
        self.set_gauge(ERROR_BUDGET_METRIC, service, tier, error_budget_remaining);
        self.set_gauge(BURN_RATE_METRIC, service, tier, burn_rate);
        self.inc_counter(UPDATES_METRIC, service, tier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge() {
        let gauge = Gauge::default();
        assert_eq!(gauge.get(), 0.0);

        gauge.set(10.5);
        assert!((gauge.get() - 10.5).abs() < 1e-10);
    }

    #[test]
    fn test_counter() {
        let counter = Counter::default();
        counter.inc();
        counter.inc();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_collector_as_sink() {
        let collector = MetricsCollector::new();
        collector.update_sla_metrics("api", "gold", 0.998, 0.4, 2.0);
        collector.update_sla_metrics("api", "gold", 0.999, 1.0, 1.0);

        assert_eq!(collector.get_gauge(AVAILABILITY_METRIC, "api", "gold"), Some(0.999));
        assert_eq!(collector.get_gauge(BURN_RATE_METRIC, "api", "gold"), Some(1.0));
        assert_eq!(collector.get_counter(UPDATES_METRIC, "api", "gold"), Some(2));
        assert_eq!(collector.get_gauge(AVAILABILITY_METRIC, "api", "silver"), None);
    }

    #[test]
    fn test_prometheus_export() {
        let collector = MetricsCollector::new();
        collector.update_sla_metrics("api", "bronze", 0.97, 0.0, 3.0);

        let output = collector.export_prometheus();
        assert!(output.contains("# HELP sla_availability"));
        assert!(output.contains("# TYPE sla_error_budget_burn_rate gauge"));
        assert!(output.contains("# TYPE sla_metric_updates_total counter"));
        assert!(output.contains("sla_availability{service=\"api\",tier=\"bronze\"} 0.97"));
        assert!(output.contains("sla_metric_updates_total{service=\"api\",tier=\"bronze\"} 1"));
    }
}
