//! Monitoring Module
//!
//! Provides observability for tierwatch:
//! - Prometheus-style SLA metrics export
//! - Error budget alerting
//! - Structured logging

pub mod alerts;
pub mod logging;
pub mod metrics;

pub use alerts::{Alert, AlertCondition, AlertManager, AlertRule, AlertSeverity, AlertSignal};
pub use logging::{init_tracing, LogFormat, LoggingConfig};
pub use metrics::{MetricsCollector, MetricsSink, NoopSink};
