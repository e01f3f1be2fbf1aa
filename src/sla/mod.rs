//! SLA Module
//!
//! Provides tiered Service Level Agreement tracking:
//! - Per-tier targets and latency classification
//! - Request recording and periodic recomputation
//! - Health status, summaries and reporting

pub mod agreement;
pub mod calculator;
pub mod classifier;
pub mod reporter;
pub mod scheduler;
pub mod status;
pub mod tracker;
pub mod window;

pub use agreement::{SlaConfiguration, TrackerConfig};
pub use classifier::{TierClassifier, TierThresholds};
pub use reporter::{SlaReporter, SlaSummary, TierSummary};
pub use status::HealthStatus;
pub use tracker::{SlaMetrics, SlaTracker};
pub use window::SampleWindow;
