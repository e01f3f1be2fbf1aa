//! # tierwatch - tiered SLA tracking
//!
//! Classifies completed requests into service tiers by latency and tracks,
//! per tier:
//! - **Availability**: successful over total requests
//! - **Error budget**: fraction of the allowed unavailability not yet used
//! - **Burn rate**: observed error rate over the sustainable rate
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tierwatch::monitoring::MetricsCollector;
//! use tierwatch::sla::{SlaTracker, TrackerConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> tierwatch::Result<()> {
//!     let collector = Arc::new(MetricsCollector::new());
//!     let tracker = Arc::new(SlaTracker::new(TrackerConfig::new("api"), collector.clone())?);
//!
//!     tracker.start(CancellationToken::new())?;
//!     tracker.record_request(0.120, true, "/orders");
//!
//!     println!("{}", collector.export_prometheus());
//!     tracker.stop().await
//! }
//! ```

pub mod core;
pub mod monitoring;
pub mod sla;

pub use crate::core::error::{Error, Result};
pub use crate::core::types::{SlaTier, TierMap};
