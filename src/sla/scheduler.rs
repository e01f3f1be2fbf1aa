//! Background recompute loop lifecycle.
//!
//! `start` spawns one tokio task per tracker that recomputes metrics on every
//! interval tick; `stop` cancels it and waits for it to exit. The task is
//! bound to a child of the caller's [`CancellationToken`], so cancelling the
//! parent token also ends the loop.

use crate::core::{Error, Result};
use crate::sla::tracker::SlaTracker;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// How long `stop` waits for the loop to exit.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to a running recompute loop.
pub(crate) struct RecomputeTask {
    pub(crate) cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl SlaTracker {
    /// Start the periodic recompute loop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRunning`] if the loop is live, and
    /// [`Error::RuntimeUnavailable`] when called outside a tokio runtime.
    #[instrument(skip(self, cancel), fields(service = %self.config.service_name))]
    pub fn start(self: &Arc<Self>, cancel: CancellationToken) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::RuntimeUnavailable(e.to_string()))?;

        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            return Err(Error::AlreadyRunning);
        }

        let cancel = cancel.child_token();
        let interval = self.config.recompute_interval;
        let handle = runtime.spawn(recompute_loop(
            Arc::downgrade(self),
            interval,
            cancel.clone(),
        ));
        *task = Some(RecomputeTask { cancel, handle });

        info!(interval_ms = interval.as_millis() as u64, "SLA recompute loop started");
        Ok(())
    }

    /// Stop the recompute loop and wait for it to exit.
    ///
    /// Calling `stop` on a stopped tracker is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StopTimeout`] if the task does not exit in time, or
    /// [`Error::TaskJoinFailed`] if it panicked.
    #[instrument(skip(self), fields(service = %self.config.service_name))]
    pub async fn stop(&self) -> Result<()> {
        let task = self.task.lock().take();
        let Some(task) = task else {
            debug!("SLA recompute loop not running");
            return Ok(());
        };

        task.cancel.cancel();
        match tokio::time::timeout(STOP_TIMEOUT, task.handle).await {
            Ok(joined) => joined?,
            Err(_) => {
                warn!(timeout_ms = STOP_TIMEOUT.as_millis() as u64, "SLA recompute loop did not stop");
                return Err(Error::StopTimeout {
                    duration: STOP_TIMEOUT,
                });
            }
        }

        info!("SLA recompute loop stopped");
        Ok(())
    }

    /// Whether the recompute loop is live.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }
}

async fn recompute_loop(tracker: Weak<SlaTracker>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("SLA recompute loop cancelled");
                break;
            }
            _ = ticker.tick() => {
                let Some(tracker) = tracker.upgrade() else {
                    debug!("SLA tracker dropped, ending recompute loop");
                    break;
                };
                tracker.recompute_metrics();
            }
        }
    }
}
