//! Per-batch cancellation watcher.
//!
//! While a batch's pause is running, the watcher polls the token every
//! [`POLL_INTERVAL`] and switches the status message to the "cancelled" text
//! as soon as the token trips. The owning loop iteration disarms it when the
//! pause ends.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::status::StatusHandle;
use crate::token::CancellationToken;

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to a background watcher task.
///
/// The task resolves to `true` once it has reported the cancellation on the
/// status message.
pub struct CancellationWatcher {
    handle: JoinHandle<bool>,
    token: CancellationToken,
}

impl CancellationWatcher {
    /// Spawn the polling loop for one batch.
    pub fn arm(
        token: CancellationToken,
        status: Arc<dyn StatusHandle>,
        cancelled_html: String,
    ) -> Self {
        let watched = token.clone();
        let handle = tokio::spawn(async move {
            loop {
                if !watched.is_active() {
                    if let Err(e) = status.edit(&cancelled_html).await {
                        warn!(error = %e, "tagall: failed to show cancellation on status message");
                    }
                    return true;
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        });
        CancellationWatcher { handle, token }
    }

    /// Stop the watcher and wait for the task to finish.
    ///
    /// While the token is active the polling loop is aborted. Once it has
    /// tripped the watcher is left to finish its status edit and exit on its
    /// own, so the edit is never cut short.
    ///
    /// Returns whether the watcher reported the cancellation.
    pub async fn disarm(self) -> bool {
        if self.token.is_active() {
            self.handle.abort();
        }
        match self.handle.await {
            Ok(reported) => reported,
            Err(e) if e.is_cancelled() => false,
            Err(e) => {
                debug!(error = %e, "tagall: watcher task ended abnormally");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStatus {
        edits: Mutex<Vec<String>>,
        started: Mutex<usize>,
        latency: Duration,
    }

    #[async_trait]
    impl StatusHandle for RecordingStatus {
        async fn edit(&self, html: &str) -> Result<(), DeliveryError> {
            *self.started.lock().unwrap() += 1;
            tokio::time::sleep(self.latency).await;
            self.edits.lock().unwrap().push(html.to_string());
            Ok(())
        }
        async fn delete(&self) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reports_cancellation_within_one_poll() {
        let token = CancellationToken::new();
        let status = Arc::new(RecordingStatus::default());
        let watcher = CancellationWatcher::arm(token.clone(), status.clone(), "stopped".into());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(status.edits.lock().unwrap().is_empty());

        token.stop();
        tokio::time::sleep(POLL_INTERVAL * 2).await;
        assert_eq!(*status.edits.lock().unwrap(), vec!["stopped".to_string()]);
        assert!(watcher.disarm().await);
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_stops_an_idle_watcher() {
        let token = CancellationToken::new();
        let status = Arc::new(RecordingStatus::default());
        let watcher = CancellationWatcher::arm(token.clone(), status.clone(), "stopped".into());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!watcher.disarm().await);

        // A trip after disarming must not reach the status message.
        token.stop();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(status.edits.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn already_stopped_token_is_reported_immediately() {
        let token = CancellationToken::new();
        token.stop();
        let status = Arc::new(RecordingStatus::default());
        let watcher = CancellationWatcher::arm(token, status.clone(), "stopped".into());
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(watcher.disarm().await);
        assert_eq!(status.edits.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_lets_an_edit_in_flight_complete() {
        let token = CancellationToken::new();
        let status = Arc::new(RecordingStatus {
            latency: Duration::from_millis(200),
            ..Default::default()
        });
        let watcher = CancellationWatcher::arm(token.clone(), status.clone(), "stopped".into());

        token.stop();
        tokio::time::sleep(POLL_INTERVAL + Duration::from_millis(50)).await;
        assert_eq!(*status.started.lock().unwrap(), 1);
        assert!(status.edits.lock().unwrap().is_empty());

        assert!(watcher.disarm().await);
        assert_eq!(*status.started.lock().unwrap(), 1);
        assert_eq!(*status.edits.lock().unwrap(), vec!["stopped".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_after_a_trip_waits_for_the_next_poll() {
        let token = CancellationToken::new();
        let status = Arc::new(RecordingStatus::default());
        let watcher = CancellationWatcher::arm(token.clone(), status.clone(), "stopped".into());

        tokio::time::sleep(Duration::from_millis(10)).await;
        token.stop();
        assert!(watcher.disarm().await);
        assert_eq!(status.edits.lock().unwrap().len(), 1);
    }
}
