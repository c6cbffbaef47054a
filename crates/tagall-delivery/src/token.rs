//! Shared stop flag for one tagging invocation.

/// Cancellation flag shared between the delivery loop, its watcher and the
/// cancel button handler.
///
/// Starts active; [`stop`](Self::stop) flips it to inactive for good. Clones
/// share the same flag.
#[derive(Debug, Clone)]
pub struct CancellationToken(tokio_util::sync::CancellationToken);

impl CancellationToken {
    pub fn new() -> Self {
        Self(tokio_util::sync::CancellationToken::new())
    }

    /// Request cancellation. Idempotent.
    pub fn stop(&self) {
        self.0.cancel();
    }

    /// Synchronous read of the flag.
    pub fn is_active(&self) -> bool {
        !self.0.is_cancelled()
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
