//! Delayed delivery of assistant replies
//!
//! A reply is computed when the user message is sent and appended after a
//! fixed delay. The delivery task re-checks that the session still exists
//! before writing, so deleting a session (or its table) while a reply is in
//! flight is harmless.

use crate::registry::{PendingReply, ReplyOutcome, SharedRegistry};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to a scheduled reply
pub struct ReplyHandle {
    session_id: String,
    task: JoinHandle<ReplyOutcome>,
}

impl ReplyHandle {
    /// Session the reply is addressed to
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Stop the reply from being delivered
    pub fn cancel(&self) {
        debug!("Cancelling reply for session {}", self.session_id);
        self.task.abort();
    }

    /// Wait for the delivery to finish
    pub async fn wait(self) -> ReplyOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => ReplyOutcome::Cancelled,
            Err(e) => {
                tracing::warn!("Reply task for session {} failed: {}", self.session_id, e);
                ReplyOutcome::Cancelled
            }
        }
    }
}

/// Schedules replies against a shared registry
#[derive(Clone)]
pub struct ReplyScheduler {
    registry: SharedRegistry,
    delay: Duration,
}

impl ReplyScheduler {
    /// Create a scheduler that delivers replies after `delay`
    pub fn new(registry: SharedRegistry, delay: Duration) -> Self {
        Self { registry, delay }
    }

    /// Configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Deliver `reply` after the configured delay
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, reply: PendingReply) -> ReplyHandle {
        let registry = self.registry.clone();
        let delay = self.delay;
        let session_id = reply.session_id.clone();

        let task = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let outcome = registry.lock().deliver_reply(reply);
            debug!("Reply delivery finished: {:?}", outcome);
            outcome
        });

        ReplyHandle { session_id, task }
    }
}
