use std::future::Future;
use std::time::Duration;

use crate::controller::types::StreamStatus;
use crate::error::{ClientError, HarnessError};

/// Bounded polling policy shared by create-wait and destroy-wait.
/// The bound trades wall-clock time against false negatives: generous enough
/// for typical provisioning latency, finite so a stuck deployment fails the
/// run instead of hanging it.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    /// Polls `probe` until the observed status equals `expected`, or the
    /// resource is gone while `absent_is_success` is set. A not-found probe
    /// maps to `Absent`; any other probe error propagates. Fails with
    /// `ReconciliationTimeout` after exactly `max_attempts` probes.
    pub async fn wait_until<F, Fut>(
        &self,
        expected: StreamStatus,
        absent_is_success: bool,
        mut probe: F,
    ) -> Result<(), HarnessError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<StreamStatus, ClientError>>,
    {
        for attempt in 1..=self.max_attempts {
            let current = match probe().await {
                Ok(status) => status,
                Err(ClientError::NotFound) => StreamStatus::Absent,
                Err(e) => return Err(HarnessError::Service(e)),
            };

            if current == expected || (absent_is_success && current == StreamStatus::Absent) {
                tracing::debug!(
                    "[Reconcile] Reached {:?} after {} poll(s)",
                    current,
                    attempt
                );
                return Ok(());
            }

            tracing::debug!(
                "[Reconcile] Status {:?}, waiting for {:?} (poll {}/{})",
                current,
                expected,
                attempt,
                self.max_attempts
            );
            tokio::time::sleep(self.interval).await;
        }

        Err(HarnessError::ReconciliationTimeout {
            expected,
            attempts: self.max_attempts,
        })
    }
}
