//! Lifecycle Controller: drives a remote stream through create → wait-active,
//! produce/consume, and delete → wait-deleted, with the bounded reconciliation
//! loop and the idempotent-destroy race handling.
//!
//! Setup failures abort the caller (a broken environment must not run tests);
//! teardown failures are logged and absorbed at the harness boundary.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use uuid::Uuid;

use crate::client::api::StreamApi;
use crate::config::ControllerConfig;
use crate::controller::retry::RetryPolicy;
use crate::controller::types::{
    AppendAck, ConsumerConfig, StreamConfig, StreamDescriptor, StreamStatus,
};
use crate::error::{ClientError, HarnessError};

pub struct LifecycleController<S: StreamApi> {
    api: Arc<S>,
    policy: RetryPolicy,
    batch_size: usize,
    backoff: Duration,
}

impl<S: StreamApi> LifecycleController<S> {
    pub fn new(api: Arc<S>, config: ControllerConfig) -> Self {
        Self {
            api,
            policy: RetryPolicy {
                max_attempts: config.max_poll_attempts,
                interval: Duration::from_secs(config.poll_interval_secs),
            },
            batch_size: config.consume_batch_size,
            backoff: Duration::from_millis(config.consume_backoff_ms),
        }
    }

    // --- Lifecycle ---

    /// Creates the stream and blocks until the service reports it ACTIVE.
    /// Never returns a non-ACTIVE descriptor: an unconverged stream surfaces
    /// as `ReconciliationTimeout` instead.
    pub async fn start_broker(
        &self,
        config: &StreamConfig,
    ) -> Result<StreamDescriptor, HarnessError> {
        tracing::info!(
            "[Lifecycle] Creating stream '{}' with {} partition(s)",
            config.name,
            config.partition_count
        );

        self.api
            .create(&config.name, config.partition_count)
            .await
            .map_err(|e| {
                HarnessError::Provisioning(format!(
                    "create of '{}' not acknowledged: {}",
                    config.name, e
                ))
            })?;

        let api = &self.api;
        let name = config.name.as_str();
        self.policy
            .wait_until(StreamStatus::Active, false, || async move {
                api.describe(name).await.map(|d| d.status)
            })
            .await?;

        let descriptor = self.api.describe(name).await.map_err(HarnessError::Service)?;
        if descriptor.status != StreamStatus::Active {
            return Err(HarnessError::Provisioning(format!(
                "stream '{}' reported {:?} after convergence",
                name, descriptor.status
            )));
        }

        tracing::info!(
            "[Lifecycle] Stream '{}' active with shards {:?}",
            descriptor.name,
            descriptor.shard_ids
        );
        Ok(descriptor)
    }

    /// Deletes the stream and waits for it to be gone. Idempotent under
    /// races: a not-found response anywhere in the destroy path is success.
    /// Returns Ok(false) for absorbed non-fatal failures; only a timeout
    /// with the resource genuinely still present is an error.
    pub async fn destroy_broker(&self, config: &StreamConfig) -> Result<bool, HarnessError> {
        let name = config.name.as_str();
        tracing::info!("[Lifecycle] Deleting stream '{}'", name);

        match self.api.delete(name).await {
            Ok(()) => {}
            Err(ClientError::NotFound) => {
                tracing::info!("[Lifecycle] Stream '{}' already gone", name);
                return Ok(true);
            }
            Err(e) => {
                tracing::warn!("[Lifecycle] Delete request for '{}' failed: {}", name, e);
                return Ok(false);
            }
        }

        let api = &self.api;
        let wait = self
            .policy
            .wait_until(StreamStatus::Deleted, true, || async move {
                api.describe(name).await.map(|d| d.status)
            })
            .await;

        match wait {
            Ok(()) => {}
            Err(e @ HarnessError::ReconciliationTimeout { .. }) => return Err(e),
            Err(e) => {
                tracing::warn!("[Lifecycle] Delete-wait on '{}' failed: {}", name, e);
                return Ok(false);
            }
        }

        // Confirmation describe. The resource legitimately vanishing between
        // the delete request and this query is the eventual-consistency
        // tombstone race: not-found here is success, never failure.
        match self.api.describe(name).await {
            Ok(d) if d.status == StreamStatus::Deleted => {
                tracing::info!("[Lifecycle] Stream '{}' deleted", name);
                Ok(true)
            }
            Ok(d) => {
                tracing::warn!(
                    "[Lifecycle] Stream '{}' still reports {:?} after delete-wait",
                    name,
                    d.status
                );
                Ok(false)
            }
            Err(ClientError::NotFound) => {
                tracing::info!("[Lifecycle] Stream '{}' confirmed gone", name);
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(
                    "[Lifecycle] Delete confirmation for '{}' failed: {}",
                    name,
                    e
                );
                Ok(false)
            }
        }
    }

    // --- Produce / Consume ---

    /// Appends one event under a freshly generated random partition key, so
    /// every append is independently load-balanced across shards.
    pub async fn append_event(
        &self,
        config: &StreamConfig,
        payload: &serde_json::Value,
    ) -> Result<AppendAck, HarnessError> {
        let bytes = serde_json::to_vec(payload)
            .map(Bytes::from)
            .map_err(|e| HarnessError::MalformedPayload(e.to_string()))?;
        let partition_key = Uuid::new_v4().to_string();

        let ack = self
            .api
            .put(&config.name, bytes, &partition_key)
            .await
            .map_err(HarnessError::Service)?;

        tracing::debug!(
            "[Lifecycle] Appended seq {} to shard {}",
            ack.sequence_number,
            ack.shard_id
        );
        Ok(ack)
    }

    /// Fetches up to one batch of events from the shard named by `consumer`.
    /// An empty first fetch gets exactly one bounded backoff and one retry on
    /// the same cursor (iterators are positional), then whatever the second
    /// fetch yields is returned, possibly empty.
    pub async fn consume_event(
        &self,
        config: &StreamConfig,
        consumer: &ConsumerConfig,
    ) -> Result<Vec<serde_json::Value>, HarnessError> {
        let cursor = self
            .api
            .open_shard_iterator(&config.name, &consumer.partition_id, &consumer.strategy)
            .await
            .map_err(HarnessError::Service)?;

        let mut batch = self
            .api
            .get_batch(&cursor, self.batch_size)
            .await
            .map_err(HarnessError::Service)?;

        if batch.is_empty() {
            tracing::debug!(
                "[Lifecycle] Empty fetch on shard {}, backing off once",
                cursor.shard_id
            );
            tokio::time::sleep(self.backoff).await;
            batch = self
                .api
                .get_batch(&cursor, self.batch_size)
                .await
                .map_err(HarnessError::Service)?;
        }

        batch
            .into_iter()
            .map(|record| {
                serde_json::from_slice(&record.payload).map_err(|e| {
                    HarnessError::MalformedPayload(format!(
                        "record {}: {}",
                        record.sequence_number, e
                    ))
                })
            })
            .collect()
    }
}
