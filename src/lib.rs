pub mod client;
pub mod config;
pub mod controller;
pub mod error;

use std::sync::Arc;

use crate::client::api::{OffsetStoreApi, StreamApi};
use crate::client::{DynamoOffsetStore, KinesisStreamClient};
use crate::config::Config;
use crate::controller::LifecycleController;
use crate::error::ClientError;

// ========================================
// HARNESS (The Aggregate)
// ========================================

/// Wires the lifecycle controller and the offset store together. One caller
/// task drives it; no internal parallelism.
pub struct StreamHarness<S: StreamApi, O: OffsetStoreApi> {
    pub controller: LifecycleController<S>,
    offsets: Arc<O>,
}

pub type AwsStreamHarness = StreamHarness<KinesisStreamClient, DynamoOffsetStore>;

impl<S: StreamApi, O: OffsetStoreApi> StreamHarness<S, O> {
    pub fn new(stream_api: Arc<S>, offset_api: Arc<O>, config: &Config) -> Self {
        Self {
            controller: LifecycleController::new(stream_api, config.controller.clone()),
            offsets: offset_api,
        }
    }

    /// Drops the named consumer-offset table. A table that is already gone
    /// counts as dropped; other failures are logged and absorbed.
    pub async fn drop_consumer_state(&self, table: &str) -> bool {
        match self.offsets.drop_consumer_state(table).await {
            Ok(code) => {
                tracing::info!(
                    "[Harness] Offset table '{}' drop accepted (status {})",
                    table,
                    code
                );
                (200..300).contains(&code)
            }
            Err(ClientError::NotFound) => {
                tracing::info!("[Harness] Offset table '{}' already gone", table);
                true
            }
            Err(e) => {
                tracing::warn!("[Harness] Dropping offset table '{}' failed: {}", table, e);
                false
            }
        }
    }

    /// Full teardown: destroy the stream, then optionally drop the offset
    /// table. Teardown runs after an already-finished test, so every failure
    /// here is logged and absorbed rather than propagated.
    pub async fn teardown(
        &self,
        config: &controller::types::StreamConfig,
        offset_table: Option<&str>,
    ) -> bool {
        let stream_ok = match self.controller.destroy_broker(config).await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::warn!("[Harness] Destroy of '{}' failed: {}", config.name, e);
                false
            }
        };

        let table_ok = match offset_table {
            Some(table) => self.drop_consumer_state(table).await,
            None => true,
        };

        stream_ok && table_ok
    }
}
