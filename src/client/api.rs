//! Narrow interfaces over the remote collaborators. These facades perform no
//! retries; retry policy lives entirely in the Lifecycle Controller.

use async_trait::async_trait;
use bytes::Bytes;

use crate::controller::types::{
    AppendAck, EventRecord, IteratorStrategy, ShardCursor, StreamDescriptor,
};
use crate::error::ClientError;

/// Request/response facade over the remote streaming service.
#[async_trait]
pub trait StreamApi: Send + Sync {
    async fn create(&self, name: &str, partition_count: u32) -> Result<(), ClientError>;

    async fn describe(&self, name: &str) -> Result<StreamDescriptor, ClientError>;

    async fn delete(&self, name: &str) -> Result<(), ClientError>;

    async fn put(
        &self,
        name: &str,
        payload: Bytes,
        partition_key: &str,
    ) -> Result<AppendAck, ClientError>;

    async fn open_shard_iterator(
        &self,
        name: &str,
        partition_id: &str,
        strategy: &IteratorStrategy,
    ) -> Result<ShardCursor, ClientError>;

    async fn get_batch(
        &self,
        cursor: &ShardCursor,
        max_count: usize,
    ) -> Result<Vec<EventRecord>, ClientError>;
}

/// Facade over the managed table store holding consumer offsets. Only used
/// to tear the offset table down; reports an HTTP-style success code.
#[async_trait]
pub trait OffsetStoreApi: Send + Sync {
    async fn drop_consumer_state(&self, table: &str) -> Result<u16, ClientError>;
}
