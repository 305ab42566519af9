//! AWS Kinesis-backed `StreamApi`: request shaping and response unwrapping
//! only. Retry policy is controller-owned.

use async_trait::async_trait;
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::types::ShardIteratorType;
use aws_sdk_kinesis::Client;
use bytes::Bytes;

use crate::client::api::StreamApi;
use crate::client::to_client_error;
use crate::controller::types::{
    AppendAck, EventRecord, IteratorStrategy, ShardCursor, StreamDescriptor, StreamStatus,
};
use crate::error::ClientError;

pub struct KinesisStreamClient {
    client: Client,
}

impl KinesisStreamClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl StreamApi for KinesisStreamClient {
    async fn create(&self, name: &str, partition_count: u32) -> Result<(), ClientError> {
        self.client
            .create_stream()
            .stream_name(name)
            .shard_count(partition_count as i32)
            .send()
            .await
            .map_err(to_client_error)?;
        Ok(())
    }

    async fn describe(&self, name: &str) -> Result<StreamDescriptor, ClientError> {
        let out = self
            .client
            .describe_stream()
            .stream_name(name)
            .send()
            .await
            .map_err(to_client_error)?;

        let desc = out.stream_description().ok_or_else(|| {
            ClientError::Service("describe response missing stream description".to_string())
        })?;

        Ok(StreamDescriptor {
            name: desc.stream_name().to_string(),
            shard_ids: desc
                .shards()
                .iter()
                .map(|s| s.shard_id().to_string())
                .collect(),
            status: StreamStatus::parse(desc.stream_status().as_str()),
        })
    }

    async fn delete(&self, name: &str) -> Result<(), ClientError> {
        self.client
            .delete_stream()
            .stream_name(name)
            .send()
            .await
            .map_err(to_client_error)?;
        Ok(())
    }

    async fn put(
        &self,
        name: &str,
        payload: Bytes,
        partition_key: &str,
    ) -> Result<AppendAck, ClientError> {
        let out = self
            .client
            .put_record()
            .stream_name(name)
            .partition_key(partition_key)
            .data(Blob::new(payload.to_vec()))
            .send()
            .await
            .map_err(to_client_error)?;

        Ok(AppendAck {
            sequence_number: out.sequence_number().to_string(),
            offset: 0,
            shard_id: out.shard_id().to_string(),
        })
    }

    async fn open_shard_iterator(
        &self,
        name: &str,
        partition_id: &str,
        strategy: &IteratorStrategy,
    ) -> Result<ShardCursor, ClientError> {
        let req = self
            .client
            .get_shard_iterator()
            .stream_name(name)
            .shard_id(partition_id);

        let req = match strategy {
            IteratorStrategy::Latest => req.shard_iterator_type(ShardIteratorType::Latest),
            IteratorStrategy::TrimHorizon => {
                req.shard_iterator_type(ShardIteratorType::TrimHorizon)
            }
            IteratorStrategy::AtSequenceNumber(seq) => req
                .shard_iterator_type(ShardIteratorType::AtSequenceNumber)
                .starting_sequence_number(seq.as_str()),
            IteratorStrategy::AfterSequenceNumber(seq) => req
                .shard_iterator_type(ShardIteratorType::AfterSequenceNumber)
                .starting_sequence_number(seq.as_str()),
        };

        let out = req.send().await.map_err(to_client_error)?;
        let token = out
            .shard_iterator()
            .ok_or_else(|| ClientError::Service("no shard iterator returned".to_string()))?
            .to_string();

        Ok(ShardCursor {
            shard_id: partition_id.to_string(),
            token,
        })
    }

    async fn get_batch(
        &self,
        cursor: &ShardCursor,
        max_count: usize,
    ) -> Result<Vec<EventRecord>, ClientError> {
        let out = self
            .client
            .get_records()
            .shard_iterator(cursor.token.as_str())
            .limit(max_count as i32)
            .send()
            .await
            .map_err(to_client_error)?;

        Ok(out
            .records()
            .iter()
            .map(|r| EventRecord {
                sequence_number: r.sequence_number().to_string(),
                shard_id: cursor.shard_id.clone(),
                payload: Bytes::copy_from_slice(r.data().as_ref()),
            })
            .collect())
    }
}
