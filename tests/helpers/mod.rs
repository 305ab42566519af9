#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use sluice::client::api::{OffsetStoreApi, StreamApi};
use sluice::config::{AwsConfig, Config, ControllerConfig};
use sluice::controller::types::{
    AppendAck, EventRecord, IteratorStrategy, ShardCursor, StreamDescriptor, StreamStatus,
};
use sluice::controller::LifecycleController;
use sluice::error::ClientError;
use sluice::StreamHarness;

// ==========================================
// SCRIPTED FAKE STREAM SERVICE
// ==========================================

/// What the next describe call should report.
#[derive(Debug, Clone)]
pub enum DescribeOutcome {
    Status(StreamStatus),
    NotFound,
    Fail(String),
}

struct StoredRecord {
    seq: u64,
    shard: String,
    payload: Bytes,
}

struct Inner {
    created: bool,
    shard_ids: Vec<String>,
    describe_plan: VecDeque<DescribeOutcome>,
    steady: DescribeOutcome,
    linger_on_delete: Option<StreamStatus>,
    fail_next_delete: Option<ClientError>,
    describe_calls: u32,
    fetch_calls: u32,
    next_seq: u64,
    next_shard: usize,
    records: Vec<StoredRecord>,
    visible_after_fetch: u32,
}

/// In-memory stand-in for the remote streaming service. Describe outcomes
/// follow a script (then a steady state), so tests can replay convergence,
/// tombstone races, and throttling without a network.
pub struct FakeStream {
    inner: Mutex<Inner>,
}

impl FakeStream {
    pub fn new(shard_count: usize) -> Arc<Self> {
        let shard_ids = (0..shard_count)
            .map(|i| format!("shardId-{:012}", i))
            .collect();
        Arc::new(Self {
            inner: Mutex::new(Inner {
                created: false,
                shard_ids,
                describe_plan: VecDeque::new(),
                steady: DescribeOutcome::Status(StreamStatus::Active),
                linger_on_delete: None,
                fail_next_delete: None,
                describe_calls: 0,
                fetch_calls: 0,
                next_seq: 0,
                next_shard: 0,
                records: Vec::new(),
                visible_after_fetch: 0,
            }),
        })
    }

    /// Queues describe outcomes ahead of the steady state.
    pub fn queue_describe(&self, outcomes: Vec<DescribeOutcome>) {
        self.inner.lock().unwrap().describe_plan.extend(outcomes);
    }

    pub fn set_steady(&self, outcome: DescribeOutcome) {
        self.inner.lock().unwrap().steady = outcome;
    }

    /// Pretends the stream already exists without going through create.
    pub fn mark_created(&self) {
        self.inner.lock().unwrap().created = true;
    }

    /// After delete, keep reporting `status` instead of vanishing.
    pub fn linger_on_delete(&self, status: StreamStatus) {
        self.inner.lock().unwrap().linger_on_delete = Some(status);
    }

    pub fn fail_next_delete(&self, err: ClientError) {
        self.inner.lock().unwrap().fail_next_delete = Some(err);
    }

    /// Records stay invisible until the nth fetch, simulating replication lag.
    pub fn hold_records_until_fetch(&self, nth: u32) {
        self.inner.lock().unwrap().visible_after_fetch = nth;
    }

    /// Plants a pre-encoded record, bypassing the producer path.
    pub fn inject_raw(&self, shard: &str, payload: Bytes) {
        let mut inner = self.inner.lock().unwrap();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.records.push(StoredRecord {
            seq,
            shard: shard.to_string(),
            payload,
        });
    }

    pub fn describe_calls(&self) -> u32 {
        self.inner.lock().unwrap().describe_calls
    }

    pub fn fetch_calls(&self) -> u32 {
        self.inner.lock().unwrap().fetch_calls
    }
}

#[async_trait]
impl StreamApi for FakeStream {
    async fn create(&self, _name: &str, _partition_count: u32) -> Result<(), ClientError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.created {
            return Err(ClientError::Service("resource in use".to_string()));
        }
        inner.created = true;
        Ok(())
    }

    async fn describe(&self, name: &str) -> Result<StreamDescriptor, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.describe_calls += 1;
        let outcome = inner
            .describe_plan
            .pop_front()
            .unwrap_or_else(|| inner.steady.clone());
        match outcome {
            DescribeOutcome::Status(status) => Ok(StreamDescriptor {
                name: name.to_string(),
                shard_ids: inner.shard_ids.clone(),
                status,
            }),
            DescribeOutcome::NotFound => Err(ClientError::NotFound),
            DescribeOutcome::Fail(msg) => Err(ClientError::Service(msg)),
        }
    }

    async fn delete(&self, _name: &str) -> Result<(), ClientError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = inner.fail_next_delete.take() {
            return Err(err);
        }
        if !inner.created {
            return Err(ClientError::NotFound);
        }
        inner.created = false;
        inner.steady = match inner.linger_on_delete {
            Some(status) => DescribeOutcome::Status(status),
            None => DescribeOutcome::NotFound,
        };
        Ok(())
    }

    async fn put(
        &self,
        _name: &str,
        payload: Bytes,
        _partition_key: &str,
    ) -> Result<AppendAck, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.created {
            return Err(ClientError::NotFound);
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let shard = inner.shard_ids[inner.next_shard % inner.shard_ids.len()].clone();
        inner.next_shard += 1;
        inner.records.push(StoredRecord {
            seq,
            shard: shard.clone(),
            payload,
        });
        Ok(AppendAck {
            sequence_number: seq.to_string(),
            offset: 0,
            shard_id: shard,
        })
    }

    async fn open_shard_iterator(
        &self,
        _name: &str,
        partition_id: &str,
        strategy: &IteratorStrategy,
    ) -> Result<ShardCursor, ClientError> {
        let inner = self.inner.lock().unwrap();
        if !inner.created {
            return Err(ClientError::NotFound);
        }
        let start = match strategy {
            IteratorStrategy::TrimHorizon => 0,
            IteratorStrategy::Latest => inner.next_seq,
            IteratorStrategy::AtSequenceNumber(s) => s.parse().unwrap_or(0),
            IteratorStrategy::AfterSequenceNumber(s) => s.parse().map(|n: u64| n + 1).unwrap_or(0),
        };
        Ok(ShardCursor {
            shard_id: partition_id.to_string(),
            token: start.to_string(),
        })
    }

    async fn get_batch(
        &self,
        cursor: &ShardCursor,
        max_count: usize,
    ) -> Result<Vec<EventRecord>, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.fetch_calls += 1;
        if inner.fetch_calls < inner.visible_after_fetch {
            return Ok(Vec::new());
        }
        let start: u64 = cursor.token.parse().unwrap_or(0);
        Ok(inner
            .records
            .iter()
            .filter(|r| r.shard == cursor.shard_id && r.seq >= start)
            .take(max_count)
            .map(|r| EventRecord {
                sequence_number: r.seq.to_string(),
                shard_id: r.shard.clone(),
                payload: r.payload.clone(),
            })
            .collect())
    }
}

// ==========================================
// FAKE OFFSET STORE
// ==========================================

pub struct FakeOffsetStore {
    present: Mutex<bool>,
    calls: Mutex<u32>,
}

impl FakeOffsetStore {
    pub fn new(present: bool) -> Arc<Self> {
        Arc::new(Self {
            present: Mutex::new(present),
            calls: Mutex::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl OffsetStoreApi for FakeOffsetStore {
    async fn drop_consumer_state(&self, _table: &str) -> Result<u16, ClientError> {
        *self.calls.lock().unwrap() += 1;
        let mut present = self.present.lock().unwrap();
        if *present {
            *present = false;
            Ok(200)
        } else {
            Err(ClientError::NotFound)
        }
    }
}

// ==========================================
// SETUP HELPERS
// ==========================================

pub fn test_controller_config() -> ControllerConfig {
    ControllerConfig {
        max_poll_attempts: 6,
        poll_interval_secs: 9,
        consume_batch_size: 10,
        consume_backoff_ms: 1000,
    }
}

pub fn controller(fake: &Arc<FakeStream>) -> LifecycleController<FakeStream> {
    LifecycleController::new(fake.clone(), test_controller_config())
}

pub fn harness(
    stream: &Arc<FakeStream>,
    offsets: &Arc<FakeOffsetStore>,
) -> StreamHarness<FakeStream, FakeOffsetStore> {
    let config = Config {
        aws: AwsConfig {
            region: "us-east-1".to_string(),
            profile: None,
            proxy_host: None,
            proxy_port: None,
        },
        controller: test_controller_config(),
    };
    StreamHarness::new(stream.clone(), offsets.clone(), &config)
}
