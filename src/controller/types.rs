use bytes::Bytes;

use crate::error::HarnessError;

// ==========================================
// CALLER-SUPPLIED CONFIGURATION
// ==========================================

/// Identifies the target stream and its desired shard cardinality.
/// Immutable for the duration of a test run.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub name: String,
    pub partition_count: u32,
}

impl StreamConfig {
    pub fn new(name: impl Into<String>, partition_count: u32) -> Result<Self, HarnessError> {
        if partition_count < 1 {
            return Err(HarnessError::Configuration(
                "partition count must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            partition_count,
        })
    }
}

/// Which shard to read and from where to start. Supplied per consume call.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub partition_id: String,
    pub strategy: IteratorStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IteratorStrategy {
    Latest,
    TrimHorizon,
    AtSequenceNumber(String),
    AfterSequenceNumber(String),
}

// ==========================================
// REMOTE STATE (observed, never owned)
// ==========================================

/// Lifecycle state of the remote stream. `Absent` models a not-found
/// describe, so the reconciliation check stays a plain equality test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Creating,
    Active,
    Deleting,
    Deleted,
    Absent,
    Unknown,
}

impl StreamStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "CREATING" => StreamStatus::Creating,
            "ACTIVE" => StreamStatus::Active,
            "DELETING" => StreamStatus::Deleting,
            "DELETED" => StreamStatus::Deleted,
            _ => StreamStatus::Unknown,
        }
    }
}

/// Ground truth returned by describe. The controller only observes and polls it.
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    pub name: String,
    pub shard_ids: Vec<String>,
    pub status: StreamStatus,
}

// ==========================================
// RECORDS
// ==========================================

#[derive(Debug, Clone)]
pub struct EventRecord {
    pub sequence_number: String,
    pub shard_id: String,
    pub payload: Bytes,
}

/// Result of an append. `offset` is reserved (always zero) for a future
/// logical-offset feature; kept in the shape for interface stability.
#[derive(Debug, Clone)]
pub struct AppendAck {
    pub sequence_number: String,
    pub offset: u64,
    pub shard_id: String,
}

/// An opaque iterator token paired with the shard it points into, so batch
/// reads can stamp the shard id onto consumed records.
#[derive(Debug, Clone)]
pub struct ShardCursor {
    pub shard_id: String,
    pub token: String,
}
