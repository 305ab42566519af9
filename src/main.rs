//! Smoke-cycle entry point: provisions a short-lived stream, round-trips one
//! event through it, and tears everything down again. Setup failures abort
//! the process; teardown failures are logged and absorbed.

use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use tracing_subscriber::EnvFilter;

use sluice::client::{DynamoOffsetStore, KinesisStreamClient};
use sluice::config::Config;
use sluice::controller::types::{ConsumerConfig, IteratorStrategy, StreamConfig};
use sluice::StreamHarness;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::global();

    // Proxy settings come from the configuration source; the HTTP stack picks
    // them up from the standard env vars.
    if let (Some(host), Some(port)) = (&config.aws.proxy_host, config.aws.proxy_port) {
        let proxy = format!("http://{}:{}", host, port);
        tracing::info!("[Main] Routing through proxy {}", proxy);
        std::env::set_var("HTTP_PROXY", &proxy);
        std::env::set_var("HTTPS_PROXY", &proxy);
    }

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws.region.clone()));
    if let Some(profile) = &config.aws.profile {
        loader = loader.profile_name(profile.as_str());
    }
    let sdk = loader.load().await;

    let harness = StreamHarness::new(
        Arc::new(KinesisStreamClient::from_conf(&sdk)),
        Arc::new(DynamoOffsetStore::from_conf(&sdk)),
        config,
    );

    let stream = match StreamConfig::new("sluice-smoke", 2) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("[Main] {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_cycle(&harness, &stream).await {
        tracing::error!("[Main] Smoke cycle failed: {}", e);
        harness.teardown(&stream, None).await;
        std::process::exit(1);
    }

    if !harness.teardown(&stream, None).await {
        tracing::warn!("[Main] Teardown left resources behind; clean up manually");
    }
}

async fn run_cycle(
    harness: &sluice::AwsStreamHarness,
    stream: &StreamConfig,
) -> Result<(), sluice::error::HarnessError> {
    let descriptor = harness.controller.start_broker(stream).await?;
    tracing::info!(
        "[Main] Stream up: {} shard(s) {:?}",
        descriptor.shard_ids.len(),
        descriptor.shard_ids
    );

    let payload = serde_json::json!({ "id": 1 });
    let ack = harness.controller.append_event(stream, &payload).await?;
    tracing::info!("[Main] Appended event, seq {}", ack.sequence_number);

    let consumer = ConsumerConfig {
        partition_id: ack.shard_id.clone(),
        strategy: IteratorStrategy::TrimHorizon,
    };
    let events = harness.controller.consume_event(stream, &consumer).await?;
    tracing::info!("[Main] Consumed {} event(s): {:?}", events.len(), events);

    Ok(())
}
