//! DynamoDB-backed offset store facade. The harness only ever drops the
//! consumer-offset table; checkpoint reads and writes stay out of scope.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use crate::client::api::OffsetStoreApi;
use crate::client::to_client_error;
use crate::error::ClientError;

pub struct DynamoOffsetStore {
    client: Client,
}

impl DynamoOffsetStore {
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
impl OffsetStoreApi for DynamoOffsetStore {
    async fn drop_consumer_state(&self, table: &str) -> Result<u16, ClientError> {
        let out = self
            .client
            .delete_table()
            .table_name(table)
            .send()
            .await
            .map_err(to_client_error)?;

        let status = out
            .table_description()
            .and_then(|d| d.table_status())
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "DELETING".to_string());
        tracing::info!(
            "[OffsetStore] Table '{}' delete accepted, status {}",
            table,
            status
        );
        Ok(200)
    }
}
