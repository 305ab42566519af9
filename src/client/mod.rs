pub mod api;
pub mod dynamo;
pub mod kinesis;

use std::fmt::Debug;

use aws_sdk_kinesis::error::{ProvideErrorMetadata, SdkError};

use crate::error::ClientError;

pub use dynamo::DynamoOffsetStore;
pub use kinesis::KinesisStreamClient;

/// Maps an SDK failure to the facade error split: the service's
/// resource-not-found code becomes `NotFound`, everything else is `Service`.
pub(crate) fn to_client_error<E, R>(err: SdkError<E, R>) -> ClientError
where
    E: ProvideErrorMetadata + Debug,
    R: Debug,
{
    if err.code() == Some("ResourceNotFoundException") {
        return ClientError::NotFound;
    }
    match err.message() {
        Some(msg) => ClientError::Service(msg.to_string()),
        None => ClientError::Service(format!("{err:?}")),
    }
}
