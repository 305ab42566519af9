use thiserror::Error;

use crate::controller::types::StreamStatus;

/// Failure surface of the remote collaborators (stream service, offset store).
/// NotFound is split out because the destroy path treats it as success.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("resource not found")]
    NotFound,
    #[error("service error: {0}")]
    Service(String),
}

#[derive(Debug, Error)]
pub enum HarnessError {
    /// A create/delete request was not acknowledged by the service.
    #[error("provisioning failed: {0}")]
    Provisioning(String),

    /// Invalid caller-supplied configuration, distinct from transient service trouble.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote status never converged within the iteration budget.
    #[error("status did not converge to {expected:?} after {attempts} polls")]
    ReconciliationTimeout {
        expected: StreamStatus,
        attempts: u32,
    },

    #[error(transparent)]
    Service(#[from] ClientError),

    /// A consumed payload failed to decode: producer/consumer contract drift.
    #[error("malformed event payload: {0}")]
    MalformedPayload(String),
}
