//! Error types for the correlation client.
//!
//! Only transport-level failures live here. A wallet refusing a request is an
//! answer, not a failure, and is reported through [`crate::WalletError`].

use std::time::Duration;
use thiserror::Error;

use crate::domain::config::ConfigError;
use crate::domain::correlation::RequestId;
use crate::domain::pending::TransportFailure;
use crate::domain::types::RequestKind;

/// Stream adapter errors
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream not initialized")]
    NotInitialized,
    #[error("stream already has a listener")]
    AlreadyListening,
    #[error("channel closed")]
    ChannelClosed,
    #[error("handshake token mismatch")]
    HandshakeMismatch,
    #[error("message is not a request with a resolver id")]
    Unanswerable,
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Pending-request registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("request id {0} is already pending")]
    DuplicateId(RequestId),
}

/// Transport-level failure of a request
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("request {id} timed out after {after:?}")]
    Timeout { id: RequestId, after: Duration },

    #[error("stream closed before request {0} was answered")]
    Disconnected(RequestId),

    #[error("request {0} was dropped without an answer")]
    Cancelled(RequestId),

    #[error("reply to {kind} request {id} could not be decoded: {source}")]
    MalformedReply {
        id: RequestId,
        kind: RequestKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("request payload could not be encoded: {0}")]
    PayloadEncoding(#[source] serde_json::Error),

    #[error("no network selected")]
    NetworkUnset,

    #[error("client is shut down")]
    Closed,
}

impl ClientError {
    /// Map a registry failure for `id` onto the client error it surfaces as.
    pub fn from_failure(id: RequestId, failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Timeout { after } => ClientError::Timeout { id, after },
            TransportFailure::Disconnected => ClientError::Disconnected(id),
        }
    }

    /// True for failures where the wallet may still have acted on the request.
    pub fn is_indeterminate(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout { .. } | ClientError::Disconnected(_) | ClientError::Cancelled(_)
        )
    }
}
