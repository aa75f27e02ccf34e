//! Messages exchanged over the encrypted stream.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::correlation::RequestId;
use crate::domain::network::NetworkContext;
use crate::domain::session::HandshakeToken;
use crate::domain::types::RequestKind;

/// The `type` field of a message: a request kind or the handshake marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    RequestPermissions,
    ProveIdentity,
    RequestTransaction,
    GetBalance,
    #[serde(rename = "sync")]
    Sync,
}

impl MessageKind {
    /// Request kind, or `None` for the handshake marker.
    pub fn request_kind(&self) -> Option<RequestKind> {
        match self {
            MessageKind::RequestPermissions => Some(RequestKind::RequestPermissions),
            MessageKind::ProveIdentity => Some(RequestKind::ProveIdentity),
            MessageKind::RequestTransaction => Some(RequestKind::RequestTransaction),
            MessageKind::GetBalance => Some(RequestKind::GetBalance),
            MessageKind::Sync => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self.request_kind() {
            Some(kind) => kind.as_str(),
            None => "sync",
        }
    }
}

impl From<RequestKind> for MessageKind {
    fn from(kind: RequestKind) -> Self {
        match kind {
            RequestKind::RequestPermissions => MessageKind::RequestPermissions,
            RequestKind::ProveIdentity => MessageKind::ProveIdentity,
            RequestKind::RequestTransaction => MessageKind::RequestTransaction,
            RequestKind::GetBalance => MessageKind::GetBalance,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One frame on the stream, in either direction.
///
/// Wire shape: `{"type", "payload", "resolverId", "network"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "resolverId", default)]
    pub identifier: Option<RequestId>,
    #[serde(default, deserialize_with = "lenient_network")]
    pub network: NetworkContext,
}

/// Routing only needs `type` and `resolverId`, so a `network` value the
/// client cannot read is taken as unset instead of rejecting the frame.
fn lenient_network<'de, D>(deserializer: D) -> Result<NetworkContext, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

impl Message {
    /// Outbound request tagged with its correlation identifier.
    pub fn request(
        kind: RequestKind,
        payload: Value,
        identifier: RequestId,
        network: NetworkContext,
    ) -> Self {
        Self {
            kind: kind.into(),
            payload,
            identifier: Some(identifier),
            network,
        }
    }

    /// Handshake message. Carries no identifier.
    pub fn sync(handshake: &HandshakeToken) -> Self {
        Self {
            kind: MessageKind::Sync,
            payload: serde_json::json!({ "handshake": handshake.as_str() }),
            identifier: None,
            network: NetworkContext::Unset,
        }
    }

    /// Reply to a request, as the wallet sends it.
    pub fn reply(kind: RequestKind, identifier: RequestId, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
            identifier: Some(identifier),
            network: NetworkContext::Unset,
        }
    }

    pub fn is_sync(&self) -> bool {
        self.kind == MessageKind::Sync
    }

    /// Handshake token carried by a sync message.
    pub fn handshake(&self) -> Option<&str> {
        if !self.is_sync() {
            return None;
        }
        self.payload.get("handshake").and_then(Value::as_str)
    }
}
