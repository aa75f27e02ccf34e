//! Message codec: builds outbound requests and interprets inbound frames.

use serde::Serialize;
use serde_json::Value;

use crate::domain::correlation::RequestId;
use crate::domain::network::NetworkContext;
use crate::domain::types::RequestKind;
use crate::error::{ClientError, StreamError};
use crate::ipc::message::Message;

/// What the dispatch loop should do with an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Handshake reply for the stream adapter
    Sync(Message),
    /// Reply to settle in the pending store
    Reply { identifier: RequestId, payload: Value },
    /// Non-sync message without an identifier
    Unroutable(Message),
}

/// Build an outbound request message.
pub fn build_request<P: Serialize + ?Sized>(
    kind: RequestKind,
    payload: &P,
    identifier: RequestId,
    network: NetworkContext,
) -> Result<Message, ClientError> {
    let payload = serde_json::to_value(payload).map_err(ClientError::PayloadEncoding)?;
    Ok(Message::request(kind, payload, identifier, network))
}

/// Classify an inbound message.
pub fn classify(message: Message) -> Inbound {
    if message.is_sync() {
        return Inbound::Sync(message);
    }
    match message.identifier {
        Some(identifier) => Inbound::Reply {
            identifier,
            payload: message.payload,
        },
        None => Inbound::Unroutable(message),
    }
}

/// Encode a message as a JSON text frame.
pub fn encode(message: &Message) -> Result<String, StreamError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode a JSON text frame.
pub fn decode(frame: &str) -> Result<Message, StreamError> {
    Ok(serde_json::from_str(frame)?)
}
