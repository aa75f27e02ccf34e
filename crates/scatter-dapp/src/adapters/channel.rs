//! In-memory encrypted stream over bounded channels.
//!
//! Frames cross the channel as JSON text, so the codec runs exactly as it
//! would against a real transport. [`WalletEndpoint`] is the other end: it
//! reads what the client sends and injects replies.

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::domain::correlation::RequestId;
use crate::domain::session::{HandshakeToken, InjectionMode};
use crate::domain::types::RequestKind;
use crate::error::StreamError;
use crate::ipc::codec::{decode, encode};
use crate::ipc::message::Message;
use crate::ports::outbound::{EncryptedStream, InboundStream};

/// An outbound frame and the endpoint it was addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub endpoint: String,
    pub frame: String,
}

#[derive(Debug, Default)]
struct SessionState {
    mode: Option<InjectionMode>,
    handshake: Option<HandshakeToken>,
    synced: bool,
}

/// Client half of an in-memory stream.
pub struct ChannelStream {
    outbound: mpsc::Sender<Envelope>,
    inbound: Mutex<Option<mpsc::Receiver<String>>>,
    state: RwLock<SessionState>,
}

/// Wallet half of an in-memory stream.
pub struct WalletEndpoint {
    inbound: mpsc::Receiver<Envelope>,
    outbound: mpsc::Sender<String>,
}

/// Create a connected stream and wallet endpoint.
pub fn channel_pair(capacity: usize) -> (ChannelStream, WalletEndpoint) {
    let (to_wallet, from_client) = mpsc::channel(capacity);
    let (to_client, from_wallet) = mpsc::channel(capacity);
    let stream = ChannelStream {
        outbound: to_wallet,
        inbound: Mutex::new(Some(from_wallet)),
        state: RwLock::new(SessionState::default()),
    };
    let wallet = WalletEndpoint {
        inbound: from_client,
        outbound: to_client,
    };
    (stream, wallet)
}

impl ChannelStream {
    pub fn is_initialized(&self) -> bool {
        self.state.read().mode.is_some()
    }

    pub fn is_synced(&self) -> bool {
        self.state.read().synced
    }

    pub fn mode(&self) -> Option<InjectionMode> {
        self.state.read().mode
    }

    async fn send_envelope(&self, message: &Message, endpoint: &str) -> Result<(), StreamError> {
        if !self.is_initialized() {
            return Err(StreamError::NotInitialized);
        }
        let envelope = Envelope {
            endpoint: endpoint.to_string(),
            frame: encode(message)?,
        };
        self.outbound
            .send(envelope)
            .await
            .map_err(|_| StreamError::ChannelClosed)
    }
}

#[async_trait]
impl EncryptedStream for ChannelStream {
    async fn initialize(
        &self,
        mode: InjectionMode,
        handshake: &HandshakeToken,
    ) -> Result<(), StreamError> {
        let mut state = self.state.write();
        state.mode = Some(mode);
        state.handshake = Some(handshake.clone());
        state.synced = false;
        debug!(mode = %mode, "Stream initialized");
        Ok(())
    }

    fn listen(&self) -> Result<InboundStream, StreamError> {
        let receiver = self
            .inbound
            .lock()
            .take()
            .ok_or(StreamError::AlreadyListening)?;

        let messages = ReceiverStream::new(receiver).filter_map(|frame| async move {
            match decode(&frame) {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!(error = %e, "Dropping undecodable frame");
                    None
                }
            }
        });
        Ok(Box::pin(messages))
    }

    async fn send(&self, message: Message, endpoint: &str) -> Result<(), StreamError> {
        self.send_envelope(&message, endpoint).await
    }

    async fn sync(&self, endpoint: &str, handshake: &HandshakeToken) -> Result<(), StreamError> {
        self.send_envelope(&Message::sync(handshake), endpoint)
            .await
    }

    async fn commit_sync(&self, reply: &Message) -> Result<(), StreamError> {
        let mut state = self.state.write();
        let expected = state.handshake.as_ref().ok_or(StreamError::NotInitialized)?;
        if reply.handshake() != Some(expected.as_str()) {
            return Err(StreamError::HandshakeMismatch);
        }
        state.synced = true;
        Ok(())
    }
}

impl WalletEndpoint {
    /// Next outbound frame from the client, or `None` once it is gone.
    pub async fn next_envelope(&mut self) -> Option<Envelope> {
        self.inbound.recv().await
    }

    /// Next decoded message from the client.
    pub async fn next_message(&mut self) -> Result<Message, StreamError> {
        let envelope = self
            .next_envelope()
            .await
            .ok_or(StreamError::ChannelClosed)?;
        decode(&envelope.frame)
    }

    /// Answer a request the client sent.
    pub async fn reply_to(&self, request: &Message, payload: Value) -> Result<(), StreamError> {
        let kind = request.kind.request_kind().ok_or(StreamError::Unanswerable)?;
        let identifier = request.identifier.clone().ok_or(StreamError::Unanswerable)?;
        self.reply(kind, identifier, payload).await
    }

    /// Send a reply for the given identifier.
    pub async fn reply(
        &self,
        kind: RequestKind,
        identifier: RequestId,
        payload: Value,
    ) -> Result<(), StreamError> {
        self.deliver(&Message::reply(kind, identifier, payload))
            .await
    }

    /// Acknowledge a sync message by echoing its handshake token.
    pub async fn acknowledge_sync(&self, sync: &Message) -> Result<(), StreamError> {
        let token = sync.handshake().ok_or(StreamError::HandshakeMismatch)?;
        self.deliver(&Message::sync(&HandshakeToken::new(token)))
            .await
    }

    /// Deliver any message to the client.
    pub async fn deliver(&self, message: &Message) -> Result<(), StreamError> {
        self.deliver_raw(encode(message)?).await
    }

    /// Deliver a raw text frame to the client.
    pub async fn deliver_raw(&self, frame: impl Into<String>) -> Result<(), StreamError> {
        self.outbound
            .send(frame.into())
            .await
            .map_err(|_| StreamError::ChannelClosed)
    }
}
