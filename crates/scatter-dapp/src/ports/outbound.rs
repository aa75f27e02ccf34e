//! Outbound port: the encrypted stream to the wallet.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::domain::session::{HandshakeToken, InjectionMode};
use crate::error::StreamError;
use crate::ipc::message::Message;

/// Inbound messages, in arrival order. Ends when the stream closes.
pub type InboundStream = Pin<Box<dyn Stream<Item = Message> + Send>>;

/// Bidirectional encrypted channel to the wallet.
///
/// Key exchange, framing and encryption are the implementation's concern.
/// Messages sent before the handshake completes are buffered by the
/// implementation, not by the caller.
#[async_trait]
pub trait EncryptedStream: Send + Sync {
    /// Prepare the stream for the given side of the channel.
    async fn initialize(
        &self,
        mode: InjectionMode,
        handshake: &HandshakeToken,
    ) -> Result<(), StreamError>;

    /// Take the inbound message stream.
    ///
    /// There is a single listener per stream; a second call fails with
    /// [`StreamError::AlreadyListening`].
    fn listen(&self) -> Result<InboundStream, StreamError>;

    /// Send a message to the named endpoint.
    async fn send(&self, message: Message, endpoint: &str) -> Result<(), StreamError>;

    /// Start the handshake with the named endpoint.
    async fn sync(&self, endpoint: &str, handshake: &HandshakeToken) -> Result<(), StreamError>;

    /// Finish the handshake on receipt of the counterpart's sync reply.
    async fn commit_sync(&self, reply: &Message) -> Result<(), StreamError>;
}
