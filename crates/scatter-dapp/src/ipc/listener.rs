//! Dispatch loop routing inbound messages.

use futures::StreamExt;
use scatter_telemetry::metrics;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::pending::{PendingRequestStore, TransportFailure};
use crate::domain::types::RequestKind;
use crate::ipc::codec::{classify, Inbound};
use crate::ipc::message::Message;
use crate::ports::outbound::{EncryptedStream, InboundStream};

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Handshake reply passed to the stream
    Synced,
    /// Reply settled a pending request
    Routed(RequestKind),
    /// Nothing was waiting for it
    Dropped,
}

/// Single inbound listener for a client.
pub struct ResponseListener {
    pending: Arc<PendingRequestStore>,
    stream: Arc<dyn EncryptedStream>,
}

impl ResponseListener {
    pub fn new(pending: Arc<PendingRequestStore>, stream: Arc<dyn EncryptedStream>) -> Self {
        Self { pending, stream }
    }

    /// Run until the inbound stream ends, then fail whatever is still pending.
    pub async fn run(self, mut inbound: InboundStream) {
        while let Some(message) = inbound.next().await {
            self.dispatch(message).await;
        }

        let failed = self.pending.fail_all(TransportFailure::Disconnected);
        info!(failed, "Inbound stream closed, stopping listener");
    }

    /// Route one inbound message.
    pub async fn dispatch(&self, message: Message) -> Dispatch {
        match classify(message) {
            Inbound::Sync(reply) => {
                match self.stream.commit_sync(&reply).await {
                    Ok(()) => {
                        metrics::SYNC_COMMITS.inc();
                        info!("Handshake committed");
                    }
                    Err(e) => error!(error = %e, "Failed to commit handshake"),
                }
                Dispatch::Synced
            }
            Inbound::Reply {
                identifier,
                payload,
            } => match self.pending.settle(&identifier, payload) {
                Some(kind) => Dispatch::Routed(kind),
                None => Dispatch::Dropped,
            },
            Inbound::Unroutable(message) => {
                warn!(kind = %message.kind, "Dropping message without resolver id");
                Dispatch::Dropped
            }
        }
    }
}
