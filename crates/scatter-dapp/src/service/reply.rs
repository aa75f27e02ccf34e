//! Result handles for in-flight requests.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{Instant, Sleep};

use crate::domain::correlation::RequestId;
use crate::domain::outcome::{Outcome, WalletError};
use crate::domain::pending::{PendingRequestStore, Settlement, Ticket, TransportFailure};
use crate::domain::types::RequestKind;
use crate::error::ClientError;

/// Interpret a reply payload for a request of the given kind.
///
/// - an object flagged `"isError": true` is a [`WalletError`]
/// - `false` in reply to a permissions request is a denial
/// - anything else must decode as `T`
pub fn interpret<T: DeserializeOwned>(
    kind: RequestKind,
    payload: Value,
) -> Result<Outcome<T>, serde_json::Error> {
    if let Some(err) = WalletError::from_payload(&payload) {
        return Ok(Err(err));
    }
    if kind == RequestKind::RequestPermissions && payload == Value::Bool(false) {
        return Ok(Err(WalletError::permission_denied()));
    }
    serde_json::from_value(payload).map(Ok)
}

/// Handle to the eventual reply of one request.
///
/// Resolves to `Ok(Ok(value))` on success, `Ok(Err(wallet_error))` when the
/// wallet refused, and `Err(ClientError)` when no usable reply arrived.
/// Dropping an unresolved handle withdraws the request from the pending store.
#[must_use = "dropping the handle cancels the request"]
pub struct PendingReply<T> {
    id: RequestId,
    kind: RequestKind,
    ticket: Ticket,
    receiver: oneshot::Receiver<Settlement>,
    deadline: Option<(Pin<Box<Sleep>>, Duration)>,
    store: Arc<PendingRequestStore>,
    done: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> PendingReply<T> {
    pub(crate) fn new(
        id: RequestId,
        kind: RequestKind,
        ticket: Ticket,
        receiver: oneshot::Receiver<Settlement>,
        store: Arc<PendingRequestStore>,
        deadline: Option<(Instant, Duration)>,
    ) -> Self {
        Self {
            id,
            kind,
            ticket,
            receiver,
            deadline: deadline
                .map(|(at, after)| (Box::pin(tokio::time::sleep_until(at)), after)),
            store,
            done: false,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> &RequestId {
        &self.id
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    fn finish(
        &mut self,
        received: Result<Settlement, oneshot::error::RecvError>,
    ) -> Result<Outcome<T>, ClientError> {
        self.done = true;
        match received {
            Ok(Ok(payload)) => {
                interpret(self.kind, payload).map_err(|source| ClientError::MalformedReply {
                    id: self.id.clone(),
                    kind: self.kind,
                    source,
                })
            }
            Ok(Err(failure)) => Err(ClientError::from_failure(self.id.clone(), failure)),
            // Entry removed without settlement
            Err(_) => Err(ClientError::Cancelled(self.id.clone())),
        }
    }
}

impl<T: DeserializeOwned> Future for PendingReply<T> {
    type Output = Result<Outcome<T>, ClientError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let Poll::Ready(received) = Pin::new(&mut this.receiver).poll(cx) {
            return Poll::Ready(this.finish(received));
        }

        if let Some((sleep, after)) = this.deadline.as_mut() {
            if sleep.as_mut().poll(cx).is_ready() {
                let after = *after;
                this.deadline = None;
                // Whatever won the race is now in the receiver
                this.store
                    .fail(&this.id, this.ticket, TransportFailure::Timeout { after });
                if let Poll::Ready(received) = Pin::new(&mut this.receiver).poll(cx) {
                    return Poll::Ready(this.finish(received));
                }
            }
        }

        Poll::Pending
    }
}

impl<T> Drop for PendingReply<T> {
    fn drop(&mut self) {
        if !self.done {
            self.store.cancel(&self.id, self.ticket);
        }
    }
}

impl<T> std::fmt::Debug for PendingReply<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingReply")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("done", &self.done)
            .finish()
    }
}
