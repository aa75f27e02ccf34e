//! Pending request store.
//!
//! Maps request identifiers to the one-shot channels of callers awaiting a
//! reply. Every entry is removed exactly once: by its reply, a timeout, a
//! disconnect, or cancellation.
//!
//! Flow:
//! 1. Client generates a [`RequestId`]
//! 2. Client calls `register()` to get a ticket and a oneshot receiver
//! 3. Client hands the request to the stream
//! 4. Dispatch loop receives the reply and calls `settle()`
//! 5. Client's handle resolves from the receiver

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use scatter_telemetry::metrics;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::correlation::RequestId;
use crate::domain::types::RequestKind;
use crate::error::RegistryError;

/// Sequence number distinguishing registrations that shared an identifier.
pub type Ticket = u64;

/// Value delivered to a waiting caller.
pub type Settlement = Result<Value, TransportFailure>;

/// Why a request settled without a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// No reply within the request deadline
    Timeout { after: Duration },
    /// Inbound stream ended first
    Disconnected,
}

impl TransportFailure {
    /// Metrics label
    pub fn reason(&self) -> &'static str {
        match self {
            TransportFailure::Timeout { .. } => "timeout",
            TransportFailure::Disconnected => "disconnected",
        }
    }
}

struct PendingEntry {
    sender: oneshot::Sender<Settlement>,
    kind: RequestKind,
    registered_at: Instant,
    ticket: Ticket,
}

/// Statistics for the pending request store
#[derive(Debug, Default)]
pub struct PendingStats {
    /// Requests registered
    pub registered: AtomicU64,
    /// Requests settled by a reply
    pub settled: AtomicU64,
    /// Requests failed by timeout or disconnect
    pub failed: AtomicU64,
    /// Requests removed without settlement
    pub cancelled: AtomicU64,
    /// Replies with no matching request
    pub dropped: AtomicU64,
    /// Registrations rejected for a duplicate identifier
    pub collisions: AtomicU64,
}

/// Registry of requests awaiting a reply.
#[derive(Default)]
pub struct PendingRequestStore {
    pending: DashMap<RequestId, PendingEntry>,
    next_ticket: AtomicU64,
    stats: PendingStats,
}

impl PendingRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request and get the receiver its settlement arrives on.
    ///
    /// An identifier that is already pending is rejected; the existing entry
    /// is left untouched.
    pub fn register(
        &self,
        id: RequestId,
        kind: RequestKind,
    ) -> Result<(Ticket, oneshot::Receiver<Settlement>), RegistryError> {
        match self.pending.entry(id) {
            Entry::Occupied(occupied) => {
                self.stats.collisions.fetch_add(1, Ordering::Relaxed);
                warn!(request_id = %occupied.key(), kind = %kind, "Request id already pending");
                Err(RegistryError::DuplicateId(occupied.key().clone()))
            }
            Entry::Vacant(vacant) => {
                let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
                let (tx, rx) = oneshot::channel();
                debug!(request_id = %vacant.key(), kind = %kind, ticket, "Registered pending request");
                vacant.insert(PendingEntry {
                    sender: tx,
                    kind,
                    registered_at: Instant::now(),
                    ticket,
                });
                self.stats.registered.fetch_add(1, Ordering::Relaxed);
                metrics::PENDING_REQUESTS.inc();
                Ok((ticket, rx))
            }
        }
    }

    /// Settle a request with its reply payload.
    ///
    /// The entry is removed before the waiting caller is woken. Returns the
    /// settled request's kind, or `None` if nothing was pending under `id`.
    pub fn settle(&self, id: &RequestId, payload: Value) -> Option<RequestKind> {
        let Some((id, entry)) = self.pending.remove(id) else {
            self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            metrics::REPLIES_DROPPED.inc();
            debug!(request_id = %id, "Reply for unknown request id");
            return None;
        };
        metrics::PENDING_REQUESTS.dec();

        let elapsed = entry.registered_at.elapsed();
        metrics::REPLY_LATENCY.observe(elapsed.as_secs_f64());
        metrics::REPLIES_ROUTED
            .with_label_values(&[entry.kind.as_str()])
            .inc();

        if entry.sender.send(Ok(payload)).is_ok() {
            self.stats.settled.fetch_add(1, Ordering::Relaxed);
            debug!(
                request_id = %id,
                kind = %entry.kind,
                elapsed_ms = elapsed.as_millis() as u64,
                "Settled pending request"
            );
        } else {
            // Caller stopped waiting between removal and send
            self.stats.cancelled.fetch_add(1, Ordering::Relaxed);
            debug!(request_id = %id, kind = %entry.kind, "Reply arrived after caller left");
        }
        Some(entry.kind)
    }

    /// Fail one registration through the failure channel.
    ///
    /// Returns false if `id` is no longer pending under `ticket`.
    pub fn fail(&self, id: &RequestId, ticket: Ticket, failure: TransportFailure) -> bool {
        match self.pending.remove_if(id, |_, entry| entry.ticket == ticket) {
            Some((id, entry)) => {
                self.deliver_failure(&id, entry, &failure);
                true
            }
            None => false,
        }
    }

    /// Fail every pending request. Returns how many were failed.
    pub fn fail_all(&self, failure: TransportFailure) -> usize {
        let ids: Vec<RequestId> = self.pending.iter().map(|e| e.key().clone()).collect();
        let mut failed = 0;
        for id in ids {
            if let Some((id, entry)) = self.pending.remove(&id) {
                self.deliver_failure(&id, entry, &failure);
                failed += 1;
            }
        }
        failed
    }

    /// Remove a registration without settling it.
    pub fn cancel(&self, id: &RequestId, ticket: Ticket) -> bool {
        match self.pending.remove_if(id, |_, entry| entry.ticket == ticket) {
            Some((id, entry)) => {
                metrics::PENDING_REQUESTS.dec();
                self.stats.cancelled.fetch_add(1, Ordering::Relaxed);
                debug!(request_id = %id, kind = %entry.kind, "Cancelled pending request");
                true
            }
            None => false,
        }
    }

    /// Number of requests awaiting a reply
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check if an identifier is pending
    pub fn is_pending(&self, id: &RequestId) -> bool {
        self.pending.contains_key(id)
    }

    /// Get statistics
    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }

    fn deliver_failure(&self, id: &RequestId, entry: PendingEntry, failure: &TransportFailure) {
        metrics::PENDING_REQUESTS.dec();
        metrics::REQUESTS_FAILED
            .with_label_values(&[failure.reason()])
            .inc();
        self.stats.failed.fetch_add(1, Ordering::Relaxed);
        warn!(
            request_id = %id,
            kind = %entry.kind,
            reason = failure.reason(),
            "Pending request failed"
        );
        let _ = entry.sender.send(Err(failure.clone()));
    }
}
