//! The dApp-facing client.

use parking_lot::{Mutex, RwLock};
use scatter_telemetry::metrics;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::config::ClientConfig;
use crate::domain::correlation::{IdGenerator, RequestId};
use crate::domain::network::NetworkContext;
use crate::domain::pending::{
    PendingRequestStore, PendingStats, Settlement, Ticket, TransportFailure,
};
use crate::domain::session::HandshakeToken;
use crate::domain::types::{Balance, PublicKey, RequestKind, Signature};
use crate::error::ClientError;
use crate::ipc::codec::build_request;
use crate::ipc::listener::ResponseListener;
use crate::ports::ids::IdSource;
use crate::ports::outbound::EncryptedStream;
use crate::service::reply::PendingReply;

/// Client issuing correlated requests to a wallet over an encrypted stream.
///
/// Construction performs the handshake: the stream is initialized, the
/// dispatch loop is attached, and only then is the sync message sent.
/// Requests may be issued right away; the stream buffers until synced.
pub struct ScatterDapp {
    config: ClientConfig,
    stream: Arc<dyn EncryptedStream>,
    pending: Arc<PendingRequestStore>,
    ids: Arc<dyn IdSource>,
    network: RwLock<NetworkContext>,
    listener: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl ScatterDapp {
    /// Connect over `stream` using random identifiers.
    pub async fn connect(
        stream: Arc<dyn EncryptedStream>,
        handshake: HandshakeToken,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        let ids = Arc::new(IdGenerator::new(config.id_length));
        Self::connect_with_ids(stream, handshake, config, ids).await
    }

    /// Connect over `stream`, drawing request identifiers from `ids`.
    pub async fn connect_with_ids(
        stream: Arc<dyn EncryptedStream>,
        handshake: HandshakeToken,
        config: ClientConfig,
        ids: Arc<dyn IdSource>,
    ) -> Result<Self, ClientError> {
        config.validate()?;

        stream
            .initialize(config.injection_mode, &handshake)
            .await?;

        // Listener must be attached before the sync goes out
        let inbound = stream.listen()?;
        let pending = Arc::new(PendingRequestStore::new());
        let listener = ResponseListener::new(pending.clone(), stream.clone());
        let task = tokio::spawn(listener.run(inbound));

        if let Err(e) = stream.sync(&config.endpoint, &handshake).await {
            task.abort();
            return Err(e.into());
        }

        info!(
            endpoint = %config.endpoint,
            mode = %config.injection_mode,
            "Scatter client connected"
        );

        Ok(Self {
            config,
            stream,
            pending,
            ids,
            network: RwLock::new(NetworkContext::Unset),
            listener: Mutex::new(Some(task)),
            closed: AtomicBool::new(false),
        })
    }

    /// Select the network for subsequent requests.
    pub fn set_network(&self, network: impl Into<NetworkContext>) {
        let network = network.into();
        debug!(network = %network, "Network selected");
        *self.network.write() = network;
    }

    /// Network attached to the next request.
    pub fn network(&self) -> NetworkContext {
        self.network.read().clone()
    }

    /// Ask the user to grant this dApp access to a wallet.
    ///
    /// Resolves to the granted public key.
    pub async fn request_permissions(&self) -> Result<PendingReply<PublicKey>, ClientError> {
        self.request(RequestKind::RequestPermissions, &()).await
    }

    /// Ask the wallet to prove control of `public_key`.
    pub async fn prove_identity(
        &self,
        public_key: &PublicKey,
    ) -> Result<PendingReply<bool>, ClientError> {
        self.request(RequestKind::ProveIdentity, public_key).await
    }

    /// Ask the wallet to sign `transaction`.
    pub async fn request_signature<T: Serialize + ?Sized>(
        &self,
        transaction: &T,
    ) -> Result<PendingReply<Signature>, ClientError> {
        self.request(RequestKind::RequestTransaction, transaction)
            .await
    }

    /// Balance of `public_key`, or of every authorized wallet when `None`.
    pub async fn get_balance(
        &self,
        public_key: Option<&PublicKey>,
    ) -> Result<PendingReply<Balance>, ClientError> {
        let key = public_key.map_or("", PublicKey::as_str);
        self.request(RequestKind::GetBalance, key).await
    }

    /// Requests still awaiting a reply
    pub fn pending_count(&self) -> usize {
        self.pending.pending_count()
    }

    pub fn stats(&self) -> &PendingStats {
        self.pending.stats()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// True once `shutdown` has run. New requests are refused.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Stop the dispatch loop. Outstanding requests fail as disconnected.
    pub async fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let task = self.listener.lock().take();
        if let Some(task) = task {
            task.abort();
            let _ = task.await;
            let failed = self.pending.fail_all(TransportFailure::Disconnected);
            info!(failed, "Scatter client shut down");
        }
    }

    async fn request<T, P>(
        &self,
        kind: RequestKind,
        payload: &P,
    ) -> Result<PendingReply<T>, ClientError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        let network = self.network();
        if self.config.require_network && !network.is_set() {
            return Err(ClientError::NetworkUnset);
        }

        let started = Instant::now();
        let (id, ticket, receiver) = self.register(kind)?;
        // From here on, dropping the handle withdraws the entry
        let reply = PendingReply::new(
            id.clone(),
            kind,
            ticket,
            receiver,
            self.pending.clone(),
            self.config
                .request_timeout
                .map(|timeout| (started + timeout, timeout)),
        );
        // Shutdown may have drained the store after the check above
        if self.is_closed() {
            return Err(ClientError::Closed);
        }

        let message = build_request(kind, payload, id.clone(), network)?;
        if let Err(e) = self.stream.send(message, &self.config.endpoint).await {
            metrics::REQUESTS_FAILED
                .with_label_values(&["send_failed"])
                .inc();
            warn!(request_id = %id, kind = %kind, error = %e, "Failed to send request");
            return Err(e.into());
        }

        metrics::REQUESTS_SENT.with_label_values(&[kind.as_str()]).inc();
        debug!(request_id = %id, kind = %kind, "Request sent");
        Ok(reply)
    }

    fn register(
        &self,
        kind: RequestKind,
    ) -> Result<(RequestId, Ticket, oneshot::Receiver<Settlement>), ClientError> {
        let mut attempt = 1;
        loop {
            let id = self.ids.next_id();
            match self.pending.register(id.clone(), kind) {
                Ok((ticket, receiver)) => return Ok((id, ticket, receiver)),
                Err(e) if attempt >= self.config.max_id_attempts => return Err(e.into()),
                Err(_) => attempt += 1,
            }
        }
    }
}

impl Drop for ScatterDapp {
    fn drop(&mut self) {
        if let Some(task) = self.listener.get_mut().take() {
            task.abort();
            // The aborted loop never reaches its own cleanup
            let failed = self.pending.fail_all(TransportFailure::Disconnected);
            if failed > 0 {
                debug!(failed, "Client dropped with requests outstanding");
            }
        }
    }
}
