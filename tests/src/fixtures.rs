//! Shared harness: a connected client plus a scripted wallet.

use scatter_dapp::adapters::{channel_pair, ChannelStream, WalletEndpoint};
use scatter_dapp::{ClientConfig, HandshakeToken, IdSource, Message, ScatterDapp};
use scatter_telemetry::{init_logging, TelemetryConfig};
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handshake token used by every harness.
pub const TEST_HANDSHAKE: &str = "test-handshake-token";

/// Install the test subscriber once per process. Later calls are no-ops.
pub fn init_test_logging() {
    let _ = init_logging(&TelemetryConfig::for_tests());
}

/// A connected client with direct access to both stream ends.
pub struct Harness {
    pub client: ScatterDapp,
    pub stream: Arc<ChannelStream>,
    pub wallet: WalletEndpoint,
    /// The sync message the client sent while connecting
    pub sync: Message,
}

impl Harness {
    pub async fn connect(config: ClientConfig) -> Self {
        Self::build(config, None).await
    }

    pub async fn connect_with_ids(config: ClientConfig, ids: Arc<dyn IdSource>) -> Self {
        Self::build(config, Some(ids)).await
    }

    async fn build(config: ClientConfig, ids: Option<Arc<dyn IdSource>>) -> Self {
        init_test_logging();
        let (stream, mut wallet) = channel_pair(64);
        let stream = Arc::new(stream);
        let handshake = HandshakeToken::new(TEST_HANDSHAKE);
        let client = match ids {
            Some(ids) => ScatterDapp::connect_with_ids(stream.clone(), handshake, config, ids).await,
            None => ScatterDapp::connect(stream.clone(), handshake, config).await,
        }
        .expect("client connects");
        let sync = wallet.next_message().await.expect("sync message");
        Self {
            client,
            stream,
            wallet,
            sync,
        }
    }

    /// Acknowledge the handshake the way the wallet would.
    pub async fn ack_sync(&self) {
        self.wallet
            .acknowledge_sync(&self.sync)
            .await
            .expect("sync ack delivered");
    }

    /// Hand the wallet end to a background responder.
    pub fn spawn_wallet<F>(self, answer: F) -> (ScatterDapp, Arc<ChannelStream>, JoinHandle<usize>)
    where
        F: Fn(&Message) -> Option<Value> + Send + 'static,
    {
        let Harness {
            client,
            stream,
            wallet,
            sync,
        } = self;
        let task = tokio::spawn(run_wallet(wallet, sync, answer));
        (client, stream, task)
    }
}

/// Scripted wallet loop. Acknowledges the handshake, then answers each
/// request with `answer`, skipping those it returns `None` for. Returns the
/// number of requests seen once the client goes away.
pub async fn run_wallet<F>(mut wallet: WalletEndpoint, sync: Message, answer: F) -> usize
where
    F: Fn(&Message) -> Option<Value>,
{
    if wallet.acknowledge_sync(&sync).await.is_err() {
        return 0;
    }
    let mut seen = 0;
    while let Ok(request) = wallet.next_message().await {
        seen += 1;
        if let Some(payload) = answer(&request) {
            if wallet.reply_to(&request, payload).await.is_err() {
                break;
            }
        }
    }
    seen
}
