//! # Handshake Ordering
//!
//! The dispatch loop is attached before the sync message goes out, and sync
//! replies reach the stream without touching the pending store.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Harness, TEST_HANDSHAKE};
    use scatter_dapp::{ClientConfig, HandshakeToken, Message, MessageKind, PublicKey};
    use serde_json::json;

    #[tokio::test]
    async fn test_sync_is_first_frame() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        assert_eq!(h.sync.kind, MessageKind::Sync);
        assert!(h.sync.identifier.is_none());
        assert_eq!(h.sync.handshake(), Some(TEST_HANDSHAKE));

        let _reply = h.client.request_permissions().await.unwrap();
        let next = h.wallet.next_message().await.unwrap();
        assert_eq!(next.kind, MessageKind::RequestPermissions);
    }

    #[tokio::test]
    async fn test_sync_reply_before_requests() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        h.ack_sync().await;

        let reply = h.client.get_balance(None).await.unwrap();
        let request = h.wallet.next_message().await.unwrap();
        assert_eq!(h.client.pending_count(), 1);
        h.wallet.reply_to(&request, json!(5.0)).await.unwrap();
        assert_eq!(reply.await.unwrap(), Ok(5.0));

        assert!(h.stream.is_synced());
        assert_eq!(
            h.client
                .stats()
                .dropped
                .load(std::sync::atomic::Ordering::Relaxed),
            0
        );
    }

    #[tokio::test]
    async fn test_requests_before_sync_completes() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        let reply = h
            .client
            .prove_identity(&PublicKey::from("PUB1"))
            .await
            .unwrap();
        assert!(!h.stream.is_synced());

        let request = h.wallet.next_message().await.unwrap();
        h.ack_sync().await;
        h.wallet.reply_to(&request, json!(true)).await.unwrap();

        assert_eq!(reply.await.unwrap(), Ok(true));
        assert!(h.stream.is_synced());
    }

    #[tokio::test]
    async fn test_foreign_handshake_not_committed() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        h.wallet
            .deliver(&Message::sync(&HandshakeToken::new("someone-else")))
            .await
            .unwrap();

        let reply = h.client.get_balance(None).await.unwrap();
        let request = h.wallet.next_message().await.unwrap();
        h.wallet.reply_to(&request, json!(0.0)).await.unwrap();
        assert_eq!(reply.await.unwrap(), Ok(0.0));

        assert!(!h.stream.is_synced());
    }
}
