//! # Transport Failures
//!
//! Timeouts, abandoned handles and disconnects all remove the pending entry
//! and surface as `ClientError` on the handle.

#[cfg(test)]
mod tests {
    use crate::fixtures::Harness;
    use scatter_dapp::{ClientConfig, ClientError, PublicKey, RequestKind, StreamError};
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_timeout_then_late_reply_dropped() {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(30));
        let mut h = Harness::connect(config).await;

        let reply = h.client.get_balance(None).await.unwrap();
        let request = h.wallet.next_message().await.unwrap();

        let err = reply.await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout { after, .. } if after == Duration::from_secs(30)));
        // The wallet may still act on it
        assert!(err.is_indeterminate());
        assert_eq!(h.client.pending_count(), 0);

        h.wallet.reply_to(&request, json!(1.0)).await.unwrap();
        // Round trip so the late reply has been dispatched
        let probe = h.client.get_balance(None).await.unwrap();
        let probe_req = h.wallet.next_message().await.unwrap();
        h.wallet.reply_to(&probe_req, json!(2.0)).await.unwrap();
        assert_eq!(probe.await.unwrap(), Ok(2.0));
        assert_eq!(h.client.stats().dropped.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_dropped_handle_cancels_entry() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        let reply = h.client.get_balance(None).await.unwrap();
        let request = h.wallet.next_message().await.unwrap();
        assert_eq!(h.client.pending_count(), 1);

        drop(reply);
        assert_eq!(h.client.pending_count(), 0);
        assert_eq!(h.client.stats().cancelled.load(Ordering::Relaxed), 1);

        // Reply for the abandoned request goes nowhere
        h.wallet
            .reply(
                RequestKind::GetBalance,
                request.identifier.unwrap(),
                json!(3.0),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wallet_disconnect_fails_everything() {
        let h = Harness::connect(ClientConfig::default()).await;
        let a = h.client.get_balance(None).await.unwrap();
        let b = h
            .client
            .prove_identity(&PublicKey::from("PUB1"))
            .await
            .unwrap();
        assert_eq!(h.client.pending_count(), 2);

        let Harness { client, wallet, .. } = h;
        drop(wallet);

        let err = a.await.unwrap_err();
        assert!(matches!(err, ClientError::Disconnected(_)));
        assert!(err.is_indeterminate());
        assert!(matches!(b.await, Err(ClientError::Disconnected(_))));
        assert_eq!(client.pending_count(), 0);

        let err = client.get_balance(None).await.unwrap_err();
        assert!(matches!(err, ClientError::Stream(StreamError::ChannelClosed)));
        assert!(!err.is_indeterminate());
    }

    #[tokio::test]
    async fn test_malformed_reply_does_not_poison_client() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        let bad = h.client.get_balance(None).await.unwrap();
        let request = h.wallet.next_message().await.unwrap();
        h.wallet.reply_to(&request, json!({"balance": "lots"})).await.unwrap();
        assert!(matches!(
            bad.await,
            Err(ClientError::MalformedReply {
                kind: RequestKind::GetBalance,
                ..
            })
        ));

        // Garbage frames are skipped by the stream
        h.wallet.deliver_raw("{not json").await.unwrap();

        let good = h.client.get_balance(None).await.unwrap();
        let request = h.wallet.next_message().await.unwrap();
        h.wallet.reply_to(&request, json!(7.25)).await.unwrap();
        assert_eq!(good.await.unwrap(), Ok(7.25));
    }

    #[tokio::test]
    async fn test_shutdown_fails_outstanding() {
        let h = Harness::connect(ClientConfig::default()).await;
        let reply = h.client.request_permissions().await.unwrap();
        h.client.shutdown().await;
        assert!(matches!(reply.await, Err(ClientError::Disconnected(_))));
    }

    #[tokio::test]
    async fn test_request_after_shutdown_is_refused() {
        let h = Harness::connect(ClientConfig::default()).await;
        h.client.shutdown().await;

        let err = h.client.get_balance(None).await.unwrap_err();
        assert!(matches!(err, ClientError::Closed));
        assert_eq!(h.client.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_dropping_client_fails_outstanding() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        let reply = h.client.get_balance(None).await.unwrap();
        let request = h.wallet.next_message().await.unwrap();

        let Harness { client, wallet, .. } = h;
        drop(client);

        let outcome = tokio::time::timeout(Duration::from_secs(2), reply)
            .await
            .expect("handle resolves once the client is gone");
        assert!(matches!(outcome, Err(ClientError::Disconnected(_))));

        // A reply arriving afterwards has nowhere to go
        let _ = wallet.reply_to(&request, json!(1.0)).await;
    }
}
