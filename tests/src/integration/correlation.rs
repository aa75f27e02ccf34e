//! # Reply Correlation
//!
//! Every request resolves to the reply carrying its own identifier, whatever
//! the arrival order.

#[cfg(test)]
mod tests {
    use crate::fixtures::Harness;
    use futures::future::join_all;
    use futures::FutureExt;
    use scatter_dapp::adapters::ScriptedIds;
    use scatter_dapp::{
        ClientConfig, MessageKind, NetworkEndpoint, PublicKey, RequestId, RequestKind,
        WalletError,
    };
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_permissions_resolve_to_injected_key() {
        let mut h =
            Harness::connect_with_ids(ClientConfig::default(), Arc::new(ScriptedIds::new(["X"])))
                .await;

        let reply = h.client.request_permissions().await.unwrap();
        let request = h.wallet.next_message().await.unwrap();
        assert_eq!(request.kind, MessageKind::RequestPermissions);
        assert_eq!(request.identifier, Some(RequestId::from("X")));

        h.wallet
            .deliver_raw(r#"{"type":"REQUEST_PERMISSIONS","resolverId":"X","payload":"PUB123"}"#)
            .await
            .unwrap();

        assert_eq!(reply.await.unwrap(), Ok(PublicKey::from("PUB123")));
        assert_eq!(h.client.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_out_of_order_balances() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        let pub1 = PublicKey::from("PUB1");
        let pub2 = PublicKey::from("PUB2");

        let first = h.client.get_balance(Some(&pub1)).await.unwrap();
        let second = h.client.get_balance(Some(&pub2)).await.unwrap();
        let req1 = h.wallet.next_message().await.unwrap();
        let req2 = h.wallet.next_message().await.unwrap();
        assert_eq!(req1.payload, json!("PUB1"));
        assert_eq!(req2.payload, json!("PUB2"));
        assert_ne!(req1.identifier, req2.identifier);

        // PUB2 answered first
        h.wallet.reply_to(&req2, json!(20.0)).await.unwrap();
        h.wallet.reply_to(&req1, json!(10.0)).await.unwrap();

        assert_eq!(second.await.unwrap(), Ok(20.0));
        assert_eq!(first.await.unwrap(), Ok(10.0));
    }

    #[tokio::test]
    async fn test_concurrent_requests_get_their_own_replies() {
        let h = Harness::connect(ClientConfig::default()).await;
        // Wallet echoes the requested key back as the balance
        let (client, stream, wallet) = h.spawn_wallet(|request| {
            let key = request.payload.as_str()?;
            key.strip_prefix("PUB")?.parse::<f64>().ok().map(|n| json!(n))
        });

        let keys: Vec<PublicKey> = (0..32).map(|i| PublicKey::new(format!("PUB{i}"))).collect();
        let replies = join_all(keys.iter().map(|key| client.get_balance(Some(key)))).await;
        let replies: Vec<_> = replies.into_iter().map(Result::unwrap).collect();
        let balances = join_all(replies).await;

        for (i, balance) in balances.into_iter().enumerate() {
            assert_eq!(balance.unwrap(), Ok(i as f64));
        }
        assert_eq!(client.pending_count(), 0);

        // Wallet loop ends once every handle on the stream is gone
        drop(client);
        drop(stream);
        assert_eq!(wallet.await.unwrap(), 32);
    }

    #[tokio::test]
    async fn test_unknown_identifier_has_no_effect() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        let mut reply = h.client.get_balance(None).await.unwrap();
        let request = h.wallet.next_message().await.unwrap();

        h.wallet
            .reply(RequestKind::GetBalance, RequestId::from("nobody"), json!(99.0))
            .await
            .unwrap();
        // Flush the dispatch loop with a settled round trip
        let probe = h.client.prove_identity(&PublicKey::from("K")).await.unwrap();
        let probe_req = h.wallet.next_message().await.unwrap();
        h.wallet.reply_to(&probe_req, json!(true)).await.unwrap();
        assert_eq!(probe.await.unwrap(), Ok(true));

        assert!((&mut reply).now_or_never().is_none());
        assert_eq!(h.client.pending_count(), 1);
        assert_eq!(
            h.client
                .stats()
                .dropped
                .load(std::sync::atomic::Ordering::Relaxed),
            1
        );

        h.wallet.reply_to(&request, json!(1.5)).await.unwrap();
        assert_eq!(reply.await.unwrap(), Ok(1.5));
    }

    #[tokio::test]
    async fn test_wallet_error_is_an_answer() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        let reply = h.client.request_signature(&json!({"actions": []})).await.unwrap();
        let request = h.wallet.next_message().await.unwrap();
        h.wallet
            .reply_to(
                &request,
                serde_json::to_value(WalletError::signature_rejected()).unwrap(),
            )
            .await
            .unwrap();

        let outcome = reply.await.expect("transport succeeded");
        assert_eq!(outcome, Err(WalletError::signature_rejected()));
    }

    #[tokio::test]
    async fn test_identity_rejection_is_an_answer() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        let reply = h
            .client
            .prove_identity(&PublicKey::from("PUB123"))
            .await
            .unwrap();
        let request = h.wallet.next_message().await.unwrap();
        h.wallet
            .reply_to(
                &request,
                serde_json::to_value(WalletError::identity_rejected()).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(reply.await.unwrap(), Err(WalletError::identity_rejected()));
    }

    #[tokio::test]
    async fn test_reply_with_unreadable_network_still_routes() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        let reply = h.client.get_balance(None).await.unwrap();
        let request = h.wallet.next_message().await.unwrap();
        let id = request.identifier.unwrap();

        let frame = json!({
            "type": "GET_BALANCE",
            "resolverId": id,
            "payload": 12.5,
            "network": {"host": "nodes.example.org", "port": "8888"},
        });
        h.wallet.deliver_raw(frame.to_string()).await.unwrap();
        assert_eq!(reply.await.unwrap(), Ok(12.5));
        assert_eq!(h.client.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_permission_denial() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        let reply = h.client.request_permissions().await.unwrap();
        let request = h.wallet.next_message().await.unwrap();
        h.wallet.reply_to(&request, json!(false)).await.unwrap();
        assert_eq!(reply.await.unwrap(), Err(WalletError::permission_denied()));
    }

    #[tokio::test]
    async fn test_network_change_applies_to_next_request() {
        let mut h = Harness::connect(ClientConfig::default()).await;
        let _before = h.client.get_balance(None).await.unwrap();
        h.client
            .set_network(NetworkEndpoint::new("nodes.example.org", 443).with_name("mainnet"));
        let _after = h.client.get_balance(None).await.unwrap();

        let before = h.wallet.next_message().await.unwrap();
        let after = h.wallet.next_message().await.unwrap();
        assert!(!before.network.is_set());
        assert_eq!(
            after.network.endpoint().map(|e| e.name.as_str()),
            Some("mainnet")
        );
    }
}
