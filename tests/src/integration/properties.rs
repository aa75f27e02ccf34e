//! # Routing Properties
//!
//! Randomized reply orders never cross replies between callers.

#[cfg(test)]
mod tests {
    use crate::fixtures::Harness;
    use proptest::prelude::*;
    use scatter_dapp::{ClientConfig, PublicKey};
    use serde_json::json;

    fn run<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime")
            .block_on(future)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_any_reply_order_routes_correctly(
            order in (1usize..12).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
        ) {
            let n = order.len();
            let results = run(async move {
                let mut h = Harness::connect(ClientConfig::default()).await;
                let mut replies = Vec::with_capacity(n);
                let mut requests = Vec::with_capacity(n);
                for i in 0..n {
                    let key = PublicKey::new(format!("PUB{i}"));
                    replies.push(h.client.get_balance(Some(&key)).await.unwrap());
                    requests.push(h.wallet.next_message().await.unwrap());
                }
                for &i in &order {
                    h.wallet.reply_to(&requests[i], json!(i as f64)).await.unwrap();
                }
                let mut results = Vec::with_capacity(n);
                for reply in replies {
                    results.push(reply.await.unwrap());
                }
                (results, h.client.pending_count())
            });

            let (results, remaining) = results;
            prop_assert_eq!(remaining, 0);
            for (i, result) in results.into_iter().enumerate() {
                prop_assert_eq!(result, Ok(i as f64));
            }
        }
    }
}
