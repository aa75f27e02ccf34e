//! # Scatter dApp Client
//!
//! Request/response correlation for dApps talking to a Scatter wallet over a
//! single encrypted stream.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ScatterDapp                           │
//! │  request_permissions · prove_identity · request_signature    │
//! │  get_balance · set_network                                   │
//! ├──────────────────────────────────────────────────────────────┤
//! │   IdSource ──► PendingRequestStore ◄── ResponseListener      │
//! │   (RequestId)    (DashMap + oneshot)    (dispatch loop)      │
//! ├──────────────────────────────┬───────────────────────────────┤
//! │        Message codec         │        sync / commit_sync     │
//! └──────────────────────────────┼───────────────────────────────┘
//!                                │
//!                        EncryptedStream (port)
//!                                │
//!                             wallet
//! ```
//!
//! Every request gets a fresh [`RequestId`], is registered in the pending
//! store, and is sent tagged with that id. The dispatch loop matches replies
//! by id in any order; `sync` replies go to the stream and never touch the
//! store.
//!
//! # Outcomes
//!
//! Request methods return a [`PendingReply`] that resolves to
//! `Result<Outcome<T>, ClientError>`:
//!
//! - `Ok(Ok(value))`: the wallet answered
//! - `Ok(Err(WalletError))`: the wallet answered with a refusal
//! - `Err(ClientError)`: no usable answer (timeout, disconnect, malformed)
//!
//! # Usage
//!
//! ```ignore
//! use scatter_dapp::{ClientConfig, HandshakeToken, ScatterDapp};
//!
//! let client = ScatterDapp::connect(stream, HandshakeToken::random(), ClientConfig::default()).await?;
//! client.set_network(NetworkEndpoint::new("nodes.example.org", 8888));
//! match client.request_permissions().await?.await? {
//!     Ok(key) => println!("granted {key}"),
//!     Err(refusal) => println!("refused: {refusal}"),
//! }
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ipc;
pub mod ports;
pub mod service;

pub use domain::{
    codes, Balance, ClientConfig, ConfigError, HandshakeToken, IdGenerator, InjectionMode,
    NetworkContext, NetworkEndpoint, Outcome, PendingRequestStore, PublicKey, RequestId,
    RequestKind, Signature, TransportFailure, WalletError, DEFAULT_ENDPOINT, DEFAULT_ID_LENGTH,
    ID_ALPHABET,
};
pub use error::{ClientError, RegistryError, StreamError};
pub use ipc::{Message, MessageKind};
pub use ports::{EncryptedStream, IdSource, InboundStream};
pub use service::{PendingReply, ScatterDapp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
