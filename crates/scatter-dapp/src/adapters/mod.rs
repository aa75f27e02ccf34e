//! Adapters (hexagonal architecture)

pub mod channel;
pub mod ids;

pub use channel::{channel_pair, ChannelStream, Envelope, WalletEndpoint};
pub use ids::ScriptedIds;
