//! Ports (hexagonal architecture)

pub mod ids;
pub mod outbound;

pub use ids::IdSource;
pub use outbound::{EncryptedStream, InboundStream};
