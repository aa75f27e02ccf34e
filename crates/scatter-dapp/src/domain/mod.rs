//! Domain layer: identifiers, request kinds, outcomes and the pending store.

pub mod config;
pub mod correlation;
pub mod network;
pub mod outcome;
pub mod pending;
pub mod session;
pub mod types;

pub use config::{ClientConfig, ConfigError, DEFAULT_ENDPOINT};
pub use correlation::{IdGenerator, RequestId, DEFAULT_ID_LENGTH, ID_ALPHABET};
pub use network::{NetworkContext, NetworkEndpoint};
pub use outcome::{codes, Outcome, WalletError};
pub use pending::{PendingRequestStore, PendingStats, Settlement, Ticket, TransportFailure};
pub use session::{HandshakeToken, InjectionMode};
pub use types::{Balance, PublicKey, RequestKind, Signature};
