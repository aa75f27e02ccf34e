//! Handshake session parameters shared by the client and the stream adapter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::correlation::IdGenerator;

/// Which side of the encrypted stream this process plays.
///
/// The value doubles as the event name the stream listens on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionMode {
    /// Script injected into the dApp page
    #[default]
    Injected,
    /// Wallet-side content script
    #[serde(rename = "scatter")]
    ContentScript,
}

impl InjectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InjectionMode::Injected => "injected",
            InjectionMode::ContentScript => "scatter",
        }
    }
}

impl fmt::Display for InjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared secret the two ends of the stream agree on before any traffic.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandshakeToken(String);

impl HandshakeToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Random 64-symbol token.
    pub fn random() -> Self {
        Self(IdGenerator::new(64).generate().as_str().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the token itself
impl fmt::Debug for HandshakeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandshakeToken(<{} chars>)", self.0.len())
    }
}
