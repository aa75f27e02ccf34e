//! Request kinds and the typed values replies decode into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a correlated request. Replies carry the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestKind {
    /// Ask the user to authorize this dApp against one of their wallets
    RequestPermissions,
    /// Ask the wallet to prove control of a public key
    ProveIdentity,
    /// Ask the wallet to sign a transaction
    RequestTransaction,
    /// Ask for the balance of one key or all authorized wallets
    GetBalance,
}

impl RequestKind {
    pub const ALL: [RequestKind; 4] = [
        RequestKind::RequestPermissions,
        RequestKind::ProveIdentity,
        RequestKind::RequestTransaction,
        RequestKind::GetBalance,
    ];

    /// Wire name, also used as a metrics label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::RequestPermissions => "REQUEST_PERMISSIONS",
            RequestKind::ProveIdentity => "PROVE_IDENTITY",
            RequestKind::RequestTransaction => "REQUEST_TRANSACTION",
            RequestKind::GetBalance => "GET_BALANCE",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public key string as understood by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(String);

impl PublicKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PublicKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for PublicKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Signature over a transaction, as returned by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn new(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Balance returned by `GET_BALANCE`.
pub type Balance = f64;
