//! Application-level outcomes reported by the wallet.
//!
//! A wallet that refuses a request still *answers* it: the reply payload is an
//! error object instead of the expected value. Such answers settle the request
//! successfully and surface as the inner `Err` of an [`Outcome`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes used by the wallet, modelled on HTTP status codes
pub mod codes {
    pub const NO_SIGNATURE: u16 = 402;
    pub const FORBIDDEN: u16 = 403;
    pub const TIMED_OUT: u16 = 408;
    pub const LOCKED: u16 = 423;
    pub const UPGRADE_REQUIRED: u16 = 426;
    pub const TOO_MANY_REQUESTS: u16 = 429;
}

/// Error value carried in a reply payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletError {
    /// Wallet-defined error type (e.g. `locked`, `signature_rejected`)
    pub kind: String,
    /// Human readable message
    pub message: String,
    /// Numeric code, see [`codes`]
    pub code: u16,
}

/// Result of a settled request: the expected value or a wallet refusal.
pub type Outcome<T> = Result<T, WalletError>;

impl WalletError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>, code: u16) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            code,
        }
    }

    /// The user declined to grant this dApp access to a wallet.
    pub fn permission_denied() -> Self {
        Self::new(
            "permission_denied",
            "The user denied the permission request",
            codes::FORBIDDEN,
        )
    }

    /// The wallet is locked and cannot answer.
    pub fn locked() -> Self {
        Self::new("locked", "The user's wallet is locked", codes::LOCKED)
    }

    /// The user refused to sign.
    pub fn signature_rejected() -> Self {
        Self::new(
            "signature_rejected",
            "The user declined to sign the transaction",
            codes::NO_SIGNATURE,
        )
    }

    /// The wallet could not prove control of the requested key.
    pub fn identity_rejected() -> Self {
        Self::new(
            "identity_rejected",
            "The identity could not be proven",
            codes::FORBIDDEN,
        )
    }

    /// Interpret a reply payload as a wallet error.
    ///
    /// Returns `None` unless the payload is an object flagged `"isError": true`.
    pub fn from_payload(payload: &serde_json::Value) -> Option<Self> {
        let flagged = payload
            .get("isError")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        if !flagged {
            return None;
        }
        serde_json::from_value(payload.clone()).ok()
    }
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] {}", self.code, self.kind, self.message)
    }
}

impl std::error::Error for WalletError {}

impl Serialize for WalletError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("WalletError", 4)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("isError", &true)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for WalletError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ErrorHelper {
            #[serde(rename = "type", default)]
            kind: String,
            #[serde(default)]
            message: String,
            #[serde(default)]
            code: u16,
        }

        let helper = ErrorHelper::deserialize(deserializer)?;
        Ok(WalletError {
            kind: helper.kind,
            message: helper.message,
            code: helper.code,
        })
    }
}
