//! Client configuration with validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::correlation::DEFAULT_ID_LENGTH;
use crate::domain::session::InjectionMode;

/// Endpoint name the wallet listens on.
pub const DEFAULT_ENDPOINT: &str = "scatter";

/// Shortest identifier length accepted by [`ClientConfig::validate`].
pub const MIN_ID_LENGTH: usize = 8;

/// Longest identifier length accepted by [`ClientConfig::validate`].
pub const MAX_ID_LENGTH: usize = 128;

/// Correlation client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Endpoint name every message is addressed to
    pub endpoint: String,
    /// Side of the encrypted stream this client plays
    pub injection_mode: InjectionMode,
    /// Length of generated request identifiers
    pub id_length: usize,
    /// Per-request deadline; `None` waits for the reply indefinitely
    #[serde(with = "humantime_serde::option")]
    pub request_timeout: Option<Duration>,
    /// Refuse to send while the network context is unset
    pub require_network: bool,
    /// Fresh identifiers to try when a generated one is already pending
    pub max_id_attempts: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            injection_mode: InjectionMode::Injected,
            id_length: DEFAULT_ID_LENGTH,
            request_timeout: None,
            require_network: false,
            max_id_attempts: 3,
        }
    }
}

impl ClientConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint cannot be empty".into()));
        }

        if !(MIN_ID_LENGTH..=MAX_ID_LENGTH).contains(&self.id_length) {
            return Err(ConfigError::InvalidLimit(format!(
                "id_length must be between {} and {}, got {}",
                MIN_ID_LENGTH, MAX_ID_LENGTH, self.id_length
            )));
        }

        if self.max_id_attempts == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_id_attempts cannot be 0".into(),
            ));
        }

        if matches!(self.request_timeout, Some(t) if t.is_zero()) {
            return Err(ConfigError::InvalidTimeout(
                "request_timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn requiring_network(mut self) -> Self {
        self.require_network = true;
        self
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Duration (de)serialization as `"30s"`, `"500ms"` or `"2m"` strings
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub mod option {
        use super::*;

        pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match duration {
                Some(d) => serializer.serialize_some(&super::format_duration(*d)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = Option::<String>::deserialize(deserializer)?;
            s.map(|s| super::parse_duration(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }

    fn format_duration(duration: Duration) -> String {
        if duration.subsec_millis() == 0 {
            format!("{}s", duration.as_secs())
        } else {
            format!("{}ms", duration.as_millis())
        }
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" before "s", or "500ms" would be read as seconds
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .map(Duration::from_secs)
                .ok_or("invalid minutes")
        } else {
            // Plain seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
