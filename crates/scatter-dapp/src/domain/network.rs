//! Network selection context attached to every outbound request.
//!
//! The wallet uses it to decide which chain a request targets. The client
//! starts with [`NetworkContext::Unset`] and the host replaces it through
//! `ScatterDapp::set_network`. On the wire `Unset` is `null`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete network endpoint chosen by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkEndpoint {
    /// Display name (e.g. `mainnet`)
    #[serde(default)]
    pub name: String,
    /// Node host
    pub host: String,
    /// Node port
    pub port: u16,
    /// Chain identifier, when the wallet needs one to disambiguate
    #[serde(rename = "chainId", default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
}

impl NetworkEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            name: String::new(),
            host: host.into(),
            port,
            chain_id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }
}

impl fmt::Display for NetworkEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}:{}", self.host, self.port)
        } else {
            write!(f, "{}@{}:{}", self.name, self.host, self.port)
        }
    }
}

/// Network context: either explicitly unset or a selected endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<NetworkEndpoint>", into = "Option<NetworkEndpoint>")]
pub enum NetworkContext {
    /// No network chosen yet
    #[default]
    Unset,
    /// Requests target this endpoint
    Selected(NetworkEndpoint),
}

impl NetworkContext {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Selected(_))
    }

    pub fn endpoint(&self) -> Option<&NetworkEndpoint> {
        match self {
            Self::Unset => None,
            Self::Selected(endpoint) => Some(endpoint),
        }
    }
}

impl From<NetworkEndpoint> for NetworkContext {
    fn from(endpoint: NetworkEndpoint) -> Self {
        Self::Selected(endpoint)
    }
}

impl From<Option<NetworkEndpoint>> for NetworkContext {
    fn from(endpoint: Option<NetworkEndpoint>) -> Self {
        endpoint.map_or(Self::Unset, Self::Selected)
    }
}

impl From<NetworkContext> for Option<NetworkEndpoint> {
    fn from(context: NetworkContext) -> Self {
        match context {
            NetworkContext::Unset => None,
            NetworkContext::Selected(endpoint) => Some(endpoint),
        }
    }
}

impl fmt::Display for NetworkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("unset"),
            Self::Selected(endpoint) => endpoint.fmt(f),
        }
    }
}
