//! Request identifiers for reply correlation.
//!
//! Identifiers are short random strings over a fixed 62-symbol alphabet. They
//! are unique enough for the handful of requests a dApp keeps in flight, but
//! not guaranteed unique: the pending store rejects a duplicate registration
//! and the client retries with a fresh identifier.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbols an identifier is drawn from, in generation order.
pub const ID_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default identifier length.
pub const DEFAULT_ID_LENGTH: usize = 24;

/// Correlation identifier binding one outbound request to its reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new identifier of the default length.
    pub fn generate() -> Self {
        IdGenerator::default().generate()
    }

    /// Wrap an identifier received from the wire.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if every symbol belongs to [`ID_ALPHABET`].
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| ID_ALPHABET.contains(&b))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stateless identifier generator with a fixed output length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdGenerator {
    length: usize,
}

impl IdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generate an identifier using the thread-local RNG.
    pub fn generate(&self) -> RequestId {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate an identifier from the given RNG.
    ///
    /// Each position is chosen independently and uniformly from [`ID_ALPHABET`].
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> RequestId {
        let id: String = (0..self.length)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        RequestId(id)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}
