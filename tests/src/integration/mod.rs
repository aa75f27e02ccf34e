//! Cross-component flows.

mod correlation;
mod failures;
mod handshake;
mod properties;
