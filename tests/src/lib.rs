//! # Scatter dApp Test Suite
//!
//! End-to-end flows through the client, the dispatch loop and the in-memory
//! stream, with a scripted wallet on the other end.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Harness and scripted wallet
//! └── integration/
//!     ├── correlation.rs  # Replies reach the right caller
//!     ├── handshake.rs    # Sync ordering and commit
//!     ├── failures.rs     # Timeouts, drops, disconnects
//!     └── properties.rs   # Randomized reply orders
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p scatter-tests
//! cargo test -p scatter-tests integration::failures
//! ```

pub mod fixtures;
pub mod integration;
