//! Service layer: the client facade and its result handles.

pub mod client;
pub mod reply;

pub use client::ScatterDapp;
pub use reply::{interpret, PendingReply};
