//! Wire messages, codec and the inbound dispatch loop.

pub mod codec;
pub mod listener;
pub mod message;

pub use codec::{build_request, classify, decode, encode, Inbound};
pub use listener::{Dispatch, ResponseListener};
pub use message::{Message, MessageKind};
