//! Streaming chat transport implementations for foldcraft.
//!
//! All transports implement the `foldcraft_core::ChatStream` trait; the
//! conversation loop never sees the wire format.

pub mod anthropic;

pub use anthropic::AnthropicChat;
