//! # foldcraft Core
//!
//! Domain types, traits, and error definitions for the foldcraft
//! protein-design assistant. This crate has **zero framework dependencies**
//! beyond serde/tokio primitives — it defines the domain model that all
//! other crates implement against.
//!
//! ## Design Philosophy
//!
//! The chat transport (`ChatStream`) and the local actions (`Tool`) are
//! traits here; implementations live in their respective crates. This keeps
//! the conversation loop testable against scripted streams and mock tools,
//! and keeps the dependency graph pointing inward on core.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{DecodeError, Error, ProviderError, Result, ToolError};
pub use message::{ContentBlock, Message, Role, ToolResultBlock, Transcript};
pub use provider::{ChatRequest, ChatStream, StopReason, StreamEvent, ToolDefinition};
pub use tool::{Tool, ToolRegistry};
