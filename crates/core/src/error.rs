//! Error types for the foldcraft domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the top-level `Error`
//! wraps them with `#[from]` conversions.

use thiserror::Error;

/// The top-level error type for all foldcraft operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Transport errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Stream decoding errors ---
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures raised by the streaming chat transport.
///
/// Any of these terminates the whole session: the CLI catches them once at
/// the outermost level, logs, and exits the chat loop without retrying.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures while decoding a stream of events into a finished message.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The concatenated tool-input fragments were not valid JSON.
    ///
    /// This is a protocol violation by the remote service and is never
    /// converted into a tool result — it propagates and ends the turn.
    #[error("Malformed tool input for '{name}': {reason}")]
    MalformedToolInput { name: String, reason: String },

    /// The transport reported a fault mid-stream.
    #[error("Transport fault during decode: {0}")]
    Transport(#[from] ProviderError),

    /// The stream ended before a message-stop event was observed.
    #[error("Stream ended without a message stop")]
    TruncatedStream,
}

/// Failures raised by a dispatched tool.
///
/// All of these are caught at the dispatch boundary and converted into an
/// error-flagged tool result; they never terminate the session.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Missing or invalid argument for {tool_name}: {reason}")]
    MissingArgument { tool_name: String, reason: String },

    #[error("{reason}")]
    InvalidInput { tool_name: String, reason: String },

    #[error("{reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}
