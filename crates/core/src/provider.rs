//! ChatStream trait — the abstraction over the streaming chat transport.
//!
//! A `ChatStream` takes a model identifier, the full transcript, and the
//! static tool declarations, and returns an ordered stream of incremental
//! events. The conversation loop decodes those events into one finished
//! message per turn; it never talks to the network directly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::{Message, Role};

/// A single chat request: everything the remote model needs for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model to use (e.g., "claude-3-haiku-20240307")
    pub model: String,

    /// The ordered transcript so far
    pub messages: Vec<Message>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Declared tools the model may request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// A tool declaration sent to the model so it knows what it can request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool's input object
    pub input_schema: serde_json::Value,
}

/// One incremental event emitted by the transport for a single turn.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The message role announcement; always first.
    MessageStart(Role),
    /// A tool-use block opened, carrying the tool identity.
    BlockStart { id: String, name: String },
    /// A fragment of assistant text.
    TextDelta(String),
    /// A fragment of the serialized tool-input object.
    ToolInputDelta(String),
    /// The current content block finished.
    BlockStop,
    /// The message finished with the given stop reason; always last.
    MessageStop(StopReason),
}

/// Why the model stopped producing output.
///
/// Only `ToolUse` triggers action dispatch; every other value ends the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    ToolUse,
    EndTurn,
    MaxTokens,
    StopSequence,
    Other(String),
}

impl StopReason {
    /// Parse a wire-format stop reason string.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "tool_use" => Self::ToolUse,
            "end_turn" => Self::EndTurn,
            "max_tokens" => Self::MaxTokens,
            "stop_sequence" => Self::StopSequence,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToolUse => write!(f, "tool_use"),
            Self::EndTurn => write!(f, "end_turn"),
            Self::MaxTokens => write!(f, "max_tokens"),
            Self::StopSequence => write!(f, "stop_sequence"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// The streaming chat transport.
///
/// One call corresponds to one model turn: the returned receiver yields the
/// turn's events in order and closes after `MessageStop` (or an error).
#[async_trait]
pub trait ChatStream: Send + Sync {
    /// A human-readable name for this transport (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a request and stream back the turn's events.
    async fn stream_chat(
        &self,
        request: ChatRequest,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<StreamEvent, ProviderError>>,
        ProviderError,
    >;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_reason_wire_roundtrip() {
        assert_eq!(StopReason::from_wire("tool_use"), StopReason::ToolUse);
        assert_eq!(StopReason::from_wire("end_turn"), StopReason::EndTurn);
        assert_eq!(StopReason::from_wire("max_tokens"), StopReason::MaxTokens);
        assert_eq!(
            StopReason::from_wire("pause_turn"),
            StopReason::Other("pause_turn".into())
        );
        assert_eq!(StopReason::ToolUse.to_string(), "tool_use");
    }

    #[test]
    fn request_serializes_tools_inline() {
        let req = ChatRequest {
            model: "claude-3-haiku-20240307".into(),
            messages: vec![Message::user_text("download 5AN7")],
            max_tokens: 4096,
            tools: vec![ToolDefinition {
                name: "download_pdb".into(),
                description: "Download a PDB file".into(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": { "pdb_code": { "type": "string" } },
                    "required": ["pdb_code"]
                }),
            }],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["tools"][0]["name"], "download_pdb");
        assert_eq!(json["tools"][0]["input_schema"]["type"], "object");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn empty_tools_are_omitted() {
        let req = ChatRequest {
            model: "claude-3-haiku-20240307".into(),
            messages: vec![],
            max_tokens: 1024,
            tools: vec![],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("tools").is_none());
    }
}
