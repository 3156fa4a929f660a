//! Transcript and content-block domain types.
//!
//! These are the value objects the conversation loop works with: an
//! append-only `Transcript` of `Message`s, each holding an ordered sequence
//! of `ContentBlock`s. The serde representation matches the Anthropic
//! Messages API wire format, so a `Message` serializes directly into a
//! request body entry.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user (also carries tool results back to the model)
    User,
    /// The remote model
    Assistant,
}

/// A single message in a conversation: a role plus ordered content blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a user message holding one text block.
    pub fn user_text(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::Text {
                text: content.into(),
            }],
        }
    }

    /// Create a user message wrapping a single tool result.
    pub fn tool_result(
        tool_use_id: impl Into<String>,
        text: impl Into<String>,
        is_error: bool,
    ) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::ToolResult {
                tool_use_id: tool_use_id.into(),
                content: vec![ToolResultBlock::Text { text: text.into() }],
                is_error,
            }],
        }
    }

    /// Iterate the tool-use blocks of this message in encounter order.
    pub fn tool_uses(&self) -> impl Iterator<Item = (&str, &str, &serde_json::Value)> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::ToolUse { id, name, input } => {
                Some((id.as_str(), name.as_str(), input))
            }
            _ => None,
        })
    }
}

/// A tagged content block inside a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Free-form model or user text.
    Text { text: String },
    /// A model-issued request to run a named local action.
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    /// The host's answer to a tool-use block, correlated by id.
    ToolResult {
        tool_use_id: String,
        content: Vec<ToolResultBlock>,
        #[serde(default, skip_serializing_if = "is_false")]
        is_error: bool,
    },
}

/// Content inside a tool result. The API only accepts text here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolResultBlock {
    Text { text: String },
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// An append-only ordered sequence of messages.
///
/// The transcript is owned exclusively by the chat session and only ever
/// grows; no message is edited or reordered once pushed. The remote model's
/// multi-turn tool-use reasoning depends on that order being preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user_text("design a scaffold for 5AN7");
        assert_eq!(msg.role, Role::User);
        match &msg.content[0] {
            ContentBlock::Text { text } => assert_eq!(text, "design a scaffold for 5AN7"),
            other => panic!("expected text block, got {other:?}"),
        }
    }

    #[test]
    fn tool_result_message_carries_error_flag() {
        let msg = Message::tool_result("toolu_01", "Input file does not exist", true);
        assert_eq!(msg.role, Role::User);
        match &msg.content[0] {
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => {
                assert_eq!(tool_use_id, "toolu_01");
                assert!(*is_error);
                let ToolResultBlock::Text { text } = &content[0];
                assert_eq!(text, "Input file does not exist");
            }
            other => panic!("expected tool_result block, got {other:?}"),
        }
    }

    #[test]
    fn wire_format_matches_messages_api() {
        let msg = Message {
            role: Role::Assistant,
            content: vec![
                ContentBlock::Text {
                    text: "Downloading now".into(),
                },
                ContentBlock::ToolUse {
                    id: "toolu_abc".into(),
                    name: "download_pdb".into(),
                    input: serde_json::json!({"pdb_code": "5AN7"}),
                },
            ],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "tool_use");
        assert_eq!(json["content"][1]["input"]["pdb_code"], "5AN7");
    }

    #[test]
    fn success_tool_result_omits_error_flag() {
        let msg = Message::tool_result("toolu_01", "done", false);
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json["content"][0].get("is_error").is_none());
        assert_eq!(json["content"][0]["content"][0]["type"], "text");
    }

    #[test]
    fn tool_uses_iterates_in_order() {
        let msg = Message {
            role: Role::Assistant,
            content: vec![
                ContentBlock::ToolUse {
                    id: "a".into(),
                    name: "download_pdb".into(),
                    input: serde_json::json!({}),
                },
                ContentBlock::Text { text: "and".into() },
                ContentBlock::ToolUse {
                    id: "b".into(),
                    name: "run_rfdiffusion".into(),
                    input: serde_json::json!({}),
                },
            ],
        };
        let ids: Vec<&str> = msg.tool_uses().map(|(id, _, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn transcript_is_append_only() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());
        transcript.push(Message::user_text("hello"));
        transcript.push(Message::user_text("again"));
        assert_eq!(transcript.len(), 2);
        // Only a shared slice is exposed; no mutation of prior messages.
        assert_eq!(transcript.messages().len(), 2);
    }
}
