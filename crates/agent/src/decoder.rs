//! Stream decoder: incremental events in, one finished message out.

use tokio::sync::mpsc::Receiver;
use tracing::debug;

use foldcraft_core::error::{DecodeError, ProviderError};
use foldcraft_core::message::{ContentBlock, Message, Role};
use foldcraft_core::provider::{StopReason, StreamEvent};

/// Receives each assistant text fragment as it arrives.
///
/// The handle is passed explicitly into [`decode_turn`] so incremental
/// display stays out of the decoding logic; observers must not influence
/// the decoded content.
pub trait TurnObserver: Send {
    fn on_text(&mut self, fragment: &str);
}

/// Discards all fragments. For callers that only want the finished message.
pub struct NullObserver;

impl TurnObserver for NullObserver {
    fn on_text(&mut self, _fragment: &str) {}
}

/// A fully decoded model turn.
#[derive(Debug)]
pub struct DecodedTurn {
    pub message: Message,
    pub stop_reason: StopReason,
}

/// An in-progress tool-use block: identity plus the input fragments seen
/// so far.
struct ToolUseAccumulator {
    id: String,
    name: String,
    input_json: String,
}

/// Fold one turn's event stream into a finished assistant message.
///
/// Consumes events until `MessageStop`; the transport closes the channel
/// after that. A channel that closes early is a truncated stream. Malformed
/// tool-input JSON is a protocol violation and propagates as an error; it is
/// never converted into message content.
pub async fn decode_turn(
    events: &mut Receiver<Result<StreamEvent, ProviderError>>,
    observer: &mut dyn TurnObserver,
) -> Result<DecodedTurn, DecodeError> {
    let mut role = Role::Assistant;
    let mut blocks: Vec<ContentBlock> = Vec::new();
    let mut text: String = String::new();
    let mut open_tool: Option<ToolUseAccumulator> = None;

    while let Some(event) = events.recv().await {
        match event? {
            StreamEvent::MessageStart(r) => {
                role = r;
            }
            StreamEvent::TextDelta(fragment) => {
                observer.on_text(&fragment);
                text.push_str(&fragment);
            }
            StreamEvent::BlockStart { id, name } => {
                flush_text(&mut text, &mut blocks);
                open_tool = Some(ToolUseAccumulator {
                    id,
                    name,
                    input_json: String::new(),
                });
            }
            StreamEvent::ToolInputDelta(fragment) => {
                if let Some(tool) = open_tool.as_mut() {
                    tool.input_json.push_str(&fragment);
                }
            }
            StreamEvent::BlockStop => match open_tool.take() {
                Some(tool) => {
                    blocks.push(close_tool_block(tool)?);
                }
                None => flush_text(&mut text, &mut blocks),
            },
            StreamEvent::MessageStop(stop_reason) => {
                flush_text(&mut text, &mut blocks);
                debug!(%stop_reason, blocks = blocks.len(), "Turn decoded");
                return Ok(DecodedTurn {
                    message: Message {
                        role,
                        content: blocks,
                    },
                    stop_reason,
                });
            }
        }
    }

    Err(DecodeError::TruncatedStream)
}

fn flush_text(text: &mut String, blocks: &mut Vec<ContentBlock>) {
    if !text.is_empty() {
        blocks.push(ContentBlock::Text {
            text: std::mem::take(text),
        });
    }
}

fn close_tool_block(tool: ToolUseAccumulator) -> Result<ContentBlock, DecodeError> {
    // No input deltas at all means a zero-argument call.
    let input = if tool.input_json.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(&tool.input_json).map_err(|e| DecodeError::MalformedToolInput {
            name: tool.name.clone(),
            reason: e.to_string(),
        })?
    };
    Ok(ContentBlock::ToolUse {
        id: tool.id,
        name: tool.name,
        input,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    struct Recorder(Vec<String>);

    impl TurnObserver for Recorder {
        fn on_text(&mut self, fragment: &str) {
            self.0.push(fragment.to_string());
        }
    }

    async fn feed(events: Vec<Result<StreamEvent, ProviderError>>) -> Receiver<Result<StreamEvent, ProviderError>> {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            tx.send(event).await.unwrap();
        }
        rx
    }

    #[tokio::test]
    async fn decodes_text_then_tool_use() {
        let mut rx = feed(vec![
            Ok(StreamEvent::MessageStart(Role::Assistant)),
            Ok(StreamEvent::TextDelta("I'll download ".into())),
            Ok(StreamEvent::TextDelta("5AN7 now.".into())),
            Ok(StreamEvent::BlockStart {
                id: "toolu_01".into(),
                name: "download_pdb".into(),
            }),
            Ok(StreamEvent::ToolInputDelta("{\"pdb_co".into())),
            Ok(StreamEvent::ToolInputDelta("de\": \"5AN7\"}".into())),
            Ok(StreamEvent::BlockStop),
            Ok(StreamEvent::MessageStop(StopReason::ToolUse)),
        ])
        .await;

        let mut observer = Recorder(Vec::new());
        let turn = decode_turn(&mut rx, &mut observer).await.unwrap();

        assert_eq!(turn.stop_reason, StopReason::ToolUse);
        assert_eq!(turn.message.role, Role::Assistant);
        assert_eq!(turn.message.content.len(), 2);
        match &turn.message.content[0] {
            ContentBlock::Text { text } => assert_eq!(text, "I'll download 5AN7 now."),
            other => panic!("expected text, got {other:?}"),
        }
        match &turn.message.content[1] {
            ContentBlock::ToolUse { id, name, input } => {
                assert_eq!(id, "toolu_01");
                assert_eq!(name, "download_pdb");
                assert_eq!(input["pdb_code"], "5AN7");
            }
            other => panic!("expected tool_use, got {other:?}"),
        }
        assert_eq!(observer.0, vec!["I'll download ", "5AN7 now."]);
    }

    #[tokio::test]
    async fn text_only_turn_closes_on_block_stop() {
        let mut rx = feed(vec![
            Ok(StreamEvent::MessageStart(Role::Assistant)),
            Ok(StreamEvent::TextDelta("Hello!".into())),
            Ok(StreamEvent::BlockStop),
            Ok(StreamEvent::MessageStop(StopReason::EndTurn)),
        ])
        .await;

        let turn = decode_turn(&mut rx, &mut NullObserver).await.unwrap();
        assert_eq!(turn.stop_reason, StopReason::EndTurn);
        assert_eq!(turn.message.content.len(), 1);
    }

    #[tokio::test]
    async fn malformed_tool_input_propagates() {
        let mut rx = feed(vec![
            Ok(StreamEvent::MessageStart(Role::Assistant)),
            Ok(StreamEvent::BlockStart {
                id: "toolu_01".into(),
                name: "run_rfdiffusion".into(),
            }),
            Ok(StreamEvent::ToolInputDelta("{\"output_dir".into())),
            Ok(StreamEvent::BlockStop),
            Ok(StreamEvent::MessageStop(StopReason::ToolUse)),
        ])
        .await;

        let err = decode_turn(&mut rx, &mut NullObserver).await.unwrap_err();
        match err {
            DecodeError::MalformedToolInput { name, .. } => {
                assert_eq!(name, "run_rfdiffusion");
            }
            other => panic!("expected malformed tool input, got {other}"),
        }
    }

    #[tokio::test]
    async fn empty_tool_input_decodes_as_empty_object() {
        let mut rx = feed(vec![
            Ok(StreamEvent::MessageStart(Role::Assistant)),
            Ok(StreamEvent::BlockStart {
                id: "toolu_01".into(),
                name: "download_pdb".into(),
            }),
            Ok(StreamEvent::BlockStop),
            Ok(StreamEvent::MessageStop(StopReason::ToolUse)),
        ])
        .await;

        let turn = decode_turn(&mut rx, &mut NullObserver).await.unwrap();
        match &turn.message.content[0] {
            ContentBlock::ToolUse { input, .. } => {
                assert_eq!(input, &serde_json::json!({}));
            }
            other => panic!("expected tool_use, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn early_channel_close_is_truncation() {
        let mut rx = feed(vec![
            Ok(StreamEvent::MessageStart(Role::Assistant)),
            Ok(StreamEvent::TextDelta("partial".into())),
        ])
        .await;

        let err = decode_turn(&mut rx, &mut NullObserver).await.unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedStream));
    }

    #[tokio::test]
    async fn transport_fault_mid_stream_propagates() {
        let mut rx = feed(vec![
            Ok(StreamEvent::MessageStart(Role::Assistant)),
            Err(ProviderError::StreamInterrupted("connection reset".into())),
        ])
        .await;

        let err = decode_turn(&mut rx, &mut NullObserver).await.unwrap_err();
        assert!(matches!(err, DecodeError::Transport(_)));
    }
}
