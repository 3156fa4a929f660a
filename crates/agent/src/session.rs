//! The chat session: one user line in, a settled transcript out.

use std::sync::Arc;

use tracing::{debug, info, warn};

use foldcraft_core::error::{DecodeError, Error};
use foldcraft_core::message::{Message, Transcript};
use foldcraft_core::provider::{ChatRequest, ChatStream, StopReason};
use foldcraft_core::tool::ToolRegistry;

use crate::decoder::{TurnObserver, decode_turn};

/// Phrases that end the session, matched case-insensitively against the
/// trimmed input line before any model call.
const EXIT_PHRASES: [&str; 2] = ["quit", "leave chat"];

/// Whether an input line asks to end the session.
pub fn is_exit_phrase(line: &str) -> bool {
    let trimmed = line.trim();
    EXIT_PHRASES
        .iter()
        .any(|phrase| trimmed.eq_ignore_ascii_case(phrase))
}

/// What a processed input line means for the surrounding read loop.
#[derive(Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The turn settled; prompt for the next line.
    Continue,
    /// The user asked to leave; no model call was made.
    Ended,
}

/// A tool-calling conversation over an append-only transcript.
///
/// The session is strictly serial: one in-flight model call, one tool at a
/// time, results appended in encounter order. Tool failures become
/// error-flagged results and the conversation continues; transport and
/// protocol failures propagate to the caller.
pub struct ChatSession {
    provider: Arc<dyn ChatStream>,
    tools: Arc<ToolRegistry>,
    model: String,
    max_tokens: u32,
    transcript: Transcript,
}

impl ChatSession {
    pub fn new(
        provider: Arc<dyn ChatStream>,
        tools: Arc<ToolRegistry>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            tools,
            model: model.into(),
            max_tokens,
            transcript: Transcript::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Process one line of user input to a settled state.
    ///
    /// Appends the user message, then alternates model calls and tool
    /// dispatch until the model stops with something other than `tool_use`.
    pub async fn run_line(
        &mut self,
        line: &str,
        observer: &mut dyn TurnObserver,
    ) -> Result<TurnOutcome, Error> {
        if is_exit_phrase(line) {
            info!("Exit phrase received, ending session");
            return Ok(TurnOutcome::Ended);
        }

        self.transcript.push(Message::user_text(line));

        loop {
            let turn = self.send(observer).await?;
            let calls: Vec<(String, String, serde_json::Value)> = turn
                .message
                .tool_uses()
                .map(|(id, name, input)| (id.to_string(), name.to_string(), input.clone()))
                .collect();
            self.transcript.push(turn.message);

            if turn.stop_reason != StopReason::ToolUse {
                debug!(stop_reason = %turn.stop_reason, "Turn settled");
                return Ok(TurnOutcome::Continue);
            }

            // Dispatch in encounter order, each result as its own message.
            for (id, name, input) in calls {
                let result = match self.tools.execute(&name, input).await {
                    Ok(text) => Message::tool_result(&id, text, false),
                    Err(e) => {
                        warn!(tool = %name, error = %e, "Tool failed");
                        Message::tool_result(&id, e.to_string(), true)
                    }
                };
                self.transcript.push(result);
            }
        }
    }

    async fn send(
        &mut self,
        observer: &mut dyn TurnObserver,
    ) -> Result<crate::decoder::DecodedTurn, Error> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: self.transcript.messages().to_vec(),
            max_tokens: self.max_tokens,
            tools: self.tools.definitions(),
        };
        let mut events = self.provider.stream_chat(request).await?;
        decode_turn(&mut events, observer).await.map_err(|e| match e {
            // A transport fault inside the stream is still a provider
            // failure as far as the caller is concerned.
            DecodeError::Transport(p) => Error::Provider(p),
            other => Error::Decode(other),
        })
    }
}
