//! Anthropic Messages API transport.
//!
//! Features:
//! - `x-api-key` header authentication (not Bearer)
//! - `anthropic-version` header
//! - Native tool use with `tool_use` / `tool_result` content blocks
//! - Streaming via SSE with `content_block_delta` events
//!
//! The SSE wire events are mapped one-to-one into `StreamEvent` values; the
//! stream decoder downstream never touches the wire format. The one wrinkle
//! is the stop reason: the API delivers it in a `message_delta` event before
//! the final `message_stop`, so it is held back and attached to the
//! `MessageStop` we emit.

use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, trace};

use foldcraft_core::error::ProviderError;
use foldcraft_core::message::Role;
use foldcraft_core::provider::{ChatRequest, ChatStream, StopReason, StreamEvent};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic streaming Messages API transport.
pub struct AnthropicChat {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicChat {
    /// Create a new Anthropic transport.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "anthropic".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_body(request: &ChatRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "max_tokens": request.max_tokens,
            "stream": true,
        });
        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(request.tools);
        }
        body
    }
}

#[async_trait]
impl ChatStream for AnthropicChat {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream_chat(
        &self,
        request: ChatRequest,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<StreamEvent, ProviderError>>,
        ProviderError,
    > {
        let url = format!("{}/v1/messages", self.base_url);
        let body = Self::build_body(&request);

        debug!(transport = "anthropic", model = %request.model, "Sending streaming request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }
        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid Anthropic API key".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let (tx, rx) = tokio::sync::mpsc::channel(64);

        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut buffer = String::new();
            // Stop reason arrives in message_delta, before message_stop.
            let mut pending_stop: Option<StopReason> = None;

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(ProviderError::StreamInterrupted(e.to_string())))
                            .await;
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim_end_matches('\r').to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    if line.is_empty() || line.starts_with(':') || line.starts_with("event: ") {
                        continue;
                    }

                    let Some(data) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    let data = data.trim();
                    if data.is_empty() {
                        continue;
                    }

                    let wire: serde_json::Value = match serde_json::from_str(data) {
                        Ok(v) => v,
                        Err(e) => {
                            trace!(error = %e, data = %data, "Ignoring unparseable Anthropic SSE");
                            continue;
                        }
                    };

                    let is_stop = wire["type"].as_str() == Some("message_stop");
                    if let Some(event) = wire_to_event(&wire, &mut pending_stop) {
                        if tx.send(Ok(event)).await.is_err() {
                            return;
                        }
                    }
                    if is_stop {
                        // Turn complete; close the channel.
                        return;
                    }
                }
            }
            // Stream ended without message_stop; dropping tx lets the
            // decoder observe the truncation.
        });

        Ok(rx)
    }
}

/// Map a single wire-format SSE payload onto a `StreamEvent`.
///
/// Events that carry no information for the decoder (`ping`, text block
/// starts, usage-only deltas) map to `None`. `message_delta` stashes the
/// stop reason into `pending_stop` for the eventual `message_stop`.
fn wire_to_event(
    wire: &serde_json::Value,
    pending_stop: &mut Option<StopReason>,
) -> Option<StreamEvent> {
    match wire["type"].as_str()? {
        "message_start" => {
            let role = match wire["message"]["role"].as_str() {
                Some("user") => Role::User,
                _ => Role::Assistant,
            };
            Some(StreamEvent::MessageStart(role))
        }
        "content_block_start" => {
            let block = &wire["content_block"];
            if block["type"].as_str() == Some("tool_use") {
                Some(StreamEvent::BlockStart {
                    id: block["id"].as_str().unwrap_or("").to_string(),
                    name: block["name"].as_str().unwrap_or("").to_string(),
                })
            } else {
                None
            }
        }
        "content_block_delta" => {
            let delta = &wire["delta"];
            match delta["type"].as_str() {
                Some("text_delta") => delta["text"]
                    .as_str()
                    .map(|t| StreamEvent::TextDelta(t.to_string())),
                Some("input_json_delta") => delta["partial_json"]
                    .as_str()
                    .map(|p| StreamEvent::ToolInputDelta(p.to_string())),
                _ => None,
            }
        }
        "content_block_stop" => Some(StreamEvent::BlockStop),
        "message_delta" => {
            if let Some(reason) = wire["delta"]["stop_reason"].as_str() {
                *pending_stop = Some(StopReason::from_wire(reason));
            }
            None
        }
        "message_stop" => Some(StreamEvent::MessageStop(
            pending_stop.take().unwrap_or(StopReason::EndTurn),
        )),
        _ => None,
    }
}
