//! Anthropic Messages API streaming events.
//!
//! Strict schema: a `#[serde(tag = "type")]` enum over the exact event
//! vocabulary, mirroring `AnthropicStreamEvent`/`AnthropicContentBlock`.
//! Unknown event-type strings deserialize to a catch-all variant rather
//! than failing validation, since new event types are additive.

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::{debug_unknown_event, warn_invalid};
use crate::delta::{DeltaKind, StreamDelta, ToolCallDelta, UsageDelta};
use crate::error::ValidationError;

const PROVIDER: &str = "anthropic";

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicStreamEvent {
    #[serde(rename = "message_start")]
    MessageStart { message: MessageStartBody },
    #[serde(rename = "content_block_start")]
    ContentBlockStart {
        index: usize,
        content_block: ContentBlock,
    },
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta { index: usize, delta: ContentDelta },
    #[serde(rename = "content_block_stop")]
    ContentBlockStop { index: usize },
    #[serde(rename = "message_delta")]
    MessageDelta {
        delta: MessageDeltaBody,
        #[serde(default)]
        usage: Option<AnthropicUsage>,
    },
    #[serde(rename = "message_stop")]
    MessageStop {},
    #[serde(rename = "ping")]
    Ping {},
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct MessageStartBody {
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "tool_use")]
    ToolUse { id: String, name: String },
    #[serde(rename = "text")]
    Text {},
    #[serde(rename = "thinking")]
    Thinking {},
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentDelta {
    #[serde(rename = "text_delta")]
    TextDelta { text: String },
    #[serde(rename = "input_json_delta")]
    InputJsonDelta { partial_json: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MessageDeltaBody {
    #[serde(default)]
    stop_reason: Option<String>,
}

/// Normalizes Anthropic Messages API SSE events into [`StreamDelta`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicAdapter;

impl AnthropicAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(skip(self, payload), fields(provider = PROVIDER))]
    #[must_use]
    pub fn parse(&self, payload: &Value) -> Option<StreamDelta> {
        let event: AnthropicStreamEvent = match serde_json::from_value(payload.clone()) {
            Ok(event) => event,
            Err(err) => {
                warn_invalid(&ValidationError::MalformedPayload {
                    provider: PROVIDER,
                    message: err.to_string(),
                });
                return None;
            }
        };

        match event {
            AnthropicStreamEvent::MessageStart { message } => {
                let usage = message.usage?;
                Some(StreamDelta {
                    kind: Some(DeltaKind::Usage),
                    usage: Some(UsageDelta {
                        input: usage.input_tokens,
                        ..Default::default()
                    }),
                    ..Default::default()
                })
            }
            AnthropicStreamEvent::ContentBlockStart {
                index,
                content_block: ContentBlock::ToolUse { id, name },
            } => Some(StreamDelta {
                kind: Some(DeltaKind::ToolCall),
                tool_call: Some(ToolCallDelta {
                    index,
                    id: Some(id),
                    name: Some(name),
                    args: Some(String::new()),
                }),
                ..Default::default()
            }),
            AnthropicStreamEvent::ContentBlockStart { .. } => None,
            AnthropicStreamEvent::ContentBlockDelta {
                delta: ContentDelta::TextDelta { text },
                ..
            } => Some(StreamDelta {
                kind: Some(DeltaKind::Content),
                role: Some("assistant".to_owned()),
                content: Some(text),
                ..Default::default()
            }),
            AnthropicStreamEvent::ContentBlockDelta {
                index,
                delta: ContentDelta::InputJsonDelta { partial_json },
            } => Some(StreamDelta {
                kind: Some(DeltaKind::ToolCall),
                tool_call: Some(ToolCallDelta {
                    index,
                    args: Some(partial_json),
                    ..ToolCallDelta::new(index)
                }),
                ..Default::default()
            }),
            AnthropicStreamEvent::ContentBlockDelta { .. } => None,
            AnthropicStreamEvent::MessageDelta { delta, usage } => {
                let mut out = StreamDelta::default();
                if let Some(usage) = usage {
                    out.kind = Some(DeltaKind::Usage);
                    out.usage = Some(UsageDelta {
                        output: usage.output_tokens,
                        ..Default::default()
                    });
                }
                if let Some(reason) = delta.stop_reason {
                    if out.kind.is_none() {
                        out.kind = Some(DeltaKind::Stop);
                    }
                    out.stop_reason = Some(reason);
                }
                out.into_option()
            }
            AnthropicStreamEvent::ContentBlockStop { .. }
            | AnthropicStreamEvent::MessageStop {}
            | AnthropicStreamEvent::Ping {} => None,
            AnthropicStreamEvent::Unknown => {
                debug_unknown_event(PROVIDER, "<unrecognized>");
                None
            }
        }
    }
}
