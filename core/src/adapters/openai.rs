//! OpenAI Chat Completions streaming chunks (`chat.completion.chunk`).
//!
//! Lenient schema: plain `Value` field access rather than a tagged enum,
//! since OpenAI has historically added fields to this shape without a
//! version bump.

use serde_json::Value;

use crate::adapters::{opt_str, opt_u64, require_object, u64_or_zero, warn_invalid};
use crate::delta::{DeltaKind, StreamDelta, ToolCallDelta, UsageDelta};

const PROVIDER: &str = "openai";

/// Normalizes OpenAI-compatible chat-completion stream chunks into
/// [`StreamDelta`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiAdapter;

impl OpenAiAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(skip(self, payload), fields(provider = PROVIDER))]
    #[must_use]
    pub fn parse(&self, payload: &Value) -> Option<StreamDelta> {
        let obj = match require_object(payload, PROVIDER) {
            Ok(obj) => obj,
            Err(err) => {
                warn_invalid(&err);
                return None;
            }
        };

        if let Some(usage) = obj.get("usage").and_then(Value::as_object) {
            let usage = UsageDelta {
                input: u64_or_zero(usage, "prompt_tokens"),
                output: u64_or_zero(usage, "completion_tokens"),
                total: opt_u64(usage, "total_tokens"),
                ..Default::default()
            };
            return StreamDelta {
                kind: Some(DeltaKind::Usage),
                usage: Some(usage),
                ..Default::default()
            }
            .into_option();
        }

        let choice = obj
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(Value::as_object)?;

        let mut out = StreamDelta::default();

        if let Some(delta_obj) = choice.get("delta").and_then(Value::as_object) {
            if let Some(role) = opt_str(delta_obj, "role") {
                out.role = Some(role);
            }
            if let Some(Value::String(text)) = delta_obj.get("content") {
                out.kind = Some(DeltaKind::Content);
                out.content = Some(text.clone());
            }
            if let Some(tool_call) = delta_obj
                .get("tool_calls")
                .and_then(Value::as_array)
                .and_then(|calls| calls.first())
                .and_then(Value::as_object)
            {
                let index = opt_u64(tool_call, "index").unwrap_or(0) as usize;
                let function = tool_call.get("function").and_then(Value::as_object);
                out.kind = Some(DeltaKind::ToolCall);
                out.tool_call = Some(ToolCallDelta {
                    index,
                    id: opt_str(tool_call, "id"),
                    name: function.and_then(|f| opt_str(f, "name")),
                    args: function.and_then(|f| opt_str(f, "arguments")),
                });
            }
        }

        if let Some(reason) = opt_str(choice, "finish_reason") {
            out.stop_reason = Some(reason);
            if out.kind.is_none() {
                out.kind = Some(DeltaKind::Stop);
            }
        }

        out.into_option()
    }
}
