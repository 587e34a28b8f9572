//! Gemini CLI's event vocabulary.

use serde_json::{Map, Value};

use crate::adapters::{debug_unknown_event, opt_str, opt_u64, require_object, require_str, u64_or_zero, warn_invalid};
use crate::delta::{DeltaKind, StreamDelta, TimingDelta, ToolCallDelta, UsageDelta};

const PROVIDER: &str = "gemini";

/// Normalizes Gemini CLI stream events into [`StreamDelta`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiAdapter;

impl GeminiAdapter {
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

        let event_type = match require_str(obj, PROVIDER, "type") {
            Ok(event_type) => event_type,
            Err(err) => {
                warn_invalid(&err);
                return None;
            }
        };

        match event_type {
            "init" => handle_init(obj),
            "message" => handle_message(obj),
            "tool_use" => handle_tool_use(obj),
            "tool_result" => handle_tool_result(obj),
            "result" => handle_result(obj),
            other => {
                debug_unknown_event(PROVIDER, other);
                None
            }
        }
    }
}

fn handle_init(obj: &Map<String, Value>) -> Option<StreamDelta> {
    Some(StreamDelta {
        kind: Some(DeltaKind::Content),
        content: Some("Session initialized".to_owned()),
        model: opt_str(obj, "model"),
        ..Default::default()
    })
}

fn handle_message(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let role = opt_str(obj, "role").unwrap_or_default();
    if role == "user" {
        return None;
    }
    let text = opt_str(obj, "text")?;
    Some(StreamDelta {
        kind: Some(DeltaKind::Content),
        role: Some(role),
        content: Some(text),
        ..Default::default()
    })
}

fn handle_tool_use(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let name = opt_str(obj, "name");
    let args = obj.get("args").map(Value::to_string);
    if name.is_none() && args.is_none() {
        return None;
    }
    Some(StreamDelta {
        kind: Some(DeltaKind::ToolCall),
        tool_call: Some(ToolCallDelta {
            index: 0,
            id: opt_str(obj, "id"),
            name,
            args,
        }),
        ..Default::default()
    })
}

fn handle_tool_result(obj: &Map<String, Value>) -> Option<StreamDelta> {
    Some(StreamDelta::content(opt_str(obj, "content")?))
}

fn handle_result(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let stats = obj.get("stats")?.as_object()?;
    let input = u64_or_zero(stats, "input_tokens");
    let output = u64_or_zero(stats, "output_tokens");
    let total = opt_u64(stats, "total_tokens").or(Some(input + output));
    let duration = opt_u64(stats, "duration_ms").map(|duration| TimingDelta {
        duration: Some(duration),
        ..Default::default()
    });
    Some(StreamDelta {
        kind: Some(DeltaKind::Usage),
        usage: Some(UsageDelta {
            input,
            output,
            total,
            ..Default::default()
        }),
        timing: duration,
        ..Default::default()
    })
}
