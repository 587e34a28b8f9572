//! Claude Code's stream-json event vocabulary plus its hook-event sideband
//! (any payload carrying `hook_event_name`, regardless of `type`).

use serde_json::{Map, Value};

use crate::adapters::{debug_unknown_event, opt_f64, opt_str, opt_u64, require_object, require_str, u64_or_zero, warn_invalid};
use crate::delta::{DeltaKind, SessionDelta, StreamDelta, TimingDelta, ToolCallDelta, UsageDelta};

const PROVIDER: &str = "claude_code";

/// Normalizes Claude Code stream-json and hook events into [`StreamDelta`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaudeCodeAdapter;

impl ClaudeCodeAdapter {
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

        if obj.contains_key("hook_event_name") {
            return handle_hook(obj);
        }

        let event_type = match require_str(obj, PROVIDER, "type") {
            Ok(event_type) => event_type,
            Err(err) => {
                warn_invalid(&err);
                return None;
            }
        };

        match event_type {
            "assistant" => handle_assistant(obj),
            "tool_use" => handle_tool_use(obj),
            "tool_result" => handle_tool_result(obj),
            "result" => handle_result(obj),
            "system" => handle_system(obj),
            other => {
                debug_unknown_event(PROVIDER, other);
                None
            }
        }
    }
}

fn handle_assistant(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let message = obj.get("message")?.as_object()?;
    let blocks = message.get("content")?.as_array()?;

    let mut out = StreamDelta::default();
    let mut text = String::new();
    let mut first_tool_call: Option<ToolCallDelta> = None;

    for block in blocks {
        let Some(block) = block.as_object() else {
            continue;
        };
        match block.get("type").and_then(Value::as_str) {
            Some("text") => {
                if let Some(fragment) = opt_str(block, "text") {
                    text.push_str(&fragment);
                }
            }
            Some("tool_use") if first_tool_call.is_none() => {
                first_tool_call = Some(ToolCallDelta {
                    index: 0,
                    id: opt_str(block, "id"),
                    name: opt_str(block, "name"),
                    args: block.get("input").map(Value::to_string),
                });
            }
            _ => {}
        }
    }

    if !text.is_empty() {
        out.kind = Some(DeltaKind::Content);
        out.content = Some(text);
    }
    if let Some(tool_call) = first_tool_call {
        if out.kind.is_none() {
            out.kind = Some(DeltaKind::ToolCall);
        }
        out.tool_call = Some(tool_call);
    }
    if let Some(usage) = message.get("usage").and_then(Value::as_object) {
        out.usage = Some(UsageDelta {
            input: u64_or_zero(usage, "input_tokens"),
            output: u64_or_zero(usage, "output_tokens"),
            cache_read: u64_or_zero(usage, "cache_read_input_tokens"),
            cache_write: u64_or_zero(usage, "cache_creation_input_tokens"),
            ..Default::default()
        });
    }
    out.model = opt_str(message, "model");
    out.stop_reason = opt_str(message, "stop_reason");
    out.role = opt_str(message, "role");

    out.into_option()
}

fn handle_tool_use(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let id = opt_str(obj, "tool_use_id");
    let name = opt_str(obj, "name");
    let args = obj.get("input").map(Value::to_string);
    if id.is_none() && name.is_none() && args.is_none() {
        return None;
    }
    Some(StreamDelta {
        kind: Some(DeltaKind::ToolCall),
        tool_call: Some(ToolCallDelta {
            index: 0,
            id,
            name,
            args,
        }),
        ..Default::default()
    })
}

fn handle_tool_result(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let content = opt_str(obj, "content")?;
    let id = opt_str(obj, "tool_use_id").unwrap_or_default();
    Some(StreamDelta::content(format!(
        "[Tool Result: {id}]\n{content}"
    )))
}

fn handle_result(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let mut out = StreamDelta::default();

    if let Some(usage) = obj.get("usage").and_then(Value::as_object) {
        out.kind = Some(DeltaKind::Usage);
        out.usage = Some(UsageDelta {
            input: u64_or_zero(usage, "input_tokens"),
            output: u64_or_zero(usage, "output_tokens"),
            cache_read: u64_or_zero(usage, "cache_read_input_tokens"),
            cache_write: u64_or_zero(usage, "cache_creation_input_tokens"),
            ..Default::default()
        });
    }

    out.cost = opt_f64(obj, "total_cost_usd");

    let duration = opt_u64(obj, "duration_ms").or_else(|| opt_u64(obj, "duration_api_ms"));
    if let Some(duration) = duration {
        out.timing = Some(TimingDelta {
            duration: Some(duration),
            ..Default::default()
        });
    }

    out.session = opt_str(obj, "session_id").map(SessionDelta::with_id);

    if out.kind.is_none() && opt_str(obj, "result").is_some() {
        out.kind = Some(DeltaKind::Stop);
    }

    out.into_option()
}

fn handle_system(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let subtype = opt_str(obj, "subtype")?;
    match subtype.as_str() {
        "init" => {
            let model = opt_str(obj, "model");
            let session = opt_str(obj, "session_id").map(SessionDelta::with_id);
            let mut line = String::from("Session initialized");
            if let Some(model) = &model {
                line.push_str(" (model: ");
                line.push_str(model);
                line.push(')');
            }
            Some(StreamDelta {
                kind: Some(DeltaKind::Content),
                content: Some(line),
                model,
                session,
                ..Default::default()
            })
        }
        "hook_response" => {
            let content = opt_str(obj, "content")?;
            Some(StreamDelta::content(content.trim().to_owned()))
        }
        _ => None,
    }
}

fn handle_hook(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let hook_event_name = opt_str(obj, "hook_event_name")?;
    let session = opt_str(obj, "session_id").map(SessionDelta::with_id);

    let mut out = match hook_event_name.as_str() {
        "SessionStart" => StreamDelta {
            kind: Some(DeltaKind::Content),
            content: Some("Session started".to_owned()),
            ..Default::default()
        },
        "SessionEnd" => StreamDelta {
            kind: Some(DeltaKind::Stop),
            stop_reason: Some("session_end".to_owned()),
            ..Default::default()
        },
        "PostToolUse" => StreamDelta {
            kind: Some(DeltaKind::ToolCall),
            tool_call: Some(ToolCallDelta {
                index: 0,
                id: None,
                name: opt_str(obj, "tool_name"),
                args: None,
            }),
            ..Default::default()
        },
        "Stop" => StreamDelta {
            kind: Some(DeltaKind::Stop),
            stop_reason: Some("stop".to_owned()),
            ..Default::default()
        },
        "UserPromptSubmit" => StreamDelta {
            kind: Some(DeltaKind::Content),
            role: Some("user".to_owned()),
            content: Some(opt_str(obj, "prompt").unwrap_or_default()),
            ..Default::default()
        },
        other => {
            debug_unknown_event(PROVIDER, other);
            return None;
        }
    };

    out.session = session;
    out.into_option()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn assistant_joins_text_and_lifts_first_tool_use() {
        let adapter = ClaudeCodeAdapter::new();
        let payload = json!({
            "type": "assistant",
            "message": {
                "role": "assistant",
                "model": "claude-opus",
                "content": [
                    { "type": "text", "text": "Hello " },
                    { "type": "text", "text": "world" },
                    { "type": "tool_use", "id": "t1", "name": "bash", "input": { "cmd": "ls" } }
                ],
                "usage": { "input_tokens": 10, "output_tokens": 20, "cache_read_input_tokens": 3 }
            }
        });
        let delta = adapter.parse(&payload).unwrap();
        assert_eq!(delta.content.as_deref(), Some("Hello world"));
        let tool_call = delta.tool_call.unwrap();
        assert_eq!(tool_call.id.as_deref(), Some("t1"));
        assert_eq!(tool_call.name.as_deref(), Some("bash"));
        let usage = delta.usage.unwrap();
        assert_eq!(usage.input, 10);
        assert_eq!(usage.cache_read, 3);
        assert_eq!(delta.model.as_deref(), Some("claude-opus"));
    }

    #[test]
    fn tool_result_formats_banner() {
        let adapter = ClaudeCodeAdapter::new();
        let payload = json!({
            "type": "tool_result",
            "tool_use_id": "t1",
            "content": "file written"
        });
        let delta = adapter.parse(&payload).unwrap();
        assert_eq!(
            delta.content.as_deref(),
            Some("[Tool Result: t1]\nfile written")
        );
    }

    #[test]
    fn tool_result_without_content_yields_none() {
        let adapter = ClaudeCodeAdapter::new();
        let payload = json!({ "type": "tool_result", "tool_use_id": "t1" });
        assert!(adapter.parse(&payload).is_none());
    }

    #[test]
    fn result_with_only_result_string_resolves_to_stop() {
        let adapter = ClaudeCodeAdapter::new();
        let payload = json!({ "type": "result", "result": "All done." });
        let delta = adapter.parse(&payload).unwrap();
        assert_eq!(delta.kind, Some(DeltaKind::Stop));
    }

    #[test]
    fn result_with_usage_resolves_to_usage() {
        let adapter = ClaudeCodeAdapter::new();
        let payload = json!({
            "type": "result",
            "result": "All done.",
            "usage": { "input_tokens": 5, "output_tokens": 7 },
            "total_cost_usd": 0.012,
            "duration_ms": 1500,
            "session_id": "sess-1"
        });
        let delta = adapter.parse(&payload).unwrap();
        assert_eq!(delta.kind, Some(DeltaKind::Usage));
        assert_eq!(delta.cost, Some(0.012));
        assert_eq!(delta.timing.unwrap().duration, Some(1500));
        assert_eq!(delta.session.unwrap().id.as_deref(), Some("sess-1"));
    }

    #[test]
    fn system_init_reports_model_and_session() {
        let adapter = ClaudeCodeAdapter::new();
        let payload = json!({
            "type": "system",
            "subtype": "init",
            "model": "claude-opus",
            "session_id": "sess-2"
        });
        let delta = adapter.parse(&payload).unwrap();
        assert_eq!(delta.model.as_deref(), Some("claude-opus"));
        assert_eq!(delta.session.unwrap().id.as_deref(), Some("sess-2"));
    }

    #[test]
    fn system_unknown_subtype_yields_none() {
        let adapter = ClaudeCodeAdapter::new();
        let payload = json!({ "type": "system", "subtype": "mystery" });
        assert!(adapter.parse(&payload).is_none());
    }

    #[test]
    fn hook_event_is_recognized_regardless_of_type_field() {
        let adapter = ClaudeCodeAdapter::new();
        let payload = json!({
            "hook_event_name": "PostToolUse",
            "tool_name": "bash",
            "session_id": "sess-3"
        });
        let delta = adapter.parse(&payload).unwrap();
        assert_eq!(delta.kind, Some(DeltaKind::ToolCall));
        assert_eq!(delta.tool_call.unwrap().name.as_deref(), Some("bash"));
        assert_eq!(delta.session.unwrap().id.as_deref(), Some("sess-3"));
    }

    #[test]
    fn unrecognized_hook_event_name_yields_none() {
        let adapter = ClaudeCodeAdapter::new();
        let payload = json!({ "hook_event_name": "SomethingElse" });
        assert!(adapter.parse(&payload).is_none());
    }
}
