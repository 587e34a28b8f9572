//! OpenCode's event vocabulary.

use serde_json::{Map, Value};

use crate::adapters::{debug_unknown_event, opt_f64, opt_str, require_object, require_str, u64_or_zero, warn_invalid};
use crate::delta::{DeltaKind, SessionDelta, StreamDelta, ToolCallDelta, UsageDelta};

const PROVIDER: &str = "opencode";

/// Normalizes OpenCode stream events into [`StreamDelta`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCodeAdapter;

impl OpenCodeAdapter {
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
            "text" => handle_text(obj),
            "tool_use" => handle_tool_use(obj),
            "step_start" => None,
            "step_finish" => handle_step_finish(obj),
            other => {
                debug_unknown_event(PROVIDER, other);
                None
            }
        }
    }
}

fn session_from(obj: &Map<String, Value>) -> Option<SessionDelta> {
    let session = SessionDelta {
        id: opt_str(obj, "session_id"),
        message_id: opt_str(obj, "message_id"),
        part_id: opt_str(obj, "part_id"),
        thread_id: None,
    };
    if session.is_empty() {
        None
    } else {
        Some(session)
    }
}

fn handle_text(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let mut out = StreamDelta::content(opt_str(obj, "text")?);
    out.session = session_from(obj);
    out.into_option()
}

fn handle_tool_use(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let name = opt_str(obj, "name");
    let args = obj.get("input").map(Value::to_string);
    if name.is_none() && args.is_none() {
        return None;
    }
    let mut out = StreamDelta {
        kind: Some(DeltaKind::ToolCall),
        tool_call: Some(ToolCallDelta {
            index: 0,
            id: opt_str(obj, "id"),
            name,
            args,
        }),
        ..Default::default()
    };
    out.session = session_from(obj);
    out.into_option()
}

fn handle_step_finish(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let usage_obj = obj.get("usage").and_then(Value::as_object);
    let input = usage_obj.map(|usage| u64_or_zero(usage, "input")).unwrap_or(0);
    let output = usage_obj.map(|usage| u64_or_zero(usage, "output")).unwrap_or(0);
    if input == 0 && output == 0 {
        return None;
    }

    let mut out = StreamDelta {
        kind: Some(DeltaKind::Usage),
        usage: Some(UsageDelta {
            input,
            output,
            ..Default::default()
        }),
        cost: opt_f64(obj, "cost"),
        git_snapshot: opt_str(obj, "git_snapshot"),
        stop_reason: opt_str(obj, "stop_reason"),
        ..Default::default()
    };
    out.session = session_from(obj);
    out.into_option()
}
