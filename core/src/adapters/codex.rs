//! Codex CLI's thread/turn/item event vocabulary.

use serde_json::{Map, Value};

use crate::adapters::{debug_unknown_event, opt_str, opt_u64, require_object, require_str, u64_or_zero, warn_invalid};
use crate::delta::{DeltaKind, SessionDelta, StreamDelta, ToolCallDelta, UsageDelta};

const PROVIDER: &str = "codex";

/// Normalizes Codex CLI stream events into [`StreamDelta`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CodexAdapter;

impl CodexAdapter {
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
            "thread.started" => handle_thread_started(obj),
            "item.completed" => handle_item_completed(obj),
            "turn.completed" => handle_turn_completed(obj),
            "turn.started" | "item.started" => None,
            other => {
                debug_unknown_event(PROVIDER, other);
                None
            }
        }
    }
}

fn handle_thread_started(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let thread_id = opt_str(obj, "thread_id")?;
    Some(StreamDelta {
        kind: Some(DeltaKind::Content),
        content: Some("Thread started".to_owned()),
        session: Some(SessionDelta {
            thread_id: Some(thread_id),
            ..Default::default()
        }),
        ..Default::default()
    })
}

fn handle_item_completed(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let item = obj.get("item")?.as_object()?;
    match item.get("type").and_then(Value::as_str)? {
        "agent_message" => Some(StreamDelta {
            kind: Some(DeltaKind::Content),
            role: Some("assistant".to_owned()),
            content: Some(opt_str(item, "text")?),
            ..Default::default()
        }),
        "reasoning" => Some(StreamDelta {
            kind: Some(DeltaKind::Thought),
            thought: Some(opt_str(item, "text")?),
            ..Default::default()
        }),
        "command_execution" => handle_command_execution(item),
        _ => None,
    }
}

fn handle_command_execution(item: &Map<String, Value>) -> Option<StreamDelta> {
    let command = opt_str(item, "command").unwrap_or_default();
    let status = opt_str(item, "status").unwrap_or_default();

    if status == "completed" {
        let exit_code = opt_u64(item, "exit_code").unwrap_or(0);
        let output = opt_str(item, "aggregated_output").unwrap_or_default();
        Some(StreamDelta::content(format!(
            "[Command: {command}]\nExit: {exit_code}\n{output}"
        )))
    } else {
        Some(StreamDelta {
            kind: Some(DeltaKind::ToolCall),
            tool_call: Some(ToolCallDelta {
                index: 0,
                id: None,
                name: Some("shell".to_owned()),
                args: Some(command),
            }),
            ..Default::default()
        })
    }
}

fn handle_turn_completed(obj: &Map<String, Value>) -> Option<StreamDelta> {
    let usage = obj.get("usage")?.as_object()?;
    Some(StreamDelta {
        kind: Some(DeltaKind::Usage),
        usage: Some(UsageDelta {
            input: u64_or_zero(usage, "input_tokens"),
            output: u64_or_zero(usage, "output_tokens"),
            cache_read: u64_or_zero(usage, "cached_input_tokens"),
            ..Default::default()
        }),
        ..Default::default()
    })
}
