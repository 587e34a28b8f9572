//! Cline's `say`-tagged event stream. Usage and tool data for a couple of
//! subtypes arrive as JSON embedded inside a string `text` field rather
//! than as nested objects.

use serde_json::{Map, Value};

use crate::adapters::{debug_unknown_event, opt_f64, opt_str, require_object, require_str, u64_or_zero, warn_invalid};
use crate::delta::{DeltaKind, StreamDelta, ToolCallDelta, UsageDelta};
use crate::error::ValidationError;

const PROVIDER: &str = "cline";

/// Normalizes Cline `say` events into [`StreamDelta`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClineAdapter;

impl ClineAdapter {
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
        if event_type != "say" {
            debug_unknown_event(PROVIDER, event_type);
            return None;
        }

        let subtype = match require_str(obj, PROVIDER, "say") {
            Ok(subtype) => subtype,
            Err(err) => {
                warn_invalid(&err);
                return None;
            }
        };

        match subtype {
            "api_req_started" | "api_req_finished" => handle_api_req(obj, subtype),
            "text" => opt_str(obj, "text").map(StreamDelta::content),
            "tool" => handle_tool(obj, subtype),
            other => {
                debug_unknown_event(PROVIDER, other);
                None
            }
        }
    }
}

fn parse_embedded(obj: &Map<String, Value>, subtype: &str) -> Option<Value> {
    let text = opt_str(obj, "text")?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            warn_invalid(&ValidationError::EmbeddedJsonParseFailure {
                subtype: subtype.to_owned(),
                message: err.to_string(),
            });
            None
        }
    }
}

fn handle_api_req(obj: &Map<String, Value>, subtype: &str) -> Option<StreamDelta> {
    let embedded = parse_embedded(obj, subtype)?;
    let embedded = embedded.as_object()?;

    let input = u64_or_zero(embedded, "tokensIn");
    let output = u64_or_zero(embedded, "tokensOut");
    if input == 0 && output == 0 {
        return None;
    }

    Some(StreamDelta {
        kind: Some(DeltaKind::Usage),
        usage: Some(UsageDelta {
            input,
            output,
            cache_read: u64_or_zero(embedded, "cacheReads"),
            cache_write: u64_or_zero(embedded, "cacheWrites"),
            ..Default::default()
        }),
        cost: opt_f64(embedded, "cost"),
        ..Default::default()
    })
}

fn handle_tool(obj: &Map<String, Value>, subtype: &str) -> Option<StreamDelta> {
    let embedded = parse_embedded(obj, subtype)?;
    let name = embedded.as_object().and_then(|e| opt_str(e, "tool"));
    Some(StreamDelta {
        kind: Some(DeltaKind::ToolCall),
        tool_call: Some(ToolCallDelta {
            index: 0,
            id: None,
            name,
            args: Some(embedded.to_string()),
        }),
        ..Default::default()
    })
}
