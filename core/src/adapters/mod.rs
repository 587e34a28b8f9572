//! One module per provider dialect. Each exposes a zero-sized (or
//! near-zero-sized) adapter struct with a single `parse` method:
//! `fn parse(&self, payload: &serde_json::Value) -> Option<StreamDelta>`.
//!
//! Validation failures and unrecognized event types both collapse to
//! `None` here — only [`crate::error::TagExtractorError`] ever surfaces as
//! an `Err` anywhere in this crate.

pub mod anthropic;
pub mod claude_code;
pub mod cline;
pub mod codex;
pub mod gemini;
pub mod opencode;
pub mod openai;
pub mod xai;

pub use anthropic::AnthropicAdapter;
pub use claude_code::ClaudeCodeAdapter;
pub use cline::ClineAdapter;
pub use codex::CodexAdapter;
pub use gemini::GeminiAdapter;
pub use opencode::OpenCodeAdapter;
pub use openai::OpenAiAdapter;
pub use xai::XaiAdapter;

use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Borrows `payload` as a JSON object, or a [`ValidationError::NotAnObject`].
pub(crate) fn require_object<'a>(
    payload: &'a Value,
    provider: &'static str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    payload
        .as_object()
        .ok_or(ValidationError::NotAnObject { provider })
}

/// Reads a required string field, or a [`ValidationError::MissingField`].
pub(crate) fn require_str<'a>(
    obj: &'a Map<String, Value>,
    provider: &'static str,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    obj.get(field)
        .and_then(Value::as_str)
        .ok_or(ValidationError::MissingField { provider, field })
}

/// Reads an optional string field, tolerating absence or a non-string value.
pub(crate) fn opt_str(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field).and_then(Value::as_str).map(str::to_owned)
}

/// Reads an optional `u64` field, tolerating absence or a non-numeric value.
pub(crate) fn opt_u64(obj: &Map<String, Value>, field: &str) -> Option<u64> {
    obj.get(field).and_then(Value::as_u64)
}

/// Reads a `u64` field, coercing absence or a non-numeric value to zero,
/// matching the data model's "missing fields coerce to zero" rule.
pub(crate) fn u64_or_zero(obj: &Map<String, Value>, field: &str) -> u64 {
    opt_u64(obj, field).unwrap_or(0)
}

/// Reads an optional `f64` field, tolerating absence or a non-numeric value.
pub(crate) fn opt_f64(obj: &Map<String, Value>, field: &str) -> Option<f64> {
    obj.get(field).and_then(Value::as_f64)
}

/// Logs a structured warning for a validation failure. A free function
/// rather than inlined `tracing::warn!` call sites so every adapter emits
/// the same shape of event.
pub(crate) fn warn_invalid(err: &ValidationError) {
    tracing::warn!(error = %err, "adapter rejected payload during schema validation");
}

/// Logs a structured debug event for an unrecognized-but-well-formed event
/// type. Not a warning: an adapter seeing a new event-type string from a
/// provider that evolves its wire format is expected, not exceptional.
pub(crate) fn debug_unknown_event(provider: &'static str, event_type: &str) {
    tracing::debug!(provider, event_type, "adapter ignored unrecognized event type");
}
