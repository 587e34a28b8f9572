//! Error taxonomy for the streaming pipeline.
//!
//! Only [`TagExtractorError`] ever surfaces as a `Result::Err` to a caller.
//! Schema/validation failures ([`ValidationError`]) are logged and mapped
//! to `None` by the adapter that produced them; they never propagate as
//! exceptions, matching the `LLMError`-style struct-variant errors used
//! throughout the provider adapters this crate is modeled on.

use thiserror::Error;

/// Fatal for the stream that raised it: the caller must not reuse the
/// [`crate::tag_extractor::TagExtractor`] instance afterward.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TagExtractorError {
    #[error(
        "tag extractor buffer overflow: {attempted} bytes would exceed the {limit} byte bound"
    )]
    BufferOverflow { attempted: usize, limit: usize },
}

/// Reasons a provider's schema validation rejected a raw payload. Adapters
/// collapse every variant to `None`; this type exists so a host can log a
/// structured warning rather than a bare string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("payload for provider `{provider}` failed schema validation: {message}")]
    MalformedPayload {
        provider: &'static str,
        message: String,
    },

    #[error("payload for provider `{provider}` is not a JSON object")]
    NotAnObject { provider: &'static str },

    #[error("payload for provider `{provider}` is missing required field `{field}`")]
    MissingField {
        provider: &'static str,
        field: &'static str,
    },

    #[error("payload for provider `{provider}` has unrecognized event type `{event_type}`")]
    UnknownEventType {
        provider: &'static str,
        event_type: String,
    },

    #[error("embedded JSON in Cline `{subtype}` event failed to parse: {message}")]
    EmbeddedJsonParseFailure { subtype: String, message: String },
}
