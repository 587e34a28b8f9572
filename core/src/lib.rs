//! Normalizes incremental streaming events from eight different coding-agent
//! and LLM-provider wire formats into a single [`delta::StreamDelta`] shape,
//! and extracts inline delimited reasoning/diff blocks from plain-text
//! content as it streams.
//!
//! The pipeline a caller typically assembles:
//!
//! 1. [`sniffer::ProtocolSniffer`] inspects transport-level hints (HTTP
//!    headers, first-byte shape) to pick an SSE framing strategy.
//! 2. [`registry::ParserRegistry`] dispatches a raw JSON payload, keyed by
//!    provider name or alias, to the adapter in [`adapters`] that knows that
//!    dialect's event shapes.
//! 3. [`tag_extractor::TagExtractor`] optionally post-processes an adapter's
//!    `content` text to pull out `<think>`-style inline blocks.
//! 4. [`agentstream_commons::redact`] scrubs secrets from anything destined
//!    for a log sink.

pub mod adapters;
pub mod delta;
pub mod error;
pub mod registry;
pub mod sniffer;
pub mod tag_extractor;

pub use delta::{
    DeltaKind, ExtractedField, SessionDelta, StreamDelta, TimingDelta, ToolCallDelta, UsageDelta,
};
pub use error::{TagExtractorError, ValidationError};
pub use registry::{default_registry, Adapter, ParserRegistry};
pub use sniffer::{HeaderMap, Protocol, ProtocolSniffer};
pub use tag_extractor::{TagExtractor, TagExtractorConfig};
