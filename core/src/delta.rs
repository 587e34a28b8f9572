//! The normalized incremental event type emitted by every provider adapter
//! and by the [`crate::tag_extractor::TagExtractor`].

use serde::{Deserialize, Serialize};

/// Discriminates the kind of information a [`StreamDelta`] carries, when an
/// adapter is able to classify it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaKind {
    Content,
    Thought,
    ToolCall,
    Usage,
    Stop,
}

/// Which [`StreamDelta`] field a [`crate::tag_extractor::TagExtractor`]
/// should route its extracted block into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractedField {
    Thought,
    Diff,
}

/// A partial tool invocation. `args` is an unterminated JSON fragment;
/// callers reconstruct the whole by concatenating fragments sharing the
/// same `index` in delta-arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
}

impl ToolCallDelta {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }
}

/// Token accounting for a single delta. Individual counters default to zero
/// when an adapter's event reports usage but omits a particular field;
/// `total` is only populated when the source event reports it directly
/// (some providers never sum input+output themselves).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDelta {
    #[serde(default)]
    pub input: u64,
    #[serde(default)]
    pub output: u64,
    #[serde(default)]
    pub reasoning: u64,
    #[serde(default)]
    pub cache_read: u64,
    #[serde(default)]
    pub cache_write: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl UsageDelta {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.input == 0
            && self.output == 0
            && self.reasoning == 0
            && self.cache_read == 0
            && self.cache_write == 0
            && self.total.unwrap_or(0) == 0
    }
}

/// Wall-clock timing for a delta's underlying event, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

/// Session/thread identifiers correlating a delta with the conversation it
/// belongs to. Providers populate whichever subset they track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl SessionDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.message_id.is_none()
            && self.part_id.is_none()
            && self.thread_id.is_none()
    }

    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// The single normalized incremental event type. All fields are optional;
/// every [`StreamDelta`] returned to a caller has at least one populated
/// field (adapters and the extractor collapse all-empty results to `None`
/// rather than returning an empty delta).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<DeltaKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCallDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_snapshot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

impl StreamDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.role.is_none()
            && self.content.is_none()
            && self.thought.is_none()
            && self.diff.is_none()
            && self.diff_file.is_none()
            && self.tool_call.is_none()
            && self.usage.is_none()
            && self.cost.is_none()
            && self.timing.is_none()
            && self.session.as_ref().is_none_or(SessionDelta::is_empty)
            && self.model.is_none()
            && self.git_snapshot.is_none()
            && self.stop_reason.is_none()
    }

    /// Collapses an all-empty delta to `None`, matching the "a delta with
    /// zero populated fields is collapsed to `None`" rule every adapter and
    /// the tag extractor follow.
    #[must_use]
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }

    #[must_use]
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            kind: Some(DeltaKind::Content),
            content: Some(text.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}
