//! xAI (Grok) streaming chunks: an OpenAI-compatible envelope plus a
//! vendor-specific `reasoning_content` field carrying chain-of-thought text.

use serde_json::Value;

use crate::adapters::{opt_str, OpenAiAdapter};
use crate::delta::{DeltaKind, StreamDelta};

/// Wraps [`OpenAiAdapter`] and lifts `reasoning_content` into `thought`.
#[derive(Debug, Clone, Default)]
pub struct XaiAdapter {
    openai: OpenAiAdapter,
}

impl XaiAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            openai: OpenAiAdapter::new(),
        }
    }

    #[tracing::instrument(skip(self, payload), fields(provider = "xai"))]
    #[must_use]
    pub fn parse(&self, payload: &Value) -> Option<StreamDelta> {
        let base = self.openai.parse(payload);
        let reasoning = extract_reasoning(payload);

        match (base, reasoning) {
            (Some(mut delta), Some(text)) => {
                delta.thought = Some(text);
                delta.kind = Some(DeltaKind::Thought);
                Some(delta)
            }
            (Some(delta), None) => Some(delta),
            (None, Some(text)) => Some(StreamDelta {
                kind: Some(DeltaKind::Thought),
                thought: Some(text),
                ..Default::default()
            }),
            (None, None) => None,
        }
    }
}

fn extract_reasoning(payload: &Value) -> Option<String> {
    let delta_obj = payload
        .as_object()?
        .get("choices")?
        .as_array()?
        .first()?
        .as_object()?
        .get("delta")?
        .as_object()?;
    opt_str(delta_obj, "reasoning_content")
}
