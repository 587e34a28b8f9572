//! Advisory protocol detection from transport headers and the shape of a
//! single decoded payload. Stateless; the caller may always override its
//! verdict and force a specific adapter.

use std::collections::HashMap;

use serde_json::Value;

/// Case-insensitive header map. Keys are normalized to lowercase on
/// insertion and lookup.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap(HashMap<String, String>);

impl HeaderMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into().to_lowercase(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_lowercase()).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(&key.to_lowercase())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (key, value) in iter {
            headers.insert(key, value);
        }
        headers
    }
}

/// The wire dialect a chunk appears to belong to, as distinguished by
/// transport and payload shape alone (not a provider name; `openai` here
/// also matches xAI and any other OpenAI-compatible wire format).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Openai,
    Anthropic,
    Unknown,
}

/// Classifies a decoded chunk against the two known wire shapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolSniffer;

impl ProtocolSniffer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn sniff(&self, headers: &HeaderMap, first_chunk: &Value) -> Protocol {
        if headers.contains("anthropic-version") {
            return Protocol::Anthropic;
        }

        if let Some(obj) = first_chunk.as_object() {
            if let Some(event_type) = obj.get("type").and_then(Value::as_str) {
                if event_type == "message_start" || event_type == "content_block_delta" {
                    return Protocol::Anthropic;
                }
            }
            if obj.get("object").and_then(Value::as_str) == Some("chat.completion.chunk") {
                return Protocol::Openai;
            }
        }

        Protocol::Unknown
    }
}
