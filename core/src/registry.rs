//! Dispatches a provider name (or alias) and a raw payload to the adapter
//! that knows that dialect's event shapes.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::Value;

use crate::adapters::{
    AnthropicAdapter, ClaudeCodeAdapter, ClineAdapter, CodexAdapter, GeminiAdapter,
    OpenAiAdapter, OpenCodeAdapter, XaiAdapter,
};
use crate::delta::StreamDelta;

/// A closed sum type over the eight supported provider dialects. The
/// adapter set is fixed (§4.4 enumerates exactly eight), so this is a
/// `match`-dispatched enum rather than a `dyn` trait object layer.
#[derive(Debug, Clone)]
pub enum Adapter {
    Anthropic(AnthropicAdapter),
    OpenAi(OpenAiAdapter),
    Xai(XaiAdapter),
    ClaudeCode(ClaudeCodeAdapter),
    Codex(CodexAdapter),
    Cline(ClineAdapter),
    Gemini(GeminiAdapter),
    OpenCode(OpenCodeAdapter),
}

impl Adapter {
    #[must_use]
    pub fn parse(&self, payload: &Value) -> Option<StreamDelta> {
        match self {
            Adapter::Anthropic(adapter) => adapter.parse(payload),
            Adapter::OpenAi(adapter) => adapter.parse(payload),
            Adapter::Xai(adapter) => adapter.parse(payload),
            Adapter::ClaudeCode(adapter) => adapter.parse(payload),
            Adapter::Codex(adapter) => adapter.parse(payload),
            Adapter::Cline(adapter) => adapter.parse(payload),
            Adapter::Gemini(adapter) => adapter.parse(payload),
            Adapter::OpenCode(adapter) => adapter.parse(payload),
        }
    }
}

/// Maps canonical provider names and case-insensitive aliases to adapters.
///
/// Both maps are populated at construction and read-only thereafter;
/// mutation (`register`/`register_alias`) requires `&mut self` and is not
/// internally synchronized — a registry shared after publication must be
/// externally locked by the host if it is mutated again.
#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    providers: HashMap<String, Adapter>,
    aliases: HashMap<String, String>,
}

impl ParserRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, adapter: Adapter) {
        self.providers.insert(name.into().to_lowercase(), adapter);
    }

    pub fn register_alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.aliases
            .insert(alias.into().to_lowercase(), target.into().to_lowercase());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Adapter> {
        let lower = key.to_lowercase();
        let canonical = self.aliases.get(&lower).map_or(lower.as_str(), String::as_str);
        self.providers.get(canonical)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        let lower = key.to_lowercase();
        self.get(key).is_some() || self.aliases.contains_key(&lower)
    }

    /// Canonical provider names only, excluding aliases.
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Alias names only, excluding canonical provider names.
    pub fn alias_names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    #[tracing::instrument(skip(self, payload), fields(provider = key))]
    #[must_use]
    pub fn parse(&self, key: &str, payload: &Value) -> Option<StreamDelta> {
        self.get(key)?.parse(payload)
    }

    /// Builds a registry with all eight adapters and the documented
    /// aliases registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register("anthropic", Adapter::Anthropic(AnthropicAdapter::new()));
        registry.register("openai", Adapter::OpenAi(OpenAiAdapter::new()));
        registry.register("xai", Adapter::Xai(XaiAdapter::new()));
        registry.register("claude_code", Adapter::ClaudeCode(ClaudeCodeAdapter::new()));
        registry.register("codex", Adapter::Codex(CodexAdapter::new()));
        registry.register("cline", Adapter::Cline(ClineAdapter::new()));
        registry.register("gemini", Adapter::Gemini(GeminiAdapter::new()));
        registry.register("opencode", Adapter::OpenCode(OpenCodeAdapter::new()));

        registry.register_alias("gpt", "openai");
        registry.register_alias("gpt-4", "openai");
        registry.register_alias("gpt-3.5", "openai");
        registry.register_alias("gpt4", "openai");
        registry.register_alias("claude", "anthropic");
        registry.register_alias("claude-code", "claude_code");
        registry.register_alias("grok", "xai");
        registry.register_alias("grok-3", "xai");

        registry
    }
}

/// A process-wide default registry, constructed lazily exactly once,
/// matching `vtcode-commons/src/sanitizer.rs`'s pattern for compiled
/// regexes rather than an ambient mutable global.
static DEFAULT_REGISTRY: LazyLock<ParserRegistry> = LazyLock::new(ParserRegistry::with_defaults);

/// Returns the process-wide default registry.
#[must_use]
pub fn default_registry() -> &'static ParserRegistry {
    &DEFAULT_REGISTRY
}
