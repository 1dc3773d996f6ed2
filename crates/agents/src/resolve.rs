use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use crate::{Result, model::LlmProvider};

// ── Model references ────────────────────────────────────────────────────────

/// A provider/model pair parsed from a reference string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub provider: String,
    pub model: String,
}

impl ModelRef {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

/// Parse a model reference string into a provider/model pair.
///
/// `"anthropic/claude-haiku-4-5-20251001"` splits on the first `/`; a bare
/// model id like `"gpt-4o-mini"` gets `default_provider`. Empty or
/// slash-only input yields `None`.
pub fn parse_model_ref(raw: &str, default_provider: &str) -> Option<ModelRef> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.split_once('/') {
        Some((provider, model)) => {
            let provider = provider.trim();
            let model = model.trim();
            if provider.is_empty() || model.is_empty() {
                return None;
            }
            Some(ModelRef::new(provider, model))
        },
        None => {
            if default_provider.trim().is_empty() {
                return None;
            }
            Some(ModelRef::new(default_provider.trim(), raw))
        },
    }
}

// ── Alias index ─────────────────────────────────────────────────────────────

/// Human-readable aliases resolved to canonical provider/model pairs.
///
/// Lookups are case-insensitive. Built from config
/// (`agents.aliases`) at startup.
#[derive(Debug, Clone, Default)]
pub struct ModelAliasIndex {
    aliases: HashMap<String, ModelRef>,
}

impl ModelAliasIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from `alias -> reference string` config entries.
    /// Entries that don't parse are skipped with a warning.
    pub fn from_config(entries: &HashMap<String, String>, default_provider: &str) -> Self {
        let mut index = Self::new();
        for (alias, raw) in entries {
            match parse_model_ref(raw, default_provider) {
                Some(model_ref) => index.insert(alias, model_ref),
                None => {
                    tracing::warn!(alias = %alias, raw = %raw, "skipping unparseable model alias");
                },
            }
        }
        index
    }

    pub fn insert(&mut self, alias: impl AsRef<str>, model_ref: ModelRef) {
        self.aliases
            .insert(alias.as_ref().to_lowercase(), model_ref);
    }

    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&ModelRef> {
        self.aliases.get(&alias.trim().to_lowercase())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Resolve a raw reference string to a provider/model pair: alias lookup
/// first, then plain `provider/model` parsing.
pub fn resolve_model_ref_from_string(
    raw: &str,
    default_provider: &str,
    aliases: &ModelAliasIndex,
) -> Option<ModelRef> {
    if let Some(model_ref) = aliases.get(raw) {
        return Some(model_ref.clone());
    }
    parse_model_ref(raw, default_provider)
}

// ── Resolver trait ──────────────────────────────────────────────────────────

/// Turns a parsed model reference into a usable provider handle.
///
/// Implemented by the provider registry outside this pipeline; injected so
/// the router can be tested with a stub.
#[async_trait]
pub trait ModelResolver: Send + Sync {
    async fn resolve(&self, model_ref: &ModelRef) -> Result<Arc<dyn LlmProvider>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_slash_model() {
        let model_ref = parse_model_ref("anthropic/claude-haiku-4-5-20251001", "openai").unwrap();
        assert_eq!(model_ref.provider, "anthropic");
        assert_eq!(model_ref.model, "claude-haiku-4-5-20251001");
    }

    #[test]
    fn bare_model_uses_default_provider() {
        let model_ref = parse_model_ref("gpt-4o-mini", "openai").unwrap();
        assert_eq!(model_ref.provider, "openai");
        assert_eq!(model_ref.model, "gpt-4o-mini");
    }

    #[test]
    fn empty_and_slash_only_are_rejected() {
        assert!(parse_model_ref("", "openai").is_none());
        assert!(parse_model_ref("   ", "openai").is_none());
        assert!(parse_model_ref("/", "openai").is_none());
        assert!(parse_model_ref("anthropic/", "openai").is_none());
    }

    #[test]
    fn alias_lookup_is_case_insensitive() {
        let mut index = ModelAliasIndex::new();
        index.insert("Fast", ModelRef::new("anthropic", "claude-haiku-4-5-20251001"));
        assert!(index.get("fast").is_some());
        assert!(index.get(" FAST ").is_some());
        assert!(index.get("slow").is_none());
    }

    #[test]
    fn alias_wins_over_plain_parse() {
        let mut index = ModelAliasIndex::new();
        index.insert("gpt-4o-mini", ModelRef::new("azure", "gpt-4o-mini-deployment"));
        let model_ref = resolve_model_ref_from_string("gpt-4o-mini", "openai", &index).unwrap();
        assert_eq!(model_ref.provider, "azure");
    }

    #[test]
    fn from_config_skips_bad_entries() {
        let mut entries = HashMap::new();
        entries.insert("fast".to_string(), "anthropic/claude-haiku-4-5-20251001".to_string());
        entries.insert("broken".to_string(), "/".to_string());
        let index = ModelAliasIndex::from_config(&entries, "anthropic");
        assert!(index.get("fast").is_some());
        assert!(index.get("broken").is_none());
    }
}
