/// Config schema types (agent defaults, tiered routing, lanes, reply shaping).
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoalConfig {
    pub agents: AgentsConfig,
    pub lanes: LanesConfig,
    pub reply: ReplyConfig,
}

/// Agent configuration block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    pub defaults: AgentDefaults,
    /// Human-readable model aliases, e.g. `fast = "anthropic/claude-haiku-4-5-20251001"`.
    pub aliases: HashMap<String, String>,
}

/// Default provider/model plus tiered-routing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentDefaults {
    /// Provider assumed when a model reference has no `provider/` part.
    pub provider: String,
    /// Default model for escalated (full-agent) traffic.
    pub model: String,
    pub routing: RoutingConfig,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            provider: "anthropic".into(),
            model: "claude-sonnet-4-5-20250929".into(),
            routing: RoutingConfig::default(),
        }
    }
}

/// Tiered model routing: classify each inbound message as stay or escalate
/// and, for stay, override the provider/model with the classifier-tier model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Whether tiered routing is enabled. Defaults to false.
    pub enabled: bool,
    /// Model reference for the stay tier (e.g. "anthropic/claude-haiku-4-5-20251001").
    /// Empty means no tier model is configured and routing falls back to defaults.
    pub classifier_model: String,
    /// Use the model-backed classifier instead of the heuristic one.
    pub use_model_classifier: bool,
    /// Upper bound on one classification call. Defaults to 10s.
    pub classify_timeout_ms: u64,
    /// Upper bound on resolving the configured classifier model. Defaults to 5s.
    pub resolve_timeout_ms: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            classifier_model: String::new(),
            use_model_classifier: false,
            classify_timeout_ms: 10_000,
            resolve_timeout_ms: 5_000,
        }
    }
}

/// Per-lane concurrency caps for the command queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanesConfig {
    /// Max concurrent main-lane agent runs. Defaults to 1.
    pub main_max_concurrent: usize,
    /// Max concurrent cron runs. Defaults to 1.
    pub cron_max_concurrent: usize,
    /// Max concurrent subagent runs. Defaults to 1.
    pub subagent_max_concurrent: usize,
}

impl Default for LanesConfig {
    fn default() -> Self {
        Self {
            main_max_concurrent: 1,
            cron_max_concurrent: 1,
            subagent_max_concurrent: 1,
        }
    }
}

/// Reply-shaping settings consumed by the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    /// Prefix prepended to outbound text (supports `{model}`, `{provider}`,
    /// `{identity}` template variables).
    pub response_prefix: Option<String>,
    /// Strip the heartbeat token from outbound text. Defaults to true.
    pub strip_heartbeat: bool,
    /// Override for the silent-reply token.
    pub silent_token: Option<String>,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            response_prefix: None,
            strip_heartbeat: true,
            silent_token: None,
        }
    }
}
