use serde::Serialize;

use crate::classifier::ClassifyDecision;

/// Event-bus stream name for routing events.
pub const ROUTING_STREAM: &str = "routing";

/// Tier assigned to a routed request: simple = stay, complex = escalate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Simple,
    Complex,
}

/// The single observability record emitted per classified request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingEvent {
    pub run_id: String,
    pub decision: ClassifyDecision,
    pub tier: Tier,
    pub session_key: String,
    /// Provider actually in effect after routing.
    pub provider: String,
    /// Model actually in effect after routing.
    pub model: String,
    /// True iff the default provider/model was replaced by the
    /// classifier-tier model.
    pub overridden: bool,
    /// First 80 characters of the inbound body.
    pub body_preview: String,
}

/// Consumer of routing events (event bus, test collector).
pub trait RoutingEventSink: Send + Sync {
    fn emit(&self, event: RoutingEvent);
}
