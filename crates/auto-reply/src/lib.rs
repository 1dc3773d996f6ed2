//! Reply normalization and dispatch queues — the glue between the agent
//! side and channel delivery.
//!
//! Flow: raw agent reply → token policy (silent/heartbeat) → meta-commentary
//! extraction → user-facing sanitization → directive parsing → prefix
//! templating → normalized payload, or a suppressed outcome with a
//! machine-readable reason. Delivery itself runs through per-lane,
//! concurrency-bounded command queues with per-session follow-up queues.

pub mod directives;
pub mod heartbeat;
pub mod prefix;
pub mod queue;
pub mod reply;
pub mod sanitize;
pub mod tokens;

pub use {
    reply::{NormalizeOptions, NormalizeOutcome, SkipReason, normalize_reply_payload},
    sanitize::extract_reply_from_meta_commentary,
    tokens::{HEARTBEAT_TOKEN, SILENT_REPLY_TOKEN},
};
