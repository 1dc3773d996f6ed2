//! Reserved reply tokens shared between the agent side and the normalizer.

/// Reserved marker meaning "produce no visible text for this turn".
pub const SILENT_REPLY_TOKEN: &str = "NO_REPLY";

/// Reserved marker used by the reply side to signal liveness. Stripped from
/// user-visible text before delivery.
pub const HEARTBEAT_TOKEN: &str = "HEARTBEAT_OK";

/// Exact semantic match against the silent token: trimmed and
/// case-insensitive, never a substring check.
#[must_use]
pub fn is_silent_reply_text(text: &str, token: &str) -> bool {
    text.trim().eq_ignore_ascii_case(token.trim())
}
