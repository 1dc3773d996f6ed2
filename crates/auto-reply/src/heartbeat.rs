use crate::tokens::HEARTBEAT_TOKEN;

/// Result of stripping the heartbeat token from outbound text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatStrip {
    /// Text with token occurrences removed (message mode: surrounding text
    /// is preserved, edges trimmed).
    pub text: String,
    /// True when at least one token occurrence was removed.
    pub did_strip: bool,
    /// True when nothing user-visible remains and the message should not be
    /// sent at all.
    pub should_skip: bool,
}

/// Strip the heartbeat token under message-mode semantics: remove the token
/// occurrences only, keep the rest of the text.
#[must_use]
pub fn strip_heartbeat_for_message(text: &str) -> HeartbeatStrip {
    if !text.contains(HEARTBEAT_TOKEN) {
        return HeartbeatStrip {
            text: text.to_string(),
            did_strip: false,
            should_skip: false,
        };
    }
    let stripped = text.replace(HEARTBEAT_TOKEN, "");
    let trimmed = stripped.trim();
    HeartbeatStrip {
        should_skip: trimmed.is_empty(),
        text: trimmed.to_string(),
        did_strip: true,
    }
}
