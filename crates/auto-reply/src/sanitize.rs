use {once_cell::sync::Lazy, regex::Regex};

/// "Here is the response:" (or similar) on its own line.
static HERE_IS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)here is (?:the )?response:\s*$")
        .unwrap_or_else(|e| panic!("bad label pattern: {e}"))
});

/// Opening triple-backtick fence, optional language tag.
static OPEN_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*```[^\n]*\n").unwrap_or_else(|e| panic!("bad fence pattern: {e}"))
});

/// Opening single-backtick fence on its own line.
static OPEN_TICK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*`[ \t]*\n").unwrap_or_else(|e| panic!("bad tick pattern: {e}"))
});

/// The entire text is exactly one triple-backtick block.
static WHOLE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[^\n]*\n(.*?)```\s*$").unwrap_or_else(|e| panic!("bad block pattern: {e}"))
});

/// When the model wraps its reply in meta-commentary (e.g. "Based on...
/// Here is the response:\n```\nHi!\n```"), extract only the inner reply so
/// the preamble and code fence are not sent to the user.
///
/// Idempotent: re-applying to its own output is a no-op. All extraction
/// failures fall through to the next strategy or return the input unchanged.
#[must_use]
pub fn extract_reply_from_meta_commentary(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return text.to_string();
    }

    // Label followed by a fenced block → use the content inside the fence.
    if let Some(label) = HERE_IS_LABEL.find(trimmed) {
        let after_label = &trimmed[label.end()..];
        if let Some(extracted) = unwrap_fence(after_label, &OPEN_FENCE, "\n```") {
            return extracted;
        }
        if let Some(extracted) = unwrap_fence(after_label, &OPEN_TICK, "\n`") {
            return extracted;
        }
    }

    // Whole reply is a single code block → unwrap.
    if let Some(captures) = WHOLE_BLOCK.captures(trimmed) {
        if let Some(inner) = captures.get(1) {
            let inner = inner.as_str().trim();
            if !inner.is_empty() {
                return inner.to_string();
            }
        }
    }

    // Structured envelope (e.g. type/text/conversation_label) → use `text`.
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
            if let Some(inner) = value.get("text").and_then(|v| v.as_str()) {
                let inner = inner.trim();
                if !inner.is_empty() {
                    return inner.to_string();
                }
            }
        }
    }

    text.to_string()
}

/// Content between an opening fence matched at the start of `after_label`
/// and the first closing fence, or the rest of the text when unclosed.
fn unwrap_fence(after_label: &str, open: &Regex, close: &str) -> Option<String> {
    let open_match = open.find(after_label)?;
    if open_match.start() != 0 {
        return None;
    }
    let rest = &after_label[open_match.end()..];
    let inner = match rest.find(close) {
        Some(idx) => &rest[..idx],
        None => rest,
    };
    let extracted = inner.trim_end();
    if extracted.is_empty() {
        None
    } else {
        Some(extracted.to_string())
    }
}

// ── User-facing content sanitization (collaborator) ─────────────────────────

/// Makes raw reply text safe for end-user display. The policy (secret
/// scrubbing, internal path removal, error shaping) lives with the host
/// application; the normalizer only threads text through it.
pub trait ContentSanitizer: Send + Sync {
    fn sanitize_user_facing(&self, text: &str, error_context: bool) -> String;
}

/// Default sanitizer: returns the text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughSanitizer;

impl ContentSanitizer for PassthroughSanitizer {
    fn sanitize_user_facing(&self, text: &str, _error_context: bool) -> String {
        text.to_string()
    }
}
