use {
    crate::{
        directives::DirectiveParser,
        heartbeat::strip_heartbeat_for_message,
        prefix::{ResponsePrefixContext, resolve_response_prefix_template},
        sanitize::{ContentSanitizer, extract_reply_from_meta_commentary},
        tokens::{HEARTBEAT_TOKEN, SILENT_REPLY_TOKEN, is_silent_reply_text},
    },
    serde::Serialize,
    shoal_common::ReplyPayload,
};

/// Why the normalizer decided a payload must not be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    Empty,
    Silent,
    Heartbeat,
}

/// Outcome of normalizing one reply payload.
///
/// Suppression is a first-class result, not an error: the caller simply
/// sends nothing and may record the reason.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeOutcome {
    Delivered {
        payload: ReplyPayload,
        /// True when a heartbeat token was removed from the text.
        heartbeat_stripped: bool,
    },
    Suppressed { reason: SkipReason },
}

impl NormalizeOutcome {
    /// The payload to deliver, when not suppressed.
    #[must_use]
    pub fn payload(&self) -> Option<&ReplyPayload> {
        match self {
            Self::Delivered { payload, .. } => Some(payload),
            Self::Suppressed { .. } => None,
        }
    }

    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed { .. })
    }
}

/// Knobs for one normalization pass. Collaborators are injected so the
/// normalizer stays free of platform and policy coupling.
#[derive(Clone, Copy)]
pub struct NormalizeOptions<'a> {
    pub response_prefix: Option<&'a str>,
    /// When set, template variables in the prefix are interpolated.
    pub prefix_context: Option<&'a ResponsePrefixContext>,
    /// Strip the heartbeat token from outbound text. On by default; off only
    /// for channels that deliver raw transcripts.
    pub strip_heartbeat: bool,
    pub silent_token: Option<&'a str>,
    pub content_sanitizer: Option<&'a dyn ContentSanitizer>,
    pub directive_parser: Option<&'a dyn DirectiveParser>,
}

impl Default for NormalizeOptions<'_> {
    fn default() -> Self {
        Self {
            response_prefix: None,
            prefix_context: None,
            strip_heartbeat: true,
            silent_token: None,
            content_sanitizer: None,
            directive_parser: None,
        }
    }
}

/// Normalize a raw reply payload for delivery.
///
/// Applies, in order: empty suppression, silent-token policy, heartbeat
/// stripping, meta-commentary extraction, user-facing sanitization,
/// directive parsing, and prefix templating. Pure transform — the only
/// observable effects are in the returned outcome.
#[must_use]
pub fn normalize_reply_payload(
    payload: ReplyPayload,
    opts: &NormalizeOptions<'_>,
) -> NormalizeOutcome {
    let has_media = payload.has_media();
    let has_channel_data = payload.has_channel_data();
    let originally_blank = payload
        .text
        .as_deref()
        .is_none_or(|t| t.trim().is_empty());
    if originally_blank && !has_media && !has_channel_data {
        return NormalizeOutcome::Suppressed {
            reason: SkipReason::Empty,
        };
    }

    let silent_token = opts.silent_token.unwrap_or(SILENT_REPLY_TOKEN);
    let mut text = payload.text.clone();
    if let Some(t) = text.as_deref() {
        if !t.is_empty() && is_silent_reply_text(t, silent_token) {
            if !has_media && !has_channel_data {
                return NormalizeOutcome::Suppressed {
                    reason: SkipReason::Silent,
                };
            }
            text = Some(String::new());
        }
    }
    // Keep empty text when media exists so media-only replies still send.
    if text.as_deref().is_some_and(|t| !t.is_empty()) && originally_blank {
        text = Some(String::new());
    }

    let mut heartbeat_stripped = false;
    if opts.strip_heartbeat
        && text
            .as_deref()
            .is_some_and(|t| t.contains(HEARTBEAT_TOKEN))
    {
        let stripped = strip_heartbeat_for_message(text.as_deref().unwrap_or_default());
        if stripped.did_strip {
            heartbeat_stripped = true;
        }
        if stripped.should_skip && !has_media && !has_channel_data {
            return NormalizeOutcome::Suppressed {
                reason: SkipReason::Heartbeat,
            };
        }
        text = Some(stripped.text);
    }

    if let Some(t) = text.as_deref().filter(|t| !t.is_empty()) {
        let extracted = extract_reply_from_meta_commentary(t);
        text = Some(match opts.content_sanitizer {
            Some(sanitizer) => sanitizer.sanitize_user_facing(&extracted, payload.is_error),
            None => extracted,
        });
    }

    if text.as_deref().is_none_or(|t| t.trim().is_empty()) && !has_media && !has_channel_data {
        return NormalizeOutcome::Suppressed {
            reason: SkipReason::Empty,
        };
    }

    // Platform inline directives → structured payload fields + remaining prose.
    let mut enriched = ReplyPayload { text, ..payload };
    if let Some(parser) = opts.directive_parser {
        if enriched
            .text
            .as_deref()
            .is_some_and(|t| parser.has_directives(t))
        {
            enriched = parser.parse(enriched);
        }
    }

    let effective_prefix = match opts.prefix_context {
        Some(ctx) => resolve_response_prefix_template(opts.response_prefix, ctx),
        None => opts.response_prefix.map(str::to_string),
    };

    if let Some(prefix) = effective_prefix.filter(|p| !p.is_empty()) {
        if let Some(t) = enriched.text.as_deref() {
            if !t.is_empty() && t.trim() != HEARTBEAT_TOKEN && !t.starts_with(&prefix) {
                enriched.text = Some(format!("{prefix} {t}"));
            }
        }
    }

    NormalizeOutcome::Delivered {
        payload: enriched,
        heartbeat_stripped,
    }
}
