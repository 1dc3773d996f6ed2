use shoal_common::ReplyPayload;

/// Parser for platform-specific inline directives embedded in reply text
/// (quick replies, location pins, confirmation prompts, button rows).
///
/// The marker syntax and the structured fields it produces belong to the
/// channel adapter; the normalizer only detects-and-delegates. Parsing moves
/// directive content into `channel_data` and reduces `text` to the
/// remaining prose.
pub trait DirectiveParser: Send + Sync {
    /// Cheap check whether `text` contains any directive markers.
    fn has_directives(&self, text: &str) -> bool;

    /// Extract directives out of the payload text into structured fields.
    fn parse(&self, payload: ReplyPayload) -> ReplyPayload;
}

/// Default parser for channels without inline directives: detects nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDirectiveParser;

impl DirectiveParser for NoopDirectiveParser {
    fn has_directives(&self, _text: &str) -> bool {
        false
    }

    fn parse(&self, payload: ReplyPayload) -> ReplyPayload {
        payload
    }
}
