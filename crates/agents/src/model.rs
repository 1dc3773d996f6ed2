use async_trait::async_trait;

// ── Typed chat messages ─────────────────────────────────────────────────────

/// Typed chat message for the LLM provider interface.
///
/// The classifier path only ever sends a system instruction plus one user
/// turn, so this deliberately carries no assistant/tool variants — metadata
/// from persisted transcripts can never leak into a classification request.
#[derive(Debug, Clone)]
pub enum ChatMessage {
    System { content: String },
    User { content: String },
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }
}

// ── Completion request/response ─────────────────────────────────────────────

/// Sampling knobs for one completion call.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Response from an LLM completion call.
#[derive(Debug)]
pub struct CompletionResponse {
    pub text: Option<String>,
    pub usage: Usage,
}

#[derive(Debug, Clone, Default)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

// ── Provider trait ──────────────────────────────────────────────────────────

/// LLM provider handle (Anthropic, OpenAI, a local runtime, etc.).
///
/// Object-safe so call sites can hold `Arc<dyn LlmProvider>` resolved at
/// runtime from a model reference string.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Model identifier (e.g. "claude-haiku-4-5-20251001").
    fn id(&self) -> &str;

    async fn complete(
        &self,
        messages: &[ChatMessage],
        opts: &CompletionOptions,
    ) -> anyhow::Result<CompletionResponse>;
}
