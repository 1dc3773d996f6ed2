use std::{sync::Arc, time::Duration};

use {
    async_trait::async_trait,
    once_cell::sync::Lazy,
    regex::Regex,
    serde::Serialize,
    tracing::{debug, warn},
};

use {
    crate::{Error, Result, prompt::CLASSIFIER_SYSTEM_PROMPT},
    shoal_agents::{ChatMessage, CompletionOptions, LlmProvider},
};

/// Tier decision for one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifyDecision {
    /// Handle on the fast path without the full agent.
    Stay,
    /// Hand off to the full-capability agent path.
    Escalate,
}

impl ClassifyDecision {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stay => "stay",
            Self::Escalate => "escalate",
        }
    }
}

/// Classification strategy: decides stay or escalate for a message body.
///
/// Exactly one strategy is active per deployment; it is injected into the
/// router so tests can substitute a stub.
#[async_trait]
pub trait TierClassifier: Send + Sync {
    async fn classify(
        &self,
        body: &str,
        model: Option<&Arc<dyn LlmProvider>>,
    ) -> Result<ClassifyDecision>;
}

// ── Heuristic strategy ──────────────────────────────────────────────────────

/// Basic commands the fast path can always run itself.
const STAY_COMMANDS: &[&str] = &["/status", "/help", "/new", "/reset", "/verbose", "/usage"];

static ESCALATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:run|execute|exec|script|bash|shell|command line)\b",
        r"(?i)\b(?:plan|schedule|remind|set up|configure|install|orchestrat)\b",
        r"(?i)\b(?:subagent|sub-agent|specialized agent|skill|multi-step)\b",
        r"(?i)\b(?:write (?:a )?code|implement|build (?:a )?(?:small )?app)\b",
        r"(?i)/exec\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("bad escalate pattern {p}: {e}")))
    .collect()
});

static CAPABILITY_QUERY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:what can (?:you|i)|what (?:am i|do you) (?:allowed|have)|what data)\b")
        .unwrap_or_else(|e| panic!("bad capability pattern: {e}"))
});

fn is_basic_command(body: &str) -> bool {
    let t = body.trim().to_lowercase();
    STAY_COMMANDS
        .iter()
        .any(|cmd| t == *cmd || t.starts_with(&format!("{cmd} ")))
}

fn has_escalate_pattern(body: &str) -> bool {
    ESCALATE_PATTERNS.iter().any(|re| re.is_match(body))
}

/// Pattern-match classifier: no external calls, deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    fn decide(body: &str) -> ClassifyDecision {
        let body = body.trim();
        if body.is_empty() {
            return ClassifyDecision::Escalate;
        }
        if is_basic_command(body) {
            return ClassifyDecision::Stay;
        }
        if has_escalate_pattern(body) {
            return ClassifyDecision::Escalate;
        }
        // Short, likely a greeting or simple statement.
        if body.chars().count() <= 120 && !body.contains('?') {
            return ClassifyDecision::Stay;
        }
        if body.contains('?')
            && CAPABILITY_QUERY.is_match(body)
            && body.chars().count() <= 200
        {
            return ClassifyDecision::Stay;
        }
        // Default: escalate when unclear.
        ClassifyDecision::Escalate
    }
}

#[async_trait]
impl TierClassifier for HeuristicClassifier {
    async fn classify(
        &self,
        body: &str,
        _model: Option<&Arc<dyn LlmProvider>>,
    ) -> Result<ClassifyDecision> {
        Ok(Self::decide(body))
    }
}

// ── Model-backed strategy ───────────────────────────────────────────────────

/// One-call LLM classifier. Requires a resolved model handle; there is no
/// heuristic fallback when the handle is missing.
#[derive(Debug, Clone)]
pub struct ModelClassifier {
    timeout: Duration,
}

impl ModelClassifier {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[must_use]
    pub fn from_timeout_ms(timeout_ms: u64) -> Self {
        Self::new(Duration::from_millis(timeout_ms))
    }
}

#[async_trait]
impl TierClassifier for ModelClassifier {
    async fn classify(
        &self,
        body: &str,
        model: Option<&Arc<dyn LlmProvider>>,
    ) -> Result<ClassifyDecision> {
        let body = body.trim();
        if body.is_empty() {
            return Ok(ClassifyDecision::Escalate);
        }
        if is_basic_command(body) {
            return Ok(ClassifyDecision::Stay);
        }
        let Some(model) = model else {
            return Err(Error::ClassifierModelMissing);
        };

        let messages = [
            ChatMessage::system(CLASSIFIER_SYSTEM_PROMPT),
            ChatMessage::user(body),
        ];
        let opts = CompletionOptions::default().temperature(0.0).max_tokens(16);

        let response = match tokio::time::timeout(self.timeout, model.complete(&messages, &opts))
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(model = model.id(), error = %e, "classification call failed, escalating");
                return Ok(ClassifyDecision::Escalate);
            },
            Err(_) => {
                warn!(
                    model = model.id(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "classification call timed out, escalating"
                );
                return Ok(ClassifyDecision::Escalate);
            },
        };

        let raw = response.text.unwrap_or_default();
        match parse_decision(&raw) {
            Some(decision) => {
                debug!(model = model.id(), decision = decision.as_str(), "classified");
                Ok(decision)
            },
            None => {
                warn!(model = model.id(), raw = %raw, "unparseable classifier output, escalating");
                Ok(ClassifyDecision::Escalate)
            },
        }
    }
}

/// Parse the classifier response: structured JSON first, then a keyword scan
/// that only accepts an unambiguous single match.
fn parse_decision(raw: &str) -> Option<ClassifyDecision> {
    if let Some(decision) = parse_decision_json(raw) {
        return Some(decision);
    }

    let lower = raw.to_lowercase();
    let has_stay = lower.contains("stay");
    let has_escalate = lower.contains("escalate");
    match (has_stay, has_escalate) {
        (true, false) => Some(ClassifyDecision::Stay),
        (false, true) => Some(ClassifyDecision::Escalate),
        _ => None,
    }
}

fn parse_decision_json(raw: &str) -> Option<ClassifyDecision> {
    // Models sometimes fence the object; parse the outermost {...} span.
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(&raw[start..=end]).ok()?;
    match value.get("decision")?.as_str()? {
        d if d.eq_ignore_ascii_case("stay") => Some(ClassifyDecision::Stay),
        d if d.eq_ignore_ascii_case("escalate") => Some(ClassifyDecision::Escalate),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        rstest::rstest,
        shoal_agents::{CompletionResponse, Usage},
    };

    // ── Heuristic corpus ─────────────────────────────────────────────

    #[rstest]
    #[case("", ClassifyDecision::Escalate)]
    #[case("   ", ClassifyDecision::Escalate)]
    #[case("/status", ClassifyDecision::Stay)]
    #[case("/HELP me please", ClassifyDecision::Stay)]
    #[case("/usage today", ClassifyDecision::Stay)]
    #[case("run this bash script for me", ClassifyDecision::Escalate)]
    #[case("please schedule a reminder", ClassifyDecision::Escalate)]
    #[case("spin up a subagent for this", ClassifyDecision::Escalate)]
    #[case("/exec ls -la", ClassifyDecision::Escalate)]
    #[case("hello there!", ClassifyDecision::Stay)]
    #[case("good morning", ClassifyDecision::Stay)]
    #[case("what can you do?", ClassifyDecision::Stay)]
    #[case("what data do you have stored about me?", ClassifyDecision::Stay)]
    fn heuristic_corpus(#[case] body: &str, #[case] expected: ClassifyDecision) {
        assert_eq!(HeuristicClassifier::decide(body), expected);
    }

    #[test]
    fn long_question_escalates() {
        let body = format!("{}?", "tell me about this ".repeat(12));
        assert!(body.len() > 200);
        assert_eq!(HeuristicClassifier::decide(&body), ClassifyDecision::Escalate);
    }

    #[test]
    fn short_statement_stays() {
        assert_eq!(
            HeuristicClassifier::decide("nice weather today"),
            ClassifyDecision::Stay
        );
    }

    // ── Decision parsing ─────────────────────────────────────────────

    #[rstest]
    #[case(r#"{"decision": "stay"}"#, Some(ClassifyDecision::Stay))]
    #[case(r#"{"decision": "ESCALATE"}"#, Some(ClassifyDecision::Escalate))]
    #[case("```json\n{\"decision\": \"stay\"}\n```", Some(ClassifyDecision::Stay))]
    #[case("I think the answer is stay", Some(ClassifyDecision::Stay))]
    #[case("escalate", Some(ClassifyDecision::Escalate))]
    #[case("stay or escalate, hard to tell", None)]
    #[case("neither option fits", None)]
    #[case(r#"{"decision": "both"}"#, None)]
    fn parse_ladder(#[case] raw: &str, #[case] expected: Option<ClassifyDecision>) {
        assert_eq!(parse_decision(raw), expected);
    }

    // ── Model-backed strategy ────────────────────────────────────────

    /// Provider that panics if invoked — proves fast paths skip the model.
    struct PanickingProvider;

    #[async_trait]
    impl LlmProvider for PanickingProvider {
        fn name(&self) -> &str {
            "panic"
        }

        fn id(&self) -> &str {
            "panic-model"
        }

        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _opts: &CompletionOptions,
        ) -> anyhow::Result<CompletionResponse> {
            panic!("classifier invoked the model on a fast path");
        }
    }

    /// Provider returning a canned response.
    struct CannedProvider {
        text: &'static str,
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn id(&self) -> &str {
            "canned-model"
        }

        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _opts: &CompletionOptions,
        ) -> anyhow::Result<CompletionResponse> {
            Ok(CompletionResponse {
                text: Some(self.text.to_string()),
                usage: Usage::default(),
            })
        }
    }

    /// Provider that always errors.
    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn id(&self) -> &str {
            "failing-model"
        }

        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _opts: &CompletionOptions,
        ) -> anyhow::Result<CompletionResponse> {
            anyhow::bail!("upstream unavailable")
        }
    }

    fn classifier() -> ModelClassifier {
        ModelClassifier::new(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn basic_command_skips_the_model() {
        let model: Arc<dyn LlmProvider> = Arc::new(PanickingProvider);
        let decision = classifier().classify("/status", Some(&model)).await.unwrap();
        assert_eq!(decision, ClassifyDecision::Stay);
    }

    #[tokio::test]
    async fn empty_body_skips_the_model() {
        let model: Arc<dyn LlmProvider> = Arc::new(PanickingProvider);
        let decision = classifier().classify("  ", Some(&model)).await.unwrap();
        assert_eq!(decision, ClassifyDecision::Escalate);
    }

    #[tokio::test]
    async fn missing_model_is_fatal() {
        let err = classifier()
            .classify("hello there", None)
            .await
            .expect_err("model-backed classifier must not fall back to the heuristic");
        assert!(matches!(err, Error::ClassifierModelMissing));
    }

    #[tokio::test]
    async fn structured_answer_is_used() {
        let model: Arc<dyn LlmProvider> = Arc::new(CannedProvider {
            text: r#"{"decision": "stay"}"#,
        });
        let decision = classifier()
            .classify("how are you today", Some(&model))
            .await
            .unwrap();
        assert_eq!(decision, ClassifyDecision::Stay);
    }

    #[tokio::test]
    async fn garbage_answer_escalates() {
        let model: Arc<dyn LlmProvider> = Arc::new(CannedProvider { text: "42" });
        let decision = classifier()
            .classify("how are you today", Some(&model))
            .await
            .unwrap();
        assert_eq!(decision, ClassifyDecision::Escalate);
    }

    #[tokio::test]
    async fn transport_failure_escalates() {
        let model: Arc<dyn LlmProvider> = Arc::new(FailingProvider);
        let decision = classifier()
            .classify("how are you today", Some(&model))
            .await
            .unwrap();
        assert_eq!(decision, ClassifyDecision::Escalate);
    }
}
