use std::{sync::Arc, time::Duration};

use {
    tracing::{debug, error},
    uuid::Uuid,
};

use {
    crate::{
        Error, Result,
        classifier::{ClassifyDecision, TierClassifier},
        event::{RoutingEvent, RoutingEventSink, Tier},
    },
    shoal_agents::{
        LlmProvider, ModelAliasIndex, ModelResolver, parse_model_ref,
        resolve_model_ref_from_string,
    },
    shoal_config::schema::RoutingConfig,
};

/// One inbound request to route.
#[derive(Debug, Clone)]
pub struct RouteRequest<'a> {
    /// Normalized user message body.
    pub cleaned_body: &'a str,
    pub session_key: &'a str,
    /// Current provider/model from config/directives (before routing).
    pub provider: &'a str,
    pub model: &'a str,
    pub routing: &'a RoutingConfig,
    pub default_provider: &'a str,
    pub aliases: &'a ModelAliasIndex,
}

/// Result of routing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Keep the current provider/model.
    UseDefault,
    /// Stay traffic, redirected to the classifier-tier model.
    Override {
        tier: Tier,
        provider: String,
        model: String,
    },
}

/// Route the request: the classifier gate decides stay or escalate; when
/// routing is enabled and a classifier model is configured, stay traffic is
/// overridden to that model. Emits exactly one [`RoutingEvent`] on every
/// path, including classification fallbacks.
///
/// Resolution of a configured classifier model is fatal on failure and
/// re-raised: when routing is explicitly configured, it must not silently
/// degrade to default behavior.
pub async fn route_request(
    req: &RouteRequest<'_>,
    classifier: &dyn TierClassifier,
    resolver: &dyn ModelResolver,
    sink: &dyn RoutingEventSink,
) -> Result<RouteOutcome> {
    let enabled = req.routing.enabled;
    let classifier_model_raw = req.routing.classifier_model.trim();
    debug!(
        session_key = req.session_key,
        enabled, "route start"
    );

    // Resolve the classifier model up front when configured.
    let mut classifier_model: Option<Arc<dyn LlmProvider>> = None;
    if enabled && !classifier_model_raw.is_empty() {
        if let Some(model_ref) = parse_model_ref(classifier_model_raw, req.default_provider) {
            let resolve_timeout = Duration::from_millis(req.routing.resolve_timeout_ms);
            match tokio::time::timeout(resolve_timeout, resolver.resolve(&model_ref)).await {
                Ok(Ok(handle)) => classifier_model = Some(handle),
                Ok(Err(e)) => {
                    error!(
                        provider = %model_ref.provider,
                        model = %model_ref.model,
                        error = %e,
                        "failed to resolve classifier model"
                    );
                    return Err(Error::resolve(format!(
                        "{}/{}: {e}",
                        model_ref.provider, model_ref.model
                    )));
                },
                Err(_) => {
                    return Err(Error::resolve(format!(
                        "{}/{}: resolution timed out after {}ms",
                        model_ref.provider,
                        model_ref.model,
                        req.routing.resolve_timeout_ms
                    )));
                },
            }
        }
    }

    let decision = classifier
        .classify(req.cleaned_body, classifier_model.as_ref())
        .await?;
    let tier = match decision {
        ClassifyDecision::Stay => Tier::Simple,
        ClassifyDecision::Escalate => Tier::Complex,
    };
    let run_id = Uuid::new_v4().to_string();
    let body_preview: String = req.cleaned_body.chars().take(80).collect();

    let emit = |overridden: bool, provider: &str, model: &str| {
        sink.emit(RoutingEvent {
            run_id: run_id.clone(),
            decision,
            tier,
            session_key: req.session_key.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
            overridden,
            body_preview: body_preview.clone(),
        });
    };

    if !enabled || classifier_model_raw.is_empty() {
        emit(false, req.provider, req.model);
        return Ok(RouteOutcome::UseDefault);
    }

    if decision == ClassifyDecision::Escalate {
        emit(false, req.provider, req.model);
        return Ok(RouteOutcome::UseDefault);
    }

    // Second resolution step: alias-aware provider/model pair for the event
    // and the override. Failure here is not fatal; the request runs on the
    // default route.
    let Some(resolved) =
        resolve_model_ref_from_string(classifier_model_raw, req.default_provider, req.aliases)
    else {
        emit(false, req.provider, req.model);
        return Ok(RouteOutcome::UseDefault);
    };

    emit(true, &resolved.provider, &resolved.model);
    debug!(
        session_key = req.session_key,
        provider = %resolved.provider,
        model = %resolved.model,
        "route complete: stay tier override"
    );
    Ok(RouteOutcome::Override {
        tier: Tier::Simple,
        provider: resolved.provider,
        model: resolved.model,
    })
}
