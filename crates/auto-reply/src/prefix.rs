//! Response-prefix templating.
//!
//! A configured prefix like `"[{identity}]"` or `"({provider}/{model})"` is
//! interpolated from the request context before being prepended to outbound
//! text.

/// Values available to prefix template variables.
#[derive(Debug, Clone, Default)]
pub struct ResponsePrefixContext {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub identity_name: Option<String>,
}

/// Interpolate `{provider}`, `{model}` and `{identity}` into the configured
/// prefix. Missing values render as empty; unknown placeholders are left
/// untouched. Returns `None` when no prefix is configured.
#[must_use]
pub fn resolve_response_prefix_template(
    prefix: Option<&str>,
    ctx: &ResponsePrefixContext,
) -> Option<String> {
    let prefix = prefix?;
    let resolved = prefix
        .replace("{provider}", ctx.provider.as_deref().unwrap_or(""))
        .replace("{model}", ctx.model.as_deref().unwrap_or(""))
        .replace("{identity}", ctx.identity_name.as_deref().unwrap_or(""));
    Some(resolved)
}
