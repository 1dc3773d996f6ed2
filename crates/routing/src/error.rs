use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Routing is enabled and a classifier model is configured, but it could
    /// not be resolved. Re-raised so operators discover misconfiguration
    /// instead of silently running on defaults.
    #[error("classifier model could not be resolved: {message}")]
    Resolve { message: String },

    /// The model-backed classifier was selected but no model handle reached
    /// it. There is no heuristic fallback on this path.
    #[error("model-backed classifier requires a model handle, none was provided")]
    ClassifierModelMissing,
}

impl Error {
    #[must_use]
    pub fn resolve(message: impl Into<String>) -> Self {
        Self::Resolve {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
