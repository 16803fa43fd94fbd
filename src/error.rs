use thiserror::Error;

/// Failures raised while building, driving or releasing the effect.
///
/// None of these escape the lifecycle controller: it logs them and leaves
/// the effect idle or halted. Only [`EffectError::Config`] is handed back to
/// callers, because it describes bad input rather than a rendering failure.
#[derive(Debug, Error)]
pub enum EffectError {
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("shader program failed to link: {0}")]
    ProgramLink(String),

    #[error("failed to create {what}: {detail}")]
    Resource { what: &'static str, detail: String },

    #[error("failed to set up {what} observer: {detail}")]
    Observer { what: &'static str, detail: String },

    #[error("failed to schedule animation frame: {0}")]
    Schedule(String),

    #[error("rendering context lost")]
    ContextLost,

    #[error("draw failed: {0}")]
    Draw(String),

    #[error("failed to release rendering resources: {0}")]
    Release(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("configuration must be a JSON object")]
    ConfigShape,
}
