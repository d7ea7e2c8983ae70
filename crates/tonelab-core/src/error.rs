use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    #[error("effect already registered: {0}")]
    EffectAlreadyRegistered(String),

    #[error("effect {effect} failed: {reason}")]
    ProcessingFailure { effect: String, reason: String },

    #[error("recipe version {found} is incompatible with {supported}")]
    RecipeVersionMismatch { found: String, supported: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
