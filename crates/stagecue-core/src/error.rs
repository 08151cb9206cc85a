use thiserror::Error;

#[derive(Debug, Error)]
pub enum CueError {
    #[error("empty instruction: nothing to plan")]
    EmptyInput,

    #[error("no viable plan: {0}")]
    NoViablePlan(String),

    #[error("missing amount")]
    MissingAmount,

    #[error("invalid amount format: '{0}'")]
    InvalidAmountFormat(String),

    #[error("amount must be greater than zero: '{0}'")]
    NonPositiveAmount(String),

    #[error("invalid effect kind: '{0}' (expected sticker, flash, or sound)")]
    InvalidEffectKind(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CueError>;
