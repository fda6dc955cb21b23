use thiserror::Error;

/// Errors raised by the glass core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GlassError {
    #[error("stage {stage} reads unknown result `{name}`")]
    UnknownInput { stage: usize, name: String },
    #[error("result `{0}` is produced by more than one stage")]
    DuplicateResult(String),
    #[error("stage {0} reads the previous result but is the first stage")]
    NoPreviousResult(usize),
    #[error("unknown configuration attribute `{0}`")]
    UnknownAttribute(String),
    #[error("invalid value `{value}` for `{name}`")]
    InvalidValue { name: String, value: String },
    #[error("invalid padding `{0}`")]
    InvalidPadding(String),
    #[error("texture size must be non-zero")]
    EmptyTexture,
}

pub type Result<T> = std::result::Result<T, GlassError>;
