use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid source name: {0:?}")]
    InvalidSourceName(String),
    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),
    #[error("invalid {kind} value: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },
    #[error("stratum must be between 1 and 6, got {0}")]
    StratumOutOfRange(u8),
}

pub type Result<T> = std::result::Result<T, ModelError>;
