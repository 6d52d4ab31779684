use thiserror::Error;

/// Engine-wide conditions surfaced to the caller as explicit states.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A required source failed to load; the engine holds no data.
    #[error("data unavailable: {reason}")]
    DataUnavailable { reason: String },
    /// No known dataset was selected.
    #[error("select at least one dataset")]
    EmptySelection,
}

pub type Result<T> = std::result::Result<T, EngineError>;
