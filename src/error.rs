//! Vordr error types

use crate::types::StanceLabel;

/// Vordr error types
#[derive(Debug, thiserror::Error)]
pub enum VordrError {
    // User errors
    #[error("empty input text")]
    EmptyInput,

    // Startup / wiring errors
    #[error("no anchor sets loaded")]
    AnchorsNotLoaded,

    #[error("configuration error: {0}")]
    Configuration(String),

    // Inference errors (non-degradable collaborator failed)
    #[error("model inference failed: {0}")]
    ModelInference(String),

    /// The similarity map is missing a label the feature schema requires.
    /// Happens when an anchor set failed to load and imputation is disabled.
    #[error("similarity score missing for label '{0}'")]
    MissingSimilarityLabel(StanceLabel),

    // Transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("data error: {0}")]
    DataError(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Vordr operations
pub type Result<T> = std::result::Result<T, VordrError>;
