//! Domain-level error taxonomy for N2C2 evaluation.

use std::path::PathBuf;

use crate::domain::track::Track;

/// Errors produced while loading annotations or scoring them.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("{path}: unexpected value (\"{value}\") for the {criterion} tag")]
    MalformedLabel {
        path: PathBuf,
        criterion: String,
        value: String,
    },

    #[error("{path}: tag {tag} is missing the `{attribute}` attribute")]
    MissingAttribute {
        path: PathBuf,
        tag: String,
        attribute: String,
    },

    #[error("{document}: required criterion {criterion} is missing")]
    MissingCriterion { document: String, criterion: String },

    #[error("document pair mismatch: gold {gold} vs system {system}")]
    PairMismatch { gold: String, system: String },

    #[error("invalid beta {0}: the F-score exponent must be a positive number")]
    InvalidBeta(f64),

    #[error("unsupported track: {0}")]
    UnsupportedTrack(Track),

    #[error("unknown criterion value: {0}")]
    UnknownValue(String),

    #[error("{path}: xml error: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("{path}: io error: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;
