//! Validation errors raised at the API boundary before scoring begins

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("invalid weight `{field}`: {value} (weights must be finite and non-negative)")]
    InvalidWeight { field: &'static str, value: f64 },

    #[error("invalid count {0}: at least one recommendation must be requested")]
    InvalidCount(usize),

    #[error("invalid goal profile `{name}`: {reason}")]
    InvalidProfile { name: String, reason: String },

    #[error("failed to parse presets: {0}")]
    InvalidPresetFile(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
