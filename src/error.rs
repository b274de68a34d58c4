//! Error types for questplan
//!
//! Centralized error handling using thiserror. The scheduling entry points
//! never surface these; they show up in storage, the LLM client and
//! response parsing.

use thiserror::Error;

/// All error types that can occur in questplan
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Caller-supplied data that cannot be scheduled or learned from
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Assistant output that is not an acceptable schedule
    #[error("Response parse error: {0}")]
    ResponseParse(String),

    /// Prompt template rendering error
    #[error("Prompt render error: {0}")]
    Prompt(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for questplan operations
pub type Result<T> = std::result::Result<T, PlannerError>;
