use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaseCashflowError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Configuration error: {key} — {reason}")]
    Configuration { key: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LeaseCashflowError {
    fn from(e: serde_json::Error) -> Self {
        LeaseCashflowError::SerializationError(e.to_string())
    }
}
