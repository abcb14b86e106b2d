use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Invalid threshold '{name}': {details}")]
    InvalidThreshold { name: String, details: String },

    #[error("Invalid month label: {0}")]
    InvalidMonth(String),

    #[error("No monthly spending data available")]
    NoData,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InsightError>;
