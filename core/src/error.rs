use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No alert found for customer '{customer}'")]
    AlertNotFound { customer: String },

    #[error("Invalid upload: {reason}")]
    Validation { reason: String },

    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ReviewResult<T> = Result<T, ReviewError>;
