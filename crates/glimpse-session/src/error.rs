use thiserror::Error;

/// Storage error type
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage result type
pub type StoreResult<T> = Result<T, StoreError>;
