use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Input failed field validation; nothing was written.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    /// The backing store could not be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
