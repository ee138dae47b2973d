use std::collections::HashMap;
use thiserror::Error;

use crate::database::StoreError;

/// Terminal failures of a record operation. None of these are retried.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("Malformed request body: {0}")]
    InvalidBody(String),

    #[error("Record not found")]
    NotFound,

    #[error("No caller identity resolved")]
    Unauthenticated,

    #[error("Caller does not own this record")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}
