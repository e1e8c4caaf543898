use thiserror::Error;

use crate::services::DatabaseError;

/// Errors surfaced by the profile search pipeline
#[derive(Debug, Error)]
pub enum SearchError {
    /// Page or limit outside the accepted bounds; nothing was queried
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    /// The count or data query failed; no partial result is returned
    #[error("Search execution failed: {0}")]
    SearchExecutionFailed(#[from] DatabaseError),
}

impl SearchError {
    /// HTTP status the web layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            SearchError::InvalidPagination(_) => 400,
            SearchError::SearchExecutionFailed(_) => 500,
        }
    }
}
