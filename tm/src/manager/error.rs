//! Task manager error types

use kvstore::StoreError;
use thiserror::Error;

/// Errors that can occur while syncing the task collection with its store
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
