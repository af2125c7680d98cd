//! Error types for layout synchronization

use crate::storage::StorageError;
use grid_model::{GridError, WidgetId};
use thiserror::Error;

/// Result type alias for synchronizer operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors returned by synchronizer operations.
///
/// The presentation-facing `on_*` handlers never return these; they log and
/// carry on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyncError {
    /// The initial fetch has not completed.
    #[error("Layout is still loading")]
    NotReady,

    /// The edit would break the grid invariants under the `Reject` policy.
    #[error("Edit rejected for widget {id}: {reason}")]
    Rejected { id: WidgetId, reason: String },

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from loading or validating a `SyncConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid grid: {0}")]
    Grid(#[from] GridError),

    #[error("Invalid size constraints: {0}")]
    InvalidConstraints(String),
}
