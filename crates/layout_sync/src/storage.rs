//! Document store contract for directory widgets.
//!
//! The grid never talks to the database directly. It consumes three
//! operations: a read of the directory's widgets, a full-list overwrite used
//! by debounced saves, and an atomic single-widget append used when adding.
//! Backends decide the document shape; each widget must round-trip its id,
//! kind name, geometry and payload fields.

use grid_model::{DirectoryId, Widget};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Directory document does not exist
    #[error("Directory not found: {0}")]
    DirectoryNotFound(DirectoryId),

    /// Store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Caller may not read or write this directory
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Stored data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal storage error
    #[error("Internal storage error: {0}")]
    InternalError(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::SerializationError(err.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for directory widget storage backends
///
/// Methods take `&self`; implementations use interior mutability and must be
/// safe to share between sessions through `Arc`.
#[trait_variant::make(Send)]
pub trait WidgetStore: Send + Sync {
    /// Read every widget stored for a directory, in stored order
    async fn fetch_directory_widgets(&self, directory_id: &DirectoryId)
        -> StorageResult<Vec<Widget>>;

    /// Overwrite the directory's widget list
    ///
    /// Last write wins; there is no version check.
    async fn persist_widget_list(
        &self,
        directory_id: &DirectoryId,
        widgets: &[Widget],
    ) -> StorageResult<()>;

    /// Append one widget to the directory's list
    ///
    /// Must be atomic with respect to other appends on the same directory, so
    /// concurrent adds never drop each other.
    async fn append_widget_atomic(
        &self,
        directory_id: &DirectoryId,
        widget: &Widget,
    ) -> StorageResult<()>;
}
