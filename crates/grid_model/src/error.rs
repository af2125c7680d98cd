//! Error types for grid model operations

use crate::WidgetId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid grid bounds: {columns} columns x {rows} rows")]
    InvalidBounds { columns: u32, rows: u32 },

    #[error("Widget not found: {0}")]
    WidgetNotFound(WidgetId),

    #[error("Duplicate widget id: {0}")]
    DuplicateWidget(WidgetId),
}

pub type Result<T> = std::result::Result<T, GridError>;
