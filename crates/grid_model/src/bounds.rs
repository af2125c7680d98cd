//! Grid dimensions

use crate::{GridError, Result};
use serde::{Deserialize, Serialize};

/// Default number of grid columns
pub const DEFAULT_COLUMNS: u32 = 16;
/// Default number of grid rows
pub const DEFAULT_ROWS: u32 = 16;
/// Default rendered height of one row in pixels
pub const DEFAULT_ROW_HEIGHT_PX: u32 = 30;

/// Fixed dimensions of a directory grid.
///
/// `row_height_px` only matters to the renderer; placement works purely in
/// cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBounds {
    columns: u32,
    rows: u32,
    row_height_px: u32,
}

impl GridBounds {
    /// Create bounds, rejecting a zero column or row count
    pub fn new(columns: u32, rows: u32, row_height_px: u32) -> Result<Self> {
        let bounds = Self {
            columns,
            rows,
            row_height_px,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Check the `columns > 0, rows > 0` invariant.
    ///
    /// Deserialized bounds bypass `new`, so loaders call this explicitly.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(GridError::InvalidBounds {
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn row_height_px(&self) -> u32 {
        self.row_height_px
    }

    /// Total number of cells in the grid
    pub fn cell_count(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            row_height_px: DEFAULT_ROW_HEIGHT_PX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds() {
        let bounds = GridBounds::default();
        assert_eq!(bounds.columns(), 16);
        assert_eq!(bounds.rows(), 16);
        assert_eq!(bounds.cell_count(), 256);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            GridBounds::new(0, 16, 30),
            Err(GridError::InvalidBounds { columns: 0, rows: 16 })
        );
        assert!(GridBounds::new(16, 0, 30).is_err());
        assert!(GridBounds::new(1, 1, 0).is_ok());
    }

    #[test]
    fn test_deserialized_bounds_validate() {
        let bounds: GridBounds =
            serde_json::from_str(r#"{"columns":0,"rows":4,"rowHeightPx":30}"#).unwrap();
        assert!(bounds.validate().is_err());
    }
}
