//! Widget footprints and geometric queries
//!
//! Footprints are axis-aligned rectangles in grid-cell units. All queries are
//! total functions; edges are computed with saturating arithmetic so legacy
//! data with absurd coordinates cannot overflow.

use crate::GridBounds;
use serde::{Deserialize, Serialize};

/// Minimum widget width enforced on every footprint
pub const MIN_WIDGET_W: u32 = 4;
/// Minimum widget height enforced on every footprint
pub const MIN_WIDGET_H: u32 = 3;
/// Width given to newly added widgets
pub const DEFAULT_WIDGET_W: u32 = 4;
/// Height given to newly added widgets
pub const DEFAULT_WIDGET_H: u32 = 3;

/// Top-left cell of a footprint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
}

impl GridPosition {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A widget's rectangle on the grid, in cells.
///
/// Missing fields deserialize as zero; the size floor fixes them up on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetFootprint {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl WidgetFootprint {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a footprint of the given size at a position
    pub const fn at(position: GridPosition, w: u32, h: u32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            w,
            h,
        }
    }

    pub fn position(&self) -> GridPosition {
        GridPosition::new(self.x, self.y)
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Whether the integer cell `(cx, cy)` lies inside this footprint
    pub fn contains_cell(&self, cx: u32, cy: u32) -> bool {
        cx >= self.x && cx < self.right() && cy >= self.y && cy < self.bottom()
    }

    /// Same footprint moved to a new top-left cell
    pub fn with_position(self, position: GridPosition) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..self
        }
    }

    /// Same footprint with a new size
    pub fn with_size(self, w: u32, h: u32) -> Self {
        Self { w, h, ..self }
    }
}

/// Minimum visible size for widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SizeConstraints {
    pub min_w: u32,
    pub min_h: u32,
    /// Size used for widgets created through the placement engine
    pub default_w: u32,
    pub default_h: u32,
}

impl Default for SizeConstraints {
    fn default() -> Self {
        Self {
            min_w: MIN_WIDGET_W,
            min_h: MIN_WIDGET_H,
            default_w: DEFAULT_WIDGET_W,
            default_h: DEFAULT_WIDGET_H,
        }
    }
}

impl SizeConstraints {
    /// Apply this floor to a footprint
    pub fn clamp(&self, footprint: WidgetFootprint) -> WidgetFootprint {
        clamp_minimum(footprint, self.min_w, self.min_h)
    }
}

/// True iff the half-open rectangles `a` and `b` share area.
///
/// Touching edges or corners is not an overlap.
pub fn overlaps(a: &WidgetFootprint, b: &WidgetFootprint) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
}

/// True iff `footprint` lies entirely within `[0, columns) x [0, rows)`
pub fn fits(footprint: &WidgetFootprint, bounds: &GridBounds) -> bool {
    footprint.right() <= bounds.columns() && footprint.bottom() <= bounds.rows()
}

/// Raise `w`/`h` to the given floor, leaving the position untouched
pub fn clamp_minimum(footprint: WidgetFootprint, min_w: u32, min_h: u32) -> WidgetFootprint {
    WidgetFootprint {
        w: footprint.w.max(min_w),
        h: footprint.h.max(min_h),
        ..footprint
    }
}
