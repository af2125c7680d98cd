//! Row-major placement search
//!
//! Candidates are visited in `(y, x)` order and checked cell by cell against
//! every existing footprint. The scan is exhaustive over a small fixed grid,
//! so its cost is `O(rows * columns * w * h * n)`.
//!
//! When nothing fits, placement does not fail: it returns
//! [`Placement::GridFull`] carrying a position one row below the grid. Callers
//! that only want a position get that fallback from [`Placement::position`].

use grid_model::{fits, GridBounds, GridPosition, Widget, WidgetFootprint};
use serde::{Deserialize, Serialize};

/// Outcome of a placement search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Placement {
    /// A collision-free position inside the grid
    Placed(GridPosition),
    /// No room left; the position is the `{x: 0, y: rows}` fallback
    GridFull(GridPosition),
}

impl Placement {
    /// Position to use, whether or not the grid had room
    pub fn position(&self) -> GridPosition {
        match *self {
            Placement::Placed(position) | Placement::GridFull(position) => position,
        }
    }

    pub fn is_grid_full(&self) -> bool {
        matches!(self, Placement::GridFull(_))
    }

    /// The in-bounds position, or `None` when the grid was full
    pub fn placed(&self) -> Option<GridPosition> {
        match *self {
            Placement::Placed(position) => Some(position),
            Placement::GridFull(_) => None,
        }
    }
}

/// Fallback position used when the grid has no room
pub fn overflow_position(bounds: &GridBounds) -> GridPosition {
    GridPosition::new(0, bounds.rows())
}

/// Find the first position, in row-major order, where a `w` x `h` widget fits
/// without overlapping any of `existing`.
///
/// The search is a pure function of its inputs.
pub fn find_position(existing: &[Widget], w: u32, h: u32, bounds: &GridBounds) -> Placement {
    find_position_among(existing.iter().map(|widget| &widget.footprint), w, h, bounds)
}

/// Same search as [`find_position`] over bare footprints
pub fn find_position_among<'a, I>(occupied: I, w: u32, h: u32, bounds: &GridBounds) -> Placement
where
    I: IntoIterator<Item = &'a WidgetFootprint>,
{
    let occupied: Vec<&WidgetFootprint> = occupied.into_iter().collect();

    if w <= bounds.columns() && h <= bounds.rows() {
        for y in 0..=bounds.rows() - h {
            for x in 0..=bounds.columns() - w {
                let candidate = WidgetFootprint::new(x, y, w, h);
                if fits(&candidate, bounds) && is_free(&candidate, &occupied) {
                    return Placement::Placed(candidate.position());
                }
            }
        }
    }

    Placement::GridFull(overflow_position(bounds))
}

/// True when no cell of `candidate` is covered by an occupied footprint
fn is_free(candidate: &WidgetFootprint, occupied: &[&WidgetFootprint]) -> bool {
    (0..candidate.h).all(|dy| {
        (0..candidate.w).all(|dx| {
            let (cx, cy) = (candidate.x + dx, candidate.y + dy);
            !occupied.iter().any(|footprint| footprint.contains_cell(cx, cy))
        })
    })
}
