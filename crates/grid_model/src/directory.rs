//! The per-directory widget layout
//!
//! `DirectoryLayout` owns one directory's widgets in insertion order. It
//! enforces id uniqueness on insert but does not police geometry: callers
//! decide when overlap or bounds checks apply (`first_collision`, `validate`).

use crate::{
    fits, overlaps, DirectoryId, GridBounds, GridError, GridPosition, Result, SizeConstraints,
    Widget, WidgetFootprint, WidgetId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A broken layout invariant found by [`DirectoryLayout::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutViolation {
    /// Two widgets share area
    Overlap { a: WidgetId, b: WidgetId },
    /// A widget extends past the grid bounds
    OutOfBounds { id: WidgetId },
    /// The id appears more than once
    DuplicateId { id: WidgetId },
}

/// All widgets of one directory plus the grid they live on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryLayout {
    directory_id: DirectoryId,
    bounds: GridBounds,
    widgets: Vec<Widget>,
}

impl DirectoryLayout {
    /// Create an empty layout
    pub fn new(directory_id: DirectoryId, bounds: GridBounds) -> Self {
        Self {
            directory_id,
            bounds,
            widgets: Vec::new(),
        }
    }

    /// Build a layout from stored widgets.
    ///
    /// Positions are trusted as persisted; only the size floor is applied.
    /// A repeated id keeps its first occurrence, and the dropped ids are
    /// returned so the caller can report them.
    pub fn from_persisted(
        directory_id: DirectoryId,
        bounds: GridBounds,
        persisted: Vec<Widget>,
        constraints: &SizeConstraints,
    ) -> (Self, Vec<WidgetId>) {
        let mut layout = Self::new(directory_id, bounds);
        let mut dropped = Vec::new();
        for mut widget in persisted {
            widget.footprint = constraints.clamp(widget.footprint);
            if let Err(GridError::DuplicateWidget(id)) = layout.push(widget) {
                dropped.push(id);
            }
        }
        (layout, dropped)
    }

    pub fn directory_id(&self) -> &DirectoryId {
        &self.directory_id
    }

    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn contains(&self, id: &WidgetId) -> bool {
        self.widgets.iter().any(|w| &w.id == id)
    }

    pub fn get(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    pub fn get_mut(&mut self, id: &WidgetId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| &w.id == id)
    }

    /// Append a widget, rejecting an id already present
    pub fn push(&mut self, widget: Widget) -> Result<()> {
        if self.contains(&widget.id) {
            return Err(GridError::DuplicateWidget(widget.id));
        }
        self.widgets.push(widget);
        Ok(())
    }

    /// Remove a widget by id, preserving the order of the rest
    pub fn remove(&mut self, id: &WidgetId) -> Result<Widget> {
        let index = self
            .widgets
            .iter()
            .position(|w| &w.id == id)
            .ok_or_else(|| GridError::WidgetNotFound(id.clone()))?;
        Ok(self.widgets.remove(index))
    }

    /// Move a widget's top-left cell; its size is untouched
    pub fn move_widget(&mut self, id: &WidgetId, position: GridPosition) -> Result<WidgetFootprint> {
        let widget = self
            .get_mut(id)
            .ok_or_else(|| GridError::WidgetNotFound(id.clone()))?;
        widget.footprint = widget.footprint.with_position(position);
        Ok(widget.footprint)
    }

    /// Resize a widget, re-applying the size floor; its position is untouched
    pub fn resize_widget(
        &mut self,
        id: &WidgetId,
        w: u32,
        h: u32,
        constraints: &SizeConstraints,
    ) -> Result<WidgetFootprint> {
        let widget = self
            .get_mut(id)
            .ok_or_else(|| GridError::WidgetNotFound(id.clone()))?;
        widget.footprint = constraints.clamp(widget.footprint.with_size(w, h));
        Ok(widget.footprint)
    }

    /// First widget other than `exclude` whose footprint overlaps `footprint`
    pub fn first_collision(
        &self,
        exclude: Option<&WidgetId>,
        footprint: &WidgetFootprint,
    ) -> Option<&Widget> {
        self.widgets
            .iter()
            .filter(|w| Some(&w.id) != exclude)
            .find(|w| overlaps(&w.footprint, footprint))
    }

    /// Report every invariant violation without repairing anything
    pub fn validate(&self) -> Vec<LayoutViolation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for (i, widget) in self.widgets.iter().enumerate() {
            if !seen.insert(&widget.id) {
                violations.push(LayoutViolation::DuplicateId {
                    id: widget.id.clone(),
                });
            }
            if !fits(&widget.footprint, &self.bounds) {
                violations.push(LayoutViolation::OutOfBounds {
                    id: widget.id.clone(),
                });
            }
            for other in &self.widgets[i + 1..] {
                if overlaps(&widget.footprint, &other.footprint) {
                    violations.push(LayoutViolation::Overlap {
                        a: widget.id.clone(),
                        b: other.id.clone(),
                    });
                }
            }
        }

        violations
    }
}
