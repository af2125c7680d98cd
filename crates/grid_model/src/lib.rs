//! Grid Model - Widget geometry and directory layouts
//!
//! This crate provides the pure data model behind a directory's widget grid:
//! bounded grid configuration, widget footprints in cell units, the geometric
//! queries placement and editing rely on, and the `DirectoryLayout` aggregate
//! holding one directory's widgets. Nothing here performs I/O.

mod bounds;
mod directory;
mod error;
mod footprint;
mod widget;
mod widget_id;

pub use bounds::*;
pub use directory::*;
pub use error::*;
pub use footprint::*;
pub use widget::*;
pub use widget_id::*;
