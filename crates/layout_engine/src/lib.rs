//! Layout Engine - Widget placement on directory grids
//!
//! This crate finds where a newly added widget goes: the first cell, scanning
//! rows top to bottom and columns left to right, where a footprint of the
//! requested size fits inside the grid without touching any existing widget.

mod placement;

pub use placement::*;
