//! Grid layout for Lattice.
//!
//! This crate holds the retained grid model and computes concrete pixel
//! sizes for its rows and columns.
//!
//! # Architecture
//!
//! 1. **Tracks**: rows and columns, each a [`TrackLength`] plus optional
//!    min/max bounds and the last resolved offset/extent
//! 2. **Content map**: items anchored to a cell with a row/column [`Span`]
//! 3. **Dimension resolution**: fixed tracks first, then auto and weighted
//!    tracks in priority order, measuring content through [`Measure`]
//!
//! # Example
//!
//! ```
//! use lattice_core::{Cell, Size};
//! use lattice_layout::{Grid, Span, TrackDefinition};
//!
//! let mut grid = Grid::new();
//! grid.add_column(TrackDefinition::auto());
//! grid.add_column(TrackDefinition::weighted(1.0).unwrap());
//! grid.add_row(TrackDefinition::fixed(24).unwrap());
//! grid.place("label", Cell::new(0, 0), Span::ONE).unwrap();
//!
//! let layout = grid.arrange(Size::new(300, 24), &mut |_: &&str, _: Size| Size::new(80, 16));
//! assert_eq!(layout.column_sizes, vec![80, 220]);
//! ```
//!
//! [`TrackLength`]: lattice_core::TrackLength

mod grid;
mod measure;
mod options;
mod resolve;
mod track;

pub use grid::{Grid, GridId, Placement, Span};
pub use measure::{Measure, NoContent};
pub use options::GridOptions;
pub use resolve::{ResolveMode, ResolvedLayout};
pub use track::{TrackDefinition, TrackEditor};
