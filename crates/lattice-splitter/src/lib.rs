//! Interactive resizing of grid tracks with a drag handle.
//!
//! A drag starts with [`begin_drag`], which normalizes the weighted tracks of
//! the handle's axis to their resolved pixel widths and snapshots every track.
//! Each pointer sample then calls [`DragSession::apply_delta`] with the
//! cumulative offset from where the drag began. Space is taken from the
//! tracks the handle moves toward and handed to the tracks on the other
//! side, so the axis total never changes.
//!
//! ```
//! use lattice_core::{Axis, Size};
//! use lattice_layout::{Grid, NoContent, TrackDefinition};
//! use lattice_splitter::{begin_drag, DragHandle};
//!
//! let mut grid: Grid<u32> = Grid::new();
//! grid.add_column(TrackDefinition::fixed(60).unwrap().with_min(20).unwrap());
//! grid.add_column(TrackDefinition::fixed(100).unwrap());
//! grid.add_row(TrackDefinition::fixed(30).unwrap());
//! grid.arrange(Size::new(160, 30), &mut NoContent);
//!
//! let mut session = begin_drag(&mut grid, DragHandle::between(Axis::Column, 1));
//! assert_eq!(session.apply_delta(&mut grid, -50), -40);
//! assert_eq!(grid.columns()[0].extent(), 20);
//! assert_eq!(grid.columns()[1].extent(), 140);
//! ```

mod redistribute;
mod session;

pub use session::{begin_drag, DragHandle, DragSession, MIN_NORMALIZED_WEIGHT};
