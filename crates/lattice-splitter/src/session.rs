//! Drag handles and drag sessions.

use std::hash::Hash;
use std::ops::Range;

use lattice_core::{Axis, LayoutResult, Size, TrackLength};
use lattice_layout::{Grid, GridId};
use tracing::{debug, debug_span, warn};

use crate::redistribute::{redistribute, rewritten_length, OriginalTrack};

/// Weight given to a weighted track whose pixel extent is zero when a drag
/// starts. Weights must stay positive.
pub const MIN_NORMALIZED_WEIGHT: f64 = 0.001;

/// Where a resize handle sits among the tracks of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragHandle {
    axis: Axis,
    index: usize,
    occupies_track: bool,
}

impl DragHandle {
    /// A handle on the boundary between track `index - 1` and track `index`.
    pub fn between(axis: Axis, index: usize) -> Self {
        Self {
            axis,
            index,
            occupies_track: false,
        }
    }

    /// A handle living in its own track at `index`. That track is left alone;
    /// the tracks before and after it are resized.
    pub fn in_track(axis: Axis, index: usize) -> Self {
        Self {
            axis,
            index,
            occupies_track: true,
        }
    }

    /// A handle placed in track `index` of whichever axis its own extent
    /// runs along: a tall, thin handle resizes columns.
    pub fn for_extent(extent: Size, index: usize) -> Self {
        Self::in_track(Axis::for_handle(extent), index)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn occupies_track(&self) -> bool {
        self.occupies_track
    }

    /// Tracks before and after the handle, or `None` when the handle does not
    /// fit among `count` tracks.
    fn sides(&self, count: usize) -> Option<(Range<usize>, Range<usize>)> {
        if self.occupies_track {
            (self.index < count).then(|| (0..self.index, self.index + 1..count))
        } else {
            (self.index <= count).then(|| (0..self.index, self.index..count))
        }
    }
}

/// State carried between the start of a drag and its last pointer sample.
///
/// A session is bound to one grid and one track structure. Once the grid it
/// was started on gains or loses a track, or when applied to another grid,
/// the session goes inert and every further delta is ignored.
#[derive(Debug, Clone)]
pub struct DragSession {
    grid: GridId,
    structure_version: u64,
    handle: DragHandle,
    before: Range<usize>,
    after: Range<usize>,
    /// Index-aligned with the live tracks of the handle's axis
    original: Vec<OriginalTrack>,
    applied: i32,
    active: bool,
}

/// Start dragging `handle` on `grid`.
///
/// Weighted tracks on the handle's axis are rewritten to weights equal to
/// their last resolved pixel extent, so the grid should have been arranged
/// before the drag begins. A handle outside the track range yields an inert
/// session.
pub fn begin_drag<K: Hash + Eq>(grid: &mut Grid<K>, handle: DragHandle) -> DragSession {
    DragSession::begin(grid, handle)
}

impl DragSession {
    pub fn begin<K: Hash + Eq>(grid: &mut Grid<K>, handle: DragHandle) -> DragSession {
        let axis = handle.axis();
        let count = grid.track_count(axis);
        let Some((before, after)) = handle.sides(count) else {
            debug!(?handle, count, "drag handle outside the grid, session inert");
            return Self::inert(grid, handle);
        };

        if let Err(err) = normalize_weights(grid, axis) {
            warn!(%err, "could not normalize weighted tracks, session inert");
            return Self::inert(grid, handle);
        }

        let original = grid
            .tracks(axis)
            .iter()
            .map(|track| OriginalTrack {
                length: track.length(),
                min: track.min_or_zero(),
                max: track.max_size(),
                extent: track.extent(),
            })
            .collect();

        debug!(?handle, count, "drag session started");
        DragSession {
            grid: grid.id(),
            structure_version: grid.structure_version(),
            handle,
            before,
            after,
            original,
            applied: 0,
            active: true,
        }
    }

    fn inert<K: Hash + Eq>(grid: &Grid<K>, handle: DragHandle) -> Self {
        DragSession {
            grid: grid.id(),
            structure_version: grid.structure_version(),
            handle,
            before: 0..0,
            after: 0..0,
            original: Vec::new(),
            applied: 0,
            active: false,
        }
    }

    pub fn handle(&self) -> DragHandle {
        self.handle
    }

    pub fn grid_id(&self) -> GridId {
        self.grid
    }

    /// Whether deltas still have an effect.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Signed pixels moved by the most recent delta.
    pub fn applied(&self) -> i32 {
        self.applied
    }

    /// Extent of track `index` when the drag began.
    pub fn original_extent(&self, index: usize) -> Option<i32> {
        self.original.get(index).map(|track| track.extent)
    }

    /// Move the handle `delta` pixels from where the drag began and return
    /// how far it actually moved once track bounds are respected. Each call
    /// starts over from the drag-start snapshot, so callers pass the total
    /// pointer offset rather than the step since the last sample.
    ///
    /// Stale or inert sessions return 0 and leave the grid untouched.
    pub fn apply_delta<K: Hash + Eq>(&mut self, grid: &mut Grid<K>, delta: i32) -> i32 {
        if !self.active {
            return 0;
        }
        let axis = self.handle.axis();
        if grid.id() != self.grid
            || grid.structure_version() != self.structure_version
            || grid.track_count(axis) != self.original.len()
        {
            warn!(handle = ?self.handle, "drag session no longer matches its grid");
            self.active = false;
            return 0;
        }

        let _span = debug_span!("drag_delta", ?axis, index = self.handle.index(), delta).entered();
        let plan = redistribute(&self.original, self.before.clone(), self.after.clone(), delta);
        if plan.clamped {
            debug!(requested = delta, applied = plan.applied, "drag clamped by track bounds");
        }

        let unchanged = grid
            .tracks(axis)
            .iter()
            .zip(self.original.iter().zip(&plan.extents))
            .all(|(live, (original, &extent))| {
                live.extent() == extent
                    && live.length() == rewritten_length(original, extent, MIN_NORMALIZED_WEIGHT)
            });
        if !unchanged {
            let original = &self.original;
            let written = grid.update_tracks(axis, |editor| -> LayoutResult<()> {
                for (index, (track, &extent)) in original.iter().zip(&plan.extents).enumerate() {
                    editor.set_length(index, rewritten_length(track, extent, MIN_NORMALIZED_WEIGHT))?;
                    editor.set_extent(index, extent)?;
                }
                Ok(())
            });
            if let Err(err) = written {
                warn!(%err, "failed to write resized tracks, session inert");
                self.active = false;
                return 0;
            }
        }

        self.applied = plan.applied;
        plan.applied
    }
}

/// Rewrite every weighted track on `axis` as a weight equal to its extent.
fn normalize_weights<K: Hash + Eq>(grid: &mut Grid<K>, axis: Axis) -> LayoutResult<()> {
    let has_weighted = grid
        .tracks(axis)
        .iter()
        .any(|track| matches!(track.length(), TrackLength::Weighted(_)));
    if !has_weighted {
        return Ok(());
    }
    grid.update_tracks(axis, |editor| -> LayoutResult<()> {
        for index in 0..editor.len() {
            let Some(track) = editor.get(index) else {
                continue;
            };
            if let TrackLength::Weighted(_) = track.length() {
                let weight = (track.extent() as f64).max(MIN_NORMALIZED_WEIGHT);
                editor.set_length(index, TrackLength::Weighted(weight))?;
            }
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_core::Cell;
    use lattice_layout::{NoContent, Span, TrackDefinition};

    /// `[Auto(60) min 20, Fixed(100)]` with a 60px item in the auto column.
    fn auto_and_fixed() -> Grid<u32> {
        let mut grid = Grid::new();
        grid.add_column(TrackDefinition::auto().with_min(20).unwrap());
        grid.add_column(TrackDefinition::fixed(100).unwrap());
        grid.add_row(TrackDefinition::fixed(30).unwrap());
        grid.place(1, Cell::new(0, 0), Span::ONE).unwrap();
        grid.arrange(Size::new(160, 30), &mut |_: &u32, _: Size| Size::new(60, 10));
        grid
    }

    fn extents<K: Hash + Eq>(grid: &Grid<K>, axis: Axis) -> Vec<i32> {
        grid.tracks(axis).iter().map(|track| track.extent()).collect()
    }

    fn lengths<K: Hash + Eq>(grid: &Grid<K>, axis: Axis) -> Vec<TrackLength> {
        grid.tracks(axis).iter().map(|track| track.length()).collect()
    }

    #[test]
    fn test_drag_left_clamps_to_min() {
        let mut grid = auto_and_fixed();
        assert_eq!(extents(&grid, Axis::Column), vec![60, 100]);

        let mut session = begin_drag(&mut grid, DragHandle::between(Axis::Column, 1));
        assert!(session.is_active());

        assert_eq!(session.apply_delta(&mut grid, -40), -40);
        assert_eq!(extents(&grid, Axis::Column), vec![20, 140]);

        assert_eq!(session.apply_delta(&mut grid, -50), -40);
        assert_eq!(extents(&grid, Axis::Column), vec![20, 140]);
        assert_eq!(
            lengths(&grid, Axis::Column),
            vec![TrackLength::Fixed(20), TrackLength::Fixed(140)]
        );
        assert!(grid.is_dirty());
    }

    #[test]
    fn test_resize_survives_rearrange() {
        let mut grid = auto_and_fixed();
        let mut session = begin_drag(&mut grid, DragHandle::between(Axis::Column, 1));
        session.apply_delta(&mut grid, -25);

        let layout = grid.arrange(Size::new(160, 30), &mut |_: &u32, _: Size| Size::new(60, 10));
        assert_eq!(layout.column_sizes, vec![35, 125]);
        assert_eq!(layout.total_width, 160);
    }

    #[test]
    fn test_deltas_are_cumulative() {
        let mut grid = auto_and_fixed();
        let mut session = begin_drag(&mut grid, DragHandle::between(Axis::Column, 1));

        session.apply_delta(&mut grid, -20);
        assert_eq!(extents(&grid, Axis::Column), vec![40, 120]);
        session.apply_delta(&mut grid, -10);
        assert_eq!(extents(&grid, Axis::Column), vec![50, 110]);

        // Back to the start: the auto column is auto again
        assert_eq!(session.apply_delta(&mut grid, 0), 0);
        assert_eq!(extents(&grid, Axis::Column), vec![60, 100]);
        assert_eq!(
            lengths(&grid, Axis::Column),
            vec![TrackLength::Auto, TrackLength::Fixed(100)]
        );
        assert_eq!(session.original_extent(0), Some(60));
    }

    #[test]
    fn test_zero_delta_leaves_grid_clean() {
        let mut grid = auto_and_fixed();
        let mut session = begin_drag(&mut grid, DragHandle::between(Axis::Column, 1));
        assert!(!grid.is_dirty(), "no weighted tracks to normalize");
        assert_eq!(session.apply_delta(&mut grid, 0), 0);
        assert!(!grid.is_dirty());
    }

    #[test]
    fn test_begin_normalizes_weights() {
        let mut grid: Grid<u32> = Grid::new();
        grid.add_column(TrackDefinition::weighted(1.0).unwrap());
        grid.add_column(TrackDefinition::weighted(3.0).unwrap());
        grid.add_column(TrackDefinition::fixed(100).unwrap());
        grid.add_column(TrackDefinition::weighted(2.0).unwrap());
        grid.add_row(TrackDefinition::fixed(10).unwrap());
        grid.arrange(Size::new(100, 10), &mut NoContent);
        assert_eq!(extents(&grid, Axis::Column), vec![0, 0, 100, 0]);

        grid.set_length(Axis::Column, 2, TrackLength::Fixed(20)).unwrap();
        grid.arrange(Size::new(100, 10), &mut NoContent);
        assert_eq!(extents(&grid, Axis::Column), vec![13, 40, 20, 27]);

        let session = begin_drag(&mut grid, DragHandle::between(Axis::Column, 2));
        assert!(session.is_active());
        assert_eq!(
            lengths(&grid, Axis::Column),
            vec![
                TrackLength::Weighted(13.0),
                TrackLength::Weighted(40.0),
                TrackLength::Fixed(20),
                TrackLength::Weighted(27.0),
            ]
        );

        // Normalized weights reproduce the same layout
        let layout = grid.arrange(Size::new(100, 10), &mut NoContent);
        assert_eq!(layout.column_sizes, vec![13, 40, 20, 27]);
    }

    #[test]
    fn test_zero_extent_weight_stays_positive() {
        let mut grid: Grid<u32> = Grid::new();
        grid.add_column(TrackDefinition::fixed(50).unwrap());
        grid.add_column(TrackDefinition::weighted(1.0).unwrap());
        grid.add_row(TrackDefinition::fixed(10).unwrap());
        grid.arrange(Size::new(50, 10), &mut NoContent);

        begin_drag(&mut grid, DragHandle::between(Axis::Column, 1));
        assert_eq!(grid.columns()[1].length(), TrackLength::Weighted(MIN_NORMALIZED_WEIGHT));
    }

    #[test]
    fn test_weighted_tracks_shrink_first() {
        let mut grid: Grid<u32> = Grid::new();
        grid.add_column(TrackDefinition::weighted(1.0).unwrap());
        grid.add_column(TrackDefinition::fixed(50).unwrap());
        grid.add_column(TrackDefinition::fixed(100).unwrap());
        grid.add_row(TrackDefinition::fixed(10).unwrap());
        grid.arrange(Size::new(300, 10), &mut NoContent);
        assert_eq!(extents(&grid, Axis::Column), vec![150, 50, 100]);

        let mut session = begin_drag(&mut grid, DragHandle::between(Axis::Column, 2));
        assert_eq!(session.apply_delta(&mut grid, -170), -170);
        assert_eq!(extents(&grid, Axis::Column), vec![0, 30, 270]);
        assert_eq!(
            lengths(&grid, Axis::Column),
            vec![
                TrackLength::Weighted(MIN_NORMALIZED_WEIGHT),
                TrackLength::Fixed(30),
                TrackLength::Fixed(270),
            ]
        );
    }

    #[test]
    fn test_handle_in_its_own_track() {
        let mut grid: Grid<u32> = Grid::new();
        grid.add_column(TrackDefinition::weighted(1.0).unwrap());
        grid.add_column(TrackDefinition::fixed(4).unwrap());
        grid.add_column(TrackDefinition::weighted(1.0).unwrap());
        grid.add_row(TrackDefinition::fixed(10).unwrap());
        grid.arrange(Size::new(104, 10), &mut NoContent);

        let handle = DragHandle::for_extent(Size::new(4, 10), 1);
        assert_eq!(handle.axis(), Axis::Column);
        let mut session = begin_drag(&mut grid, handle);
        assert_eq!(session.apply_delta(&mut grid, 30), 30);
        assert_eq!(extents(&grid, Axis::Column), vec![80, 4, 20]);

        let offsets: Vec<i32> = grid.columns().iter().map(|c| c.offset()).collect();
        assert_eq!(offsets, vec![0, 80, 84]);
    }

    #[test]
    fn test_rows_resize_like_columns() {
        let mut grid: Grid<u32> = Grid::new();
        grid.add_column(TrackDefinition::fixed(10).unwrap());
        grid.add_row(TrackDefinition::fixed(40).unwrap());
        grid.add_row(TrackDefinition::fixed(60).unwrap().with_max(70).unwrap());
        grid.arrange(Size::new(10, 100), &mut NoContent);

        let handle = DragHandle::for_extent(Size::new(10, 2), 1);
        assert_eq!(handle.axis(), Axis::Row);
        let mut session = begin_drag(&mut grid, DragHandle::between(Axis::Row, 1));
        assert_eq!(session.apply_delta(&mut grid, -30), -10);
        assert_eq!(extents(&grid, Axis::Row), vec![30, 70]);
        assert_eq!(session.applied(), -10);
    }

    #[test]
    fn test_out_of_range_handle_is_inert() {
        let mut grid = auto_and_fixed();
        let mut session = begin_drag(&mut grid, DragHandle::between(Axis::Column, 3));
        assert!(!session.is_active());
        assert_eq!(session.apply_delta(&mut grid, -10), 0);
        assert_eq!(extents(&grid, Axis::Column), vec![60, 100]);

        let session = begin_drag(&mut grid, DragHandle::in_track(Axis::Column, 2));
        assert!(!session.is_active());
    }

    #[test]
    fn test_stale_session_is_inert() {
        let mut grid = auto_and_fixed();
        let mut session = begin_drag(&mut grid, DragHandle::between(Axis::Column, 1));
        grid.add_column(TrackDefinition::fixed(10).unwrap());

        assert_eq!(session.apply_delta(&mut grid, -10), 0);
        assert!(!session.is_active());
        assert_eq!(extents(&grid, Axis::Column)[..2], [60, 100]);
    }

    #[test]
    fn test_session_bound_to_its_grid() {
        let mut grid = auto_and_fixed();
        let mut other = grid.clone();
        let mut session = begin_drag(&mut grid, DragHandle::between(Axis::Column, 1));

        assert_eq!(session.apply_delta(&mut other, -10), 0);
        assert!(!session.is_active());
        assert_eq!(session.grid_id(), grid.id());
    }
}
