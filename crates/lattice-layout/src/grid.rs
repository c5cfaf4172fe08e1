//! The grid: row and column collections plus the content-to-cell map.
//!
//! Tracks live in two index-addressed vectors, and content placements key
//! cells by `(row, column)` index pairs. Every mutation marks the grid dirty
//! so the next [`Grid::arrange`] re-runs dimension resolution.

use std::hash::Hash;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use lattice_core::{check_bounds, Axis, Cell, LayoutError, LayoutResult, Rect, Size, TrackLength};

use crate::options::GridOptions;
use crate::resolve::ResolvedLayout;
use crate::track::{TrackDefinition, TrackEditor};

static NEXT_GRID_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(u64);

impl GridId {
    fn next() -> Self {
        GridId(NEXT_GRID_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// How many rows and columns an item covers from its anchor cell, and
/// whether it takes part in auto-track measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    rows: usize,
    columns: usize,
    auto_measure: bool,
}

impl Default for Span {
    fn default() -> Self {
        Self::ONE
    }
}

impl Span {
    /// A single cell, measured.
    pub const ONE: Self = Self {
        rows: 1,
        columns: 1,
        auto_measure: true,
    };

    pub fn new(rows: usize, columns: usize) -> LayoutResult<Self> {
        if rows == 0 || columns == 0 {
            return Err(LayoutError::invalid_argument(format!(
                "span must cover at least one row and one column, got {rows}x{columns}"
            )));
        }
        Ok(Self {
            rows,
            columns,
            auto_measure: true,
        })
    }

    /// Keep this item out of auto-track measurement.
    pub fn excluded_from_measure(mut self) -> Self {
        self.auto_measure = false;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn participates_in_auto_measure(&self) -> bool {
        self.auto_measure
    }

    pub fn along(&self, axis: Axis) -> usize {
        match axis {
            Axis::Column => self.columns,
            Axis::Row => self.rows,
        }
    }

    fn along_mut(&mut self, axis: Axis) -> &mut usize {
        match axis {
            Axis::Column => &mut self.columns,
            Axis::Row => &mut self.rows,
        }
    }
}

/// Where an item sits: its anchor cell and span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub cell: Cell,
    pub span: Span,
}

impl Placement {
    pub fn new(cell: Cell, span: Span) -> Self {
        Self { cell, span }
    }

    /// Track indices covered along `axis`, cut off at `count` tracks.
    pub fn tracks(&self, axis: Axis, count: usize) -> Range<usize> {
        let start = self.cell.index(axis).min(count);
        let end = start.saturating_add(self.span.along(axis)).min(count);
        start..end
    }
}

/// A grid of rows and columns holding content items keyed by `K`.
#[derive(Debug)]
pub struct Grid<K> {
    id: GridId,
    structure_version: u64,
    columns: Vec<TrackDefinition>,
    rows: Vec<TrackDefinition>,
    items: IndexMap<K, Placement>,
    options: GridOptions,
    /// Row-major cell rectangles from the last arrange
    cell_bounds: Vec<Rect>,
    layout: Option<ResolvedLayout>,
    arranged_for: Option<Size>,
    dirty: bool,
}

impl<K: Hash + Eq> Default for Grid<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones get their own identity so drag sessions never cross over.
impl<K: Clone> Clone for Grid<K> {
    fn clone(&self) -> Self {
        Self {
            id: GridId::next(),
            structure_version: self.structure_version,
            columns: self.columns.clone(),
            rows: self.rows.clone(),
            items: self.items.clone(),
            options: self.options,
            cell_bounds: self.cell_bounds.clone(),
            layout: self.layout.clone(),
            arranged_for: self.arranged_for,
            dirty: self.dirty,
        }
    }
}

impl<K: Hash + Eq> Grid<K> {
    /// Create an empty grid with default options.
    pub fn new() -> Self {
        Self {
            id: GridId::next(),
            structure_version: 0,
            columns: Vec::new(),
            rows: Vec::new(),
            items: IndexMap::new(),
            options: GridOptions::default(),
            cell_bounds: Vec::new(),
            layout: None,
            arranged_for: None,
            dirty: true,
        }
    }

    pub fn with_options(options: GridOptions) -> LayoutResult<Self> {
        let mut grid = Self::new();
        grid.set_options(options)?;
        Ok(grid)
    }

    pub fn id(&self) -> GridId {
        self.id
    }

    /// Bumped whenever a track is inserted or removed.
    pub fn structure_version(&self) -> u64 {
        self.structure_version
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: GridOptions) -> LayoutResult<()> {
        options.validate()?;
        if options != self.options {
            self.options = options;
            self.invalidate();
        }
        Ok(())
    }

    /// Whether the cached layout is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force the next arrange to re-resolve, e.g. after content changed its
    /// measured size.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    // ── Tracks ─────────────────────────────────────────────────────────────

    pub fn tracks(&self, axis: Axis) -> &[TrackDefinition] {
        match axis {
            Axis::Column => &self.columns,
            Axis::Row => &self.rows,
        }
    }

    fn tracks_mut(&mut self, axis: Axis) -> &mut Vec<TrackDefinition> {
        match axis {
            Axis::Column => &mut self.columns,
            Axis::Row => &mut self.rows,
        }
    }

    pub fn columns(&self) -> &[TrackDefinition] {
        &self.columns
    }

    pub fn rows(&self) -> &[TrackDefinition] {
        &self.rows
    }

    pub fn track(&self, axis: Axis, index: usize) -> Option<&TrackDefinition> {
        self.tracks(axis).get(index)
    }

    pub fn track_count(&self, axis: Axis) -> usize {
        self.tracks(axis).len()
    }

    /// Append a track and return its index.
    pub fn add_track(&mut self, axis: Axis, track: TrackDefinition) -> usize {
        let index = self.track_count(axis);
        self.tracks_mut(axis).push(track);
        self.structure_changed();
        index
    }

    pub fn add_column(&mut self, track: TrackDefinition) -> usize {
        self.add_track(Axis::Column, track)
    }

    pub fn add_row(&mut self, track: TrackDefinition) -> usize {
        self.add_track(Axis::Row, track)
    }

    /// Insert a track before `index`. Items anchored at or after `index`
    /// move along with their tracks; spans straddling the insertion point
    /// grow to keep covering the same tracks.
    pub fn insert_track(
        &mut self,
        axis: Axis,
        index: usize,
        track: TrackDefinition,
    ) -> LayoutResult<()> {
        let count = self.track_count(axis);
        if index > count {
            return Err(LayoutError::invalid_argument(format!(
                "cannot insert {axis:?} at {index}, only {count} tracks"
            )));
        }
        self.tracks_mut(axis).insert(index, track);
        for placement in self.items.values_mut() {
            let anchor = placement.cell.index(axis);
            if anchor >= index {
                *placement.cell.index_mut(axis) += 1;
            } else if anchor + placement.span.along(axis) > index {
                *placement.span.along_mut(axis) += 1;
            }
        }
        self.structure_changed();
        Ok(())
    }

    /// Remove the track at `index`. Items anchored in it are evicted; items
    /// spanning across it lose one track of span.
    pub fn remove_track(&mut self, axis: Axis, index: usize) -> LayoutResult<TrackDefinition> {
        let count = self.track_count(axis);
        if index >= count {
            return Err(LayoutError::invalid_argument(format!(
                "cannot remove {axis:?} {index}, only {count} tracks"
            )));
        }
        let removed = self.tracks_mut(axis).remove(index);
        self.items.retain(|_, placement| placement.cell.index(axis) != index);
        for placement in self.items.values_mut() {
            let anchor = placement.cell.index(axis);
            if anchor > index {
                *placement.cell.index_mut(axis) -= 1;
            } else if anchor + placement.span.along(axis) > index {
                *placement.span.along_mut(axis) -= 1;
            }
        }
        self.structure_changed();
        Ok(removed)
    }

    pub fn set_length(&mut self, axis: Axis, index: usize, length: TrackLength) -> LayoutResult<()> {
        length.validate()?;
        let track = self.track_mut_checked(axis, index)?;
        if track.length() != length {
            track.set_length_unchecked(length);
            self.invalidate();
        }
        Ok(())
    }

    pub fn set_bounds(
        &mut self,
        axis: Axis,
        index: usize,
        min: Option<i32>,
        max: Option<i32>,
    ) -> LayoutResult<()> {
        check_bounds(min, max)?;
        let track = self.track_mut_checked(axis, index)?;
        track.set_bounds_unchecked(min, max);
        self.invalidate();
        Ok(())
    }

    /// Rewrite lengths and extents of one axis in place. Offsets along the
    /// axis are recomputed from the new extents afterwards, cell bounds are
    /// rebuilt from them, and the grid is marked dirty. [`Grid::layout`]
    /// keeps the snapshot of the last arrange until the next one.
    pub fn update_tracks<R>(&mut self, axis: Axis, edit: impl FnOnce(&mut TrackEditor<'_>) -> R) -> R {
        let result = {
            let mut editor = TrackEditor::new(self.tracks_mut(axis));
            edit(&mut editor)
        };
        self.reflow_offsets(axis);
        self.rebuild_cell_bounds();
        self.invalidate();
        result
    }

    fn track_mut_checked(&mut self, axis: Axis, index: usize) -> LayoutResult<&mut TrackDefinition> {
        let count = self.track_count(axis);
        self.tracks_mut(axis).get_mut(index).ok_or_else(|| {
            LayoutError::invalid_argument(format!("{axis:?} {index} out of range ({count} tracks)"))
        })
    }

    fn structure_changed(&mut self) {
        self.structure_version += 1;
        self.cell_bounds.clear();
        self.invalidate();
    }

    /// Lay tracks end to end from their current extents.
    pub(crate) fn reflow_offsets(&mut self, axis: Axis) {
        let spacing = self.options.spacing(axis);
        let mut offset = self.options.leading_margin();
        for track in self.tracks_mut(axis).iter_mut() {
            let extent = track.extent();
            track.set_resolved(offset, extent);
            offset += extent + spacing;
        }
    }

    // ── Content ────────────────────────────────────────────────────────────

    /// Anchor `item` at `cell` with `span`. An item already in the grid is
    /// moved, and its previous placement returned.
    pub fn place(&mut self, item: K, cell: Cell, span: Span) -> LayoutResult<Option<Placement>> {
        if cell.row >= self.rows.len() || cell.column >= self.columns.len() {
            return Err(LayoutError::invalid_argument(format!(
                "cell ({}, {}) outside {}x{} grid",
                cell.row,
                cell.column,
                self.rows.len(),
                self.columns.len()
            )));
        }
        let previous = self.items.insert(item, Placement::new(cell, span));
        self.invalidate();
        Ok(previous)
    }

    pub fn remove_item(&mut self, item: &K) -> Option<Placement> {
        let removed = self.items.shift_remove(item);
        if removed.is_some() {
            self.invalidate();
        }
        removed
    }

    pub fn placement(&self, item: &K) -> Option<Placement> {
        self.items.get(item).copied()
    }

    pub fn contains_item(&self, item: &K) -> bool {
        self.items.contains_key(item)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// All items with their placements, in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (&K, &Placement)> {
        self.items.iter()
    }

    /// Items anchored at `cell`.
    pub fn items_in_cell(&self, cell: Cell) -> impl Iterator<Item = &K> {
        self.items
            .iter()
            .filter(move |(_, placement)| placement.cell == cell)
            .map(|(item, _)| item)
    }

    pub(crate) fn item_map(&self) -> &IndexMap<K, Placement> {
        &self.items
    }

    // ── Resolved state ─────────────────────────────────────────────────────

    /// Snapshot from the last arrange, if any. Track edits made through
    /// [`Grid::update_tracks`] show up in the tracks and cell bounds right
    /// away but only reach this snapshot on the next arrange.
    pub fn layout(&self) -> Option<&ResolvedLayout> {
        self.layout.as_ref()
    }

    /// Bounds of one cell from the last arrange.
    pub fn cell_bounds(&self, cell: Cell) -> Option<Rect> {
        if cell.row >= self.rows.len() || cell.column >= self.columns.len() {
            return None;
        }
        self.cell_bounds
            .get(cell.row * self.columns.len() + cell.column)
            .copied()
    }

    /// Every cell with its bounds, row by row.
    pub fn cell_bounds_iter(&self) -> impl Iterator<Item = (Cell, Rect)> + '_ {
        let columns = self.columns.len().max(1);
        self.cell_bounds
            .iter()
            .enumerate()
            .map(move |(i, rect)| (Cell::new(i / columns, i % columns), *rect))
    }

    /// Union of the cells an item covers.
    pub fn item_bounds(&self, item: &K) -> Option<Rect> {
        let placement = self.items.get(item)?;
        let rows = placement.tracks(Axis::Row, self.rows.len());
        let columns = placement.tracks(Axis::Column, self.columns.len());
        if rows.is_empty() || columns.is_empty() {
            return None;
        }
        let first = self.cell_bounds(Cell::new(rows.start, columns.start))?;
        let last = self.cell_bounds(Cell::new(rows.end - 1, columns.end - 1))?;
        Some(first.union(&last))
    }

    pub(crate) fn arranged_for(&self) -> Option<Size> {
        self.arranged_for
    }

    /// Recompute every cell rectangle from the current track offsets and
    /// extents, inset for gridlines when they are shown.
    fn rebuild_cell_bounds(&mut self) {
        self.cell_bounds.clear();
        let inset = if self.options.show_gridlines {
            self.options.gridline_margin
        } else {
            0
        };
        for row in &self.rows {
            for column in &self.columns {
                let rect = Rect::new(column.offset(), row.offset(), column.extent(), row.extent());
                self.cell_bounds.push(rect.deflate(inset));
            }
        }
    }

    pub(crate) fn store_arrangement(
        &mut self,
        available: Size,
        layout: ResolvedLayout,
        column_offsets: &[i32],
        row_offsets: &[i32],
    ) {
        for (axis, sizes, offsets) in [
            (Axis::Column, &layout.column_sizes, column_offsets),
            (Axis::Row, &layout.row_sizes, row_offsets),
        ] {
            for ((track, &size), &offset) in self.tracks_mut(axis).iter_mut().zip(sizes).zip(offsets) {
                track.set_resolved(offset, size);
            }
        }

        self.rebuild_cell_bounds();
        self.layout = Some(layout);
        self.arranged_for = Some(available);
        self.dirty = false;
    }
}
