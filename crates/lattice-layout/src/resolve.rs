//! Dimension resolution: turning track lengths, bounds, and measured content
//! into concrete pixel sizes for every row and column.
//!
//! Each axis is resolved in two passes. The trivial pass settles fixed and
//! pinned (`min == max`) tracks without looking at content. The ordered pass
//! then visits the remaining tracks auto-first, capped-before-uncapped,
//! min-declaring-before-not, handing weighted tracks their share of what is
//! left and measuring content for auto tracks. Columns are resolved before
//! rows so row measurement can use the resolved column widths.

use std::hash::Hash;

use indexmap::IndexMap;
use lattice_core::{Axis, Size, TrackLength};
use smallvec::SmallVec;
use tracing::{debug_span, trace, warn};

use crate::grid::{Grid, Placement};
use crate::measure::Measure;
use crate::options::GridOptions;
use crate::track::TrackDefinition;

/// Which pass of layout is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveMode {
    /// Report how much space the grid needs. Weighted tracks are sized like
    /// auto tracks, capped at their weighted share. Nothing is written back.
    Measure,
    /// Space has been allocated: weighted tracks split the remainder, and
    /// offsets, extents, and cell bounds are stored on the grid.
    Arrange,
}

/// Resolved track sizes and totals, produced fresh by each resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedLayout {
    /// Width of each column, by index
    pub column_sizes: Vec<i32>,
    /// Height of each row, by index
    pub row_sizes: Vec<i32>,
    /// Column widths plus column spacing and edge margins
    pub total_width: i32,
    /// Row heights plus row spacing and edge margins
    pub total_height: i32,
}

impl ResolvedLayout {
    pub fn sizes(&self, axis: Axis) -> &[i32] {
        match axis {
            Axis::Column => &self.column_sizes,
            Axis::Row => &self.row_sizes,
        }
    }

    pub fn total(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Column => self.total_width,
            Axis::Row => self.total_height,
        }
    }

    pub fn total_size(&self) -> Size {
        Size::new(self.total_width, self.total_height)
    }
}

impl<K: Hash + Eq> Grid<K> {
    /// Run one resolution in the given mode.
    pub fn resolve<M: Measure<K>>(
        &mut self,
        available: Size,
        mode: ResolveMode,
        measurer: &mut M,
    ) -> ResolvedLayout {
        match mode {
            ResolveMode::Measure => self.measure(available, measurer),
            ResolveMode::Arrange => self.arrange(available, measurer),
        }
    }

    /// Compute the size the grid needs within `available` without touching
    /// any stored state.
    pub fn measure<M: Measure<K>>(&self, available: Size, measurer: &mut M) -> ResolvedLayout {
        let _span = debug_span!(
            "grid_measure",
            width = available.width,
            height = available.height
        )
        .entered();
        resolve_grid(self, available, ResolveMode::Measure, measurer)
    }

    /// Resolve for real: store offsets and extents on every track, rebuild
    /// cell bounds, and cache the result. A clean grid arranged again at the
    /// same size returns the cached snapshot.
    pub fn arrange<M: Measure<K>>(&mut self, available: Size, measurer: &mut M) -> ResolvedLayout {
        if !self.is_dirty() && self.arranged_for() == Some(available) {
            if let Some(layout) = self.layout() {
                return layout.clone();
            }
        }

        let _span = debug_span!(
            "grid_arrange",
            width = available.width,
            height = available.height
        )
        .entered();
        let layout = resolve_grid(self, available, ResolveMode::Arrange, measurer);
        let column_offsets = offsets(self.options(), Axis::Column, &layout.column_sizes);
        let row_offsets = offsets(self.options(), Axis::Row, &layout.row_sizes);
        self.store_arrangement(available, layout.clone(), &column_offsets, &row_offsets);
        layout
    }
}

/// Leading edge of each track when laid end to end.
fn offsets(options: &GridOptions, axis: Axis, sizes: &[i32]) -> Vec<i32> {
    let spacing = options.spacing(axis);
    let mut offset = options.leading_margin();
    sizes
        .iter()
        .map(|&size| {
            let start = offset;
            offset += size + spacing;
            start
        })
        .collect()
}

fn resolve_grid<K: Hash + Eq, M: Measure<K>>(
    grid: &Grid<K>,
    available: Size,
    mode: ResolveMode,
    measurer: &mut M,
) -> ResolvedLayout {
    let columns = grid.columns();
    let rows = grid.rows();
    if columns.is_empty() || rows.is_empty() {
        return ResolvedLayout {
            column_sizes: vec![0; columns.len()],
            row_sizes: vec![0; rows.len()],
            total_width: 0,
            total_height: 0,
        };
    }

    let available = Size::new(available.width.max(0), available.height.max(0));
    let (column_sizes, total_width) = AxisResolver::new(grid, Axis::Column, available, mode, None)
        .resolve(measurer);
    let (row_sizes, total_height) =
        AxisResolver::new(grid, Axis::Row, available, mode, Some(&column_sizes)).resolve(measurer);

    ResolvedLayout {
        column_sizes,
        row_sizes,
        total_width,
        total_height,
    }
}

type Anchored<'a, K> = SmallVec<[(&'a K, &'a Placement); 4]>;

/// Resolution state for one axis.
struct AxisResolver<'a, K> {
    axis: Axis,
    tracks: &'a [TrackDefinition],
    cross_tracks: &'a [TrackDefinition],
    /// Resolved sizes of the cross axis, when it was resolved first
    cross_sizes: Option<&'a [i32]>,
    items: &'a IndexMap<K, Placement>,
    options: &'a GridOptions,
    available: Size,
    mode: ResolveMode,
    unbounded: bool,
    /// Cross-axis space left after its trivial tracks, for items whose
    /// cross tracks are not resolved yet
    cross_remaining: i32,
    sizes: Vec<Option<i32>>,
}

impl<'a, K: Hash + Eq> AxisResolver<'a, K> {
    fn new(
        grid: &'a Grid<K>,
        axis: Axis,
        available: Size,
        mode: ResolveMode,
        cross_sizes: Option<&'a [i32]>,
    ) -> Self {
        let tracks = grid.tracks(axis);
        let cross_tracks = grid.tracks(axis.cross());
        let options = grid.options();
        let (_, cross_remaining) = trivial_pass(
            cross_tracks,
            available.along(axis.cross()),
            options.total_spacing(axis.cross(), cross_tracks.len()),
        );
        Self {
            axis,
            tracks,
            cross_tracks,
            cross_sizes,
            items: grid.item_map(),
            options,
            available,
            mode,
            unbounded: available.is_unbounded(axis),
            cross_remaining,
            sizes: vec![None; tracks.len()],
        }
    }

    /// Resolve every track; returns the sizes and the axis total.
    fn resolve<M: Measure<K>>(mut self, measurer: &mut M) -> (Vec<i32>, i32) {
        let spacing = self.options.total_spacing(self.axis, self.tracks.len());
        let (sizes, mut remaining) =
            trivial_pass(self.tracks, self.available.along(self.axis), spacing);
        self.sizes = sizes;

        let weights: SmallVec<[f64; 16]> = self
            .tracks
            .iter()
            .enumerate()
            .filter(|(index, _)| self.sizes[*index].is_none())
            .filter_map(|(_, track)| match track.length() {
                TrackLength::Weighted(weight) => Some(weight),
                _ => None,
            })
            .collect();
        let total_weight: f64 = weights.iter().sum();
        let mut remaining_weight = total_weight;
        let mut weighted_left = weights.len();

        let anchored = self.anchored_items();

        for index in self.ordered_tracks() {
            let track = &self.tracks[index];
            let min = track.min_or_zero();
            let max = track.max_size().unwrap_or(i32::MAX);

            let share = match track.length() {
                TrackLength::Weighted(weight) if !self.unbounded => {
                    weighted_left -= 1;
                    if weighted_left == 0 {
                        // Drop accumulated subtraction drift on the last share
                        remaining_weight = weight;
                    }
                    let share = weighted_share(remaining, weight, remaining_weight, total_weight);
                    remaining_weight -= weight;
                    Some(share)
                }
                _ => None,
            };

            let size = if remaining == 0 {
                0
            } else if min > remaining {
                min
            } else if let (Some(share), ResolveMode::Arrange) = (share, self.mode) {
                share.max(min).min(max)
            } else {
                let cap = share.unwrap_or(i32::MAX);
                let constraint = remaining.min(cap).min(max);
                let measured = self.measure_track(index, constraint, &anchored[index], measurer);
                measured.min(cap).max(min)
            };

            let size = size.min(remaining).min(max);
            trace!(axis = ?self.axis, index, size, "resolved track");
            self.sizes[index] = Some(size);
            remaining -= size;
        }

        let sizes: Vec<i32> = self.sizes.iter().map(|size| size.unwrap_or(0)).collect();
        let total = sizes.iter().sum::<i32>() + spacing;
        (sizes, total)
    }

    /// Non-trivial tracks in resolution order. The sort is stable, so index
    /// order breaks any remaining ties.
    fn ordered_tracks(&self) -> SmallVec<[usize; 16]> {
        let mut order: SmallVec<[usize; 16]> = (0..self.tracks.len())
            .filter(|&index| self.sizes[index].is_none())
            .collect();
        order.sort_by_key(|&index| {
            let track = &self.tracks[index];
            let tier = match track.length() {
                TrackLength::Weighted(_) if !self.unbounded => 1,
                _ => 0,
            };
            (
                tier,
                track.max_size().is_none(),
                track.min_size().is_none(),
            )
        });
        order
    }

    /// Measurable items bucketed by their anchor track on this axis.
    fn anchored_items(&self) -> Vec<Anchored<'a, K>> {
        let items: &'a IndexMap<K, Placement> = self.items;
        let mut anchored: Vec<Anchored<'a, K>> = vec![SmallVec::new(); self.tracks.len()];
        for (item, placement) in items {
            if !placement.span.participates_in_auto_measure() {
                continue;
            }
            let anchor = placement.cell.index(self.axis);
            let cross_anchor = placement.cell.index(self.axis.cross());
            if anchor >= self.tracks.len() || cross_anchor >= self.cross_tracks.len() {
                debug_assert!(false, "item anchored outside the grid at {:?}", placement.cell);
                warn!(cell = ?placement.cell, "skipping item anchored outside the grid");
                continue;
            }
            anchored[anchor].push((item, placement));
        }
        anchored
    }

    /// Largest contribution of the items anchored in one track.
    fn measure_track<M: Measure<K>>(
        &self,
        index: usize,
        constraint: i32,
        items: &[(&K, &Placement)],
        measurer: &mut M,
    ) -> i32 {
        let spacing = self.options.spacing(self.axis);
        let mut largest = 0;
        for &(item, placement) in items {
            let spanned = placement.tracks(self.axis, self.tracks.len());
            let inner_spacing = spacing * (spanned.len() as i32 - 1);
            let others: i32 = spanned
                .filter(|&other| other != index)
                .filter_map(|other| self.sizes[other])
                .sum();
            let borrowed = others + inner_spacing;

            let main = constraint.saturating_add(borrowed);
            let cross = self.cross_constraint(placement);
            let measured = measurer
                .measure(item, Size::from_axis(self.axis, main, cross))
                .along(self.axis);
            largest = largest.max(measured - borrowed);
        }
        largest.max(0)
    }

    /// Cross-axis room for an item while this axis is being resolved.
    fn cross_constraint(&self, placement: &Placement) -> i32 {
        let cross = self.axis.cross();
        let spanned = placement.tracks(cross, self.cross_tracks.len());
        let inner_spacing = self.options.spacing(cross) * (spanned.len() as i32 - 1);

        if let Some(sizes) = self.cross_sizes {
            return sizes[spanned].iter().sum::<i32>() + inner_spacing;
        }

        // Cross axis not resolved yet: exact when every spanned track is
        // trivial, otherwise whatever its trivial tracks left over.
        let trivial: Option<i32> = self.cross_tracks[spanned]
            .iter()
            .map(TrackDefinition::trivial_size)
            .sum();
        match trivial {
            Some(total) => total + inner_spacing,
            None => self.cross_remaining,
        }
    }
}

/// Fixed and pinned tracks take their size, clamped to what is left of
/// `available` after `spacing`. Returns per-track sizes (`None` for tracks
/// still to resolve) and the space left over.
fn trivial_pass(tracks: &[TrackDefinition], available: i32, spacing: i32) -> (Vec<Option<i32>>, i32) {
    let mut remaining = available.saturating_sub(spacing).max(0);
    let sizes = tracks
        .iter()
        .map(|track| {
            track.trivial_size().map(|size| {
                let size = size.clamp(0, remaining);
                remaining -= size;
                size
            })
        })
        .collect();
    (sizes, remaining)
}

/// `remaining × weight / remaining_weight`, rounded half to even.
///
/// `total_weight` is the weight the pass started with; it scales the
/// tolerance for float drift in `remaining_weight`.
fn weighted_share(remaining: i32, weight: f64, remaining_weight: f64, total_weight: f64) -> i32 {
    debug_assert!(
        remaining_weight > 0.0 && weight <= remaining_weight + total_weight * 1e-9,
        "weight {weight} exceeds remaining weight {remaining_weight}"
    );
    if remaining_weight <= 0.0 {
        return remaining;
    }
    let ratio = (weight / remaining_weight).min(1.0);
    let share = (remaining as f64 * ratio).round_ties_even();
    share.min(remaining as f64) as i32
}
