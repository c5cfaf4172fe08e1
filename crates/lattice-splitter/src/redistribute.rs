//! Moving pixels across a drag handle.
//!
//! Tracks on the side the handle moves toward shrink, tracks on the other
//! side grow. Both sides are visited weighted first, then fixed, then auto,
//! and nearest to the handle first within a tier. Every pixel taken from a
//! shrinking track is handed out before the next track is touched.

use std::ops::Range;

use lattice_core::TrackLength;
use smallvec::SmallVec;

/// A track as it was when the drag began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OriginalTrack {
    pub length: TrackLength,
    pub min: i32,
    pub max: Option<i32>,
    pub extent: i32,
}

impl OriginalTrack {
    fn slack(&self, extent: i32) -> i32 {
        (extent - self.min).max(0)
    }

    fn room(&self, extent: i32) -> i32 {
        match self.max {
            Some(max) => (max - extent).max(0),
            None => i32::MAX,
        }
    }
}

/// New extents for every track plus the signed amount that moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Redistribution {
    pub extents: Vec<i32>,
    pub applied: i32,
    /// Whether the request had to be cut down to fit the bounds
    pub clamped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

type Order = SmallVec<[usize; 8]>;

/// Apply `delta` pixels of handle movement to the drag-start `tracks`.
/// Negative deltas shrink `before` and grow `after`.
pub(crate) fn redistribute(
    tracks: &[OriginalTrack],
    before: Range<usize>,
    after: Range<usize>,
    delta: i32,
) -> Redistribution {
    let mut extents: Vec<i32> = tracks.iter().map(|track| track.extent).collect();
    if delta == 0 {
        return Redistribution {
            extents,
            applied: 0,
            clamped: false,
        };
    }

    let (decreased, increased) = if delta < 0 {
        (priority_order(tracks, before, Side::Before), priority_order(tracks, after, Side::After))
    } else {
        (priority_order(tracks, after, Side::After), priority_order(tracks, before, Side::Before))
    };

    let max_reduction = decreased
        .iter()
        .fold(0i32, |sum, &i| sum.saturating_add(tracks[i].slack(extents[i])));
    let max_increase = increased
        .iter()
        .fold(0i32, |sum, &i| sum.saturating_add(tracks[i].room(extents[i])));
    let requested = delta.saturating_abs();
    let amount = requested.min(max_reduction).min(max_increase);

    let mut to_remove = amount;
    for &shrinking in &decreased {
        if to_remove == 0 {
            break;
        }
        let take = tracks[shrinking].slack(extents[shrinking]).min(to_remove);
        if take == 0 {
            continue;
        }
        extents[shrinking] -= take;
        to_remove -= take;

        let mut to_add = take;
        for &growing in &increased {
            let give = tracks[growing].room(extents[growing]).min(to_add);
            extents[growing] += give;
            to_add -= give;
            if to_add == 0 {
                break;
            }
        }
        debug_assert_eq!(to_add, 0, "growing side ran out of room");
    }

    Redistribution {
        extents,
        applied: if delta < 0 { -amount } else { amount },
        clamped: amount < requested,
    }
}

/// Indices in `range`, weighted tracks first, then fixed, then auto, each
/// tier nearest to the handle first.
fn priority_order(tracks: &[OriginalTrack], range: Range<usize>, side: Side) -> Order {
    let mut order: Order = range.clone().collect();
    order.sort_by_key(|&index| {
        let tier = match tracks[index].length {
            TrackLength::Weighted(_) => 0,
            TrackLength::Fixed(_) => 1,
            TrackLength::Auto => 2,
        };
        let distance = match side {
            Side::Before => range.end - 1 - index,
            Side::After => index - range.start,
        };
        (tier, distance)
    });
    order
}

/// The length a track takes on at `extent`, keeping its original unit.
/// Auto tracks become fixed once moved; left as auto they would be measured
/// straight back to their content size.
pub(crate) fn rewritten_length(original: &OriginalTrack, extent: i32, min_weight: f64) -> TrackLength {
    if extent == original.extent {
        return original.length;
    }
    match original.length {
        TrackLength::Weighted(_) => TrackLength::Weighted((extent as f64).max(min_weight)),
        TrackLength::Fixed(_) | TrackLength::Auto => TrackLength::Fixed(extent),
    }
}
