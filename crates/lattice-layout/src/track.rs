//! Row and column definitions.

use lattice_core::{check_bounds, LayoutError, LayoutResult, TrackLength};

/// One row or column: its sizing rule, optional pixel bounds, and the
/// position/size it was last resolved to.
///
/// A track's index is its position in the owning grid's collection; it is
/// not stored here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackDefinition {
    length: TrackLength,
    min_size: Option<i32>,
    max_size: Option<i32>,
    offset: i32,
    extent: i32,
}

impl Default for TrackDefinition {
    fn default() -> Self {
        Self::auto()
    }
}

impl TrackDefinition {
    /// Create an unbounded track with the given length. Negative pixel
    /// lengths and non-positive weights are rejected.
    pub fn new(length: TrackLength) -> LayoutResult<Self> {
        length.validate()?;
        Ok(Self::unchecked(length))
    }

    fn unchecked(length: TrackLength) -> Self {
        Self {
            length,
            min_size: None,
            max_size: None,
            offset: 0,
            extent: 0,
        }
    }

    pub fn auto() -> Self {
        Self::unchecked(TrackLength::Auto)
    }

    pub fn fixed(pixels: i32) -> LayoutResult<Self> {
        Self::new(TrackLength::Fixed(pixels))
    }

    pub fn weighted(weight: f64) -> LayoutResult<Self> {
        Self::new(TrackLength::Weighted(weight))
    }

    /// Set both bounds at once.
    pub fn with_bounds(mut self, min: Option<i32>, max: Option<i32>) -> LayoutResult<Self> {
        check_bounds(min, max)?;
        self.min_size = min;
        self.max_size = max;
        Ok(self)
    }

    pub fn with_min(self, min: i32) -> LayoutResult<Self> {
        let max = self.max_size;
        self.with_bounds(Some(min), max)
    }

    pub fn with_max(self, max: i32) -> LayoutResult<Self> {
        let min = self.min_size;
        self.with_bounds(min, Some(max))
    }

    pub fn length(&self) -> TrackLength {
        self.length
    }

    pub fn min_size(&self) -> Option<i32> {
        self.min_size
    }

    pub fn max_size(&self) -> Option<i32> {
        self.max_size
    }

    /// Position of the track's leading edge from the last resolution.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Size of the track from the last resolution.
    pub fn extent(&self) -> i32 {
        self.extent
    }

    /// Lower bound, treating an absent minimum as zero.
    pub fn min_or_zero(&self) -> i32 {
        self.min_size.unwrap_or(0)
    }

    /// The size this track resolves to without measuring content, if any:
    /// the pinned size when `min == max`, otherwise a fixed length clamped
    /// into its bounds.
    pub fn trivial_size(&self) -> Option<i32> {
        match (self.min_size, self.max_size) {
            (Some(min), Some(max)) if min == max => return Some(min),
            _ => {}
        }
        match self.length {
            TrackLength::Fixed(pixels) => Some(self.clamp_to_bounds(pixels)),
            TrackLength::Auto | TrackLength::Weighted(_) => None,
        }
    }

    pub fn is_trivial(&self) -> bool {
        self.trivial_size().is_some()
    }

    /// Clamp a size into `[min, max]`.
    pub fn clamp_to_bounds(&self, size: i32) -> i32 {
        let size = self.max_size.map_or(size, |max| size.min(max));
        self.min_size.map_or(size, |min| size.max(min))
    }

    pub(crate) fn set_length_unchecked(&mut self, length: TrackLength) {
        self.length = length;
    }

    pub(crate) fn set_bounds_unchecked(&mut self, min: Option<i32>, max: Option<i32>) {
        self.min_size = min;
        self.max_size = max;
    }

    pub(crate) fn set_resolved(&mut self, offset: i32, extent: i32) {
        self.offset = offset;
        self.extent = extent;
    }
}

/// Write access to one axis of a grid's tracks, handed out by
/// [`Grid::update_tracks`](crate::Grid::update_tracks) for interactive
/// resizing. Lengths and extents may change; the track count may not.
#[derive(Debug)]
pub struct TrackEditor<'a> {
    tracks: &'a mut [TrackDefinition],
}

impl<'a> TrackEditor<'a> {
    pub(crate) fn new(tracks: &'a mut [TrackDefinition]) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrackDefinition> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[TrackDefinition] {
        self.tracks
    }

    /// Replace a track's length. Out-of-range indices and invalid lengths
    /// are rejected.
    pub fn set_length(&mut self, index: usize, length: TrackLength) -> LayoutResult<()> {
        length.validate()?;
        let track = self.tracks.get_mut(index).ok_or_else(|| {
            LayoutError::invalid_state(format!("track index {index} out of range"))
        })?;
        track.length = length;
        Ok(())
    }

    /// Overwrite a track's resolved extent.
    pub fn set_extent(&mut self, index: usize, extent: i32) -> LayoutResult<()> {
        let track = self.tracks.get_mut(index).ok_or_else(|| {
            LayoutError::invalid_state(format!("track index {index} out of range"))
        })?;
        track.extent = extent.max(0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_validation() {
        assert!(TrackDefinition::auto().with_bounds(Some(10), Some(5)).is_err());
        assert!(TrackDefinition::auto().with_min(10).unwrap().with_max(5).is_err());
        let track = TrackDefinition::auto().with_min(5).unwrap().with_max(10).unwrap();
        assert_eq!(track.min_size(), Some(5));
        assert_eq!(track.max_size(), Some(10));
    }

    #[test]
    fn test_trivial_size() {
        assert_eq!(TrackDefinition::fixed(25).unwrap().trivial_size(), Some(25));
        assert_eq!(TrackDefinition::auto().trivial_size(), None);
        assert_eq!(TrackDefinition::weighted(1.0).unwrap().trivial_size(), None);

        let pinned = TrackDefinition::weighted(2.0)
            .unwrap()
            .with_bounds(Some(40), Some(40))
            .unwrap();
        assert_eq!(pinned.trivial_size(), Some(40));

        let clamped = TrackDefinition::fixed(200).unwrap().with_max(120).unwrap();
        assert_eq!(clamped.trivial_size(), Some(120));
    }

    #[test]
    fn test_new_rejects_malformed_lengths() {
        for length in [TrackLength::Weighted(0.0), TrackLength::Weighted(-2.0), TrackLength::Fixed(-5)] {
            let err = TrackDefinition::new(length).unwrap_err();
            assert!(matches!(err, LayoutError::InvalidArgument { .. }), "{length:?}");
        }
        assert!(TrackDefinition::fixed(-1).is_err());
        assert!(TrackDefinition::weighted(f64::NAN).is_err());
        assert_eq!(
            TrackDefinition::new(TrackLength::Fixed(0)).unwrap().length(),
            TrackLength::Fixed(0)
        );
        assert_eq!(TrackDefinition::default(), TrackDefinition::auto());
    }

    #[test]
    fn test_clamp_to_bounds() {
        let track = TrackDefinition::auto()
            .with_bounds(Some(20), Some(50))
            .unwrap();
        assert_eq!(track.clamp_to_bounds(10), 20);
        assert_eq!(track.clamp_to_bounds(35), 35);
        assert_eq!(track.clamp_to_bounds(90), 50);
    }

    #[test]
    fn test_editor_rejects_out_of_range() {
        let mut tracks = vec![TrackDefinition::auto()];
        let mut editor = TrackEditor::new(&mut tracks);
        assert!(editor.set_length(3, TrackLength::Auto).is_err());
        assert!(editor.set_length(0, TrackLength::Weighted(-1.0)).is_err());
        editor.set_length(0, TrackLength::Fixed(10)).unwrap();
        editor.set_extent(0, 10).unwrap();
        assert_eq!(tracks[0].length(), TrackLength::Fixed(10));
        assert_eq!(tracks[0].extent(), 10);
    }
}
