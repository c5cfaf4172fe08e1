//! Content measurement seam.

use lattice_core::Size;

/// Reports the minimum size a content item needs within a constraint.
///
/// Implementations must be synchronous and must not touch grid state; they
/// may cache internally.
pub trait Measure<K> {
    fn measure(&mut self, item: &K, constraint: Size) -> Size;
}

impl<K, F> Measure<K> for F
where
    F: FnMut(&K, Size) -> Size,
{
    fn measure(&mut self, item: &K, constraint: Size) -> Size {
        self(item, constraint)
    }
}

/// A measurer for grids whose content never contributes to auto sizing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContent;

impl<K> Measure<K> for NoContent {
    fn measure(&mut self, _item: &K, _constraint: Size) -> Size {
        Size::ZERO
    }
}
