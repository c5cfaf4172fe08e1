//! Core value types for grid layout.

use glam::IVec2;

/// Any available dimension at or above this value is treated as unbounded.
pub const UNBOUNDED: i32 = i32::MAX / 2;

/// A width/height pair in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Self = Self::new(0, 0);
    pub const UNBOUNDED: Self = Self::new(UNBOUNDED, UNBOUNDED);

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Extent along an axis (width for columns, height for rows).
    pub fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Column => self.width,
            Axis::Row => self.height,
        }
    }

    /// Build a size from a main-axis extent and a cross-axis extent.
    pub fn from_axis(axis: Axis, main: i32, cross: i32) -> Self {
        match axis {
            Axis::Column => Self::new(main, cross),
            Axis::Row => Self::new(cross, main),
        }
    }

    pub fn is_unbounded(&self, axis: Axis) -> bool {
        self.along(axis) >= UNBOUNDED
    }

    pub fn to_ivec2(self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }
}

impl From<IVec2> for Size {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// A position in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a rectangle with position and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the right edge (x + width).
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Get the bottom edge (y + height).
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Compute union (bounding box) with another rectangle.
    pub fn union(&self, other: &Rect) -> Rect {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Shrink by `amount` on every side. The size never goes negative; a
    /// rectangle too small to inset collapses onto its center line.
    pub fn deflate(&self, amount: i32) -> Rect {
        let dx = amount.min(self.width / 2);
        let dy = amount.min(self.height / 2);
        Rect::new(
            self.x + dx,
            self.y + dy,
            self.width - 2 * dx,
            self.height - 2 * dy,
        )
    }
}

/// The two layout axes. Columns are laid out along x, rows along y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Column widths (horizontal)
    Column,
    /// Row heights (vertical)
    Row,
}

impl Axis {
    pub fn cross(self) -> Axis {
        match self {
            Axis::Column => Axis::Row,
            Axis::Row => Axis::Column,
        }
    }

    /// Axis resized by a drag handle with the given extent: a handle taller
    /// than it is wide sits between columns.
    pub fn for_handle(handle: Size) -> Axis {
        if handle.height >= handle.width {
            Axis::Column
        } else {
            Axis::Row
        }
    }
}

/// A (row, column) pair addressing one grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: usize,
    pub column: usize,
}

impl Cell {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Index of this cell along an axis.
    pub fn index(&self, axis: Axis) -> usize {
        match axis {
            Axis::Column => self.column,
            Axis::Row => self.row,
        }
    }

    pub fn index_mut(&mut self, axis: Axis) -> &mut usize {
        match axis {
            Axis::Column => &mut self.column,
            Axis::Row => &mut self.row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_along_axis() {
        let size = Size::new(120, 40);
        assert_eq!(size.along(Axis::Column), 120);
        assert_eq!(size.along(Axis::Row), 40);
        assert_eq!(Size::from_axis(Axis::Row, 40, 120), size);
    }

    #[test]
    fn test_unbounded() {
        assert!(Size::UNBOUNDED.is_unbounded(Axis::Column));
        assert!(!Size::new(800, UNBOUNDED).is_unbounded(Axis::Column));
        assert!(Size::new(800, UNBOUNDED).is_unbounded(Axis::Row));
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 5, 10, 10);
        assert_eq!(a.union(&b), Rect::new(0, 0, 30, 15));
    }

    #[test]
    fn test_rect_deflate() {
        assert_eq!(Rect::new(10, 10, 50, 20).deflate(2), Rect::new(12, 12, 46, 16));
        // Too small to inset by the full amount
        assert_eq!(Rect::new(0, 0, 3, 10).deflate(2), Rect::new(1, 2, 1, 6));
    }

    #[test]
    fn test_axis_for_handle() {
        assert_eq!(Axis::for_handle(Size::new(5, 300)), Axis::Column);
        assert_eq!(Axis::for_handle(Size::new(300, 5)), Axis::Row);
        assert_eq!(Axis::Column.cross(), Axis::Row);
    }

    #[test]
    fn test_ivec2_conversion() {
        let size = Size::new(3, 4);
        assert_eq!(Size::from(size.to_ivec2()), size);
    }
}
