//! Grid-wide layout options.

use lattice_core::{Axis, LayoutError, LayoutResult};

/// Spacing and gridline configuration for a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridOptions {
    /// Gap between adjacent columns
    pub column_spacing: i32,
    /// Gap between adjacent rows
    pub row_spacing: i32,
    /// Inset cell bounds by `gridline_margin` so content clears drawn lines
    pub show_gridlines: bool,
    /// Reserve `gridline_margin` at both outer edges of each axis
    pub edge_gridlines: bool,
    /// Width reserved around a gridline
    pub gridline_margin: i32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            column_spacing: 0,
            row_spacing: 0,
            show_gridlines: false,
            edge_gridlines: false,
            gridline_margin: 1,
        }
    }
}

impl GridOptions {
    /// Set the same spacing on both axes.
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.column_spacing = spacing;
        self.row_spacing = spacing;
        self
    }

    pub fn with_column_spacing(mut self, spacing: i32) -> Self {
        self.column_spacing = spacing;
        self
    }

    pub fn with_row_spacing(mut self, spacing: i32) -> Self {
        self.row_spacing = spacing;
        self
    }

    /// Enable gridlines between tracks, and optionally around the edges.
    pub fn with_gridlines(mut self, margin: i32, edges: bool) -> Self {
        self.show_gridlines = true;
        self.edge_gridlines = edges;
        self.gridline_margin = margin;
        self
    }

    pub fn validate(&self) -> LayoutResult<()> {
        if self.column_spacing < 0 || self.row_spacing < 0 {
            return Err(LayoutError::invalid_argument(format!(
                "spacing must not be negative, got column {} / row {}",
                self.column_spacing, self.row_spacing
            )));
        }
        if self.gridline_margin < 0 {
            return Err(LayoutError::invalid_argument(format!(
                "gridline margin must not be negative, got {}",
                self.gridline_margin
            )));
        }
        Ok(())
    }

    pub fn spacing(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Column => self.column_spacing,
            Axis::Row => self.row_spacing,
        }
    }

    /// Space reserved before the first track of an axis.
    pub fn leading_margin(&self) -> i32 {
        if self.edge_gridlines {
            self.gridline_margin
        } else {
            0
        }
    }

    /// Total non-track space along an axis with `count` tracks.
    pub fn total_spacing(&self, axis: Axis, count: usize) -> i32 {
        let gaps = count.saturating_sub(1) as i32;
        self.spacing(axis).saturating_mul(gaps) + 2 * self.leading_margin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_spacing() {
        let options = GridOptions::default().with_column_spacing(4);
        assert_eq!(options.total_spacing(Axis::Column, 0), 0);
        assert_eq!(options.total_spacing(Axis::Column, 1), 0);
        assert_eq!(options.total_spacing(Axis::Column, 3), 8);
        assert_eq!(options.total_spacing(Axis::Row, 3), 0);
    }

    #[test]
    fn test_edge_gridlines_reserve_margin() {
        let options = GridOptions::default().with_spacing(2).with_gridlines(3, true);
        assert_eq!(options.leading_margin(), 3);
        assert_eq!(options.total_spacing(Axis::Row, 3), 4 + 6);

        let inner_only = GridOptions::default().with_gridlines(3, false);
        assert_eq!(inner_only.leading_margin(), 0);
    }

    #[test]
    fn test_validate() {
        assert!(GridOptions::default().validate().is_ok());
        assert!(GridOptions::default().with_spacing(-1).validate().is_err());
        assert!(GridOptions::default().with_gridlines(-2, true).validate().is_err());
    }
}
