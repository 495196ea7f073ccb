//! Cell grid -> canvas pixel mapping

use crate::drawing::Point;

/// Maps 1-based terminal cells of the canvas area onto framebuffer pixels.
///
/// Each cell spans `width / cols` by `height / rows` canvas pixels; a cell
/// maps to the pixel under its center. When the grid has more cells than the
/// canvas has pixels several cells land on the same pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    cols: u16,
    rows: u16,
    width: u32,
    height: u32,
}

impl CoordinateMapper {
    pub fn new(cols: u16, rows: u16, width: u32, height: u32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Canvas pixels per cell (horizontal, vertical)
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.width as f64 / self.cols as f64,
            self.height as f64 / self.rows as f64,
        )
    }

    /// Whether a 1-based row lies inside the canvas area
    pub fn contains_row(&self, row: u16) -> bool {
        row >= 1 && row <= self.rows
    }

    /// Map a 1-based cell to a pixel, clamped to `[0, w-1] x [0, h-1]`.
    pub fn map(&self, col: u16, row: u16) -> Point {
        let (cw, ch) = self.cell_size();
        let x = ((col as f64 - 0.5) * cw).round();
        let y = ((row as f64 - 0.5) * ch).round();
        Point::new(
            x.clamp(0.0, (self.width - 1) as f64) as i32,
            y.clamp(0.0, (self.height - 1) as f64) as i32,
        )
    }
}
