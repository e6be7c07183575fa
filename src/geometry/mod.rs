//! Rasterization of click/drag geometry into masks.
//!
//! Coordinates are continuous: pixel `(i, j)` covers `[i, i+1) x [j, j+1)`
//! and has its center at `(i + 0.5, j + 0.5)`. The first coordinate indexes
//! the first array axis.
//!
//! - **Polygons**: even-odd scan fill ([`rasterize_polygon`], [`fill_polygon`])
//! - **Rectangles / circles**: tests against cached pixel-center grids
//! - **Brush**: square footprints and wrap-around shifts

pub mod brush;
pub mod grid;
pub mod polygon;

pub use brush::{brush_footprint, set_pixels, shift_wrapped};
pub use grid::{rasterize_circle, rasterize_rectangle, CenterGrid, GridCache};
pub use polygon::{fill_polygon, rasterize_polygon};

use serde::{Deserialize, Serialize};

/// A 2D point with sub-pixel precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Index of the pixel containing this point (may be out of range).
    #[inline]
    pub fn pixel(&self) -> (isize, isize) {
        (self.x.floor() as isize, self.y.floor() as isize)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// In-range pixel index for a possibly out-of-range one.
#[inline]
pub fn checked_pixel(shape: (usize, usize), x: isize, y: isize) -> Option<(usize, usize)> {
    if x >= 0 && y >= 0 && (x as usize) < shape.0 && (y as usize) < shape.1 {
        Some((x as usize, y as usize))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_floor() {
        assert_eq!(Point::new(2.7, 0.2).pixel(), (2, 0));
        assert_eq!(Point::new(-0.5, 3.0).pixel(), (-1, 3));
    }

    #[test]
    fn test_checked_pixel() {
        assert_eq!(checked_pixel((4, 5), 3, 4), Some((3, 4)));
        assert_eq!(checked_pixel((4, 5), 4, 0), None);
        assert_eq!(checked_pixel((4, 5), 0, -1), None);
    }
}
