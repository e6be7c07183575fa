//! Pixel-center grids and the shape tests that use them.

use ndarray::{Array2, Zip};

use super::Point;
use crate::Mask;

/// Pixel-center coordinates for an image shape.
///
/// `xc[[i, j]] == i + 0.5` and `yc[[i, j]] == j + 0.5`.
#[derive(Debug, Clone)]
pub struct CenterGrid {
    shape: (usize, usize),
    pub xc: Array2<f64>,
    pub yc: Array2<f64>,
}

impl CenterGrid {
    pub fn new(shape: (usize, usize)) -> Self {
        Self {
            shape,
            xc: Array2::from_shape_fn(shape, |(x, _)| x as f64 + 0.5),
            yc: Array2::from_shape_fn(shape, |(_, y)| y as f64 + 0.5),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }
}

/// Center grids keyed by image shape.
///
/// The grid is rebuilt only when a different shape is requested.
#[derive(Debug, Clone, Default)]
pub struct GridCache {
    grid: Option<CenterGrid>,
    builds: usize,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, shape: (usize, usize)) -> &CenterGrid {
        if !matches!(&self.grid, Some(grid) if grid.shape == shape) {
            self.grid = Some(CenterGrid::new(shape));
            self.builds += 1;
        }
        self.grid.get_or_insert_with(|| CenterGrid::new(shape))
    }

    /// How many times a grid has been computed.
    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn invalidate(&mut self) {
        self.grid = None;
    }
}

/// Pixels whose center lies in the closed box spanned by two corners.
///
/// Corner order does not matter. A box with zero width or height selects
/// nothing.
pub fn rasterize_rectangle(corner1: Point, corner2: Point, grid: &CenterGrid) -> Mask {
    let (x0, x1) = (corner1.x.min(corner2.x), corner1.x.max(corner2.x));
    let (y0, y1) = (corner1.y.min(corner2.y), corner1.y.max(corner2.y));
    if x0 == x1 || y0 == y1 {
        return Array2::from_elem(grid.shape, false);
    }

    Zip::from(&grid.xc)
        .and(&grid.yc)
        .par_map_collect(|&x, &y| x0 <= x && x <= x1 && y0 <= y && y <= y1)
}

/// Pixels whose center is within `radius` of `center` (boundary inclusive).
pub fn rasterize_circle(center: Point, radius: f64, grid: &CenterGrid) -> Mask {
    if !(radius >= 0.0) {
        return Array2::from_elem(grid.shape, false);
    }
    let r_sq = radius * radius;

    Zip::from(&grid.xc).and(&grid.yc).par_map_collect(|&x, &y| {
        let dx = x - center.x;
        let dy = y - center.y;
        dx * dx + dy * dy <= r_sq
    })
}
