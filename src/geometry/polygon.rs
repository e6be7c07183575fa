//! Even-odd polygon scan fill.

use ndarray::{Array2, Axis};
use rayon::prelude::*;

use super::Point;
use crate::Mask;

/// Rasterize a polygon given in continuous (click) coordinates.
///
/// Vertices are shifted by -0.5 so that a pixel is selected when its center
/// lies inside the polygon. Self-intersecting outlines use the even-odd rule.
/// Fewer than 3 vertices give an empty mask.
pub fn rasterize_polygon(vertices: &[Point], shape: (usize, usize)) -> Mask {
    scan_fill(vertices, shape, -0.5)
}

/// Fill a polygon whose vertices are already on the pixel grid.
///
/// Used for iso-contours, which are traced through pixel indices.
pub fn fill_polygon(vertices: &[Point], shape: (usize, usize)) -> Mask {
    scan_fill(vertices, shape, 0.0)
}

/// Scan fill along the first axis.
///
/// For every scanline `x` the crossings of the polygon edges are collected;
/// grid point `(x, y)` is inside when an odd number of crossings lie
/// strictly above `y`, which for sorted crossings `c` means
/// `c[2k] <= y < c[2k + 1]`.
fn scan_fill(vertices: &[Point], shape: (usize, usize), offset: f64) -> Mask {
    let (nx, ny) = shape;
    let mut mask = Array2::from_elem(shape, false);
    if vertices.len() < 3 || nx == 0 || ny == 0 {
        return mask;
    }

    let pts: Vec<(f64, f64)> = vertices
        .iter()
        .map(|p| (p.x + offset, p.y + offset))
        .collect();
    let n = pts.len();

    let (min_x, max_x) = pts
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, _)| (lo.min(x), hi.max(x)));

    mask.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(x, mut row)| {
            let xf = x as f64;
            if xf < min_x || xf > max_x {
                return;
            }

            let mut crossings = Vec::new();
            for i in 0..n {
                let (x0, y0) = pts[i];
                let (x1, y1) = pts[(i + 1) % n];
                if (x0 > xf) != (x1 > xf) {
                    crossings.push(y0 + (xf - x0) * (y1 - y0) / (x1 - x0));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for pair in crossings.chunks_exact(2) {
                let start = pair[0].ceil().max(0.0);
                let end = pair[1].ceil().min(ny as f64);
                if start < end {
                    for y in start as usize..end as usize {
                        row[y] = true;
                    }
                }
            }
        });

    mask
}
