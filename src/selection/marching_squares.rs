//! Marching Squares algorithm for sub-pixel iso-contour extraction.
//!
//! Contours are traced on the intensity image itself at a given level.
//! Coordinates are array indices: a vertex `(x, y)` lies on the segment
//! between the centers of pixels `(x, y)` and a 4-neighbor. A corner is
//! "above" the level when its value is strictly greater than the level.
//!
//! Edge crossings are interpolated starting from the first corner of the
//! edge (top-left to top-right, top-left to bottom-left, ...), so a pixel
//! whose value equals the level yields a vertex exactly on its grid point.

use std::collections::HashMap;

use ndarray::ArrayView2;

use crate::error::{ensure_shape, MaskError};
use crate::geometry::Point;

/// A contour polyline in pixel-grid coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    pub points: Vec<Point>,
    pub is_closed: bool,
}

impl Contour {
    pub fn new(points: Vec<Point>, is_closed: bool) -> Self {
        Self { points, is_closed }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether one of the vertices is exactly the grid point `(x, y)`.
    pub fn passes_through(&self, x: f64, y: f64) -> bool {
        self.points.iter().any(|p| p.x == x && p.y == y)
    }

    /// Vertices moved to pixel centers, for drawing over the image.
    pub fn preview_points(&self) -> Vec<Point> {
        self.points
            .iter()
            .map(|p| Point::new(p.x + 0.5, p.y + 0.5))
            .collect()
    }
}

/// Extract all iso-contours of `image` at `level`.
pub fn marching_squares(image: ArrayView2<f64>, level: f64) -> Vec<Contour> {
    trace_cells(image, level, None)
}

/// Extract iso-contours, skipping every cell with a corner outside `mask`.
pub fn marching_squares_masked(
    image: ArrayView2<f64>,
    level: f64,
    mask: ArrayView2<bool>,
) -> Result<Vec<Contour>, MaskError> {
    ensure_shape(image.dim(), mask.dim())?;
    Ok(trace_cells(image, level, Some(mask)))
}

fn trace_cells(image: ArrayView2<f64>, level: f64, mask: Option<ArrayView2<bool>>) -> Vec<Contour> {
    let (nx, ny) = image.dim();
    if nx < 2 || ny < 2 || level.is_nan() {
        return Vec::new();
    }

    let mut segments: Vec<(Point, Point)> = Vec::new();

    for r0 in 0..nx - 1 {
        let r1 = r0 + 1;
        for c0 in 0..ny - 1 {
            let c1 = c0 + 1;

            if let Some(mask) = &mask {
                if !(mask[[r0, c0]] && mask[[r0, c1]] && mask[[r1, c0]] && mask[[r1, c1]]) {
                    continue;
                }
            }

            // Get the 4 corners of this cell
            let ul = image[[r0, c0]];
            let ur = image[[r0, c1]];
            let ll = image[[r1, c0]];
            let lr = image[[r1, c1]];
            if ul.is_nan() || ur.is_nan() || ll.is_nan() || lr.is_nan() {
                continue;
            }

            let case = ((ul > level) as u8)
                | (((ur > level) as u8) << 1)
                | (((ll > level) as u8) << 2)
                | (((lr > level) as u8) << 3);

            if case == 0 || case == 15 {
                continue;
            }

            let (r0f, r1f) = (r0 as f64, r1 as f64);
            let (c0f, c1f) = (c0 as f64, c1 as f64);

            let top = Point::new(r0f, c0f + fraction(ul, ur, level));
            let bottom = Point::new(r1f, c0f + fraction(ll, lr, level));
            let left = Point::new(r0f + fraction(ul, ll, level), c0f);
            let right = Point::new(r0f + fraction(ur, lr, level), c1f);

            // Saddles (6, 9) keep the above-level corners apart
            match case {
                1 | 14 => segments.push((top, left)),
                2 | 13 => segments.push((right, top)),
                3 | 12 => segments.push((left, right)),
                4 | 11 => segments.push((left, bottom)),
                5 | 10 => segments.push((top, bottom)),
                6 => {
                    segments.push((right, top));
                    segments.push((left, bottom));
                }
                7 | 8 => segments.push((right, bottom)),
                9 => {
                    segments.push((top, left));
                    segments.push((bottom, right));
                }
                _ => {}
            }
        }
    }

    connect_segments(&segments)
}

/// Position of the level crossing along an edge, measured from `from`.
#[inline]
fn fraction(from: f64, to: f64, level: f64) -> f64 {
    if from == to {
        // Avoid division by zero
        return 0.0;
    }
    (level - from) / (to - from)
}

type PointKey = (i64, i64);

#[inline]
fn key(p: &Point) -> PointKey {
    // Tolerance for point matching
    ((p.x * 1e9).round() as i64, (p.y * 1e9).round() as i64)
}

/// Connect line segments into polylines, closing those that loop.
fn connect_segments(segments: &[(Point, Point)]) -> Vec<Contour> {
    let mut by_point: HashMap<PointKey, Vec<usize>> = HashMap::new();
    for (i, (a, b)) in segments.iter().enumerate() {
        by_point.entry(key(a)).or_default().push(i);
        by_point.entry(key(b)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (a, b) = segments[start];

        let mut forward = vec![a, b];
        extend_chain(&mut forward, segments, &by_point, &mut used);

        let is_closed = forward.len() > 2 && key(&forward[0]) == key(&forward[forward.len() - 1]);
        let points = if is_closed {
            forward.pop(); // Remove duplicate closing point
            forward
        } else {
            // Open chain: walk the other way from the first segment
            let mut backward = vec![b, a];
            extend_chain(&mut backward, segments, &by_point, &mut used);
            let mut points: Vec<Point> = backward[2..].iter().rev().copied().collect();
            points.extend(forward);
            points
        };

        if points.len() >= 2 {
            contours.push(Contour::new(points, is_closed));
        }
    }

    contours
}

/// Append unused segments to the end of `chain` until it closes or stops.
fn extend_chain(
    chain: &mut Vec<Point>,
    segments: &[(Point, Point)],
    by_point: &HashMap<PointKey, Vec<usize>>,
    used: &mut [bool],
) {
    let start = key(&chain[0]);
    while let Some(&tail) = chain.last() {
        let tail_key = key(&tail);
        let next = by_point
            .get(&tail_key)
            .and_then(|ids| ids.iter().copied().find(|&i| !used[i]));
        let Some(i) = next else { break };

        used[i] = true;
        let (p, q) = segments[i];
        let point = if key(&p) == tail_key { q } else { p };
        chain.push(point);

        if key(&point) == start {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Bright 3x3 block of 10 in a ring of 5 on a 0 background (7x7).
    fn ringed_block() -> Array2<f64> {
        Array2::from_shape_fn((7, 7), |(x, y)| {
            if (2..=4).contains(&x) && (2..=4).contains(&y) {
                10.0
            } else if (1..=5).contains(&x) && (1..=5).contains(&y) {
                5.0
            } else {
                0.0
            }
        })
    }

    #[test]
    fn test_flat_image_has_no_contours() {
        let image = Array2::from_elem((5, 5), 3.0);
        assert!(marching_squares(image.view(), 3.0).is_empty());
        assert!(marching_squares(image.view(), 1.0).is_empty());
    }

    #[test]
    fn test_too_small_image() {
        let image = Array2::from_elem((1, 5), 3.0);
        assert!(marching_squares(image.view(), 1.0).is_empty());
    }

    #[test]
    fn test_single_closed_contour() {
        let image = ringed_block();
        let contours = marching_squares(image.view(), 7.5);
        assert_eq!(contours.len(), 1);
        let contour = &contours[0];
        assert!(contour.is_closed);
        // Every vertex sits halfway between a 10 and a 5
        for p in &contour.points {
            let on_row = p.x.fract() == 0.0;
            let on_col = p.y.fract() == 0.0;
            assert!(on_row || on_col);
        }
        assert_eq!(contour.len(), 12);
    }

    #[test]
    fn test_level_equal_to_pixel_hits_grid_points() {
        let image = ringed_block();
        let contours = marching_squares(image.view(), 5.0);
        assert_eq!(contours.len(), 1);
        let contour = &contours[0];
        assert!(contour.is_closed);
        assert!(contour.passes_through(1.0, 3.0));
        assert!(contour.passes_through(3.0, 5.0));
        // Ring corners are not 4-adjacent to the block
        assert!(!contour.passes_through(1.0, 1.0));
    }

    #[test]
    fn test_two_separate_contours() {
        let mut image = Array2::<f64>::zeros((10, 10));
        for x in 1..=2 {
            for y in 1..=2 {
                image[[x, y]] = 10.0;
                image[[x + 5, y + 5]] = 10.0;
            }
        }
        let contours = marching_squares(image.view(), 0.0);
        assert_eq!(contours.len(), 2);
        assert!(contours.iter().all(|c| c.is_closed && c.len() == 8));
    }

    #[test]
    fn test_masked_cells_are_skipped() {
        let mut image = Array2::<f64>::zeros((10, 10));
        for x in 1..=2 {
            for y in 1..=2 {
                image[[x, y]] = 10.0;
                image[[x + 5, y + 5]] = 10.0;
            }
        }
        let mask = Array2::from_shape_fn((10, 10), |(x, y)| x < 5 && y < 5);
        let contours = marching_squares_masked(image.view(), 0.0, mask.view()).unwrap();
        assert_eq!(contours.len(), 1);
        assert!(contours[0].passes_through(0.0, 1.0));

        let wrong = Array2::from_elem((3, 3), true);
        assert!(marching_squares_masked(image.view(), 0.0, wrong.view()).is_err());
    }

    #[test]
    fn test_open_contour_at_image_edge() {
        // Left half bright: the contour runs from one edge to the other
        let image = Array2::from_shape_fn((4, 6), |(_, y)| if y < 3 { 1.0 } else { 0.0 });
        let contours = marching_squares(image.view(), 0.5);
        assert_eq!(contours.len(), 1);
        let contour = &contours[0];
        assert!(!contour.is_closed);
        assert_eq!(contour.len(), 4);
        assert!(contour.points.iter().all(|p| (p.y - 2.5).abs() < 1e-12));
    }

    #[test]
    fn test_preview_points_offset() {
        let contour = Contour::new(vec![Point::new(1.0, 2.0)], false);
        assert_eq!(contour.preview_points(), vec![Point::new(1.5, 2.5)]);
    }
}
