//! Region growing using flood fill.
//!
//! Grows contiguous regions whose intensities fall inside a closed range.
//! The range comes from the pixels under the seed footprint, widened by a
//! tolerance factor. All fills are 4-connected.

use std::collections::VecDeque;

use ndarray::{Array2, ArrayView2, Zip};

use crate::compositor::{combine_in_place, CombineMode};
use crate::error::{ensure_shape, MaskError};
use crate::Mask;

/// Flood fill result with metadata.
#[derive(Debug, Clone)]
pub struct FloodResult {
    /// Filled pixels
    pub mask: Mask,
    /// Bounds of filled region
    pub bounds: Option<(usize, usize, usize, usize)>, // (x, y, width, height)
    /// Number of filled pixels
    pub pixel_count: usize,
}

/// Breadth-first 4-connected flood fill.
///
/// Starts from every in-range seed and expands through pixels for which
/// `accept(x, y)` is true. Seeds that are not accepted do not expand.
pub fn flood_fill<I, F>(shape: (usize, usize), seeds: I, mut accept: F) -> FloodResult
where
    I: IntoIterator<Item = (usize, usize)>,
    F: FnMut(usize, usize) -> bool,
{
    let (width, height) = shape;
    let mut mask = Array2::from_elem(shape, false);
    let mut visited = Array2::from_elem(shape, false);
    let mut queue = VecDeque::new();

    for (x, y) in seeds {
        if x < width && y < height && !visited[[x, y]] {
            visited[[x, y]] = true;
            queue.push_back((x, y));
        }
    }

    let mut pixel_count = 0;
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;

    while let Some((x, y)) = queue.pop_front() {
        if !accept(x, y) {
            continue;
        }
        mask[[x, y]] = true;
        pixel_count += 1;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);

        // Add unvisited neighbors
        for (dx, dy) in [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx >= 0 && nx < width as isize && ny >= 0 && ny < height as isize {
                let (nx, ny) = (nx as usize, ny as usize);
                if !visited[[nx, ny]] {
                    visited[[nx, ny]] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    let bounds = if pixel_count > 0 {
        Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    } else {
        None
    };

    FloodResult {
        mask,
        bounds,
        pixel_count,
    }
}

/// Closed intensity range `[lower, upper]` used as the growth predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowBounds {
    pub lower: f64,
    pub upper: f64,
}

impl GrowBounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Range centered on the footprint's mid value, `tolerance` times as wide.
    ///
    /// A uniform footprint (`min == max`) gives an exact-match range.
    pub fn from_footprint(min: f64, max: f64, tolerance: f64) -> Self {
        let center = (max + min) / 2.0;
        let half_width = tolerance * (max - min) / 2.0;
        Self {
            lower: center - half_width,
            upper: center + half_width,
        }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Minimum and maximum of the image over `pixels` (NaNs skipped).
pub fn footprint_range(image: ArrayView2<f64>, pixels: &[(usize, usize)]) -> Option<(f64, f64)> {
    pixels
        .iter()
        .map(|&(x, y)| image[[x, y]])
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Minimum and maximum of the whole image (NaNs skipped).
pub fn image_range(image: ArrayView2<f64>) -> Option<(f64, f64)> {
    image
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn grow_region(
    image: ArrayView2<f64>,
    mask: &Mask,
    seeds: &[(usize, usize)],
    bounds: GrowBounds,
) -> Result<FloodResult, MaskError> {
    ensure_shape(mask.dim(), image.dim())?;
    Ok(flood_fill(image.dim(), seeds.iter().copied(), |x, y| {
        bounds.contains(image[[x, y]])
    }))
}

/// Add the connected in-range region reachable from `seeds` to `mask`.
///
/// Returns the number of pixels in the grown region.
pub fn grow_add(
    image: ArrayView2<f64>,
    mask: &mut Mask,
    seeds: &[(usize, usize)],
    bounds: GrowBounds,
) -> Result<usize, MaskError> {
    let region = grow_region(image, mask, seeds, bounds)?;
    combine_in_place(mask, region.mask.view(), CombineMode::Draw)?;
    Ok(region.pixel_count)
}

/// Remove the connected in-range region reachable from `seeds` from `mask`.
pub fn grow_remove(
    image: ArrayView2<f64>,
    mask: &mut Mask,
    seeds: &[(usize, usize)],
    bounds: GrowBounds,
) -> Result<usize, MaskError> {
    let region = grow_region(image, mask, seeds, bounds)?;
    combine_in_place(mask, region.mask.view(), CombineMode::Cut)?;
    Ok(region.pixel_count)
}

/// Every pixel of the image inside `bounds`, connected or not.
pub fn threshold_range(image: ArrayView2<f64>, bounds: GrowBounds) -> Mask {
    Zip::from(&image).par_map_collect(|&v| bounds.contains(v))
}

/// Intensity window adjusted by mouse drags, used by the threshold tool.
///
/// Vertical motion moves the center, horizontal motion changes the width.
/// Both move faster further from the middle of the range / at larger widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdWindow {
    pub center: f64,
    pub width: f64,
    min: f64,
    max: f64,
}

impl ThresholdWindow {
    pub fn new(image: ArrayView2<f64>, center: f64, width: f64) -> Option<Self> {
        let (min, max) = image_range(image)?;
        Some(Self {
            center,
            width: width.max(1.0),
            min,
            max,
        })
    }

    /// Window covering the full intensity range of `image`.
    pub fn for_image(image: ArrayView2<f64>) -> Option<Self> {
        let (min, max) = image_range(image)?;
        Self::new(image, (min + max) / 2.0, max - min)
    }

    /// Apply a mouse drag of `(dx, dy)` screen pixels.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        let range = self.max - self.min;
        let v0 = range / 512.0;
        let a0 = 1.0 / 64.0;

        let vy = v0 + a0 * (self.center - (self.min + range / 2.0)).abs();
        self.center -= vy * dy;

        let vx = v0 + a0 * self.width;
        let width = self.width + vx * dx;
        self.width = if width > 1.0 { width } else { 1.0 };
    }

    pub fn bounds(&self) -> GrowBounds {
        GrowBounds::new(self.center - self.width / 2.0, self.center + self.width / 2.0)
    }

    pub fn apply(&self, image: ArrayView2<f64>) -> Mask {
        threshold_range(image, self.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(mask: &Mask) -> usize {
        mask.iter().filter(|&&v| v).count()
    }

    #[test]
    fn test_uniform_image_fills_everything() {
        let image = Array2::from_elem((5, 5), 10.0);
        let mut mask = Array2::from_elem((5, 5), false);
        let n = grow_add(image.view(), &mut mask, &[(2, 2)], GrowBounds::new(10.0, 10.0)).unwrap();
        assert_eq!(n, 25);
        assert!(mask.iter().all(|&v| v));
    }

    #[test]
    fn test_checkerboard_exact_bounds() {
        // Checkerboard of 0/1 with a solid block of 1s in one corner
        let image = Array2::from_shape_fn((6, 6), |(x, y)| {
            if x < 2 && y < 2 {
                1.0
            } else {
                ((x + y) % 2) as f64
            }
        });
        let mut mask = Array2::from_elem((6, 6), false);
        let n = grow_add(image.view(), &mut mask, &[(0, 0)], GrowBounds::new(1.0, 1.0)).unwrap();

        // The 2x2 block plus the two 1-pixels touching it at (1, 2) and (2, 1)
        assert_eq!(n, 6);
        assert!(mask[[0, 0]] && mask[[1, 1]] && mask[[1, 2]] && mask[[2, 1]]);
        assert!(!mask[[3, 0]]); // same value, but only diagonally connected
        assert!(!mask[[5, 5]]);
    }

    #[test]
    fn test_grow_remove() {
        let image = Array2::from_shape_fn((4, 4), |(x, _)| if x < 2 { 3.0 } else { 9.0 });
        let mut mask = Array2::from_elem((4, 4), true);
        let n = grow_remove(image.view(), &mut mask, &[(0, 0)], GrowBounds::new(2.0, 4.0)).unwrap();
        assert_eq!(n, 8);
        assert_eq!(count(&mask), 8);
        assert!(!mask[[1, 3]]);
        assert!(mask[[2, 0]]);
    }

    #[test]
    fn test_grow_keeps_existing_pixels() {
        let image = Array2::from_shape_fn((3, 3), |(x, y)| (x * 3 + y) as f64);
        let mut mask = Array2::from_elem((3, 3), false);
        mask[[2, 2]] = true;
        grow_add(image.view(), &mut mask, &[(0, 0)], GrowBounds::new(0.0, 1.0)).unwrap();
        assert!(mask[[0, 0]] && mask[[0, 1]] && mask[[2, 2]]);
        assert_eq!(count(&mask), 3);
    }

    #[test]
    fn test_seed_out_of_range_value_does_not_grow() {
        let image = Array2::from_elem((3, 3), 5.0);
        let mut mask = Array2::from_elem((3, 3), false);
        let n = grow_add(image.view(), &mut mask, &[(1, 1)], GrowBounds::new(0.0, 1.0)).unwrap();
        assert_eq!(n, 0);
        assert_eq!(count(&mask), 0);
    }

    #[test]
    fn test_grow_shape_mismatch() {
        let image = Array2::from_elem((3, 3), 5.0);
        let mut mask = Array2::from_elem((3, 4), false);
        assert!(grow_add(image.view(), &mut mask, &[(0, 0)], GrowBounds::new(0.0, 9.0)).is_err());
    }

    #[test]
    fn test_bounds_from_footprint() {
        let b = GrowBounds::from_footprint(10.0, 20.0, 3.0);
        assert_eq!(b, GrowBounds::new(0.0, 30.0));

        // Uniform seed value: exact match only
        let b = GrowBounds::from_footprint(7.0, 7.0, 10.0);
        assert_eq!(b, GrowBounds::new(7.0, 7.0));
        assert!(b.contains(7.0));
        assert!(!b.contains(7.000001));
    }

    #[test]
    fn test_footprint_range() {
        let image = Array2::from_shape_fn((3, 3), |(x, y)| (x * 3 + y) as f64);
        assert_eq!(footprint_range(image.view(), &[(0, 1), (2, 0), (1, 1)]), Some((1.0, 6.0)));
        assert_eq!(footprint_range(image.view(), &[]), None);
    }

    #[test]
    fn test_flood_fill_bounds() {
        let result = flood_fill((6, 6), [(2, 3)], |x, y| (1..=3).contains(&x) && (2..=5).contains(&y));
        assert_eq!(result.pixel_count, 12);
        assert_eq!(result.bounds, Some((1, 2, 3, 4)));
    }

    #[test]
    fn test_threshold_range_is_not_connected() {
        let image = Array2::from_shape_fn((5, 5), |(x, y)| ((x + y) % 2) as f64);
        let mask = threshold_range(image.view(), GrowBounds::new(1.0, 1.0));
        assert_eq!(count(&mask), 12);
    }

    #[test]
    fn test_threshold_window_drag() {
        let image = Array2::from_shape_fn((4, 4), |(x, y)| (x * 4 + y) as f64 * 32.0);
        let mut window = ThresholdWindow::for_image(image.view()).unwrap();
        assert_eq!(window.center, 240.0);
        assert_eq!(window.width, 480.0);

        // Dragging up raises the center, dragging left narrows the window
        window.drag(0.0, -10.0);
        assert!(window.center > 240.0);
        window.drag(-1.0e6, 0.0);
        assert_eq!(window.width, 1.0);

        let mask = ThresholdWindow::new(image.view(), 64.0, 64.0).unwrap().apply(image.view());
        // 32, 64, 96 lie in [32, 96]
        assert_eq!(count(&mask), 3);
    }
}
