//! Binary morphology: Dilate, Erode, Open, Close.
//!
//! All operations take an elliptical [`StructuringElement`] anchored at its
//! center. Neighbors outside the image are ignored: they neither grow a
//! dilation nor shrink an erosion.
//!
//! Each kernel row is a horizontal run, so instead of visiting every kernel
//! pixel the filters look up how many mask pixels fall inside the run using
//! per-row prefix counts. Output rows are computed in parallel.

use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;

use super::structuring::StructuringElement;
use crate::Mask;

// ============================================================================
// Prefix counts
// ============================================================================

/// `counts[[x, k]]` = number of true pixels in row `x` before column `k`.
fn row_prefix_counts(mask: ArrayView2<bool>) -> Array2<u32> {
    let (nx, ny) = mask.dim();
    let mut counts = Array2::<u32>::zeros((nx, ny + 1));

    counts
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(x, mut row)| {
            let mut acc = 0u32;
            for y in 0..ny {
                if mask[[x, y]] {
                    acc += 1;
                }
                row[y + 1] = acc;
            }
        });

    counts
}

/// Visit the clipped kernel runs around `(x, y)` as `(row, lo, hi)` column
/// ranges. Stops early when `visit` returns `false`.
#[inline]
fn for_each_run<F>(se: &StructuringElement, shape: (usize, usize), x: usize, y: usize, mut visit: F) -> bool
where
    F: FnMut(usize, usize, usize) -> bool,
{
    let (nx, ny) = shape;
    let r = se.radius() as isize;

    for (i, &(start, end)) in se.runs().iter().enumerate() {
        if start >= end {
            continue;
        }
        let sx = x as isize + i as isize - r;
        if sx < 0 || sx >= nx as isize {
            continue;
        }
        let lo = (y as isize + start as isize - r).max(0);
        let hi = (y as isize + end as isize - r).min(ny as isize);
        if lo >= hi {
            continue;
        }
        if !visit(sx as usize, lo as usize, hi as usize) {
            return false;
        }
    }
    true
}

// ============================================================================
// Dilate
// ============================================================================

/// Binary dilation.
///
/// A pixel is set when any in-image pixel under the kernel is set.
///
/// # Arguments
/// * `mask` - Binary mask
/// * `se` - Structuring element (symmetric about its anchor)
///
/// # Returns
/// Dilated mask of the same shape
pub fn dilate(mask: ArrayView2<bool>, se: &StructuringElement) -> Mask {
    let shape = mask.dim();
    let counts = row_prefix_counts(mask);
    let mut output = Array2::from_elem(shape, false);

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(x, mut row)| {
            for y in 0..shape.1 {
                // for_each_run returns false as soon as a hit is found
                let hit = !for_each_run(se, shape, x, y, |sx, lo, hi| counts[[sx, hi]] == counts[[sx, lo]]);
                row[y] = hit;
            }
        });

    output
}

// ============================================================================
// Erode
// ============================================================================

/// Binary erosion.
///
/// A pixel stays set only when every in-image pixel under the kernel is set.
///
/// # Arguments
/// * `mask` - Binary mask
/// * `se` - Structuring element (symmetric about its anchor)
///
/// # Returns
/// Eroded mask of the same shape
pub fn erode(mask: ArrayView2<bool>, se: &StructuringElement) -> Mask {
    let shape = mask.dim();
    let counts = row_prefix_counts(mask);
    let mut output = Array2::from_elem(shape, false);

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(x, mut row)| {
            for y in 0..shape.1 {
                if !mask[[x, y]] {
                    continue;
                }
                row[y] = for_each_run(se, shape, x, y, |sx, lo, hi| {
                    (counts[[sx, hi]] - counts[[sx, lo]]) as usize == hi - lo
                });
            }
        });

    output
}

// ============================================================================
// Open / Close
// ============================================================================

/// Erosion followed by dilation: removes features smaller than the kernel.
pub fn open(mask: ArrayView2<bool>, se: &StructuringElement) -> Mask {
    let eroded = erode(mask, se);
    dilate(eroded.view(), se)
}

/// Dilation followed by erosion: fills gaps smaller than the kernel.
pub fn close(mask: ArrayView2<bool>, se: &StructuringElement) -> Mask {
    let dilated = dilate(mask, se);
    erode(dilated.view(), se)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(mask: &Mask) -> usize {
        mask.iter().filter(|&&v| v).count()
    }

    fn block(shape: (usize, usize), xs: std::ops::Range<usize>, ys: std::ops::Range<usize>) -> Mask {
        Array2::from_shape_fn(shape, |(x, y)| xs.contains(&x) && ys.contains(&y))
    }

    #[test]
    fn test_dilate_single_pixel_is_kernel() {
        let mut mask = Array2::from_elem((9, 9), false);
        mask[[4, 4]] = true;
        let se = StructuringElement::ellipse(5);
        let result = dilate(mask.view(), &se);
        let kernel = se.to_array();
        for x in 0..5 {
            for y in 0..5 {
                assert_eq!(result[[x + 2, y + 2]], kernel[[x, y]]);
            }
        }
        assert_eq!(count(&result), kernel.iter().filter(|&&v| v).count());
    }

    #[test]
    fn test_dilate_cross() {
        let mut mask = Array2::from_elem((5, 5), false);
        mask[[2, 2]] = true;
        let result = dilate(mask.view(), &StructuringElement::ellipse(3));
        assert_eq!(count(&result), 5);
        assert!(result[[1, 2]] && result[[3, 2]] && result[[2, 1]] && result[[2, 3]]);
        assert!(!result[[1, 1]]);
    }

    #[test]
    fn test_erode_shrinks_block() {
        let mask = block((10, 10), 2..7, 2..7);
        let result = erode(mask.view(), &StructuringElement::ellipse(3));
        assert_eq!(result, block((10, 10), 3..6, 3..6));
    }

    #[test]
    fn test_erode_ignores_outside_image() {
        // A full mask stays full: the border is not treated as background
        let mask = Array2::from_elem((6, 6), true);
        let result = erode(mask.view(), &StructuringElement::ellipse(5));
        assert_eq!(count(&result), 36);
    }

    #[test]
    fn test_dilate_clips_at_border() {
        let mut mask = Array2::from_elem((4, 4), false);
        mask[[0, 0]] = true;
        let result = dilate(mask.view(), &StructuringElement::ellipse(3));
        assert_eq!(count(&result), 3);
    }

    #[test]
    fn test_open_removes_speck() {
        let mut mask = block((12, 12), 2..9, 2..9);
        mask[[11, 11]] = true;
        let result = open(mask.view(), &StructuringElement::ellipse(3));
        assert!(!result[[11, 11]]);
        assert!(result[[5, 5]]);
    }

    #[test]
    fn test_close_fills_hole() {
        let mut mask = block((10, 10), 2..8, 2..8);
        mask[[4, 4]] = false;
        let result = close(mask.view(), &StructuringElement::ellipse(3));
        assert!(result[[4, 4]]);
        assert_eq!(result, block((10, 10), 2..8, 2..8));
    }
}
