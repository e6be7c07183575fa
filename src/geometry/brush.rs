//! Brush footprints and whole-mask shifts.

use ndarray::{Array2, ArrayView2};

use super::checked_pixel;
use crate::Mask;

/// In-range pixels of the `size x size` square centered on `(x, y)`.
///
/// The half-width is `(size - 1) / 2`; offsets falling outside the image are
/// skipped. Pixels are listed with `x` as the outer loop.
pub fn brush_footprint(x: isize, y: isize, size: usize, shape: (usize, usize)) -> Vec<(usize, usize)> {
    let w = (size.max(1) as isize - 1) / 2;
    let mut pixels = Vec::with_capacity(((2 * w + 1) * (2 * w + 1)) as usize);
    for px in (x - w)..=(x + w) {
        for py in (y - w)..=(y + w) {
            if let Some(p) = checked_pixel(shape, px, py) {
                pixels.push(p);
            }
        }
    }
    pixels
}

/// Set every listed pixel to `value`.
pub fn set_pixels(mask: &mut Mask, pixels: &[(usize, usize)], value: bool) {
    for &(x, y) in pixels {
        mask[[x, y]] = value;
    }
}

/// Shift a mask by whole pixels, wrapping around the edges.
///
/// `result[[i, j]] == mask[[i - dx, j - dy]]` with indices taken modulo the
/// shape.
pub fn shift_wrapped(mask: ArrayView2<bool>, dx: isize, dy: isize) -> Mask {
    let (nx, ny) = mask.dim();
    if nx == 0 || ny == 0 {
        return mask.to_owned();
    }
    let sx = dx.rem_euclid(nx as isize) as usize;
    let sy = dy.rem_euclid(ny as isize) as usize;
    Array2::from_shape_fn((nx, ny), |(i, j)| {
        mask[[(i + nx - sx) % nx, (j + ny - sy) % ny]]
    })
}
