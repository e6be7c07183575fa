//! Contour selection through a clicked pixel.
//!
//! The contour pens look up the iso-intensity contour of the image at the
//! value of the pixel under the pointer. A contour only counts as "through"
//! the pixel when one of its vertices is exactly that grid point, which
//! happens when an edge crossing starts or ends on the pixel itself.

use ndarray::{Array2, ArrayView2};

use super::marching_squares::{marching_squares, marching_squares_masked, Contour};
use crate::error::MaskError;
use crate::geometry::{checked_pixel, fill_polygon};
use crate::Mask;

/// The contour at level `image[x, y]` that passes exactly through `(x, y)`.
///
/// Returns `None` for out-of-range pixels and when no contour has the pixel
/// as a vertex (for example inside a flat region).
pub fn trace_through_pixel(image: ArrayView2<f64>, x: isize, y: isize) -> Option<Contour> {
    let (px, py) = checked_pixel(image.dim(), x, y)?;
    let level = image[[px, py]];
    marching_squares(image, level)
        .into_iter()
        .find(|c| c.passes_through(px as f64, py as f64))
}

/// All contours at level `image[x, y]`.
///
/// When `restrict` holds at least one selected pixel, only cells entirely
/// inside it are traced. An empty or absent restriction traces the whole
/// image. Out-of-range pixels give no contours.
pub fn trace_all_through_pixel(
    image: ArrayView2<f64>,
    x: isize,
    y: isize,
    restrict: Option<ArrayView2<bool>>,
) -> Result<Vec<Contour>, MaskError> {
    let Some((px, py)) = checked_pixel(image.dim(), x, y) else {
        return Ok(Vec::new());
    };
    let level = image[[px, py]];
    match restrict {
        Some(mask) if mask.iter().any(|&v| v) => marching_squares_masked(image, level, mask),
        _ => Ok(marching_squares(image, level)),
    }
}

/// Union of the filled interiors of `contours`.
pub fn contours_to_mask(contours: &[Contour], shape: (usize, usize)) -> Mask {
    let mut mask = Array2::from_elem(shape, false);
    for contour in contours {
        let filled = fill_polygon(&contour.points, shape);
        mask.zip_mut_with(&filled, |m, &f| *m |= f);
    }
    mask
}
