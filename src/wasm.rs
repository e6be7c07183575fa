//! WebAssembly exports for the mask editing core.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Masks travel as flat `u8` buffers holding 0 or 1, images as flat `f64`
//! buffers. Both have length `width * height` and store pixel `(x, y)` at
//! index `x * height + y`, matching the `[[x, y]]` indexing of the Rust API.

use ndarray::Array2;
use wasm_bindgen::prelude::*;

use crate::compositor::{combine, CombineMode};
use crate::error::MaskError;
use crate::filters::{self, MorphMode, StructuringElement};
use crate::geometry::{self, Point};
use crate::selection::{self, GrowBounds};
use crate::tools::MorphOp;
use crate::Mask;

fn to_js(err: MaskError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn mask_from_bytes(data: &[u8], width: usize, height: usize) -> Result<Mask, JsValue> {
    Array2::from_shape_vec((width, height), data.iter().map(|&v| v != 0).collect())
        .map_err(|e| JsValue::from_str(&format!("invalid mask dimensions: {e}")))
}

fn image_from_floats(data: &[f64], width: usize, height: usize) -> Result<Array2<f64>, JsValue> {
    Array2::from_shape_vec((width, height), data.to_vec())
        .map_err(|e| JsValue::from_str(&format!("invalid image dimensions: {e}")))
}

fn mask_to_bytes(mask: &Mask) -> Vec<u8> {
    mask.iter().map(|&v| u8::from(v)).collect()
}

// ============================================================================
// Compositing
// ============================================================================

/// Merge a raster into a mask.
///
/// # Arguments
/// * `mask` - Flat mask bytes (length = width * height)
/// * `raster` - Flat raster bytes of the same length
/// * `width` - Extent of the first axis
/// * `height` - Extent of the second axis
/// * `mode` - "draw", "cut" or "catch"
///
/// # Returns
/// Flat mask bytes with the merged result
#[wasm_bindgen]
pub fn combine_masks_wasm(
    mask: &[u8],
    raster: &[u8],
    width: usize,
    height: usize,
    mode: &str,
) -> Result<Vec<u8>, JsValue> {
    let mode: CombineMode = mode.parse().map_err(to_js)?;
    let existing = mask_from_bytes(mask, width, height)?;
    let raster = mask_from_bytes(raster, width, height)?;
    let result = combine(existing.view(), raster.view(), mode).map_err(to_js)?;
    Ok(mask_to_bytes(&result))
}

// ============================================================================
// Geometry
// ============================================================================

/// Rasterize a polygon given as interleaved `[x0, y0, x1, y1, ...]`.
///
/// A trailing unpaired coordinate is ignored.
#[wasm_bindgen]
pub fn rasterize_polygon_wasm(coords: &[f64], width: usize, height: usize) -> Vec<u8> {
    let vertices: Vec<Point> = coords
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect();
    mask_to_bytes(&geometry::rasterize_polygon(&vertices, (width, height)))
}

// ============================================================================
// Region growing
// ============================================================================

/// Grow (or with `remove`, erase) the region connected to `(seed_x, seed_y)`
/// whose values lie in `[lower, upper]`.
///
/// # Arguments
/// * `image` - Flat image values (length = width * height)
/// * `mask` - Flat mask bytes of the same length
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn region_grow_wasm(
    image: &[f64],
    mask: &[u8],
    width: usize,
    height: usize,
    seed_x: usize,
    seed_y: usize,
    lower: f64,
    upper: f64,
    remove: bool,
) -> Result<Vec<u8>, JsValue> {
    let image = image_from_floats(image, width, height)?;
    let mut mask = mask_from_bytes(mask, width, height)?;
    let seeds = [(seed_x, seed_y)];
    let bounds = GrowBounds::new(lower, upper);
    if remove {
        selection::grow_remove(image.view(), &mut mask, &seeds, bounds).map_err(to_js)?;
    } else {
        selection::grow_add(image.view(), &mut mask, &seeds, bounds).map_err(to_js)?;
    }
    Ok(mask_to_bytes(&mask))
}

// ============================================================================
// Morphology
// ============================================================================

/// Apply a morphology operation to the cluster under `(x, y)`.
///
/// # Arguments
/// * `op` - "dilate", "erode", "open", "close" or "wand"
/// * `kernel_size` - Odd kernel diameter; the bright kernel for "wand"
/// * `dark_kernel_size` - Closing kernel for "wand", ignored otherwise
/// * `mode` - "draw", "cut" or "rescue"
/// * `split` - Keep only the fragment under the seed after opening
///
/// A kernel size of 1 leaves the mask unchanged.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn morph_cluster_wasm(
    mask: &[u8],
    width: usize,
    height: usize,
    x: i32,
    y: i32,
    op: &str,
    kernel_size: usize,
    dark_kernel_size: usize,
    mode: &str,
    split: bool,
) -> Result<Vec<u8>, JsValue> {
    let op: MorphOp = op.parse().map_err(to_js)?;
    let mode: MorphMode = mode.parse().map_err(to_js)?;
    let mask = mask_from_bytes(mask, width, height)?;
    let view = mask.view();
    let seed = (x as isize, y as isize);
    let kernel = StructuringElement::for_size(kernel_size);

    let result = match (op, kernel.as_ref()) {
        (MorphOp::Wand, bright) => {
            let dark = StructuringElement::for_size(dark_kernel_size);
            filters::wand_cluster(view, seed, bright, dark.as_ref(), mode, split)
        }
        (_, None) => mask.clone(),
        (MorphOp::Dilate, Some(se)) => filters::dilate_cluster(view, seed, se, mode),
        (MorphOp::Erode, Some(se)) => filters::erode_cluster(view, seed, se, mode),
        (MorphOp::Open, Some(se)) => filters::open_cluster(view, seed, se, mode, split),
        (MorphOp::Close, Some(se)) => filters::close_cluster(view, seed, se, mode),
    };
    Ok(mask_to_bytes(&result))
}
