//! MaskEdit Rust Core
//!
//! Binary mask editing for 2-D medical images: the pixel-level operations
//! behind an interactive segmentation editor, with optional Python bindings
//! via PyO3 and WASM bindings for JavaScript.
//!
//! ## Array Layout
//! - **Image**: `Array2<f64>`, read only
//! - **Mask**: `Array2<bool>` of the same shape
//!
//! Both are indexed `[[x, y]]` with `x` on the first axis. Continuous
//! coordinates place the center of pixel `(i, j)` at `(i + 0.5, j + 0.5)`.
//!
//! ## Layers
//! - [`geometry`], [`selection`], [`filters`]: produce candidate rasters
//!   (polygons, contours, grown regions, processed clusters)
//! - [`compositor`]: merges a raster into the mask (draw / cut / catch)
//! - [`store`]: owns the mask and its single undo snapshot
//! - [`tools`], [`session`]: pointer-driven tools on top of the above
//!
//! Connectivity is 4-connected throughout.

pub mod compositor;
pub mod config;
pub mod error;
pub mod filters;
pub mod geometry;
pub mod selection;
pub mod session;
pub mod store;
pub mod tools;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use compositor::{combine, combine_in_place, CombineMode};
pub use config::ToolConfig;
pub use error::MaskError;
pub use filters::MorphMode;
pub use geometry::Point;
pub use session::EditSession;
pub use store::MaskStore;
pub use tools::{Gesture, Preview, Tool};

/// Binary mask, `true` for selected pixels.
pub type Mask = ndarray::Array2<bool>;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::compositor::{combine, CombineMode};
    use crate::error::MaskError;
    use crate::filters::{self, MorphMode, StructuringElement};
    use crate::geometry::{self, CenterGrid, Point};
    use crate::selection::{self, Contour, GrowBounds};
    use crate::tools::MorphOp;

    impl From<MaskError> for PyErr {
        fn from(err: MaskError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    fn points(contour: &Contour) -> Vec<(f64, f64)> {
        contour.points.iter().map(|p| (p.x, p.y)).collect()
    }

    // ========================================================================
    // Compositing
    // ========================================================================

    /// Merge `raster` into `mask` with mode "draw", "cut" or "catch".
    #[pyfunction]
    pub fn combine_masks<'py>(
        py: Python<'py>,
        mask: PyReadonlyArray2<'py, bool>,
        raster: PyReadonlyArray2<'py, bool>,
        mode: &str,
    ) -> PyResult<Bound<'py, PyArray2<bool>>> {
        let mode: CombineMode = mode.parse()?;
        let result = combine(mask.as_array(), raster.as_array(), mode)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Pixels whose centers lie inside the polygon (even-odd rule).
    #[pyfunction]
    pub fn rasterize_polygon<'py>(
        py: Python<'py>,
        vertices: Vec<(f64, f64)>,
        shape: (usize, usize),
    ) -> Bound<'py, PyArray2<bool>> {
        let vertices: Vec<Point> = vertices.into_iter().map(Point::from).collect();
        geometry::rasterize_polygon(&vertices, shape).into_pyarray(py)
    }

    #[pyfunction]
    pub fn rasterize_rectangle<'py>(
        py: Python<'py>,
        corner1: (f64, f64),
        corner2: (f64, f64),
        shape: (usize, usize),
    ) -> Bound<'py, PyArray2<bool>> {
        let grid = CenterGrid::new(shape);
        geometry::rasterize_rectangle(corner1.into(), corner2.into(), &grid).into_pyarray(py)
    }

    #[pyfunction]
    pub fn rasterize_circle<'py>(
        py: Python<'py>,
        center: (f64, f64),
        radius: f64,
        shape: (usize, usize),
    ) -> Bound<'py, PyArray2<bool>> {
        let grid = CenterGrid::new(shape);
        geometry::rasterize_circle(center.into(), radius, &grid).into_pyarray(py)
    }

    // ========================================================================
    // Contours
    // ========================================================================

    /// Vertices of the iso-contour passing through pixel `(x, y)`, or None.
    #[pyfunction]
    pub fn trace_contour(image: PyReadonlyArray2<'_, f64>, x: isize, y: isize) -> Option<Vec<(f64, f64)>> {
        selection::trace_through_pixel(image.as_array(), x, y).map(|c| points(&c))
    }

    /// All iso-contours at the value of pixel `(x, y)`.
    #[pyfunction]
    #[pyo3(signature = (image, x, y, restrict=None))]
    pub fn trace_all_contours(
        image: PyReadonlyArray2<'_, f64>,
        x: isize,
        y: isize,
        restrict: Option<PyReadonlyArray2<'_, bool>>,
    ) -> PyResult<Vec<Vec<(f64, f64)>>> {
        let restrict = restrict.as_ref().map(|r| r.as_array());
        let contours = selection::trace_all_through_pixel(image.as_array(), x, y, restrict)?;
        Ok(contours.iter().map(points).collect())
    }

    // ========================================================================
    // Region growing
    // ========================================================================

    /// Grow (or with `remove`, erase) the region connected to `seeds` whose
    /// values lie in `[lower, upper]`.
    #[pyfunction]
    #[pyo3(signature = (image, mask, seeds, lower, upper, remove=false))]
    pub fn region_grow<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f64>,
        mask: PyReadonlyArray2<'py, bool>,
        seeds: Vec<(usize, usize)>,
        lower: f64,
        upper: f64,
        remove: bool,
    ) -> PyResult<Bound<'py, PyArray2<bool>>> {
        let mut result = mask.as_array().to_owned();
        let bounds = GrowBounds::new(lower, upper);
        if remove {
            selection::grow_remove(image.as_array(), &mut result, &seeds, bounds)?;
        } else {
            selection::grow_add(image.as_array(), &mut result, &seeds, bounds)?;
        }
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Morphology
    // ========================================================================

    /// Connected region of pixels equal to the value at `(x, y)`.
    #[pyfunction]
    pub fn pick_cluster<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, f64>,
        x: isize,
        y: isize,
    ) -> Option<Bound<'py, PyArray2<bool>>> {
        filters::pick_cluster(image.as_array(), (x, y)).map(|m| m.into_pyarray(py))
    }

    /// Apply "dilate", "erode", "open", "close" or "wand" to the cluster at
    /// `(x, y)`. The wand opens with `kernel_size` and closes with
    /// `dark_kernel_size`; a size of 1 skips that step.
    #[pyfunction]
    #[pyo3(signature = (mask, x, y, op, kernel_size, mode="draw", split=false, dark_kernel_size=1))]
    #[allow(clippy::too_many_arguments)]
    pub fn morph_cluster<'py>(
        py: Python<'py>,
        mask: PyReadonlyArray2<'py, bool>,
        x: isize,
        y: isize,
        op: &str,
        kernel_size: usize,
        mode: &str,
        split: bool,
        dark_kernel_size: usize,
    ) -> PyResult<Bound<'py, PyArray2<bool>>> {
        let op: MorphOp = op.parse()?;
        let mode: MorphMode = mode.parse()?;
        let view = mask.as_array();
        let seed = (x, y);
        let kernel = StructuringElement::for_size(kernel_size);

        let result = match (op, kernel.as_ref()) {
            (MorphOp::Wand, bright) => {
                let dark = StructuringElement::for_size(dark_kernel_size);
                filters::wand_cluster(view, seed, bright, dark.as_ref(), mode, split)
            }
            (_, None) => view.to_owned(),
            (MorphOp::Dilate, Some(se)) => filters::dilate_cluster(view, seed, se, mode),
            (MorphOp::Erode, Some(se)) => filters::erode_cluster(view, seed, se, mode),
            (MorphOp::Open, Some(se)) => filters::open_cluster(view, seed, se, mode, split),
            (MorphOp::Close, Some(se)) => filters::close_cluster(view, seed, se, mode),
        };
        Ok(result.into_pyarray(py))
    }

    /// MaskEdit Rust extension module
    #[pymodule]
    pub fn maskedit_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Compositing
        m.add_function(wrap_pyfunction!(combine_masks, m)?)?;

        // Geometry
        m.add_function(wrap_pyfunction!(rasterize_polygon, m)?)?;
        m.add_function(wrap_pyfunction!(rasterize_rectangle, m)?)?;
        m.add_function(wrap_pyfunction!(rasterize_circle, m)?)?;

        // Contours
        m.add_function(wrap_pyfunction!(trace_contour, m)?)?;
        m.add_function(wrap_pyfunction!(trace_all_contours, m)?)?;

        // Region growing and morphology
        m.add_function(wrap_pyfunction!(region_grow, m)?)?;
        m.add_function(wrap_pyfunction!(pick_cluster, m)?)?;
        m.add_function(wrap_pyfunction!(morph_cluster, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::maskedit_rust;
