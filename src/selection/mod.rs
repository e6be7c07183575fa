//! Intensity-driven selection algorithms.
//!
//! - **Marching squares**: sub-pixel iso-contours of the image at a level
//! - **Contour**: contours through a clicked pixel and their filled interiors
//! - **Region grow**: 4-connected flood fill inside an intensity range
//!
//! These back the contour pens, the region-grow tool and the threshold tool.

pub mod contour;
pub mod marching_squares;
pub mod region_grow;

pub use contour::{contours_to_mask, trace_all_through_pixel, trace_through_pixel};
pub use marching_squares::{marching_squares, marching_squares_masked, Contour};
pub use region_grow::{
    flood_fill, footprint_range, grow_add, grow_remove, image_range, threshold_range,
    FloodResult, GrowBounds, ThresholdWindow,
};
