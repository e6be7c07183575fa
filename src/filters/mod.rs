//! Morphological filters for binary masks.
//!
//! | Module | Contents |
//! |--------|----------|
//! | `structuring` | Elliptical structuring elements |
//! | `morphology` | Whole-mask dilate, erode, open, close |
//! | `cluster` | The same operations applied to one 4-connected cluster |
//!
//! Masks are `Array2<bool>` indexed `[[x, y]]`. Kernel sizes of 1 are
//! pass-through and have no structuring element.

pub mod cluster;
pub mod morphology;
pub mod structuring;

pub use cluster::{
    close_cluster, dilate_cluster, erode_cluster, flood_cluster, keep_fragment, open_cluster,
    pick_cluster, wand_cluster, MorphMode,
};
pub use morphology::{close, dilate, erode, open};
pub use structuring::StructuringElement;
