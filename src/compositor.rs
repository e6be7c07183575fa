//! Boolean combination of a new raster with the existing mask.
//!
//! Every producer (pens, contours, brush footprints, threshold windows)
//! hands its raster to [`combine`] with the active [`CombineMode`]:
//!
//! | Mode  | Result               |
//! |-------|----------------------|
//! | Draw  | `mask OR raster`     |
//! | Cut   | `mask AND NOT raster`|
//! | Catch | `mask AND raster`    |

use ndarray::{ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_shape, MaskError};
use crate::Mask;

/// How a freshly produced raster is merged into the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    /// Union.
    #[default]
    Draw,
    /// Set difference.
    Cut,
    /// Intersection.
    Catch,
}

impl CombineMode {
    pub const ALL: [CombineMode; 3] = [CombineMode::Draw, CombineMode::Cut, CombineMode::Catch];

    /// Combine a single pixel.
    #[inline]
    pub fn apply(self, existing: bool, new: bool) -> bool {
        match self {
            CombineMode::Draw => existing || new,
            CombineMode::Cut => existing && !new,
            CombineMode::Catch => existing && new,
        }
    }
}

impl std::str::FromStr for CombineMode {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draw" => Ok(CombineMode::Draw),
            "cut" => Ok(CombineMode::Cut),
            "catch" => Ok(CombineMode::Catch),
            _ => Err(MaskError::InvalidOption {
                option: "combine mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Combine `raster` into `existing` and return the result.
///
/// Both arrays must have the same shape; a mismatch is a caller bug and is
/// reported as [`MaskError::ShapeMismatch`].
pub fn combine(
    existing: ArrayView2<bool>,
    raster: ArrayView2<bool>,
    mode: CombineMode,
) -> Result<Mask, MaskError> {
    ensure_shape(existing.dim(), raster.dim())?;
    Ok(Zip::from(&existing)
        .and(&raster)
        .par_map_collect(|&m, &r| mode.apply(m, r)))
}

/// Same as [`combine`], writing into `existing`.
pub fn combine_in_place(
    existing: &mut Mask,
    raster: ArrayView2<bool>,
    mode: CombineMode,
) -> Result<(), MaskError> {
    ensure_shape(existing.dim(), raster.dim())?;
    Zip::from(existing)
        .and(&raster)
        .par_for_each(|m, &r| *m = mode.apply(*m, r));
    Ok(())
}
