//! Tool options.
//!
//! Every option is picked from a short fixed menu. [`ToolConfig::validate`]
//! rejects anything outside these tables.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::compositor::CombineMode;
use crate::error::MaskError;
use crate::filters::{MorphMode, StructuringElement};

/// Brush and seed footprint sizes (pixels per side).
pub const BRUSH_SIZES: [usize; 8] = [1, 3, 5, 7, 9, 11, 21, 31];

/// Structuring element sizes for dilate, erode, open and close.
pub const KERNEL_SIZES: [usize; 7] = [3, 5, 7, 9, 11, 21, 31];

/// Wand kernel sizes; 1 turns that half of the wand off.
pub const WAND_KERNEL_SIZES: [usize; 8] = [1, 3, 5, 7, 9, 11, 21, 31];

/// Region-growing tolerance factors.
pub const TOLERANCES: [f64; 10] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

/// Options shared by all tools of an edit session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Brush / seed footprint size
    pub brush_size: usize,
    /// Structuring element size
    pub kernel_size: usize,
    /// Wand kernel removing bright spots (open)
    pub bright_kernel_size: usize,
    /// Wand kernel removing dark spots (close)
    pub dark_kernel_size: usize,
    /// Region-growing tolerance
    pub tolerance: f64,
    pub combine_mode: CombineMode,
    pub morph_mode: MorphMode,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            brush_size: 3,
            kernel_size: 3,
            bright_kernel_size: 1,
            dark_kernel_size: 1,
            tolerance: 5.0,
            combine_mode: CombineMode::Draw,
            morph_mode: MorphMode::Draw,
        }
    }
}

fn check<T: PartialEq + std::fmt::Display>(
    option: &'static str,
    value: T,
    allowed: &[T],
) -> Result<(), MaskError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        warn!("rejected {option} = {value}");
        Err(MaskError::InvalidOption {
            option,
            value: value.to_string(),
        })
    }
}

impl ToolConfig {
    /// Check every option against its menu.
    pub fn validate(&self) -> Result<(), MaskError> {
        check("brush size", self.brush_size, &BRUSH_SIZES)?;
        check("kernel size", self.kernel_size, &KERNEL_SIZES)?;
        check("bright kernel size", self.bright_kernel_size, &WAND_KERNEL_SIZES)?;
        check("dark kernel size", self.dark_kernel_size, &WAND_KERNEL_SIZES)?;
        check("tolerance", self.tolerance, &TOLERANCES)?;
        Ok(())
    }

    pub fn kernel(&self) -> Option<StructuringElement> {
        StructuringElement::for_size(self.kernel_size)
    }

    pub fn bright_kernel(&self) -> Option<StructuringElement> {
        StructuringElement::for_size(self.bright_kernel_size)
    }

    pub fn dark_kernel(&self) -> Option<StructuringElement> {
        StructuringElement::for_size(self.dark_kernel_size)
    }
}
