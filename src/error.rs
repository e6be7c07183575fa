//! Error type for mask editing.
//!
//! Recoverable conditions (no image loaded, out-of-range pixels, degenerate
//! geometry) are not errors and never reach this type. Only contract
//! violations by the caller are reported here.

/// Errors returned by mask operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaskError {
    /// Two arrays that must share a shape do not.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A configuration value outside the published option set.
    #[error("unsupported {option}: {value}")]
    InvalidOption { option: &'static str, value: String },
}

/// Check that `actual` matches `expected`.
#[inline]
pub fn ensure_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<(), MaskError> {
    if expected == actual {
        Ok(())
    } else {
        Err(MaskError::ShapeMismatch { expected, actual })
    }
}
