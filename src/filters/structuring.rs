//! Elliptical structuring elements.

use ndarray::Array2;

/// Square binary kernel stored as one horizontal run per row.
///
/// Row `i` covers columns `start..end`; the anchor is the center pixel
/// `(size / 2, size / 2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    size: usize,
    runs: Vec<(usize, usize)>,
}

impl StructuringElement {
    /// Ellipse inscribed in a `size x size` square.
    ///
    /// Uses the same rasterization as OpenCV's `MORPH_ELLIPSE`: for row
    /// offset `dy` the half-width is `round(c * sqrt((r² - dy²) / r²))`.
    pub fn ellipse(size: usize) -> Self {
        let size = size.max(1);
        let r = (size / 2) as f64;
        let c = (size / 2) as isize;
        let inv_r2 = if r > 0.0 { 1.0 / (r * r) } else { 0.0 };

        let runs = (0..size)
            .map(|i| {
                let dy = i as f64 - r;
                let dx = (c as f64 * ((r * r - dy * dy) * inv_r2).sqrt()).round_ties_even() as isize;
                let start = (c - dx).max(0) as usize;
                let end = ((c + dx + 1) as usize).min(size);
                (start, end)
            })
            .collect();

        Self { size, runs }
    }

    /// Kernel for a configured size; `None` for sizes that leave the mask
    /// unchanged (0 and 1).
    pub fn for_size(size: usize) -> Option<Self> {
        if size <= 1 {
            None
        } else {
            Some(Self::ellipse(size))
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the anchor to the kernel edge.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    pub fn runs(&self) -> &[(usize, usize)] {
        &self.runs
    }

    /// Dense view of the kernel, mainly for inspection.
    pub fn to_array(&self) -> Array2<bool> {
        Array2::from_shape_fn((self.size, self.size), |(i, j)| {
            let (start, end) = self.runs[i];
            start <= j && j < end
        })
    }
}
