//! Morphology restricted to a single cluster of the mask.
//!
//! A cluster is the 4-connected component of set pixels under a seed. The
//! cluster operations isolate it as `C`, run a morphological filter on it
//! inside a window around its bounding box to get `P`, and merge the result
//! back into the mask `M` according to [`MorphMode`]:
//!
//! | Mode | Result |
//! |------|--------|
//! | Draw | `(M \ C) ∪ P` |
//! | Cut | `M \ (P Δ C)` |
//! | Rescue | `(M \ C) ∪ (C ∩ P)` |
//!
//! Seeds that are out of range or on an unset pixel leave the mask unchanged.

use std::collections::VecDeque;

use ndarray::{s, Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use super::morphology::{close, dilate, erode, open};
use super::structuring::StructuringElement;
use crate::error::MaskError;
use crate::geometry::checked_pixel;
use crate::selection::region_grow::flood_fill;
use crate::Mask;

/// How a processed cluster is merged back into the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphMode {
    /// Replace the cluster by its processed version
    #[default]
    Draw,
    /// Remove the pixels the operation changed
    Cut,
    /// Keep the part of the cluster under the processed cluster
    Rescue,
}

impl MorphMode {
    pub const ALL: [MorphMode; 3] = [MorphMode::Draw, MorphMode::Cut, MorphMode::Rescue];

    #[inline]
    fn merge(self, m: bool, c: bool, p: bool) -> bool {
        match self {
            MorphMode::Draw => (m && !c) || p,
            MorphMode::Cut => m && !(p ^ c),
            MorphMode::Rescue => (m && !c) || (c && p),
        }
    }
}

impl std::str::FromStr for MorphMode {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draw" => Ok(MorphMode::Draw),
            "cut" => Ok(MorphMode::Cut),
            "rescue" => Ok(MorphMode::Rescue),
            _ => Err(MaskError::InvalidOption {
                option: "morph mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Cluster under the seed together with its bounding box.
struct Cluster {
    seed: (usize, usize),
    mask: Mask,
    bounds: (usize, usize, usize, usize),
}

fn isolate(mask: ArrayView2<bool>, seed: (isize, isize)) -> Option<Cluster> {
    let (x, y) = checked_pixel(mask.dim(), seed.0, seed.1)?;
    if !mask[[x, y]] {
        return None;
    }
    let result = flood_fill(mask.dim(), [(x, y)], |px, py| mask[[px, py]]);
    let bounds = result.bounds?;
    Some(Cluster {
        seed: (x, y),
        mask: result.mask,
        bounds,
    })
}

/// 4-connected component of set pixels containing `seed`.
///
/// `None` when the seed is out of range or not set.
pub fn flood_cluster(mask: ArrayView2<bool>, seed: (isize, isize)) -> Option<Mask> {
    isolate(mask, seed).map(|c| c.mask)
}

/// 4-connected region of pixels with exactly the seed's image value.
pub fn pick_cluster(image: ArrayView2<f64>, seed: (isize, isize)) -> Option<Mask> {
    let (x, y) = checked_pixel(image.dim(), seed.0, seed.1)?;
    let value = image[[x, y]];
    if value.is_nan() {
        return None;
    }
    Some(flood_fill(image.dim(), [(x, y)], |px, py| image[[px, py]] == value).mask)
}

/// Keep only the component of `mask` containing `seed`, or the largest
/// component when the seed is unset. Ties keep the first found in scan order.
pub fn keep_fragment(mask: ArrayView2<bool>, seed: (usize, usize)) -> Mask {
    let (nx, ny) = mask.dim();
    if seed.0 < nx && seed.1 < ny && mask[[seed.0, seed.1]] {
        return flood_fill(mask.dim(), [seed], |x, y| mask[[x, y]]).mask;
    }

    let mut visited = Array2::from_elem((nx, ny), false);
    let mut largest: Vec<(usize, usize)> = Vec::new();
    let mut queue = VecDeque::new();

    for x in 0..nx {
        for y in 0..ny {
            if !mask[[x, y]] || visited[[x, y]] {
                continue;
            }
            visited[[x, y]] = true;
            queue.push_back((x, y));
            let mut component = Vec::new();

            while let Some((cx, cy)) = queue.pop_front() {
                component.push((cx, cy));
                for (dx, dy) in [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
                    let Some((px, py)) = checked_pixel((nx, ny), cx as isize + dx, cy as isize + dy) else {
                        continue;
                    };
                    if mask[[px, py]] && !visited[[px, py]] {
                        visited[[px, py]] = true;
                        queue.push_back((px, py));
                    }
                }
            }

            if component.len() > largest.len() {
                largest = component;
            }
        }
    }

    let mut result = Array2::from_elem((nx, ny), false);
    for (x, y) in largest {
        result[[x, y]] = true;
    }
    result
}

/// Run `op` on the cluster inside its bounding box padded by `pad` pixels
/// and merge the processed cluster back into `mask`.
fn process_cluster<F>(
    mask: ArrayView2<bool>,
    seed: (isize, isize),
    pad: usize,
    mode: MorphMode,
    split: bool,
    op: F,
) -> Mask
where
    F: Fn(ArrayView2<bool>) -> Mask,
{
    let Some(cluster) = isolate(mask, seed) else {
        return mask.to_owned();
    };

    let (nx, ny) = mask.dim();
    let (bx, by, bw, bh) = cluster.bounds;
    let x0 = bx.saturating_sub(pad);
    let y0 = by.saturating_sub(pad);
    let x1 = (bx + bw + pad).min(nx);
    let y1 = (by + bh + pad).min(ny);

    let window = cluster.mask.slice(s![x0..x1, y0..y1]);
    let mut processed = Array2::from_elem((nx, ny), false);
    processed.slice_mut(s![x0..x1, y0..y1]).assign(&op(window));

    if split {
        processed = keep_fragment(processed.view(), cluster.seed);
    }

    Zip::from(&mask)
        .and(&cluster.mask)
        .and(&processed)
        .par_map_collect(|&m, &c, &p| mode.merge(m, c, p))
}

fn window_pad(se: &StructuringElement) -> usize {
    2 * se.radius() + 1
}

/// Dilate the cluster under `seed`.
///
/// # Arguments
/// * `mask` - Binary mask
/// * `seed` - Pixel selecting the cluster
/// * `se` - Structuring element
/// * `mode` - How the dilated cluster is merged back
pub fn dilate_cluster(
    mask: ArrayView2<bool>,
    seed: (isize, isize),
    se: &StructuringElement,
    mode: MorphMode,
) -> Mask {
    process_cluster(mask, seed, window_pad(se), mode, false, |m| dilate(m, se))
}

/// Erode the cluster under `seed`.
pub fn erode_cluster(
    mask: ArrayView2<bool>,
    seed: (isize, isize),
    se: &StructuringElement,
    mode: MorphMode,
) -> Mask {
    process_cluster(mask, seed, window_pad(se), mode, false, |m| erode(m, se))
}

/// Open the cluster under `seed`.
///
/// With `split`, only the opened fragment containing the seed is kept (the
/// largest fragment if the seed itself was opened away).
pub fn open_cluster(
    mask: ArrayView2<bool>,
    seed: (isize, isize),
    se: &StructuringElement,
    mode: MorphMode,
    split: bool,
) -> Mask {
    process_cluster(mask, seed, window_pad(se), mode, split, |m| open(m, se))
}

/// Close the cluster under `seed`.
pub fn close_cluster(
    mask: ArrayView2<bool>,
    seed: (isize, isize),
    se: &StructuringElement,
    mode: MorphMode,
) -> Mask {
    process_cluster(mask, seed, window_pad(se), mode, false, |m| close(m, se))
}

/// Remove bright then dark spots: open with `bright`, then close with
/// `dark`. A missing kernel skips that step.
pub fn wand_cluster(
    mask: ArrayView2<bool>,
    seed: (isize, isize),
    bright: Option<&StructuringElement>,
    dark: Option<&StructuringElement>,
    mode: MorphMode,
    split: bool,
) -> Mask {
    let opened = match bright {
        Some(se) => open_cluster(mask, seed, se, mode, split),
        None => mask.to_owned(),
    };
    match dark {
        Some(se) => close_cluster(opened.view(), seed, se, mode),
        None => opened,
    }
}
