//! Click-to-apply morphology on the cluster under the pointer.

use log::debug;

use super::{EditContext, Gesture};
use crate::compositor::{combine, CombineMode};
use crate::error::MaskError;
use crate::filters::{
    close_cluster, dilate_cluster, erode_cluster, open_cluster, pick_cluster, wand_cluster, MorphMode,
};
use crate::geometry::{checked_pixel, Point};
use crate::Mask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    Dilate,
    Erode,
    /// Remove bright spots
    Open,
    /// Remove dark spots
    Close,
    /// Open with the bright kernel, then close with the dark kernel
    Wand,
}

impl MorphOp {
    pub const ALL: [MorphOp; 5] = [
        MorphOp::Dilate,
        MorphOp::Erode,
        MorphOp::Open,
        MorphOp::Close,
        MorphOp::Wand,
    ];

    /// Whether clicking outside the mask picks a new cluster from the image.
    fn picks_from_image(self) -> bool {
        matches!(self, MorphOp::Open | MorphOp::Close | MorphOp::Wand)
    }
}

impl std::str::FromStr for MorphOp {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dilate" => Ok(MorphOp::Dilate),
            "erode" => Ok(MorphOp::Erode),
            "open" => Ok(MorphOp::Open),
            "close" => Ok(MorphOp::Close),
            "wand" => Ok(MorphOp::Wand),
            _ => Err(MaskError::InvalidOption {
                option: "morphology operation",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MorphTool {
    pub op: MorphOp,
}

impl MorphTool {
    pub fn new(op: MorphOp) -> Self {
        Self { op }
    }

    /// Apply the operation to the cluster of `mask` under `seed`.
    ///
    /// Returns `None` when the configured kernel is a pass-through.
    fn apply(&self, ctx: &EditContext<'_>, mask: &Mask, seed: (isize, isize), mode: MorphMode, split: bool) -> Option<Mask> {
        let view = mask.view();
        let config = ctx.config;
        let result = match self.op {
            MorphOp::Dilate => dilate_cluster(view, seed, &config.kernel()?, mode),
            MorphOp::Erode => erode_cluster(view, seed, &config.kernel()?, mode),
            MorphOp::Open => open_cluster(view, seed, &config.kernel()?, mode, split),
            MorphOp::Close => close_cluster(view, seed, &config.kernel()?, mode),
            MorphOp::Wand => {
                let bright = config.bright_kernel();
                let dark = config.dark_kernel();
                wand_cluster(view, seed, bright.as_ref(), dark.as_ref(), mode, split)
            }
        };
        Some(result)
    }
}

impl Gesture for MorphTool {
    fn on_press(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        let Some(image) = ctx.image else { return };
        let (x, y) = at.pixel();
        let Some((px, py)) = checked_pixel(image.dim(), x, y) else { return };
        let mode = ctx.config.morph_mode;

        let on_mask = ctx.store.current().is_some_and(|m| m[[px, py]]);
        let result = if on_mask {
            // Only the cluster under the seed is touched
            let Some(mask) = ctx.store.current() else { return };
            let split = matches!(self.op, MorphOp::Open | MorphOp::Wand);
            self.apply(ctx, mask, (x, y), mode, split)
        } else if self.op.picks_from_image() && mode == MorphMode::Draw {
            // Build a cluster from the image region under the seed and add it
            let Some(picked) = pick_cluster(image, (x, y)) else { return };
            let Some(processed) = self.apply(ctx, &picked, (x, y), MorphMode::Draw, false) else { return };
            let existing = ctx.store.ensure().cloned();
            match existing {
                Some(existing) => combine(existing.view(), processed.view(), CombineMode::Draw).ok(),
                None => None,
            }
        } else {
            None
        };

        let Some(mask) = result else { return };
        if ctx.store.current() == Some(&mask) {
            // Nothing changed; keep the undo slot for the previous edit
            return;
        }
        debug!("{:?} at ({x}, {y}) in {mode:?} mode", self.op);
        ctx.begin_edit();
        ctx.replace("morphology", mask);
    }
}
