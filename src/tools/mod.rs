//! Mouse-driven editing tools.
//!
//! Every tool reacts to the same set of pointer events through the
//! [`Gesture`] trait. Events carry continuous image coordinates; the pixel
//! under the pointer is `Point::pixel()`. Handlers get everything they touch
//! through an explicit [`EditContext`] and do nothing while no image is
//! loaded.

pub mod brush;
pub mod morph;
pub mod move_tool;
pub mod pen;
pub mod threshold;

pub use brush::{BrushFill, BrushTool};
pub use morph::{MorphOp, MorphTool};
pub use move_tool::MoveTool;
pub use pen::{PenShape, PenTool};
pub use threshold::ThresholdTool;

use log::{debug, warn};
use ndarray::ArrayView2;

use crate::compositor::combine_in_place;
use crate::config::ToolConfig;
use crate::geometry::{GridCache, Point};
use crate::store::MaskStore;
use crate::Mask;

/// State shared by the tools for the duration of one event.
pub struct EditContext<'a> {
    /// Image being segmented, `None` while nothing is loaded
    pub image: Option<ArrayView2<'a, f64>>,
    pub store: &'a mut MaskStore,
    pub grids: &'a mut GridCache,
    pub config: &'a ToolConfig,
}

impl<'a> EditContext<'a> {
    pub fn new(
        image: Option<ArrayView2<'a, f64>>,
        store: &'a mut MaskStore,
        grids: &'a mut GridCache,
        config: &'a ToolConfig,
    ) -> Self {
        Self {
            image,
            store,
            grids,
            config,
        }
    }

    /// Make sure a mask exists and snapshot it for undo.
    pub fn begin_edit(&mut self) {
        self.store.ensure();
        self.store.snapshot_for_edit();
    }

    /// Merge `raster` into the mask with the configured combine mode.
    pub fn commit(&mut self, tool: &str, raster: &Mask) {
        let mode = self.config.combine_mode;
        match self.store.modify(|mask| combine_in_place(mask, raster.view(), mode)) {
            Some(Ok(())) => debug!("{tool}: {mode:?} committed, {} pixels selected", self.store.count()),
            Some(Err(err)) => warn!("{tool}: {err}"),
            None => {}
        }
    }

    /// Swap in a mask computed from scratch.
    pub fn replace(&mut self, tool: &str, mask: Mask) {
        let selected = mask.iter().filter(|&&v| v).count();
        match self.store.replace(mask) {
            Ok(()) => debug!("{tool}: mask replaced, {selected} pixels selected"),
            Err(err) => warn!("{tool}: {err}"),
        }
    }
}

/// Outline the host should draw on top of the image.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Preview {
    #[default]
    None,
    /// Brush outline: `size x size` square centered on pixel `(x, y)`
    Square { x: isize, y: isize, size: usize },
    /// Polyline, closed back to its first point when `closed`
    Path { points: Vec<Point>, closed: bool },
    Rectangle { corner1: Point, corner2: Point },
    Circle { center: Point, radius: f64 },
    /// Closed outlines, already shifted to pixel centers
    Contours(Vec<Vec<Point>>),
}

/// Pointer event handlers shared by all tools.
///
/// `on_drag` is only sent while the button is held. `delta` is the pointer
/// motion in screen pixels since the previous event.
pub trait Gesture {
    fn on_press(&mut self, _ctx: &mut EditContext<'_>, _at: Point) {}

    fn on_drag(&mut self, _ctx: &mut EditContext<'_>, _at: Point, _delta: (f64, f64)) {}

    fn on_release(&mut self, _ctx: &mut EditContext<'_>, _at: Point) {}

    fn on_hover(&mut self, _ctx: &mut EditContext<'_>, _at: Point) {}

    fn on_double_click(&mut self, _ctx: &mut EditContext<'_>, _at: Point) {}

    /// Drop any half-finished gesture (image changed, tool switched).
    fn cancel(&mut self) {}

    fn preview(&self, _config: &ToolConfig) -> Preview {
        Preview::None
    }
}

/// The closed set of editing tools.
#[derive(Debug, Clone)]
pub enum Tool {
    Brush(BrushTool),
    PaintByNumbers(BrushTool),
    RegionGrow(BrushTool),
    Pen(PenTool),
    Threshold(ThresholdTool),
    Morph(MorphTool),
    Move(MoveTool),
}

impl Default for Tool {
    fn default() -> Self {
        Tool::brush(false)
    }
}

impl Tool {
    /// Paint brush, or eraser with `erase`.
    pub fn brush(erase: bool) -> Self {
        Tool::Brush(BrushTool::new(BrushFill::Pixels, erase))
    }

    pub fn paint_by_numbers(erase: bool) -> Self {
        Tool::PaintByNumbers(BrushTool::new(BrushFill::ByNumbers, erase))
    }

    pub fn region_grow(erase: bool) -> Self {
        Tool::RegionGrow(BrushTool::new(BrushFill::Grow, erase))
    }

    pub fn pen(shape: PenShape) -> Self {
        Tool::Pen(PenTool::new(shape))
    }

    pub fn threshold() -> Self {
        Tool::Threshold(ThresholdTool::new())
    }

    pub fn morph(op: MorphOp) -> Self {
        Tool::Morph(MorphTool::new(op))
    }

    pub fn move_mask() -> Self {
        Tool::Move(MoveTool::new())
    }

    fn gesture(&mut self) -> &mut dyn Gesture {
        match self {
            Tool::Brush(t) | Tool::PaintByNumbers(t) | Tool::RegionGrow(t) => t,
            Tool::Pen(t) => t,
            Tool::Threshold(t) => t,
            Tool::Morph(t) => t,
            Tool::Move(t) => t,
        }
    }
}

impl Gesture for Tool {
    fn on_press(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        self.gesture().on_press(ctx, at)
    }

    fn on_drag(&mut self, ctx: &mut EditContext<'_>, at: Point, delta: (f64, f64)) {
        self.gesture().on_drag(ctx, at, delta)
    }

    fn on_release(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        self.gesture().on_release(ctx, at)
    }

    fn on_hover(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        self.gesture().on_hover(ctx, at)
    }

    fn on_double_click(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        self.gesture().on_double_click(ctx, at)
    }

    fn cancel(&mut self) {
        self.gesture().cancel()
    }

    fn preview(&self, config: &ToolConfig) -> Preview {
        match self {
            Tool::Brush(t) | Tool::PaintByNumbers(t) | Tool::RegionGrow(t) => t.preview(config),
            Tool::Pen(t) => t.preview(config),
            Tool::Threshold(t) => t.preview(config),
            Tool::Morph(t) => t.preview(config),
            Tool::Move(t) => t.preview(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tools() -> Vec<Tool> {
        let mut tools = vec![
            Tool::brush(false),
            Tool::brush(true),
            Tool::paint_by_numbers(false),
            Tool::region_grow(false),
            Tool::threshold(),
            Tool::move_mask(),
        ];
        tools.extend(PenShape::ALL.iter().map(|&s| Tool::pen(s)));
        tools.extend(MorphOp::ALL.iter().map(|&op| Tool::morph(op)));
        tools
    }

    #[test]
    fn test_no_image_leaves_state_unchanged() {
        let config = ToolConfig::default();
        for mut tool in all_tools() {
            let mut store = MaskStore::new();
            let mut grids = GridCache::new();
            let mut ctx = EditContext::new(None, &mut store, &mut grids, &config);

            let p = Point::new(2.5, 2.5);
            let q = Point::new(4.5, 6.5);
            tool.on_hover(&mut ctx, p);
            tool.on_press(&mut ctx, p);
            tool.on_drag(&mut ctx, q, (2.0, 4.0));
            tool.on_release(&mut ctx, q);
            tool.on_double_click(&mut ctx, q);

            assert!(store.current().is_none(), "{tool:?}");
            assert!(!store.can_undo());
            assert!(!store.take_dirty());
            assert_eq!(grids.builds(), 0);
        }
    }

    #[test]
    fn test_no_image_with_existing_mask() {
        let config = ToolConfig::default();
        for mut tool in all_tools() {
            let mut store = MaskStore::with_shape((6, 6));
            let mut mask = ndarray::Array2::from_elem((6, 6), false);
            mask[[2, 2]] = true;
            store.replace(mask.clone()).unwrap();
            store.take_dirty();
            let mut grids = GridCache::new();
            let mut ctx = EditContext::new(None, &mut store, &mut grids, &config);

            tool.on_press(&mut ctx, Point::new(2.5, 2.5));
            tool.on_drag(&mut ctx, Point::new(3.5, 3.5), (1.0, 1.0));
            tool.on_release(&mut ctx, Point::new(3.5, 3.5));

            assert_eq!(store.current(), Some(&mask), "{tool:?}");
            assert!(!store.take_dirty());
        }
    }
}
