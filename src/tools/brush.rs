//! Square-footprint tools: paint brush, paint by numbers, region growing.

use log::{debug, trace, warn};

use super::{EditContext, Gesture, Preview};
use crate::compositor::{combine_in_place, CombineMode};
use crate::config::ToolConfig;
use crate::geometry::{brush_footprint, set_pixels, Point};
use crate::selection::{footprint_range, grow_add, grow_remove, threshold_range, GrowBounds};

/// What a brush stroke does with the pixels under the footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushFill {
    /// Set or clear exactly the footprint
    Pixels,
    /// Select every pixel in the footprint's intensity range
    ByNumbers,
    /// Grow a connected region from the footprint
    Grow,
}

/// Brush-like tool painting (or erasing) on press and while dragging.
#[derive(Debug, Clone)]
pub struct BrushTool {
    pub fill: BrushFill,
    pub erase: bool,
    cursor: Option<(isize, isize)>,
}

impl BrushTool {
    pub fn new(fill: BrushFill, erase: bool) -> Self {
        Self {
            fill,
            erase,
            cursor: None,
        }
    }

    fn stroke(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        let Some(image) = ctx.image else { return };
        let (x, y) = at.pixel();
        self.cursor = Some((x, y));

        let pixels = brush_footprint(x, y, ctx.config.brush_size, image.dim());
        if pixels.is_empty() {
            return;
        }
        let erase = self.erase;

        match self.fill {
            BrushFill::Pixels => {
                ctx.store.modify(|mask| set_pixels(mask, &pixels, !erase));
                trace!("brush: {} pixels at ({x}, {y})", pixels.len());
            }
            BrushFill::ByNumbers => {
                let Some((min, max)) = footprint_range(image, &pixels) else { return };
                let in_range = threshold_range(image, GrowBounds::new(min, max));
                let mode = if erase { CombineMode::Cut } else { CombineMode::Draw };
                if let Some(Err(err)) = ctx.store.modify(|mask| combine_in_place(mask, in_range.view(), mode)) {
                    warn!("paint by numbers: {err}");
                    return;
                }
                debug!("paint by numbers: range [{min}, {max}], {} pixels selected", ctx.store.count());
            }
            BrushFill::Grow => {
                let Some((min, max)) = footprint_range(image, &pixels) else { return };
                let bounds = GrowBounds::from_footprint(min, max, ctx.config.tolerance);
                let grown = ctx.store.modify(|mask| {
                    if erase {
                        grow_remove(image, mask, &pixels, bounds)
                    } else {
                        grow_add(image, mask, &pixels, bounds)
                    }
                });
                match grown {
                    Some(Ok(n)) => debug!(
                        "region grow: [{}, {}], {n} pixels {}",
                        bounds.lower,
                        bounds.upper,
                        if erase { "removed" } else { "added" }
                    ),
                    Some(Err(err)) => warn!("region grow: {err}"),
                    None => {}
                }
            }
        }
    }
}

impl Gesture for BrushTool {
    fn on_press(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        if ctx.image.is_none() {
            return;
        }
        ctx.begin_edit();
        self.stroke(ctx, at);
    }

    fn on_drag(&mut self, ctx: &mut EditContext<'_>, at: Point, _delta: (f64, f64)) {
        self.stroke(ctx, at);
    }

    fn on_hover(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        if ctx.image.is_some() {
            self.cursor = Some(at.pixel());
        }
    }

    fn cancel(&mut self) {
        self.cursor = None;
    }

    fn preview(&self, config: &ToolConfig) -> Preview {
        match self.cursor {
            Some((x, y)) => Preview::Square {
                x,
                y,
                size: config.brush_size,
            },
            None => Preview::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GridCache;
    use crate::store::MaskStore;
    use crate::Mask;
    use ndarray::Array2;

    fn count(mask: &Mask) -> usize {
        mask.iter().filter(|&&v| v).count()
    }

    /// Left half 10, right half 50, with a single 20 at (1, 1).
    fn halves() -> Array2<f64> {
        let mut image = Array2::from_shape_fn((8, 8), |(_, y)| if y < 4 { 10.0 } else { 50.0 });
        image[[1, 1]] = 20.0;
        image
    }

    #[test]
    fn test_paint_and_erase() {
        let image = halves();
        let config = ToolConfig::default();
        let mut store = MaskStore::with_shape(image.dim());
        let mut grids = GridCache::new();
        let mut ctx = EditContext::new(Some(image.view()), &mut store, &mut grids, &config);

        let mut brush = BrushTool::new(BrushFill::Pixels, false);
        brush.on_press(&mut ctx, Point::new(3.5, 3.5));
        brush.on_drag(&mut ctx, Point::new(5.5, 3.5), (0.0, 0.0));
        assert_eq!(ctx.store.count(), 15);
        assert!(ctx.store.can_undo());

        let mut eraser = BrushTool::new(BrushFill::Pixels, true);
        eraser.on_press(&mut ctx, Point::new(3.5, 3.5));
        assert_eq!(ctx.store.count(), 6);

        ctx.store.undo_last();
        assert_eq!(ctx.store.count(), 15);
        assert_eq!(eraser.preview(&config), Preview::Square { x: 3, y: 3, size: 3 });
    }

    #[test]
    fn test_paint_by_numbers() {
        let image = halves();
        let config = ToolConfig {
            brush_size: 1,
            ..ToolConfig::default()
        };
        let mut store = MaskStore::with_shape(image.dim());
        let mut grids = GridCache::new();
        let mut ctx = EditContext::new(Some(image.view()), &mut store, &mut grids, &config);

        let mut tool = BrushTool::new(BrushFill::ByNumbers, false);
        tool.on_press(&mut ctx, Point::new(6.5, 6.5));
        // Every 50, connected or not
        assert_eq!(ctx.store.count(), 32);

        let mut eraser = BrushTool::new(BrushFill::ByNumbers, true);
        eraser.on_press(&mut ctx, Point::new(7.5, 7.5));
        assert_eq!(ctx.store.count(), 0);
    }

    #[test]
    fn test_region_grow_stays_connected() {
        let image = halves();
        let config = ToolConfig {
            brush_size: 1,
            ..ToolConfig::default()
        };
        let mut store = MaskStore::with_shape(image.dim());
        let mut grids = GridCache::new();
        let mut ctx = EditContext::new(Some(image.view()), &mut store, &mut grids, &config);

        let mut tool = BrushTool::new(BrushFill::Grow, false);
        tool.on_press(&mut ctx, Point::new(0.5, 0.5));
        // The lone 20 at (1, 1) is outside the exact-match range
        let mask = ctx.store.current().unwrap();
        assert_eq!(count(mask), 31);
        assert!(!mask[[1, 1]]);
        assert!(!mask[[0, 4]]);
    }

    #[test]
    fn test_region_grow_tolerance_widens_range() {
        let image = halves();
        let config = ToolConfig {
            brush_size: 3,
            tolerance: 1.0,
            ..ToolConfig::default()
        };
        let mut store = MaskStore::with_shape(image.dim());
        let mut grids = GridCache::new();
        let mut ctx = EditContext::new(Some(image.view()), &mut store, &mut grids, &config);

        // Footprint around (1, 1) spans 10..20
        let mut tool = BrushTool::new(BrushFill::Grow, false);
        tool.on_press(&mut ctx, Point::new(1.5, 1.5));
        assert_eq!(ctx.store.count(), 32);

        let mut eraser = BrushTool::new(BrushFill::Grow, true);
        eraser.on_press(&mut ctx, Point::new(1.5, 1.5));
        assert_eq!(ctx.store.count(), 0);
    }

    #[test]
    fn test_out_of_range_stroke_is_ignored() {
        let image = halves();
        let config = ToolConfig::default();
        let mut store = MaskStore::with_shape(image.dim());
        let mut grids = GridCache::new();
        let mut ctx = EditContext::new(Some(image.view()), &mut store, &mut grids, &config);

        let mut tool = BrushTool::new(BrushFill::Grow, false);
        tool.on_press(&mut ctx, Point::new(-10.0, 40.0));
        assert_eq!(ctx.store.count(), 0);
    }
}
