//! Drag the whole mask around, wrapping at the image edges.

use log::trace;

use super::{EditContext, Gesture};
use crate::geometry::{shift_wrapped, Point};
use crate::Mask;

#[derive(Debug, Clone, Default)]
pub struct MoveTool {
    /// Pixel where the drag started and the mask at that moment
    grab: Option<((isize, isize), Mask)>,
}

impl MoveTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Gesture for MoveTool {
    fn on_press(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        if ctx.image.is_none() {
            return;
        }
        let Some(mask) = ctx.store.current().cloned() else { return };
        ctx.store.snapshot_for_edit();
        self.grab = Some((at.pixel(), mask));
    }

    fn on_drag(&mut self, ctx: &mut EditContext<'_>, at: Point, _delta: (f64, f64)) {
        if ctx.image.is_none() {
            return;
        }
        let Some(((x0, y0), base)) = &self.grab else { return };
        let (x, y) = at.pixel();
        trace!("move mask by ({}, {})", x - x0, y - y0);
        ctx.replace("move", shift_wrapped(base.view(), x - x0, y - y0));
    }

    fn on_release(&mut self, _ctx: &mut EditContext<'_>, _at: Point) {
        self.grab = None;
    }

    fn cancel(&mut self) {
        self.grab = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolConfig;
    use crate::geometry::GridCache;
    use crate::store::MaskStore;
    use ndarray::Array2;

    #[test]
    fn test_drag_shifts_from_grab_point() {
        let image = Array2::<f64>::zeros((6, 6));
        let config = ToolConfig::default();
        let mut original = Array2::from_elem((6, 6), false);
        original[[1, 1]] = true;
        original[[5, 0]] = true;
        let mut store = MaskStore::with_shape(image.dim());
        store.replace(original.clone()).unwrap();
        let mut grids = GridCache::new();
        let mut ctx = EditContext::new(Some(image.view()), &mut store, &mut grids, &config);

        let mut tool = MoveTool::new();
        tool.on_press(&mut ctx, Point::new(2.5, 2.5));
        tool.on_drag(&mut ctx, Point::new(3.5, 2.5), (1.0, 0.0));
        tool.on_drag(&mut ctx, Point::new(4.5, 1.5), (1.0, -1.0));
        let mask = ctx.store.current().unwrap();
        // Shift is (2, -1) relative to the press, not cumulative
        assert!(mask[[3, 0]]);
        assert!(mask[[1, 5]]);
        assert_eq!(ctx.store.count(), 2);

        tool.on_release(&mut ctx, Point::new(4.5, 1.5));
        tool.on_drag(&mut ctx, Point::new(0.5, 0.5), (0.0, 0.0));
        assert!(ctx.store.current().unwrap()[[3, 0]]);

        ctx.store.undo_last();
        assert_eq!(ctx.store.current(), Some(&original));
    }

    #[test]
    fn test_without_mask_nothing_to_move() {
        let image = Array2::<f64>::zeros((6, 6));
        let config = ToolConfig::default();
        let mut store = MaskStore::with_shape(image.dim());
        let mut grids = GridCache::new();
        let mut ctx = EditContext::new(Some(image.view()), &mut store, &mut grids, &config);

        let mut tool = MoveTool::new();
        tool.on_press(&mut ctx, Point::new(2.5, 2.5));
        tool.on_drag(&mut ctx, Point::new(3.5, 2.5), (1.0, 0.0));
        assert!(ctx.store.current().is_none());
    }
}
