//! Interactive intensity thresholding.

use log::{debug, trace};

use super::{EditContext, Gesture};
use crate::geometry::Point;
use crate::selection::ThresholdWindow;

/// Dragging moves an intensity window; the mask becomes every pixel inside
/// it. Vertical motion shifts the window, horizontal motion resizes it.
#[derive(Debug, Clone, Default)]
pub struct ThresholdTool {
    window: Option<ThresholdWindow>,
}

impl ThresholdTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tool starting from a given window instead of the full image range.
    pub fn with_window(window: ThresholdWindow) -> Self {
        Self {
            window: Some(window),
        }
    }

    pub fn window(&self) -> Option<&ThresholdWindow> {
        self.window.as_ref()
    }
}

impl Gesture for ThresholdTool {
    fn on_press(&mut self, ctx: &mut EditContext<'_>, _at: Point) {
        let Some(image) = ctx.image else { return };
        ctx.begin_edit();
        if self.window.is_none() {
            self.window = ThresholdWindow::for_image(image);
        }
    }

    fn on_drag(&mut self, ctx: &mut EditContext<'_>, _at: Point, (dx, dy): (f64, f64)) {
        let Some(image) = ctx.image else { return };
        let Some(window) = self.window.as_mut() else { return };
        window.drag(dx, dy);
        trace!("threshold: center {}, width {}", window.center, window.width);
        let mask = window.apply(image);
        ctx.replace("threshold", mask);
    }

    fn on_release(&mut self, ctx: &mut EditContext<'_>, _at: Point) {
        if let (Some(window), Some(_)) = (&self.window, ctx.image) {
            let bounds = window.bounds();
            debug!("threshold: window [{}, {}]", bounds.lower, bounds.upper);
        }
    }

    fn cancel(&mut self) {
        self.window = None;
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
    fn test_drag_replaces_mask() {
        let image = Array2::from_shape_fn((4, 4), |(x, y)| (x * 4 + y) as f64 * 32.0);
        let config = ToolConfig::default();
        let mut store = MaskStore::with_shape(image.dim());
        let mut grids = GridCache::new();
        let mut ctx = EditContext::new(Some(image.view()), &mut store, &mut grids, &config);

        let mut tool = ThresholdTool::new();
        tool.on_press(&mut ctx, Point::new(0.5, 0.5));
        // Full-range window selects everything
        tool.on_drag(&mut ctx, Point::new(0.5, 0.5), (0.0, 0.0));
        assert_eq!(ctx.store.count(), 16);

        // Narrow the window to its minimum width around the middle
        tool.on_drag(&mut ctx, Point::new(0.5, 0.5), (-1.0e6, 0.0));
        assert_eq!(tool.window().map(|w| w.width), Some(1.0));
        assert_eq!(ctx.store.count(), 0);

        ctx.store.undo_last();
        assert_eq!(ctx.store.count(), 0);
        assert!(ctx.store.current().is_some());
    }

    #[test]
    fn test_window_persists_between_gestures() {
        let image = Array2::from_shape_fn((4, 4), |(x, y)| (x * 4 + y) as f64 * 32.0);
        let config = ToolConfig::default();
        let mut store = MaskStore::with_shape(image.dim());
        let mut grids = GridCache::new();
        let mut ctx = EditContext::new(Some(image.view()), &mut store, &mut grids, &config);

        let mut tool = ThresholdTool::with_window(ThresholdWindow::new(image.view(), 64.0, 64.0).unwrap());
        tool.on_press(&mut ctx, Point::new(0.5, 0.5));
        tool.on_drag(&mut ctx, Point::new(0.5, 0.5), (0.0, 0.0));
        assert_eq!(ctx.store.count(), 3);
        tool.on_release(&mut ctx, Point::new(0.5, 0.5));

        tool.on_press(&mut ctx, Point::new(0.5, 0.5));
        assert_eq!(tool.window().map(|w| w.center), Some(64.0));

        tool.cancel();
        assert!(tool.window().is_none());
    }
}
