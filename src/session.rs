//! An editing session: one image, its mask, and the active tool.

use log::{debug, info};
use ndarray::Array2;

use crate::config::ToolConfig;
use crate::error::MaskError;
use crate::geometry::{GridCache, Point};
use crate::store::MaskStore;
use crate::tools::{EditContext, Gesture, Preview, Tool};
use crate::Mask;

/// Owns everything a host needs to drive the editing tools.
///
/// The host forwards pointer events; after each event it can poll
/// [`EditSession::take_dirty`] to find out whether the mask must be redrawn.
#[derive(Debug, Default)]
pub struct EditSession {
    image: Option<Array2<f64>>,
    store: MaskStore,
    grids: GridCache,
    config: ToolConfig,
    tool: Tool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(image: Array2<f64>) -> Self {
        let mut session = Self::default();
        session.set_image(image);
        session
    }

    /// Load a new image. The mask, its undo slot and the pixel-center grid
    /// are dropped; the grid is rebuilt on first use.
    pub fn set_image(&mut self, image: Array2<f64>) {
        let shape = image.dim();
        info!("new image {shape:?}");
        self.store.reset(shape);
        self.grids.invalidate();
        self.tool.cancel();
        self.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
        self.store = MaskStore::new();
        self.grids.invalidate();
        self.tool.cancel();
    }

    pub fn image(&self) -> Option<&Array2<f64>> {
        self.image.as_ref()
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.store.current()
    }

    pub fn store(&self) -> &MaskStore {
        &self.store
    }

    /// Replace the mask wholesale, e.g. with one loaded by the host.
    pub fn set_mask(&mut self, mask: Mask) -> Result<(), MaskError> {
        self.store.replace(mask)
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Install new tool options; rejected options leave the old ones in place.
    pub fn set_config(&mut self, config: ToolConfig) -> Result<(), MaskError> {
        config.validate()?;
        debug!("tool options {config:?}");
        self.config = config;
        Ok(())
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    /// Switch tools, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool.cancel();
        self.tool = tool;
    }

    fn dispatch<F>(&mut self, event: F)
    where
        F: FnOnce(&mut Tool, &mut EditContext<'_>),
    {
        let mut ctx = EditContext::new(
            self.image.as_ref().map(|image| image.view()),
            &mut self.store,
            &mut self.grids,
            &self.config,
        );
        event(&mut self.tool, &mut ctx);
    }

    pub fn press(&mut self, at: Point) {
        self.dispatch(|tool, ctx| tool.on_press(ctx, at));
    }

    pub fn drag(&mut self, at: Point, delta: (f64, f64)) {
        self.dispatch(|tool, ctx| tool.on_drag(ctx, at, delta));
    }

    pub fn release(&mut self, at: Point) {
        self.dispatch(|tool, ctx| tool.on_release(ctx, at));
    }

    pub fn hover(&mut self, at: Point) {
        self.dispatch(|tool, ctx| tool.on_hover(ctx, at));
    }

    pub fn double_click(&mut self, at: Point) {
        self.dispatch(|tool, ctx| tool.on_double_click(ctx, at));
    }

    /// Restore the mask as it was before the last gesture.
    pub fn undo(&mut self) {
        if self.image.is_some() {
            self.store.undo_last();
        }
    }

    pub fn preview(&self) -> Preview {
        if self.image.is_none() {
            return Preview::None;
        }
        self.tool.preview(&self.config)
    }

    pub fn take_dirty(&mut self) -> bool {
        self.store.take_dirty()
    }
}
