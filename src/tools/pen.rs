//! Outline pens: freehand, polygon, rectangle, circle and contour selection.
//!
//! Each pen builds a raster on release (double-click for the polygon) and
//! merges it into the mask with the configured combine mode.

use log::trace;

use super::{EditContext, Gesture, Preview};
use crate::config::ToolConfig;
use crate::geometry::{rasterize_circle, rasterize_polygon, rasterize_rectangle, Point};
use crate::selection::{contours_to_mask, trace_all_through_pixel, trace_through_pixel, Contour};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenShape {
    Freehand,
    Polygon,
    Rectangle,
    Circle,
    /// The iso-contour through the clicked pixel
    Contour,
    /// Every iso-contour at the clicked pixel's value
    AllContours,
}

impl PenShape {
    pub const ALL: [PenShape; 6] = [
        PenShape::Freehand,
        PenShape::Polygon,
        PenShape::Rectangle,
        PenShape::Circle,
        PenShape::Contour,
        PenShape::AllContours,
    ];

    fn name(self) -> &'static str {
        match self {
            PenShape::Freehand => "freehand pen",
            PenShape::Polygon => "polygon pen",
            PenShape::Rectangle => "rectangle pen",
            PenShape::Circle => "circle pen",
            PenShape::Contour => "contour pen",
            PenShape::AllContours => "all-contours pen",
        }
    }
}

/// Geometry of the outline in progress.
#[derive(Debug, Clone, Default)]
enum Outline {
    #[default]
    Idle,
    Path(Vec<Point>),
    Rectangle {
        anchor: Point,
        corner: Option<Point>,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Contours(Vec<Contour>),
}

#[derive(Debug, Clone)]
pub struct PenTool {
    pub shape: PenShape,
    outline: Outline,
}

impl PenTool {
    pub fn new(shape: PenShape) -> Self {
        Self {
            shape,
            outline: Outline::Idle,
        }
    }

    /// Whether an outline is being drawn.
    pub fn is_active(&self) -> bool {
        !matches!(self.outline, Outline::Idle)
    }

    fn find_contours(&self, ctx: &EditContext<'_>, at: Point) -> Vec<Contour> {
        let Some(image) = ctx.image else {
            return Vec::new();
        };
        let (x, y) = at.pixel();
        match self.shape {
            PenShape::Contour => trace_through_pixel(image, x, y).into_iter().collect(),
            _ => {
                let restrict = ctx.store.current().map(|m| m.view());
                trace_all_through_pixel(image, x, y, restrict).unwrap_or_default()
            }
        }
    }

    /// Rasterize the finished outline and merge it into the mask.
    fn fill(&mut self, ctx: &mut EditContext<'_>) {
        let Some(image) = ctx.image else { return };
        let shape = image.dim();
        let raster = match std::mem::take(&mut self.outline) {
            Outline::Idle => return,
            Outline::Path(points) => rasterize_polygon(&points, shape),
            Outline::Rectangle { corner: None, .. } => return,
            Outline::Rectangle {
                anchor,
                corner: Some(corner),
            } => rasterize_rectangle(anchor, corner, ctx.grids.get(shape)),
            Outline::Circle { center, radius } => rasterize_circle(center, radius, ctx.grids.get(shape)),
            Outline::Contours(contours) => {
                if contours.is_empty() {
                    return;
                }
                contours_to_mask(&contours, shape)
            }
        };
        ctx.commit(self.shape.name(), &raster);
    }
}

impl Gesture for PenTool {
    fn on_press(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        if ctx.image.is_none() {
            return;
        }
        match self.shape {
            PenShape::Polygon => match &mut self.outline {
                Outline::Path(points) => {
                    if let Some(last) = points.last_mut() {
                        *last = at;
                    }
                    points.push(at);
                }
                _ => self.outline = Outline::Path(vec![at, at]),
            },
            PenShape::Freehand => {
                ctx.begin_edit();
                self.outline = Outline::Path(vec![at]);
            }
            PenShape::Rectangle => {
                ctx.begin_edit();
                self.outline = Outline::Rectangle {
                    anchor: at,
                    corner: None,
                };
            }
            PenShape::Circle => {
                ctx.begin_edit();
                self.outline = Outline::Circle {
                    center: at,
                    radius: 0.0,
                };
            }
            PenShape::Contour | PenShape::AllContours => {
                let contours = self.find_contours(ctx, at);
                ctx.begin_edit();
                self.outline = Outline::Contours(contours);
            }
        }
    }

    fn on_drag(&mut self, ctx: &mut EditContext<'_>, at: Point, _delta: (f64, f64)) {
        if ctx.image.is_none() {
            return;
        }
        if let Outline::Contours(_) = self.outline {
            let contours = self.find_contours(ctx, at);
            trace!("{}: {} contours at {:?}", self.shape.name(), contours.len(), at.pixel());
            self.outline = Outline::Contours(contours);
            return;
        }
        match (self.shape, &mut self.outline) {
            (PenShape::Freehand, Outline::Path(points)) => {
                if points.last() != Some(&at) {
                    points.push(at);
                }
            }
            (PenShape::Polygon, Outline::Path(points)) => {
                if let Some(last) = points.last_mut() {
                    *last = at;
                }
            }
            (_, Outline::Rectangle { corner, .. }) => *corner = Some(at),
            (_, Outline::Circle { center, radius }) => *radius = center.distance_to(&at),
            _ => {}
        }
    }

    fn on_release(&mut self, ctx: &mut EditContext<'_>, _at: Point) {
        // The polygon closes on double-click
        if self.shape != PenShape::Polygon {
            self.fill(ctx);
        }
    }

    fn on_hover(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        if ctx.image.is_none() {
            return;
        }
        if let (PenShape::Polygon, Outline::Path(points)) = (self.shape, &mut self.outline) {
            if let Some(last) = points.last_mut() {
                *last = at;
            }
        }
    }

    fn on_double_click(&mut self, ctx: &mut EditContext<'_>, at: Point) {
        if self.shape != PenShape::Polygon || ctx.image.is_none() {
            return;
        }
        if let Outline::Path(points) = &mut self.outline {
            if let Some(last) = points.last_mut() {
                *last = at;
            }
            ctx.begin_edit();
            self.fill(ctx);
        }
    }

    fn cancel(&mut self) {
        self.outline = Outline::Idle;
    }

    fn preview(&self, _config: &ToolConfig) -> Preview {
        match &self.outline {
            Outline::Idle => Preview::None,
            Outline::Path(points) => Preview::Path {
                points: points.clone(),
                closed: true,
            },
            Outline::Rectangle { corner: None, .. } => Preview::None,
            Outline::Rectangle {
                anchor,
                corner: Some(corner),
            } => Preview::Rectangle {
                corner1: *anchor,
                corner2: *corner,
            },
            Outline::Circle { center, radius } => Preview::Circle {
                center: *center,
                radius: *radius,
            },
            Outline::Contours(contours) => {
                Preview::Contours(contours.iter().map(Contour::preview_points).collect())
            }
        }
    }
}
