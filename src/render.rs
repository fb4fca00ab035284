//! Scene rendering against an abstract 2D surface.
//!
//! Layers, bottom to top: background fill, faint grid dots, connection strokes
//! (or traced tubes in `ref` mode), then one glyph per filled cell. Glyphs are
//! drawn after every stroke so a link can never cover a cell.

use crate::color::Rgba;
use crate::connections::{Connection, ConnectionGraphBuilder, ConnectionKind};
use crate::geometry::{Polyline, RectF, Vec2f};
use crate::grid::CellGrid;
use crate::model::{Cell, CellShape, ConnectionType, StrokeStyle};
use crate::trace::PathTracer;
use crate::viewport::Viewport;

/// Minimal drawing capability the engine needs. All coordinates are canvas pixels.
pub trait Surface {
    fn size(&self) -> Vec2f;
    fn clear(&mut self, color: Rgba);
    fn fill_circle(&mut self, center: Vec2f, radius: f32, color: Rgba);
    fn fill_rounded_rect(&mut self, rect: RectF, corner_radius: f32, color: Rgba);
    fn fill_polygon(&mut self, points: &[Vec2f], color: Rgba);
    /// Stroke a polyline honouring its cap and join settings.
    fn stroke_polyline(&mut self, polyline: &Polyline, width: f32, color: Rgba);
    /// Stroke a quadratic Bézier with round caps.
    fn stroke_quadratic(&mut self, from: Vec2f, control: Vec2f, to: Vec2f, width: f32, color: Rgba);
}

/// Counts of what the last render pass drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub dots: usize,
    pub links: usize,
    pub tubes: usize,
    pub glyphs: usize,
}

/// Glyph geometry factors, relative to the cell size.
pub const ROUNDED_SIDE: f32 = 0.85;
pub const ROUNDED_CORNER: f32 = 0.4;
pub const SQUARE_SIDE: f32 = 0.8;
pub const CIRCLE_RADIUS: f32 = 0.4;
pub const DIAMOND_HALF_DIAGONAL: f32 = 0.35;

/// Below this many canvas pixels between dots, dots are thinned out.
const MIN_DOT_SPACING: f32 = 8.0;

/// Draw one filled cell glyph centered at `center`.
pub fn draw_glyph(
    surface: &mut dyn Surface,
    center: Vec2f,
    shape: CellShape,
    cell_size: f32,
    color: Rgba,
) {
    match shape {
        CellShape::Rounded => {
            let side = ROUNDED_SIDE * cell_size;
            let rect = RectF::from_center_size(center, side, side);
            surface.fill_rounded_rect(rect, ROUNDED_CORNER * side, color);
        }
        CellShape::Square => {
            let side = SQUARE_SIDE * cell_size;
            let rect = RectF::from_center_size(center, side, side);
            surface.fill_rounded_rect(rect, 0.0, color);
        }
        CellShape::Circle => {
            surface.fill_circle(center, CIRCLE_RADIUS * cell_size, color);
        }
        CellShape::Diamond => {
            let h = DIAMOND_HALF_DIAGONAL * cell_size;
            let pts = [
                Vec2f::new(center.x, center.y - h),
                Vec2f::new(center.x + h, center.y),
                Vec2f::new(center.x, center.y + h),
                Vec2f::new(center.x - h, center.y),
            ];
            surface.fill_polygon(&pts, color);
        }
    }
}

/// Dot color that reads faintly on `background`.
pub fn grid_dot_color(background: Rgba) -> Rgba {
    if background.luminance() > 0.5 {
        Rgba::rgb(0, 0, 0).with_alpha(0.12)
    } else {
        Rgba::rgb(255, 255, 255).with_alpha(0.12)
    }
}

/// Renders a [`CellGrid`] under a [`Viewport`] with a [`StrokeStyle`].
pub struct CellRenderer<'a> {
    pub viewport: &'a Viewport,
    pub style: &'a StrokeStyle,
    pub density_seed: u64,
}

impl<'a> CellRenderer<'a> {
    pub fn new(viewport: &'a Viewport, style: &'a StrokeStyle) -> Self {
        Self {
            viewport,
            style,
            density_seed: 0,
        }
    }

    pub fn with_density_seed(mut self, seed: u64) -> Self {
        self.density_seed = seed;
        self
    }

    fn stroke_width(&self) -> f32 {
        self.style.thickness_ratio * self.viewport.cell_size()
    }

    /// Canvas area worth drawing into, padded so strokes entering from off-screen cells show.
    fn cull_rect(&self, surface: &dyn Surface, pad_cells: f32) -> RectF {
        let pad = self.viewport.cell_size() * pad_cells;
        let size = surface.size();
        RectF::from_min_max(Vec2f::new(-pad, -pad), Vec2f::new(size.x + pad, size.y + pad))
    }

    /// Draw the whole scene. A missing surface is a no-op.
    pub fn render(&self, surface: Option<&mut dyn Surface>, grid: &CellGrid) -> RenderStats {
        let Some(surface) = surface else {
            tracing::trace!("render skipped: no surface");
            return RenderStats::default();
        };
        let mut stats = RenderStats::default();
        surface.clear(self.style.background_color);
        stats.dots = self.draw_grid_dots(surface);
        match self.style.connection_type {
            ConnectionType::Off => {}
            ConnectionType::Ref => stats.tubes = self.draw_tubes(surface, grid),
            _ => {
                let links = ConnectionGraphBuilder::new(
                    self.style.connection_type,
                    self.style.connection_density,
                    self.density_seed,
                )
                .with_web_radius(self.style.web_radius)
                .build(grid);
                stats.links = self.draw_links(surface, &links);
            }
        }
        stats.glyphs = self.draw_glyphs(surface, grid);
        tracing::trace!(?stats, "rendered");
        stats
    }

    /// Faint reference dots at visible cell centers, thinned when zoomed far out.
    pub fn draw_grid_dots(&self, surface: &mut dyn Surface) -> usize {
        let cs = self.viewport.cell_size();
        let size = surface.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return 0;
        }
        let step = (MIN_DOT_SPACING / cs).ceil().max(1.0) as i32;
        let tl = self.viewport.canvas_to_cell(Vec2f::ZERO);
        let br = self.viewport.canvas_to_cell(size);
        let color = grid_dot_color(self.style.background_color);
        let radius = (cs * 0.05).max(0.75);
        let start_x = tl.x.div_euclid(step) * step;
        let start_y = tl.y.div_euclid(step) * step;
        let mut count = 0;
        let mut y = start_y;
        while y <= br.y {
            let mut x = start_x;
            while x <= br.x {
                surface.fill_circle(self.viewport.cell_center(Cell::new(x, y)), radius, color);
                count += 1;
                x += step;
            }
            y += step;
        }
        count
    }

    fn draw_tubes(&self, surface: &mut dyn Surface, grid: &CellGrid) -> usize {
        let width = self.stroke_width();
        let cull = self.cull_rect(surface, 1.0);
        let polylines: Vec<Polyline> = PathTracer::trace(grid)
            .iter()
            .map(|p| {
                Polyline::rounded(p.cells().iter().map(|c| self.viewport.cell_center(*c)).collect())
            })
            .filter(|pl| pl.bounds().is_some_and(|b| b.intersects(cull)))
            .collect();
        for _ in 0..self.style.weld_passes.max(1) {
            for pl in &polylines {
                surface.stroke_polyline(pl, width, self.style.fill_color);
            }
        }
        polylines.len()
    }

    fn draw_links(&self, surface: &mut dyn Surface, links: &[Connection]) -> usize {
        let cs = self.viewport.cell_size();
        let base = self.stroke_width();
        let cull = self.cull_rect(surface, 2.0);
        let mut drawn = 0;
        for link in links {
            let a = self.viewport.cell_center(link.from);
            let b = self.viewport.cell_center(link.to);
            if !cull.contains(a) && !cull.contains(b) {
                continue;
            }
            let width = base * link.width_scale;
            match link.kind {
                ConnectionKind::Straight => {
                    surface.stroke_polyline(&Polyline::rounded(vec![a, b]), width, self.style.fill_color);
                }
                ConnectionKind::Curved { bend } => {
                    let control = a.lerp(b, 0.5) + (b - a).unit_perp() * (bend * cs);
                    surface.stroke_quadratic(a, control, b, width, self.style.fill_color);
                }
            }
            drawn += 1;
        }
        drawn
    }

    fn draw_glyphs(&self, surface: &mut dyn Surface, grid: &CellGrid) -> usize {
        let cs = self.viewport.cell_size();
        let visible = self.cull_rect(surface, 0.0);
        let mut drawn = 0;
        for cell in grid.sorted_cells() {
            if !self.viewport.cell_rect(cell).intersects(visible) {
                continue;
            }
            let center = self.viewport.cell_center(cell);
            draw_glyph(surface, center, self.style.shape, cs, self.style.fill_color);
            drawn += 1;
        }
        drawn
    }
}

/// Something a [`RecordingSurface`] was asked to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    Circle {
        center: Vec2f,
        radius: f32,
        color: Rgba,
    },
    RoundedRect {
        rect: RectF,
        corner_radius: f32,
        color: Rgba,
    },
    Polygon {
        points: Vec<Vec2f>,
        color: Rgba,
    },
    Polyline {
        polyline: Polyline,
        width: f32,
        color: Rgba,
    },
    Quadratic {
        from: Vec2f,
        control: Vec2f,
        to: Vec2f,
        width: f32,
        color: Rgba,
    },
}

/// In-memory surface that records every call; used by tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub size: Vec2f,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2f::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polyline { polyline, .. } => Some(polyline),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2f {
        self.size
    }
    fn clear(&mut self, color: Rgba) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }
    fn fill_circle(&mut self, center: Vec2f, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
    fn fill_rounded_rect(&mut self, rect: RectF, corner_radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::RoundedRect {
            rect,
            corner_radius,
            color,
        });
    }
    fn fill_polygon(&mut self, points: &[Vec2f], color: Rgba) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }
    fn stroke_polyline(&mut self, polyline: &Polyline, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Polyline {
            polyline: polyline.clone(),
            width,
            color,
        });
    }
    fn stroke_quadratic(&mut self, from: Vec2f, control: Vec2f, to: Vec2f, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Quadratic {
            from,
            control,
            to,
            width,
            color,
        });
    }
}
