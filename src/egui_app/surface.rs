#![cfg(feature = "egui")]

use eframe::egui::{self, Color32, Pos2, Rect, Stroke};
use eframe::egui::epaint::{QuadraticBezierShape, Shape};

use crate::color::Rgba;
use crate::geometry::{LineCap, LineJoin, Polyline, RectF, Vec2f};
use crate::render::Surface;

pub(crate) fn rgba_to_color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

pub(crate) fn color32_to_rgba(c: Color32) -> Rgba {
    let [r, g, b, a] = c.to_srgba_unmultiplied();
    Rgba::new(r, g, b, a)
}

/// [`Surface`] backed by an egui painter clipped to the canvas rect.
///
/// Canvas pixel `(0, 0)` maps to the top-left of `rect`; egui points are used
/// as canvas pixels, so hosts pass a pixel ratio of 1.
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    rect: Rect,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a egui::Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn pos(&self, p: Vec2f) -> Pos2 {
        Pos2::new(self.rect.min.x + p.x, self.rect.min.y + p.y)
    }

    fn round_dots(&self, points: &[Pos2], width: f32, color: Color32) {
        for p in points {
            self.painter.circle_filled(*p, width * 0.5, color);
        }
    }
}

impl Surface for EguiSurface<'_> {
    fn size(&self) -> Vec2f {
        Vec2f::new(self.rect.width(), self.rect.height())
    }

    fn clear(&mut self, color: Rgba) {
        self.painter.rect_filled(self.rect, 0.0, rgba_to_color32(color));
    }

    fn fill_circle(&mut self, center: Vec2f, radius: f32, color: Rgba) {
        self.painter
            .circle_filled(self.pos(center), radius, rgba_to_color32(color));
    }

    fn fill_rounded_rect(&mut self, rect: RectF, corner_radius: f32, color: Rgba) {
        let r = Rect::from_min_max(self.pos(rect.min), self.pos(rect.max));
        self.painter
            .rect_filled(r, corner_radius, rgba_to_color32(color));
    }

    fn fill_polygon(&mut self, points: &[Vec2f], color: Rgba) {
        let pts: Vec<Pos2> = points.iter().map(|p| self.pos(*p)).collect();
        self.painter.add(Shape::convex_polygon(
            pts,
            rgba_to_color32(color),
            Stroke::NONE,
        ));
    }

    fn stroke_polyline(&mut self, polyline: &Polyline, width: f32, color: Rgba) {
        let pts: Vec<Pos2> = polyline.points.iter().map(|p| self.pos(*p)).collect();
        if pts.len() < 2 {
            return;
        }
        let c = rgba_to_color32(color);
        self.painter.add(Shape::line(pts.clone(), Stroke::new(width, c)));
        // egui strokes have miter joins and butt caps; round ones are discs at the vertices.
        if polyline.join == LineJoin::Round && pts.len() > 2 {
            self.round_dots(&pts[1..pts.len() - 1], width, c);
        }
        if polyline.cap == LineCap::Round {
            self.round_dots(&[pts[0], pts[pts.len() - 1]], width, c);
        }
    }

    fn stroke_quadratic(&mut self, from: Vec2f, control: Vec2f, to: Vec2f, width: f32, color: Rgba) {
        let c = rgba_to_color32(color);
        let pts = [self.pos(from), self.pos(control), self.pos(to)];
        self.painter.add(QuadraticBezierShape::from_points_stroke(
            pts,
            false,
            Color32::TRANSPARENT,
            Stroke::new(width, c),
        ));
        self.round_dots(&[pts[0], pts[2]], width, c);
    }
}
