//! Plain 2D geometry shared by the viewport, the connection builder and the
//! renderer. Kept free of any UI toolkit types so the engine stays host-agnostic.

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub const ZERO: Vec2f = Vec2f { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector rotated 90° counter-clockwise, or zero for a zero vector.
    pub fn unit_perp(self) -> Vec2f {
        let len = self.length();
        if len <= f32::EPSILON {
            return Vec2f::ZERO;
        }
        Vec2f::new(-self.y / len, self.x / len)
    }

    pub fn lerp(self, other: Vec2f, t: f32) -> Vec2f {
        Vec2f::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Centroid of a set of points; `None` when empty.
    pub fn centroid(points: &[Vec2f]) -> Option<Vec2f> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f32;
        let sum = points.iter().fold(Vec2f::ZERO, |acc, p| acc + *p);
        Some(Vec2f::new(sum.x / n, sum.y / n))
    }
}

impl Add for Vec2f {
    type Output = Vec2f;
    fn add(self, rhs: Vec2f) -> Vec2f {
        Vec2f::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2f {
    fn add_assign(&mut self, rhs: Vec2f) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2f {
    type Output = Vec2f;
    fn sub(self, rhs: Vec2f) -> Vec2f {
        Vec2f::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2f {
    type Output = Vec2f;
    fn mul(self, rhs: f32) -> Vec2f {
        Vec2f::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub min: Vec2f,
    pub max: Vec2f,
}

impl RectF {
    pub fn from_min_max(min: Vec2f, max: Vec2f) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2f, w: f32, h: f32) -> Self {
        let half = Vec2f::new(w * 0.5, h * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2f {
        Vec2f::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
    pub fn intersects(&self, other: RectF) -> bool {
        !(self.max.x <= other.min.x
            || other.max.x <= self.min.x
            || self.max.y <= other.min.y
            || other.max.y <= self.min.y)
    }
    pub fn contains(&self, p: Vec2f) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// How the ends of an open stroke are finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
}

/// How consecutive segments of a stroke meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
}

/// A stroke path through a list of points with explicit corner semantics.
///
/// This is the single path primitive the renderer hands to a [`crate::render::Surface`];
/// how round joins are realised is up to each surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline {
    pub points: Vec<Vec2f>,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Polyline {
    pub fn rounded(points: Vec<Vec2f>) -> Self {
        Self {
            points,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }

    /// True when the last point coincides with the first.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) if self.points.len() > 2 => (*a - *b).length() < 1e-4,
            _ => false,
        }
    }

    pub fn bounds(&self) -> Option<RectF> {
        let first = *self.points.first()?;
        let mut r = RectF::from_min_max(first, first);
        for p in &self.points[1..] {
            r.min.x = r.min.x.min(p.x);
            r.min.y = r.min.y.min(p.y);
            r.max.x = r.max.x.max(p.x);
            r.max.y = r.max.y.max(p.y);
        }
        Some(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_of_two_touches() {
        let c = Vec2f::centroid(&[Vec2f::new(0.0, 0.0), Vec2f::new(10.0, 20.0)]).unwrap();
        assert_eq!(c, Vec2f::new(5.0, 10.0));
        assert!(Vec2f::centroid(&[]).is_none());
    }

    #[test]
    fn perp_is_unit_and_orthogonal() {
        let p = Vec2f::new(3.0, 4.0).unit_perp();
        assert!((p.length() - 1.0).abs() < 1e-6);
        assert!((p.x * 3.0 + p.y * 4.0).abs() < 1e-6);
    }

    #[test]
    fn polyline_closed_detection() {
        let open = Polyline::rounded(vec![Vec2f::new(0.0, 0.0), Vec2f::new(1.0, 0.0)]);
        assert!(!open.is_closed());
        let ring = Polyline::rounded(vec![
            Vec2f::new(0.0, 0.0),
            Vec2f::new(1.0, 0.0),
            Vec2f::new(1.0, 1.0),
            Vec2f::new(0.0, 0.0),
        ]);
        assert!(ring.is_closed());
    }
}
