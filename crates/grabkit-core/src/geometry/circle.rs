//! Circle geometry with a single free-angle radius site.

use super::{Site, SiteId};
use crate::error::{ManipulationError, ManipulationResult};
use crate::figure::{Shape, ShapeKind};
use kurbo::{Circle, Point, Rect, Vec2};

/// A circle defined by a center and an offset vector to its radius site.
///
/// Translating the site updates the offset; the radius is the offset's
/// magnitude and the site's normal angle is `atan2(off.y, off.x)`. The
/// offset magnitude is clamped at the minimum size so the normal never
/// degenerates to `atan2(0, 0)`.
#[derive(Debug, Clone)]
pub struct CircleGeometry {
    center: Point,
    offset: Vec2,
    minimum_size: f64,
}

impl CircleGeometry {
    /// Create a geometry over a circle. The radius site starts due east.
    pub fn new(circle: Circle, minimum_size: f64) -> Self {
        Self {
            center: circle.center,
            offset: Vec2::new(circle.radius.max(minimum_size), 0.0),
            minimum_size,
        }
    }

    /// Create a geometry whose circle circumscribes half of `bounds`'
    /// larger dimension, centered on it.
    pub fn from_rect(bounds: Rect, minimum_size: f64) -> Self {
        let radius = (bounds.width().max(bounds.height()) / 2.0).max(minimum_size);
        Self::new(Circle::new(bounds.center(), radius), minimum_size)
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// The radius: the offset vector's magnitude.
    pub fn radius(&self) -> f64 {
        self.offset.hypot()
    }

    /// The radius site's normal angle in radians.
    pub fn normal(&self) -> f64 {
        self.offset.y.atan2(self.offset.x)
    }

    /// The current circle.
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius())
    }

    /// The geometry's shape as a value.
    pub fn shape(&self) -> Shape {
        Shape::Circle(self.circle())
    }

    /// The bounding square refit from `center ± radius`.
    pub fn bounds(&self) -> Rect {
        let r = self.radius();
        Rect::new(
            self.center.x - r,
            self.center.y - r,
            self.center.x + r,
            self.center.y + r,
        )
    }

    /// Replace the circle. Fails on a non-circle shape. The radius site
    /// keeps its current angle.
    pub fn set_shape(&mut self, shape: Shape) -> ManipulationResult<()> {
        match shape {
            Shape::Circle(c) => {
                self.center = c.center;
                let radius = c.radius.max(self.minimum_size);
                let magnitude = self.offset.hypot();
                self.offset = if magnitude < 1e-9 {
                    Vec2::new(radius, 0.0)
                } else {
                    self.offset * (radius / magnitude)
                };
                Ok(())
            }
            other => Err(ManipulationError::ShapeMismatch {
                expected: ShapeKind::Circle,
                found: other.kind(),
            }),
        }
    }

    /// Shift the whole circle.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.center += Vec2::new(dx, dy);
    }

    /// The single radius site.
    pub fn sites(&self) -> Vec<Site> {
        vec![self.radius_site()]
    }

    /// Look up a site by id.
    pub fn site(&self, id: SiteId) -> ManipulationResult<Site> {
        match id {
            SiteId::Radius => Ok(self.radius_site()),
            other => Err(ManipulationError::UnknownSite(other)),
        }
    }

    fn radius_site(&self) -> Site {
        Site::new(SiteId::Radius, self.center + self.offset).with_normal(self.normal())
    }

    /// Translate the radius site, recomputing radius and normal. The
    /// offset magnitude is clamped, not the angle.
    pub fn translate_site(&mut self, id: SiteId, dx: f64, dy: f64) -> ManipulationResult<()> {
        match id {
            SiteId::Radius => {
                let proposed = self.offset + Vec2::new(dx, dy);
                let magnitude = proposed.hypot();
                self.offset = if magnitude >= self.minimum_size {
                    proposed
                } else if magnitude > 1e-9 {
                    proposed * (self.minimum_size / magnitude)
                } else {
                    // Dragged exactly onto the center: keep the previous
                    // angle, pinned at the minimum radius
                    self.offset * (self.minimum_size / self.offset.hypot())
                };
                Ok(())
            }
            other => Err(ManipulationError::UnknownSite(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// splitmix32-style mixer for deterministic pseudo-random sequences.
    fn mix(mut x: u32) -> u32 {
        x = x.wrapping_mul(0x9E3779B9);
        x ^= x >> 16;
        x = x.wrapping_mul(0x85EBCA6B);
        x ^= x >> 13;
        x = x.wrapping_mul(0xC2B2AE35);
        x ^= x >> 16;
        x
    }

    #[test]
    fn test_radius_site_position() {
        let g = CircleGeometry::new(Circle::new(Point::new(10.0, 20.0), 5.0), 1.0);
        let site = g.site(SiteId::Radius).unwrap();
        assert_eq!(site.point, Point::new(15.0, 20.0));
        assert_eq!(site.normal, Some(0.0));
    }

    #[test]
    fn test_translate_site_updates_radius_and_normal() {
        let mut g = CircleGeometry::new(Circle::new(Point::ZERO, 5.0), 1.0);
        // Offset goes from (5, 0) to (3, 4): radius 5, normal atan2(4, 3)
        g.translate_site(SiteId::Radius, -2.0, 4.0).unwrap();
        assert!((g.radius() - 5.0).abs() < 1e-9);
        assert!((g.normal() - 4.0_f64.atan2(3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_normal_law_randomized() {
        let mut g = CircleGeometry::new(Circle::new(Point::ZERO, 50.0), 2.0);
        for i in 0..1000u32 {
            let dx = (mix(i * 2 + 1) % 2001) as f64 / 100.0 - 10.0;
            let dy = (mix(i * 2 + 2) % 2001) as f64 / 100.0 - 10.0;
            g.translate_site(SiteId::Radius, dx, dy).unwrap();

            let site = g.site(SiteId::Radius).unwrap();
            let offset = site.point - g.center();
            assert!((site.normal.unwrap() - offset.y.atan2(offset.x)).abs() < 1e-6);
            assert!(g.radius() >= 2.0 - 1e-9);
        }
    }

    #[test]
    fn test_degenerate_drag_keeps_angle() {
        let mut g = CircleGeometry::new(Circle::new(Point::ZERO, 5.0), 2.0);
        g.translate_site(SiteId::Radius, -1.0, 3.0).unwrap();
        let normal = g.normal();
        // Drag the site exactly onto the center
        let offset = g.site(SiteId::Radius).unwrap().point - g.center();
        g.translate_site(SiteId::Radius, -offset.x, -offset.y)
            .unwrap();
        assert!((g.radius() - 2.0).abs() < 1e-9);
        assert!((g.normal() - normal).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_refit() {
        let mut g = CircleGeometry::new(Circle::new(Point::new(10.0, 10.0), 5.0), 1.0);
        g.translate_site(SiteId::Radius, 5.0, 0.0).unwrap();
        assert_eq!(g.bounds(), Rect::new(0.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn test_whole_translate_moves_center() {
        let mut g = CircleGeometry::new(Circle::new(Point::ZERO, 5.0), 1.0);
        g.translate(3.0, 4.0);
        assert_eq!(g.center(), Point::new(3.0, 4.0));
        assert!((g.radius() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_shape_wrong_kind() {
        let mut g = CircleGeometry::new(Circle::new(Point::ZERO, 5.0), 1.0);
        let err = g
            .set_shape(Shape::Rect(Rect::new(0.0, 0.0, 1.0, 1.0)))
            .unwrap_err();
        assert!(matches!(err, ManipulationError::ShapeMismatch { .. }));
    }
}
