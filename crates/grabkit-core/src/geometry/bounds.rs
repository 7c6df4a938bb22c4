//! Rectangular geometry with compass sites and minimum-size clamping.

use super::{CompassPoint, Site, SiteId};
use crate::error::{ManipulationError, ManipulationResult};
use crate::figure::{Shape, ShapeKind};
use kurbo::{Rect, Vec2};

/// Default minimum edge separation.
pub const DEFAULT_MINIMUM_SIZE: f64 = 1.0;

/// Unconsumed drag held back while an edge is pinned at the minimum size.
///
/// `held` is the drag distance (toward the constraint) that was requested
/// but not applied. Reverse motion is absorbed by `held` before the edge
/// actually moves, which makes an overshoot-then-return drag restore the
/// original rectangle exactly.
#[derive(Debug, Clone, Copy, Default)]
struct Overshoot {
    held: f64,
}

impl Overshoot {
    /// Apply a drag of `toward` (positive = toward the constraint) given
    /// `slack` room before the minimum binds. Returns the distance the
    /// edge actually moves toward the constraint.
    fn apply(&mut self, toward: f64, slack: f64) -> f64 {
        let total = self.held + toward;
        let applied = total.min(slack);
        self.held = (total - applied).max(0.0);
        applied
    }

    fn reset(&mut self) {
        self.held = 0.0;
    }
}

/// A rectangle exposing eight compass sites plus a center site.
///
/// Corner and edge sites translate the rectangle's free coordinates,
/// clamped so the two edges on each axis stay at least `minimum_size`
/// apart. Excess drag accumulates as overshoot and is released only once
/// the pointer returns past the point where the minimum no longer binds.
#[derive(Debug, Clone)]
pub struct BoundsGeometry {
    rect: Rect,
    minimum_size: f64,
    overshoot_x: Overshoot,
    overshoot_y: Overshoot,
}

impl BoundsGeometry {
    /// Create a geometry over a rectangle.
    pub fn new(rect: Rect, minimum_size: f64) -> Self {
        Self {
            rect: rect.abs(),
            minimum_size,
            overshoot_x: Overshoot::default(),
            overshoot_y: Overshoot::default(),
        }
    }

    /// The current rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The geometry's shape as a value.
    pub fn shape(&self) -> Shape {
        Shape::Rect(self.rect)
    }

    /// Replace the rectangle. Fails on a non-rect shape; resets overshoot.
    pub fn set_shape(&mut self, shape: Shape) -> ManipulationResult<()> {
        match shape {
            Shape::Rect(r) => {
                self.set_rect(r);
                Ok(())
            }
            other => Err(ManipulationError::ShapeMismatch {
                expected: ShapeKind::Rect,
                found: other.kind(),
            }),
        }
    }

    /// Replace the rectangle directly.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect.abs();
        self.begin_drag();
    }

    pub fn minimum_size(&self) -> f64 {
        self.minimum_size
    }

    pub fn set_minimum_size(&mut self, minimum_size: f64) {
        self.minimum_size = minimum_size;
    }

    /// Reset the overshoot accumulators. Call at gesture boundaries.
    pub fn begin_drag(&mut self) {
        self.overshoot_x.reset();
        self.overshoot_y.reset();
    }

    /// Shift the whole rectangle.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.rect = self.rect + Vec2::new(dx, dy);
    }

    /// The eight compass sites.
    pub fn sites(&self) -> Vec<Site> {
        CompassPoint::all()
            .into_iter()
            .map(|c| self.compass_site(c))
            .collect()
    }

    /// The center site, obtained separately from `sites` and used only for
    /// whole-figure dragging.
    pub fn center_site(&self) -> Site {
        Site::new(SiteId::Center, self.rect.center())
    }

    /// Look up a site by id.
    pub fn site(&self, id: SiteId) -> ManipulationResult<Site> {
        match id {
            SiteId::Compass(c) => Ok(self.compass_site(c)),
            SiteId::Center => Ok(self.center_site()),
            other => Err(ManipulationError::UnknownSite(other)),
        }
    }

    fn compass_site(&self, compass: CompassPoint) -> Site {
        let r = self.rect;
        let c = r.center();
        let point = match compass {
            CompassPoint::North => kurbo::Point::new(c.x, r.y0),
            CompassPoint::South => kurbo::Point::new(c.x, r.y1),
            CompassPoint::East => kurbo::Point::new(r.x1, c.y),
            CompassPoint::West => kurbo::Point::new(r.x0, c.y),
            CompassPoint::NorthEast => kurbo::Point::new(r.x1, r.y0),
            CompassPoint::NorthWest => kurbo::Point::new(r.x0, r.y0),
            CompassPoint::SouthEast => kurbo::Point::new(r.x1, r.y1),
            CompassPoint::SouthWest => kurbo::Point::new(r.x0, r.y1),
        };
        Site::new(SiteId::Compass(compass), point).with_normal(compass.normal())
    }

    /// Translate a site, adjusting the rectangle's free coordinates and
    /// clamping against the minimum size.
    pub fn translate_site(&mut self, id: SiteId, dx: f64, dy: f64) -> ManipulationResult<()> {
        match id {
            SiteId::Center => {
                self.translate(dx, dy);
                Ok(())
            }
            SiteId::Compass(compass) => {
                use CompassPoint::*;
                match compass {
                    West | NorthWest | SouthWest => self.move_left_edge(dx),
                    East | NorthEast | SouthEast => self.move_right_edge(dx),
                    _ => {}
                }
                match compass {
                    North | NorthWest | NorthEast => self.move_top_edge(dy),
                    South | SouthWest | SouthEast => self.move_bottom_edge(dy),
                    _ => {}
                }
                Ok(())
            }
            other => Err(ManipulationError::UnknownSite(other)),
        }
    }

    // Edge moves share one overshoot accumulator per axis; only one edge
    // per axis moves within a gesture.

    fn move_left_edge(&mut self, dx: f64) {
        let slack = (self.rect.x1 - self.minimum_size) - self.rect.x0;
        self.rect.x0 += self.overshoot_x.apply(dx, slack);
    }

    fn move_right_edge(&mut self, dx: f64) {
        let slack = self.rect.x1 - (self.rect.x0 + self.minimum_size);
        self.rect.x1 -= self.overshoot_x.apply(-dx, slack);
    }

    fn move_top_edge(&mut self, dy: f64) {
        let slack = (self.rect.y1 - self.minimum_size) - self.rect.y0;
        self.rect.y0 += self.overshoot_y.apply(dy, slack);
    }

    fn move_bottom_edge(&mut self, dy: f64) {
        let slack = self.rect.y1 - (self.rect.y0 + self.minimum_size);
        self.rect.y1 -= self.overshoot_y.apply(-dy, slack);
    }
}
