//! Point constraints applied to pointer positions during a drag.

use kurbo::{Point, Rect};

/// Clamps a point into an allowed region.
///
/// Constraints are chained in list order by the drag interactors; each one
/// sees the output of the previous. [`snapped`](PointConstraint::snapped)
/// reports whether the last `constrain` call moved the point across a
/// region boundary, for constraints that want to drive discrete feedback.
pub trait PointConstraint {
    /// Clamp `point` in place.
    fn constrain(&mut self, point: &mut Point);

    /// Whether the last `constrain` call changed which region the point
    /// falls in.
    fn snapped(&self) -> bool {
        false
    }
}

/// Keeps a point inside a fixed rectangle.
#[derive(Debug, Clone)]
pub struct BoundsConstraint {
    bounds: Rect,
    snapped: bool,
}

impl BoundsConstraint {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds: bounds.abs(),
            snapped: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds.abs();
    }
}

impl PointConstraint for BoundsConstraint {
    fn constrain(&mut self, point: &mut Point) {
        let original = *point;
        point.x = point.x.clamp(self.bounds.x0, self.bounds.x1);
        point.y = point.y.clamp(self.bounds.y0, self.bounds.y1);
        // Clamping means the raw point crossed out of the region
        self.snapped = *point != original;
    }

    fn snapped(&self) -> bool {
        self.snapped
    }
}

/// One quadrant of the plane relative to an origin, screen coordinates
/// (south grows down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Quadrant {
    fn is_east(self) -> bool {
        matches!(self, Quadrant::NorthEast | Quadrant::SouthEast)
    }

    fn is_south(self) -> bool {
        matches!(self, Quadrant::SouthEast | Quadrant::SouthWest)
    }
}

/// Keeps a point inside one quadrant relative to a movable origin.
///
/// The origin is typically reset at the start of each gesture.
#[derive(Debug, Clone)]
pub struct QuadrantConstraint {
    quadrant: Quadrant,
    origin: Point,
    snapped: bool,
}

impl QuadrantConstraint {
    pub fn new(quadrant: Quadrant, origin: Point) -> Self {
        Self {
            quadrant,
            origin,
            snapped: false,
        }
    }

    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }
}

impl PointConstraint for QuadrantConstraint {
    fn constrain(&mut self, point: &mut Point) {
        let original = *point;
        if self.quadrant.is_east() {
            point.x = point.x.max(self.origin.x);
        } else {
            point.x = point.x.min(self.origin.x);
        }
        if self.quadrant.is_south() {
            point.y = point.y.max(self.origin.y);
        } else {
            point.y = point.y.min(self.origin.y);
        }
        self.snapped = *point != original;
    }

    fn snapped(&self) -> bool {
        self.snapped
    }
}
