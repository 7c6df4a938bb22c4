//! Editable geometry: addressable control points over a figure's shape.
//!
//! A geometry owns a shape and derives [`Site`]s from it. Translating a
//! site mutates the owning geometry's shape, so a site's position is always
//! consistent with the geometry's last-set shape.

mod bounds;
mod circle;
mod path;

pub use bounds::{BoundsGeometry, DEFAULT_MINIMUM_SIZE};
pub use circle::CircleGeometry;
pub use path::{PathGeometry, SegmentKind};

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// The eight compass directions on a rectangular geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl CompassPoint {
    /// All eight compass directions, corners last.
    pub fn all() -> [CompassPoint; 8] {
        [
            CompassPoint::North,
            CompassPoint::South,
            CompassPoint::East,
            CompassPoint::West,
            CompassPoint::NorthEast,
            CompassPoint::NorthWest,
            CompassPoint::SouthEast,
            CompassPoint::SouthWest,
        ]
    }

    /// Outward normal angle in radians, screen coordinates (y grows down).
    pub fn normal(self) -> f64 {
        match self {
            CompassPoint::East => 0.0,
            CompassPoint::SouthEast => FRAC_PI_4,
            CompassPoint::South => FRAC_PI_2,
            CompassPoint::SouthWest => 3.0 * FRAC_PI_4,
            CompassPoint::West => PI,
            CompassPoint::NorthWest => -3.0 * FRAC_PI_4,
            CompassPoint::North => -FRAC_PI_2,
            CompassPoint::NorthEast => -FRAC_PI_4,
        }
    }

    /// True for the four corner directions.
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            CompassPoint::NorthEast
                | CompassPoint::NorthWest
                | CompassPoint::SouthEast
                | CompassPoint::SouthWest
        )
    }
}

/// Identifies a site on a geometry. The meaning is geometry-specific:
/// compass direction on a rectangle, the single radius handle on a circle,
/// or a vertex / control-point index on a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteId {
    /// One of the eight compass sites on a bounds geometry.
    Compass(CompassPoint),
    /// The center site, used only for whole-figure dragging.
    Center,
    /// The single free-angle site on a circle geometry.
    Radius,
    /// The endpoint of a path segment, indexed in path order.
    Vertex(usize),
    /// Coordinate pair `index` of path segment `vertex`: for a quad
    /// segment index 0 is the control point and 1 the endpoint; for a
    /// cubic, 0 and 1 are control points and 2 the endpoint.
    Control { vertex: usize, index: usize },
}

/// An addressable point on a geometry, with an optional outward normal.
///
/// Sites are derived snapshots: reposition them through the geometry's
/// `translate_site`, not by mutating the returned value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    /// Position in world coordinates.
    pub point: Point,
    /// Outward normal angle in radians, if the geometry defines one.
    pub normal: Option<f64>,
}

impl Site {
    /// Create a site with no normal.
    pub fn new(id: SiteId, point: Point) -> Self {
        Self {
            id,
            point,
            normal: None,
        }
    }

    /// Set the normal angle.
    pub fn with_normal(mut self, normal: f64) -> Self {
        self.normal = Some(normal);
        self
    }
}
