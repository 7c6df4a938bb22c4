//! Figure definitions: the narrow capability set interactors edit through.
//!
//! A figure exposes bounds, an optional replaceable shape, translation, and
//! affine transformation. Precise vector hit-testing is out of scope; hit
//! tests here are bounds- or outline-based.

use crate::error::{ManipulationError, ManipulationResult};
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as KurboShape, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for figures.
pub type FigureId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for Rgba8 {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba8> for Color {
    fn from(color: Rgba8) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for figures and handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureStyle {
    /// Stroke color.
    pub stroke_color: Rgba8,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = outline only).
    pub fill_color: Option<Rgba8>,
}

impl FigureStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            stroke_color: Rgba8::black(),
            stroke_width: 2.0,
            fill_color: None,
        }
    }
}

/// The shape kinds a geometry or figure can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Rect,
    Circle,
    Path,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Rect => write!(f, "rect"),
            ShapeKind::Circle => write!(f, "circle"),
            ShapeKind::Path => write!(f, "path"),
        }
    }
}

/// A shape value passed across the figure/geometry boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
    Path(BezPath),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Path(_) => ShapeKind::Path,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Circle(c) => c.bounding_box(),
            Shape::Path(p) => p.bounding_box(),
        }
    }
}

/// An axis-aligned rectangular figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectFigure {
    pub(crate) id: FigureId,
    /// The rectangle in world coordinates.
    pub rect: Rect,
    /// Style properties.
    pub style: FigureStyle,
}

impl RectFigure {
    /// Create a new rectangular figure.
    pub fn new(rect: Rect) -> Self {
        Self {
            id: Uuid::new_v4(),
            rect: rect.abs(),
            style: FigureStyle::default(),
        }
    }
}

/// A circular figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleFigure {
    pub(crate) id: FigureId,
    /// The circle in world coordinates.
    pub circle: Circle,
    /// Style properties.
    pub style: FigureStyle,
}

impl CircleFigure {
    /// Create a new circular figure.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            circle: Circle::new(center, radius),
            style: FigureStyle::default(),
        }
    }
}

/// A figure backed by an arbitrary bezier path. The only figure kind that
/// accepts a replacement path via `set_shape`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathFigure {
    pub(crate) id: FigureId,
    /// The path in world coordinates.
    pub path: BezPath,
    /// Style properties.
    pub style: FigureStyle,
}

impl PathFigure {
    /// Create a new path figure.
    pub fn new(path: BezPath) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
            style: FigureStyle::default(),
        }
    }
}

/// Enum wrapper for all figure types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Figure {
    Rect(RectFigure),
    Circle(CircleFigure),
    Path(PathFigure),
}

impl Figure {
    pub fn id(&self) -> FigureId {
        match self {
            Figure::Rect(f) => f.id,
            Figure::Circle(f) => f.id,
            Figure::Path(f) => f.id,
        }
    }

    /// Get the bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Figure::Rect(f) => f.rect,
            Figure::Circle(f) => f.circle.bounding_box(),
            Figure::Path(f) => f.path.bounding_box(),
        }
    }

    /// Get the figure's shape as a value.
    pub fn shape(&self) -> Shape {
        match self {
            Figure::Rect(f) => Shape::Rect(f.rect),
            Figure::Circle(f) => Shape::Circle(f.circle),
            Figure::Path(f) => Shape::Path(f.path.clone()),
        }
    }

    /// The kind of shape this figure carries.
    pub fn shape_kind(&self) -> ShapeKind {
        match self {
            Figure::Rect(_) => ShapeKind::Rect,
            Figure::Circle(_) => ShapeKind::Circle,
            Figure::Path(_) => ShapeKind::Path,
        }
    }

    /// Replace the figure's shape. The replacement must be of the figure's
    /// own kind; a mismatch fails fast.
    pub fn set_shape(&mut self, shape: Shape) -> ManipulationResult<()> {
        match (self, shape) {
            (Figure::Rect(f), Shape::Rect(r)) => {
                f.rect = r.abs();
                Ok(())
            }
            (Figure::Circle(f), Shape::Circle(c)) => {
                f.circle = c;
                Ok(())
            }
            (Figure::Path(f), Shape::Path(p)) => {
                f.path = p;
                Ok(())
            }
            (figure, shape) => Err(ManipulationError::ShapeMismatch {
                expected: figure.shape_kind(),
                found: shape.kind(),
            }),
        }
    }

    /// Move the figure by a delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let v = Vec2::new(dx, dy);
        match self {
            Figure::Rect(f) => f.rect = f.rect + v,
            Figure::Circle(f) => f.circle.center += v,
            Figure::Path(f) => f.path.apply_affine(Affine::translate(v)),
        }
    }

    /// Apply an affine transform to this figure. Rect and circle figures
    /// only track axis-aligned scale and translation.
    pub fn transform(&mut self, affine: Affine) {
        match self {
            Figure::Rect(f) => f.rect = affine.transform_rect_bbox(f.rect),
            Figure::Circle(f) => {
                let coeffs = affine.as_coeffs();
                f.circle.center = affine * f.circle.center;
                f.circle.radius *= (coeffs[0].abs() + coeffs[3].abs()) / 2.0;
            }
            Figure::Path(f) => f.path.apply_affine(affine),
        }
    }

    pub fn style(&self) -> &FigureStyle {
        match self {
            Figure::Rect(f) => &f.style,
            Figure::Circle(f) => &f.style,
            Figure::Path(f) => &f.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut FigureStyle {
        match self {
            Figure::Rect(f) => &mut f.style,
            Figure::Circle(f) => &mut f.style,
            Figure::Path(f) => &mut f.style,
        }
    }

    /// Check if a point (in world coordinates) hits this figure.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Figure::Rect(f) => {
                let rect = f.rect;
                if f.style.fill_color.is_some() {
                    rect.inflate(tolerance, tolerance).contains(point)
                } else {
                    // Outline only: hit on the border
                    let pad = tolerance + f.style.stroke_width / 2.0;
                    let outer = rect.inflate(pad, pad);
                    let inner = rect.inflate(-pad, -pad);
                    outer.contains(point) && !inner.contains(point)
                }
            }
            Figure::Circle(f) => {
                let dist = (point - f.circle.center).hypot();
                if f.style.fill_color.is_some() {
                    dist <= f.circle.radius + tolerance
                } else {
                    (dist - f.circle.radius).abs() <= tolerance + f.style.stroke_width / 2.0
                }
            }
            Figure::Path(f) => f
                .path
                .bounding_box()
                .inflate(tolerance, tolerance)
                .contains(point),
        }
    }

    /// Test if this figure intersects a selection rectangle.
    /// Path figures check their control polygon against the rect; other
    /// figures check bounding box overlap.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        match self {
            Figure::Path(f) => {
                let polygon = control_polygon(&f.path);
                polyline_intersects_rect(&polygon, rect)
            }
            _ => {
                let bounds = self.bounds();
                rect.intersect(bounds.inflate(1.0, 1.0)).area() > 0.0
            }
        }
    }
}

/// The control polygon of a path: every on-curve and control point in
/// element order, split at subpath boundaries by repeating the move point.
fn control_polygon(path: &BezPath) -> Vec<Point> {
    use kurbo::PathEl;
    let mut points = Vec::new();
    let mut start = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                start = p;
                points.push(p);
            }
            PathEl::LineTo(p) => points.push(p),
            PathEl::QuadTo(c, p) => {
                points.push(c);
                points.push(p);
            }
            PathEl::CurveTo(c1, c2, p) => {
                points.push(c1);
                points.push(c2);
                points.push(p);
            }
            PathEl::ClosePath => points.push(start),
        }
    }
    points
}

/// Test if any segment of a polyline intersects or is inside a rectangle.
fn polyline_intersects_rect(points: &[Point], rect: Rect) -> bool {
    if points.iter().any(|p| rect.contains(*p)) {
        return true;
    }
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    let edges = [
        (corners[0], corners[1]),
        (corners[1], corners[2]),
        (corners[2], corners[3]),
        (corners[3], corners[0]),
    ];
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        for &(c, d) in &edges {
            if segments_intersect(a, b, c, d) {
                return true;
            }
        }
    }
    false
}

/// Test if two line segments (a-b) and (c-d) intersect.
fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let cross = |o: Point, p: Point, q: Point| -> f64 {
        (p.x - o.x) * (q.y - o.y) - (p.y - o.y) * (q.x - o.x)
    };
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    // Collinear cases: check if an endpoint lies on the other segment
    let on_segment = |p: Point, q: Point, r: Point| -> bool {
        r.x >= p.x.min(q.x) && r.x <= p.x.max(q.x) && r.y >= p.y.min(q.y) && r.y <= p.y.max(q.y)
    };
    (d1.abs() < 1e-10 && on_segment(c, d, a))
        || (d2.abs() < 1e-10 && on_segment(c, d, b))
        || (d3.abs() < 1e-10 && on_segment(a, b, c))
        || (d4.abs() < 1e-10 && on_segment(a, b, d))
}
