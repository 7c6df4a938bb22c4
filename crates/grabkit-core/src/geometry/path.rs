//! Path geometry: one site per segment endpoint plus control-point sites.

use super::{Site, SiteId};
use crate::error::{ManipulationError, ManipulationResult};
use crate::figure::{Shape, ShapeKind};
use kurbo::{BezPath, PathEl, Point, Vec2};
use serde::{Deserialize, Serialize};

/// The type of a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Move,
    Line,
    Quad,
    Cubic,
    Close,
}

/// One decomposed path segment. Close segments carry the index of their
/// subpath's opening move so the mirrored start point is never stale.
#[derive(Debug, Clone, Copy)]
enum Segment {
    Move(Point),
    Line(Point),
    Quad(Point, Point),
    Cubic(Point, Point, Point),
    Close { start: usize },
}

impl Segment {
    fn kind(&self) -> SegmentKind {
        match self {
            Segment::Move(_) => SegmentKind::Move,
            Segment::Line(_) => SegmentKind::Line,
            Segment::Quad(..) => SegmentKind::Quad,
            Segment::Cubic(..) => SegmentKind::Cubic,
            Segment::Close { .. } => SegmentKind::Close,
        }
    }
}

/// A geometry over an arbitrary bezier path.
///
/// The segment table is derived lazily from the source path: setting a
/// shape only type-checks and invalidates; decomposition happens on the
/// next read. Translating a curve endpoint moves only that endpoint;
/// callers wanting move-with-handles behavior translate the control-point
/// sites explicitly.
#[derive(Debug, Clone)]
pub struct PathGeometry {
    source: BezPath,
    segments: Option<Vec<Segment>>,
}

impl PathGeometry {
    /// Create a geometry over a path.
    pub fn new(path: BezPath) -> Self {
        Self {
            source: path,
            segments: None,
        }
    }

    /// Rebuild the path segment-by-segment from the cached table, or
    /// return the untouched source if nothing has been decomposed yet.
    pub fn path(&self) -> BezPath {
        match &self.segments {
            None => self.source.clone(),
            Some(segments) => {
                let els = segments
                    .iter()
                    .map(|seg| match *seg {
                        Segment::Move(p) => PathEl::MoveTo(p),
                        Segment::Line(p) => PathEl::LineTo(p),
                        Segment::Quad(c, p) => PathEl::QuadTo(c, p),
                        Segment::Cubic(c1, c2, p) => PathEl::CurveTo(c1, c2, p),
                        Segment::Close { .. } => PathEl::ClosePath,
                    })
                    .collect();
                BezPath::from_vec(els)
            }
        }
    }

    /// The geometry's shape as a value.
    pub fn shape(&self) -> Shape {
        Shape::Path(self.path())
    }

    /// Replace the path. Fails fast only on the kind check; decomposition
    /// is deferred to the next read.
    pub fn set_shape(&mut self, shape: Shape) -> ManipulationResult<()> {
        match shape {
            Shape::Path(p) => {
                self.source = p;
                self.segments = None;
                Ok(())
            }
            other => Err(ManipulationError::ShapeMismatch {
                expected: ShapeKind::Path,
                found: other.kind(),
            }),
        }
    }

    fn ensure_segments(&mut self) -> &mut Vec<Segment> {
        self.segments.get_or_insert_with(|| decompose(&self.source))
    }

    /// Number of segments in the path.
    pub fn segment_count(&mut self) -> usize {
        self.ensure_segments().len()
    }

    /// The type of segment `index`.
    pub fn segment_kind(&mut self, index: usize) -> ManipulationResult<SegmentKind> {
        self.ensure_segments()
            .get(index)
            .map(Segment::kind)
            .ok_or(ManipulationError::UnknownSite(SiteId::Vertex(index)))
    }

    fn endpoint(segments: &[Segment], index: usize) -> Point {
        match segments[index] {
            Segment::Move(p) | Segment::Line(p) => p,
            Segment::Quad(_, p) => p,
            Segment::Cubic(_, _, p) => p,
            // Mirrors the subpath's starting point
            Segment::Close { start } => Self::endpoint(segments, start),
        }
    }

    /// All sites in path order: for each curved segment its control-point
    /// sites, then the segment's endpoint vertex.
    pub fn vertices(&mut self) -> Vec<Site> {
        let segments = self.ensure_segments();
        let mut sites = Vec::new();
        for (i, seg) in segments.iter().enumerate() {
            match *seg {
                Segment::Quad(c, _) => {
                    sites.push(Site::new(SiteId::Control { vertex: i, index: 0 }, c));
                }
                Segment::Cubic(c1, c2, _) => {
                    sites.push(Site::new(SiteId::Control { vertex: i, index: 0 }, c1));
                    sites.push(Site::new(SiteId::Control { vertex: i, index: 1 }, c2));
                }
                _ => {}
            }
            sites.push(Site::new(
                SiteId::Vertex(i),
                Self::endpoint(segments, i),
            ));
        }
        sites
    }

    /// Alias for [`vertices`](Self::vertices), the common-contract name.
    pub fn sites(&mut self) -> Vec<Site> {
        self.vertices()
    }

    /// The vertex site for segment `index`.
    pub fn vertex(&mut self, index: usize) -> ManipulationResult<Site> {
        let segments = self.ensure_segments();
        if index >= segments.len() {
            return Err(ManipulationError::UnknownSite(SiteId::Vertex(index)));
        }
        Ok(Site::new(
            SiteId::Vertex(index),
            Self::endpoint(segments, index),
        ))
    }

    /// Look up a site by id.
    pub fn site(&mut self, id: SiteId) -> ManipulationResult<Site> {
        match id {
            SiteId::Vertex(i) => self.vertex(i),
            SiteId::Control { vertex, index } => {
                let segments = self.ensure_segments();
                let seg = *segments
                    .get(vertex)
                    .ok_or(ManipulationError::UnknownSite(id))?;
                let point = match (seg, index) {
                    (Segment::Quad(c, _), 0) => c,
                    (Segment::Quad(_, p), 1) => p,
                    (Segment::Cubic(c1, _, _), 0) => c1,
                    (Segment::Cubic(_, c2, _), 1) => c2,
                    (Segment::Cubic(_, _, p), 2) => p,
                    _ => return Err(ManipulationError::UnknownSite(id)),
                };
                Ok(Site::new(id, point))
            }
            other => Err(ManipulationError::UnknownSite(other)),
        }
    }

    /// Shift the whole path.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let v = Vec2::new(dx, dy);
        for seg in self.ensure_segments().iter_mut() {
            match seg {
                Segment::Move(p) | Segment::Line(p) => *p += v,
                Segment::Quad(c, p) => {
                    *c += v;
                    *p += v;
                }
                Segment::Cubic(c1, c2, p) => {
                    *c1 += v;
                    *c2 += v;
                    *p += v;
                }
                Segment::Close { .. } => {}
            }
        }
    }

    /// Translate one site. Close-segment sites mirror their subpath's
    /// starting point and cannot be moved.
    pub fn translate_site(&mut self, id: SiteId, dx: f64, dy: f64) -> ManipulationResult<()> {
        let v = Vec2::new(dx, dy);
        match id {
            SiteId::Vertex(i) => {
                let segments = self.ensure_segments();
                match segments
                    .get_mut(i)
                    .ok_or(ManipulationError::UnknownSite(id))?
                {
                    Segment::Move(p) | Segment::Line(p) => *p += v,
                    Segment::Quad(_, p) => *p += v,
                    Segment::Cubic(_, _, p) => *p += v,
                    Segment::Close { .. } => return Err(ManipulationError::ImmutableSite(id)),
                }
                Ok(())
            }
            SiteId::Control { vertex, index } => {
                let segments = self.ensure_segments();
                let seg = segments
                    .get_mut(vertex)
                    .ok_or(ManipulationError::UnknownSite(id))?;
                match (seg, index) {
                    (Segment::Quad(c, _), 0) => *c += v,
                    (Segment::Quad(_, p), 1) => *p += v,
                    (Segment::Cubic(c1, _, _), 0) => *c1 += v,
                    (Segment::Cubic(_, c2, _), 1) => *c2 += v,
                    (Segment::Cubic(_, _, p), 2) => *p += v,
                    _ => return Err(ManipulationError::UnknownSite(id)),
                }
                Ok(())
            }
            other => Err(ManipulationError::UnknownSite(other)),
        }
    }
}

/// Flatten a path's element stream into the segment table. Close
/// segments record the index of their subpath's opening move.
fn decompose(path: &BezPath) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(path.elements().len());
    let mut subpath_start = 0;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                subpath_start = segments.len();
                segments.push(Segment::Move(p));
            }
            PathEl::LineTo(p) => segments.push(Segment::Line(p)),
            PathEl::QuadTo(c, p) => segments.push(Segment::Quad(c, p)),
            PathEl::CurveTo(c1, c2, p) => segments.push(Segment::Cubic(c1, c2, p)),
            PathEl::ClosePath => segments.push(Segment::Close {
                start: subpath_start,
            }),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_cubic() -> BezPath {
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, 0.0));
        path.curve_to(
            Point::new(10.0, 0.0),
            Point::new(20.0, 10.0),
            Point::new(30.0, 10.0),
        );
        path
    }

    #[test]
    fn test_cubic_yields_four_logical_stops() {
        let mut g = PathGeometry::new(one_cubic());
        let sites = g.vertices();
        // Move endpoint, then control 1, control 2, endpoint of the cubic
        assert_eq!(sites.len(), 4);
        assert_eq!(sites[0].id, SiteId::Vertex(0));
        assert_eq!(sites[1].id, SiteId::Control { vertex: 1, index: 0 });
        assert_eq!(sites[2].id, SiteId::Control { vertex: 1, index: 1 });
        assert_eq!(sites[3].id, SiteId::Vertex(1));
        assert_eq!(sites[3].point, Point::new(30.0, 10.0));
    }

    #[test]
    fn test_endpoint_moves_without_control_points() {
        let mut g = PathGeometry::new(one_cubic());
        g.translate_site(SiteId::Vertex(1), 5.0, 5.0).unwrap();

        let sites = g.vertices();
        assert_eq!(sites[3].point, Point::new(35.0, 15.0));
        // Neighboring control points stay put
        assert_eq!(sites[1].point, Point::new(10.0, 0.0));
        assert_eq!(sites[2].point, Point::new(20.0, 10.0));
    }

    #[test]
    fn test_close_site_is_read_only() {
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, 0.0));
        path.line_to(Point::new(10.0, 0.0));
        path.close_path();
        let mut g = PathGeometry::new(path);

        assert_eq!(g.segment_kind(2).unwrap(), SegmentKind::Close);
        let err = g.translate_site(SiteId::Vertex(2), 1.0, 1.0).unwrap_err();
        assert!(matches!(err, ManipulationError::ImmutableSite(_)));
        // The close site mirrors the subpath start
        assert_eq!(g.vertex(2).unwrap().point, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_close_site_mirrors_moved_start() {
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, 0.0));
        path.line_to(Point::new(10.0, 0.0));
        path.close_path();
        let mut g = PathGeometry::new(path);

        g.translate_site(SiteId::Vertex(0), 2.0, 3.0).unwrap();
        assert_eq!(g.vertex(2).unwrap().point, Point::new(2.0, 3.0));
    }

    #[test]
    fn test_shape_rebuilds_from_cache() {
        let mut g = PathGeometry::new(one_cubic());
        g.translate_site(SiteId::Control { vertex: 1, index: 0 }, 1.0, 2.0)
            .unwrap();

        let rebuilt = g.path();
        match rebuilt.elements()[1] {
            PathEl::CurveTo(c1, _, _) => assert_eq!(c1, Point::new(11.0, 2.0)),
            ref other => panic!("expected CurveTo, got {other:?}"),
        }
    }

    #[test]
    fn test_set_shape_invalidates_cache() {
        let mut g = PathGeometry::new(one_cubic());
        g.translate_site(SiteId::Vertex(1), 5.0, 5.0).unwrap();

        let mut replacement = BezPath::new();
        replacement.move_to(Point::new(1.0, 1.0));
        replacement.line_to(Point::new(2.0, 2.0));
        g.set_shape(Shape::Path(replacement)).unwrap();

        assert_eq!(g.segment_count(), 2);
        assert_eq!(g.vertex(1).unwrap().point, Point::new(2.0, 2.0));
    }

    #[test]
    fn test_whole_translate() {
        let mut g = PathGeometry::new(one_cubic());
        g.translate(1.0, 1.0);
        assert_eq!(g.vertex(0).unwrap().point, Point::new(1.0, 1.0));
        assert_eq!(g.vertex(1).unwrap().point, Point::new(31.0, 11.0));
    }

    #[test]
    fn test_control_index_out_of_range() {
        let mut g = PathGeometry::new(one_cubic());
        let err = g
            .translate_site(SiteId::Control { vertex: 1, index: 3 }, 1.0, 1.0)
            .unwrap_err();
        assert!(matches!(err, ManipulationError::UnknownSite(_)));
    }
}
