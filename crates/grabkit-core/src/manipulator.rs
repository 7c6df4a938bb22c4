//! Manipulators: decorators that wrap a figure in grab handles.
//!
//! A manipulator owns a geometry fitted over its child figure and one grab
//! handle per geometry site. Resizing goes through the geometry first and
//! then pushes the result back onto the figure, either by transform-fitting
//! the figure to the geometry's new bounds or, for path children, by
//! handing the figure the rebuilt path directly.

use crate::error::{ManipulationError, ManipulationResult};
use crate::figure::{Figure, FigureId, FigureStyle, Rgba8};
use crate::geometry::{
    BoundsGeometry, CircleGeometry, PathGeometry, Site, SiteId, DEFAULT_MINIMUM_SIZE,
};
use kurbo::{Affine, Point, Rect, Vec2};
use uuid::Uuid;

/// The rendered shape of a grab handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleShape {
    Square,
    Circle,
    Diamond,
}

/// A small draggable figure pinned to one site of a manipulator's geometry.
#[derive(Debug, Clone)]
pub struct GrabHandle {
    id: FigureId,
    owner: FigureId,
    site: Site,
    half_size: f64,
    shape: HandleShape,
    style: FigureStyle,
}

impl GrabHandle {
    fn new(owner: FigureId, site: Site, factory: &GrabHandleFactory) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            site,
            half_size: factory.half_size,
            shape: factory.shape,
            style: factory.style.clone(),
        }
    }

    pub fn id(&self) -> FigureId {
        self.id
    }

    /// The figure this handle's manipulator decorates.
    pub fn owner(&self) -> FigureId {
        self.owner
    }

    /// The geometry site this handle is pinned to.
    pub fn site(&self) -> Site {
        self.site
    }

    pub fn shape(&self) -> HandleShape {
        self.shape
    }

    pub fn style(&self) -> &FigureStyle {
        &self.style
    }

    /// The handle's bounds, centered on its site.
    pub fn bounds(&self) -> Rect {
        let size = self.half_size * 2.0;
        Rect::from_center_size(self.site.point, (size, size))
    }

    /// Hit test against the handle's rendered shape.
    pub fn hit_test(&self, point: Point) -> bool {
        let offset = point - self.site.point;
        match self.shape {
            HandleShape::Square => self.bounds().contains(point),
            HandleShape::Circle => offset.hypot() <= self.half_size,
            HandleShape::Diamond => offset.x.abs() + offset.y.abs() <= self.half_size,
        }
    }

    /// Pin the handle to an updated site snapshot.
    fn relocate(&mut self, site: Site) {
        self.site = site;
    }
}

/// Configuration stamped onto every handle a manipulator creates.
#[derive(Debug, Clone)]
pub struct GrabHandleFactory {
    pub half_size: f64,
    pub shape: HandleShape,
    pub style: FigureStyle,
}

impl Default for GrabHandleFactory {
    fn default() -> Self {
        Self {
            half_size: 4.0,
            shape: HandleShape::Square,
            style: FigureStyle {
                stroke_color: Rgba8::black(),
                stroke_width: 1.0,
                fill_color: Some(Rgba8::new(255, 255, 255, 255)),
            },
        }
    }
}

impl GrabHandleFactory {
    fn make(&self, owner: FigureId, site: Site) -> GrabHandle {
        GrabHandle::new(owner, site, self)
    }
}

/// Which geometry a manipulator fits over its child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulatorKind {
    /// Eight compass handles on the child's bounding rectangle.
    Bounds,
    /// One free-angle radius handle on a circumscribed circle.
    Circle,
    /// One handle per path vertex and control point; requires a path child.
    Path,
}

#[derive(Debug, Clone)]
enum Geometry {
    Bounds(BoundsGeometry),
    Circle(CircleGeometry),
    Path(PathGeometry),
}

/// A figure decorator exposing grab handles for interactive reshaping.
#[derive(Debug, Clone)]
pub struct Manipulator {
    kind: ManipulatorKind,
    factory: GrabHandleFactory,
    minimum_size: f64,
    child: Option<FigureId>,
    geometry: Option<Geometry>,
    handles: Vec<GrabHandle>,
}

impl Manipulator {
    /// Create a detached manipulator with default handle styling.
    pub fn new(kind: ManipulatorKind) -> Self {
        Self::with_factory(kind, GrabHandleFactory::default())
    }

    pub fn with_factory(kind: ManipulatorKind, factory: GrabHandleFactory) -> Self {
        Self {
            kind,
            factory,
            minimum_size: DEFAULT_MINIMUM_SIZE,
            child: None,
            geometry: None,
            handles: Vec::new(),
        }
    }

    pub fn kind(&self) -> ManipulatorKind {
        self.kind
    }

    pub fn child(&self) -> Option<FigureId> {
        self.child
    }

    pub fn handles(&self) -> &[GrabHandle] {
        &self.handles
    }

    pub fn set_minimum_size(&mut self, minimum_size: f64) {
        self.minimum_size = minimum_size;
    }

    /// Attach a child, discarding the previous child's geometry and
    /// handles. A path manipulator requires a child that accepts path
    /// replacement.
    pub fn set_child(&mut self, child: &Figure) -> ManipulationResult<()> {
        self.detach();
        let geometry = match self.kind {
            ManipulatorKind::Bounds => {
                Geometry::Bounds(BoundsGeometry::new(child.bounds(), self.minimum_size))
            }
            ManipulatorKind::Circle => {
                Geometry::Circle(CircleGeometry::from_rect(child.bounds(), self.minimum_size))
            }
            ManipulatorKind::Path => match child.shape() {
                crate::figure::Shape::Path(path) => Geometry::Path(PathGeometry::new(path)),
                _ => return Err(ManipulationError::ShapeEditUnsupported(child.id())),
            },
        };
        self.child = Some(child.id());
        self.geometry = Some(geometry);
        self.rebuild_handles();
        Ok(())
    }

    /// Drop the child, its geometry, and all handles.
    pub fn detach(&mut self) {
        self.child = None;
        self.geometry = None;
        self.handles.clear();
    }

    /// Re-derive the geometry from the child's current shape and relocate
    /// the handles. Call after the child changes through some other path.
    pub fn refresh(&mut self, child: &Figure) -> ManipulationResult<()> {
        if self.child != Some(child.id()) {
            return Err(ManipulationError::Detached);
        }
        match (&mut self.geometry, self.kind) {
            (Some(Geometry::Bounds(g)), _) => g.set_rect(child.bounds()),
            (Some(Geometry::Circle(_)), _) => {
                self.geometry = Some(Geometry::Circle(CircleGeometry::from_rect(
                    child.bounds(),
                    self.minimum_size,
                )));
            }
            (Some(Geometry::Path(g)), _) => g.set_shape(child.shape())?,
            (None, _) => return Err(ManipulationError::Detached),
        }
        self.rebuild_handles();
        Ok(())
    }

    /// Clone this manipulator's configuration onto a fresh manipulator for
    /// a different figure.
    pub fn new_instance(&self, child: &Figure) -> ManipulationResult<Manipulator> {
        let mut clone = Manipulator::with_factory(self.kind, self.factory.clone());
        clone.minimum_size = self.minimum_size;
        clone.set_child(child)?;
        Ok(clone)
    }

    /// Reset per-gesture geometry state. Call when a handle drag starts.
    pub fn begin_resize(&mut self) {
        if let Some(Geometry::Bounds(g)) = &mut self.geometry {
            g.begin_drag();
        }
    }

    /// Translate one geometry site and push the result back onto the
    /// child: bounds and circle children are transform-fitted from the
    /// geometry's old bounds onto its new bounds, path children receive
    /// the rebuilt path directly.
    pub fn resize(
        &mut self,
        site: SiteId,
        dx: f64,
        dy: f64,
        child: &mut Figure,
    ) -> ManipulationResult<()> {
        if self.child != Some(child.id()) {
            return Err(ManipulationError::Detached);
        }
        let geometry = self.geometry.as_mut().ok_or(ManipulationError::Detached)?;
        match geometry {
            Geometry::Bounds(g) => {
                let old = g.rect();
                g.translate_site(site, dx, dy)?;
                child.transform(fit_bounds(old, g.rect()));
            }
            Geometry::Circle(g) => {
                let old = g.bounds();
                g.translate_site(site, dx, dy)?;
                child.transform(fit_bounds(old, g.bounds()));
            }
            Geometry::Path(g) => {
                g.translate_site(site, dx, dy)?;
                child.set_shape(g.shape())?;
            }
        }
        self.relocate_handles();
        Ok(())
    }

    /// Shift the geometry and handles without touching the child. Call
    /// when the child has already been translated.
    pub fn track_translate(&mut self, dx: f64, dy: f64) {
        match &mut self.geometry {
            Some(Geometry::Bounds(g)) => g.translate(dx, dy),
            Some(Geometry::Circle(g)) => g.translate(dx, dy),
            Some(Geometry::Path(g)) => g.translate(dx, dy),
            None => {}
        }
        self.relocate_handles();
    }

    /// The geometry's current bounds.
    pub fn geometry_bounds(&self) -> ManipulationResult<Rect> {
        match self.geometry.as_ref().ok_or(ManipulationError::Detached)? {
            Geometry::Bounds(g) => Ok(g.rect()),
            Geometry::Circle(g) => Ok(g.bounds()),
            Geometry::Path(g) => Ok(g.shape().bounds()),
        }
    }

    /// The topmost handle containing `point`, if any.
    pub fn handle_at(&self, point: Point) -> Option<&GrabHandle> {
        self.handles.iter().rev().find(|h| h.hit_test(point))
    }

    fn geometry_sites(geometry: &mut Geometry) -> Vec<Site> {
        match geometry {
            Geometry::Bounds(g) => g.sites(),
            Geometry::Circle(g) => g.sites(),
            Geometry::Path(g) => g.sites(),
        }
    }

    fn rebuild_handles(&mut self) {
        self.handles.clear();
        let Some(owner) = self.child else { return };
        if let Some(geometry) = &mut self.geometry {
            for site in Self::geometry_sites(geometry) {
                self.handles.push(self.factory.make(owner, site));
            }
        }
    }

    /// Re-pin every handle to its site's current position.
    pub fn relocate_handles(&mut self) {
        let Some(geometry) = &mut self.geometry else {
            return;
        };
        for handle in &mut self.handles {
            let site = match geometry {
                Geometry::Bounds(g) => g.site(handle.site.id),
                Geometry::Circle(g) => g.site(handle.site.id),
                Geometry::Path(g) => g.site(handle.site.id),
            };
            if let Ok(site) = site {
                handle.relocate(site);
            }
        }
    }
}

/// The affine mapping `old` onto `new`, axis-aligned. Degenerate source
/// axes scale by 1 to keep the transform finite.
fn fit_bounds(old: Rect, new: Rect) -> Affine {
    let sx = if old.width().abs() < f64::EPSILON {
        1.0
    } else {
        new.width() / old.width()
    };
    let sy = if old.height().abs() < f64::EPSILON {
        1.0
    } else {
        new.height() / old.height()
    };
    Affine::translate(Vec2::new(new.x0, new.y0))
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(Vec2::new(-old.x0, -old.y0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{CircleFigure, PathFigure, RectFigure};
    use crate::geometry::CompassPoint;
    use kurbo::BezPath;

    fn rect_figure() -> Figure {
        Figure::Rect(RectFigure::new(Rect::new(0.0, 0.0, 100.0, 50.0)))
    }

    #[test]
    fn test_bounds_manipulator_has_eight_handles() {
        let mut m = Manipulator::new(ManipulatorKind::Bounds);
        let child = rect_figure();
        m.set_child(&child).unwrap();
        assert_eq!(m.handles().len(), 8);
        assert_eq!(m.child(), Some(child.id()));
    }

    #[test]
    fn test_resize_transform_fits_child() {
        let mut m = Manipulator::new(ManipulatorKind::Bounds);
        let mut child = rect_figure();
        m.set_child(&child).unwrap();

        m.resize(
            SiteId::Compass(CompassPoint::SouthEast),
            20.0,
            10.0,
            &mut child,
        )
        .unwrap();

        assert_eq!(child.bounds(), Rect::new(0.0, 0.0, 120.0, 60.0));
        assert_eq!(m.geometry_bounds().unwrap(), child.bounds());
    }

    #[test]
    fn test_resize_relocates_handles() {
        let mut m = Manipulator::new(ManipulatorKind::Bounds);
        let mut child = rect_figure();
        m.set_child(&child).unwrap();

        m.resize(SiteId::Compass(CompassPoint::East), 20.0, 0.0, &mut child)
            .unwrap();

        let east = m
            .handles()
            .iter()
            .find(|h| h.site().id == SiteId::Compass(CompassPoint::East))
            .unwrap();
        assert_eq!(east.site().point, Point::new(120.0, 25.0));
    }

    #[test]
    fn test_circle_manipulator_scales_uniformly() {
        let mut m = Manipulator::new(ManipulatorKind::Circle);
        let mut child = Figure::Circle(CircleFigure::new(Point::new(50.0, 50.0), 10.0));
        m.set_child(&child).unwrap();
        assert_eq!(m.handles().len(), 1);

        // Pull the radius handle 10 further east: radius 10 -> 20
        m.resize(SiteId::Radius, 10.0, 0.0, &mut child).unwrap();
        let bounds = child.bounds();
        assert!((bounds.width() - 40.0).abs() < 1e-9);
        assert!((bounds.center().x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_manipulator_requires_path_child() {
        let mut m = Manipulator::new(ManipulatorKind::Path);
        let err = m.set_child(&rect_figure()).unwrap_err();
        assert!(matches!(err, ManipulationError::ShapeEditUnsupported(_)));
        assert!(m.child().is_none());
    }

    #[test]
    fn test_path_manipulator_pushes_rebuilt_path() {
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, 0.0));
        path.line_to(Point::new(10.0, 0.0));
        let mut child = Figure::Path(PathFigure::new(path));

        let mut m = Manipulator::new(ManipulatorKind::Path);
        m.set_child(&child).unwrap();
        assert_eq!(m.handles().len(), 2);

        m.resize(SiteId::Vertex(1), 0.0, 5.0, &mut child).unwrap();
        assert_eq!(child.bounds(), Rect::new(0.0, 0.0, 10.0, 5.0));
    }

    #[test]
    fn test_set_child_discards_previous_state() {
        let mut m = Manipulator::new(ManipulatorKind::Bounds);
        let first = rect_figure();
        m.set_child(&first).unwrap();

        let second = Figure::Rect(RectFigure::new(Rect::new(200.0, 200.0, 210.0, 210.0)));
        m.set_child(&second).unwrap();
        assert_eq!(m.child(), Some(second.id()));
        assert!(m.handles().iter().all(|h| h.owner() == second.id()));
    }

    #[test]
    fn test_new_instance_copies_configuration() {
        let factory = GrabHandleFactory {
            half_size: 7.0,
            shape: HandleShape::Circle,
            style: FigureStyle::default(),
        };
        let m = Manipulator::with_factory(ManipulatorKind::Bounds, factory);

        let child = rect_figure();
        let clone = m.new_instance(&child).unwrap();
        assert_eq!(clone.child(), Some(child.id()));
        assert_eq!(clone.handles().len(), 8);
        assert_eq!(clone.handles()[0].shape(), HandleShape::Circle);
        assert!((clone.handles()[0].bounds().width() - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_refresh_follows_programmatic_resize() {
        let mut m = Manipulator::new(ManipulatorKind::Bounds);
        let mut child = rect_figure();
        m.set_child(&child).unwrap();

        child
            .set_shape(crate::figure::Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)))
            .unwrap();
        m.refresh(&child).unwrap();
        assert_eq!(m.geometry_bounds().unwrap(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_resize_detached_fails() {
        let mut m = Manipulator::new(ManipulatorKind::Bounds);
        let mut child = rect_figure();
        let err = m
            .resize(SiteId::Center, 1.0, 1.0, &mut child)
            .unwrap_err();
        assert!(matches!(err, ManipulationError::Detached));
    }

    #[test]
    fn test_handle_hit_test() {
        let mut m = Manipulator::new(ManipulatorKind::Bounds);
        let child = rect_figure();
        m.set_child(&child).unwrap();

        // Default half size is 4; the southeast corner is at (100, 50)
        let hit = m.handle_at(Point::new(102.0, 51.0)).unwrap();
        assert_eq!(hit.site().id, SiteId::Compass(CompassPoint::SouthEast));
        assert!(m.handle_at(Point::new(50.0, 25.0)).is_none());
    }
}
