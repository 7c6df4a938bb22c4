//! The canvas: figure store, z-order, decorators, and spatial queries.

use crate::error::{ManipulationError, ManipulationResult};
use crate::event::EventTarget;
use crate::figure::{Figure, FigureId};
use crate::geometry::SiteId;
use crate::manipulator::Manipulator;
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// Holds figures in z-order along with any manipulators decorating them.
///
/// Interactors address figures by id through the canvas rather than by
/// holding references, so one interactor can retarget across gestures
/// without lifetime entanglement.
#[derive(Debug, Default)]
pub struct Canvas {
    figures: HashMap<FigureId, Figure>,
    /// Background to foreground.
    z_order: Vec<FigureId>,
    decorators: HashMap<FigureId, Manipulator>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a figure on top of the stack.
    pub fn add(&mut self, figure: Figure) -> FigureId {
        let id = figure.id();
        log::debug!("Adding figure {id} to canvas");
        self.figures.insert(id, figure);
        self.z_order.push(id);
        id
    }

    /// Remove a figure and any decorator attached to it.
    pub fn remove(&mut self, id: FigureId) -> ManipulationResult<Figure> {
        let figure = self
            .figures
            .remove(&id)
            .ok_or(ManipulationError::UnknownFigure(id))?;
        self.z_order.retain(|&fid| fid != id);
        self.decorators.remove(&id);
        log::debug!("Removed figure {id} from canvas");
        Ok(figure)
    }

    pub fn figure(&self, id: FigureId) -> Option<&Figure> {
        self.figures.get(&id)
    }

    pub fn figure_mut(&mut self, id: FigureId) -> Option<&mut Figure> {
        self.figures.get_mut(&id)
    }

    pub fn contains(&self, id: FigureId) -> bool {
        self.figures.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    /// Figures in z-order, background first.
    pub fn iter(&self) -> impl Iterator<Item = &Figure> {
        self.z_order.iter().filter_map(|id| self.figures.get(id))
    }

    /// Translate a figure, keeping its decorator's handles in step.
    pub fn translate_figure(&mut self, id: FigureId, dx: f64, dy: f64) -> ManipulationResult<()> {
        let figure = self
            .figures
            .get_mut(&id)
            .ok_or(ManipulationError::UnknownFigure(id))?;
        figure.translate(dx, dy);
        if let Some(decorator) = self.decorators.get_mut(&id) {
            decorator.track_translate(dx, dy);
        }
        Ok(())
    }

    /// Wrap a figure in a fresh manipulator cloned from `prototype`.
    /// Replaces any decorator already attached to it.
    pub fn decorate(&mut self, id: FigureId, prototype: &Manipulator) -> ManipulationResult<()> {
        let figure = self
            .figures
            .get(&id)
            .ok_or(ManipulationError::UnknownFigure(id))?;
        let manipulator = prototype.new_instance(figure)?;
        log::debug!("Decorating figure {id}");
        self.decorators.insert(id, manipulator);
        Ok(())
    }

    /// Detach and return the manipulator decorating a figure.
    pub fn undecorate(&mut self, id: FigureId) -> ManipulationResult<Manipulator> {
        let mut manipulator = self
            .decorators
            .remove(&id)
            .ok_or(ManipulationError::NotDecorated(id))?;
        manipulator.detach();
        log::debug!("Undecorating figure {id}");
        Ok(manipulator)
    }

    pub fn is_decorated(&self, id: FigureId) -> bool {
        self.decorators.contains_key(&id)
    }

    pub fn decorator(&self, id: FigureId) -> Option<&Manipulator> {
        self.decorators.get(&id)
    }

    pub fn decorator_mut(&mut self, id: FigureId) -> Option<&mut Manipulator> {
        self.decorators.get_mut(&id)
    }

    /// Ids of all currently decorated figures.
    pub fn decorated_ids(&self) -> Vec<FigureId> {
        self.decorators.keys().copied().collect()
    }

    /// Re-derive a decorator's geometry after its figure changed through
    /// some path other than the decorator itself.
    pub fn refresh_decorator(&mut self, id: FigureId) -> ManipulationResult<()> {
        let figure = self
            .figures
            .get(&id)
            .ok_or(ManipulationError::UnknownFigure(id))?;
        self.decorators
            .get_mut(&id)
            .ok_or(ManipulationError::NotDecorated(id))?
            .refresh(figure)
    }

    /// Reset per-gesture state on a figure's decorator.
    pub fn begin_resize(&mut self, id: FigureId) -> ManipulationResult<()> {
        self.decorators
            .get_mut(&id)
            .ok_or(ManipulationError::NotDecorated(id))?
            .begin_resize();
        Ok(())
    }

    /// Drag one grab-handle site of a decorated figure, reshaping the
    /// figure through its manipulator.
    pub fn resize_decorated(
        &mut self,
        id: FigureId,
        site: SiteId,
        dx: f64,
        dy: f64,
    ) -> ManipulationResult<()> {
        let manipulator = self
            .decorators
            .get_mut(&id)
            .ok_or(ManipulationError::NotDecorated(id))?;
        let figure = self
            .figures
            .get_mut(&id)
            .ok_or(ManipulationError::UnknownFigure(id))?;
        manipulator.resize(site, dx, dy, figure)
    }

    /// Figures whose bounding box overlaps `rect`, background first. This
    /// is the coarse candidate query; callers wanting exact containment
    /// re-test with [`Figure::intersects_rect`].
    pub fn figures_intersecting(&self, rect: Rect) -> Vec<FigureId> {
        self.z_order
            .iter()
            .copied()
            .filter(|id| {
                self.figures
                    .get(id)
                    .is_some_and(|f| rect.intersect(f.bounds().inflate(1.0, 1.0)).area() > 0.0)
            })
            .collect()
    }

    /// Resolve what a pointer position lands on: a grab handle first (they
    /// render above everything), then the topmost figure, else background.
    pub fn pick(&self, point: Point, tolerance: f64) -> EventTarget {
        for id in self.z_order.iter().rev() {
            if let Some(decorator) = self.decorators.get(id) {
                if let Some(handle) = decorator.handle_at(point) {
                    return EventTarget::Handle {
                        owner: handle.owner(),
                        site: handle.site().id,
                    };
                }
            }
        }
        for id in self.z_order.iter().rev() {
            if let Some(figure) = self.figures.get(id) {
                if figure.hit_test(point, tolerance) {
                    return EventTarget::Figure(*id);
                }
            }
        }
        EventTarget::Background
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::{FigureStyle, RectFigure, Rgba8};
    use crate::geometry::{CompassPoint, SiteId};
    use crate::manipulator::ManipulatorKind;

    fn filled_rect(rect: Rect) -> Figure {
        let mut f = RectFigure::new(rect);
        f.style = FigureStyle {
            fill_color: Some(Rgba8::black()),
            ..FigureStyle::default()
        };
        Figure::Rect(f)
    }

    #[test]
    fn test_add_remove() {
        let mut canvas = Canvas::new();
        let id = canvas.add(filled_rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(canvas.len(), 1);
        assert!(canvas.contains(id));

        canvas.remove(id).unwrap();
        assert!(canvas.is_empty());
        assert!(matches!(
            canvas.remove(id),
            Err(ManipulationError::UnknownFigure(_))
        ));
    }

    #[test]
    fn test_pick_prefers_topmost_figure() {
        let mut canvas = Canvas::new();
        let below = canvas.add(filled_rect(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let above = canvas.add(filled_rect(Rect::new(40.0, 40.0, 60.0, 60.0)));

        assert_eq!(
            canvas.pick(Point::new(50.0, 50.0), 1.0),
            EventTarget::Figure(above)
        );
        assert_eq!(
            canvas.pick(Point::new(10.0, 10.0), 1.0),
            EventTarget::Figure(below)
        );
        assert_eq!(
            canvas.pick(Point::new(300.0, 300.0), 1.0),
            EventTarget::Background
        );
    }

    #[test]
    fn test_pick_prefers_handles_over_figures() {
        let mut canvas = Canvas::new();
        let id = canvas.add(filled_rect(Rect::new(0.0, 0.0, 100.0, 100.0)));
        canvas
            .decorate(id, &Manipulator::new(ManipulatorKind::Bounds))
            .unwrap();

        // The southeast corner handle sits on the figure's corner
        let target = canvas.pick(Point::new(100.0, 100.0), 1.0);
        assert_eq!(
            target,
            EventTarget::Handle {
                owner: id,
                site: SiteId::Compass(CompassPoint::SouthEast),
            }
        );
    }

    #[test]
    fn test_resize_decorated_reshapes_figure() {
        let mut canvas = Canvas::new();
        let id = canvas.add(filled_rect(Rect::new(0.0, 0.0, 100.0, 50.0)));
        canvas
            .decorate(id, &Manipulator::new(ManipulatorKind::Bounds))
            .unwrap();

        canvas.begin_resize(id).unwrap();
        canvas
            .resize_decorated(id, SiteId::Compass(CompassPoint::East), 20.0, 0.0)
            .unwrap();
        assert_eq!(
            canvas.figure(id).unwrap().bounds(),
            Rect::new(0.0, 0.0, 120.0, 50.0)
        );
    }

    #[test]
    fn test_translate_figure_moves_handles() {
        let mut canvas = Canvas::new();
        let id = canvas.add(filled_rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
        canvas
            .decorate(id, &Manipulator::new(ManipulatorKind::Bounds))
            .unwrap();

        canvas.translate_figure(id, 100.0, 0.0).unwrap();
        let target = canvas.pick(Point::new(110.0, 10.0), 1.0);
        assert!(matches!(target, EventTarget::Handle { owner, .. } if owner == id));
    }

    #[test]
    fn test_undecorate() {
        let mut canvas = Canvas::new();
        let id = canvas.add(filled_rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(matches!(
            canvas.undecorate(id),
            Err(ManipulationError::NotDecorated(_))
        ));

        canvas
            .decorate(id, &Manipulator::new(ManipulatorKind::Bounds))
            .unwrap();
        let detached = canvas.undecorate(id).unwrap();
        assert!(detached.child().is_none());
        assert!(!canvas.is_decorated(id));
    }

    #[test]
    fn test_figures_intersecting() {
        let mut canvas = Canvas::new();
        let inside = canvas.add(filled_rect(Rect::new(10.0, 10.0, 20.0, 20.0)));
        let outside = canvas.add(filled_rect(Rect::new(200.0, 200.0, 210.0, 210.0)));

        let hits = canvas.figures_intersecting(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert!(hits.contains(&inside));
        assert!(!hits.contains(&outside));
    }
}
