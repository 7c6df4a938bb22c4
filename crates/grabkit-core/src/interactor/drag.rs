//! Drag interactors: figure dragging and grab-handle resizing.

use super::Interactor;
use crate::canvas::Canvas;
use crate::constraint::PointConstraint;
use crate::error::ManipulationResult;
use crate::event::{filter_accepts, EventTarget, LayerEvent, MouseFilter};
use crate::figure::FigureId;
use crate::geometry::SiteId;
use crate::selection::SelectionModel;
use kurbo::{Point, Vec2};
use std::cell::RefCell;
use std::rc::Rc;

/// The shared press/drag bookkeeping of the drag-interactor family.
///
/// The starting point is recorded unconstrained; constraints only apply
/// to subsequent drag positions, so the first delta already reflects any
/// clamping against the raw press position.
#[derive(Default)]
pub struct DragGesture {
    constraints: Vec<Box<dyn PointConstraint>>,
    last: Option<Point>,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint after the existing ones.
    pub fn append_constraint(&mut self, constraint: Box<dyn PointConstraint>) {
        self.constraints.push(constraint);
    }

    /// Add a constraint before the existing ones. Constraints run in list
    /// order, each seeing the previous one's output.
    pub fn prepend_constraint(&mut self, constraint: Box<dyn PointConstraint>) {
        self.constraints.insert(0, constraint);
    }

    /// Apply the constraint chain to a point in place.
    pub fn constrain(&mut self, point: &mut Point) {
        for constraint in &mut self.constraints {
            constraint.constrain(point);
        }
    }

    /// Begin a gesture at the raw, unconstrained press position.
    pub fn start(&mut self, point: Point) {
        self.last = Some(point);
    }

    /// Advance to a new pointer position. Returns the constrained delta
    /// from the previous position, or `None` when there is no active
    /// gesture or the constrained position did not move.
    pub fn step(&mut self, point: Point) -> Option<Vec2> {
        let last = self.last?;
        let mut point = point;
        self.constrain(&mut point);
        let delta = point - last;
        if delta.x == 0.0 && delta.y == 0.0 {
            return None;
        }
        self.last = Some(point);
        Some(delta)
    }

    /// End the gesture.
    pub fn finish(&mut self) {
        self.last = None;
    }

    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }
}

/// Observes the lifecycle of a drag interactor's gestures.
pub trait DragListener {
    fn drag_started(&mut self, _event: &LayerEvent) {}
    fn drag_moved(&mut self, _event: &LayerEvent, _delta: Vec2) {}
    fn drag_finished(&mut self, _event: &LayerEvent) {}
}

/// Translates its target figures by the pointer's constrained movement.
///
/// Targets default to the event's source figure but can be retargeted at
/// a whole selection through [`Interactor::drag_targets_mut`]. With the
/// selective flag set, the interactor ignores gestures whose source
/// figure is not in the attached selection model.
#[derive(Default)]
pub struct DragInteractor {
    filter: Option<MouseFilter>,
    consuming: bool,
    selective: bool,
    model: Option<Rc<RefCell<SelectionModel>>>,
    targets: Vec<FigureId>,
    gesture: DragGesture,
    listeners: Vec<Box<dyn DragListener>>,
}

impl DragInteractor {
    pub fn new() -> Self {
        Self {
            consuming: true,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: MouseFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Only handle gestures whose source figure is selected in `model`.
    pub fn selective_on(mut self, model: Rc<RefCell<SelectionModel>>) -> Self {
        self.selective = true;
        self.model = Some(model);
        self
    }

    pub fn set_consuming(&mut self, consuming: bool) {
        self.consuming = consuming;
    }

    pub fn append_constraint(&mut self, constraint: Box<dyn PointConstraint>) {
        self.gesture.append_constraint(constraint);
    }

    pub fn prepend_constraint(&mut self, constraint: Box<dyn PointConstraint>) {
        self.gesture.prepend_constraint(constraint);
    }

    pub fn add_listener(&mut self, listener: Box<dyn DragListener>) {
        self.listeners.push(listener);
    }

    pub fn targets(&self) -> &[FigureId] {
        &self.targets
    }

    fn selective_blocks(&self, event: &LayerEvent) -> bool {
        if !self.selective {
            return false;
        }
        let Some(model) = &self.model else {
            return true;
        };
        !event
            .target
            .figure()
            .is_some_and(|id| model.borrow().is_selected(id))
    }
}

impl Interactor for DragInteractor {
    fn accept(&self, event: &LayerEvent) -> bool {
        filter_accepts(self.filter.as_ref(), event) && !self.selective_blocks(event)
    }

    fn mouse_pressed(
        &mut self,
        event: &mut LayerEvent,
        _canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        if !self.accept(event) {
            return Ok(());
        }
        // A parent may have pre-set the targets; only fall back to the
        // source figure when nothing did.
        if self.targets.is_empty() {
            if let Some(id) = event.target.figure() {
                self.targets.push(id);
            }
        }
        self.gesture.start(event.point);
        for listener in &mut self.listeners {
            listener.drag_started(event);
        }
        if self.consuming {
            event.consume();
        }
        Ok(())
    }

    fn mouse_dragged(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        if self.selective_blocks(event) {
            return Ok(());
        }
        if let Some(delta) = self.gesture.step(event.point) {
            for &id in &self.targets {
                canvas.translate_figure(id, delta.x, delta.y)?;
            }
            for listener in &mut self.listeners {
                listener.drag_moved(event, delta);
            }
        }
        if self.consuming {
            event.consume();
        }
        Ok(())
    }

    fn mouse_released(
        &mut self,
        event: &mut LayerEvent,
        _canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        if self.selective_blocks(event) {
            return Ok(());
        }
        if self.gesture.is_active() {
            self.gesture.finish();
            for listener in &mut self.listeners {
                listener.drag_finished(event);
            }
            self.targets.clear();
            if self.consuming {
                event.consume();
            }
        }
        Ok(())
    }

    fn is_consuming(&self) -> bool {
        self.consuming
    }

    fn drag_targets_mut(&mut self) -> Option<&mut Vec<FigureId>> {
        Some(&mut self.targets)
    }

    fn selection_model(&self) -> Option<Rc<RefCell<SelectionModel>>> {
        self.model.clone()
    }
}

/// Drags one grab handle, reshaping the decorated figure through its
/// manipulator on every step.
#[derive(Default)]
pub struct Resizer {
    filter: Option<MouseFilter>,
    gesture: DragGesture,
    grip: Option<(FigureId, SiteId)>,
}

impl Resizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: MouseFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn append_constraint(&mut self, constraint: Box<dyn PointConstraint>) {
        self.gesture.append_constraint(constraint);
    }

    pub fn prepend_constraint(&mut self, constraint: Box<dyn PointConstraint>) {
        self.gesture.prepend_constraint(constraint);
    }
}

impl Interactor for Resizer {
    fn accept(&self, event: &LayerEvent) -> bool {
        matches!(event.target, EventTarget::Handle { .. })
            && filter_accepts(self.filter.as_ref(), event)
    }

    fn mouse_pressed(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        let EventTarget::Handle { owner, site } = event.target else {
            return Ok(());
        };
        if !filter_accepts(self.filter.as_ref(), event) {
            return Ok(());
        }
        canvas.begin_resize(owner)?;
        self.grip = Some((owner, site));
        self.gesture.start(event.point);
        event.consume();
        Ok(())
    }

    fn mouse_dragged(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        let Some((owner, site)) = self.grip else {
            return Ok(());
        };
        if let Some(delta) = self.gesture.step(event.point) {
            canvas.resize_decorated(owner, site, delta.x, delta.y)?;
        }
        event.consume();
        Ok(())
    }

    fn mouse_released(
        &mut self,
        event: &mut LayerEvent,
        _canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        if self.grip.take().is_some() {
            self.gesture.finish();
            event.consume();
        }
        Ok(())
    }
}
