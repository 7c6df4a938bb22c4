//! Interactors: gesture state machines attached to canvas content.
//!
//! An interactor receives the press/drag/release events of a pointer
//! gesture plus enter/exit/move motion events. Dispatchers route one
//! gesture to one interactor; composite interactors fan out to children.

mod composite;
mod drag;
mod dragger;
mod selection;

pub use composite::CompositeInteractor;
pub use drag::{DragGesture, DragInteractor, DragListener, Resizer};
pub use dragger::SelectionDragger;
pub use selection::SelectionInteractor;

use crate::canvas::Canvas;
use crate::error::ManipulationResult;
use crate::event::{filter_accepts, LayerEvent, MouseFilter};
use crate::figure::FigureId;
use crate::selection::SelectionModel;
use std::cell::RefCell;
use std::rc::Rc;

/// A handler for pointer gestures over canvas content.
///
/// Handler errors propagate to the event dispatcher; there is no recovery
/// path inside the interactor tree.
pub trait Interactor {
    /// Whether this interactor wants the given event.
    fn accept(&self, event: &LayerEvent) -> bool;

    fn mouse_pressed(
        &mut self,
        _event: &mut LayerEvent,
        _canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        Ok(())
    }

    fn mouse_dragged(
        &mut self,
        _event: &mut LayerEvent,
        _canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        Ok(())
    }

    fn mouse_released(
        &mut self,
        _event: &mut LayerEvent,
        _canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        Ok(())
    }

    fn mouse_entered(
        &mut self,
        _event: &mut LayerEvent,
        _canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        Ok(())
    }

    fn mouse_exited(
        &mut self,
        _event: &mut LayerEvent,
        _canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        Ok(())
    }

    fn mouse_moved(
        &mut self,
        _event: &mut LayerEvent,
        _canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        Ok(())
    }

    /// Whether this interactor wants enter/exit/move events at all.
    fn is_motion_enabled(&self) -> bool {
        false
    }

    /// Whether this interactor consumes the events it handles.
    fn is_consuming(&self) -> bool {
        true
    }

    /// The drag-target list, for interactors that translate figures.
    /// Lets a parent retarget a child's drag at the whole selection.
    fn drag_targets_mut(&mut self) -> Option<&mut Vec<FigureId>> {
        None
    }

    /// The selection model this interactor participates in, if any.
    fn selection_model(&self) -> Option<Rc<RefCell<SelectionModel>>> {
        None
    }
}

/// Fires a callback on an accepted press. Useful for click-to-activate
/// behavior that needs no gesture state.
pub struct ActionInteractor {
    filter: Option<MouseFilter>,
    consuming: bool,
    action: Box<dyn FnMut(&LayerEvent, &mut Canvas)>,
}

impl ActionInteractor {
    pub fn new(action: Box<dyn FnMut(&LayerEvent, &mut Canvas)>) -> Self {
        Self {
            filter: None,
            consuming: true,
            action,
        }
    }

    pub fn with_filter(mut self, filter: MouseFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn set_consuming(&mut self, consuming: bool) {
        self.consuming = consuming;
    }
}

impl Interactor for ActionInteractor {
    fn accept(&self, event: &LayerEvent) -> bool {
        filter_accepts(self.filter.as_ref(), event)
    }

    fn mouse_pressed(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        if !self.accept(event) {
            return Ok(());
        }
        (self.action)(event, canvas);
        if self.consuming {
            event.consume();
        }
        Ok(())
    }

    fn is_consuming(&self) -> bool {
        self.consuming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTarget;
    use kurbo::Point;
    use std::cell::Cell;

    #[test]
    fn test_action_fires_on_accepted_press() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let mut interactor = ActionInteractor::new(Box::new(move |_, _| {
            counter.set(counter.get() + 1);
        }))
        .with_filter(MouseFilter::selection());

        let mut canvas = Canvas::new();
        let mut event = LayerEvent::new(Point::ZERO, EventTarget::Background);
        interactor.mouse_pressed(&mut event, &mut canvas).unwrap();
        assert_eq!(hits.get(), 1);
        assert!(event.is_consumed());

        let mut shifted = LayerEvent::new(Point::ZERO, EventTarget::Background)
            .with_modifiers(crate::event::Modifiers::shift());
        interactor.mouse_pressed(&mut shifted, &mut canvas).unwrap();
        assert_eq!(hits.get(), 1);
        assert!(!shifted.is_consumed());
    }
}
