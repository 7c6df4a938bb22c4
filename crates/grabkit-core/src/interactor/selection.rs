//! Click-to-select dispatch layered over a composite interactor.

use super::{CompositeInteractor, Interactor};
use crate::canvas::Canvas;
use crate::error::ManipulationResult;
use crate::event::{LayerEvent, MouseFilter};
use crate::selection::SelectionModel;
use std::cell::RefCell;
use std::rc::Rc;

/// Maintains a selection model from click gestures, then hands the
/// gesture to its composite children.
///
/// A press matching the select filter on an unselected figure replaces
/// the selection with that figure; a press matching the toggle filter
/// flips membership. Either way the press is always consumed, independent
/// of the composite's consuming flag: clicks that change selection never
/// fall through to the background. Before the children run, any child
/// exposing drag targets is pointed at the full current selection, so a
/// click-then-drag moves everything selected.
pub struct SelectionInteractor {
    composite: CompositeInteractor,
    select_filter: MouseFilter,
    toggle_filter: MouseFilter,
    model: Rc<RefCell<SelectionModel>>,
}

impl SelectionInteractor {
    pub fn new(model: Rc<RefCell<SelectionModel>>) -> Self {
        Self {
            composite: CompositeInteractor::new(),
            select_filter: MouseFilter::selection(),
            toggle_filter: MouseFilter::toggle(),
            model,
        }
    }

    pub fn set_select_filter(&mut self, filter: MouseFilter) {
        self.select_filter = filter;
    }

    pub fn set_toggle_filter(&mut self, filter: MouseFilter) {
        self.toggle_filter = filter;
    }

    pub fn add_interactor(&mut self, child: Box<dyn Interactor>) {
        self.composite.add_interactor(child);
    }

    pub fn model(&self) -> Rc<RefCell<SelectionModel>> {
        self.model.clone()
    }
}

impl Interactor for SelectionInteractor {
    fn accept(&self, event: &LayerEvent) -> bool {
        self.select_filter.accept(event)
            || self.toggle_filter.accept(event)
            || self.composite.accept(event)
    }

    fn mouse_pressed(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        let mut changed = false;
        if let Some(figure) = event.target.figure() {
            if self.select_filter.accept(event) {
                if !self.model.borrow().is_selected(figure) {
                    let mut model = self.model.borrow_mut();
                    model.clear_selection(canvas);
                    model.add_selection(canvas, figure);
                    changed = true;
                }
            } else if self.toggle_filter.accept(event) {
                self.model.borrow_mut().toggle_selection(canvas, figure);
                changed = true;
            }

            if self.model.borrow().is_selected(figure) {
                let selection = self.model.borrow().selection().to_vec();
                self.composite.set_drag_targets(&selection);
            }
        }

        self.composite.mouse_pressed(event, canvas)?;
        if changed {
            event.consume();
        }
        Ok(())
    }

    fn mouse_dragged(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        self.composite.mouse_dragged(event, canvas)
    }

    fn mouse_released(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        self.composite.mouse_released(event, canvas)
    }

    fn mouse_entered(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        self.composite.mouse_entered(event, canvas)
    }

    fn mouse_exited(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        self.composite.mouse_exited(event, canvas)
    }

    fn mouse_moved(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        self.composite.mouse_moved(event, canvas)
    }

    fn is_motion_enabled(&self) -> bool {
        self.composite.is_motion_enabled()
    }

    fn is_consuming(&self) -> bool {
        self.composite.is_consuming()
    }

    fn selection_model(&self) -> Option<Rc<RefCell<SelectionModel>>> {
        Some(self.model.clone())
    }
}
