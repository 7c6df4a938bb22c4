//! Priority-list dispatch over child interactors.

use super::Interactor;
use crate::canvas::Canvas;
use crate::error::ManipulationResult;
use crate::event::LayerEvent;
use crate::figure::FigureId;

/// Routes each gesture to the first child that accepts it.
///
/// This is a priority list, not a broadcast: on press, children are tried
/// in order until one consumes the event, and that child receives the rest
/// of the gesture. For motion events a single "current" child receives
/// moves between enter and exit; when a new child takes over, the old one
/// is sent a synthesized exit first so it never sits in a half-finished
/// hover state.
#[derive(Default)]
pub struct CompositeInteractor {
    children: Vec<Box<dyn Interactor>>,
    consuming: bool,
    /// Child handling the in-flight press/drag/release sequence.
    gesture_child: Option<usize>,
    /// Child receiving motion events.
    current: Option<usize>,
}

impl CompositeInteractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume every press regardless of whether a child did.
    pub fn set_consuming(&mut self, consuming: bool) {
        self.consuming = consuming;
    }

    pub fn add_interactor(&mut self, child: Box<dyn Interactor>) {
        self.children.push(child);
    }

    pub fn interactor_count(&self) -> usize {
        self.children.len()
    }

    /// Set the drag-target list on every child that exposes one.
    pub fn set_drag_targets(&mut self, targets: &[FigureId]) {
        for child in &mut self.children {
            if let Some(slot) = child.drag_targets_mut() {
                *slot = targets.to_vec();
            }
        }
    }
}

impl Interactor for CompositeInteractor {
    fn accept(&self, event: &LayerEvent) -> bool {
        self.children.iter().any(|c| c.accept(event))
    }

    fn mouse_pressed(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        self.gesture_child = None;
        for (index, child) in self.children.iter_mut().enumerate() {
            if !child.accept(event) {
                continue;
            }
            self.gesture_child = Some(index);
            child.mouse_pressed(event, canvas)?;
            if event.is_consumed() {
                break;
            }
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
        if let Some(index) = self.gesture_child {
            self.children[index].mouse_dragged(event, canvas)?;
        }
        if self.consuming {
            event.consume();
        }
        Ok(())
    }

    fn mouse_released(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        if let Some(index) = self.gesture_child.take() {
            self.children[index].mouse_released(event, canvas)?;
        }
        if self.consuming {
            event.consume();
        }
        Ok(())
    }

    fn mouse_entered(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        let next = self
            .children
            .iter()
            .position(|c| c.is_motion_enabled() && c.accept(event));
        if next != self.current {
            if let Some(old) = self.current.take() {
                // The old receiver gets an ordinary exit, not a cancel
                self.children[old].mouse_exited(event, canvas)?;
            }
            if let Some(index) = next {
                self.current = Some(index);
                self.children[index].mouse_entered(event, canvas)?;
            }
        }
        Ok(())
    }

    fn mouse_exited(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        if let Some(index) = self.current.take() {
            self.children[index].mouse_exited(event, canvas)?;
        }
        Ok(())
    }

    fn mouse_moved(
        &mut self,
        event: &mut LayerEvent,
        canvas: &mut Canvas,
    ) -> ManipulationResult<()> {
        if let Some(index) = self.current {
            self.children[index].mouse_moved(event, canvas)?;
        }
        Ok(())
    }

    fn is_motion_enabled(&self) -> bool {
        self.children.iter().any(|c| c.is_motion_enabled())
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
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Scripted child: accepts or not, consumes or not, logs calls.
    struct Probe {
        name: &'static str,
        accepts: Rc<Cell<bool>>,
        consumes: bool,
        motion: bool,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl Probe {
        fn log(&self, what: &str) {
            self.calls.borrow_mut().push(format!("{}:{what}", self.name));
        }
    }

    impl Interactor for Probe {
        fn accept(&self, _event: &LayerEvent) -> bool {
            self.accepts.get()
        }

        fn mouse_pressed(
            &mut self,
            event: &mut LayerEvent,
            _canvas: &mut Canvas,
        ) -> ManipulationResult<()> {
            self.log("press");
            if self.consumes {
                event.consume();
            }
            Ok(())
        }

        fn mouse_dragged(
            &mut self,
            _event: &mut LayerEvent,
            _canvas: &mut Canvas,
        ) -> ManipulationResult<()> {
            self.log("drag");
            Ok(())
        }

        fn mouse_released(
            &mut self,
            _event: &mut LayerEvent,
            _canvas: &mut Canvas,
        ) -> ManipulationResult<()> {
            self.log("release");
            Ok(())
        }

        fn mouse_entered(
            &mut self,
            _event: &mut LayerEvent,
            _canvas: &mut Canvas,
        ) -> ManipulationResult<()> {
            self.log("enter");
            Ok(())
        }

        fn mouse_exited(
            &mut self,
            _event: &mut LayerEvent,
            _canvas: &mut Canvas,
        ) -> ManipulationResult<()> {
            self.log("exit");
            Ok(())
        }

        fn is_motion_enabled(&self) -> bool {
            self.motion
        }
    }

    fn probe(
        name: &'static str,
        accepts: bool,
        consumes: bool,
        calls: &Rc<RefCell<Vec<String>>>,
    ) -> Box<Probe> {
        Box::new(Probe {
            name,
            accepts: Rc::new(Cell::new(accepts)),
            consumes,
            motion: false,
            calls: calls.clone(),
        })
    }

    fn event() -> LayerEvent {
        LayerEvent::new(Point::ZERO, EventTarget::Background)
    }

    #[test]
    fn test_accept_iff_any_child_accepts() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut composite = CompositeInteractor::new();
        assert!(!composite.accept(&event()));

        composite.add_interactor(probe("a", false, true, &calls));
        assert!(!composite.accept(&event()));

        composite.add_interactor(probe("b", true, true, &calls));
        assert!(composite.accept(&event()));
    }

    #[test]
    fn test_press_stops_at_first_consumer() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut composite = CompositeInteractor::new();
        composite.add_interactor(probe("a", false, true, &calls));
        composite.add_interactor(probe("b", true, true, &calls));
        composite.add_interactor(probe("c", true, true, &calls));

        let mut canvas = Canvas::new();
        let mut press = event();
        composite.mouse_pressed(&mut press, &mut canvas).unwrap();
        assert_eq!(*calls.borrow(), vec!["b:press"]);
        assert!(press.is_consumed());
    }

    #[test]
    fn test_declining_child_passes_on() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut composite = CompositeInteractor::new();
        // b accepts but declines to consume, so c gets a turn
        composite.add_interactor(probe("b", true, false, &calls));
        composite.add_interactor(probe("c", true, true, &calls));

        let mut canvas = Canvas::new();
        let mut press = event();
        composite.mouse_pressed(&mut press, &mut canvas).unwrap();
        assert_eq!(*calls.borrow(), vec!["b:press", "c:press"]);
    }

    #[test]
    fn test_gesture_routes_to_press_child() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut composite = CompositeInteractor::new();
        composite.add_interactor(probe("a", true, true, &calls));
        composite.add_interactor(probe("b", true, true, &calls));

        let mut canvas = Canvas::new();
        composite.mouse_pressed(&mut event(), &mut canvas).unwrap();
        composite.mouse_dragged(&mut event(), &mut canvas).unwrap();
        composite.mouse_released(&mut event(), &mut canvas).unwrap();
        assert_eq!(*calls.borrow(), vec!["a:press", "a:drag", "a:release"]);

        // The gesture child is cleared after release
        composite.mouse_dragged(&mut event(), &mut canvas).unwrap();
        assert_eq!(calls.borrow().len(), 3);
    }

    #[test]
    fn test_composite_consuming_flag() {
        let mut composite = CompositeInteractor::new();
        composite.set_consuming(true);

        let mut canvas = Canvas::new();
        let mut press = event();
        // No children at all, yet the composite consumes
        composite.mouse_pressed(&mut press, &mut canvas).unwrap();
        assert!(press.is_consumed());
    }

    #[test]
    fn test_enter_exit_routing() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut composite = CompositeInteractor::new();
        let mut a = probe("a", true, true, &calls);
        a.motion = true;
        composite.add_interactor(a);

        let mut canvas = Canvas::new();
        composite.mouse_entered(&mut event(), &mut canvas).unwrap();
        composite.mouse_exited(&mut event(), &mut canvas).unwrap();
        assert_eq!(*calls.borrow(), vec!["a:enter", "a:exit"]);
    }

    #[test]
    fn test_switching_current_synthesizes_exit() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let a_accepts = Rc::new(Cell::new(true));
        let b_accepts = Rc::new(Cell::new(false));

        let mut composite = CompositeInteractor::new();
        let mut a = probe("a", true, true, &calls);
        a.accepts = a_accepts.clone();
        a.motion = true;
        let mut b = probe("b", false, true, &calls);
        b.accepts = b_accepts.clone();
        b.motion = true;
        composite.add_interactor(a);
        composite.add_interactor(b);

        let mut canvas = Canvas::new();
        composite.mouse_entered(&mut event(), &mut canvas).unwrap();
        assert_eq!(*calls.borrow(), vec!["a:enter"]);

        // A second enter that now routes to "b" exits "a" first
        a_accepts.set(false);
        b_accepts.set(true);
        composite.mouse_entered(&mut event(), &mut canvas).unwrap();
        assert_eq!(*calls.borrow(), vec!["a:enter", "a:exit", "b:enter"]);
    }
}
