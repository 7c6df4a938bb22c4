//! Selection model, listeners, and the decorating selection renderer.

use crate::canvas::Canvas;
use crate::figure::FigureId;
use crate::manipulator::Manipulator;

/// How many figures the model may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one figure; adding replaces the previous selection.
    Single,
    /// Any number of figures.
    #[default]
    Multiple,
}

/// A change to the selection. Additions and removals that happen as one
/// logical step arrive in one event.
#[derive(Debug, Clone, Default)]
pub struct SelectionEvent {
    pub added: Vec<FigureId>,
    pub removed: Vec<FigureId>,
}

impl SelectionEvent {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Receives selection-change notifications.
pub trait SelectionListener {
    fn selection_changed(&mut self, event: &SelectionEvent);
}

/// Renders figures as selected or deselected when membership changes.
pub trait SelectionRenderer {
    fn render_selected(&mut self, canvas: &mut Canvas, id: FigureId);
    fn render_deselected(&mut self, canvas: &mut Canvas, id: FigureId);
}

/// The default renderer: wraps each selected figure in a manipulator
/// cloned from a prototype and unwraps it on deselection.
///
/// Render failures are logged rather than propagated; a figure that
/// cannot be decorated is still selected.
#[derive(Debug)]
pub struct ManipulatorRenderer {
    prototype: Manipulator,
}

impl ManipulatorRenderer {
    pub fn new(prototype: Manipulator) -> Self {
        Self { prototype }
    }
}

impl SelectionRenderer for ManipulatorRenderer {
    fn render_selected(&mut self, canvas: &mut Canvas, id: FigureId) {
        if let Err(err) = canvas.decorate(id, &self.prototype) {
            log::warn!("Could not decorate selected figure {id}: {err}");
        }
    }

    fn render_deselected(&mut self, canvas: &mut Canvas, id: FigureId) {
        if let Err(err) = canvas.undecorate(id) {
            log::warn!("Could not undecorate figure {id}: {err}");
        }
    }
}

/// An ordered set of selected figures.
///
/// Mutators take the canvas so the renderer can decorate and undecorate
/// figures as membership changes. Interactors share one model through
/// `Rc<RefCell<SelectionModel>>`.
#[derive(Default)]
pub struct SelectionModel {
    mode: SelectionMode,
    selection: Vec<FigureId>,
    listeners: Vec<Box<dyn SelectionListener>>,
    renderer: Option<Box<dyn SelectionRenderer>>,
}

impl SelectionModel {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn SelectionRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn set_renderer(&mut self, renderer: Option<Box<dyn SelectionRenderer>>) {
        self.renderer = renderer;
    }

    pub fn add_listener(&mut self, listener: Box<dyn SelectionListener>) {
        self.listeners.push(listener);
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Selected figures in selection order.
    pub fn selection(&self) -> &[FigureId] {
        &self.selection
    }

    pub fn is_selected(&self, id: FigureId) -> bool {
        self.selection.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Add a figure to the selection. In single mode this replaces the
    /// previous selection and fires one event carrying both the removal
    /// and the addition.
    pub fn add_selection(&mut self, canvas: &mut Canvas, id: FigureId) {
        if self.is_selected(id) {
            return;
        }
        let mut event = SelectionEvent::default();
        if self.mode == SelectionMode::Single {
            for old in std::mem::take(&mut self.selection) {
                self.render_deselected(canvas, old);
                event.removed.push(old);
            }
        }
        self.selection.push(id);
        self.render_selected(canvas, id);
        event.added.push(id);
        self.fire(&event);
    }

    /// Remove a figure from the selection.
    pub fn remove_selection(&mut self, canvas: &mut Canvas, id: FigureId) {
        let Some(index) = self.selection.iter().position(|&fid| fid == id) else {
            return;
        };
        self.selection.remove(index);
        self.render_deselected(canvas, id);
        self.fire(&SelectionEvent {
            removed: vec![id],
            ..SelectionEvent::default()
        });
    }

    /// Flip a figure's membership.
    pub fn toggle_selection(&mut self, canvas: &mut Canvas, id: FigureId) {
        if self.is_selected(id) {
            self.remove_selection(canvas, id);
        } else {
            self.add_selection(canvas, id);
        }
    }

    /// Deselect everything, firing one event.
    pub fn clear_selection(&mut self, canvas: &mut Canvas) {
        if self.selection.is_empty() {
            return;
        }
        let removed = std::mem::take(&mut self.selection);
        for &id in &removed {
            self.render_deselected(canvas, id);
        }
        self.fire(&SelectionEvent {
            removed,
            ..SelectionEvent::default()
        });
    }

    /// Apply a batch of additions and removals as one step, firing one
    /// event. Additions already selected and removals not selected are
    /// dropped from the event. Used by rubber-band selection to report
    /// each drag step as a single change.
    pub fn update_selection(
        &mut self,
        canvas: &mut Canvas,
        added: &[FigureId],
        removed: &[FigureId],
    ) {
        let mut event = SelectionEvent::default();
        for &id in removed {
            if let Some(index) = self.selection.iter().position(|&fid| fid == id) {
                self.selection.remove(index);
                self.render_deselected(canvas, id);
                event.removed.push(id);
            }
        }
        for &id in added {
            if !self.is_selected(id) {
                self.selection.push(id);
                self.render_selected(canvas, id);
                event.added.push(id);
            }
        }
        if !event.is_empty() {
            self.fire(&event);
        }
    }

    fn render_selected(&mut self, canvas: &mut Canvas, id: FigureId) {
        if let Some(renderer) = &mut self.renderer {
            renderer.render_selected(canvas, id);
        }
    }

    fn render_deselected(&mut self, canvas: &mut Canvas, id: FigureId) {
        if let Some(renderer) = &mut self.renderer {
            renderer.render_deselected(canvas, id);
        }
    }

    fn fire(&mut self, event: &SelectionEvent) {
        for listener in &mut self.listeners {
            listener.selection_changed(event);
        }
    }
}

impl std::fmt::Debug for SelectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionModel")
            .field("mode", &self.mode)
            .field("selection", &self.selection)
            .field("listeners", &self.listeners.len())
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}
