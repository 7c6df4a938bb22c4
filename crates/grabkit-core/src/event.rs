//! Pointer events delivered to interactors.
//!
//! The event source (windowing shell, test harness) is external to this
//! crate; interactors only see [`LayerEvent`] values carrying a position,
//! button/modifier state, a target reference, and a consumable flag.

use crate::figure::FigureId;
use crate::geometry::SiteId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Shift only, all other modifiers up.
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }
}

/// What a pointer event was delivered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTarget {
    /// Empty canvas space.
    Background,
    /// A figure in the canvas.
    Figure(FigureId),
    /// A grab handle belonging to the manipulator decorating `owner`.
    Handle { owner: FigureId, site: SiteId },
}

impl EventTarget {
    /// The figure this event was sourced from, if any.
    pub fn figure(&self) -> Option<FigureId> {
        match self {
            EventTarget::Figure(id) => Some(*id),
            EventTarget::Handle { owner, .. } => Some(*owner),
            EventTarget::Background => None,
        }
    }
}

/// A pointer event as seen by interactors.
///
/// One logical gesture delivers press, zero or more drags, and a release,
/// strictly in that order and never interleaved with another gesture's
/// events on the same interactor.
#[derive(Debug, Clone)]
pub struct LayerEvent {
    /// Position in world coordinates.
    pub point: Point,
    /// Button that produced the event (last-pressed button for drags).
    pub button: MouseButton,
    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
    /// What the event was delivered against.
    pub target: EventTarget,
    consumed: bool,
}

impl LayerEvent {
    /// Create a left-button event with no modifiers.
    pub fn new(point: Point, target: EventTarget) -> Self {
        Self {
            point,
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
            target,
            consumed: false,
        }
    }

    /// Set the button.
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    /// Set the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark the event as consumed. Consumed events stop propagating
    /// through composite dispatch.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// Check whether the event has been consumed.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// Matches events by button and exact modifier state.
///
/// Interactors configured with no filter (`None`) accept everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseFilter {
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl MouseFilter {
    /// Create a filter for a button with no modifiers.
    pub fn new(button: MouseButton) -> Self {
        Self {
            button,
            modifiers: Modifiers::default(),
        }
    }

    /// Set the required modifier state.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The conventional selection filter: left button, no modifiers.
    pub fn selection() -> Self {
        Self::new(MouseButton::Left)
    }

    /// The conventional toggle filter: left button with shift.
    pub fn toggle() -> Self {
        Self::new(MouseButton::Left).with_modifiers(Modifiers::shift())
    }

    /// Check whether an event matches this filter.
    pub fn accept(&self, event: &LayerEvent) -> bool {
        event.button == self.button && event.modifiers == self.modifiers
    }
}

/// Apply an optional filter; an absent filter accepts everything.
pub fn filter_accepts(filter: Option<&MouseFilter>, event: &LayerEvent) -> bool {
    filter.is_none_or(|f| f.accept(event))
}
