//! GrabKit Core Library
//!
//! Interactive manipulation of canvas figures: editable geometries with
//! addressable sites, grab-handle manipulators, drag interactors with
//! point constraints, and rubber-band selection.

pub mod canvas;
pub mod constraint;
pub mod error;
pub mod event;
pub mod figure;
pub mod geometry;
pub mod interactor;
pub mod manipulator;
pub mod selection;

pub use canvas::Canvas;
pub use constraint::{BoundsConstraint, PointConstraint, Quadrant, QuadrantConstraint};
pub use error::{ManipulationError, ManipulationResult};
pub use event::{EventTarget, LayerEvent, Modifiers, MouseButton, MouseFilter};
pub use figure::{Figure, FigureId, FigureStyle, Shape, ShapeKind};
pub use geometry::{BoundsGeometry, CircleGeometry, CompassPoint, PathGeometry, Site, SiteId};
pub use interactor::{
    ActionInteractor, CompositeInteractor, DragGesture, DragInteractor, DragListener, Interactor,
    Resizer, SelectionDragger, SelectionInteractor,
};
pub use manipulator::{GrabHandle, GrabHandleFactory, HandleShape, Manipulator, ManipulatorKind};
pub use selection::{
    ManipulatorRenderer, SelectionEvent, SelectionListener, SelectionModel, SelectionRenderer,
};
