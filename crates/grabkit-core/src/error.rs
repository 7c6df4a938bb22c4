//! Error types for geometry and manipulation operations.

use crate::figure::{FigureId, ShapeKind};
use crate::geometry::SiteId;
use thiserror::Error;

/// Errors raised by geometry, figure, and manipulator operations.
///
/// All of these are programmer errors surfaced immediately; there is no
/// transient-failure class in this crate and nothing here is retried.
#[derive(Debug, Error)]
pub enum ManipulationError {
    /// A shape of the wrong kind was pushed into a geometry or figure.
    #[error("shape kind mismatch: expected {expected}, got {found}")]
    ShapeMismatch {
        expected: ShapeKind,
        found: ShapeKind,
    },

    /// A site id that the geometry does not define.
    #[error("no site {0:?} on this geometry")]
    UnknownSite(SiteId),

    /// A site that mirrors derived state and cannot be moved directly
    /// (a close segment mirrors its subpath's starting point).
    #[error("site {0:?} is read-only and cannot be translated")]
    ImmutableSite(SiteId),

    /// The target figure cannot accept a replacement shape.
    #[error("figure {0} does not support shape editing")]
    ShapeEditUnsupported(FigureId),

    /// A manipulator was asked to resize or refresh before any child was
    /// attached.
    #[error("manipulator has no child attached")]
    Detached,

    /// A manipulator operation was routed to a figure with no attached
    /// decorator.
    #[error("figure {0} has no manipulator attached")]
    NotDecorated(FigureId),

    /// A canvas operation referenced a figure that is not in the canvas.
    #[error("figure {0} is not in the canvas")]
    UnknownFigure(FigureId),
}

/// Result type for manipulation operations.
pub type ManipulationResult<T> = Result<T, ManipulationError>;
