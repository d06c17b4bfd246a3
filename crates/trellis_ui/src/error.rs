//! # UI Error Types
//!
//! All errors that can occur while building, laying out or drawing a widget tree.

use thiserror::Error;

use crate::layout::LayoutKind;
use crate::widget::WidgetId;

/// Errors that can occur in the widget tree core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    /// A widget id does not name a live widget.
    #[error("unknown widget: {0:?}")]
    UnknownWidget(WidgetId),

    /// A layout name from configuration is not one of the supported kinds.
    #[error("invalid layout kind: {0:?}")]
    InvalidLayoutKind(String),

    /// A placement was requested against a parent in a different layout mode.
    #[error("can't add a {attempted:?} child to a container managed by {actual:?}")]
    PlacementMismatch {
        /// Layout kind the placement belongs to.
        attempted: LayoutKind,
        /// Layout kind of the parent.
        actual: LayoutKind,
    },

    /// Two children were assigned to the same grid cell.
    #[error("grid cell ({row}, {column}) is already occupied by {occupant:?}")]
    DuplicateGridCell {
        /// Row index.
        row: usize,
        /// Column index.
        column: usize,
        /// Widget already in the cell.
        occupant: WidgetId,
    },

    /// The layout kind was changed while placed children exist.
    #[error("can't change layout of {widget:?} with {children} placed children")]
    LayoutHasChildren {
        /// Container whose layout was being changed.
        widget: WidgetId,
        /// Number of placed children.
        children: usize,
    },

    /// The root surface has no parent to be placed into.
    #[error("the root surface can't be placed or re-parented")]
    RootPlacement,

    /// A configured dimension was negative.
    #[error("negative {axis} configured on {widget:?}: {value}")]
    NegativeDimension {
        /// Widget being configured.
        widget: WidgetId,
        /// Which dimension.
        axis: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A layout pass produced a negative size.
    #[error("layout produced a negative size for {widget:?}: {width}x{height}")]
    NegativeSize {
        /// Widget with the bad size.
        widget: WidgetId,
        /// Resolved width.
        width: f32,
        /// Resolved height.
        height: f32,
    },

    /// Re-parenting would make a widget its own ancestor.
    #[error("cyclic hierarchy: {child:?} is an ancestor of {parent:?}")]
    CyclicHierarchy {
        /// Requested parent.
        parent: WidgetId,
        /// Requested child.
        child: WidgetId,
    },

    /// A measurement collaborator failed.
    #[error("measurement failed: {0}")]
    Measurement(String),

    /// Invalid theme or configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
