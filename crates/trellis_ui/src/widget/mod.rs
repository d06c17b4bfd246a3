//! Widget system: the widget tree, size bookkeeping and the concrete widgets.
//!
//! Widgets live in a [`WidgetTree`] arena and are addressed by [`WidgetId`].

mod core;
mod leaf;
mod tree;

pub use core::{
    ChildEntry, ImageSource, Interaction, MeasureContext, Notification, NotifyEvent, NotifyInfo, SizeBox,
    TextMeasurer, Widget, WidgetId, WidgetKind, WidgetNode,
};
pub use leaf::{Button, Entry, Frame, Image, Label, Root};
pub use tree::WidgetTree;
