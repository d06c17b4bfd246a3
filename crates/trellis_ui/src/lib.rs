//! # Trellis UI
//!
//! Retained-mode widget tree with three layout strategies, layered styles and
//! pointer interaction states.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       FRAME PIPELINE                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  Input Events → Hit Test → Layout → Style Pass → Draw    │
//! │       ↓            ↓          ↓          ↓          ↓     │
//! │  InputState   Interaction  Measure/   Resolve    Render   │
//! │               + notify     Arrange    + edits    Commands │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Widgets live in a [`WidgetTree`] arena. Containers lay out their placed
//! children as [`LayoutKind::Absolute`], [`LayoutKind::Pack`] or
//! [`LayoutKind::Grid`]; styles are merged from base, hover and active layers
//! over a [`Theme`]. [`WidgetTree::run_frame`] drives one frame into a
//! [`UIRenderer`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod frame;
pub mod hit;
pub mod input;
pub mod layout;
pub mod render;
pub mod style;
pub mod widget;

pub use error::{UiError, UiResult};
pub use frame::FrameStats;
pub use input::{InputEvent, InputState, MouseButton};
pub use layout::{Anchor, GridPlacement, LayoutKind, Placement, Rect, Size, Sticky};
pub use render::{RenderCommand, UIBatch, UIRenderer};
pub use style::{Color, EffectiveStyle, Prop, Style, StyleLayerKind, StyleProperty, Theme};
pub use widget::{
    Button, Entry, Frame, Image, ImageSource, Interaction, Label, NotifyEvent, NotifyInfo, TextMeasurer, Widget, WidgetId,
    WidgetKind, WidgetTree,
};
