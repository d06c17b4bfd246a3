//! Core widget types and traits.

use std::fmt;

use crate::error::UiResult;
use crate::layout::{Axis, GridTracks, LayoutKind, LayoutParams, Placement, Rect, Size};
use crate::render::UIRenderer;
use crate::style::{EffectiveStyle, StyleProperty, StyleSet};

/// Unique identifier for a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl WidgetId {
    /// Creates a new widget ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Widget category, used to pick theme defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// The root surface.
    Root,
    /// Plain container.
    Frame,
    /// Text display.
    Label,
    /// Clickable frame with a label.
    Button,
    /// Text field frame holding a placeholder label.
    Entry,
    /// Image display.
    Image,
}

/// Pointer interaction state. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interaction {
    /// Not under the pointer.
    #[default]
    Normal,
    /// Under the pointer.
    Hovered,
    /// Under the pointer with the primary button held.
    Active,
}

/// Size bookkeeping of a widget.
///
/// Effective size is the configured size if present, else the size assigned by
/// the parent's solver, else the content size raised to the minimum size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeBox {
    /// Width explicitly requested by the user.
    pub configured_width: Option<f32>,
    /// Height explicitly requested by the user.
    pub configured_height: Option<f32>,
    /// Width assigned by the parent's solver.
    pub assigned_width: Option<f32>,
    /// Height assigned by the parent's solver.
    pub assigned_height: Option<f32>,
    /// Intrinsic size derived from children or leaf content.
    pub content: Size,
    /// Lower bound of the content width.
    pub min_width: f32,
    /// Lower bound of the content height.
    pub min_height: f32,
}

impl SizeBox {
    /// Size reported to the parent's solver: configured, else content raised to
    /// the minimum. Assigned sizes are ignored so a previous assignment never
    /// feeds back into measurement.
    #[must_use]
    pub fn natural(&self) -> Size {
        let content = self.content.max(Size::new(self.min_width, self.min_height));
        Size::new(
            self.configured_width.unwrap_or(content.width).max(0.0),
            self.configured_height.unwrap_or(content.height).max(0.0),
        )
    }

    /// Size used for drawing and hit testing.
    #[must_use]
    pub fn effective(&self) -> Size {
        let natural = self.natural();
        Size::new(
            self.configured_width
                .or(self.assigned_width)
                .unwrap_or(natural.width)
                .max(0.0),
            self.configured_height
                .or(self.assigned_height)
                .unwrap_or(natural.height)
                .max(0.0),
        )
    }

    /// Returns true if the dimension along the axis is configured.
    #[must_use]
    pub const fn is_configured(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.configured_width.is_some(),
            Axis::Vertical => self.configured_height.is_some(),
        }
    }
}

/// Notification kinds routed through [`crate::WidgetTree::notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyEvent {
    /// The pointer moved over the widget.
    SetHover,
    /// The widget is pressed.
    SetActive,
    /// The widget returned to its resting state.
    SetNormal,
    /// The theme was replaced.
    ThemeReload,
    /// A style property of the widget changed.
    StylePropertyChange,
}

impl NotifyEvent {
    /// Every notification kind.
    pub const ALL: [Self; 5] = [
        Self::SetHover,
        Self::SetActive,
        Self::SetNormal,
        Self::ThemeReload,
        Self::StylePropertyChange,
    ];
}

/// Payload of a notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotifyInfo {
    /// No payload.
    None,
    /// Pointer position in the widget's local coordinates.
    Pointer {
        /// Local x.
        x: f32,
        /// Local y.
        y: f32,
    },
    /// The property that changed.
    Property(StyleProperty),
}

/// A delivered notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Notification {
    /// Target widget.
    pub widget: WidgetId,
    /// What happened.
    pub event: NotifyEvent,
    /// Event payload.
    pub info: NotifyInfo,
}

/// Text measurement provider.
pub trait TextMeasurer {
    /// Returns the `(width, height)` of `text` rendered at `font_size`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::Measurement`] when the text can't be measured.
    fn measure_text(&self, text: &str, font_size: f32) -> UiResult<Size>;
}

/// Image metadata provider.
pub trait ImageSource {
    /// Returns the pixel size of the image named `key`, or None if unknown.
    fn image_size(&self, key: &str) -> Option<Size>;
}

/// Inputs available to a widget while its content is measured.
pub struct MeasureContext<'a> {
    /// Text measurement, if one is installed.
    pub text: Option<&'a dyn TextMeasurer>,
    /// Image metadata, if installed.
    pub images: Option<&'a dyn ImageSource>,
    /// Resting-state style of the widget.
    pub style: &'a EffectiveStyle,
    /// The widget's size box.
    pub size: &'a SizeBox,
}

/// Leaf behaviour of a widget: content measurement and content drawing.
///
/// Background, border and children are drawn by the tree; `render` only adds
/// what is specific to the widget.
pub trait Widget: fmt::Debug {
    /// Category used for theme defaults.
    fn kind(&self) -> WidgetKind;

    /// Returns the intrinsic size of the widget's own content.
    ///
    /// # Errors
    ///
    /// Propagates failures of the measurement providers.
    fn content_size(&self, ctx: &MeasureContext<'_>) -> UiResult<Size> {
        let _ = ctx;
        Ok(Size::ZERO)
    }

    /// Draws the widget's content inside `bounds` (absolute coordinates).
    fn render(&self, bounds: Rect, style: &EffectiveStyle, renderer: &mut UIRenderer) {
        let _ = (bounds, style, renderer);
    }
}

/// A child slot. Unplaced children are owned but not laid out, drawn or hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildEntry {
    /// The child.
    pub id: WidgetId,
    /// How the child is placed, once placed.
    pub placement: Option<Placement>,
}

/// A node of the widget tree.
#[derive(Debug)]
pub struct WidgetNode {
    pub(crate) id: WidgetId,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<ChildEntry>,
    pub(crate) widget: Box<dyn Widget>,
    pub(crate) size: SizeBox,
    pub(crate) position: (f32, f32),
    pub(crate) layout: LayoutKind,
    pub(crate) params: LayoutParams,
    pub(crate) tracks: GridTracks,
    pub(crate) styles: StyleSet,
    pub(crate) interaction: Interaction,
    pub(crate) effective: EffectiveStyle,
}

impl WidgetNode {
    pub(crate) fn new(id: WidgetId, parent: Option<WidgetId>, widget: Box<dyn Widget>) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            widget,
            size: SizeBox::default(),
            position: (0.0, 0.0),
            layout: LayoutKind::Absolute,
            params: LayoutParams::default(),
            tracks: GridTracks::default(),
            styles: StyleSet::default(),
            interaction: Interaction::Normal,
            effective: EffectiveStyle::BASELINE,
        }
    }

    /// Widget identifier.
    #[must_use]
    pub const fn id(&self) -> WidgetId {
        self.id
    }

    /// Parent widget (None for the root).
    #[must_use]
    pub const fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Child slots in paint order.
    #[must_use]
    pub fn children(&self) -> &[ChildEntry] {
        &self.children
    }

    /// Children that have been placed, in paint order.
    pub fn placed_children(&self) -> impl Iterator<Item = (WidgetId, Placement)> + '_ {
        self.children
            .iter()
            .filter_map(|entry| entry.placement.map(|placement| (entry.id, placement)))
    }

    /// Widget category.
    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.widget.kind()
    }

    /// Leaf behaviour.
    #[must_use]
    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    /// Size bookkeeping.
    #[must_use]
    pub const fn size_box(&self) -> &SizeBox {
        &self.size
    }

    /// Position relative to the parent.
    #[must_use]
    pub const fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Rectangle relative to the parent.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size.effective())
    }

    /// Layout kind governing the children.
    #[must_use]
    pub const fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// Margin and padding used by the solver.
    #[must_use]
    pub const fn layout_params(&self) -> LayoutParams {
        self.params
    }

    /// Style layers.
    #[must_use]
    pub const fn styles(&self) -> &StyleSet {
        &self.styles
    }

    /// Current interaction state.
    #[must_use]
    pub const fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Style resolved during the last frame.
    #[must_use]
    pub const fn effective_style(&self) -> &EffectiveStyle {
        &self.effective
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_box_precedence() {
        let mut size = SizeBox {
            content: Size::new(10.0, 10.0),
            ..SizeBox::default()
        };
        assert_eq!(size.effective(), Size::new(10.0, 10.0));

        size.min_width = 15.0;
        assert_eq!(size.natural(), Size::new(15.0, 10.0));

        size.assigned_width = Some(40.0);
        assert_eq!(size.effective(), Size::new(40.0, 10.0));
        assert_eq!(size.natural(), Size::new(15.0, 10.0));

        size.configured_width = Some(25.0);
        assert_eq!(size.effective(), Size::new(25.0, 10.0));
        assert!(size.is_configured(Axis::Horizontal));
        assert!(!size.is_configured(Axis::Vertical));
    }

    #[test]
    fn test_size_box_empty_is_zero() {
        assert_eq!(SizeBox::default().effective(), Size::ZERO);
    }
}
