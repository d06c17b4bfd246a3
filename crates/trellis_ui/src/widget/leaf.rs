//! Concrete widgets.
//!
//! Frames and the root only draw their background. Labels and images measure
//! their content through the installed providers and degrade to zero content
//! when a provider is missing.

use super::{MeasureContext, Widget, WidgetId, WidgetKind};
use crate::error::UiResult;
use crate::layout::{GridPlacement, LayoutKind, Rect, Size, Sticky};
use crate::render::{RenderCommand, UIRenderer};
use crate::style::{Color, EffectiveStyle, Prop, Style};
use crate::widget::WidgetTree;

/// The root surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct Root;

impl Widget for Root {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Root
    }
}

/// Plain container.
#[derive(Debug, Clone, Copy, Default)]
pub struct Frame;

impl Widget for Frame {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Frame
    }
}

/// A thing to display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    text: String,
}

impl Label {
    /// Creates a label.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The label text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Widget for Label {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Label
    }

    /// Text extent plus room for the rounded corners.
    fn content_size(&self, ctx: &MeasureContext<'_>) -> UiResult<Size> {
        let Some(measurer) = ctx.text else {
            tracing::warn!(text = %self.text, "no text measurer installed, label has no content size");
            return Ok(Size::ZERO);
        };

        let text = measurer.measure_text(&self.text, ctx.style.font_size)?;
        let corner = ctx.style.radii.max();
        Ok(Size::new(text.width + corner, text.height + corner))
    }

    fn render(&self, bounds: Rect, style: &EffectiveStyle, renderer: &mut UIRenderer) {
        renderer.push(RenderCommand::Text {
            text: self.text.clone(),
            bounds,
            color: style.color,
            font_size: style.font_size,
        });
    }
}

/// A widget for displaying images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    source: String,
}

impl Image {
    /// Creates an image widget showing the image named `source`.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Name of the displayed image.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Widget for Image {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Image
    }

    /// Image pixel size. If exactly one dimension is configured the other one
    /// follows the image's aspect ratio.
    fn content_size(&self, ctx: &MeasureContext<'_>) -> UiResult<Size> {
        let Some(images) = ctx.images else {
            tracing::warn!(source = %self.source, "no image source installed, image has no content size");
            return Ok(Size::ZERO);
        };
        let Some(image) = images.image_size(&self.source) else {
            tracing::warn!(source = %self.source, "unknown image");
            return Ok(Size::ZERO);
        };
        if image.width <= 0.0 || image.height <= 0.0 {
            return Ok(Size::ZERO);
        }

        let size = match (ctx.size.configured_width, ctx.size.configured_height) {
            (Some(width), None) => Size::new(width, width * image.height / image.width),
            (None, Some(height)) => Size::new(height * image.width / image.height, height),
            _ => image,
        };
        Ok(size)
    }

    fn render(&self, bounds: Rect, _style: &EffectiveStyle, renderer: &mut UIRenderer) {
        renderer.push(RenderCommand::Image {
            bounds,
            source: self.source.clone(),
        });
    }
}

/// Something you can click: a frame holding a label that fills it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Button;

impl Button {
    /// Smallest size of a button.
    pub const MIN_SIZE: Size = Size::new(20.0, 20.0);

    /// Creates a button under `parent` and returns its id.
    ///
    /// The button is a single-cell grid whose row and column grow, holding a
    /// transparent label stuck to all four edges.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` doesn't exist.
    pub fn create(tree: &mut WidgetTree, parent: WidgetId, text: impl Into<String>) -> UiResult<WidgetId> {
        let button = tree.create(parent, Self)?;
        tree.set_layout(button, LayoutKind::Grid)?;
        tree.grid_row_configure(button, 0, 1.0)?;
        tree.grid_column_configure(button, 0, 1.0)?;
        tree.configure_min_size(button, Self::MIN_SIZE.width, Self::MIN_SIZE.height)?;

        let label_style = Style {
            background_color: Prop::Value(Color::TRANSPARENT),
            ..Style::default()
        };
        let label = tree.create_with_style(button, Label::new(text), label_style)?;
        tree.grid(label, GridPlacement::new(0, 0).sticky(Sticky::ALL))?;

        Ok(button)
    }
}

impl Widget for Button {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Button
    }
}

/// A text field: a wide frame holding a centered label.
#[derive(Debug, Clone, Copy, Default)]
pub struct Entry;

impl Entry {
    /// Smallest size of an entry.
    pub const MIN_SIZE: Size = Size::new(100.0, 10.0);

    /// Creates an entry under `parent` and returns its id.
    ///
    /// Like a button, the entry is a single-cell grid whose row and column
    /// grow. Its label keeps its natural size and sits centered in the cell.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` doesn't exist.
    pub fn create(tree: &mut WidgetTree, parent: WidgetId, text: impl Into<String>) -> UiResult<WidgetId> {
        let entry = tree.create(parent, Self)?;
        tree.set_layout(entry, LayoutKind::Grid)?;
        tree.grid_row_configure(entry, 0, 1.0)?;
        tree.grid_column_configure(entry, 0, 1.0)?;
        tree.configure_min_size(entry, Self::MIN_SIZE.width, Self::MIN_SIZE.height)?;

        let label = tree.create(entry, Label::new(text))?;
        tree.grid(label, GridPlacement::new(0, 0))?;

        Ok(entry)
    }
}

impl Widget for Entry {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::SizeBox;

    struct FixedImages;

    impl crate::widget::ImageSource for FixedImages {
        fn image_size(&self, key: &str) -> Option<Size> {
            (key == "logo").then_some(Size::new(200.0, 100.0))
        }
    }

    fn measure_image(image: &Image, size: &SizeBox) -> Size {
        let style = EffectiveStyle::BASELINE;
        let ctx = MeasureContext {
            text: None,
            images: Some(&FixedImages),
            style: &style,
            size,
        };
        image.content_size(&ctx).unwrap()
    }

    #[test]
    fn test_image_keeps_aspect_ratio() {
        let logo = Image::new("logo");

        assert_eq!(measure_image(&logo, &SizeBox::default()), Size::new(200.0, 100.0));

        let wide = SizeBox {
            configured_width: Some(50.0),
            ..SizeBox::default()
        };
        assert_eq!(measure_image(&logo, &wide), Size::new(50.0, 25.0));

        let tall = SizeBox {
            configured_height: Some(50.0),
            ..SizeBox::default()
        };
        assert_eq!(measure_image(&logo, &tall), Size::new(100.0, 50.0));
    }

    #[test]
    fn test_unknown_image_degrades_to_zero() {
        assert_eq!(measure_image(&Image::new("missing"), &SizeBox::default()), Size::ZERO);
    }

    #[test]
    fn test_label_without_measurer_is_empty() {
        let style = EffectiveStyle::BASELINE;
        let size = SizeBox::default();
        let ctx = MeasureContext {
            text: None,
            images: None,
            style: &style,
            size: &size,
        };

        assert_eq!(Label::new("hi").content_size(&ctx).unwrap(), Size::ZERO);
    }
}
