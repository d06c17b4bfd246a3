//! Styling system.
//!
//! A [`Style`] is a sparse property bag: every property is either unset, an
//! explicit request for the theme default, or a value. Each widget carries three
//! layers (base, hover, active) which the resolver merges over the theme default
//! for the widget's category to produce an [`EffectiveStyle`].

mod color;
mod resolver;
mod theme;

pub use color::Color;
pub use resolver::{resolve, StyleEdit, StyleObserver};
pub(crate) use resolver::pick;
pub use theme::Theme;

use std::fmt;

use serde::{Deserialize, Deserializer};

/// A three-valued style property.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Prop<T> {
    /// Not set on this layer; lower layers decide.
    #[default]
    Unset,
    /// Explicitly use the theme default, whatever lower layers say.
    Inherit,
    /// An explicit value.
    Value(T),
}

impl<T: Copy> Prop<T> {
    /// Returns true unless the property is [`Prop::Unset`].
    #[must_use]
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// Returns `self` if set, otherwise `lower`.
    #[must_use]
    pub fn or(self, lower: Self) -> Self {
        match self {
            Self::Unset => lower,
            set => set,
        }
    }

    /// Returns the explicit value, if any.
    #[must_use]
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unset | Self::Inherit => None,
        }
    }
}

impl<T> From<T> for Prop<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Prop<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Value)
    }
}

/// Declares the style schema once and derives the property enum and the
/// property-wise operations from it.
macro_rules! style_schema {
    ($( $(#[$doc:meta])* $field:ident : $ty:ty => $variant:ident ),* $(,)?) => {
        /// Sparse set of visual properties.
        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct Style {
            $( $(#[$doc])* pub $field: Prop<$ty>, )*
        }

        /// Names one property of the [`Style`] schema.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum StyleProperty {
            $( $(#[$doc])* $variant, )*
        }

        impl StyleProperty {
            /// Every property of the schema.
            pub const ALL: &'static [Self] = &[$( Self::$variant, )*];
        }

        impl Style {
            /// Merges two styles property-wise, preferring `other` wherever it is
            /// set. Neither input is modified.
            #[must_use]
            pub fn overwrite(&self, other: &Self) -> Self {
                Self {
                    $( $field: other.$field.or(self.$field), )*
                }
            }

            /// Lists the properties whose state differs between two styles.
            #[must_use]
            pub fn changed_properties(&self, other: &Self) -> Vec<StyleProperty> {
                let mut changed = Vec::new();
                $(
                    if self.$field != other.$field {
                        changed.push(StyleProperty::$variant);
                    }
                )*
                changed
            }

            /// Returns true if the property is set on this style.
            #[must_use]
            pub fn is_set(&self, property: StyleProperty) -> bool {
                match property {
                    $( StyleProperty::$variant => self.$field.is_set(), )*
                }
            }
        }
    };
}

style_schema! {
    /// Requested width.
    width: f32 => Width,
    /// Requested height.
    height: f32 => Height,
    /// Minimum width.
    min_width: f32 => MinWidth,
    /// Minimum height.
    min_height: f32 => MinHeight,
    /// Foreground (text) color.
    color: Color => Color,
    /// Background color.
    background_color: Color => BackgroundColor,
    /// Space between the container edge and its children.
    margin: f32 => Margin,
    /// Space between packed children.
    padding: f32 => Padding,
    /// Radius of all four corners.
    border_radius: f32 => BorderRadius,
    /// Radius of both top corners.
    border_top_radius: f32 => BorderTopRadius,
    /// Radius of both bottom corners.
    border_bottom_radius: f32 => BorderBottomRadius,
    /// Radius of the top-left corner.
    border_top_left_radius: f32 => BorderTopLeftRadius,
    /// Radius of the top-right corner.
    border_top_right_radius: f32 => BorderTopRightRadius,
    /// Radius of the bottom-left corner.
    border_bottom_left_radius: f32 => BorderBottomLeftRadius,
    /// Radius of the bottom-right corner.
    border_bottom_right_radius: f32 => BorderBottomRightRadius,
    /// Border stroke width.
    border_width: f32 => BorderWidth,
    /// Border stroke color.
    border_color: Color => BorderColor,
    /// Font size in pixels.
    font_size: f32 => FontSize,
}

impl StyleProperty {
    /// Returns true for properties mirrored into the layout parameters.
    #[must_use]
    pub const fn affects_layout(self) -> bool {
        matches!(self, Self::Margin | Self::Padding)
    }
}

/// Which of a widget's three style layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleLayerKind {
    /// Always applied.
    Base,
    /// Applied while the widget is hovered.
    Hover,
    /// Applied while the widget is pressed.
    Active,
}

/// One style layer and the observers watching it.
#[derive(Default)]
pub struct StyleLayer {
    /// The layer's properties.
    pub style: Style,
    pub(crate) observers: Vec<StyleObserver>,
}

impl StyleLayer {
    /// Creates a layer with no observers.
    #[must_use]
    pub fn new(style: Style) -> Self {
        Self {
            style,
            observers: Vec::new(),
        }
    }
}

impl fmt::Debug for StyleLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleLayer")
            .field("style", &self.style)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// The base/hover/active triple of a widget.
#[derive(Debug, Default)]
pub struct StyleSet {
    /// Base layer.
    pub base: StyleLayer,
    /// Hover layer.
    pub hover: StyleLayer,
    /// Active layer.
    pub active: StyleLayer,
}

impl StyleSet {
    /// Returns a layer.
    #[must_use]
    pub const fn layer(&self, kind: StyleLayerKind) -> &StyleLayer {
        match kind {
            StyleLayerKind::Base => &self.base,
            StyleLayerKind::Hover => &self.hover,
            StyleLayerKind::Active => &self.active,
        }
    }

    /// Returns a layer mutably.
    pub fn layer_mut(&mut self, kind: StyleLayerKind) -> &mut StyleLayer {
        match kind {
            StyleLayerKind::Base => &mut self.base,
            StyleLayerKind::Hover => &mut self.hover,
            StyleLayerKind::Active => &mut self.active,
        }
    }
}

/// Radii of the four corners of a rounded rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CornerRadii {
    /// Top-left radius.
    pub top_left: f32,
    /// Top-right radius.
    pub top_right: f32,
    /// Bottom-left radius.
    pub bottom_left: f32,
    /// Bottom-right radius.
    pub bottom_right: f32,
}

impl CornerRadii {
    /// Same radius on every corner.
    #[must_use]
    pub const fn uniform(radius: f32) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_left: radius,
            bottom_right: radius,
        }
    }

    /// The largest of the four radii.
    #[must_use]
    pub fn max(&self) -> f32 {
        self.top_left
            .max(self.top_right)
            .max(self.bottom_left)
            .max(self.bottom_right)
    }
}

/// Fully resolved style used for one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveStyle {
    /// Requested width, configured size first.
    pub width: Option<f32>,
    /// Requested height, configured size first.
    pub height: Option<f32>,
    /// Minimum width.
    pub min_width: f32,
    /// Minimum height.
    pub min_height: f32,
    /// Foreground color.
    pub color: Color,
    /// Background color.
    pub background_color: Color,
    /// Container margin.
    pub margin: f32,
    /// Container padding.
    pub padding: f32,
    /// Corner radii.
    pub radii: CornerRadii,
    /// Border stroke width.
    pub border_width: f32,
    /// Border stroke color.
    pub border_color: Color,
    /// Font size in pixels.
    pub font_size: f32,
}

impl EffectiveStyle {
    /// Values used when neither the widget nor the theme set a property.
    pub const BASELINE: Self = Self {
        width: None,
        height: None,
        min_width: 0.0,
        min_height: 0.0,
        color: Color::BLACK,
        background_color: Color::TRANSPARENT,
        margin: 0.0,
        padding: 0.0,
        radii: CornerRadii::uniform(0.0),
        border_width: 0.0,
        border_color: Color::BLACK,
        font_size: 16.0,
    };
}

impl Default for EffectiveStyle {
    fn default() -> Self {
        Self::BASELINE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_prefers_other() {
        let base = Style {
            color: Color::RED.into(),
            margin: Prop::Value(4.0),
            ..Style::default()
        };
        let over = Style {
            color: Color::BLUE.into(),
            padding: Prop::Inherit,
            ..Style::default()
        };

        let merged = base.overwrite(&over);

        assert_eq!(merged.color, Prop::Value(Color::BLUE));
        assert_eq!(merged.margin, Prop::Value(4.0));
        assert_eq!(merged.padding, Prop::Inherit);
        // inputs untouched
        assert_eq!(base.color, Prop::Value(Color::RED));
        assert_eq!(over.margin, Prop::Unset);
    }

    #[test]
    fn test_overwrite_is_associative() {
        let a = Style {
            color: Color::RED.into(),
            margin: Prop::Value(1.0),
            ..Style::default()
        };
        let b = Style {
            margin: Prop::Value(2.0),
            font_size: Prop::Value(12.0),
            ..Style::default()
        };
        let c = Style {
            font_size: Prop::Inherit,
            border_width: Prop::Value(3.0),
            ..Style::default()
        };

        assert_eq!(a.overwrite(&b).overwrite(&c), a.overwrite(&b.overwrite(&c)));
    }

    #[test]
    fn test_changed_properties() {
        let before = Style::default();
        let after = Style {
            margin: Prop::Value(2.0),
            border_color: Color::RED.into(),
            ..Style::default()
        };

        assert_eq!(
            before.changed_properties(&after),
            vec![StyleProperty::Margin, StyleProperty::BorderColor]
        );
        assert!(after.is_set(StyleProperty::Margin));
        assert!(!after.is_set(StyleProperty::Padding));
    }

    #[test]
    fn test_style_from_toml() {
        let style: Style = toml::from_str(
            r##"
            background_color = "#ff0000"
            margin = 3.0
            "##,
        )
        .unwrap();

        assert_eq!(style.background_color, Prop::Value(Color::RED));
        assert_eq!(style.margin, Prop::Value(3.0));
        assert_eq!(style.padding, Prop::Unset);

        assert!(toml::from_str::<Style>("colour = \"#ff0000\"").is_err());
    }

    #[test]
    fn test_every_property_listed() {
        assert_eq!(StyleProperty::ALL.len(), 18);
        assert!(StyleProperty::Padding.affects_layout());
        assert!(!StyleProperty::FontSize.affects_layout());
    }
}
