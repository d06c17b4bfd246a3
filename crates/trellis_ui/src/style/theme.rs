//! Themes: default styles per widget category.

use std::path::Path;

use serde::Deserialize;

use super::{Color, Prop, Style};
use crate::error::{UiError, UiResult};
use crate::widget::WidgetKind;

/// Default style for every widget category.
///
/// A theme file only sets what it names. Categories it leaves out stay empty
/// rather than falling back to the built-in [`Theme::dark`] preset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    /// Theme name, for logs.
    #[serde(default)]
    pub name: String,
    /// Root surface defaults.
    #[serde(default)]
    pub root: Style,
    /// Frame defaults.
    #[serde(default)]
    pub frame: Style,
    /// Label defaults.
    #[serde(default)]
    pub label: Style,
    /// Button defaults.
    #[serde(default)]
    pub button: Style,
    /// Entry defaults.
    #[serde(default)]
    pub entry: Style,
    /// Image defaults.
    #[serde(default)]
    pub image: Style,
}

impl Theme {
    /// Returns the default style of a widget category.
    #[must_use]
    pub const fn style_for(&self, kind: WidgetKind) -> &Style {
        match kind {
            WidgetKind::Root => &self.root,
            WidgetKind::Frame => &self.frame,
            WidgetKind::Label => &self.label,
            WidgetKind::Button => &self.button,
            WidgetKind::Entry => &self.entry,
            WidgetKind::Image => &self.image,
        }
    }

    /// Parses a theme from TOML. Missing categories are empty.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`] on malformed input, unknown keys or
    /// bad colors.
    pub fn from_toml_str(text: &str) -> UiResult<Self> {
        toml::from_str(text).map_err(|e| UiError::InvalidConfig(e.to_string()))
    }

    /// Loads a theme file.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`] if the file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> UiResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| UiError::InvalidConfig(format!("{}: {e}", path.display())))?;
        let theme = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), theme = %theme.name, "theme loaded");
        Ok(theme)
    }

    /// The built-in dark preset.
    #[must_use]
    pub fn dark() -> Self {
        let text = Color::hex(0xE0E0_E0FF);
        Self {
            name: "default".to_string(),
            root: Style {
                background_color: Prop::Value(Color::hex(0x1A1A_1AFF)),
                ..Style::default()
            },
            frame: Style {
                background_color: Prop::Value(Color::hex(0x2A2A_2AFF)),
                ..Style::default()
            },
            label: Style {
                color: Prop::Value(text),
                background_color: Prop::Value(Color::TRANSPARENT),
                font_size: Prop::Value(14.0),
                ..Style::default()
            },
            button: Style {
                color: Prop::Value(text),
                background_color: Prop::Value(Color::hex(0x3C3C_3CFF)),
                border_radius: Prop::Value(4.0),
                ..Style::default()
            },
            entry: Style {
                background_color: Prop::Value(Color::hex(0x1F1F_1FFF)),
                border_width: Prop::Value(1.0),
                border_color: Prop::Value(Color::hex(0x4A4A_4AFF)),
                ..Style::default()
            },
            image: Style::default(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
