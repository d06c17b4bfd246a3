//! Style resolution and deferred style edits.

use std::fmt;

use super::{CornerRadii, EffectiveStyle, Prop, Style, StyleLayerKind, StyleProperty, StyleSet, Theme};
use crate::error::UiResult;
use crate::widget::{Interaction, NotifyEvent, NotifyInfo, SizeBox, WidgetId, WidgetTree};

/// Callback run after a style layer changed, with the changed properties and the
/// layer's new style.
pub type StyleObserver = Box<dyn FnMut(WidgetId, &[StyleProperty], &Style)>;

/// A queued mutation of one style layer.
pub struct StyleEdit {
    widget: WidgetId,
    layer: StyleLayerKind,
    edit: Box<dyn FnOnce(&mut Style)>,
}

impl fmt::Debug for StyleEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleEdit")
            .field("widget", &self.widget)
            .field("layer", &self.layer)
            .finish_non_exhaustive()
    }
}

/// Picks the winning value of a property: the merged layers, then the theme
/// default, then the baseline. `Inherit` skips straight to the theme.
pub(crate) fn pick<T: Copy>(merged: Prop<T>, theme: Prop<T>, baseline: T) -> T {
    match merged {
        Prop::Value(value) => value,
        Prop::Inherit | Prop::Unset => theme.value().unwrap_or(baseline),
    }
}

/// Like [`pick`], but without a baseline.
fn pick_opt<T: Copy>(merged: Prop<T>, theme: Prop<T>) -> Option<T> {
    match merged {
        Prop::Value(value) => Some(value),
        Prop::Inherit | Prop::Unset => theme.value(),
    }
}

/// Resolves a widget's effective style.
///
/// The base layer always applies; the hover layer only while hovered and the
/// active layer only while active. Explicitly configured dimensions override the
/// style's width and height.
#[must_use]
pub fn resolve(styles: &StyleSet, state: Interaction, theme: &Style, size: &SizeBox) -> EffectiveStyle {
    let merged = match state {
        Interaction::Normal => styles.base.style.clone(),
        Interaction::Hovered => styles.base.style.overwrite(&styles.hover.style),
        Interaction::Active => styles.base.style.overwrite(&styles.active.style),
    };
    let baseline = EffectiveStyle::BASELINE;

    let radius = pick(merged.border_radius, theme.border_radius, 0.0);
    let top = pick_opt(merged.border_top_radius, theme.border_top_radius).unwrap_or(radius);
    let bottom = pick_opt(merged.border_bottom_radius, theme.border_bottom_radius).unwrap_or(radius);
    let radii = CornerRadii {
        top_left: pick_opt(merged.border_top_left_radius, theme.border_top_left_radius).unwrap_or(top),
        top_right: pick_opt(merged.border_top_right_radius, theme.border_top_right_radius).unwrap_or(top),
        bottom_left: pick_opt(merged.border_bottom_left_radius, theme.border_bottom_left_radius).unwrap_or(bottom),
        bottom_right: pick_opt(merged.border_bottom_right_radius, theme.border_bottom_right_radius)
            .unwrap_or(bottom),
    };

    EffectiveStyle {
        width: size.configured_width.or(pick_opt(merged.width, theme.width)),
        height: size.configured_height.or(pick_opt(merged.height, theme.height)),
        min_width: pick(merged.min_width, theme.min_width, baseline.min_width),
        min_height: pick(merged.min_height, theme.min_height, baseline.min_height),
        color: pick(merged.color, theme.color, baseline.color),
        background_color: pick(merged.background_color, theme.background_color, baseline.background_color),
        margin: pick(merged.margin, theme.margin, baseline.margin),
        padding: pick(merged.padding, theme.padding, baseline.padding),
        radii,
        border_width: pick(merged.border_width, theme.border_width, baseline.border_width),
        border_color: pick(merged.border_color, theme.border_color, baseline.border_color),
        font_size: pick(merged.font_size, theme.font_size, baseline.font_size),
    }
}

impl WidgetTree {
    /// Resolves the style of a widget for its current interaction state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::UnknownWidget`] if the widget doesn't exist.
    pub fn resolve_style(&self, id: WidgetId) -> UiResult<EffectiveStyle> {
        let node = self.node(id)?;
        Ok(resolve(
            &node.styles,
            node.interaction,
            self.theme.style_for(node.kind()),
            &node.size,
        ))
    }

    /// Resolves the style of a widget as if it were at rest. Used for measuring.
    pub(crate) fn resting_style(&self, id: WidgetId) -> UiResult<EffectiveStyle> {
        let node = self.node(id)?;
        Ok(resolve(
            &node.styles,
            Interaction::Normal,
            self.theme.style_for(node.kind()),
            &node.size,
        ))
    }

    /// Queues an edit of one style layer. Edits are applied in order at the next
    /// frame boundary or by [`WidgetTree::apply_style_edits`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::UnknownWidget`] if the widget doesn't exist.
    pub fn edit_style(
        &mut self,
        id: WidgetId,
        layer: StyleLayerKind,
        edit: impl FnOnce(&mut Style) + 'static,
    ) -> UiResult<()> {
        self.node(id)?;
        self.pending_edits.push(StyleEdit {
            widget: id,
            layer,
            edit: Box::new(edit),
        });
        Ok(())
    }

    /// Registers an observer on one style layer of a widget.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::UnknownWidget`] if the widget doesn't exist.
    pub fn observe_style(
        &mut self,
        id: WidgetId,
        layer: StyleLayerKind,
        observer: impl FnMut(WidgetId, &[StyleProperty], &Style) + 'static,
    ) -> UiResult<()> {
        self.node_mut(id)?
            .styles
            .layer_mut(layer)
            .observers
            .push(Box::new(observer));
        Ok(())
    }

    /// Number of queued style edits.
    #[must_use]
    pub fn pending_style_edits(&self) -> usize {
        self.pending_edits.len()
    }

    /// Applies every queued style edit in submission order.
    ///
    /// For each edit the changed properties are reported to the layer's
    /// observers and delivered as [`NotifyEvent::StylePropertyChange`]
    /// notifications. Edits of removed widgets are dropped. Returns the number
    /// of edits applied.
    ///
    /// # Errors
    ///
    /// Propagates notification failures.
    pub fn apply_style_edits(&mut self) -> UiResult<usize> {
        let edits = std::mem::take(&mut self.pending_edits);
        let mut applied = 0;

        for StyleEdit { widget, layer, edit } in edits {
            let Some(node) = self.widgets.get_mut(&widget) else {
                tracing::debug!(?widget, "dropping style edit for removed widget");
                continue;
            };

            let target = node.styles.layer_mut(layer);
            let before = target.style.clone();
            edit(&mut target.style);
            let changed = before.changed_properties(&target.style);
            applied += 1;

            if changed.is_empty() {
                continue;
            }
            for observer in &mut target.observers {
                observer(widget, &changed, &target.style);
            }

            tracing::trace!(?widget, ?layer, ?changed, "style edited");
            for property in changed {
                self.notify(widget, NotifyEvent::StylePropertyChange, NotifyInfo::Property(property))?;
            }
        }

        Ok(applied)
    }

    /// Replaces the theme and notifies every widget.
    ///
    /// # Errors
    ///
    /// Propagates notification failures.
    pub fn reload_theme(&mut self, theme: Theme) -> UiResult<()> {
        tracing::info!(theme = %theme.name, "reloading theme");
        self.theme = theme;
        let ids: Vec<_> = self.iter_dfs().collect();
        for id in ids {
            self.notify(id, NotifyEvent::ThemeReload, NotifyInfo::None)?;
        }
        self.geometry_stale = true;
        Ok(())
    }

    /// Resolves every widget into its cached effective style.
    pub(crate) fn resolve_all(&mut self) {
        let theme = &self.theme;
        for node in self.widgets.values_mut() {
            node.effective = resolve(&node.styles, node.interaction, theme.style_for(node.kind()), &node.size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, StyleLayer};

    fn styles(base: Style, hover: Style, active: Style) -> StyleSet {
        StyleSet {
            base: StyleLayer::new(base),
            hover: StyleLayer::new(hover),
            active: StyleLayer::new(active),
        }
    }

    fn colored(color: Color) -> Style {
        Style {
            background_color: Prop::Value(color),
            ..Style::default()
        }
    }

    #[test]
    fn test_layers_follow_interaction() {
        let set = styles(colored(Color::RED), colored(Color::BLUE), Style::default());
        let theme = Style::default();
        let size = SizeBox::default();

        let normal = resolve(&set, Interaction::Normal, &theme, &size);
        let hovered = resolve(&set, Interaction::Hovered, &theme, &size);
        let active = resolve(&set, Interaction::Active, &theme, &size);

        assert_eq!(normal.background_color, Color::RED);
        assert_eq!(hovered.background_color, Color::BLUE);
        // active never sees the hover layer
        assert_eq!(active.background_color, Color::RED);
    }

    #[test]
    fn test_inherit_selects_theme_default() {
        let hover = Style {
            background_color: Prop::Inherit,
            ..Style::default()
        };
        let set = styles(colored(Color::RED), hover, Style::default());
        let theme = colored(Color::WHITE);

        let hovered = resolve(&set, Interaction::Hovered, &theme, &SizeBox::default());
        assert_eq!(hovered.background_color, Color::WHITE);

        let bare = resolve(&StyleSet::default(), Interaction::Normal, &Style::default(), &SizeBox::default());
        assert_eq!(bare, EffectiveStyle::BASELINE);
    }

    #[test]
    fn test_corner_radius_precedence() {
        let base = Style {
            border_radius: Prop::Value(2.0),
            border_top_radius: Prop::Value(4.0),
            border_bottom_right_radius: Prop::Value(8.0),
            ..Style::default()
        };
        let set = styles(base, Style::default(), Style::default());

        let radii = resolve(&set, Interaction::Normal, &Style::default(), &SizeBox::default()).radii;

        assert_eq!(radii.top_left, 4.0);
        assert_eq!(radii.top_right, 4.0);
        assert_eq!(radii.bottom_left, 2.0);
        assert_eq!(radii.bottom_right, 8.0);
    }

    #[test]
    fn test_configured_size_overrides_style() {
        let base = Style {
            width: Prop::Value(10.0),
            height: Prop::Value(10.0),
            ..Style::default()
        };
        let set = styles(base, Style::default(), Style::default());
        let size = SizeBox {
            configured_width: Some(30.0),
            ..SizeBox::default()
        };

        let resolved = resolve(&set, Interaction::Normal, &Style::default(), &size);
        assert_eq!(resolved.width, Some(30.0));
        assert_eq!(resolved.height, Some(10.0));
    }
}
