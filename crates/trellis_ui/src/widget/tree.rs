//! Widget tree for hierarchical UI management.
//!
//! The tree is an arena keyed by [`WidgetId`]. A parent owns its children through
//! its child list; children only keep their parent's id, so the structure stays
//! acyclic by construction and re-parenting is checked explicitly.

use std::collections::HashMap;

use super::{
    ChildEntry, ImageSource, Interaction, Notification, NotifyEvent, NotifyInfo, Root, TextMeasurer, Widget,
    WidgetId, WidgetNode,
};
use crate::error::{UiError, UiResult};
use crate::layout::{Anchor, GridPlacement, LayoutKind, LayoutParams, Placement, Rect, Size};
use crate::style::{pick, EffectiveStyle, Style, StyleEdit, StyleLayer, Theme};

/// Manages the widget hierarchy.
pub struct WidgetTree {
    /// Widget nodes indexed by ID.
    pub(crate) widgets: HashMap<WidgetId, WidgetNode>,
    /// The root surface.
    pub(crate) root: WidgetId,
    /// ID counter for generating unique IDs.
    next_id: u64,
    /// Theme defaults per widget category.
    pub(crate) theme: Theme,
    pub(crate) text_measurer: Option<Box<dyn TextMeasurer>>,
    pub(crate) image_source: Option<Box<dyn ImageSource>>,
    /// Style edits waiting for the next frame boundary.
    pub(crate) pending_edits: Vec<StyleEdit>,
    /// Notifications waiting to be drained by the application.
    pub(crate) notifications: Vec<Notification>,
    /// Set when geometry must be recomputed before the next hit test.
    pub(crate) geometry_stale: bool,
    /// Number of completed frames.
    pub(crate) frame: u64,
}

impl WidgetTree {
    /// Creates a tree whose root surface has the given size, using the default theme.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_theme(width, height, Theme::default())
    }

    /// Creates a tree whose root surface has the given size and theme.
    #[must_use]
    pub fn with_theme(width: f32, height: f32, theme: Theme) -> Self {
        let root = WidgetId::new(0);
        let mut node = WidgetNode::new(root, None, Box::new(Root));
        node.size.configured_width = Some(width.max(0.0));
        node.size.configured_height = Some(height.max(0.0));

        let mut tree = Self {
            widgets: HashMap::with_capacity(256),
            root,
            next_id: 1,
            theme,
            text_measurer: None,
            image_source: None,
            pending_edits: Vec::new(),
            notifications: Vec::new(),
            geometry_stale: true,
            frame: 0,
        };
        tree.widgets.insert(root, node);
        tree.mirror_layout_params(root);
        tree
    }

    /// Generates a new unique widget ID.
    fn next_id(&mut self) -> WidgetId {
        let id = WidgetId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// The root surface.
    #[must_use]
    pub const fn root(&self) -> WidgetId {
        self.root
    }

    /// Number of live widgets, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Always false: the root can't be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Returns true if the widget exists.
    #[must_use]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(&id)
    }

    /// Gets a widget by ID.
    #[must_use]
    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.widgets.get(&id)
    }

    pub(crate) fn node(&self, id: WidgetId) -> UiResult<&WidgetNode> {
        self.widgets.get(&id).ok_or(UiError::UnknownWidget(id))
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> UiResult<&mut WidgetNode> {
        self.widgets.get_mut(&id).ok_or(UiError::UnknownWidget(id))
    }

    /// Returns the children of a widget, placed or not, in paint order.
    #[must_use]
    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.get(id)
            .map(|node| node.children.iter().map(|entry| entry.id).collect())
            .unwrap_or_default()
    }

    /// Returns the parent of a widget.
    #[must_use]
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.get(id).and_then(WidgetNode::parent)
    }

    /// Theme in use.
    #[must_use]
    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Installs the text measurement provider.
    pub fn set_text_measurer(&mut self, measurer: impl TextMeasurer + 'static) {
        self.text_measurer = Some(Box::new(measurer));
        self.geometry_stale = true;
    }

    /// Installs the image metadata provider.
    pub fn set_image_source(&mut self, source: impl ImageSource + 'static) {
        self.image_source = Some(Box::new(source));
        self.geometry_stale = true;
    }

    /// Creates a widget under `parent`. The widget is owned by the parent but not
    /// laid out, drawn or hit until it is placed.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] if the parent doesn't exist.
    pub fn create(&mut self, parent: WidgetId, widget: impl Widget + 'static) -> UiResult<WidgetId> {
        self.create_with_style(parent, widget, Style::default())
    }

    /// Creates a widget with an initial base style.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] if the parent doesn't exist.
    pub fn create_with_style(
        &mut self,
        parent: WidgetId,
        widget: impl Widget + 'static,
        base: Style,
    ) -> UiResult<WidgetId> {
        self.node(parent)?;

        let id = self.next_id();
        let mut node = WidgetNode::new(id, Some(parent), Box::new(widget));
        node.styles.base = StyleLayer::new(base);
        self.widgets.insert(id, node);
        self.node_mut(parent)?.children.push(ChildEntry { id, placement: None });
        self.mirror_layout_params(id);

        tracing::trace!(?id, ?parent, "widget created");
        Ok(id)
    }

    /// Replaces the leaf behaviour of a widget, keeping its place and styles.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] if the widget doesn't exist.
    pub fn replace_widget(&mut self, id: WidgetId, widget: impl Widget + 'static) -> UiResult<()> {
        self.node_mut(id)?.widget = Box::new(widget);
        self.mirror_layout_params(id);
        self.geometry_stale = true;
        Ok(())
    }

    /// Removes a widget and all its children, detaching it from its parent.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::RootPlacement`] for the root and
    /// [`UiError::UnknownWidget`] for unknown ids.
    pub fn remove(&mut self, id: WidgetId) -> UiResult<()> {
        if id == self.root {
            return Err(UiError::RootPlacement);
        }
        let parent = self.node(id)?.parent;

        if let Some(siblings) = parent.and_then(|p| self.widgets.get_mut(&p)) {
            siblings.children.retain(|entry| entry.id != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.widgets.remove(&current) {
                stack.extend(node.children.iter().map(|entry| entry.id));
            }
        }

        self.geometry_stale = true;
        tracing::trace!(?id, "widget removed");
        Ok(())
    }

    /// Sets the layout kind of a container.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::LayoutHasChildren`] if placed children exist and the kind
    /// would change; the tree is left untouched.
    pub fn set_layout(&mut self, id: WidgetId, kind: LayoutKind) -> UiResult<()> {
        let node = self.node_mut(id)?;
        if node.layout == kind {
            return Ok(());
        }

        let placed = node.placed_children().count();
        if placed > 0 {
            tracing::warn!(?id, ?kind, placed, "refusing to change layout with children present");
            return Err(UiError::LayoutHasChildren {
                widget: id,
                children: placed,
            });
        }

        node.layout = kind;
        self.geometry_stale = true;
        Ok(())
    }

    /// Places (or re-places) `child` into `parent`.
    ///
    /// If `child` currently belongs to another parent it is moved. The placement
    /// must match the parent's layout kind and a grid cell may hold one child.
    ///
    /// # Errors
    ///
    /// Configuration errors leave the tree unchanged:
    /// [`UiError::PlacementMismatch`], [`UiError::DuplicateGridCell`],
    /// [`UiError::CyclicHierarchy`], [`UiError::RootPlacement`] and
    /// [`UiError::UnknownWidget`].
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId, placement: Placement) -> UiResult<()> {
        if child == self.root {
            return Err(UiError::RootPlacement);
        }
        self.node(child)?;
        let parent_node = self.node(parent)?;

        if parent_node.layout != placement.kind() {
            tracing::warn!(?parent, ?child, "placement doesn't match the parent's layout");
            return Err(UiError::PlacementMismatch {
                attempted: placement.kind(),
                actual: parent_node.layout,
            });
        }

        if let Placement::Grid(cell) = placement {
            let occupant = parent_node.children.iter().find(|entry| {
                entry.id != child
                    && matches!(entry.placement, Some(Placement::Grid(other))
                        if other.row == cell.row && other.column == cell.column)
            });
            if let Some(occupant) = occupant {
                tracing::warn!(?parent, ?child, row = cell.row, column = cell.column, "grid cell taken");
                return Err(UiError::DuplicateGridCell {
                    row: cell.row,
                    column: cell.column,
                    occupant: occupant.id,
                });
            }
        }

        if self.is_ancestor(child, parent) {
            return Err(UiError::CyclicHierarchy { parent, child });
        }

        let previous = self.node(child)?.parent;
        if previous != Some(parent) {
            if let Some(old) = previous.and_then(|p| self.widgets.get_mut(&p)) {
                old.children.retain(|entry| entry.id != child);
            }
            self.node_mut(parent)?.children.push(ChildEntry { id: child, placement: None });
            self.node_mut(child)?.parent = Some(parent);
        }

        let parent_node = self.node_mut(parent)?;
        if let Some(entry) = parent_node.children.iter_mut().find(|entry| entry.id == child) {
            entry.placement = Some(placement);
        }

        self.geometry_stale = true;
        Ok(())
    }

    /// Returns true if `ancestor` is `id` or one of its ancestors.
    fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(widget) = current {
            if widget == ancestor {
                return true;
            }
            current = self.parent(widget);
        }
        false
    }

    fn parent_for_placement(&self, id: WidgetId) -> UiResult<WidgetId> {
        self.node(id)?.parent.ok_or(UiError::RootPlacement)
    }

    /// Places a widget at fixed coordinates in its parent.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::PlacementMismatch`] unless the parent uses
    /// [`LayoutKind::Absolute`].
    pub fn place(&mut self, id: WidgetId, x: f32, y: f32) -> UiResult<()> {
        let parent = self.parent_for_placement(id)?;
        self.add_child(parent, id, Placement::Absolute { x, y })
    }

    /// Packs a widget against an edge of its parent.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::PlacementMismatch`] unless the parent uses
    /// [`LayoutKind::Pack`].
    pub fn pack(&mut self, id: WidgetId, anchor: Anchor) -> UiResult<()> {
        let parent = self.parent_for_placement(id)?;
        self.add_child(parent, id, Placement::Pack { anchor })
    }

    /// Puts a widget in a grid cell of its parent.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::PlacementMismatch`] unless the parent uses
    /// [`LayoutKind::Grid`], and [`UiError::DuplicateGridCell`] if the cell is
    /// taken.
    pub fn grid(&mut self, id: WidgetId, cell: GridPlacement) -> UiResult<()> {
        let parent = self.parent_for_placement(id)?;
        self.add_child(parent, id, Placement::Grid(cell))
    }

    /// Sets the growth weight of a grid row.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`] for negative or non-finite weights.
    pub fn grid_row_configure(&mut self, id: WidgetId, row: usize, weight: f32) -> UiResult<()> {
        check_weight(weight)?;
        self.node_mut(id)?.tracks.set_row_weight(row, weight);
        self.geometry_stale = true;
        Ok(())
    }

    /// Sets the growth weight of a grid column.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`] for negative or non-finite weights.
    pub fn grid_column_configure(&mut self, id: WidgetId, column: usize, weight: f32) -> UiResult<()> {
        check_weight(weight)?;
        self.node_mut(id)?.tracks.set_column_weight(column, weight);
        self.geometry_stale = true;
        Ok(())
    }

    /// Explicitly configures the size of a widget. `None` leaves the dimension
    /// to the layout.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NegativeDimension`] for negative values.
    pub fn configure_size(&mut self, id: WidgetId, width: Option<f32>, height: Option<f32>) -> UiResult<()> {
        check_dimension(id, "width", width)?;
        check_dimension(id, "height", height)?;

        let node = self.node_mut(id)?;
        node.size.configured_width = width;
        node.size.configured_height = height;
        self.geometry_stale = true;
        Ok(())
    }

    /// Sets the minimum content size of a widget.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::NegativeDimension`] for negative values.
    pub fn configure_min_size(&mut self, id: WidgetId, min_width: f32, min_height: f32) -> UiResult<()> {
        check_dimension(id, "min width", Some(min_width))?;
        check_dimension(id, "min height", Some(min_height))?;

        let node = self.node_mut(id)?;
        node.size.min_width = min_width;
        node.size.min_height = min_height;
        self.geometry_stale = true;
        Ok(())
    }

    /// Resizes the root surface.
    pub fn resize(&mut self, width: f32, height: f32) {
        let root = self.root;
        if let Some(node) = self.widgets.get_mut(&root) {
            node.size.configured_width = Some(width.max(0.0));
            node.size.configured_height = Some(height.max(0.0));
        }
        self.geometry_stale = true;
    }

    /// Sets a widget's position relative to its parent. Used by solvers.
    pub fn set_position(&mut self, id: WidgetId, x: f32, y: f32) {
        match self.widgets.get_mut(&id) {
            Some(node) => node.position = (x, y),
            None => tracing::debug!(?id, "set_position on unknown widget"),
        }
    }

    /// Assigns a size to a widget. Used by solvers; a configured size still wins.
    pub fn set_size(&mut self, id: WidgetId, width: f32, height: f32) {
        match self.widgets.get_mut(&id) {
            Some(node) => {
                node.size.assigned_width = Some(width.max(0.0));
                node.size.assigned_height = Some(height.max(0.0));
            }
            None => tracing::debug!(?id, "set_size on unknown widget"),
        }
    }

    /// Rectangle of a widget relative to its parent.
    #[must_use]
    pub fn rect(&self, id: WidgetId) -> Option<Rect> {
        self.get(id).map(WidgetNode::rect)
    }

    /// Rectangle of a widget in surface coordinates.
    #[must_use]
    pub fn absolute_rect(&self, id: WidgetId) -> Option<Rect> {
        let mut rect = self.rect(id)?;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            let (x, y) = self.get(parent)?.position;
            rect = rect.translate(x, y);
            current = self.parent(parent);
        }
        Some(rect)
    }

    /// Effective size of a widget.
    #[must_use]
    pub fn size(&self, id: WidgetId) -> Option<Size> {
        self.get(id).map(|node| node.size.effective())
    }

    /// Interaction state of a widget.
    #[must_use]
    pub fn interaction(&self, id: WidgetId) -> Option<Interaction> {
        self.get(id).map(WidgetNode::interaction)
    }

    /// Style resolved for a widget during the last frame.
    #[must_use]
    pub fn effective_style(&self, id: WidgetId) -> Option<&EffectiveStyle> {
        self.get(id).map(WidgetNode::effective_style)
    }

    /// Delivers a notification to a widget.
    ///
    /// Interaction events switch the widget's state, theme reloads and style
    /// changes refresh the mirrored layout parameters. Every notification is
    /// queued for [`WidgetTree::take_notifications`].
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] if the widget doesn't exist.
    pub fn notify(&mut self, id: WidgetId, event: NotifyEvent, info: NotifyInfo) -> UiResult<()> {
        let node = self.node_mut(id)?;
        match event {
            NotifyEvent::SetHover => node.interaction = Interaction::Hovered,
            NotifyEvent::SetActive => node.interaction = Interaction::Active,
            NotifyEvent::SetNormal => node.interaction = Interaction::Normal,
            NotifyEvent::ThemeReload => self.mirror_layout_params(id),
            NotifyEvent::StylePropertyChange => {
                if matches!(info, NotifyInfo::Property(property) if property.affects_layout()) {
                    self.mirror_layout_params(id);
                }
            }
        }

        self.notifications.push(Notification { widget: id, event, info });
        Ok(())
    }

    /// Drains queued notifications in delivery order.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Copies margin and padding from the base style (falling back to the theme)
    /// into the layout parameters.
    pub(crate) fn mirror_layout_params(&mut self, id: WidgetId) {
        let Some(node) = self.widgets.get(&id) else {
            return;
        };
        let theme = self.theme.style_for(node.kind());
        let base = &node.styles.base.style;
        let params = LayoutParams {
            margin: pick(base.margin, theme.margin, 0.0),
            padding: pick(base.padding, theme.padding, 0.0),
        };

        if let Some(node) = self.widgets.get_mut(&id) {
            if node.params != params {
                node.params = params;
                self.geometry_stale = true;
            }
        }
    }

    /// Returns all widget IDs in depth-first paint order, unplaced widgets included.
    pub fn iter_dfs(&self) -> impl Iterator<Item = WidgetId> + '_ {
        WidgetDfsIterator {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Returns all widget IDs in reverse depth-first order.
    pub fn iter_reverse(&self) -> impl Iterator<Item = WidgetId> + '_ {
        let all: Vec<_> = self.iter_dfs().collect();
        all.into_iter().rev()
    }
}

fn check_weight(weight: f32) -> UiResult<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(UiError::InvalidConfig(format!("grid weight must be >= 0, got {weight}")))
    }
}

fn check_dimension(widget: WidgetId, axis: &'static str, value: Option<f32>) -> UiResult<()> {
    match value {
        Some(value) if value < 0.0 || value.is_nan() => Err(UiError::NegativeDimension { widget, axis, value }),
        _ => Ok(()),
    }
}

/// Depth-first iterator over widget tree.
struct WidgetDfsIterator<'a> {
    tree: &'a WidgetTree,
    stack: Vec<WidgetId>,
}

impl Iterator for WidgetDfsIterator<'_> {
    type Item = WidgetId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        // Push children in reverse order so they're processed left-to-right
        if let Some(node) = self.tree.widgets.get(&id) {
            for entry in node.children.iter().rev() {
                self.stack.push(entry.id);
            }
        }

        Some(id)
    }
}
