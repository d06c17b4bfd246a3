//! Tree-walking layout driver.
//!
//! Measurement walks the tree bottom-up and stores each widget's content size.
//! Arrangement then walks top-down, positioning children inside the parent's
//! effective size and writing grid stickiness into the children's assigned
//! sizes before their own children are arranged.

use super::grid::{self, GridItem};
use super::pack::{self, PackItem};
use super::{LayoutKind, Placement, Size};
use crate::error::{UiError, UiResult};
use crate::widget::{MeasureContext, WidgetId, WidgetTree};

impl WidgetTree {
    /// Recomputes the geometry of `id` and its whole subtree.
    ///
    /// Running it twice without changes in between yields identical rectangles.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownWidget`] for unknown ids, and propagates
    /// measurement failures.
    pub fn compute_geometry(&mut self, id: WidgetId) -> UiResult<()> {
        let natural = self.measure(id)?;
        self.arrange(id)?;

        if id == self.root {
            self.geometry_stale = false;
        }
        tracing::trace!(?id, width = natural.width, height = natural.height, "geometry computed");
        Ok(())
    }

    /// Measures `id` and returns the size it asks its parent for.
    ///
    /// # Errors
    ///
    /// Same as [`WidgetTree::compute_geometry`].
    pub fn calculate_size(&mut self, id: WidgetId) -> UiResult<Size> {
        self.measure(id)
    }

    /// Returns true if geometry must be recomputed before it is read.
    #[must_use]
    pub const fn geometry_stale(&self) -> bool {
        self.geometry_stale
    }

    /// Bottom-up pass: stores content sizes and returns the natural size.
    fn measure(&mut self, id: WidgetId) -> UiResult<Size> {
        let placed: Vec<_> = self.node(id)?.placed_children().collect();

        let mut naturals = Vec::with_capacity(placed.len());
        for &(child, placement) in &placed {
            let natural = self.measure(child)?;
            let configured = self.node(child)?.size;
            naturals.push((placement, natural, configured));
        }

        let node = self.node(id)?;
        let from_children = match node.layout {
            LayoutKind::Absolute => Size::ZERO,
            LayoutKind::Pack => {
                let items: Vec<_> = naturals
                    .iter()
                    .filter_map(|(placement, size, _)| match placement {
                        Placement::Pack { anchor } => Some(PackItem {
                            anchor: *anchor,
                            size: *size,
                        }),
                        _ => None,
                    })
                    .collect();
                pack::measure(&items, node.params)
            }
            LayoutKind::Grid => {
                let items: Vec<_> = naturals
                    .iter()
                    .filter_map(|(placement, size, size_box)| match placement {
                        Placement::Grid(cell) => Some(GridItem {
                            cell: *cell,
                            size: *size,
                            configured: (
                                size_box.configured_width.is_some(),
                                size_box.configured_height.is_some(),
                            ),
                        }),
                        _ => None,
                    })
                    .collect();
                grid::measure(&items)
            }
        };

        let style = self.resting_style(id)?;
        let ctx = MeasureContext {
            text: self.text_measurer.as_deref(),
            images: self.image_source.as_deref(),
            style: &style,
            size: &node.size,
        };
        let leaf = node.widget.content_size(&ctx)?;
        let content = from_children
            .max(leaf)
            .max(Size::new(style.min_width, style.min_height));

        if content.width < 0.0 || content.height < 0.0 || content.width.is_nan() || content.height.is_nan() {
            return Err(UiError::NegativeSize {
                widget: id,
                width: content.width,
                height: content.height,
            });
        }

        let node = self.node_mut(id)?;
        node.size.content = content;
        Ok(node.size.natural())
    }

    /// Top-down pass: positions the children of `id` inside its effective size.
    fn arrange(&mut self, id: WidgetId) -> UiResult<()> {
        let node = self.node(id)?;
        let container = node.size.effective();
        let params = node.params;
        let layout = node.layout;
        let tracks = node.tracks.clone();
        let placed: Vec<_> = node.placed_children().collect();

        let mut entries = Vec::with_capacity(placed.len());
        for &(child, placement) in &placed {
            let size = self.node(child)?.size;
            entries.push((child, placement, size));
        }

        match layout {
            LayoutKind::Absolute => {
                for &(child, placement, _) in &entries {
                    if let Placement::Absolute { x, y } = placement {
                        self.assign(child, (x, y), None, None)?;
                    }
                }
            }
            LayoutKind::Pack => {
                let packed: Vec<_> = entries
                    .iter()
                    .filter_map(|&(child, placement, size)| match placement {
                        Placement::Pack { anchor } => Some((
                            child,
                            PackItem {
                                anchor,
                                size: size.natural(),
                            },
                        )),
                        _ => None,
                    })
                    .collect();
                let items: Vec<_> = packed.iter().map(|(_, item)| *item).collect();
                let positions = pack::arrange(&items, params, container);
                for ((child, _), position) in packed.iter().zip(positions) {
                    self.assign(*child, position, None, None)?;
                }
            }
            LayoutKind::Grid => {
                let cells: Vec<_> = entries
                    .iter()
                    .filter_map(|&(child, placement, size)| match placement {
                        Placement::Grid(cell) => Some((
                            child,
                            GridItem {
                                cell,
                                size: size.natural(),
                                configured: (size.configured_width.is_some(), size.configured_height.is_some()),
                            },
                        )),
                        _ => None,
                    })
                    .collect();
                let items: Vec<_> = cells.iter().map(|(_, item)| *item).collect();
                let layouts = grid::arrange(&items, &tracks, container);
                for ((child, _), cell) in cells.iter().zip(layouts) {
                    self.assign(*child, (cell.x, cell.y), cell.assigned_width, cell.assigned_height)?;
                }
            }
        }

        for (child, _, _) in entries {
            self.arrange(child)?;
        }
        Ok(())
    }

    fn assign(
        &mut self,
        id: WidgetId,
        position: (f32, f32),
        width: Option<f32>,
        height: Option<f32>,
    ) -> UiResult<()> {
        let node = self.node_mut(id)?;
        node.position = position;
        node.size.assigned_width = width.map(|w| w.max(0.0));
        node.size.assigned_height = height.map(|h| h.max(0.0));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::{Anchor, GridPlacement, LayoutKind, Rect, Size, Sticky};
    use crate::style::{Prop, Style};
    use crate::widget::{Frame, WidgetTree};

    fn sized_frame(tree: &mut WidgetTree, parent: crate::WidgetId, width: f32, height: f32) -> crate::WidgetId {
        let id = tree.create(parent, Frame).unwrap();
        tree.configure_size(id, Some(width), Some(height)).unwrap();
        id
    }

    #[test]
    fn test_pack_left_stacks_with_padding() {
        let mut tree = WidgetTree::new(200.0, 100.0);
        let root = tree.root();
        let row = tree
            .create_with_style(
                root,
                Frame,
                Style {
                    padding: Prop::Value(5.0),
                    ..Style::default()
                },
            )
            .unwrap();
        tree.place(row, 0.0, 0.0).unwrap();
        tree.set_layout(row, LayoutKind::Pack).unwrap();

        let children: Vec<_> = [10.0, 20.0, 30.0]
            .into_iter()
            .map(|width| {
                let id = sized_frame(&mut tree, row, width, 10.0);
                tree.pack(id, Anchor::Left).unwrap();
                id
            })
            .collect();

        tree.compute_geometry(root).unwrap();

        let xs: Vec<_> = children.iter().map(|&id| tree.rect(id).unwrap().x).collect();
        assert_eq!(xs, vec![0.0, 15.0, 40.0]);
        assert_eq!(tree.size(row), Some(Size::new(70.0, 10.0)));
    }

    #[test]
    fn test_unconfigured_parent_collapses_to_grid_minimums() {
        let mut tree = WidgetTree::new(200.0, 100.0);
        let root = tree.root();
        let grid = tree.create(root, Frame).unwrap();
        tree.set_layout(grid, LayoutKind::Grid).unwrap();
        tree.place(grid, 5.0, 5.0).unwrap();

        let a = sized_frame(&mut tree, grid, 30.0, 10.0);
        let b = sized_frame(&mut tree, grid, 20.0, 15.0);
        tree.grid(a, GridPlacement::new(0, 0)).unwrap();
        tree.grid(b, GridPlacement::new(1, 1)).unwrap();

        tree.compute_geometry(root).unwrap();

        assert_eq!(tree.rect(grid), Some(Rect::new(5.0, 5.0, 50.0, 25.0)));
        assert_eq!(tree.rect(b), Some(Rect::new(30.0, 10.0, 20.0, 15.0)));
        assert!(!tree.geometry_stale());
    }

    #[test]
    fn test_sticky_assignment_reaches_grandchildren() {
        let mut tree = WidgetTree::new(100.0, 100.0);
        let root = tree.root();
        tree.set_layout(root, LayoutKind::Grid).unwrap();
        tree.grid_row_configure(root, 0, 1.0).unwrap();
        tree.grid_column_configure(root, 0, 1.0).unwrap();

        let panel = tree.create(root, Frame).unwrap();
        tree.set_layout(panel, LayoutKind::Pack).unwrap();
        tree.grid(panel, GridPlacement::new(0, 0).sticky(Sticky::ALL)).unwrap();
        let bottom = sized_frame(&mut tree, panel, 10.0, 10.0);
        tree.pack(bottom, Anchor::Bottom).unwrap();

        tree.compute_geometry(root).unwrap();

        assert_eq!(tree.rect(panel), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(tree.rect(bottom), Some(Rect::new(45.0, 90.0, 10.0, 10.0)));

        let first: Vec<_> = tree.iter_dfs().map(|id| tree.rect(id)).collect();
        tree.compute_geometry(root).unwrap();
        let second: Vec<_> = tree.iter_dfs().map(|id| tree.rect(id)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_style_minimum_raises_content() {
        let mut tree = WidgetTree::new(100.0, 100.0);
        let root = tree.root();
        let frame = tree
            .create_with_style(
                root,
                Frame,
                Style {
                    min_width: Prop::Value(12.0),
                    ..Style::default()
                },
            )
            .unwrap();
        tree.place(frame, 0.0, 0.0).unwrap();

        assert_eq!(tree.calculate_size(frame).unwrap(), Size::new(12.0, 0.0));
    }
}
