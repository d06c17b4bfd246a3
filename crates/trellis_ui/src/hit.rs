//! Hit testing and interaction state.
//!
//! Once per frame the pointer is tested top-down from the root. Inside each
//! container the placed children are tested in reverse paint order so the
//! topmost one wins. The widgets on the resulting path become hovered (or
//! active while the primary button is held); everything else rests.

use crate::error::UiResult;
use crate::widget::{Interaction, NotifyEvent, NotifyInfo, WidgetId, WidgetTree};

impl WidgetTree {
    /// Returns the root-to-leaf path of widgets under a surface point.
    ///
    /// The path is empty when the point lies outside the surface.
    #[must_use]
    pub fn hit_path(&self, x: f32, y: f32) -> Vec<WidgetId> {
        let mut path = Vec::new();
        let Some(root) = self.get(self.root) else {
            return path;
        };
        if !root.rect().contains(x, y) {
            return path;
        }

        path.push(self.root);
        let (mut local_x, mut local_y) = (x - root.position.0, y - root.position.1);
        let mut current = root;

        loop {
            let hit = current
                .children
                .iter()
                .rev()
                .filter(|entry| entry.placement.is_some())
                .filter_map(|entry| self.get(entry.id))
                .find(|child| child.rect().contains(local_x, local_y));

            let Some(child) = hit else {
                break;
            };
            path.push(child.id);
            local_x -= child.position.0;
            local_y -= child.position.1;
            current = child;
        }

        path
    }

    /// Updates interaction states from the pointer and returns the deepest hit
    /// widget.
    ///
    /// Every state change is delivered through [`WidgetTree::notify`] with the
    /// pointer in the widget's local coordinates.
    ///
    /// # Errors
    ///
    /// Propagates notification failures.
    pub fn update_interaction(&mut self, x: f32, y: f32, primary_down: bool) -> UiResult<Option<WidgetId>> {
        let path = self.hit_path(x, y);
        let engaged = if primary_down {
            Interaction::Active
        } else {
            Interaction::Hovered
        };

        let mut changes = Vec::new();
        let mut stack = vec![(self.root, (0.0_f32, 0.0_f32))];
        while let Some((id, parent_origin)) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            let origin = (parent_origin.0 + node.position.0, parent_origin.1 + node.position.1);
            let wanted = if path.contains(&id) {
                engaged
            } else {
                Interaction::Normal
            };
            if node.interaction != wanted {
                changes.push((id, wanted, (x - origin.0, y - origin.1)));
            }
            stack.extend(node.children.iter().map(|entry| (entry.id, origin)));
        }

        for (id, state, (local_x, local_y)) in changes {
            let event = match state {
                Interaction::Normal => NotifyEvent::SetNormal,
                Interaction::Hovered => NotifyEvent::SetHover,
                Interaction::Active => NotifyEvent::SetActive,
            };
            tracing::debug!(?id, ?state, "interaction changed");
            self.notify(id, event, NotifyInfo::Pointer { x: local_x, y: local_y })?;
        }

        Ok(path.last().copied())
    }
}

#[cfg(test)]
mod tests {
    use crate::widget::{Frame, Interaction, NotifyEvent, NotifyInfo, WidgetTree};

    fn overlapping() -> (WidgetTree, crate::WidgetId, crate::WidgetId) {
        let mut tree = WidgetTree::new(100.0, 100.0);
        let root = tree.root();
        let below = tree.create(root, Frame).unwrap();
        let above = tree.create(root, Frame).unwrap();
        for (id, x) in [(below, 10.0), (above, 30.0)] {
            tree.configure_size(id, Some(40.0), Some(40.0)).unwrap();
            tree.place(id, x, 10.0).unwrap();
        }
        tree.compute_geometry(root).unwrap();
        (tree, below, above)
    }

    #[test]
    fn test_topmost_child_wins() {
        let (tree, below, above) = overlapping();

        assert_eq!(tree.hit_path(35.0, 20.0), vec![tree.root(), above]);
        assert_eq!(tree.hit_path(15.0, 20.0), vec![tree.root(), below]);
        assert_eq!(tree.hit_path(95.0, 95.0), vec![tree.root()]);
        assert!(tree.hit_path(-1.0, 5.0).is_empty());
    }

    #[test]
    fn test_interaction_follows_pointer() {
        let (mut tree, below, above) = overlapping();

        assert_eq!(tree.update_interaction(35.0, 20.0, false).unwrap(), Some(above));
        assert_eq!(tree.interaction(above), Some(Interaction::Hovered));
        assert_eq!(tree.interaction(below), Some(Interaction::Normal));

        let notes = tree.take_notifications();
        let hover = notes.iter().find(|n| n.widget == above).unwrap();
        assert_eq!(hover.event, NotifyEvent::SetHover);
        assert_eq!(hover.info, NotifyInfo::Pointer { x: 5.0, y: 10.0 });

        tree.update_interaction(15.0, 20.0, true).unwrap();
        assert_eq!(tree.interaction(below), Some(Interaction::Active));
        assert_eq!(tree.interaction(above), Some(Interaction::Normal));
        assert_eq!(tree.interaction(tree.root()), Some(Interaction::Active));

        // no change, no notification
        tree.take_notifications();
        tree.update_interaction(16.0, 21.0, true).unwrap();
        assert!(tree.take_notifications().is_empty());
    }
}
