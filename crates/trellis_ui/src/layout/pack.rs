//! Directional packing.
//!
//! Children are grouped by [`Anchor`] and stacked from their edge towards the
//! middle of the container, in insertion order, separated by the container's
//! padding. Groups are centered on their cross axis.

use super::{Anchor, Axis, LayoutParams, Size};

/// A packed child as seen by the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackItem {
    /// Edge the child is packed against.
    pub anchor: Anchor,
    /// The child's natural size.
    pub size: Size,
}

/// Extents of one anchor group.
#[derive(Debug, Clone, Copy, Default)]
struct GroupExtent {
    /// Sum of member extents plus padding along the stacking axis.
    main: f32,
    /// Largest member extent across the stacking axis.
    cross: f32,
    count: usize,
}

impl GroupExtent {
    fn collect(items: &[PackItem], anchor: Anchor, padding: f32) -> Self {
        let axis = anchor.axis();
        let cross_axis = match axis {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        };

        let mut group = Self::default();
        for item in items.iter().filter(|item| item.anchor == anchor) {
            group.main += item.size.along(axis);
            group.cross = group.cross.max(item.size.along(cross_axis));
            group.count += 1;
        }
        if group.count > 1 {
            group.main += padding * (group.count - 1) as f32;
        }
        group
    }
}

/// Computes the size a pack container needs for its children, margins included.
#[must_use]
pub fn measure(items: &[PackItem], params: LayoutParams) -> Size {
    let top = GroupExtent::collect(items, Anchor::Top, params.padding);
    let bottom = GroupExtent::collect(items, Anchor::Bottom, params.padding);
    let left = GroupExtent::collect(items, Anchor::Left, params.padding);
    let right = GroupExtent::collect(items, Anchor::Right, params.padding);

    let width = top.cross.max(bottom.cross).max(left.main + right.main);
    let height = left.cross.max(right.cross).max(top.main + bottom.main);

    Size::new(width + params.margin * 2.0, height + params.margin * 2.0)
}

/// Positions packed children inside a container of the given size.
///
/// Returns one parent-relative position per item, in item order.
#[must_use]
pub fn arrange(items: &[PackItem], params: LayoutParams, container: Size) -> Vec<(f32, f32)> {
    let x_center = container.width * 0.5;
    let y_center = container.height * 0.5;

    let mut left = params.margin;
    let mut right = container.width - params.margin;
    let mut top = params.margin;
    let mut bottom = container.height - params.margin;

    let mut positions = Vec::with_capacity(items.len());
    for item in items {
        let Size { width, height } = item.size;
        let position = match item.anchor {
            Anchor::Left => {
                let x = left;
                left += width + params.padding;
                (x, y_center - height * 0.5)
            }
            Anchor::Right => {
                right -= width;
                let x = right;
                right -= params.padding;
                (x, y_center - height * 0.5)
            }
            Anchor::Top => {
                let y = top;
                top += height + params.padding;
                (x_center - width * 0.5, y)
            }
            Anchor::Bottom => {
                bottom -= height;
                let y = bottom;
                bottom -= params.padding;
                (x_center - width * 0.5, y)
            }
        };
        positions.push(position);
    }

    positions
}
