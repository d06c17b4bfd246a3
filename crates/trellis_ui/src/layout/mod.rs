//! Layout system for widget positioning.
//!
//! Three placement strategies are supported per container:
//!
//! - [`LayoutKind::Absolute`]: children sit at fixed coordinates.
//! - [`LayoutKind::Pack`]: children stack inward from the four edges.
//! - [`LayoutKind::Grid`]: children occupy cells of weighted rows and columns.
//!
//! The pure solvers live in [`pack`] and [`grid`]; the tree-walking driver that
//! measures bottom-up and arranges top-down lives in `solver`.

pub mod grid;
pub mod pack;
mod solver;

use std::fmt;
use std::str::FromStr;

use crate::error::{UiError, UiResult};

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle from a position and a size.
    #[must_use]
    pub const fn from_pos_size(pos: (f32, f32), size: Size) -> Self {
        Self {
            x: pos.0,
            y: pos.1,
            width: size.width,
            height: size.height,
        }
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns the size of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns true if the point is inside the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges exclusive,
    /// so adjacent rectangles never both contain a point.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns true if two rectangles intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(Self::new(x, y, right - x, bottom - y))
    }

    /// Moves the rectangle by the given offset.
    #[must_use]
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Componentwise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Returns the extent along an axis.
    #[must_use]
    pub const fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// A layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X axis.
    Horizontal,
    /// Y axis.
    Vertical,
}

/// Placement strategy of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutKind {
    /// Children are placed at explicit coordinates.
    #[default]
    Absolute,
    /// Children are packed against the container edges.
    Pack,
    /// Children are placed in rows and columns.
    Grid,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Absolute => "absolute",
            Self::Pack => "pack",
            Self::Grid => "grid",
        };
        f.write_str(name)
    }
}

impl FromStr for LayoutKind {
    type Err = UiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "pack" => Ok(Self::Pack),
            "grid" => Ok(Self::Grid),
            _ => Err(UiError::InvalidLayoutKind(s.to_owned())),
        }
    }
}

/// Edge a packed child is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    /// Stack downwards from the top edge.
    #[default]
    Top,
    /// Stack upwards from the bottom edge.
    Bottom,
    /// Stack rightwards from the left edge.
    Left,
    /// Stack leftwards from the right edge.
    Right,
}

impl Anchor {
    /// The axis children with this anchor stack along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }
}

/// Edges a grid child sticks to (bitfield).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Sticky(u8);

impl Sticky {
    /// Top edge.
    pub const N: u8 = 1 << 0;
    /// Right edge.
    pub const E: u8 = 1 << 1;
    /// Bottom edge.
    pub const S: u8 = 1 << 2;
    /// Left edge.
    pub const W: u8 = 1 << 3;

    /// Not sticky: the child is centered in its cell.
    pub const NONE: Self = Self(0);
    /// Sticky on all four edges: the child fills its cell.
    pub const ALL: Self = Self(Self::N | Self::E | Self::S | Self::W);

    /// Creates sticky flags from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Returns true if the edge is sticky.
    #[inline]
    #[must_use]
    pub const fn has(self, edge: u8) -> bool {
        (self.0 & edge) != 0
    }

    /// Returns the (leading, trailing) stickiness along an axis.
    #[must_use]
    pub const fn along(self, axis: Axis) -> (bool, bool) {
        match axis {
            Axis::Horizontal => (self.has(Self::W), self.has(Self::E)),
            Axis::Vertical => (self.has(Self::N), self.has(Self::S)),
        }
    }
}

impl FromStr for Sticky {
    type Err = UiError;

    /// Parses a combination of `n`, `e`, `s` and `w` such as `"nsew"` or `"we"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = 0;
        for c in s.chars() {
            bits |= match c.to_ascii_lowercase() {
                'n' => Self::N,
                'e' => Self::E,
                's' => Self::S,
                'w' => Self::W,
                _ => return Err(UiError::InvalidConfig(format!("invalid sticky flags: {s:?}"))),
            };
        }
        Ok(Self(bits))
    }
}

/// A grid cell request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridPlacement {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub column: usize,
    /// Edges the child expands towards.
    pub sticky: Sticky,
    /// Space kept free around the child on every side.
    pub margin: f32,
}

impl GridPlacement {
    /// Creates a non-sticky placement without margin.
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            sticky: Sticky::NONE,
            margin: 0.0,
        }
    }

    /// Sets the sticky edges.
    #[must_use]
    pub const fn sticky(mut self, sticky: Sticky) -> Self {
        self.sticky = sticky;
        self
    }

    /// Sets the margin.
    #[must_use]
    pub const fn margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }
}

/// How a child is placed in its parent. The variant must match the parent's
/// [`LayoutKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Fixed coordinates relative to the parent.
    Absolute {
        /// X position.
        x: f32,
        /// Y position.
        y: f32,
    },
    /// Packed against an edge.
    Pack {
        /// Edge to pack against.
        anchor: Anchor,
    },
    /// Placed in a grid cell.
    Grid(GridPlacement),
}

impl Placement {
    /// The layout kind this placement belongs to.
    #[must_use]
    pub const fn kind(&self) -> LayoutKind {
        match self {
            Self::Absolute { .. } => LayoutKind::Absolute,
            Self::Pack { .. } => LayoutKind::Pack,
            Self::Grid(_) => LayoutKind::Grid,
        }
    }
}

/// Spacing parameters of a container, mirrored from its base style.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutParams {
    /// Space between the container edge and its children.
    pub margin: f32,
    /// Space between consecutive packed children.
    pub padding: f32,
}

/// Per-row and per-column growth weights of a grid container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridTracks {
    rows: Vec<f32>,
    columns: Vec<f32>,
}

impl GridTracks {
    /// Sets the weight of a row.
    pub fn set_row_weight(&mut self, row: usize, weight: f32) {
        Self::set(&mut self.rows, row, weight);
    }

    /// Sets the weight of a column.
    pub fn set_column_weight(&mut self, column: usize, weight: f32) {
        Self::set(&mut self.columns, column, weight);
    }

    /// Returns the weight of a track, 0 when never configured.
    #[must_use]
    pub fn weight(&self, axis: Axis, index: usize) -> f32 {
        let weights = match axis {
            Axis::Horizontal => &self.columns,
            Axis::Vertical => &self.rows,
        };
        weights.get(index).copied().unwrap_or(0.0)
    }

    fn set(weights: &mut Vec<f32>, index: usize, weight: f32) {
        if weights.len() <= index {
            weights.resize(index + 1, 0.0);
        }
        weights[index] = weight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert!(rect.contains(50.0, 30.0));
        assert!(rect.contains(10.0, 20.0));
        assert!(!rect.contains(110.0, 30.0));
        assert!(!rect.contains(5.0, 30.0));
        assert!(!rect.contains(50.0, 80.0));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let b = Rect::new(25.0, 25.0, 50.0, 50.0);

        assert_eq!(a.intersection(&b), Some(Rect::new(25.0, 25.0, 25.0, 25.0)));
        assert_eq!(a.intersection(&Rect::new(60.0, 0.0, 5.0, 5.0)), None);
    }

    #[test]
    fn test_layout_kind_parse() {
        assert_eq!("Grid".parse::<LayoutKind>(), Ok(LayoutKind::Grid));
        assert_eq!(" pack ".parse::<LayoutKind>(), Ok(LayoutKind::Pack));
        assert_eq!(
            "flex".parse::<LayoutKind>(),
            Err(UiError::InvalidLayoutKind("flex".into()))
        );
    }

    #[test]
    fn test_sticky_parse() {
        let sticky: Sticky = "nsew".parse().unwrap();
        assert_eq!(sticky, Sticky::ALL);

        let west: Sticky = "w".parse().unwrap();
        assert_eq!(west.along(Axis::Horizontal), (true, false));
        assert_eq!(west.along(Axis::Vertical), (false, false));

        assert!("nx".parse::<Sticky>().is_err());
    }

    #[test]
    fn test_track_weights_default_to_zero() {
        let mut tracks = GridTracks::default();
        tracks.set_column_weight(2, 3.0);

        assert_eq!(tracks.weight(Axis::Horizontal, 0), 0.0);
        assert_eq!(tracks.weight(Axis::Horizontal, 2), 3.0);
        assert_eq!(tracks.weight(Axis::Vertical, 2), 0.0);
    }
}
