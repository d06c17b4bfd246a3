//! Weighted grid solver.
//!
//! Rows and columns ("tracks") are materialized up to the largest index any child
//! references. A track is never smaller than its largest member (natural size
//! plus twice the member margin). Space left over after the fixed tracks is
//! handed to weighted tracks in proportion to their weight, floored, and never
//! below their own minimum.

use super::{Axis, GridPlacement, GridTracks, Size};

/// A grid child as seen by the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridItem {
    /// Requested cell.
    pub cell: GridPlacement,
    /// The child's natural size.
    pub size: Size,
    /// Whether width and height are explicitly configured on the child.
    pub configured: (bool, bool),
}

/// A resolved track.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Track {
    /// Offset from the container origin.
    pub offset: f32,
    /// Extent of the track.
    pub size: f32,
}

/// Where a child ends up after arrangement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLayout {
    /// Parent-relative x position.
    pub x: f32,
    /// Parent-relative y position.
    pub y: f32,
    /// Width assigned by stickiness, when the width isn't configured.
    pub assigned_width: Option<f32>,
    /// Height assigned by stickiness, when the height isn't configured.
    pub assigned_height: Option<f32>,
}

fn index_on(cell: &GridPlacement, axis: Axis) -> usize {
    match axis {
        Axis::Horizontal => cell.column,
        Axis::Vertical => cell.row,
    }
}

/// Computes the minimum extent of every track along an axis.
#[must_use]
pub fn track_minimums(items: &[GridItem], axis: Axis) -> Vec<f32> {
    let count = items
        .iter()
        .map(|item| index_on(&item.cell, axis) + 1)
        .max()
        .unwrap_or(0);

    let mut minimums = vec![0.0_f32; count];
    for item in items {
        let index = index_on(&item.cell, axis);
        let needed = item.size.along(axis) + item.cell.margin * 2.0;
        minimums[index] = minimums[index].max(needed);
    }
    minimums
}

/// Distributes `extent` over tracks with the given minimums.
///
/// Zero-weight tracks keep their minimum. Weighted tracks receive
/// `max(minimum, floor(weight / total_weight * extra))` where `extra` is the
/// extent left after the zero-weight tracks.
#[must_use]
pub fn resolve_tracks(minimums: &[f32], weights: &[f32], extent: f32) -> Vec<Track> {
    let weight_of = |i: usize| weights.get(i).copied().unwrap_or(0.0).max(0.0);
    let total_weight: f32 = (0..minimums.len()).map(weight_of).sum();

    let fixed: f32 = minimums
        .iter()
        .enumerate()
        .filter(|(i, _)| weight_of(*i) == 0.0)
        .map(|(_, min)| *min)
        .sum();
    let extra = extent - fixed;

    let mut offset = 0.0;
    let mut tracks = Vec::with_capacity(minimums.len());
    for (i, &minimum) in minimums.iter().enumerate() {
        let weight = weight_of(i);
        let size = if total_weight > 0.0 && weight > 0.0 {
            minimum.max((weight / total_weight * extra).floor())
        } else {
            minimum
        };
        tracks.push(Track { offset, size });
        offset += size;
    }
    tracks
}

/// Computes the size a grid container needs: the sum of its track minimums.
#[must_use]
pub fn measure(items: &[GridItem]) -> Size {
    let width = track_minimums(items, Axis::Horizontal).iter().sum();
    let height = track_minimums(items, Axis::Vertical).iter().sum();
    Size::new(width, height)
}

/// Resolves the tracks of both axes for a container of the given size.
#[must_use]
pub fn solve(items: &[GridItem], tracks: &GridTracks, container: Size) -> (Vec<Track>, Vec<Track>) {
    let solve_axis = |axis: Axis| {
        let minimums = track_minimums(items, axis);
        let weights: Vec<f32> = (0..minimums.len()).map(|i| tracks.weight(axis, i)).collect();
        resolve_tracks(&minimums, &weights, container.along(axis))
    };
    (solve_axis(Axis::Horizontal), solve_axis(Axis::Vertical))
}

/// Places a child along one axis of its cell.
///
/// The child box starts half its margin past the track origin. The slack left
/// in the cell is split evenly before and after the child. A
/// sticky edge closes the gap on its side; if the child's extent isn't
/// configured the closed gap is added to the child.
fn place_on_axis(
    track: Track,
    natural: f32,
    margin: f32,
    sticky: (bool, bool),
    configured: bool,
) -> (f32, Option<f32>) {
    let start = track.offset + margin * 0.5;
    let slack = (track.size - margin * 2.0 - natural).max(0.0);
    let half = slack * 0.5;

    match (sticky, configured) {
        ((false, false), _) | ((true, true), true) => (start + half, None),
        ((true, true), false) => (start, Some(natural + slack)),
        ((true, false), true) => (start, None),
        ((true, false), false) => (start, Some(natural + half)),
        ((false, true), true) => (start + slack, None),
        ((false, true), false) => (start + half, Some(natural + half)),
    }
}

/// Positions grid children inside a container of the given size.
///
/// Returns one layout per item, in item order.
#[must_use]
pub fn arrange(items: &[GridItem], tracks: &GridTracks, container: Size) -> Vec<CellLayout> {
    let (columns, rows) = solve(items, tracks, container);

    items
        .iter()
        .map(|item| {
            let (x, assigned_width) = place_on_axis(
                columns[item.cell.column],
                item.size.width,
                item.cell.margin,
                item.cell.sticky.along(Axis::Horizontal),
                item.configured.0,
            );
            let (y, assigned_height) = place_on_axis(
                rows[item.cell.row],
                item.size.height,
                item.cell.margin,
                item.cell.sticky.along(Axis::Vertical),
                item.configured.1,
            );
            CellLayout {
                x,
                y,
                assigned_width,
                assigned_height,
            }
        })
        .collect()
}
