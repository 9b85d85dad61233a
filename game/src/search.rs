//! Read-only placement queries. Nothing here mutates the grid, so these are
//! safe to call on every pointer move.

use crate::grid::{Anchor, Grid, shape_center};
use crate::shapes::{Shape, shape_at};

/// Every anchor whose bounding box fits on the grid, row-major.
fn candidate_anchors(grid: &Grid, shape: &Shape) -> impl Iterator<Item = Anchor> {
    let n = grid.size();
    let max_row = n.checked_sub(shape.rows());
    let max_col = n.checked_sub(shape.cols());
    let (rows, cols) = match (max_row, max_col) {
        (Some(r), Some(c)) => (0..=r, 0..=c),
        // Bounding box larger than the grid: nothing to try.
        _ => (1..=0, 1..=0),
    };
    rows.flat_map(move |r| cols.clone().map(move |c| Anchor::new(r as i32, c as i32)))
}

/// Every legal anchor for `shape`, in row-major order.
pub fn valid_placements(grid: &Grid, shape: &Shape) -> Vec<Anchor> {
    candidate_anchors(grid, shape)
        .filter(|a| grid.can_place(shape, a.row, a.col))
        .collect()
}

pub fn first_valid_placement(grid: &Grid, shape: &Shape) -> Option<Anchor> {
    candidate_anchors(grid, shape).find(|a| grid.can_place(shape, a.row, a.col))
}

/// True if any offered shape fits anywhere. Unknown indices are skipped.
pub fn can_place_any(grid: &Grid, shape_indices: &[usize]) -> bool {
    shape_indices
        .iter()
        .filter_map(|&idx| shape_at(idx))
        .any(|shape| first_valid_placement(grid, shape).is_some())
}

/// Closest legal anchor to where the pointer wants the shape.
///
/// The desired anchor is `target - shape_center(shape)`. Candidates are ranked
/// by squared Euclidean distance from it; ties go to the first anchor in
/// row-major order. Returns `None` only when the shape fits nowhere.
pub fn nearest_valid_placement(
    grid: &Grid,
    shape: &Shape,
    target_row: i32,
    target_col: i32,
) -> Option<Anchor> {
    let center = shape_center(shape);
    let want_row = i64::from(target_row) - i64::from(center.row);
    let want_col = i64::from(target_col) - i64::from(center.col);

    let mut best: Option<(i64, Anchor)> = None;
    for anchor in candidate_anchors(grid, shape) {
        let dr = i64::from(anchor.row) - want_row;
        let dc = i64::from(anchor.col) - want_col;
        let dist = dr * dr + dc * dc;
        if best.is_some_and(|(d, _)| d <= dist) {
            continue;
        }
        if grid.can_place(shape, anchor.row, anchor.col) {
            best = Some((dist, anchor));
            if dist == 0 {
                break;
            }
        }
    }
    best.map(|(_, anchor)| anchor)
}
