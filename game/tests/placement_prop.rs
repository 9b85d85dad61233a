//! Property tests for placement, line resolution and the any-move search.
//!
//! Grids are generated as random occupancy masks; the optimized searches are
//! checked against brute-force scans over every anchor.

use proptest::prelude::*;

use blockblast::grid::{Anchor, Cell, GRID_SIZE, Grid, shape_center};
use blockblast::lines::resolve_lines;
use blockblast::scoring::compute_score;
use blockblast::search::{can_place_any, nearest_valid_placement};
use blockblast::shapes::{SHAPE_COUNT, SHAPES, shape_at};

fn grid_from_mask(mask: &[bool]) -> Grid {
    let mut grid = Grid::new(GRID_SIZE);
    for (i, &filled) in mask.iter().enumerate() {
        if filled {
            grid.set_cell(i / GRID_SIZE, i % GRID_SIZE, Cell::occupied(1000, 0));
        }
    }
    grid
}

fn brute_force_any(grid: &Grid, supply: &[usize]) -> bool {
    let n = GRID_SIZE as i32;
    supply.iter().filter_map(|&i| shape_at(i)).any(|shape| {
        (-2..n + 2).any(|r| (-2..n + 2).any(|c| grid.can_place(shape, r, c)))
    })
}

/// Closest legal anchor to `target - centre` by squared distance, first in
/// row-major order on ties.
fn brute_force_nearest(grid: &Grid, shape_idx: usize, row: i32, col: i32) -> Option<Anchor> {
    let shape = &SHAPES[shape_idx];
    let center = shape_center(shape);
    let (want_row, want_col) = (row - center.row, col - center.col);
    let n = GRID_SIZE as i32;
    let mut best: Option<(i32, Anchor)> = None;
    for r in -2..n + 2 {
        for c in -2..n + 2 {
            if !grid.can_place(shape, r, c) {
                continue;
            }
            let dist = (r - want_row).pow(2) + (c - want_col).pow(2);
            if best.is_none_or(|(d, _)| dist < d) {
                best = Some((dist, Anchor::new(r, c)));
            }
        }
    }
    best.map(|(_, anchor)| anchor)
}

fn occupied(grid: &Grid) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    for r in 0..grid.size() {
        for c in 0..grid.size() {
            if grid.is_occupied(r, c) {
                cells.push((r, c));
            }
        }
    }
    cells
}

fn dense_mask() -> impl Strategy<Value = Vec<bool>> {
    // Mostly-full boards are where game over actually happens.
    proptest::collection::vec(proptest::bool::weighted(0.8), GRID_SIZE * GRID_SIZE)
}

fn any_mask() -> impl Strategy<Value = Vec<bool>> {
    proptest::collection::vec(any::<bool>(), GRID_SIZE * GRID_SIZE)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn can_place_any_matches_brute_force(
        mask in dense_mask(),
        supply in proptest::collection::vec(0..SHAPE_COUNT + 2, 0..4),
    ) {
        let grid = grid_from_mask(&mask);
        prop_assert_eq!(can_place_any(&grid, &supply), brute_force_any(&grid, &supply));
    }

    #[test]
    fn placement_never_leaves_the_board(
        mask in any_mask(),
        shape_idx in 0..SHAPE_COUNT,
        row in -12i32..12,
        col in -12i32..12,
    ) {
        let grid = grid_from_mask(&mask);
        let shape = &SHAPES[shape_idx];
        let n = GRID_SIZE as i32;
        if row < 0 || col < 0 || row + shape.rows() as i32 > n || col + shape.cols() as i32 > n {
            prop_assert!(!grid.can_place(shape, row, col));
        }
    }

    #[test]
    fn place_only_adds_the_shape_cells(
        mask in any_mask(),
        shape_idx in 0..SHAPE_COUNT,
        row in 0i32..9,
        col in 0i32..9,
    ) {
        let mut grid = grid_from_mask(&mask);
        let shape = &SHAPES[shape_idx];
        let before = occupied(&grid);
        let fits = grid.can_place(shape, row, col);

        let placed = grid.place(shape, row, col, 7, shape_idx);
        prop_assert_eq!(placed, fits);
        if !placed {
            prop_assert_eq!(occupied(&grid), before);
            return Ok(());
        }

        let mut expected = before.clone();
        for (dr, dc) in shape.filled_cells() {
            expected.push((row as usize + dr, col as usize + dc));
        }
        expected.sort_unstable();
        prop_assert_eq!(occupied(&grid), expected);
        for (dr, dc) in shape.filled_cells() {
            let cell = grid.cell(row as usize + dr, col as usize + dc);
            prop_assert_eq!(cell, Some(Cell::occupied(7, shape_idx)));
        }
    }

    #[test]
    fn nearest_placement_is_always_legal(
        mask in dense_mask(),
        shape_idx in 0..SHAPE_COUNT,
        row in -4i32..13,
        col in -4i32..13,
    ) {
        let grid = grid_from_mask(&mask);
        let shape = &SHAPES[shape_idx];
        match nearest_valid_placement(&grid, shape, row, col) {
            Some(anchor) => prop_assert!(grid.can_place(shape, anchor.row, anchor.col)),
            None => prop_assert!(!brute_force_any(&grid, &[shape_idx])),
        }
    }

    #[test]
    fn nearest_placement_matches_brute_force(
        mask in dense_mask(),
        shape_idx in 0..SHAPE_COUNT,
        row in -4i32..13,
        col in -4i32..13,
    ) {
        let grid = grid_from_mask(&mask);
        prop_assert_eq!(
            nearest_valid_placement(&grid, &SHAPES[shape_idx], row, col),
            brute_force_nearest(&grid, shape_idx, row, col)
        );
    }

    #[test]
    fn resolving_leaves_no_full_lines_and_touches_only_cleared_lines(mask in dense_mask()) {
        let mut grid = grid_from_mask(&mask);
        let before = grid.clone();
        let report = resolve_lines(&mut grid);
        prop_assert!(grid.full_lines().is_empty());
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                let cleared = report.rows.contains(&r) || report.cols.contains(&c);
                if cleared {
                    prop_assert!(!grid.is_occupied(r, c));
                } else {
                    prop_assert_eq!(grid.cell(r, c), before.cell(r, c));
                }
            }
        }
    }

    #[test]
    fn clearing_twice_matches_clearing_once(
        mask in any_mask(),
        rows in proptest::collection::vec(0..GRID_SIZE, 0..3),
        cols in proptest::collection::vec(0..GRID_SIZE, 0..3),
    ) {
        let mut once = grid_from_mask(&mask);
        once.clear_lines(&rows, &cols);
        let mut twice = once.clone();
        twice.clear_lines(&rows, &cols);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn score_is_monotonic(cells in 0usize..40, lines in 0usize..20) {
        prop_assert!(compute_score(cells + 1, lines) >= compute_score(cells, lines));
        prop_assert!(compute_score(cells, lines + 1) >= compute_score(cells, lines));
    }
}

#[test]
fn nothing_scores_nothing() {
    assert_eq!(compute_score(0, 0), 0);
}
