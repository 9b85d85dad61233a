//! Plain-text frame for terminal hosts.

use std::fmt::Write as _;

use crate::grid::Cell;
use crate::session::{Phase, SessionSnapshot};
use crate::shapes::{Shape, shape_at};

const EMPTY: char = '.';

/// Occupied cells show the palette letter of their colour (`A` for index 0).
pub fn cell_glyph(cell: Cell) -> char {
    match cell {
        Cell::Empty => EMPTY,
        Cell::Occupied { color_index, .. } => char::from(b'A' + color_index % 26),
    }
}

pub fn render_text(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    let grid = &snapshot.grid;
    let preview = match snapshot.phase {
        Phase::Dragging {
            slot,
            preview: Some(anchor),
        } => snapshot
            .supply
            .get(slot)
            .and_then(|&idx| shape_at(idx))
            .map(|shape| (shape, anchor)),
        _ => None,
    };

    out.push_str("   ");
    for col in 0..grid.size() {
        let _ = write!(out, "{}", col % 10);
    }
    out.push('\n');
    for (r, row) in grid.rows().enumerate() {
        let _ = write!(out, "{:>2} ", r);
        for (c, &cell) in row.iter().enumerate() {
            let covered = preview.is_some_and(|(shape, anchor)| {
                covers(shape, anchor.row, anchor.col, r, c)
            });
            out.push(if covered { '+' } else { cell_glyph(cell) });
        }
        out.push('\n');
    }
    out.push('\n');

    let selected = match snapshot.phase {
        Phase::Selected { slot } | Phase::Dragging { slot, .. } => Some(slot),
        _ => None,
    };
    let tray: Vec<Vec<String>> = snapshot
        .supply
        .iter()
        .enumerate()
        .map(|(slot, &idx)| tray_piece(slot, idx, selected == Some(slot)))
        .collect();
    let height = tray.iter().map(Vec::len).max().unwrap_or(0);
    let width = tray
        .iter()
        .flat_map(|lines| lines.iter().map(String::len))
        .max()
        .unwrap_or(0);
    for line in 0..height {
        let row: Vec<String> = tray
            .iter()
            .map(|lines| {
                let text = lines.get(line).map(String::as_str).unwrap_or("");
                format!("{text:<width$}")
            })
            .collect();
        out.push_str(row.join("  ").trim_end());
        out.push('\n');
    }
    out.push('\n');

    let status = if snapshot.game_over {
        "GAME OVER (again to play again)"
    } else {
        match snapshot.phase {
            Phase::Idle => "pick a piece",
            Phase::Selected { .. } => "click a cell to place",
            Phase::Dragging { preview: None, .. } => "drag over the grid",
            Phase::Dragging { .. } => "drop to place",
            Phase::GameOver => "GAME OVER",
        }
    };
    let _ = writeln!(
        out,
        "score {}  best {}  | {status}",
        snapshot.score, snapshot.best_score
    );
    out
}

fn covers(shape: &Shape, anchor_row: i32, anchor_col: i32, row: usize, col: usize) -> bool {
    let (Ok(dr), Ok(dc)) = (
        usize::try_from(row as i64 - i64::from(anchor_row)),
        usize::try_from(col as i64 - i64::from(anchor_col)),
    ) else {
        return false;
    };
    shape.is_filled(dr, dc)
}

fn tray_piece(slot: usize, shape_index: usize, selected: bool) -> Vec<String> {
    let marker = if selected { '*' } else { ' ' };
    let mut lines = vec![format!("{marker}[{slot}]")];
    if let Some(shape) = shape_at(shape_index) {
        for r in 0..shape.rows() {
            let line: String = (0..shape.cols())
                .map(|c| if shape.is_filled(r, c) { '#' } else { ' ' })
                .collect();
            lines.push(format!("  {line}"));
        }
    }
    lines
}
