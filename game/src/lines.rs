use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Grid};

/// Full rows and full columns found in a single scan. A cell may count towards
/// one of each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullLines {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl FullLines {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }

    pub fn count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }
}

/// Everything a placement cleared, across all resolution passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineClearReport {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub passes: u32,
}

impl LineClearReport {
    pub fn total(&self) -> usize {
        self.rows.len() + self.cols.len()
    }
}

impl Grid {
    pub fn full_lines(&self) -> FullLines {
        let n = self.size();
        let mut lines = FullLines::default();
        for i in 0..n {
            if (0..n).all(|j| self.is_occupied(i, j)) {
                lines.rows.push(i);
            }
            if (0..n).all(|j| self.is_occupied(j, i)) {
                lines.cols.push(i);
            }
        }
        lines
    }

    /// Empties every cell of the listed rows and columns. Intersections are
    /// cleared once; repeated or out-of-range indices are harmless.
    pub fn clear_lines(&mut self, rows: &[usize], cols: &[usize]) {
        let n = self.size();
        for &r in rows {
            for c in 0..n {
                self.set_cell(r, c, Cell::Empty);
            }
        }
        for &c in cols {
            for r in 0..n {
                self.set_cell(r, c, Cell::Empty);
            }
        }
    }
}

/// Clears full lines until none remain.
///
/// With the current catalog a clear can never complete another line, so this
/// is normally one pass, but the loop does not rely on that.
pub fn resolve_lines(grid: &mut Grid) -> LineClearReport {
    let mut report = LineClearReport::default();
    loop {
        let full = grid.full_lines();
        if full.is_empty() {
            break;
        }
        grid.clear_lines(&full.rows, &full.cols);
        report.passes += 1;
        report.rows.extend(full.rows);
        report.cols.extend(full.cols);
    }
    report
}
