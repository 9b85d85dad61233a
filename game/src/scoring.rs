use serde::{Deserialize, Serialize};

pub const POINTS_PER_CELL: u32 = 10;

/// Bonus for lines cleared by one placement: 1 line +20, 2 lines +30, ...
/// Counts past the end use the last entry.
pub const LINE_BONUS: [u32; 10] = [0, 20, 30, 40, 50, 60, 70, 80, 90, 100];

/// Score with the built-in table.
pub fn compute_score(cells_placed: usize, lines_cleared: usize) -> u32 {
    score_with(POINTS_PER_CELL, &LINE_BONUS, cells_placed, lines_cleared)
}

/// Scoring parameters carried by a session. Built from `GameConfig`, which
/// guarantees a non-empty, non-decreasing bonus table starting at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTable {
    points_per_cell: u32,
    line_bonus: Vec<u32>,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            points_per_cell: POINTS_PER_CELL,
            line_bonus: LINE_BONUS.to_vec(),
        }
    }
}

impl ScoreTable {
    pub fn new(points_per_cell: u32, line_bonus: Vec<u32>) -> Self {
        Self {
            points_per_cell,
            line_bonus,
        }
    }

    pub fn compute(&self, cells_placed: usize, lines_cleared: usize) -> u32 {
        score_with(self.points_per_cell, &self.line_bonus, cells_placed, lines_cleared)
    }
}

fn score_with(points_per_cell: u32, bonus: &[u32], cells_placed: usize, lines_cleared: usize) -> u32 {
    let cells = u32::try_from(cells_placed).unwrap_or(u32::MAX);
    let base = cells.saturating_mul(points_per_cell);
    let bonus = match bonus.len() {
        0 => 0,
        len => bonus[lines_cleared.min(len - 1)],
    };
    base.saturating_add(bonus)
}
