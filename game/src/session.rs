use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, MAX_GRID_SIZE, MAX_ROUND_SIZE};
use crate::grid::{Anchor, Cell, Grid, PieceId, shape_center};
use crate::lines::{LineClearReport, resolve_lines};
use crate::scoring::ScoreTable;
use crate::search::{can_place_any, nearest_valid_placement};
use crate::seed::Seeder;
use crate::shapes::{SHAPE_COUNT, Shape, color_index_for, random_shape_index, shape_at};

/// Interaction phase. Committing happens inside a single call and is never
/// observable as a phase of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "phase")]
pub enum Phase {
    #[default]
    Idle,
    Selected {
        slot: usize,
    },
    Dragging {
        slot: usize,
        preview: Option<Anchor>,
    },
    GameOver,
}

/// Why a commit did not happen. The session is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    GameOver,
    NothingSelected,
    UnknownSlot(usize),
    UnknownShape(usize),
    Blocked(Anchor),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::GameOver => write!(f, "the game is over"),
            Rejection::NothingSelected => write!(f, "no piece is selected"),
            Rejection::UnknownSlot(slot) => write!(f, "no piece in slot {slot}"),
            Rejection::UnknownShape(idx) => write!(f, "unknown shape index {idx}"),
            Rejection::Blocked(a) => write!(f, "piece does not fit at ({}, {})", a.row, a.col),
        }
    }
}

impl std::error::Error for Rejection {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementOutcome {
    pub slot: usize,
    pub shape_index: usize,
    pub piece_id: PieceId,
    pub anchor: Anchor,
    pub cells_placed: usize,
    pub lines: LineClearReport,
    pub points: u32,
    pub score: u32,
    pub best_score: u32,
    pub new_best: bool,
    pub game_over: bool,
}

/// Everything a host needs to draw a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub grid: Grid,
    pub supply: Vec<usize>,
    pub score: u32,
    pub best_score: u32,
    pub piece_id_counter: PieceId,
    pub game_over: bool,
    pub phase: Phase,
}

/// One game from deal to game over: grid, offered pieces, score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SessionRepr")]
pub struct GameSession {
    grid: Grid,
    supply: Vec<usize>,
    score: u32,
    best_score: u32,
    next_piece_id: PieceId,
    game_over: bool,
    phase: Phase,
    grid_size: usize,
    round_size: usize,
    scoring: ScoreTable,
    seeder: Seeder,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRepr {
    grid: Grid,
    supply: Vec<usize>,
    score: u32,
    best_score: u32,
    next_piece_id: PieceId,
    game_over: bool,
    phase: Phase,
    grid_size: usize,
    round_size: usize,
    scoring: ScoreTable,
    seeder: Seeder,
}

impl TryFrom<SessionRepr> for GameSession {
    type Error = String;

    fn try_from(repr: SessionRepr) -> Result<Self, Self::Error> {
        if !(1..=MAX_GRID_SIZE).contains(&repr.grid_size) {
            return Err(format!("grid size {} is out of range", repr.grid_size));
        }
        if repr.grid.size() != repr.grid_size {
            return Err(format!(
                "grid is {0}x{0} but the session expects {1}x{1}",
                repr.grid.size(),
                repr.grid_size
            ));
        }
        if !(1..=MAX_ROUND_SIZE).contains(&repr.round_size) {
            return Err(format!("round size {} is out of range", repr.round_size));
        }
        if let Some(bad) = repr.supply.iter().find(|&&index| index >= SHAPE_COUNT) {
            return Err(format!("supply holds unknown shape {bad}"));
        }
        if repr.next_piece_id == 0 {
            return Err("piece ids start at 1".to_string());
        }
        if repr.best_score < repr.score {
            return Err(format!("best score {} is below score {}", repr.best_score, repr.score));
        }
        match repr.phase {
            Phase::GameOver if !repr.game_over => {
                return Err("game over phase without the game over flag".to_string());
            }
            Phase::Selected { slot } | Phase::Dragging { slot, .. } if slot >= repr.supply.len() => {
                return Err(format!("phase refers to missing slot {slot}"));
            }
            _ => {}
        }
        if repr.game_over && repr.phase != Phase::GameOver {
            return Err("game over flag without the game over phase".to_string());
        }
        Ok(GameSession {
            grid: repr.grid,
            supply: repr.supply,
            score: repr.score,
            best_score: repr.best_score,
            next_piece_id: repr.next_piece_id,
            game_over: repr.game_over,
            phase: repr.phase,
            grid_size: repr.grid_size,
            round_size: repr.round_size,
            scoring: repr.scoring,
            seeder: repr.seeder,
        })
    }
}

impl GameSession {
    pub fn new(config: &GameConfig, seeder: Seeder, best_score: u32) -> Self {
        let config = config.clone().sanitized();
        let mut session = Self {
            grid: Grid::new(config.grid_size),
            supply: Vec::with_capacity(config.round_size),
            score: 0,
            best_score,
            next_piece_id: 1,
            game_over: false,
            phase: Phase::Idle,
            grid_size: config.grid_size,
            round_size: config.round_size,
            scoring: config.score_table(),
            seeder,
        };
        session.deal_round();
        session.check_game_over();
        log::info!(
            "new game: {n}x{n} grid, supply {:?}, best {}",
            session.supply,
            session.best_score,
            n = session.grid_size
        );
        session
    }

    /// Fresh grid, score, piece ids and supply. The best score carries over.
    pub fn play_again(&mut self) {
        self.grid = Grid::new(self.grid_size);
        self.score = 0;
        self.next_piece_id = 1;
        self.game_over = false;
        self.phase = Phase::Idle;
        self.deal_round();
        self.check_game_over();
        log::info!("play again: supply {:?}", self.supply);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn supply(&self) -> &[usize] {
        &self.supply
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Id the next placed piece will carry.
    pub fn piece_id_counter(&self) -> PieceId {
        self.next_piece_id
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn scoring(&self) -> &ScoreTable {
        &self.scoring
    }

    pub fn shape_in_slot(&self, slot: usize) -> Option<&'static Shape> {
        self.supply.get(slot).and_then(|&idx| shape_at(idx))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            grid: self.grid.clone(),
            supply: self.supply.clone(),
            score: self.score,
            best_score: self.best_score,
            piece_id_counter: self.next_piece_id,
            game_over: self.game_over,
            phase: self.phase,
        }
    }

    /// Toggles click-selection of a tray slot. Selecting the selected slot
    /// clears the selection. Ignored once the game is over or for a bad slot.
    pub fn select(&mut self, slot: usize) -> bool {
        if self.game_over || slot >= self.supply.len() {
            return false;
        }
        self.phase = match self.phase {
            Phase::Selected { slot: current } if current == slot => Phase::Idle,
            _ => Phase::Selected { slot },
        };
        true
    }

    /// Commits the selected piece with its top-left corner on the clicked cell.
    pub fn click_cell(&mut self, row: i32, col: i32) -> Result<PlacementOutcome, Rejection> {
        if self.game_over {
            return Err(Rejection::GameOver);
        }
        let Phase::Selected { slot } = self.phase else {
            return Err(Rejection::NothingSelected);
        };
        self.place_at(slot, row, col)
    }

    pub fn begin_drag(&mut self, slot: usize) -> bool {
        if self.game_over || self.shape_in_slot(slot).is_none() {
            return false;
        }
        self.phase = Phase::Dragging {
            slot,
            preview: None,
        };
        true
    }

    /// Updates the drag preview for the pointer cell and returns it.
    pub fn drag_over(&mut self, row: i32, col: i32) -> Option<Anchor> {
        let Phase::Dragging { slot, .. } = self.phase else {
            return None;
        };
        let preview = self.preview_for(slot, row, col);
        self.phase = Phase::Dragging { slot, preview };
        preview
    }

    /// Where the piece in `slot` would land with the pointer over
    /// `(row, col)`: centred on the pointer if that fits, otherwise the nearest
    /// legal anchor.
    pub fn preview_for(&self, slot: usize, row: i32, col: i32) -> Option<Anchor> {
        let shape = self.shape_in_slot(slot)?;
        let center = shape_center(shape);
        let anchor = Anchor::new(row.saturating_sub(center.row), col.saturating_sub(center.col));
        if self.grid.can_place(shape, anchor.row, anchor.col) {
            return Some(anchor);
        }
        nearest_valid_placement(&self.grid, shape, row, col)
    }

    /// Drops the dragged piece at its preview. Without a preview (or outside a
    /// drag) nothing is placed and the session returns to idle.
    pub fn release_drag(&mut self) -> Option<PlacementOutcome> {
        let Phase::Dragging { slot, preview } = self.phase else {
            return None;
        };
        self.phase = Phase::Idle;
        let anchor = preview?;
        match self.place_at(slot, anchor.row, anchor.col) {
            Ok(outcome) => Some(outcome),
            Err(rejection) => {
                log::debug!("drop rejected: {rejection}");
                None
            }
        }
    }

    pub fn cancel(&mut self) {
        if !self.game_over {
            self.phase = Phase::Idle;
        }
    }

    /// Places the piece from `slot` with its top-left corner at `(row, col)`,
    /// resolves lines, scores, replenishes the supply and re-checks game over.
    /// Either all of that happens or none of it.
    pub fn place_at(&mut self, slot: usize, row: i32, col: i32) -> Result<PlacementOutcome, Rejection> {
        if self.game_over {
            return Err(Rejection::GameOver);
        }
        let shape_index = *self.supply.get(slot).ok_or(Rejection::UnknownSlot(slot))?;
        let shape = shape_at(shape_index).ok_or(Rejection::UnknownShape(shape_index))?;
        let anchor = Anchor::new(row, col);
        let piece_id = self.next_piece_id;
        if !self
            .grid
            .place(shape, row, col, piece_id, color_index_for(shape_index))
        {
            return Err(Rejection::Blocked(anchor));
        }

        self.next_piece_id = self.next_piece_id.saturating_add(1);
        let lines = resolve_lines(&mut self.grid);
        let cells_placed = shape.cell_count();
        let points = self.scoring.compute(cells_placed, lines.total());
        self.score = self.score.saturating_add(points);
        let new_best = self.score > self.best_score;
        if new_best {
            self.best_score = self.score;
        }

        self.supply.remove(slot);
        self.replenish();
        self.phase = Phase::Idle;
        self.check_game_over();

        log::debug!(
            "piece {piece_id} (shape {shape_index}) at ({row}, {col}): {} lines, +{points} -> {}",
            lines.total(),
            self.score
        );
        if new_best {
            log::info!("new best score {}", self.best_score);
        }

        Ok(PlacementOutcome {
            slot,
            shape_index,
            piece_id,
            anchor,
            cells_placed,
            lines,
            points,
            score: self.score,
            best_score: self.best_score,
            new_best,
            game_over: self.game_over,
        })
    }

    /// Re-derives game over from the current grid and supply. Latches: once
    /// over, only `play_again` clears it.
    pub fn check_game_over(&mut self) -> bool {
        if !self.game_over && !can_place_any(&self.grid, &self.supply) {
            self.game_over = true;
            self.phase = Phase::GameOver;
            log::info!("game over with score {} (best {})", self.score, self.best_score);
        }
        self.game_over
    }

    /// Overrides the offered pieces. For scripted setups and tests; the supply
    /// is topped back up to the round size after the next placement.
    pub fn set_supply(&mut self, supply: Vec<usize>) {
        self.supply = supply;
        if !self.game_over {
            self.phase = Phase::Idle;
        }
    }

    /// Writes one grid cell directly. For scripted setups and tests.
    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        self.grid.set_cell(row, col, cell);
    }

    fn deal_round(&mut self) {
        self.supply.clear();
        self.replenish();
    }

    fn replenish(&mut self) {
        while self.supply.len() < self.round_size {
            let seed = self.seeder.next_seed(self.supply.len());
            self.supply.push(random_shape_index(seed));
        }
    }
}
