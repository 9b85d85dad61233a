use crate::grid::Anchor;
use crate::lines::resolve_lines;
use crate::playtest::InputAction;
use crate::search::valid_placements;
use crate::session::{GameSession, Phase};

/// Picks the move that scores most right now, then clears most lines, then
/// leaves the most empty cells. Ties keep the lowest slot and the first anchor
/// in row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAgent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct MoveScore {
    points: u32,
    lines: usize,
    free_cells: usize,
}

impl GreedyAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn choose(&self, session: &GameSession) -> Option<(usize, Anchor)> {
        if session.is_game_over() {
            return None;
        }
        let grid = session.grid();
        let total_cells = grid.size() * grid.size();
        let mut best: Option<(MoveScore, usize, Anchor)> = None;

        for slot in 0..session.supply().len() {
            let Some(shape) = session.shape_in_slot(slot) else {
                continue;
            };
            for anchor in valid_placements(grid, shape) {
                let mut scratch = grid.clone();
                scratch.place(shape, anchor.row, anchor.col, 0, 0);
                let lines = resolve_lines(&mut scratch).total();
                let score = MoveScore {
                    points: session.scoring().compute(shape.cell_count(), lines),
                    lines,
                    free_cells: total_cells - scratch.occupied_count(),
                };
                if best.is_none_or(|(b, _, _)| score > b) {
                    best = Some((score, slot, anchor));
                }
            }
        }
        best.map(|(_, slot, anchor)| (slot, anchor))
    }

    /// Inputs that play the chosen move, or start a new game once over.
    pub fn actions(&self, session: &GameSession) -> Vec<InputAction> {
        if session.is_game_over() {
            return vec![InputAction::PlayAgain];
        }
        let Some((slot, anchor)) = self.choose(session) else {
            return Vec::new();
        };
        let click = InputAction::Click {
            row: anchor.row,
            col: anchor.col,
        };
        // Selecting the selected slot would toggle it off.
        if session.phase() == (Phase::Selected { slot }) {
            vec![click]
        } else {
            vec![InputAction::Select(slot), click]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::grid::Cell;
    use crate::playtest::BlastLogic;
    use crate::seed::Seeder;
    use engine::GameLogic;

    fn session() -> GameSession {
        GameSession::new(&GameConfig::default(), Seeder::counter(1000.0), 0)
    }

    #[test]
    fn prefers_the_move_that_clears_a_line() {
        let mut s = session();
        for col in 0..8 {
            s.set_cell(4, col, Cell::occupied(1, 0));
        }
        s.set_supply(vec![1, 0]);
        assert_eq!(s.supply(), &[1, 0]);
        assert_eq!(GreedyAgent::new().choose(&s), Some((1, Anchor::new(4, 8))));
    }

    #[test]
    fn actions_select_then_click() {
        let s = session();
        let agent = GreedyAgent::new();
        let (slot, anchor) = agent.choose(&s).expect("empty board has moves");
        assert_eq!(
            agent.actions(&s),
            vec![
                InputAction::Select(slot),
                InputAction::Click {
                    row: anchor.row,
                    col: anchor.col
                }
            ]
        );
    }

    #[test]
    fn actions_reuse_an_existing_selection() {
        let logic = BlastLogic::new(GameConfig::default(), 0);
        let agent = GreedyAgent::new();
        let initial = logic.initial_state();
        let (slot, anchor) = agent.choose(&initial).expect("empty board has moves");

        let selected = logic.step(&initial, InputAction::Select(slot));
        assert_eq!(selected.phase(), Phase::Selected { slot });
        let actions = agent.actions(&selected);
        assert_eq!(
            actions,
            vec![InputAction::Click {
                row: anchor.row,
                col: anchor.col
            }]
        );

        let played = actions
            .into_iter()
            .fold(selected, |state, action| logic.step(&state, action));
        assert!(played.score() > 0);
        assert_eq!(played.piece_id_counter(), 2);
    }

    #[test]
    fn actions_switch_from_another_selected_slot() {
        let logic = BlastLogic::new(GameConfig::default(), 0);
        let agent = GreedyAgent::new();
        let mut session = logic.initial_state();
        session.set_supply(vec![1, 0]);
        for col in 0..8 {
            session.set_cell(4, col, Cell::occupied(1, 0));
        }
        assert!(session.select(0));

        let actions = agent.actions(&session);
        assert_eq!(actions[0], InputAction::Select(1));
        let played = actions
            .into_iter()
            .fold(session, |state, action| logic.step(&state, action));
        assert!(played.grid().row(4).iter().all(|c| c.is_empty()));
    }
}
