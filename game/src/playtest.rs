use std::fmt;
use std::str::FromStr;

use engine::GameLogic;

use crate::config::GameConfig;
use crate::seed::Seeder;
use crate::session::GameSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Noop,
    Select(usize),
    Click { row: i32, col: i32 },
    DragStart(usize),
    DragOver { row: i32, col: i32 },
    DragRelease,
    Cancel,
    PlayAgain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseInputError(String);

impl fmt::Display for ParseInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised input: {}", self.0)
    }
}

impl std::error::Error for ParseInputError {}

impl FromStr for InputAction {
    type Err = ParseInputError;

    /// `select 1`, `click 3 4`, `drag 0`, `over 3 4`, `drop`, `cancel`, `again`, `noop`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseInputError(s.trim().to_string());
        let mut words = s.split_whitespace();
        let verb = words.next().ok_or_else(err)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let slot = |args: &[&str]| -> Result<usize, ParseInputError> {
            match args {
                [slot] => slot.parse().map_err(|_| err()),
                _ => Err(err()),
            }
        };
        let cell = |args: &[&str]| -> Result<(i32, i32), ParseInputError> {
            match args {
                [row, col] => Ok((
                    row.parse().map_err(|_| err())?,
                    col.parse().map_err(|_| err())?,
                )),
                _ => Err(err()),
            }
        };
        let bare = |action: InputAction, args: &[&str]| {
            if args.is_empty() { Ok(action) } else { Err(err()) }
        };

        match verb.as_str() {
            "select" => Ok(InputAction::Select(slot(&args)?)),
            "click" => {
                let (row, col) = cell(&args)?;
                Ok(InputAction::Click { row, col })
            }
            "drag" => Ok(InputAction::DragStart(slot(&args)?)),
            "over" => {
                let (row, col) = cell(&args)?;
                Ok(InputAction::DragOver { row, col })
            }
            "drop" => bare(InputAction::DragRelease, &args),
            "cancel" => bare(InputAction::Cancel, &args),
            "again" => bare(InputAction::PlayAgain, &args),
            "noop" => bare(InputAction::Noop, &args),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for InputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputAction::Noop => write!(f, "noop"),
            InputAction::Select(slot) => write!(f, "select {slot}"),
            InputAction::Click { row, col } => write!(f, "click {row} {col}"),
            InputAction::DragStart(slot) => write!(f, "drag {slot}"),
            InputAction::DragOver { row, col } => write!(f, "over {row} {col}"),
            InputAction::DragRelease => write!(f, "drop"),
            InputAction::Cancel => write!(f, "cancel"),
            InputAction::PlayAgain => write!(f, "again"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlastLogic {
    config: GameConfig,
    seeder: Seeder,
    best_score: u32,
}

impl BlastLogic {
    /// Counter-seeded from the configured stage, so every run with the same
    /// inputs lands on the same state.
    pub fn new(config: GameConfig, best_score: u32) -> Self {
        let config = config.sanitized();
        let seeder = Seeder::counter(config.stage_seed());
        Self {
            config,
            seeder,
            best_score,
        }
    }

    pub fn with_seeder(mut self, seeder: Seeder) -> Self {
        self.seeder = seeder;
        self
    }
}

impl GameLogic for BlastLogic {
    type State = GameSession;
    type Input = InputAction;

    fn initial_state(&self) -> Self::State {
        GameSession::new(&self.config, self.seeder.clone(), self.best_score)
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        apply_action(&mut next, input);
        next
    }

    /// A restart keeps the best score reached so far.
    fn reset_state(&self, previous: &Self::State) -> Self::State {
        let best_score = self.best_score.max(previous.best_score());
        GameSession::new(&self.config, self.seeder.clone(), best_score)
    }
}

fn apply_action(session: &mut GameSession, action: InputAction) {
    match action {
        InputAction::Noop => {}
        InputAction::Select(slot) => {
            session.select(slot);
        }
        InputAction::Click { row, col } => {
            if let Err(rejection) = session.click_cell(row, col) {
                log::debug!("click at ({row}, {col}) rejected: {rejection}");
            }
        }
        InputAction::DragStart(slot) => {
            session.begin_drag(slot);
        }
        InputAction::DragOver { row, col } => {
            session.drag_over(row, col);
        }
        InputAction::DragRelease => {
            session.release_drag();
        }
        InputAction::Cancel => session.cancel(),
        InputAction::PlayAgain => session.play_again(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        let cases = [
            ("noop", InputAction::Noop),
            ("select 1", InputAction::Select(1)),
            ("click 3 4", InputAction::Click { row: 3, col: 4 }),
            ("drag 0", InputAction::DragStart(0)),
            ("over -1 8", InputAction::DragOver { row: -1, col: 8 }),
            ("drop", InputAction::DragRelease),
            ("cancel", InputAction::Cancel),
            ("again", InputAction::PlayAgain),
            ("  SELECT   2 ", InputAction::Select(2)),
        ];
        for (text, expected) in cases {
            assert_eq!(text.parse::<InputAction>(), Ok(expected), "{text}");
        }
    }

    #[test]
    fn rejects_malformed_commands() {
        for text in ["", "select", "select x", "click 1", "drop 2", "jump", "select -1"] {
            assert!(text.parse::<InputAction>().is_err(), "{text:?}");
        }
    }

    #[test]
    fn display_parses_back() {
        let action = InputAction::Click { row: 7, col: 2 };
        assert_eq!(action.to_string().parse::<InputAction>(), Ok(action));
    }

    #[test]
    fn step_does_not_touch_the_input_state() {
        let logic = BlastLogic::new(GameConfig::default(), 0);
        let initial = logic.initial_state();
        let after = logic.step(&initial, InputAction::Select(0));
        assert_eq!(initial.phase(), crate::session::Phase::Idle);
        assert_ne!(after.phase(), initial.phase());
    }
}
