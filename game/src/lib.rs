pub mod agent;
pub mod config;
pub mod grid;
pub mod lines;
pub mod playtest;
pub mod scoring;
pub mod search;
pub mod seed;
pub mod session;
pub mod shapes;
pub mod storage;
pub mod view;

pub use grid::{Anchor, Cell, Grid, PieceId};
pub use session::{GameSession, Phase, PlacementOutcome, Rejection, SessionSnapshot};
pub use shapes::Shape;
