// Domain layer: match entities and simulation rules.

pub mod errors;
pub mod rng;
pub mod state;
pub mod systems;
pub mod tuning;

pub use errors::MatchError;
pub use rng::{LaunchRandom, SequenceRandom};
pub use state::{
    Ball, Canvas, CanvasSize, Direction, MatchId, MatchMode, MatchState, MatchStatus,
    MatchVariant, Paddle, PaddleControl, Side,
};
