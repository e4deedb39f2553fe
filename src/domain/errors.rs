// Domain-level errors for match workflows.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("Canvas too small: {width}x{height} (minimum {min}x{min})")]
    CanvasTooSmall { width: f64, height: f64, min: f64 },
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),
    #[error("Unknown direction: {0}")]
    UnknownDirection(String),
    #[error("Match not found")]
    MatchNotFound,
    #[error("Match closed")]
    MatchClosed,
    #[error("Event delivery failed")]
    DeliveryFailed,
}
