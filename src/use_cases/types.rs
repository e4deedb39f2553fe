// Use-case level inputs/outputs for the match loop.

use crate::domain::systems::scoring::MatchResult;
use crate::domain::{
    Ball, CanvasSize, Direction, MatchError, MatchId, MatchMode, MatchState, Paddle, Side,
};
use tokio::sync::{mpsc, oneshot};

/// Commands delivered to a match's owning task.
#[derive(Debug)]
pub enum MatchCommand {
    Start { canvas: CanvasSize, mode: MatchMode },
    Move { side: Side, direction: Direction },
    Pause,
    Unpause,
    Disconnect,
    /// Reply with a copy of the current state.
    Inspect { reply: oneshot::Sender<MatchState> },
}

/// Events a match produces for its transport.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchEvent {
    Info { match_id: MatchId },
    State(MatchSnapshot),
    Result(MatchResult),
    Error { message: String },
}

/// Per-tick view of a match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    pub match_id: MatchId,
    pub tick: u64,
    pub player_one: Paddle,
    pub player_two: Paddle,
    pub ball: Ball,
    pub score_max: u32,
}

impl From<&MatchState> for MatchSnapshot {
    fn from(state: &MatchState) -> Self {
        Self {
            match_id: state.id,
            tick: state.tick,
            player_one: state.player_one,
            player_two: state.player_two,
            ball: state.ball,
            score_max: state.max_score,
        }
    }
}

/// Outbound side of a match. A failed delivery means the peer is gone or has
/// stopped keeping up.
pub trait EventSink: Send + 'static {
    fn deliver(&self, event: MatchEvent) -> Result<(), MatchError>;
}

/// Queue slots kept free of snapshots so a terminal event always fits.
pub const RESERVED_EVENT_SLOTS: usize = 1;

impl EventSink for mpsc::Sender<MatchEvent> {
    fn deliver(&self, event: MatchEvent) -> Result<(), MatchError> {
        // A snapshot that would eat into the reserved slots means the reader
        // has stalled.
        if matches!(event, MatchEvent::State(_)) && self.capacity() <= RESERVED_EVENT_SLOTS {
            return Err(MatchError::DeliveryFailed);
        }
        self.try_send(event).map_err(|_| MatchError::DeliveryFailed)
    }
}
