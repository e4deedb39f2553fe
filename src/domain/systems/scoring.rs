// Score bookkeeping and win detection.

use crate::domain::state::{MatchState, MatchStatus, Side};
use crate::domain::systems::physics::PhysicsEvent;

/// Final outcome of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub winner: Side,
    pub loser: Side,
}

/// Applies the point for a miss and ends the match when a side reaches
/// `max_score`.
///
/// Any other event leaves scores and status untouched.
pub fn evaluate(state: &mut MatchState, event: PhysicsEvent) -> Option<MatchResult> {
    let PhysicsEvent::Miss { scorer } = event else {
        return None;
    };
    if state.status != MatchStatus::Active {
        return None;
    }

    let max_score = state.max_score;
    let paddle = state.paddle_mut(scorer);
    paddle.score = (paddle.score + 1).min(max_score);

    let winner = [Side::One, Side::Two]
        .into_iter()
        .find(|side| state.paddle(*side).score == max_score)?;

    state.status = MatchStatus::Ended;
    Some(MatchResult {
        winner,
        loser: winner.opponent(),
    })
}
