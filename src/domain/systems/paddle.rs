// Bounds-checked paddle movement.

use crate::domain::errors::MatchError;
use crate::domain::state::{Direction, MatchState, MatchStatus, Side};

/// Parses a wire player identifier (`p1` / `p2`).
pub fn parse_side(player: &str) -> Result<Side, MatchError> {
    match player {
        "p1" => Ok(Side::One),
        "p2" => Ok(Side::Two),
        other => Err(MatchError::UnknownPlayer(other.to_string())),
    }
}

/// Parses a wire direction (`up` / `down`).
pub fn parse_direction(direction: &str) -> Result<Direction, MatchError> {
    match direction {
        "up" => Ok(Direction::Up),
        "down" => Ok(Direction::Down),
        other => Err(MatchError::UnknownDirection(other.to_string())),
    }
}

/// Moves one paddle by its speed, clamped to the canvas.
///
/// Only applies while the match is `Active` or `Paused`. Returns true when
/// the paddle position changed.
pub fn move_paddle(state: &mut MatchState, side: Side, direction: Direction) -> bool {
    if !matches!(state.status, MatchStatus::Active | MatchStatus::Paused) {
        return false;
    }

    let max_y = state.paddle_max_y(side);
    let paddle = state.paddle_mut(side);
    let delta = match direction {
        Direction::Up => -paddle.paddle_speed,
        Direction::Down => paddle.paddle_speed,
    };
    let next_y = (paddle.y + delta).clamp(0.0, max_y);
    if next_y == paddle.y {
        return false;
    }
    paddle.y = next_y;
    true
}
