// Computer-controlled paddle policy.
//
// The policy only refreshes its view of the ball every `refresh_ticks`, then
// steps toward the predicted intercept through the regular paddle movement
// rules, so it can never move faster or further than a human.

use crate::domain::state::{Direction, MatchState, Side};

#[derive(Debug, Clone)]
pub struct AiPaddle {
    refresh_ticks: u64,
    ticks_since_refresh: u64,
    target_y: Option<f64>,
}

impl AiPaddle {
    pub fn new(refresh_ticks: u64) -> Self {
        Self {
            refresh_ticks: refresh_ticks.max(1),
            ticks_since_refresh: 0,
            target_y: None,
        }
    }

    /// Picks the move for this tick, if any.
    pub fn decide(&mut self, state: &MatchState, side: Side) -> Option<Direction> {
        if self.target_y.is_none() || self.ticks_since_refresh >= self.refresh_ticks {
            self.target_y = Some(predict_intercept(state, side));
            self.ticks_since_refresh = 0;
        }
        self.ticks_since_refresh += 1;

        let target = self.target_y?;
        let paddle = state.paddle(side);
        let diff = target - paddle.center_y();
        // Dead zone keeps the paddle from oscillating around the target.
        let dead_zone = paddle.paddle_speed / 2.0;
        if diff > dead_zone {
            Some(Direction::Down)
        } else if diff < -dead_zone {
            Some(Direction::Up)
        } else {
            None
        }
    }
}

/// Predicts the ball center y when it reaches the paddle face on `side`.
///
/// Wall bounces are folded back into the playable band. A ball moving away
/// from the paddle yields the canvas center.
pub fn predict_intercept(state: &MatchState, side: Side) -> f64 {
    let ball = &state.ball;
    let paddle = state.paddle(side);
    let center = state.canvas.height / 2.0;

    let (approaching, face_x) = match side {
        Side::One => (ball.vx < 0.0, paddle.x + paddle.width),
        Side::Two => (ball.vx > 0.0, paddle.x - ball.size),
    };
    if !approaching {
        return center;
    }

    let ticks = ((face_x - ball.x) / ball.vx).max(0.0);
    let raw_y = ball.y + ball.vy * ticks;
    let max_y = (state.canvas.height - ball.size).max(0.0);
    fold_into(raw_y, max_y) + ball.size / 2.0
}

fn fold_into(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    let period = 2.0 * max;
    let offset = value.rem_euclid(period);
    if offset <= max { offset } else { period - offset }
}
