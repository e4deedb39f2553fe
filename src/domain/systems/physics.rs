// Ball physics: wall reflection, paddle strikes, misses and resets.
//
// Coordinates are canvas pixels with +y pointing down. Velocities are pixels
// per tick.

use crate::domain::rng::LaunchRandom;
use crate::domain::state::{Ball, Canvas, Paddle, Side};
use crate::domain::tuning::ball::BallTuning;
use std::f64::consts::PI;

/// What happened to the ball during one `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsEvent {
    /// The ball travelled freely.
    Moved,
    /// The ball was about to leave through the top or bottom; `vy` flipped.
    Wall,
    /// The paddle on `Side` returned the ball.
    Strike(Side),
    /// The ball got past a paddle; `scorer` earns the point.
    Miss { scorer: Side },
}

/// Advances the ball by one tick against both paddles.
///
/// On a miss the ball is already reset when this returns.
pub fn advance(
    ball: &mut Ball,
    canvas: &Canvas,
    player_one: &Paddle,
    player_two: &Paddle,
    tuning: &BallTuning,
    random: &mut dyn LaunchRandom,
) -> PhysicsEvent {
    if at_wall(ball, canvas) {
        ball.vy = -ball.vy;
        return PhysicsEvent::Wall;
    }

    ball.x += ball.vx;
    ball.y += ball.vy;

    if in_paddle(ball, player_two, Side::Two) {
        execute_strike(ball, player_two, Side::Two, tuning);
        return PhysicsEvent::Strike(Side::Two);
    }
    if in_paddle(ball, player_one, Side::One) {
        execute_strike(ball, player_one, Side::One, tuning);
        return PhysicsEvent::Strike(Side::One);
    }

    let next_x = ball.x + ball.vx;
    let scorer = if next_x < player_one.x {
        Side::Two
    } else if next_x > player_two.x + player_two.width {
        Side::One
    } else {
        return PhysicsEvent::Moved;
    };

    reset_ball(ball, canvas, tuning, random);
    PhysicsEvent::Miss { scorer }
}

/// True when applying `vy` would put the ball through the top or bottom edge.
pub fn at_wall(ball: &Ball, canvas: &Canvas) -> bool {
    let next_y = ball.y + ball.vy;
    next_y <= 0.0 || next_y + ball.size >= canvas.height
}

/// Velocity-extrapolated overlap test between the ball and one paddle.
///
/// Only a ball travelling toward the paddle can be struck, so a ball that
/// already got behind a paddle is never pulled back into play.
pub fn in_paddle(ball: &Ball, paddle: &Paddle, side: Side) -> bool {
    let next_y = ball.y + ball.vy;
    match side {
        Side::Two => {
            ball.vx > 0.0
                && next_y > paddle.y
                && next_y <= paddle.y + paddle.height
                && ball.x + ball.size + ball.vx >= paddle.x
        }
        Side::One => {
            ball.vx < 0.0
                && next_y >= paddle.y
                && next_y <= paddle.y + paddle.height
                && ball.x + ball.vx <= paddle.x + paddle.width
        }
    }
}

/// Redirects the ball away from `paddle` and accelerates it.
///
/// The bounce angle grows with the distance between the ball center and the
/// paddle center; the speed magnitude is multiplied by `accel`.
pub fn execute_strike(ball: &mut Ball, paddle: &Paddle, side: Side, tuning: &BallTuning) {
    let half_height = paddle.height / 2.0;
    let relative_intersect_y = if half_height > 0.0 {
        (paddle.center_y() - ball.center_y()) / half_height
    } else {
        0.0
    };
    let bounce_angle = relative_intersect_y * tuning.bounce_factor;
    let speed = ball.velocity_magnitude();

    let (factor, flush_x) = match side {
        Side::One => (1.0, paddle.x + paddle.width),
        Side::Two => (-1.0, paddle.x - ball.size),
    };

    ball.vx = factor * speed * bounce_angle.cos() * ball.accel;
    ball.vy = speed * bounce_angle.sin() * ball.accel;
    ball.x = flush_x;
}

/// Re-centers the ball and launches it at a random angle within the launch
/// cone around horizontal, toward either side with equal probability.
pub fn reset_ball(
    ball: &mut Ball,
    canvas: &Canvas,
    tuning: &BallTuning,
    random: &mut dyn LaunchRandom,
) {
    ball.x = canvas.width / 2.0;
    ball.y = canvas.height / 2.0;

    let offset = random.unit() * tuning.launch_cone;
    let direction = if random.unit() > 0.5 { -1.0 } else { 1.0 };
    let phase = if random.unit() > 0.5 { 0.0 } else { PI };
    let angle = direction * offset + phase;

    ball.vx = ball.speed * angle.cos();
    ball.vy = ball.speed * angle.sin();
}
