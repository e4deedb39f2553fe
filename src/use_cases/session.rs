// Match session state machine: Created -> Active <-> Paused -> Ended.

use crate::domain::systems::ai::AiPaddle;
use crate::domain::systems::physics::{self, PhysicsEvent};
use crate::domain::systems::scoring::{self, MatchResult};
use crate::domain::systems::paddle;
use crate::domain::tuning::ball::BallTuning;
use crate::domain::tuning::paddle::PaddleTuning;
use crate::domain::tuning::{
    DEFAULT_MAX_SCORE, MIN_CANVAS_DIM, SCALE_DIVISOR, TOURNAMENT_MAX_SCORE,
};
use crate::domain::{
    Ball, Canvas, CanvasSize, Direction, LaunchRandom, MatchError, MatchId, MatchMode,
    MatchState, MatchStatus, MatchVariant, Paddle, PaddleControl, Side,
};
use crate::use_cases::types::MatchSnapshot;

/// Gameplay tuning bundle for a session.
#[derive(Debug, Clone, Copy)]
pub struct SessionTuning {
    pub ball: BallTuning,
    pub paddle: PaddleTuning,
    /// Ticks between two looks at the ball for AI-driven paddles.
    pub ai_refresh_ticks: u64,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            ball: BallTuning::default(),
            paddle: PaddleTuning::default(),
            ai_refresh_ticks: 60,
        }
    }
}

/// Result of one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub event: PhysicsEvent,
    pub result: Option<MatchResult>,
}

pub struct MatchSession {
    state: MatchState,
    tuning: SessionTuning,
    random: Box<dyn LaunchRandom>,
    // Indexed by side: [One, Two].
    ai: [Option<AiPaddle>; 2],
}

impl MatchSession {
    pub fn new(id: MatchId, variant: MatchVariant, random: Box<dyn LaunchRandom>) -> Self {
        Self::with_tuning(id, variant, random, SessionTuning::default())
    }

    pub fn with_tuning(
        id: MatchId,
        variant: MatchVariant,
        random: Box<dyn LaunchRandom>,
        tuning: SessionTuning,
    ) -> Self {
        let ai_for = |side| match variant.control(side) {
            PaddleControl::Ai => Some(AiPaddle::new(tuning.ai_refresh_ticks)),
            PaddleControl::Input => None,
        };
        Self {
            state: MatchState::new(id, variant),
            tuning,
            random,
            ai: [ai_for(Side::One), ai_for(Side::Two)],
        }
    }

    pub fn id(&self) -> MatchId {
        self.state.id
    }

    pub fn status(&self) -> MatchStatus {
        self.state.status
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::from(&self.state)
    }

    /// Lays out the field and launches the ball.
    ///
    /// Returns `Ok(false)` when the match was already initialized.
    pub fn initialize(&mut self, size: CanvasSize, mode: MatchMode) -> Result<bool, MatchError> {
        if self.state.status != MatchStatus::Created {
            return Ok(false);
        }
        let valid = |dim: f64| dim.is_finite() && dim >= MIN_CANVAS_DIM;
        if !valid(size.width) || !valid(size.height) {
            return Err(MatchError::CanvasTooSmall {
                width: size.width,
                height: size.height,
                min: MIN_CANVAS_DIM,
            });
        }

        let scale = (size.width.min(size.height) / SCALE_DIVISOR).floor();
        let canvas = Canvas {
            width: size.width,
            height: size.height,
            scale,
        };
        let paddle_tuning = self.tuning.paddle;
        let ball_tuning = self.tuning.ball;

        let player_one = Paddle {
            x: paddle_tuning.left_x,
            y: canvas.height * paddle_tuning.start_y_ratio,
            width: scale * paddle_tuning.width_ratio,
            height: scale * paddle_tuning.height_ratio,
            paddle_speed: scale * paddle_tuning.speed_ratio,
            score: 0,
        };
        let player_two = Paddle {
            x: canvas.width - paddle_tuning.right_inset,
            ..player_one
        };
        let speed_ratio = if self.ai.iter().any(Option::is_some) {
            ball_tuning.ai_speed_ratio
        } else {
            ball_tuning.speed_ratio
        };
        let mut ball = Ball {
            x: canvas.width / 2.0,
            y: canvas.height / 2.0,
            size: scale * ball_tuning.size_ratio,
            speed: scale * speed_ratio,
            accel: ball_tuning.accel,
            vx: 0.0,
            vy: 0.0,
        };
        physics::reset_ball(&mut ball, &canvas, &ball_tuning, self.random.as_mut());

        self.state.canvas = canvas;
        self.state.mode = mode;
        self.state.max_score = match mode {
            MatchMode::Normal => DEFAULT_MAX_SCORE,
            MatchMode::Tournament => TOURNAMENT_MAX_SCORE,
        };
        self.state.player_one = player_one;
        self.state.player_two = player_two;
        self.state.ball = ball;
        self.state.status = MatchStatus::Active;
        Ok(true)
    }

    pub fn pause(&mut self) -> bool {
        if self.state.status != MatchStatus::Active {
            return false;
        }
        self.state.status = MatchStatus::Paused;
        true
    }

    /// Returns true only on a Paused -> Active transition.
    pub fn unpause(&mut self) -> bool {
        if self.state.status != MatchStatus::Paused {
            return false;
        }
        self.state.status = MatchStatus::Active;
        true
    }

    /// Applies a player move; sides driven by the AI ignore player input.
    pub fn move_paddle(&mut self, side: Side, direction: Direction) -> bool {
        if self.state.variant.control(side) == PaddleControl::Ai {
            return false;
        }
        paddle::move_paddle(&mut self.state, side, direction)
    }

    /// Runs AI moves, physics and scoring for one tick. No-op unless Active.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.state.status != MatchStatus::Active {
            return None;
        }

        for side in [Side::One, Side::Two] {
            let slot = match side {
                Side::One => &mut self.ai[0],
                Side::Two => &mut self.ai[1],
            };
            if let Some(direction) = slot.as_mut().and_then(|ai| ai.decide(&self.state, side)) {
                paddle::move_paddle(&mut self.state, side, direction);
            }
        }

        let MatchState {
            ball,
            canvas,
            player_one,
            player_two,
            ..
        } = &mut self.state;
        let event = physics::advance(
            ball,
            canvas,
            player_one,
            player_two,
            &self.tuning.ball,
            self.random.as_mut(),
        );
        let result = scoring::evaluate(&mut self.state, event);
        self.state.tick += 1;

        Some(TickOutcome { event, result })
    }

    /// Tears the session down (disconnect or lost peer).
    pub fn terminate(&mut self) {
        self.state.status = MatchStatus::Ended;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SequenceRandom;

    const CANVAS_900: CanvasSize = CanvasSize {
        width: 900.0,
        height: 900.0,
    };

    fn session(variant: MatchVariant, samples: Vec<f64>) -> MatchSession {
        MatchSession::new(
            MatchId::new(),
            variant,
            Box::new(SequenceRandom::new(samples)),
        )
    }

    #[test]
    fn initialize_lays_out_900_canvas() {
        let mut session = session(MatchVariant::Local, vec![0.0]);
        assert_eq!(session.initialize(CANVAS_900, MatchMode::Normal), Ok(true));

        let state = session.state();
        assert_eq!(state.status, MatchStatus::Active);
        assert_eq!(state.canvas.scale, 20.0);
        assert_eq!(state.max_score, 10);
        assert_eq!(
            (state.player_one.x, state.player_one.y),
            (5.0, 360.0)
        );
        assert_eq!(
            (state.player_one.width, state.player_one.height),
            (20.0, 180.0)
        );
        assert_eq!(state.player_two.x, 880.0);
        assert_eq!((state.ball.size, state.ball.speed), (20.0, 16.0));
        assert_eq!((state.ball.x, state.ball.y), (450.0, 450.0));
        assert!(state.ball.vx != 0.0);
    }

    #[test]
    fn tournament_mode_targets_five() {
        let mut session = session(MatchVariant::Local, vec![0.0]);
        session
            .initialize(CANVAS_900, MatchMode::Tournament)
            .expect("valid canvas");
        assert_eq!(session.state().max_score, 5);
    }

    #[test]
    fn ai_variant_uses_slower_ball() {
        let mut session = session(MatchVariant::Ai, vec![0.0]);
        session
            .initialize(CANVAS_900, MatchMode::Normal)
            .expect("valid canvas");
        assert_eq!(session.state().ball.speed, 14.0);
    }

    #[test]
    fn second_initialize_is_ignored() {
        let mut session = session(MatchVariant::Local, vec![0.0]);
        session
            .initialize(CANVAS_900, MatchMode::Normal)
            .expect("valid canvas");
        let small = CanvasSize {
            width: 450.0,
            height: 450.0,
        };
        assert_eq!(session.initialize(small, MatchMode::Tournament), Ok(false));
        assert_eq!(session.state().canvas.scale, 20.0);
        assert_eq!(session.state().max_score, 10);
    }

    #[test]
    fn tiny_or_invalid_canvas_is_rejected() {
        let mut session = session(MatchVariant::Local, vec![0.0]);
        for (width, height) in [(0.0, 900.0), (900.0, -1.0), (44.0, 900.0), (f64::NAN, 900.0)] {
            let result = session.initialize(CanvasSize { width, height }, MatchMode::Normal);
            assert!(matches!(result, Err(MatchError::CanvasTooSmall { .. })));
        }
        assert_eq!(session.status(), MatchStatus::Created);

        let minimal = CanvasSize {
            width: 45.0,
            height: 45.0,
        };
        assert_eq!(session.initialize(minimal, MatchMode::Normal), Ok(true));
        assert_eq!(session.state().canvas.scale, 1.0);
    }

    #[test]
    fn pause_and_unpause_follow_state_machine() {
        let mut session = session(MatchVariant::Local, vec![0.0]);
        assert!(!session.pause());
        assert!(!session.unpause());

        session
            .initialize(CANVAS_900, MatchMode::Normal)
            .expect("valid canvas");
        assert!(!session.unpause(), "unpause while active is a no-op");
        assert!(session.pause());
        assert!(!session.pause());
        assert_eq!(session.tick(), None);
        assert!(session.unpause());
        assert_eq!(session.status(), MatchStatus::Active);
    }

    #[test]
    fn ai_side_ignores_player_input() {
        let mut session = session(MatchVariant::Ai, vec![0.0]);
        session
            .initialize(CANVAS_900, MatchMode::Normal)
            .expect("valid canvas");
        assert!(!session.move_paddle(Side::Two, Direction::Up));
        assert!(session.move_paddle(Side::One, Direction::Up));
    }

    #[test]
    fn ai_paddle_tracks_ball_during_ticks() {
        // Launch right (toward the AI) and slightly downward.
        let mut session = session(MatchVariant::Ai, vec![0.3, 0.0, 0.9]);
        session
            .initialize(CANVAS_900, MatchMode::Normal)
            .expect("valid canvas");
        let start_y = session.state().player_two.y;
        session.tick();
        assert!(session.state().player_two.y > start_y);
    }

    #[test]
    fn ten_misses_end_the_match_once() {
        // Every launch is horizontal toward player one.
        let mut session = session(MatchVariant::Local, vec![0.0, 0.0, 0.0]);
        session
            .initialize(CANVAS_900, MatchMode::Normal)
            .expect("valid canvas");
        for _ in 0..30 {
            session.move_paddle(Side::One, Direction::Up);
        }
        assert_eq!(session.state().player_one.y, 0.0);

        let mut results = Vec::new();
        let mut misses = 0;
        for _ in 0..10_000 {
            let Some(outcome) = session.tick() else {
                break;
            };
            if matches!(outcome.event, PhysicsEvent::Miss { .. }) {
                misses += 1;
            }
            results.extend(outcome.result);
        }

        assert_eq!(misses, 10);
        assert_eq!(
            results,
            vec![MatchResult {
                winner: Side::Two,
                loser: Side::One
            }]
        );
        assert_eq!(session.state().player_two.score, 10);
        assert_eq!(session.state().player_one.score, 0);
        assert_eq!(session.status(), MatchStatus::Ended);
        assert_eq!(session.tick(), None);
    }

    #[test]
    fn miss_past_right_paddle_scores_and_recenters() {
        // Launch samples for initialize, then for the reset after the miss.
        let mut session = session(MatchVariant::Local, vec![0.25, 0.0, 1.0]);
        session
            .initialize(CANVAS_900, MatchMode::Normal)
            .expect("valid canvas");
        session.state.ball.x = 898.0;
        session.state.ball.y = 100.0;
        session.state.ball.vx = 16.0;
        session.state.ball.vy = 0.0;
        assert_eq!(session.state().player_two.x, 880.0);

        let outcome = session.tick().expect("active match ticks");

        assert_eq!(outcome.event, PhysicsEvent::Miss { scorer: Side::One });
        assert_eq!(outcome.result, None);
        assert_eq!(session.state().player_one.score, 1);
        assert_eq!(session.state().player_two.score, 0);
        assert_eq!((session.state().ball.x, session.state().ball.y), (450.0, 450.0));
        assert_eq!(session.status(), MatchStatus::Active);
    }

    #[test]
    fn terminate_ends_from_any_state() {
        let mut session = session(MatchVariant::Local, vec![0.0]);
        session.terminate();
        assert_eq!(session.status(), MatchStatus::Ended);
        assert!(!session.move_paddle(Side::One, Direction::Down));
    }
}
