// Domain-level match entities.

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier for one match; never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchId(Uuid);

impl MatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for MatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Created,
    Active,
    Paused,
    Ended,
}

/// Scoring rules picked when the match is initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    Normal,
    Tournament,
}

/// How each side of a match is driven, chosen when the match is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchVariant {
    /// Both paddles on one client.
    #[default]
    Local,
    /// Player one is human, player two follows the AI policy.
    Ai,
    /// Both paddles relayed from remote clients.
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleControl {
    Input,
    Ai,
}

impl MatchVariant {
    pub fn control(self, side: Side) -> PaddleControl {
        match (self, side) {
            (MatchVariant::Ai, Side::Two) => PaddleControl::Ai,
            _ => PaddleControl::Input,
        }
    }
}

/// Left (`One`) or right (`Two`) side of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }

    /// Wire identifier used by commands and results.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::One => "p1",
            Side::Two => "p2",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Requested canvas dimensions, as sent by the client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    /// Shared length unit, `floor(min(width, height) / 45)`.
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Paddle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub paddle_speed: f64,
    pub score: u32,
}

impl Paddle {
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Launch speed restored on every reset.
    pub speed: f64,
    /// Multiplier applied on every paddle strike.
    pub accel: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Ball {
    pub fn velocity_magnitude(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.size / 2.0
    }
}

/// The owned, mutable record of one match.
///
/// Geometry is zeroed until the match leaves `Created`; `canvas` and
/// `max_score` are written once by initialization and never again.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub id: MatchId,
    pub variant: MatchVariant,
    pub status: MatchStatus,
    pub mode: MatchMode,
    pub canvas: Canvas,
    pub max_score: u32,
    pub player_one: Paddle,
    pub player_two: Paddle,
    pub ball: Ball,
    /// Completed ticks since initialization.
    pub tick: u64,
}

impl MatchState {
    pub fn new(id: MatchId, variant: MatchVariant) -> Self {
        Self {
            id,
            variant,
            status: MatchStatus::Created,
            mode: MatchMode::default(),
            canvas: Canvas::default(),
            max_score: 0,
            player_one: Paddle::default(),
            player_two: Paddle::default(),
            ball: Ball::default(),
            tick: 0,
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::One => &self.player_one,
            Side::Two => &self.player_two,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::One => &mut self.player_one,
            Side::Two => &mut self.player_two,
        }
    }

    /// Highest y a paddle on `side` may reach without leaving the canvas.
    pub fn paddle_max_y(&self, side: Side) -> f64 {
        (self.canvas.height - self.paddle(side).height).max(0.0)
    }
}
