// Gameplay tuning, kept apart from runtime/server configuration.

pub mod ball;
pub mod paddle;

/// Canvas dimension divisor used to derive the shared scale unit.
pub const SCALE_DIVISOR: f64 = 45.0;

/// Smallest canvas side accepted at initialization (yields a scale of 1).
pub const MIN_CANVAS_DIM: f64 = SCALE_DIVISOR;

/// Target score for regular matches.
pub const DEFAULT_MAX_SCORE: u32 = 10;

/// Target score for tournament matches.
pub const TOURNAMENT_MAX_SCORE: u32 = 5;
