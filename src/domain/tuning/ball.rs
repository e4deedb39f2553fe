/// Gameplay tuning for the ball.
///
/// All lengths and speeds are expressed as multiples of the canvas scale unit.

#[derive(Debug, Clone, Copy)]
pub struct BallTuning {
    /// Ball side length in scale units.
    pub size_ratio: f64,

    /// Launch speed in scale units per tick.
    pub speed_ratio: f64,

    /// Launch speed used when one side is driven by the AI policy.
    pub ai_speed_ratio: f64,

    /// Speed multiplier applied on every paddle strike.
    pub accel: f64,

    /// Maximum deflection in radians for a strike at the paddle tip.
    pub bounce_factor: f64,

    /// Half-width of the random launch cone, in radians from horizontal.
    pub launch_cone: f64,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            size_ratio: 1.0,
            speed_ratio: 0.8,
            ai_speed_ratio: 0.7,
            accel: 1.05,
            bounce_factor: 0.75,
            launch_cone: std::f64::consts::FRAC_PI_3,
        }
    }
}
