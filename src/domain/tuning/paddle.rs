/// Gameplay tuning for paddles.

#[derive(Debug, Clone, Copy)]
pub struct PaddleTuning {
    /// Paddle width in scale units.
    pub width_ratio: f64,

    /// Paddle height in scale units.
    pub height_ratio: f64,

    /// Distance moved per command, in scale units.
    pub speed_ratio: f64,

    /// Left paddle x position in pixels.
    pub left_x: f64,

    /// Right paddle inset from the right canvas edge in pixels.
    pub right_inset: f64,

    /// Initial y as a fraction of canvas height.
    pub start_y_ratio: f64,
}

impl Default for PaddleTuning {
    fn default() -> Self {
        Self {
            width_ratio: 1.0,
            height_ratio: 9.0,
            speed_ratio: 1.0,
            left_x: 5.0,
            right_inset: 20.0,
            start_y_ratio: 0.4,
        }
    }
}
