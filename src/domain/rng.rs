// Injectable random source for ball launches.

use rand::Rng;
use rand::rngs::StdRng;

/// Source of uniform samples in `[0, 1)`.
pub trait LaunchRandom: Send {
    fn unit(&mut self) -> f64;
}

impl LaunchRandom for StdRng {
    fn unit(&mut self) -> f64 {
        self.r#gen::<f64>()
    }
}

/// Replays a fixed cycle of samples, for reproducible launches.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    samples: Vec<f64>,
    next: usize,
}

impl SequenceRandom {
    /// Builds a source cycling through `samples`; an empty list yields zeros.
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples, next: 0 }
    }
}

impl LaunchRandom for SequenceRandom {
    fn unit(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let value = self.samples[self.next % self.samples.len()];
        self.next += 1;
        value
    }
}
