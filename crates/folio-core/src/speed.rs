//! Global animation speed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Speed multiplier applied to the time fed into every effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Time multiplier.
    pub const fn factor(self) -> f32 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 1.5,
        }
    }

    /// Scale a wall-clock delta into animation time.
    pub fn scale(self, delta: Duration) -> Duration {
        Duration::from_nanos((delta.as_nanos() as f64 * self.factor() as f64) as u64)
    }

    /// Next speed in the cycle.
    pub const fn next(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }
}
