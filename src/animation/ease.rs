use serde::{Deserialize, Serialize};

/// Easing curves, named after their GSAP equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    #[serde(rename = "none", alias = "linear")]
    Linear,
    /// Quadratic ease-out. GSAP's default curve.
    #[default]
    #[serde(rename = "power1.out")]
    Power1Out,
    /// Cubic ease-in-out.
    #[serde(rename = "power2.inOut")]
    Power2InOut,
}

impl Ease {
    /// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}
