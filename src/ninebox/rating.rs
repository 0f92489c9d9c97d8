//! Conversion from a normalized axis score to the discrete 1-3 grid rating.

use tracing::warn;

/// Scores strictly below this land in band 1.
pub const LOW_BAND_CEILING: f64 = 0.33;
/// Scores strictly below this (and at least `LOW_BAND_CEILING`) land in band 2.
pub const MID_BAND_CEILING: f64 = 0.67;

/// Total function over [0, 1]. Scores outside the range indicate an upstream
/// invariant violation and are clamped rather than propagated.
pub fn rating_for_score(score: f64) -> u8 {
    let score = if (0.0..=1.0).contains(&score) {
        score
    } else {
        warn!(score, "axis score outside [0, 1], clamping before rating");
        score.clamp(0.0, 1.0)
    };

    if score < LOW_BAND_CEILING {
        1
    } else if score < MID_BAND_CEILING {
        2
    } else {
        3
    }
}
