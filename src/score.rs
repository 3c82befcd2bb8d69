// Confidence score calculation. The score carries no real evaluative
// meaning; it exists so downstream gateways in the process model have a
// number to branch on. The fixed variant pins it below every approval
// threshold, the random variant spreads jobs across branches.
use rand::Rng;

/// Score reported by the fixed-mode worker. Low enough to force the
/// auto-approval branch in the evaluation process.
pub const FIXED_CONFIDENCE_SCORE: f64 = 0.2;

/// How the worker produces a confidence score for each job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreMode {
    /// Always report the given score.
    Fixed(f64),
    /// Draw uniformly from `[0, 1)` per job.
    Random,
}

impl ScoreMode {
    /// Produce one score. Every value returned lies in `[0, 1)` as long as
    /// `Fixed` is constructed with an in-range constant.
    pub fn sample(&self) -> f64 {
        match self {
            ScoreMode::Fixed(score) => *score,
            ScoreMode::Random => rand::thread_rng().gen_range(0.0..1.0),
        }
    }
}

impl Default for ScoreMode {
    fn default() -> Self {
        ScoreMode::Fixed(FIXED_CONFIDENCE_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_mode_always_returns_its_constant() {
        let mode = ScoreMode::Fixed(FIXED_CONFIDENCE_SCORE);
        for _ in 0..100 {
            assert_eq!(mode.sample(), 0.2);
        }
    }

    #[test]
    fn default_mode_is_the_fixed_auto_approval_score() {
        assert_eq!(ScoreMode::default(), ScoreMode::Fixed(0.2));
        assert_eq!(ScoreMode::default().sample(), 0.2);
    }

    #[test]
    fn random_mode_stays_in_the_half_open_unit_interval() {
        let mode = ScoreMode::Random;
        for _ in 0..10_000 {
            let score = mode.sample();
            assert!((0.0..1.0).contains(&score), "score out of range: {}", score);
        }
    }

    #[test]
    fn random_mode_actually_varies() {
        let mode = ScoreMode::Random;
        let first = mode.sample();
        // 1000 identical draws from a uniform f64 would mean a broken RNG.
        let all_equal = (0..1000).all(|_| mode.sample() == first);
        assert!(!all_equal, "random scores never varied");
    }
}
