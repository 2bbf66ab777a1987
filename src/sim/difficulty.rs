//! Difficulty curve
//!
//! Maps the running platform counter to a difficulty scalar, and the scalar to
//! the gap and height-change ranges used by the course generator.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::tuning::Tuning;

/// Difficulty scalar for a platform index (step function in [0.1, 0.9])
pub fn difficulty(platform_index: u32) -> f32 {
    match platform_index {
        0..5 => 0.1,
        5..10 => 0.3,
        10..20 => 0.5,
        20..30 => 0.7,
        _ => 0.9,
    }
}

/// Horizontal gap between consecutive platforms
pub fn gap_for_difficulty(difficulty: f32, tuning: &Tuning) -> f32 {
    tuning.min_gap + (tuning.max_gap - tuning.min_gap) * difficulty
}

/// Largest vertical step allowed at a difficulty
pub fn height_change_range(difficulty: f32, tuning: &Tuning) -> f32 {
    tuning.min_height_change + (tuning.max_height_change - tuning.min_height_change) * difficulty
}

/// Signed vertical step, uniform in [-range, range)
pub fn height_change_for_difficulty(
    difficulty: f32,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
) -> f32 {
    rng.signed(height_change_range(difficulty, tuning))
}

/// Display bucket for the debug overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyTier {
    Easy,
    Normal,
    Medium,
    Hard,
    Hell,
}

impl DifficultyTier {
    pub fn from_difficulty(difficulty: f32) -> Self {
        if difficulty < 0.2 {
            DifficultyTier::Easy
        } else if difficulty < 0.4 {
            DifficultyTier::Normal
        } else if difficulty < 0.6 {
            DifficultyTier::Medium
        } else if difficulty < 0.8 {
            DifficultyTier::Hard
        } else {
            DifficultyTier::Hell
        }
    }

    pub fn for_platform(platform_index: u32) -> Self {
        Self::from_difficulty(difficulty(platform_index))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Normal => "Normal",
            DifficultyTier::Medium => "Medium",
            DifficultyTier::Hard => "Hard",
            DifficultyTier::Hell => "Hell",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedSource;

    #[test]
    fn test_step_boundaries() {
        assert_eq!(difficulty(0), 0.1);
        assert_eq!(difficulty(4), 0.1);
        assert_eq!(difficulty(5), 0.3);
        assert_eq!(difficulty(9), 0.3);
        assert_eq!(difficulty(10), 0.5);
        assert_eq!(difficulty(19), 0.5);
        assert_eq!(difficulty(20), 0.7);
        assert_eq!(difficulty(29), 0.7);
        assert_eq!(difficulty(30), 0.9);
        assert_eq!(difficulty(u32::MAX), 0.9);
    }

    #[test]
    fn test_gap_scales_with_difficulty() {
        let tuning = Tuning::default();
        assert!((gap_for_difficulty(0.1, &tuning) - 108.0).abs() < 1e-4);
        assert!((gap_for_difficulty(0.9, &tuning) - 172.0).abs() < 1e-4);
        assert_eq!(gap_for_difficulty(0.0, &tuning), tuning.min_gap);
        assert_eq!(gap_for_difficulty(1.0, &tuning), tuning.max_gap);
    }

    #[test]
    fn test_height_change_extremes() {
        let tuning = Tuning::default();
        // range at 0.5 = 20 + 60 * 0.5 = 50
        let mut low = ScriptedSource::constant(0.0);
        assert!((height_change_for_difficulty(0.5, &tuning, &mut low) + 50.0).abs() < 1e-4);
        let mut mid = ScriptedSource::constant(0.5);
        assert_eq!(height_change_for_difficulty(0.5, &tuning, &mut mid), 0.0);
        let mut high = ScriptedSource::constant(0.75);
        assert!((height_change_for_difficulty(0.5, &tuning, &mut high) - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(DifficultyTier::for_platform(0), DifficultyTier::Easy);
        assert_eq!(DifficultyTier::for_platform(7), DifficultyTier::Normal);
        assert_eq!(DifficultyTier::for_platform(15), DifficultyTier::Medium);
        assert_eq!(DifficultyTier::for_platform(25), DifficultyTier::Hard);
        assert_eq!(DifficultyTier::for_platform(31), DifficultyTier::Hell);
        assert_eq!(DifficultyTier::Hell.as_str(), "Hell");
    }
}
