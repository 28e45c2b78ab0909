use serde::{Deserialize, Serialize};

/// Difficulty tier of a puzzle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// The next-easier tier, used by the orchestrator's adaptive degradation.
    pub fn easier(&self) -> Option<Difficulty> {
        match self {
            Difficulty::Easy => None,
            Difficulty::Medium => Some(Difficulty::Easy),
            Difficulty::Hard => Some(Difficulty::Medium),
        }
    }

    pub fn all_levels() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }

    pub(crate) fn tier_index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Per-difficulty generation constraints.
///
/// Owned by the caller in production; the constructors here carry the default
/// tuning for each tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub difficulty: Difficulty,
    /// Side length of the square grid.
    pub grid_size: usize,
    /// Score awarded for a clean solve.
    pub base_score: u32,
    /// Player-facing time budget in seconds.
    pub max_time_secs: u32,
    /// Target fraction of cells holding a material.
    pub material_density: f64,
    /// Minimum Manhattan distance between entry and exit.
    pub min_distance: usize,
    /// Minimum reflections the solution path should make.
    pub min_reflections: usize,
    /// Preferred upper bound on solution reflections.
    pub preferred_reflections: usize,
}

impl DifficultyConfig {
    pub fn easy() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            grid_size: 6,
            base_score: 100,
            max_time_secs: 120,
            material_density: 0.15,
            min_distance: 4,
            min_reflections: 1,
            preferred_reflections: 2,
        }
    }

    pub fn medium() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            grid_size: 8,
            base_score: 250,
            max_time_secs: 240,
            material_density: 0.20,
            min_distance: 6,
            min_reflections: 2,
            preferred_reflections: 4,
        }
    }

    pub fn hard() -> Self {
        Self {
            difficulty: Difficulty::Hard,
            grid_size: 10,
            base_score: 500,
            max_time_secs: 360,
            material_density: 0.25,
            min_distance: 8,
            min_reflections: 3,
            preferred_reflections: 6,
        }
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::easy(),
            Difficulty::Medium => Self::medium(),
            Difficulty::Hard => Self::hard(),
        }
    }

    /// Whether the validator's alternate-path search also probes every other
    /// boundary position, not just the entry's other directions.
    pub fn thorough_search(&self) -> bool {
        self.difficulty != Difficulty::Easy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degradation_ladder() {
        assert_eq!(Difficulty::Hard.easier(), Some(Difficulty::Medium));
        assert_eq!(Difficulty::Medium.easier(), Some(Difficulty::Easy));
        assert_eq!(Difficulty::Easy.easier(), None);
    }

    #[test]
    fn configs_scale_with_difficulty() {
        let easy = DifficultyConfig::easy();
        let medium = DifficultyConfig::medium();
        let hard = DifficultyConfig::hard();
        assert!(easy.grid_size < medium.grid_size);
        assert!(medium.grid_size < hard.grid_size);
        assert!(easy.min_distance < hard.min_distance);
        assert!(easy.preferred_reflections < hard.preferred_reflections);
        assert!(!easy.thorough_search());
        assert!(hard.thorough_search());
    }
}
