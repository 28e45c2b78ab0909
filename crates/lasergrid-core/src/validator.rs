//! Proof step of guaranteed generation.
//!
//! Re-traces a fully materialized candidate, searches for competing routes
//! to the solution exit, replays the physics of every material interaction,
//! and condenses the findings into a 0-100 confidence score. Pure and
//! deterministic: the same candidate always yields the same result, so
//! callers may cache results by `puzzle_content_hash`.

use crate::grid::{boundary_positions, Direction, Material, MaterialGrid, Position};
use crate::puzzle::LaserPath;
use crate::tracer::{entry_direction, interact, step_cap, trace, Interaction};
use crate::types::DifficultyConfig;
use serde::{Deserialize, Serialize};

/// A typed problem found during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// The traced beam does not reach the intended exit.
    NoSolution {
        expected: Position,
        actual: Option<Position>,
    },
    /// Alternate runs also reach the intended exit.
    MultipleSolutions { count: usize },
    /// A material interaction disagrees with the recorded path.
    PhysicsViolation {
        position: Position,
        expected: Direction,
        actual: Direction,
    },
    /// The solution path revisits positions or exceeds the step bound.
    InfiniteLoop { steps: usize },
}

impl ValidationIssue {
    /// Critical issues invalidate the puzzle outright; `MultipleSolutions`
    /// only costs confidence and the uniqueness flag.
    pub fn is_critical(&self) -> bool {
        !matches!(self, ValidationIssue::MultipleSolutions { .. })
    }
}

/// Outcome of validating one candidate puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub has_unique_solution: bool,
    pub alternative_count: usize,
    /// 0-100 heuristic quality rating.
    pub confidence_score: u8,
    pub issues: Vec<ValidationIssue>,
}

/// Stateless validator; all state is per-call.
pub struct Validator;

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a materialized candidate against its intended exit.
    pub fn validate(
        &self,
        materials: &MaterialGrid,
        entry: Position,
        intended_exit: Position,
        config: &DifficultyConfig,
    ) -> ValidationResult {
        let size = config.grid_size;
        let mut issues = Vec::new();
        let mut score: i32 = 100;

        let path = entry_direction(entry, size).map(|dir| trace(materials, entry, dir));

        // Step 1: the canonical trace must land on the intended exit.
        let actual_exit = path.as_ref().and_then(|p| p.exit);
        if actual_exit != Some(intended_exit) {
            issues.push(ValidationIssue::NoSolution {
                expected: intended_exit,
                actual: actual_exit,
            });
            score -= 40;
        }

        // Step 4 (checked early so the issue lands next to NoSolution):
        // loop-bounded canonical paths.
        if let Some(path) = &path {
            let absorbed = path
                .segments
                .last()
                .is_some_and(|s| matches!(s.material, Some(Material::Absorber)));
            let looped = path.terminated && path.exit.is_none() && !absorbed;
            if looped || path.segments.len() >= step_cap(size) {
                issues.push(ValidationIssue::InfiniteLoop {
                    steps: path.segments.len(),
                });
            }
        }

        // Step 2: alternate-path search. A run competes when it reaches the
        // intended exit from a different start or direction.
        let mut alternative_count = 0;
        for (start, dir) in alternate_probes(entry, intended_exit, size, config.thorough_search()) {
            if trace(materials, start, dir).exit == Some(intended_exit) {
                alternative_count += 1;
            }
        }
        if alternative_count > 0 {
            issues.push(ValidationIssue::MultipleSolutions {
                count: alternative_count,
            });
            score -= (10 * alternative_count as i32).min(30);
        }

        // Step 3: physics-compliance replay.
        if let Some(path) = &path {
            let (accuracy, violations) = replay_physics(path);
            if !violations.is_empty() {
                score -= 20;
                issues.extend(violations);
            }
            if accuracy < 0.9 {
                score -= ((0.9 - accuracy) * 100.0).round() as i32;
            }
        }

        // Step 5: small quality bonuses, at most +15 total.
        if let Some(path) = &path {
            let reflections = path.reflection_count();
            if (config.min_reflections..=config.preferred_reflections).contains(&reflections) {
                score += 5;
            }
        }
        let density = materials.density();
        if (density - config.material_density).abs() <= config.material_density * 0.1 {
            score += 5;
        }
        let spacing = entry.manhattan_distance(&intended_exit);
        if entry.is_corner(size)
            || intended_exit.is_corner(size)
            || spacing * 2 >= config.min_distance * 3
        {
            score += 5;
        }

        let is_valid = !issues.iter().any(ValidationIssue::is_critical);
        ValidationResult {
            is_valid,
            has_unique_solution: is_valid && alternative_count == 0,
            alternative_count,
            confidence_score: score.clamp(0, 100) as u8,
            issues,
        }
    }
}

/// The starts and directions the alternate-path search runs: the seven
/// non-canonical compass directions from the entry, and (when `thorough`)
/// every other boundary position with its inferred inward direction.
pub(crate) fn alternate_probes(
    entry: Position,
    exit: Position,
    size: usize,
    thorough: bool,
) -> Vec<(Position, Direction)> {
    let mut probes = Vec::new();
    if let Some(canonical) = entry_direction(entry, size) {
        for dir in Direction::ALL {
            if dir != canonical {
                probes.push((entry, dir));
            }
        }
    }
    if thorough {
        for pos in boundary_positions(size) {
            if pos == entry || pos == exit {
                continue;
            }
            if let Some(dir) = entry_direction(pos, size) {
                probes.push((pos, dir));
            }
        }
    }
    probes
}

/// Recompute the expected outgoing direction at every material the path
/// touches and compare with the recorded next segment. Returns the accuracy
/// ratio and any mismatches.
fn replay_physics(path: &LaserPath) -> (f64, Vec<ValidationIssue>) {
    let mut checked = 0usize;
    let mut matched = 0usize;
    let mut violations = Vec::new();
    for i in 0..path.segments.len() {
        let segment = &path.segments[i];
        let Some(material) = segment.material else {
            continue;
        };
        if let Interaction::Redirect(expected) = interact(material, segment.direction) {
            if let Some(next) = path.segments.get(i + 1) {
                checked += 1;
                if next.direction == expected {
                    matched += 1;
                } else {
                    violations.push(ValidationIssue::PhysicsViolation {
                        position: segment.end,
                        expected,
                        actual: next.direction,
                    });
                }
            }
        }
    }
    let accuracy = if checked == 0 {
        1.0
    } else {
        matched as f64 / checked as f64
    };
    (accuracy, violations)
}
