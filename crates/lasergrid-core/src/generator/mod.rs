//! Generation orchestrator.
//!
//! Drives the guaranteed pipeline end to end: candidate pair selection,
//! inverse path planning, material placement, density padding, alternate
//! blocking, and validation. Retries across attempts, degrades difficulty
//! when a tier keeps failing, and falls back to legacy forward generation as
//! a last resort so callers always get a playable puzzle.

mod legacy;
mod placer;
mod planner;
mod selector;

use crate::error::GenerateError;
use crate::hints::segment_hints;
use crate::puzzle::{puzzle_content_hash, Puzzle};
use crate::registry::{NullRegistry, UniquenessRegistry};
use crate::rng::SeededRng;
use crate::tracer::{entry_direction, trace};
use crate::types::{Difficulty, DifficultyConfig};
use crate::validator::{ValidationIssue, ValidationResult, Validator};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Confidence assigned to legacy fallback puzzles.
pub const DEFAULT_FALLBACK_CONFIDENCE: u8 = 50;

/// Hex digits of the content hash appended to the request id.
const ID_HASH_LEN: usize = 12;

/// How many top-ranked candidate pairs an attempt draws from.
const CANDIDATE_WINDOW: usize = 16;

/// Orchestrator tuning knobs.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Guaranteed-pipeline attempts before fallback.
    pub max_attempts: usize,
    /// Wall-clock budget for one `generate` call.
    pub max_time_ms: u64,
    /// Candidate pairs tried per attempt.
    pub candidates_per_attempt: usize,
    /// Consecutive failures before the first difficulty degradation; each
    /// further degradation needs two more.
    pub degrade_after: usize,
    /// Whether legacy forward generation may serve as a last resort.
    pub enable_fallback: bool,
    /// Minimum validator confidence a guaranteed puzzle must reach.
    pub confidence_threshold: u8,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            max_attempts: 9,
            max_time_ms: 5_000,
            candidates_per_attempt: 5,
            degrade_after: 3,
            enable_fallback: true,
            confidence_threshold: 70,
        }
    }
}

/// Diagnostics for one `generate_detailed` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationMetadata {
    pub attempts: usize,
    pub elapsed_ms: u64,
    pub confidence_score: u8,
    /// True when the puzzle passed validation with a unique solution.
    pub validation_passed: bool,
    pub spacing_distance: usize,
    /// Reflections along the solution path.
    pub path_complexity: usize,
    pub fallback_used: bool,
    /// The originally requested tier when degradation changed the effective
    /// one.
    pub adapted_from_difficulty: Option<Difficulty>,
}

pub struct Generator {
    options: GeneratorOptions,
    validator: Validator,
    registry: Arc<dyn UniquenessRegistry>,
    rng: SeededRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Self::with_options(GeneratorOptions::default())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new().seeded(seed)
    }

    pub fn with_options(options: GeneratorOptions) -> Self {
        Self {
            options,
            validator: Validator::new(),
            registry: Arc::new(NullRegistry),
            rng: SeededRng::new(),
        }
    }

    /// Replace the RNG with a seeded one for reproducible generation.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = SeededRng::with_seed(seed);
        self
    }

    /// Share a uniqueness registry so repeated calls avoid identical grids.
    pub fn with_registry(mut self, registry: Arc<dyn UniquenessRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generate a puzzle at `difficulty`, degrading and falling back as
    /// configured.
    pub fn generate(
        &mut self,
        difficulty: Difficulty,
        request_id: &str,
    ) -> Result<Puzzle, GenerateError> {
        self.generate_detailed(difficulty, request_id)
            .map(|(puzzle, _)| puzzle)
    }

    /// Like `generate`, also returning per-call diagnostics.
    pub fn generate_detailed(
        &mut self,
        difficulty: Difficulty,
        request_id: &str,
    ) -> Result<(Puzzle, GenerationMetadata), GenerateError> {
        let started = Instant::now();
        let mut effective = difficulty;
        let mut attempts = 0;
        let mut timed_out = false;

        while attempts < self.options.max_attempts {
            if started.elapsed().as_millis() as u64 >= self.options.max_time_ms {
                timed_out = true;
                break;
            }
            attempts += 1;
            let config = DifficultyConfig::for_difficulty(effective);
            match self.attempt(&config, difficulty, request_id) {
                Ok((puzzle, result)) => {
                    info!(
                        id = %puzzle.id,
                        %difficulty,
                        attempts,
                        confidence = puzzle.confidence_score,
                        "generated guaranteed puzzle"
                    );
                    let metadata = self.metadata(
                        &puzzle,
                        &result,
                        attempts,
                        started,
                        difficulty,
                        effective,
                    );
                    return Ok((puzzle, metadata));
                }
                Err(reason) => {
                    debug!(%reason, attempts, %effective, "attempt failed");
                }
            }

            let steps_degraded = difficulty.tier_index() - effective.tier_index();
            if attempts >= self.options.degrade_after + 2 * steps_degraded {
                if let Some(easier) = effective.easier() {
                    warn!(from = %effective, to = %easier, attempts, "degrading difficulty");
                    effective = easier;
                }
            }
        }

        if self.options.enable_fallback {
            let config = DifficultyConfig::for_difficulty(effective);
            if let Some((puzzle, result)) = self.fallback(&config, difficulty, request_id) {
                warn!(id = %puzzle.id, %difficulty, attempts, "serving legacy fallback puzzle");
                let metadata = self.metadata(
                    &puzzle,
                    &result,
                    attempts,
                    started,
                    difficulty,
                    effective,
                );
                return Ok((puzzle, metadata));
            }
        }

        if timed_out {
            Err(GenerateError::Timeout {
                elapsed_ms: started.elapsed().as_millis() as u64,
            })
        } else {
            Err(GenerateError::Exhausted {
                difficulty,
                attempts,
            })
        }
    }

    /// One guaranteed-pipeline attempt at the effective difficulty. The
    /// error reports why the last candidate pair was rejected; the caller
    /// logs it and retries.
    fn attempt(
        &mut self,
        config: &DifficultyConfig,
        requested: Difficulty,
        request_id: &str,
    ) -> Result<(Puzzle, ValidationResult), GenerateError> {
        let size = config.grid_size;
        let pairs = selector::select_candidate_pairs(size, config.min_distance);
        if pairs.is_empty() {
            return Err(GenerateError::SpacingFailure(config.difficulty));
        }
        let window = pairs.len().min(CANDIDATE_WINDOW);
        let mut last = GenerateError::ValidationFailure("no candidate pair tried".into());

        for _ in 0..self.options.candidates_per_attempt {
            let (entry, exit) = pairs[self.rng.next_usize(window)];
            let Some(plan) = planner::plan_path(entry, exit, config, &mut self.rng) else {
                last = GenerateError::MaterialPlacementFailure(format!(
                    "no path plan from ({},{}) to ({},{})",
                    entry.row, entry.col, exit.row, exit.col
                ));
                continue;
            };
            let Some(mut materials) = placer::place_plan(&plan, entry, exit, size, &mut self.rng)
            else {
                last = GenerateError::MaterialPlacementFailure(
                    "planned turn cell already claimed".into(),
                );
                continue;
            };
            let Some(dir) = entry_direction(entry, size) else {
                continue;
            };
            if trace(&materials, entry, dir).exit != Some(exit) {
                last = GenerateError::NoSolution;
                continue;
            }

            placer::pad_to_density(&mut materials, entry, exit, config, &mut self.rng);
            let open = placer::block_alternates(&mut materials, entry, exit, config, &mut self.rng);
            if open > 0 {
                debug!(open, "competing routes survived blocking");
            }

            let result = self.validator.validate(&materials, entry, exit, config);
            if !result.is_valid {
                last = rejection_error(&result);
                continue;
            }
            if !result.has_unique_solution {
                last = GenerateError::ValidationFailure(format!(
                    "{} competing solutions",
                    result.alternative_count
                ));
                continue;
            }
            if result.confidence_score < self.options.confidence_threshold {
                last = GenerateError::ValidationFailure(format!(
                    "confidence {} below threshold {}",
                    result.confidence_score, self.options.confidence_threshold
                ));
                continue;
            }
            let hash = puzzle_content_hash(&materials, entry, exit);
            if self.registry.has_hash(&hash) {
                last = GenerateError::ValidationFailure(
                    "grid duplicates a registered puzzle".into(),
                );
                continue;
            }

            let path = trace(&materials, entry, dir);
            let hints = segment_hints(&path);
            let puzzle = Puzzle {
                id: format!("{request_id}-{}", &hash[..ID_HASH_LEN]),
                difficulty: requested,
                grid_size: size,
                material_density: materials.density(),
                materials,
                entry,
                solution: exit,
                solution_path: path,
                hints,
                confidence_score: result.confidence_score,
                fallback_used: false,
            };
            self.registry.add_hash(hash);
            return Ok((puzzle, result));
        }
        Err(last)
    }

    fn fallback(
        &mut self,
        config: &DifficultyConfig,
        requested: Difficulty,
        request_id: &str,
    ) -> Option<(Puzzle, ValidationResult)> {
        let generated = legacy::generate(config, &mut self.rng)?;
        let result =
            self.validator
                .validate(&generated.materials, generated.entry, generated.exit, config);
        let hash = puzzle_content_hash(&generated.materials, generated.entry, generated.exit);
        let hints = segment_hints(&generated.path);
        let puzzle = Puzzle {
            id: format!("{request_id}-{}", &hash[..ID_HASH_LEN]),
            difficulty: requested,
            grid_size: config.grid_size,
            material_density: generated.materials.density(),
            materials: generated.materials,
            entry: generated.entry,
            solution: generated.exit,
            solution_path: generated.path,
            hints,
            confidence_score: DEFAULT_FALLBACK_CONFIDENCE,
            fallback_used: true,
        };
        self.registry.add_hash(hash);
        Some((puzzle, result))
    }

    fn metadata(
        &self,
        puzzle: &Puzzle,
        result: &ValidationResult,
        attempts: usize,
        started: Instant,
        requested: Difficulty,
        effective: Difficulty,
    ) -> GenerationMetadata {
        GenerationMetadata {
            attempts,
            elapsed_ms: started.elapsed().as_millis() as u64,
            confidence_score: puzzle.confidence_score,
            validation_passed: result.is_valid && result.has_unique_solution,
            spacing_distance: puzzle.entry.manhattan_distance(&puzzle.solution),
            path_complexity: puzzle.solution_path.reflection_count(),
            fallback_used: puzzle.fallback_used,
            adapted_from_difficulty: (effective != requested).then_some(requested),
        }
    }
}

/// The error kind for the first critical issue a rejected candidate carries.
fn rejection_error(result: &ValidationResult) -> GenerateError {
    for issue in &result.issues {
        match issue {
            ValidationIssue::PhysicsViolation { position, .. } => {
                return GenerateError::PhysicsViolation {
                    position: *position,
                }
            }
            ValidationIssue::InfiniteLoop { .. } => return GenerateError::InfiniteLoop,
            ValidationIssue::NoSolution { .. } => return GenerateError::NoSolution,
            ValidationIssue::MultipleSolutions { .. } => {}
        }
    }
    GenerateError::ValidationFailure("critical validation issue".into())
}
