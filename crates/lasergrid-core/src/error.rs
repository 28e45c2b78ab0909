use crate::grid::Position;
use crate::types::Difficulty;
use thiserror::Error;

/// Failures surfaced by the generation pipeline.
///
/// All variants except `Exhausted` and `Timeout` describe why one attempt
/// was rejected; the orchestrator logs them and recovers via the next
/// candidate pair, the next attempt, or adaptive degradation. Only the two
/// terminal variants reach the caller, and only after fallback is exhausted
/// or disabled.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("no boundary pair satisfies the spacing constraint for {0}")]
    SpacingFailure(Difficulty),

    #[error("material placement failed: {0}")]
    MaterialPlacementFailure(String),

    #[error("physics replay mismatch at {position:?}")]
    PhysicsViolation { position: Position },

    #[error("validation failed: {0}")]
    ValidationFailure(String),

    #[error("generation timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u64 },

    #[error("traced beam never reaches a boundary exit")]
    NoSolution,

    #[error("traced beam is trapped in a loop")]
    InfiniteLoop,

    #[error("generation exhausted after {attempts} attempts for {difficulty}")]
    Exhausted {
        difficulty: Difficulty,
        attempts: usize,
    },
}
