//! Procedural laser-grid puzzle generation.
//!
//! A puzzle is a square grid of optical materials, a boundary entry cell,
//! and the single boundary exit a beam fired from the entry reaches. The
//! generator works backwards from a guarantee: it plans the solution path
//! first, realizes it with materials, blocks competing routes, and proves
//! the result with a validator before returning it. Difficulty degradation
//! and a legacy forward-generation fallback make `Generator::generate`
//! effectively total.
//!
//! ```
//! use lasergrid_core::{Difficulty, Generator};
//!
//! let mut generator = Generator::with_seed(42);
//! let puzzle = generator.generate(Difficulty::Easy, "demo").unwrap();
//! assert_eq!(puzzle.grid_size, 6);
//! assert!(puzzle.solution.is_boundary(puzzle.grid_size));
//! ```

pub mod error;
pub mod generator;
pub mod grid;
pub mod hints;
pub mod puzzle;
pub mod registry;
mod rng;
pub mod tracer;
pub mod types;
pub mod validator;

pub use error::GenerateError;
pub use generator::{GenerationMetadata, Generator, GeneratorOptions, DEFAULT_FALLBACK_CONFIDENCE};
pub use grid::{boundary_positions, Direction, Edge, Material, MaterialGrid, Position};
pub use hints::segment_hints;
pub use puzzle::{puzzle_content_hash, HintLevel, LaserPath, PathSegment, Puzzle};
pub use registry::{InMemoryUniquenessRegistry, NullRegistry, UniquenessRegistry};
pub use tracer::{entry_direction, interact, reflect, trace, Interaction};
pub use types::{Difficulty, DifficultyConfig};
pub use validator::{ValidationIssue, ValidationResult, Validator};
