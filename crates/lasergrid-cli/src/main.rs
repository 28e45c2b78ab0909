//! Command-line front end for the puzzle generator.

use clap::{Parser, ValueEnum};
use lasergrid_core::{
    Difficulty, GenerationMetadata, Generator, GeneratorOptions, InMemoryUniquenessRegistry,
    Material, Position, Puzzle,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lasergrid", version, about = "Generate laser-grid puzzles")]
struct Args {
    /// Difficulty tier to generate
    #[arg(short, long, value_enum, default_value_t = DifficultyArg::Easy)]
    difficulty: DifficultyArg,

    /// Seed for reproducible generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of puzzles to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Emit puzzles as JSON instead of an ASCII board
    #[arg(long)]
    json: bool,

    /// Fail instead of serving a legacy fallback puzzle
    #[arg(long)]
    no_fallback: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let options = GeneratorOptions {
        enable_fallback: !args.no_fallback,
        ..GeneratorOptions::default()
    };
    let mut generator = Generator::with_options(options)
        .with_registry(Arc::new(InMemoryUniquenessRegistry::new()));
    if let Some(seed) = args.seed {
        generator = generator.seeded(seed);
    }

    for i in 0..args.count {
        let request_id = format!("cli-{i}");
        match generator.generate_detailed(args.difficulty.into(), &request_id) {
            Ok((puzzle, metadata)) => {
                if args.json {
                    let line = serde_json::to_string_pretty(&puzzle)
                        .expect("puzzle serializes to JSON");
                    println!("{line}");
                } else {
                    print_board(&puzzle, &metadata);
                }
            }
            Err(err) => {
                eprintln!("generation failed: {err}");
                std::process::exit(1);
            }
        }
    }
}

fn material_symbol(material: Material) -> char {
    match material {
        Material::Mirror { angle: 0 } => '-',
        Material::Mirror { angle: 45 } => '/',
        Material::Mirror { angle: 90 } => '|',
        Material::Mirror { .. } => '\\',
        Material::Water => 'w',
        Material::Glass => 'g',
        Material::Metal => '#',
        Material::Absorber => '@',
    }
}

fn print_board(puzzle: &Puzzle, metadata: &GenerationMetadata) {
    let size = puzzle.grid_size;
    let mut board = vec![vec!['.'; size]; size];
    for pos in puzzle.solution_path.positions() {
        board[pos.row][pos.col] = '*';
    }
    for (pos, material) in puzzle.materials.iter() {
        board[pos.row][pos.col] = material_symbol(*material);
    }
    let mark = |board: &mut Vec<Vec<char>>, pos: Position, c| board[pos.row][pos.col] = c;
    mark(&mut board, puzzle.entry, 'E');
    mark(&mut board, puzzle.solution, 'X');

    println!(
        "{} ({}, {}x{}, confidence {})",
        puzzle.id, puzzle.difficulty, size, size, puzzle.confidence_score
    );
    for row in board {
        println!("  {}", row.into_iter().collect::<String>());
    }
    println!(
        "  attempts {} in {} ms, {} reflections, spacing {}{}",
        metadata.attempts,
        metadata.elapsed_ms,
        metadata.path_complexity,
        metadata.spacing_distance,
        if metadata.fallback_used {
            ", legacy fallback"
        } else {
            ""
        }
    );
}
