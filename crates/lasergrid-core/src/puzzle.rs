use crate::grid::{Direction, Material, MaterialGrid, Position};
use crate::types::Difficulty;
use serde::{Deserialize, Serialize};

/// One straight step of the beam between two adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub start: Position,
    pub end: Position,
    pub direction: Direction,
    /// Material in the cell the beam stepped into, if any.
    pub material: Option<Material>,
}

/// A traced beam path through the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaserPath {
    pub segments: Vec<PathSegment>,
    /// Boundary cell the beam left the grid from, or `None` when absorbed or
    /// loop-bounded.
    pub exit: Option<Position>,
    /// True when the beam was absorbed or cut off by the loop bound.
    pub terminated: bool,
}

impl LaserPath {
    /// Grid positions touched by the first `count` segments, deduplicated in
    /// first-touch order.
    pub fn positions_up_to(&self, count: usize) -> Vec<Position> {
        let mut seen: Vec<Position> = Vec::new();
        for (i, segment) in self.segments.iter().take(count).enumerate() {
            if i == 0 && !seen.contains(&segment.start) {
                seen.push(segment.start);
            }
            if !seen.contains(&segment.end) {
                seen.push(segment.end);
            }
        }
        seen
    }

    /// All positions the beam touched, deduplicated in first-touch order.
    pub fn positions(&self) -> Vec<Position> {
        self.positions_up_to(self.segments.len())
    }

    /// Number of direction changes along the path.
    pub fn reflection_count(&self) -> usize {
        self.segments
            .windows(2)
            .filter(|pair| pair[0].direction != pair[1].direction)
            .count()
    }

    /// Whether consecutive segments chain end-to-start.
    pub fn is_chained(&self) -> bool {
        self.segments
            .windows(2)
            .all(|pair| pair[0].end == pair[1].start)
    }
}

/// One cumulative hint reveal level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintLevel {
    pub level: u8,
    pub percent: u8,
    pub segments_revealed: usize,
    pub positions: Vec<Position>,
}

/// A generated puzzle. Immutable once returned: hints are derived exactly
/// once from the final solution path and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub difficulty: Difficulty,
    pub grid_size: usize,
    pub materials: MaterialGrid,
    pub entry: Position,
    /// The unique exit the beam reaches from `entry`.
    pub solution: Position,
    pub solution_path: LaserPath,
    pub hints: [HintLevel; 4],
    pub material_density: f64,
    pub confidence_score: u8,
    pub fallback_used: bool,
}

impl Puzzle {
    /// Stable content hash over the grid, entry, and solution. Used as the
    /// validator cache key and the uniqueness-registry key.
    pub fn content_hash(&self) -> String {
        puzzle_content_hash(&self.materials, self.entry, self.solution)
    }
}

/// blake3 hex digest over a canonical byte encoding of a candidate puzzle.
pub fn puzzle_content_hash(materials: &MaterialGrid, entry: Position, exit: Position) -> String {
    let mut hasher = blake3::Hasher::new();
    let mut push_pos = |hasher: &mut blake3::Hasher, pos: Position| {
        hasher.update(&(pos.row as u64).to_le_bytes());
        hasher.update(&(pos.col as u64).to_le_bytes());
    };
    hasher.update(&(materials.size() as u64).to_le_bytes());
    push_pos(&mut hasher, entry);
    push_pos(&mut hasher, exit);
    for (pos, material) in materials.iter() {
        push_pos(&mut hasher, *pos);
        let (tag, angle): (u8, u16) = match material {
            Material::Mirror { angle } => (0, *angle),
            Material::Water => (1, 0),
            Material::Glass => (2, 0),
            Material::Metal => (3, 0),
            Material::Absorber => (4, 0),
        };
        hasher.update(&[tag]);
        hasher.update(&angle.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_path() -> LaserPath {
        let seg = |r1, c1, r2, c2, dir| PathSegment {
            start: Position::new(r1, c1),
            end: Position::new(r2, c2),
            direction: dir,
            material: None,
        };
        LaserPath {
            segments: vec![
                seg(0, 1, 1, 1, Direction::South),
                seg(1, 1, 2, 1, Direction::South),
                seg(2, 1, 2, 2, Direction::East),
            ],
            exit: Some(Position::new(2, 2)),
            terminated: false,
        }
    }

    #[test]
    fn positions_dedup_in_first_touch_order() {
        let path = sample_path();
        assert_eq!(
            path.positions(),
            vec![
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(2, 2),
            ]
        );
        assert_eq!(path.positions_up_to(1).len(), 2);
        assert!(path.positions_up_to(0).is_empty());
    }

    #[test]
    fn reflection_count_counts_turns() {
        let path = sample_path();
        assert_eq!(path.reflection_count(), 1);
        assert!(path.is_chained());
    }

    #[test]
    fn content_hash_is_stable_and_sensitive() {
        let mut grid = MaterialGrid::new(6);
        grid.insert(Position::new(2, 2), Material::Mirror { angle: 45 });
        let entry = Position::new(0, 2);
        let exit = Position::new(2, 0);
        let first = puzzle_content_hash(&grid, entry, exit);
        let again = puzzle_content_hash(&grid, entry, exit);
        assert_eq!(first, again);

        let mut other = grid.clone();
        other.insert(Position::new(4, 4), Material::Metal);
        assert_ne!(first, puzzle_content_hash(&other, entry, exit));
    }
}
