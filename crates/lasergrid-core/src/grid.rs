use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A cell coordinate on the square grid. `(0, 0)` is the top-left corner.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan_distance(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether this cell lies on the outer edge of a `size`-cell grid.
    pub fn is_boundary(&self, size: usize) -> bool {
        self.row == 0 || self.col == 0 || self.row == size - 1 || self.col == size - 1
    }

    pub fn is_corner(&self, size: usize) -> bool {
        (self.row == 0 || self.row == size - 1) && (self.col == 0 || self.col == size - 1)
    }

    /// The boundary edge this cell sits on. Corner cells resolve to their row
    /// edge so that the result is deterministic.
    pub fn boundary_edge(&self, size: usize) -> Option<Edge> {
        if self.row == 0 {
            Some(Edge::Top)
        } else if self.row == size - 1 {
            Some(Edge::Bottom)
        } else if self.col == 0 {
            Some(Edge::Left)
        } else if self.col == size - 1 {
            Some(Edge::Right)
        } else {
            None
        }
    }

    /// One cell over in `direction`, or `None` when that leaves the grid.
    pub fn step(&self, direction: Direction, size: usize) -> Option<Position> {
        let (dr, dc) = direction.delta();
        let row = self.row as isize + dr;
        let col = self.col as isize + dc;
        if row >= 0 && col >= 0 && (row as usize) < size && (col as usize) < size {
            Some(Position::new(row as usize, col as usize))
        } else {
            None
        }
    }
}

/// One of the four outer edges of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub fn is_opposite(&self, other: Edge) -> bool {
        matches!(
            (self, other),
            (Edge::Top, Edge::Bottom)
                | (Edge::Bottom, Edge::Top)
                | (Edge::Left, Edge::Right)
                | (Edge::Right, Edge::Left)
        )
    }

    /// The orthogonal direction pointing from this edge into the grid.
    pub fn inward_direction(&self) -> Direction {
        match self {
            Edge::Top => Direction::South,
            Edge::Bottom => Direction::North,
            Edge::Left => Direction::East,
            Edge::Right => Direction::West,
        }
    }
}

/// Beam travel direction. Degrees are measured counter-clockwise from East,
/// in 45-degree steps, which makes mirror reflection plain integer
/// arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    /// All eight compass directions, ordered by angle.
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::NorthEast,
        Direction::North,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    pub fn degrees(self) -> u16 {
        match self {
            Direction::East => 0,
            Direction::NorthEast => 45,
            Direction::North => 90,
            Direction::NorthWest => 135,
            Direction::West => 180,
            Direction::SouthWest => 225,
            Direction::South => 270,
            Direction::SouthEast => 315,
        }
    }

    /// Direction for an angle in degrees, snapped down to the nearest
    /// 45-degree step.
    pub fn from_degrees(degrees: u16) -> Direction {
        Direction::ALL[((degrees % 360) / 45) as usize % 8]
    }

    /// Row/column delta for one step. Rows grow downward.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::East => (0, 1),
            Direction::NorthEast => (-1, 1),
            Direction::North => (-1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::SouthWest => (1, -1),
            Direction::South => (1, 0),
            Direction::SouthEast => (1, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        Direction::from_degrees(self.degrees() + 180)
    }

    pub fn is_orthogonal(self) -> bool {
        self.degrees() % 90 == 0
    }
}

/// Physical contents of a grid cell. A cell holds at most one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Material {
    Mirror { angle: u16 },
    Water,
    Glass,
    Metal,
    Absorber,
}

impl Material {
    /// Mirror surface angles the generator places.
    pub const MIRROR_ANGLES: [u16; 4] = [0, 45, 90, 135];
}

/// Sparse square grid of placed materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialGrid {
    size: usize,
    cells: BTreeMap<Position, Material>,
}

impl MaterialGrid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: BTreeMap::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn get(&self, pos: Position) -> Option<Material> {
        self.cells.get(&pos).copied()
    }

    /// Place a material. Returns false when the cell is out of bounds or
    /// already claimed; the grid is unchanged in that case.
    pub fn insert(&mut self, pos: Position, material: Material) -> bool {
        if !self.in_bounds(pos) || self.cells.contains_key(&pos) {
            return false;
        }
        self.cells.insert(pos, material);
        true
    }

    pub fn remove(&mut self, pos: Position) -> Option<Material> {
        self.cells.remove(&pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Fraction of cells holding a material.
    pub fn density(&self) -> f64 {
        self.cells.len() as f64 / (self.size * self.size) as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Position, &Material)> {
        self.cells.iter()
    }
}

/// All boundary cells of a `size`-cell grid in row-major order.
pub fn boundary_positions(size: usize) -> Vec<Position> {
    let mut positions = Vec::with_capacity(4 * size.saturating_sub(1));
    for row in 0..size {
        for col in 0..size {
            let pos = Position::new(row, col);
            if pos.is_boundary(size) {
                positions.push(pos);
            }
        }
    }
    positions
}
