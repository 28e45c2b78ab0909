//! Deterministic forward beam simulation.
//!
//! The tracer is pure: it takes a material grid, a starting cell, and a
//! direction, and returns the beam path. The validator reuses it with
//! arbitrary starting positions for its alternate-path search, so nothing
//! here assumes the canonical entry.

use crate::grid::{Direction, Material, MaterialGrid, Position};
use crate::puzzle::{LaserPath, PathSegment};
use std::collections::HashSet;

/// Fixed surface angle Water resolves to in guaranteed generation.
pub const WATER_SURFACE_ANGLE: u16 = 45;
/// Fixed surface angle Glass resolves to in guaranteed generation.
pub const GLASS_SURFACE_ANGLE: u16 = 135;

/// Outcome of the beam entering an occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Redirect(Direction),
    Absorb,
}

/// Reflect `incoming` across a mirror line at `surface_angle` degrees.
///
/// Angle of incidence equals angle of reflection, which in degree arithmetic
/// is `out = 2 * angle - in (mod 360)`. A beam parallel to the mirror line
/// passes through unchanged; a beam perpendicular to it reverses.
pub fn reflect(incoming: Direction, surface_angle: u16) -> Direction {
    let out = (2 * surface_angle as i32 - incoming.degrees() as i32).rem_euclid(360);
    Direction::from_degrees(out as u16)
}

/// How a beam traveling in `incoming` behaves when it enters a cell holding
/// `material`.
pub fn interact(material: Material, incoming: Direction) -> Interaction {
    match material {
        Material::Mirror { angle } => Interaction::Redirect(reflect(incoming, angle)),
        Material::Water => Interaction::Redirect(reflect(incoming, WATER_SURFACE_ANGLE)),
        Material::Glass => Interaction::Redirect(reflect(incoming, GLASS_SURFACE_ANGLE)),
        Material::Metal => Interaction::Redirect(incoming.opposite()),
        Material::Absorber => Interaction::Absorb,
    }
}

/// Inward beam direction for a boundary cell, inferred from its edge.
/// `None` for interior cells.
pub fn entry_direction(pos: Position, size: usize) -> Option<Direction> {
    pos.boundary_edge(size).map(|edge| edge.inward_direction())
}

/// The mirror surface angle that turns `incoming` into `outgoing`, if one of
/// the four placeable angles does. `None` when no turn is needed or no
/// single mirror realizes it.
pub fn mirror_angle_for_turn(incoming: Direction, outgoing: Direction) -> Option<u16> {
    if incoming == outgoing {
        return None;
    }
    Material::MIRROR_ANGLES
        .into_iter()
        .find(|&angle| reflect(incoming, angle) == outgoing)
}

/// Iteration bound: a beam that makes more steps than this is loop-bounded.
pub fn step_cap(size: usize) -> usize {
    4 * size * size
}

/// Trace a beam through `materials` from `start` heading `direction`.
///
/// Records one segment per cell step. The beam terminates when it leaves the
/// grid (exit = last in-bounds cell), is absorbed, revisits a position, or
/// exceeds the step cap.
pub fn trace(materials: &MaterialGrid, start: Position, direction: Direction) -> LaserPath {
    let size = materials.size();
    let mut segments = Vec::new();
    let mut visited: HashSet<Position> = HashSet::new();
    visited.insert(start);

    let mut pos = start;
    let mut dir = direction;

    if let Some(material) = materials.get(start) {
        match interact(material, dir) {
            Interaction::Absorb => {
                return LaserPath {
                    segments,
                    exit: None,
                    terminated: true,
                }
            }
            Interaction::Redirect(next) => dir = next,
        }
    }

    for _ in 0..step_cap(size) {
        let Some(next) = pos.step(dir, size) else {
            return LaserPath {
                segments,
                exit: Some(pos),
                terminated: false,
            };
        };
        let material = materials.get(next);
        segments.push(PathSegment {
            start: pos,
            end: next,
            direction: dir,
            material,
        });
        if !visited.insert(next) {
            // Revisited position: loop
            return LaserPath {
                segments,
                exit: None,
                terminated: true,
            };
        }
        pos = next;
        if let Some(material) = material {
            match interact(material, dir) {
                Interaction::Absorb => {
                    return LaserPath {
                        segments,
                        exit: None,
                        terminated: true,
                    }
                }
                Interaction::Redirect(next_dir) => dir = next_dir,
            }
        }
    }

    LaserPath {
        segments,
        exit: None,
        terminated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_pass_through_empty_grid() {
        let grid = MaterialGrid::new(6);
        let path = trace(&grid, Position::new(0, 0), Direction::South);
        assert_eq!(path.exit, Some(Position::new(5, 0)));
        assert!(!path.terminated);
        assert_eq!(path.segments.len(), 5);
        assert!(path.is_chained());
    }

    #[test]
    fn mirror_45_turns_south_into_west() {
        let mut grid = MaterialGrid::new(6);
        grid.insert(Position::new(2, 1), Material::Mirror { angle: 45 });
        let path = trace(&grid, Position::new(0, 1), Direction::South);
        // South (270) across a 45-degree line comes out at 180: West.
        assert_eq!(path.exit, Some(Position::new(2, 0)));
        assert_eq!(path.segments[1].end, Position::new(2, 1));
        assert_eq!(path.segments[2].direction, Direction::West);
    }

    #[test]
    fn mirror_90_reflection_rule() {
        let mut grid = MaterialGrid::new(6);
        grid.insert(Position::new(1, 1), Material::Mirror { angle: 90 });
        let path = trace(&grid, Position::new(0, 1), Direction::South);
        assert_eq!(path.segments[0].end, Position::new(1, 1));
        let turned = reflect(Direction::South, 90);
        assert_eq!(path.segments[1].direction, turned);
        // A vertical mirror is parallel to a southbound beam: it passes.
        assert_eq!(turned, Direction::South);
        assert_eq!(path.exit, Some(Position::new(5, 1)));
    }

    #[test]
    fn absorber_terminates_with_no_exit() {
        let mut grid = MaterialGrid::new(6);
        grid.insert(Position::new(1, 0), Material::Absorber);
        let path = trace(&grid, Position::new(0, 0), Direction::South);
        assert_eq!(path.exit, None);
        assert!(path.terminated);
        assert_eq!(path.segments.len(), 1);
    }

    #[test]
    fn metal_reversal_is_loop_bounded() {
        let mut grid = MaterialGrid::new(6);
        grid.insert(Position::new(3, 0), Material::Metal);
        let path = trace(&grid, Position::new(0, 0), Direction::South);
        assert_eq!(path.exit, None);
        assert!(path.terminated);
        // The reversal segment is recorded before the revisit cuts it off.
        let last = path.segments.last().unwrap();
        assert_eq!(last.direction, Direction::North);
    }

    #[test]
    fn water_and_glass_resolve_to_fixed_mirror_branches() {
        for dir in Direction::ALL {
            assert_eq!(
                interact(Material::Water, dir),
                interact(Material::Mirror { angle: 45 }, dir)
            );
            assert_eq!(
                interact(Material::Glass, dir),
                interact(Material::Mirror { angle: 135 }, dir)
            );
        }
    }

    #[test]
    fn mirror_angle_for_turn_inverts_reflection() {
        let orthogonal = [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ];
        for incoming in orthogonal {
            for outgoing in orthogonal {
                if incoming == outgoing {
                    assert_eq!(mirror_angle_for_turn(incoming, outgoing), None);
                    continue;
                }
                let angle = mirror_angle_for_turn(incoming, outgoing)
                    .expect("every orthogonal turn has a mirror");
                assert_eq!(reflect(incoming, angle), outgoing);
            }
        }
    }

    #[test]
    fn entry_direction_points_inward() {
        assert_eq!(entry_direction(Position::new(0, 3), 6), Some(Direction::South));
        assert_eq!(entry_direction(Position::new(5, 3), 6), Some(Direction::North));
        assert_eq!(entry_direction(Position::new(3, 0), 6), Some(Direction::East));
        assert_eq!(entry_direction(Position::new(3, 5), 6), Some(Direction::West));
        // Corners resolve to the row edge.
        assert_eq!(entry_direction(Position::new(0, 0), 6), Some(Direction::South));
        assert_eq!(entry_direction(Position::new(2, 2), 6), None);
    }

    #[test]
    fn trace_honors_the_step_cap() {
        let grid = MaterialGrid::new(6);
        let path = trace(&grid, Position::new(0, 0), Direction::South);
        assert!(path.segments.len() <= step_cap(6));
    }
}
