//! Material realization.
//!
//! Turns a path plan into a concrete grid: one reflective material per
//! planned turn, then decoy materials up to the difficulty's density target,
//! then absorbers on any competing routes the validator's probe set finds.

use crate::grid::{Material, MaterialGrid, Position};
use crate::rng::SeededRng;
use crate::tracer::{
    entry_direction, mirror_angle_for_turn, trace, GLASS_SURFACE_ANGLE, WATER_SURFACE_ANGLE,
};
use crate::types::DifficultyConfig;
use crate::validator::alternate_probes;

use super::planner::PathPlan;

/// Chance that a 45 or 135 degree turn is realized with Water or Glass
/// instead of a plain mirror.
const THEMED_MATERIAL_PERCENT: u32 = 35;

const MAX_BLOCK_ROUNDS: usize = 4;

/// Place one reflective material per planned turn. `None` when a turn lands
/// on the entry, the exit, an already-claimed cell, or a bend no single
/// mirror can realize.
pub(crate) fn place_plan(
    plan: &PathPlan,
    entry: Position,
    exit: Position,
    size: usize,
    rng: &mut SeededRng,
) -> Option<MaterialGrid> {
    let mut materials = MaterialGrid::new(size);
    for turn in &plan.turns {
        if turn.position == entry || turn.position == exit {
            return None;
        }
        let angle = mirror_angle_for_turn(turn.incoming, turn.outgoing)?;
        let material = match angle {
            WATER_SURFACE_ANGLE if rng.chance(THEMED_MATERIAL_PERCENT) => Material::Water,
            GLASS_SURFACE_ANGLE if rng.chance(THEMED_MATERIAL_PERCENT) => Material::Glass,
            _ => Material::Mirror { angle },
        };
        if !materials.insert(turn.position, material) {
            return None;
        }
    }
    Some(materials)
}

/// Add decoy materials until the density target is met, reverting any
/// placement that disturbs the solution trace. Placements that the beam
/// passes straight through (a mirror parallel to it) are kept.
pub(crate) fn pad_to_density(
    materials: &mut MaterialGrid,
    entry: Position,
    exit: Position,
    config: &DifficultyConfig,
    rng: &mut SeededRng,
) {
    let size = config.grid_size;
    let target = (config.material_density * (size * size) as f64).round() as usize;
    let Some(dir) = entry_direction(entry, size) else {
        return;
    };
    let baseline = trace(materials, entry, dir);
    let canonical = baseline.positions();

    let mut free: Vec<Position> = (0..size)
        .flat_map(|row| (0..size).map(move |col| Position::new(row, col)))
        .filter(|p| *p != entry && *p != exit && materials.get(*p).is_none())
        .collect();
    rng.shuffle(&mut free);

    for pos in free {
        if materials.len() >= target {
            break;
        }
        if !materials.insert(pos, random_material(rng)) {
            continue;
        }
        let replay = trace(materials, entry, dir);
        if replay.exit != baseline.exit || replay.positions() != canonical {
            materials.remove(pos);
        }
    }
}

/// Place absorbers on competing routes until none remain or the round limit
/// is hit. Returns the number of competing routes still open.
pub(crate) fn block_alternates(
    materials: &mut MaterialGrid,
    entry: Position,
    exit: Position,
    config: &DifficultyConfig,
    rng: &mut SeededRng,
) -> usize {
    let size = config.grid_size;
    let Some(dir) = entry_direction(entry, size) else {
        return 0;
    };
    let canonical = trace(materials, entry, dir).positions();
    let thorough = config.thorough_search();

    for _ in 0..MAX_BLOCK_ROUNDS {
        let mut competing = 0;
        let mut blocked = false;
        for (start, probe_dir) in alternate_probes(entry, exit, size, thorough) {
            let path = trace(materials, start, probe_dir);
            if path.exit != Some(exit) {
                continue;
            }
            competing += 1;
            let spots: Vec<Position> = path
                .positions()
                .into_iter()
                .skip(1)
                .filter(|p| {
                    *p != entry
                        && *p != exit
                        && !canonical.contains(p)
                        && materials.get(*p).is_none()
                })
                .collect();
            if let Some(&pos) = rng.pick(&spots) {
                materials.insert(pos, Material::Absorber);
                blocked = true;
            }
        }
        if competing == 0 || !blocked {
            return competing;
        }
    }

    alternate_probes(entry, exit, size, thorough)
        .into_iter()
        .filter(|(start, probe_dir)| trace(materials, *start, *probe_dir).exit == Some(exit))
        .count()
}

/// Uniform draw over the placeable material kinds.
pub(crate) fn random_material(rng: &mut SeededRng) -> Material {
    match rng.next_usize(8) {
        0 => Material::Mirror { angle: 0 },
        1 => Material::Mirror { angle: 45 },
        2 => Material::Mirror { angle: 90 },
        3 => Material::Mirror { angle: 135 },
        4 => Material::Water,
        5 => Material::Glass,
        6 => Material::Metal,
        _ => Material::Absorber,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::planner::{PathPlan, PlannedTurn};
    use crate::grid::Direction;

    fn single_turn_plan(position: Position) -> PathPlan {
        PathPlan {
            turns: vec![PlannedTurn {
                position,
                incoming: Direction::South,
                outgoing: Direction::East,
            }],
        }
    }

    #[test]
    fn place_plan_rejects_turns_on_the_entry() {
        let entry = Position::new(2, 1);
        let mut rng = SeededRng::with_seed(5);
        let plan = single_turn_plan(entry);
        assert!(place_plan(&plan, entry, Position::new(2, 7), 8, &mut rng).is_none());
    }

    #[test]
    fn place_plan_realizes_a_turn_with_a_reflector() {
        let mut rng = SeededRng::with_seed(5);
        let plan = single_turn_plan(Position::new(3, 1));
        let materials = place_plan(&plan, Position::new(0, 1), Position::new(3, 7), 8, &mut rng)
            .expect("placeable");
        // South to East needs a 135-degree surface: mirror or glass.
        let placed = materials.get(Position::new(3, 1)).unwrap();
        assert!(matches!(
            placed,
            Material::Mirror { angle: 135 } | Material::Glass
        ));
    }

    #[test]
    fn padding_reaches_the_density_target_without_moving_the_exit() {
        let entry = Position::new(0, 1);
        let exit = Position::new(3, 7);
        let mut rng = SeededRng::with_seed(9);
        let plan = single_turn_plan(Position::new(3, 1));
        let mut materials = place_plan(&plan, entry, exit, 8, &mut rng).unwrap();
        let config = DifficultyConfig::medium();
        let before = trace(&materials, entry, Direction::South);
        pad_to_density(&mut materials, entry, exit, &config, &mut rng);
        let after = trace(&materials, entry, Direction::South);
        assert_eq!(after.exit, before.exit);
        assert_eq!(after.positions(), before.positions());
        let target = (config.material_density * 64.0).round() as usize;
        // Every cell off the short solution path is a legal padding spot.
        assert_eq!(materials.len(), target);
    }

    #[test]
    fn blocking_closes_a_diagonal_shortcut() {
        // Mirror at (6,1) sends a southbound beam east to (6,7). The
        // south-east diagonal from the entry reaches the same exit until an
        // absorber lands on it.
        let entry = Position::new(0, 1);
        let exit = Position::new(6, 7);
        let mut materials = MaterialGrid::new(8);
        materials.insert(Position::new(6, 1), Material::Mirror { angle: 135 });
        let config = DifficultyConfig::medium();
        let mut rng = SeededRng::with_seed(17);
        let remaining = block_alternates(&mut materials, entry, exit, &config, &mut rng);
        assert_eq!(remaining, 0);
        let absorbers = materials
            .iter()
            .filter(|(_, m)| matches!(m, Material::Absorber))
            .count();
        assert_eq!(absorbers, 1);
        // The canonical route still works.
        assert_eq!(
            trace(&materials, entry, Direction::South).exit,
            Some(exit)
        );
    }

    #[test]
    fn blocking_is_a_no_op_on_a_unique_puzzle() {
        let entry = Position::new(0, 1);
        let exit = Position::new(3, 0);
        let mut materials = MaterialGrid::new(6);
        materials.insert(Position::new(3, 1), Material::Mirror { angle: 45 });
        let config = DifficultyConfig::easy();
        let mut rng = SeededRng::with_seed(17);
        let before = materials.clone();
        assert_eq!(
            block_alternates(&mut materials, entry, exit, &config, &mut rng),
            0
        );
        assert_eq!(materials, before);
    }
}
