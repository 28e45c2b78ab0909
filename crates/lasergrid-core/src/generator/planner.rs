//! Inverse path planning.
//!
//! Works backwards from a chosen entry/exit pair: instead of tracing a beam
//! through materials, it decides where the beam should turn and leaves
//! material realization to the placer. All planning happens in a rotated
//! frame where the entry beam travels South, which collapses the four entry
//! edges into one set of cases; turns are rotated back before returning.
//!
//! Every plan is a monotone staircase: horizontal runs sit on strictly
//! increasing rows, so the path can never revisit a cell and trip the
//! tracer's loop rule.

use crate::grid::{Direction, Position};
use crate::rng::SeededRng;
use crate::tracer::entry_direction;
use crate::types::DifficultyConfig;

const PLAN_RETRIES: usize = 24;
const COLUMN_RETRIES: usize = 16;

/// One planned 90-degree turn of the beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlannedTurn {
    pub(crate) position: Position,
    pub(crate) incoming: Direction,
    pub(crate) outgoing: Direction,
}

/// An ordered list of turns the beam makes between entry and exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathPlan {
    pub(crate) turns: Vec<PlannedTurn>,
}

/// Plan a solution path from `entry` to `exit` with a reflection count drawn
/// from the difficulty's target range. `None` when no staircase fits, for
/// example a same-edge pair with adjacent columns and a high floor.
pub(crate) fn plan_path(
    entry: Position,
    exit: Position,
    config: &DifficultyConfig,
    rng: &mut SeededRng,
) -> Option<PathPlan> {
    let size = config.grid_size;
    let entry_dir = entry_direction(entry, size)?;
    let rot = rotations_to_south(entry_dir)?;
    let fe = rotate_pos_n(entry, size, rot);
    let fx = rotate_pos_n(exit, size, rot);
    let back = (4 - rot) % 4;

    for frame_out in frame_exit_directions(fx, size) {
        let mut ks = candidate_ks(frame_out, fe, fx, config);
        rng.shuffle(&mut ks);
        for k in ks {
            for _ in 0..PLAN_RETRIES {
                if let Some(turns) = try_build(frame_out, fe, fx, k, size, rng) {
                    let turns = turns
                        .into_iter()
                        .map(|t| PlannedTurn {
                            position: rotate_pos_n(t.position, size, back),
                            incoming: rotate_dir_n(t.incoming, back),
                            outgoing: rotate_dir_n(t.outgoing, back),
                        })
                        .collect();
                    return Some(PathPlan { turns });
                }
            }
        }
    }
    None
}

/// Quarter-turn position rotation, applied `n` times. One application maps
/// a South-entry frame onto an East-entry grid.
fn rotate_pos_n(mut pos: Position, size: usize, n: usize) -> Position {
    for _ in 0..n {
        pos = Position::new(pos.col, size - 1 - pos.row);
    }
    pos
}

/// Direction counterpart of `rotate_pos_n`: each application adds 270
/// degrees, matching the position map.
fn rotate_dir_n(dir: Direction, n: usize) -> Direction {
    Direction::from_degrees(dir.degrees() + 270 * n as u16)
}

/// Number of rotations that turn `dir` into South. Canonical entry
/// directions are always orthogonal.
fn rotations_to_south(dir: Direction) -> Option<usize> {
    match dir {
        Direction::South => Some(0),
        Direction::East => Some(1),
        Direction::North => Some(2),
        Direction::West => Some(3),
        _ => None,
    }
}

/// Outgoing directions the final segment can take at the frame exit, one per
/// edge the exit cell sits on. Corners yield two options.
fn frame_exit_directions(fx: Position, size: usize) -> Vec<Direction> {
    let mut dirs = Vec::with_capacity(2);
    if fx.row == size - 1 {
        dirs.push(Direction::South);
    }
    if fx.col == size - 1 {
        dirs.push(Direction::East);
    }
    if fx.col == 0 {
        dirs.push(Direction::West);
    }
    if fx.row == 0 {
        dirs.push(Direction::North);
    }
    dirs
}

/// Reflection counts worth trying for this case. Bottom and top exits need
/// an even count, side exits an odd one; a top exit or an aligned bottom
/// exit cannot be reached without at least one full jog.
fn candidate_ks(
    frame_out: Direction,
    fe: Position,
    fx: Position,
    config: &DifficultyConfig,
) -> Vec<usize> {
    let lo = config.min_reflections.max(1);
    let hi = config.preferred_reflections + 2;
    (lo..=hi)
        .filter(|&k| match frame_out {
            Direction::South => k % 2 == 0 && (fe.col != fx.col || k >= 4),
            Direction::North => k % 2 == 0 && k >= 2,
            Direction::East | Direction::West => k % 2 == 1,
            _ => false,
        })
        .collect()
}

fn try_build(
    frame_out: Direction,
    fe: Position,
    fx: Position,
    k: usize,
    size: usize,
    rng: &mut SeededRng,
) -> Option<Vec<PlannedTurn>> {
    match frame_out {
        Direction::South => build_bottom_exit(fe.col, fx.col, k / 2, size, rng),
        Direction::North => build_top_exit(fe.col, fx.col, k / 2, size, rng),
        Direction::East | Direction::West => {
            build_side_exit(fe.col, fx.row, (k + 1) / 2, size, rng, frame_out)
        }
        _ => None,
    }
}

fn turn(row: usize, col: usize, incoming: Direction, outgoing: Direction) -> PlannedTurn {
    PlannedTurn {
        position: Position::new(row, col),
        incoming,
        outgoing,
    }
}

/// The two turns of one sideways jog at `row`: leave the southbound run at
/// `from_col`, rejoin it at `to_col`.
fn jog(row: usize, from_col: usize, to_col: usize) -> [PlannedTurn; 2] {
    let horiz = if to_col > from_col {
        Direction::East
    } else {
        Direction::West
    };
    [
        turn(row, from_col, Direction::South, horiz),
        turn(row, to_col, horiz, Direction::South),
    ]
}

/// `count` distinct interior rows, sorted ascending.
fn pick_rows(rng: &mut SeededRng, count: usize, size: usize) -> Option<Vec<usize>> {
    let mut pool: Vec<usize> = (1..=size - 2).collect();
    if pool.len() < count {
        return None;
    }
    rng.shuffle(&mut pool);
    let mut rows = pool[..count].to_vec();
    rows.sort_unstable();
    Some(rows)
}

/// Exit on the opposite edge: `m` full jogs carry the beam from the entry
/// column to the exit column, then it runs straight out the bottom.
fn build_bottom_exit(
    entry_col: usize,
    exit_col: usize,
    m: usize,
    size: usize,
    rng: &mut SeededRng,
) -> Option<Vec<PlannedTurn>> {
    if m == 0 || (m == 1 && entry_col == exit_col) {
        return None;
    }
    let rows = pick_rows(rng, m, size)?;
    let mut cols = vec![entry_col];
    for i in 1..m {
        let prev = cols[i - 1];
        let col = (0..COLUMN_RETRIES)
            .map(|_| 1 + rng.next_usize(size - 2))
            .find(|&c| c != prev && (i != m - 1 || c != exit_col))?;
        cols.push(col);
    }
    cols.push(exit_col);

    let mut turns = Vec::with_capacity(2 * m);
    for i in 0..m {
        turns.extend(jog(rows[i], cols[i], cols[i + 1]));
    }
    Some(turns)
}

/// Exit on a side edge: `m - 1` full jogs, then one final turn on the exit
/// row that sends the beam straight out sideways.
fn build_side_exit(
    entry_col: usize,
    exit_row: usize,
    m: usize,
    size: usize,
    rng: &mut SeededRng,
    out: Direction,
) -> Option<Vec<PlannedTurn>> {
    if exit_row == 0 {
        return None;
    }
    let blocked_col = if out == Direction::East { size - 1 } else { 0 };
    if m == 1 {
        if entry_col == blocked_col {
            return None;
        }
        return Some(vec![turn(exit_row, entry_col, Direction::South, out)]);
    }
    if exit_row < m {
        return None;
    }
    let mut pool: Vec<usize> = (1..exit_row).collect();
    rng.shuffle(&mut pool);
    let mut rows = pool[..m - 1].to_vec();
    rows.sort_unstable();

    let mut cols = vec![entry_col];
    for i in 1..m {
        let prev = cols[i - 1];
        let col = (0..COLUMN_RETRIES)
            .map(|_| 1 + rng.next_usize(size - 2))
            .find(|&c| c != prev)?;
        cols.push(col);
    }

    let mut turns = Vec::with_capacity(2 * m - 1);
    for i in 0..m - 1 {
        turns.extend(jog(rows[i], cols[i], cols[i + 1]));
    }
    turns.push(turn(exit_row, cols[m - 1], Direction::South, out));
    Some(turns)
}

/// Exit on the entry edge: jog columns move strictly toward the exit column,
/// then the beam turns North under it and climbs back out the top.
fn build_top_exit(
    entry_col: usize,
    exit_col: usize,
    m: usize,
    size: usize,
    rng: &mut SeededRng,
) -> Option<Vec<PlannedTurn>> {
    if m == 0 || entry_col == exit_col || entry_col.abs_diff(exit_col) < m {
        return None;
    }
    let rows = pick_rows(rng, m, size)?;
    let between: Vec<usize> = if entry_col < exit_col {
        (entry_col + 1..exit_col).collect()
    } else {
        (exit_col + 1..entry_col).rev().collect()
    };
    let mut indices: Vec<usize> = (0..between.len()).collect();
    rng.shuffle(&mut indices);
    let mut chosen = indices[..m - 1].to_vec();
    chosen.sort_unstable();

    let mut cols = vec![entry_col];
    cols.extend(chosen.iter().map(|&i| between[i]));
    cols.push(exit_col);

    let mut turns = Vec::with_capacity(2 * m);
    for i in 0..m - 1 {
        turns.extend(jog(rows[i], cols[i], cols[i + 1]));
    }
    let last_row = rows[m - 1];
    let from = cols[m - 1];
    let horiz = if exit_col > from {
        Direction::East
    } else {
        Direction::West
    };
    turns.push(turn(last_row, from, Direction::South, horiz));
    turns.push(turn(last_row, exit_col, horiz, Direction::North));
    Some(turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::placer::place_plan;
    use crate::tracer::trace;

    fn assert_plan_traces(entry: Position, exit: Position, config: &DifficultyConfig, seed: u64) {
        let mut rng = SeededRng::with_seed(seed);
        let plan = plan_path(entry, exit, config, &mut rng).expect("plan");
        for t in &plan.turns {
            assert_ne!(t.position, entry);
            assert_ne!(t.position, exit);
            assert!(t.position.row < config.grid_size && t.position.col < config.grid_size);
        }
        let materials = place_plan(&plan, entry, exit, config.grid_size, &mut rng).expect("place");
        let dir = entry_direction(entry, config.grid_size).unwrap();
        let path = trace(&materials, entry, dir);
        assert_eq!(path.exit, Some(exit), "plan: {:?}", plan.turns);
        assert!(path.reflection_count() >= config.min_reflections);
        assert!(!path.terminated);
    }

    #[test]
    fn rotation_maps_are_inverse() {
        let pos = Position::new(2, 5);
        for rot in 0..4 {
            let back = (4 - rot) % 4;
            assert_eq!(rotate_pos_n(rotate_pos_n(pos, 8, rot), 8, back), pos);
        }
        assert_eq!(rotate_dir_n(Direction::East, 1), Direction::South);
        assert_eq!(rotate_dir_n(Direction::North, 2), Direction::East);
    }

    #[test]
    fn opposite_edge_plan_traces_to_exit() {
        let config = DifficultyConfig::medium();
        assert_plan_traces(Position::new(0, 1), Position::new(7, 4), &config, 42);
    }

    #[test]
    fn side_edge_plan_traces_to_exit() {
        let config = DifficultyConfig::medium();
        assert_plan_traces(Position::new(0, 1), Position::new(3, 7), &config, 7);
    }

    #[test]
    fn same_edge_plan_traces_to_exit() {
        let config = DifficultyConfig::medium();
        assert_plan_traces(Position::new(0, 1), Position::new(0, 5), &config, 11);
    }

    #[test]
    fn left_edge_entry_plans_in_rotated_frame() {
        let config = DifficultyConfig::medium();
        assert_plan_traces(Position::new(2, 0), Position::new(5, 7), &config, 13);
    }

    #[test]
    fn easy_config_plans_on_the_small_grid() {
        let config = DifficultyConfig::easy();
        assert_plan_traces(Position::new(0, 2), Position::new(5, 5), &config, 3);
    }

    #[test]
    fn hard_config_plans_on_the_large_grid() {
        let config = DifficultyConfig::hard();
        assert_plan_traces(Position::new(9, 3), Position::new(0, 6), &config, 21);
    }

    #[test]
    fn identical_pair_is_rejected() {
        let config = DifficultyConfig::medium();
        let mut rng = SeededRng::with_seed(1);
        let plan = plan_path(Position::new(0, 3), Position::new(0, 3), &config, &mut rng);
        assert!(plan.is_none());
    }
}
