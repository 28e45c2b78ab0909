//! Entry/exit pair selection.
//!
//! Scores every ordered boundary pair that satisfies the spacing constraint
//! and returns them best-first. Scoring favors distance and opposite-edge
//! pairs so the planner gets room to build interesting paths.

use crate::grid::{boundary_positions, Position};

/// All boundary pairs at least `min_distance` apart, best score first.
/// Ties break on position order so the ranking is stable.
pub(crate) fn select_candidate_pairs(size: usize, min_distance: usize) -> Vec<(Position, Position)> {
    let boundary = boundary_positions(size);
    let mut scored: Vec<(i32, Position, Position)> = Vec::new();
    for &entry in &boundary {
        for &exit in &boundary {
            if entry == exit || entry.manhattan_distance(&exit) < min_distance {
                continue;
            }
            scored.push((pair_score(entry, exit, size), entry, exit));
        }
    }
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| (a.1, a.2).cmp(&(b.1, b.2))));
    scored.into_iter().map(|(_, entry, exit)| (entry, exit)).collect()
}

fn pair_score(entry: Position, exit: Position, size: usize) -> i32 {
    let mut score = (entry.manhattan_distance(&exit) * 10) as i32;
    match (entry.boundary_edge(size), exit.boundary_edge(size)) {
        (Some(a), Some(b)) if a == b => score -= 10,
        (Some(a), Some(b)) if a.is_opposite(b) => score += 25,
        (Some(_), Some(_)) => score += 15,
        _ => {}
    }
    if entry.is_corner(size) {
        score += 5;
    }
    if exit.is_corner(size) {
        score += 5;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_respect_the_spacing_floor() {
        let pairs = select_candidate_pairs(6, 4);
        assert!(!pairs.is_empty());
        assert!(pairs
            .iter()
            .all(|(e, x)| e.manhattan_distance(x) >= 4 && e != x));
    }

    #[test]
    fn best_pair_spans_opposite_corners() {
        let pairs = select_candidate_pairs(6, 4);
        let (entry, exit) = pairs[0];
        assert_eq!(entry.manhattan_distance(&exit), 10);
        assert!(entry.is_corner(6));
        assert!(exit.is_corner(6));
    }

    #[test]
    fn impossible_spacing_yields_no_pairs() {
        assert!(select_candidate_pairs(6, 11).is_empty());
    }

    #[test]
    fn ranking_is_stable() {
        assert_eq!(select_candidate_pairs(8, 6), select_candidate_pairs(8, 6));
    }
}
