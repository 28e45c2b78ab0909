//! Partition a proven solution path into cumulative reveal levels.

use crate::puzzle::{HintLevel, LaserPath};

const PERCENTS: [u8; 4] = [25, 50, 75, 100];

/// Derive the four cumulative hint levels for a solution path.
///
/// Level `n` reveals `ceil(n * 25%)` of the segments and the deduplicated
/// positions those segments touch. A zero-segment path (immediate
/// absorption) yields four empty levels at the same percentage markers.
/// Pure: repeated calls on the same path return identical output.
pub fn segment_hints(path: &LaserPath) -> [HintLevel; 4] {
    let total = path.segments.len();
    std::array::from_fn(|i| {
        let percent = PERCENTS[i];
        let revealed = (total * percent as usize).div_ceil(100);
        HintLevel {
            level: i as u8 + 1,
            percent,
            segments_revealed: revealed,
            positions: path.positions_up_to(revealed),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Direction, Position};
    use crate::puzzle::PathSegment;

    fn straight_path(length: usize) -> LaserPath {
        let segments = (0..length)
            .map(|i| PathSegment {
                start: Position::new(i, 0),
                end: Position::new(i + 1, 0),
                direction: Direction::South,
                material: None,
            })
            .collect();
        LaserPath {
            segments,
            exit: Some(Position::new(length, 0)),
            terminated: false,
        }
    }

    #[test]
    fn levels_use_ceiling_percentages() {
        let path = straight_path(5);
        let hints = segment_hints(&path);
        assert_eq!(hints[0].segments_revealed, 2); // ceil(1.25)
        assert_eq!(hints[1].segments_revealed, 3); // ceil(2.5)
        assert_eq!(hints[2].segments_revealed, 4); // ceil(3.75)
        assert_eq!(hints[3].segments_revealed, 5);
    }

    #[test]
    fn levels_are_monotone_and_level_four_is_full() {
        let path = straight_path(7);
        let hints = segment_hints(&path);
        for pair in hints.windows(2) {
            assert!(pair[0].segments_revealed <= pair[1].segments_revealed);
            assert!(pair[0].positions.len() <= pair[1].positions.len());
        }
        assert_eq!(hints[3].positions, path.positions());
    }

    #[test]
    fn idempotent_on_the_same_path() {
        let path = straight_path(6);
        assert_eq!(segment_hints(&path), segment_hints(&path));
    }

    #[test]
    fn zero_segment_path_yields_empty_levels() {
        let path = LaserPath {
            segments: Vec::new(),
            exit: None,
            terminated: true,
        };
        let hints = segment_hints(&path);
        for (i, level) in hints.iter().enumerate() {
            assert_eq!(level.level, i as u8 + 1);
            assert_eq!(level.segments_revealed, 0);
            assert!(level.positions.is_empty());
        }
        assert_eq!(hints[3].percent, 100);
    }
}
