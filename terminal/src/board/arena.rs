use serde::{Deserialize, Serialize};

use crate::Position;

/// Side length of the square that encloses the diamond-shaped arena.
pub const ARENA_SIZE: i32 = 28;
pub const HALF_ARENA: i32 = ARENA_SIZE / 2;

/// Number of cells inside the diamond: 2 * (2 + 4 + ... + 28).
pub const NUM_ARENA_CELLS: usize = 420;

/// Checks whether a coordinate lies inside the diamond.
///
/// The arena is two stacked triangles. Row `y` of the lower triangle is
/// `2 * (y + 1)` cells wide, row `y` of the upper triangle is
/// `2 * (ARENA_SIZE - y)` cells wide, and both are centered on `HALF_ARENA`.
pub fn in_arena_bounds(x: i32, y: i32) -> bool {
    if !(0..ARENA_SIZE).contains(&y) {
        return false;
    }
    let row_size = if y < HALF_ARENA { y + 1 } else { ARENA_SIZE - y };
    let start_x = HALF_ARENA - row_size;
    let end_x = start_x + 2 * row_size - 1;
    x >= start_x && x <= end_x
}

/// One of the four boundary edges of the diamond.
///
/// The two lower edges belong to player 0 (deploy edges), the two upper
/// edges to player 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    TopRight,
    TopLeft,
    BottomLeft,
    BottomRight,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::TopRight, Edge::TopLeft, Edge::BottomLeft, Edge::BottomRight];

    /// The `HALF_ARENA` cells along this edge, starting next to the
    /// horizontal midline and ending at the extreme corner.
    pub fn locations(self) -> Vec<Position> {
        (0..HALF_ARENA)
            .map(|i| match self {
                Edge::TopRight => Position::new(HALF_ARENA + i, ARENA_SIZE - 1 - i),
                Edge::TopLeft => Position::new(HALF_ARENA - 1 - i, ARENA_SIZE - 1 - i),
                Edge::BottomLeft => Position::new(HALF_ARENA - 1 - i, i),
                Edge::BottomRight => Position::new(HALF_ARENA + i, i),
            })
            .collect()
    }

    /// The edge diagonally across the arena, which a mobile unit spawned on
    /// this edge walks towards.
    pub fn opposite(self) -> Edge {
        match self {
            Edge::TopRight => Edge::BottomLeft,
            Edge::TopLeft => Edge::BottomRight,
            Edge::BottomLeft => Edge::TopRight,
            Edge::BottomRight => Edge::TopLeft,
        }
    }
}

/// The edge locations of all four edges, in the order of [`Edge::ALL`].
pub fn edges() -> [Vec<Position>; 4] {
    Edge::ALL.map(Edge::locations)
}

/// All cells inside the arena, `x` outer and `y` inner.
pub fn arena_positions() -> impl Iterator<Item = Position> {
    (0..ARENA_SIZE).flat_map(|x| {
        (0..ARENA_SIZE)
            .filter(move |&y| in_arena_bounds(x, y))
            .map(move |y| Position::new(x, y))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use quickcheck::quickcheck;

    use super::*;

    fn reference_row_width(y: i32) -> i32 {
        if y < HALF_ARENA {
            2 * (y + 1)
        } else {
            2 * (ARENA_SIZE - y)
        }
    }

    #[test]
    fn cell_count() {
        let mut count = 0;
        for x in 0..ARENA_SIZE {
            for y in 0..ARENA_SIZE {
                if in_arena_bounds(x, y) {
                    count += 1;
                }
            }
        }
        assert_eq!(count, NUM_ARENA_CELLS);
        assert_eq!(arena_positions().count(), NUM_ARENA_CELLS);
    }

    #[test]
    fn row_widths_and_extremes() {
        for y in 0..ARENA_SIZE {
            let width = (0..ARENA_SIZE).filter(|&x| in_arena_bounds(x, y)).count() as i32;
            assert_eq!(width, reference_row_width(y), "row {}", y);
        }
        assert!(in_arena_bounds(13, 0) && in_arena_bounds(14, 0));
        assert!(!in_arena_bounds(12, 0) && !in_arena_bounds(15, 0));
        assert!(in_arena_bounds(0, 13) && in_arena_bounds(27, 14));
        assert!(in_arena_bounds(13, 27) && !in_arena_bounds(15, 27));
    }

    #[test]
    fn edges_are_pairwise_disjoint() {
        let all: Vec<Position> = edges().into_iter().flatten().collect();
        assert_eq!(all.len(), 4 * HALF_ARENA as usize);
        for edge in Edge::ALL {
            let locations = edge.locations();
            let distinct: BTreeSet<Position> = locations.iter().copied().collect();
            assert_eq!(distinct.len(), HALF_ARENA as usize);
            assert!(locations.iter().all(|p| in_arena_bounds(p.x, p.y)));
            assert_eq!(locations, edge.locations());
        }
        let distinct: BTreeSet<Position> = all.iter().copied().collect();
        assert_eq!(distinct.len(), all.len());
    }

    #[test]
    fn edge_order() {
        assert_eq!(Edge::TopRight.locations()[0], Position::new(14, 27));
        assert_eq!(Edge::TopRight.locations()[13], Position::new(27, 14));
        assert_eq!(Edge::TopLeft.locations()[0], Position::new(13, 27));
        assert_eq!(Edge::BottomLeft.locations()[13], Position::new(0, 13));
        assert_eq!(Edge::BottomRight.locations()[0], Position::new(14, 0));
        assert_eq!(Edge::BottomRight.locations()[13], Position::new(27, 13));
    }

    quickcheck! {
        fn bounds_match_row_widths(x: i32, y: i32) -> bool {
            let (x, y) = (x.rem_euclid(40) - 6, y.rem_euclid(40) - 6);
            let expected = (0..ARENA_SIZE).contains(&y) && {
                let half_width = reference_row_width(y) / 2;
                x >= HALF_ARENA - half_width && x < HALF_ARENA + half_width
            };
            in_arena_bounds(x, y) == expected
        }
    }
}
