use quickcheck::{Arbitrary, Gen};

use crate::{arena_positions, Edge, Occupancy, Position, UnitType};

impl Arbitrary for Position {
    /// Always a cell inside the arena.
    fn arbitrary(g: &mut Gen) -> Self {
        let cells: Vec<Position> = arena_positions().collect();
        *g.choose(&cells).unwrap()
    }
}

impl Arbitrary for Edge {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Edge::ALL).unwrap()
    }
}

impl Arbitrary for UnitType {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&UnitType::ALL).unwrap()
    }
}

impl Arbitrary for Occupancy {
    /// Up to a few dozen walls, scattered over the whole arena.
    fn arbitrary(g: &mut Gen) -> Self {
        let num_walls = usize::arbitrary(g) % 60;
        (0..num_walls).map(|_| Position::arbitrary(g)).collect()
    }
}

/// One placement or removal on a board.
#[derive(Clone, Debug)]
pub struct PlacementStep {
    /// `None` removes all units.
    pub unit_type: Option<UnitType>,
    pub position: Position,
    pub owner: usize,
}

#[derive(Clone, Debug)]
pub struct PlacementSequence {
    pub steps: Vec<PlacementStep>,
}

impl Arbitrary for PlacementSequence {
    fn arbitrary(g: &mut Gen) -> Self {
        // A small pool of cells, so that steps collide often
        let pool: Vec<Position> = (0..4).map(|_| Position::arbitrary(g)).collect();
        let num_steps = usize::arbitrary(g) % 40;
        let steps = (0..num_steps)
            .map(|_| {
                let mut position = *g.choose(&pool).unwrap();
                if u8::arbitrary(g) % 10 == 0 {
                    position = Position::new(0, 0);
                }
                let unit_type = if u8::arbitrary(g) % 5 == 0 {
                    None
                } else {
                    Some(UnitType::arbitrary(g))
                };
                PlacementStep {
                    unit_type,
                    position,
                    owner: usize::from(u8::arbitrary(g) % 3),
                }
            })
            .collect();
        PlacementSequence { steps }
    }
}
