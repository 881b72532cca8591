//! Predicting the path of mobile units.
//!
//! A mobile unit walks towards the most ideal cell it can reach: one of its
//! target edge cells if possible, otherwise the reachable cell that is
//! furthest in the direction of the targets. Among the shortest paths to that
//! cell, it prefers zig-zagging, i.e. alternating between horizontal and
//! vertical steps.
//!
//! Each search runs on its own scratch grid, built from an [`Occupancy`]
//! snapshot, so searches don't interfere with each other.

use std::collections::VecDeque;

use crate::{in_arena_bounds, Occupancy, Position, ARENA_SIZE, HALF_ARENA};

const SIZE: usize = ARENA_SIZE as usize;

/// Search bookkeeping for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Node {
    pub visited_for_idealness: bool,
    pub visited_for_distance: bool,
    pub blocked: bool,
    /// Number of steps to the closest destination, or `None` if the cell is
    /// not connected to one.
    pub path_length: Option<u32>,
}

/// The per-cell results of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceMap {
    /// Indexed by `[x][y]`.
    nodes: Box<[[Node; SIZE]; SIZE]>,
}

impl DistanceMap {
    /// The node for a cell, or `None` if it is outside of the arena.
    pub fn get(&self, position: Position) -> Option<&Node> {
        in_arena_bounds(position.x, position.y).then(|| &self.nodes[position.x as usize][position.y as usize])
    }

    pub fn path_length(&self, position: Position) -> Option<u32> {
        self.get(position).and_then(|node| node.path_length)
    }

    pub fn is_blocked(&self, position: Position) -> bool {
        self.get(position).is_some_and(|node| node.blocked)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum MoveDirection {
    None,
    Horizontal,
    Vertical,
}

/// Which way along each axis the targets lie, as `-1` or `1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Heading {
    x: i32,
    y: i32,
}

impl Heading {
    /// Derived from the first target only, since all targets are expected to
    /// lie on the same edge.
    fn towards(target: Position) -> Self {
        Heading {
            x: if target.x < HALF_ARENA { -1 } else { 1 },
            y: if target.y < HALF_ARENA { -1 } else { 1 },
        }
    }
}

struct Search<'t> {
    nodes: Box<[[Node; SIZE]; SIZE]>,
    targets: &'t [Position],
    heading: Heading,
}

impl<'t> Search<'t> {
    fn new(occupancy: &Occupancy, targets: &'t [Position]) -> Option<Self> {
        let first = *targets.first()?;
        let mut nodes = Box::new([[Node::default(); SIZE]; SIZE]);
        for (x, column) in nodes.iter_mut().enumerate() {
            for (y, node) in column.iter_mut().enumerate() {
                node.blocked = occupancy.is_blocked(Position::new(x as i32, y as i32));
            }
        }
        Some(Search {
            nodes,
            targets,
            heading: Heading::towards(first),
        })
    }

    fn node(&self, position: Position) -> &Node {
        &self.nodes[position.x as usize][position.y as usize]
    }

    fn node_mut(&mut self, position: Position) -> &mut Node {
        &mut self.nodes[position.x as usize][position.y as usize]
    }

    /// Whether a unit could step onto this cell.
    fn is_walkable(&self, position: Position) -> bool {
        in_arena_bounds(position.x, position.y) && !self.node(position).blocked
    }

    fn idealness(&self, position: Position) -> i32 {
        if self.targets.contains(&position) {
            return i32::MAX;
        }
        let row = if self.heading.y == 1 {
            position.y
        } else {
            ARENA_SIZE - 1 - position.y
        };
        let column = if self.heading.x == 1 {
            position.x
        } else {
            ARENA_SIZE - 1 - position.x
        };
        ARENA_SIZE * row + column
    }

    /// Flood fills the region around `start` and returns its most ideal cell.
    ///
    /// On ties, the cell found first wins.
    fn most_ideal(&mut self, start: Position) -> Position {
        let mut best_idealness = self.idealness(start);
        let mut most_ideal = start;
        self.node_mut(start).visited_for_idealness = true;
        let mut queue = VecDeque::from([start]);
        while let Some(location) = queue.pop_front() {
            for neighbor in location.neighbors() {
                if !self.is_walkable(neighbor) {
                    continue;
                }
                let idealness = self.idealness(neighbor);
                if idealness > best_idealness {
                    best_idealness = idealness;
                    most_ideal = neighbor;
                }
                let node = self.node_mut(neighbor);
                if !node.visited_for_idealness {
                    node.visited_for_idealness = true;
                    queue.push_back(neighbor);
                }
            }
        }
        most_ideal
    }

    /// Computes the distance of each cell to the destination.
    ///
    /// If the most ideal cell is a target, every target is a destination.
    fn measure_distances(&mut self, ideal: Position) {
        let seeds = if self.targets.contains(&ideal) {
            self.targets.to_vec()
        } else {
            vec![ideal]
        };
        let mut queue = VecDeque::new();
        for seed in seeds {
            if !in_arena_bounds(seed.x, seed.y) {
                continue;
            }
            let node = self.node_mut(seed);
            node.path_length = Some(0);
            node.visited_for_distance = true;
            queue.push_back(seed);
        }

        while let Some(location) = queue.pop_front() {
            let current = *self.node(location);
            // Blocked targets are destinations but don't lead anywhere
            if current.blocked {
                continue;
            }
            for neighbor in location.neighbors() {
                if !self.is_walkable(neighbor) {
                    continue;
                }
                let node = self.node_mut(neighbor);
                if !node.visited_for_distance {
                    node.path_length = current.path_length.map(|length| length + 1);
                    node.visited_for_distance = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    fn walk(&self, start: Position) -> Vec<Position> {
        let mut path = vec![start];
        let mut current = start;
        let mut direction = MoveDirection::None;
        while self.node(current).path_length != Some(0) && path.len() <= SIZE * SIZE {
            let next = self.next_move(current, direction);
            if next == current {
                break;
            }
            direction = if current.x == next.x {
                MoveDirection::Vertical
            } else {
                MoveDirection::Horizontal
            };
            path.push(next);
            current = next;
        }
        path
    }

    fn next_move(&self, current: Position, direction: MoveDirection) -> Position {
        let mut ideal_neighbor = current;
        let Some(mut best_length) = self.node(current).path_length else {
            return current;
        };
        for neighbor in current.neighbors() {
            if !self.is_walkable(neighbor) {
                continue;
            }
            let Some(length) = self.node(neighbor).path_length else {
                continue;
            };
            if length > best_length {
                continue;
            }
            if length == best_length && !self.better_direction(current, neighbor, ideal_neighbor, direction) {
                continue;
            }
            ideal_neighbor = neighbor;
            best_length = length;
        }
        ideal_neighbor
    }

    /// Whether `candidate` beats `best` as the next step from `current`,
    /// given that both are equally far from the destination.
    fn better_direction(
        &self,
        current: Position,
        candidate: Position,
        best: Position,
        direction: MoveDirection,
    ) -> bool {
        match direction {
            // Prefer a vertical step after a horizontal one
            MoveDirection::Horizontal if candidate.x != best.x => return current.y != candidate.y,
            // and a horizontal step after a vertical one
            MoveDirection::Vertical if candidate.y != best.y => return current.x != candidate.x,
            MoveDirection::None => return current.y != candidate.y,
            _ => {}
        }

        // Both steps are along the same axis, prefer the one towards the targets
        if candidate.y == best.y {
            return (self.heading.x == 1 && candidate.x > best.x) || (self.heading.x == -1 && candidate.x < best.x);
        }
        if candidate.x == best.x {
            return (self.heading.y == 1 && candidate.y > best.y) || (self.heading.y == -1 && candidate.y < best.y);
        }
        true
    }
}

/// Runs the first two phases of a search and returns the resulting distances.
///
/// Returns `None` if there is nothing to search: no targets, or a start
/// outside of the arena or on a blocked cell.
pub fn distance_map(occupancy: &Occupancy, start: Position, targets: &[Position]) -> Option<DistanceMap> {
    search(occupancy, start, targets).map(|search| DistanceMap { nodes: search.nodes })
}

fn search<'t>(occupancy: &Occupancy, start: Position, targets: &'t [Position]) -> Option<Search<'t>> {
    if !in_arena_bounds(start.x, start.y) || occupancy.is_blocked(start) {
        return None;
    }
    let mut search = Search::new(occupancy, targets)?;
    let ideal = search.most_ideal(start);
    search.measure_distances(ideal);
    Some(search)
}

/// The path a mobile unit starting at `start` would take towards `targets`,
/// including the start.
///
/// If no target can be reached, the path ends at the reachable cell that is
/// furthest towards the targets. A unit that cannot move at all gets a path
/// of just the start. The path is empty if there is nothing to search, see
/// [`distance_map()`].
pub fn navigate_to_edge(occupancy: &Occupancy, start: Position, targets: &[Position]) -> Vec<Position> {
    match search(occupancy, start, targets) {
        Some(search) => search.walk(start),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::Edge;

    fn positions(coords: &[(i32, i32)]) -> Vec<Position> {
        coords.iter().copied().map(Position::from).collect()
    }

    fn is_connected(path: &[Position]) -> bool {
        path.windows(2).all(|pair| pair[0].manhattan_distance(pair[1]) == 1)
    }

    #[test]
    fn zig_zags_to_the_top_right() {
        let path = navigate_to_edge(&Occupancy::empty(), Position::new(13, 13), &Edge::TopRight.locations());
        let expected = positions(&[
            (13, 13),
            (13, 14),
            (14, 14),
            (14, 15),
            (15, 15),
            (15, 16),
            (16, 16),
            (16, 17),
            (17, 17),
            (17, 18),
            (18, 18),
            (18, 19),
            (19, 19),
            (19, 20),
            (20, 20),
            (20, 21),
        ]);
        assert_eq!(path, expected);
    }

    #[test]
    fn bottom_corner_to_bottom_right_edge() {
        let targets = Edge::BottomRight.locations();
        let path = navigate_to_edge(&Occupancy::empty(), Position::new(13, 0), &targets);
        assert_eq!(path, positions(&[(13, 0), (14, 0)]));
        assert!(targets.contains(path.last().unwrap()));
    }

    #[test]
    fn starting_on_a_target() {
        let targets = Edge::BottomLeft.locations();
        let path = navigate_to_edge(&Occupancy::empty(), targets[3], &targets);
        assert_eq!(path, vec![targets[3]]);
    }

    #[test]
    fn blocked_row_stops_at_most_ideal_cell() {
        let occupancy: Occupancy = (0..ARENA_SIZE).map(|x| Position::new(x, 13)).collect();
        let targets = Edge::TopRight.locations();
        let path = navigate_to_edge(&occupancy, Position::new(13, 0), &targets);
        assert_eq!(path.first(), Some(&Position::new(13, 0)));
        assert_eq!(path.last(), Some(&Position::new(26, 12)));
        assert!(is_connected(&path));
        assert!(path.iter().all(|&pos| !occupancy.is_blocked(pos)));

        let distances = distance_map(&occupancy, Position::new(13, 0), &targets).unwrap();
        assert_eq!(distances.path_length(Position::new(26, 12)), Some(0));
        assert_eq!(distances.path_length(Position::new(20, 20)), None);
        assert!(distances.is_blocked(Position::new(13, 13)));
    }

    #[test]
    fn blocked_or_invalid_start() {
        let start = Position::new(13, 13);
        let occupancy: Occupancy = [start].into_iter().collect();
        let targets = Edge::TopRight.locations();
        assert!(navigate_to_edge(&occupancy, start, &targets).is_empty());
        assert!(navigate_to_edge(&Occupancy::empty(), Position::new(0, 0), &targets).is_empty());
        assert!(navigate_to_edge(&Occupancy::empty(), start, &[]).is_empty());
        assert!(distance_map(&occupancy, start, &targets).is_none());
    }

    #[test]
    fn enclosed_start() {
        let start = Position::new(13, 13);
        let occupancy: Occupancy = start.neighbors().into_iter().collect();
        let path = navigate_to_edge(&occupancy, start, &Edge::BottomLeft.locations());
        assert_eq!(path, vec![start]);
    }

    #[test]
    fn zig_zags_to_the_bottom_left() {
        let path = navigate_to_edge(&Occupancy::empty(), Position::new(13, 13), &Edge::BottomLeft.locations());
        let expected = positions(&[
            (13, 13),
            (13, 12),
            (12, 12),
            (12, 11),
            (11, 11),
            (11, 10),
            (10, 10),
            (10, 9),
            (9, 9),
            (9, 8),
            (8, 8),
            (8, 7),
            (7, 7),
            (7, 6),
        ]);
        assert_eq!(path, expected);
    }

    #[test]
    fn equal_vertical_detours_go_towards_the_targets() {
        // The wall at (12, 5) can be passed above or below in the same
        // number of steps. The targets are below, so the unit goes down.
        let occupancy: Occupancy = positions(&[(12, 5), (16, 6), (16, 4)]).into_iter().collect();
        let path = navigate_to_edge(&occupancy, Position::new(16, 5), &[Position::new(10, 5)]);
        let expected = positions(&[
            (16, 5),
            (15, 5),
            (15, 4),
            (14, 4),
            (13, 4),
            (12, 4),
            (11, 4),
            (11, 5),
            (10, 5),
        ]);
        assert_eq!(path, expected);

        // Same below the center line, heading right
        let occupancy: Occupancy = positions(&[(15, 5), (11, 6), (11, 4)]).into_iter().collect();
        let path = navigate_to_edge(&occupancy, Position::new(11, 5), &[Position::new(18, 5)]);
        assert_eq!(path[2], Position::new(12, 4));
        assert_eq!(path.len(), 10);
    }

    #[test]
    fn equal_horizontal_detours_go_towards_the_targets() {
        let occupancy: Occupancy = positions(&[(5, 12), (6, 16), (4, 16)]).into_iter().collect();
        let path = navigate_to_edge(&occupancy, Position::new(5, 16), &[Position::new(5, 10)]);
        let expected = positions(&[
            (5, 16),
            (5, 15),
            (4, 15),
            (4, 14),
            (4, 13),
            (4, 12),
            (4, 11),
            (5, 11),
            (5, 10),
        ]);
        assert_eq!(path, expected);
    }

    #[test]
    fn start_is_visited() {
        let start = Position::new(13, 13);
        let occupancy: Occupancy = start.neighbors().into_iter().collect();
        let distances = distance_map(&occupancy, start, &Edge::TopRight.locations()).unwrap();
        assert!(distances.get(start).unwrap().visited_for_idealness);
        assert_eq!(distances.path_length(start), Some(0));
    }

    #[test]
    fn walls_force_a_detour() {
        // A wall from (10, 14) to (17, 14), just above the start
        let occupancy: Occupancy = (10..=17).map(|x| Position::new(x, 14)).collect();
        let targets = Edge::TopRight.locations();
        let start = Position::new(13, 13);
        let path = navigate_to_edge(&occupancy, start, &targets);
        assert!(targets.contains(path.last().unwrap()));
        assert!(is_connected(&path));
        assert!(path.iter().all(|&pos| !occupancy.is_blocked(pos)));
        assert!(path.iter().any(|pos| pos.x == 18 && pos.y == 13));
    }

    quickcheck! {
        fn unobstructed_paths_are_shortest(start: Position, edge: Edge) -> bool {
            let targets = edge.locations();
            let path = navigate_to_edge(&Occupancy::empty(), start, &targets);
            let shortest = targets.iter().map(|&t| start.manhattan_distance(t)).min().unwrap();
            path.len() == shortest as usize + 1
                && path[0] == start
                && targets.contains(path.last().unwrap())
                && is_connected(&path)
                && path.iter().all(|pos| in_arena_bounds(pos.x, pos.y))
        }

        fn searches_are_deterministic(start: Position, walls: Occupancy, edge: Edge) -> bool {
            let targets = edge.locations();
            navigate_to_edge(&walls, start, &targets) == navigate_to_edge(&walls, start, &targets)
        }

        fn paths_avoid_walls(start: Position, walls: Occupancy, edge: Edge) -> bool {
            let path = navigate_to_edge(&walls, start, &edge.locations());
            is_connected(&path) && path.iter().all(|&pos| !walls.is_blocked(pos))
        }
    }
}
