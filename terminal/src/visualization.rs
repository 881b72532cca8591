use crate::navigation::DistanceMap;
use crate::{in_arena_bounds, GameMap, Position, ARENA_SIZE};

/// Draws the arena, the enemy side on top.
///
/// Stationary units are shown by the first letter of their shorthand, in
/// upper case for your own and lower case for the opponent's. Cells with only
/// mobile units show a `*`, empty cells a `·`.
pub fn visualize_board(map: &GameMap) -> String {
    let mut rows = Vec::with_capacity(ARENA_SIZE as usize);
    for y in (0..ARENA_SIZE).rev() {
        let mut row = String::new();
        for x in 0..ARENA_SIZE {
            let glyph = match map.get(Position::new(x, y)) {
                None => ' ',
                Some([]) => '·',
                Some(units) => match units.iter().find(|unit| unit.stationary) {
                    Some(unit) => {
                        let letter = map.config().shorthand(unit.unit_type).chars().next().unwrap_or('?');
                        if unit.owner == 0 {
                            letter.to_ascii_uppercase()
                        } else {
                            letter.to_ascii_lowercase()
                        }
                    }
                    None => '*',
                },
            };
            row.push(glyph);
            row.push(' ');
        }
        rows.push(row.trim_end().to_string());
    }
    rows.join("\n")
}

/// Draws the path length of every reachable cell, the enemy side on top.
pub fn visualize_path_lengths(distances: &DistanceMap) -> String {
    let mut rows = Vec::with_capacity(ARENA_SIZE as usize);
    for y in (0..ARENA_SIZE).rev() {
        let mut row = String::new();
        for x in 0..ARENA_SIZE {
            let position = Position::new(x, y);
            match distances.path_length(position) {
                Some(length) if in_arena_bounds(x, y) && !distances.is_blocked(position) => {
                    row += &format!("{:>3}", length);
                }
                _ => row += "   ",
            }
        }
        rows.push(row.trim_end().to_string());
    }
    rows.join("\n")
}
