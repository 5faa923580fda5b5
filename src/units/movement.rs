//! Reachability and altitude
//!
//! Movement is a pure radius check: a cell behind a wall is reachable as
//! long as it lies within range. There is no path routing.

use std::cmp::Ordering;

use glam::Vec2;

use crate::board::{Board, Cell, ReachableCell};
use crate::core::types::{CellCoord, StructureId};
use crate::units::unit::Unit;

/// World coordinate a unit measures to along one axis: the near edge of a
/// cell it moves towards, or the cell center when in line.
fn near_edge(candidate: i32, origin: i32, scale: f32) -> f32 {
    match candidate.cmp(&origin) {
        Ordering::Greater => candidate as f32 * scale,
        Ordering::Less => (candidate + 1) as f32 * scale,
        Ordering::Equal => candidate as f32 * scale + scale / 2.0,
    }
}

/// Cost of stepping from the unit's current footing onto `cell`
pub fn step_penalty(unit: &Unit, cell: &Cell) -> u32 {
    let same_floor = unit.standing_on.is_some()
        && cell.structure == unit.standing_on
        && cell.structure_altitude == unit.altitude;
    if same_floor {
        0
    } else {
        cell.structure_altitude.abs_diff(unit.altitude)
    }
}

/// Every cell within `speed + tolerance` cells, excluding the unit's own
pub fn reachable_cells(unit: &Unit, board: &Board, tolerance: f32) -> Vec<ReachableCell> {
    let scale = board.cell_scale();
    let speed = i32::try_from(unit.stats.speed).unwrap_or(i32::MAX);
    let origin = unit.position;
    let center = origin.center(scale);
    let max_distance = (unit.stats.speed as f32 + tolerance) * scale;
    let max_distance_sq = max_distance * max_distance;

    // Scan only the part of the square that lies on the board
    let last_x = board.width() as i32 - 1;
    let last_y = board.height() as i32 - 1;
    let xs = origin.x.saturating_sub(speed).max(0)..=origin.x.saturating_add(speed).min(last_x);
    let ys = origin.y.saturating_sub(speed).max(0)..=origin.y.saturating_add(speed).min(last_y);

    let mut reachable = Vec::new();
    for x in xs {
        for y in ys.clone() {
            let coord = CellCoord::new(x, y);
            if coord == origin {
                continue;
            }
            let Some(cell) = board.cell(coord) else {
                continue;
            };

            let near = Vec2::new(near_edge(x, origin.x, scale), near_edge(y, origin.y, scale));
            if (center - near).length_squared() < max_distance_sq {
                reachable.push(ReachableCell {
                    coord,
                    penalty: step_penalty(unit, cell),
                });
            }
        }
    }
    reachable
}

/// Altitude of a cell and the structure a unit standing there is on
pub fn altitude_at(board: &Board, coord: CellCoord) -> (u32, Option<StructureId>) {
    match board.covering_structure(coord) {
        Some(structure) => (structure.altitude, Some(structure.id)),
        None => (0, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Structure;
    use crate::core::types::PlatoonId;
    use crate::geometry::Footprint;
    use crate::units::unit::UnitStats;

    fn unit_at(x: i32, y: i32, speed: u32) -> Unit {
        let stats = UnitStats {
            speed,
            ..UnitStats::default()
        };
        Unit::new(PlatoonId::new(), CellCoord::new(x, y), stats)
    }

    fn board() -> Board {
        Board::new(40, 60, 20.0, 0)
    }

    #[test]
    fn test_speed_one_reaches_moore_neighbourhood() {
        let board = board();
        let unit = unit_at(10, 10, 1);
        let cells = reachable_cells(&unit, &board, 0.5);
        assert_eq!(cells.len(), 8);
        assert!(cells.iter().all(|c| c.coord.chebyshev_distance(&unit.position) == 1));
    }

    #[test]
    fn test_reachable_never_includes_own_cell() {
        let board = board();
        for speed in 0..5 {
            let unit = unit_at(20, 30, speed);
            let cells = reachable_cells(&unit, &board, 0.5);
            assert!(cells.iter().all(|c| c.coord != unit.position));
        }
    }

    #[test]
    fn test_larger_radius_cuts_corners() {
        let board = board();
        // Speed 2: the whole 5x5 square fits inside 2.5 cells
        assert_eq!(reachable_cells(&unit_at(10, 10, 2), &board, 0.5).len(), 24);
        // Speed 3: the four far corners fall outside
        let cells = reachable_cells(&unit_at(10, 10, 3), &board, 0.5);
        assert_eq!(cells.len(), 44);
        assert!(!cells.iter().any(|c| c.coord == CellCoord::new(13, 13)));
    }

    #[test]
    fn test_board_edge_clips_reachable_set() {
        let board = board();
        assert_eq!(reachable_cells(&unit_at(0, 0, 1), &board, 0.5).len(), 3);
    }

    #[test]
    fn test_huge_speed_covers_the_board() {
        let board = Board::new(8, 6, 20.0, 0);
        let everywhere = 8 * 6 - 1;
        assert_eq!(reachable_cells(&unit_at(3, 3, 1_000_000), &board, 0.5).len(), everywhere);
        assert_eq!(reachable_cells(&unit_at(3, 3, u32::MAX), &board, 0.5).len(), everywhere);
    }

    #[test]
    fn test_zero_tolerance_keeps_moore_neighbourhood() {
        let board = board();
        // Orthogonal neighbours sit half a cell away; diagonals ~0.71
        assert_eq!(reachable_cells(&unit_at(10, 10, 1), &board, 0.0).len(), 8);
        assert_eq!(reachable_cells(&unit_at(10, 10, 0), &board, 0.6).len(), 0);
    }

    #[test]
    fn test_penalties_follow_altitude_change() {
        let mut board = board();
        let ground = Structure::with_altitude(Footprint::new(5, 15, 15, 10), 1)
            .with_substructure(Structure::with_altitude(Footprint::new(5, 15, 5, 5), 2))
            .unwrap();
        board.register_structure(ground).unwrap();

        // On open ground next to the building
        let outside = unit_at(4, 20, 1);
        let cells = reachable_cells(&outside, &board, 0.5);
        let onto_ground_floor = cells.iter().find(|c| c.coord == CellCoord::new(5, 20)).unwrap();
        assert_eq!(onto_ground_floor.penalty, 1);
        let stay_outside = cells.iter().find(|c| c.coord == CellCoord::new(4, 21)).unwrap();
        assert_eq!(stay_outside.penalty, 0);

        // Standing on the ground floor roof
        let mut roof = unit_at(10, 20, 1);
        let (altitude, standing_on) = altitude_at(&board, roof.position);
        roof.altitude = altitude;
        roof.standing_on = standing_on;
        assert_eq!(altitude, 1);
        let cells = reachable_cells(&roof, &board, 0.5);
        let along_roof = cells.iter().find(|c| c.coord == CellCoord::new(11, 20)).unwrap();
        assert_eq!(along_roof.penalty, 0);
        let up_to_second_floor = cells.iter().find(|c| c.coord == CellCoord::new(9, 19)).unwrap();
        assert_eq!(up_to_second_floor.penalty, 1);
    }

    #[test]
    fn test_altitude_at_takes_highest_floor() {
        let mut board = board();
        let ground = Structure::with_altitude(Footprint::new(5, 15, 15, 10), 1)
            .with_substructure(Structure::with_altitude(Footprint::new(5, 15, 5, 5), 2))
            .unwrap();
        let upper_id = ground.substructures()[0].id;
        board.register_structure(ground).unwrap();

        assert_eq!(altitude_at(&board, CellCoord::new(6, 16)), (2, Some(upper_id)));
        assert_eq!(altitude_at(&board, CellCoord::new(0, 0)), (0, None));
    }
}
