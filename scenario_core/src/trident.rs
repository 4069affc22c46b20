//! Trident zone geometry.
//!
//! From an ego spawn the engine looks [`ZONE_DISTANCE`] cells ahead and
//! expands three zones: A straight ahead, B to the vehicle's left and C to its
//! right. Side zones scan perpendicular to the road, stepping over road
//! markings and giving up at buildings.

use ahash::AHashSet;
use scenario_schema::{
    Coordinate, Direction, EnrichedCoordinate, LaneConfigMap, SurfaceType, TridentSpawn,
    TridentZone, TridentZones,
};

use crate::grid_index::GridIndex;

/// Cells between the spawn and the first row of the zones.
pub const ZONE_DISTANCE: i32 = 3;
/// Forward steps covered by each zone.
pub const ZONE_DEPTH: usize = 3;
/// How far a side scan may travel away from the forward strip.
pub const MAX_PERPENDICULAR_OFFSET: i32 = 5;
/// Forward steps that must find a side cell for a spawn to be usable.
pub const REQUIRED_SIDE_HITS: usize = ZONE_DEPTH;

/// Unit `(d_row, d_col)` vectors relative to a vehicle orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Basis {
    pub forward: (i32, i32),
    pub left: (i32, i32),
    pub right: (i32, i32),
}

pub const fn basis(orientation: Direction) -> Basis {
    match orientation {
        Direction::North => Basis {
            forward: (-1, 0),
            left: (0, -1),
            right: (0, 1),
        },
        Direction::South => Basis {
            forward: (1, 0),
            left: (0, 1),
            right: (0, -1),
        },
        Direction::East => Basis {
            forward: (0, 1),
            left: (-1, 0),
            right: (1, 0),
        },
        Direction::West => Basis {
            forward: (0, -1),
            left: (1, 0),
            right: (-1, 0),
        },
    }
}

/// Outcome of inspecting one cell during a perpendicular scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStep {
    /// Road marking: look one cell further out.
    Skip,
    /// Building or grid edge: this forward step has no side cell.
    Stop,
    /// Drivable or walkable: this is the side cell.
    Accept,
}

pub fn scan_step(surface: Option<SurfaceType>) -> ScanStep {
    match surface {
        Some(SurfaceType::Drivable | SurfaceType::Walkable) => ScanStep::Accept,
        Some(SurfaceType::Restricted) => ScanStep::Skip,
        Some(SurfaceType::Building) | None => ScanStep::Stop,
    }
}

/// First usable cell moving away from `origin` along `perpendicular`.
pub fn scan_side(index: &GridIndex, origin: Coordinate, perpendicular: (i32, i32)) -> Option<Coordinate> {
    for offset in 1..=MAX_PERPENDICULAR_OFFSET {
        let cell = origin.offset(perpendicular, offset)?;
        match scan_step(index.surface_at(cell)) {
            ScanStep::Skip => continue,
            ScanStep::Stop => return None,
            ScanStep::Accept => return Some(cell),
        }
    }
    None
}

fn zone_base(spawn: TridentSpawn) -> Option<Coordinate> {
    spawn
        .position()
        .offset(basis(spawn.orientation).forward, ZONE_DISTANCE)
}

/// Zone A: the strip straight ahead, cut short at the grid edge.
pub fn forward_zone(index: &GridIndex, spawn: TridentSpawn) -> TridentZone {
    let forward = basis(spawn.orientation).forward;
    let Some(base) = zone_base(spawn) else {
        return TridentZone::default();
    };
    let coordinates = (0..ZONE_DEPTH as i32)
        .map_while(|step| base.offset(forward, step).and_then(|cell| index.enrich(cell)))
        .collect();
    TridentZone { coordinates }
}

/// Zone B or C: one side cell per forward step that finds one.
pub fn side_zone(index: &GridIndex, spawn: TridentSpawn, perpendicular: (i32, i32)) -> TridentZone {
    let forward = basis(spawn.orientation).forward;
    let Some(base) = zone_base(spawn) else {
        return TridentZone::default();
    };
    let coordinates = (0..ZONE_DEPTH as i32)
        .filter_map(|step| base.offset(forward, step))
        .filter_map(|origin| scan_side(index, origin, perpendicular))
        .filter_map(|cell| index.enrich(cell))
        .collect();
    TridentZone { coordinates }
}

pub fn trident_zones(index: &GridIndex, spawn: TridentSpawn) -> TridentZones {
    let basis = basis(spawn.orientation);
    TridentZones {
        zone_a: forward_zone(index, spawn),
        zone_b: side_zone(index, spawn, basis.left),
        zone_c: side_zone(index, spawn, basis.right),
    }
}

fn is_road(cell: &EnrichedCoordinate) -> bool {
    matches!(cell.surface, SurfaceType::Drivable | SurfaceType::Restricted)
}

/// A spawn is usable when it sits on drivable asphalt, has a full road strip
/// ahead and a side cell for every forward step on both sides.
pub fn is_valid_spawn(index: &GridIndex, spawn: TridentSpawn) -> bool {
    if index.surface_at(spawn.position()) != Some(SurfaceType::Drivable) {
        return false;
    }
    let zones = trident_zones(index, spawn);
    zones.zone_a.len() == ZONE_DEPTH
        && zones.zone_a.iter().all(is_road)
        && zones.zone_b.len() == REQUIRED_SIDE_HITS
        && zones.zone_c.len() == REQUIRED_SIDE_HITS
}

/// Every valid spawn among the lane cells, in lane-config order.
pub fn enumerate_spawns(index: &GridIndex, lane_config: &LaneConfigMap) -> Vec<TridentSpawn> {
    let mut seen = AHashSet::new();
    lane_config
        .iter()
        .map(|(direction, cell)| TridentSpawn::new(cell.row, cell.col, direction))
        .filter(|spawn| seen.insert(*spawn))
        .filter(|spawn| is_valid_spawn(index, *spawn))
        .collect()
}

/// The drivable cell directly behind `spawn`, if any.
pub fn rear_cell(index: &GridIndex, spawn: TridentSpawn) -> Option<EnrichedCoordinate> {
    let forward = basis(spawn.orientation).forward;
    spawn
        .position()
        .offset(forward, -1)
        .and_then(|cell| index.enrich(cell))
        .filter(|cell| cell.surface == SurfaceType::Drivable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_schema::TemplateId;

    fn index_from(rows: &[&[u16]], lanes: &LaneConfigMap) -> GridIndex {
        let grid: Vec<Vec<u16>> = rows.iter().map(|row| row.to_vec()).collect();
        let width = grid.first().map(Vec::len).unwrap_or(0) as u32;
        let height = grid.len() as u32;
        GridIndex::build(&TemplateId::from("trident-test"), &grid, lanes, width, height).unwrap()
    }

    /// Buildings on rows 0, 1, 5 and 6, sidewalks on 2 and 4, asphalt on 3.
    fn corridor() -> GridIndex {
        index_from(
            &[
                &[0; 7],
                &[0; 7],
                &[3; 7],
                &[9; 7],
                &[4; 7],
                &[0; 7],
                &[0; 7],
            ],
            &LaneConfigMap::new(),
        )
    }

    fn coords(zone: &TridentZone) -> Vec<(i32, i32)> {
        zone.iter()
            .map(|cell| (cell.coordinate.row, cell.coordinate.col))
            .collect()
    }

    #[test]
    fn basis_table_is_fixed() {
        assert_eq!(
            basis(Direction::North),
            Basis {
                forward: (-1, 0),
                left: (0, -1),
                right: (0, 1)
            }
        );
        assert_eq!(
            basis(Direction::East),
            Basis {
                forward: (0, 1),
                left: (-1, 0),
                right: (1, 0)
            }
        );
        for direction in Direction::ALL {
            let b = basis(direction);
            assert_eq!(b.left, (-b.right.0, -b.right.1));
            assert_eq!(b.forward.0 * b.left.0 + b.forward.1 * b.left.1, 0);
        }
    }

    #[test]
    fn scan_step_outcomes() {
        assert_eq!(scan_step(Some(SurfaceType::Restricted)), ScanStep::Skip);
        assert_eq!(scan_step(Some(SurfaceType::Building)), ScanStep::Stop);
        assert_eq!(scan_step(None), ScanStep::Stop);
        assert_eq!(scan_step(Some(SurfaceType::Walkable)), ScanStep::Accept);
        assert_eq!(scan_step(Some(SurfaceType::Drivable)), ScanStep::Accept);
    }

    #[test]
    fn side_scan_steps_over_markings() {
        let index = index_from(&[&[3], &[12], &[12], &[9]], &LaneConfigMap::new());
        let found = scan_side(&index, Coordinate::new(3, 0), (-1, 0));
        assert_eq!(found, Some(Coordinate::new(0, 0)));
    }

    #[test]
    fn side_scan_stops_at_buildings() {
        let index = index_from(&[&[3], &[0], &[12], &[9]], &LaneConfigMap::new());
        assert_eq!(scan_side(&index, Coordinate::new(3, 0), (-1, 0)), None);
    }

    #[test]
    fn side_scan_is_bounded() {
        let index = index_from(
            &[&[3], &[12], &[12], &[12], &[12], &[12], &[9]],
            &LaneConfigMap::new(),
        );
        assert_eq!(scan_side(&index, Coordinate::new(6, 0), (-1, 0)), None);
        assert_eq!(scan_side(&index, Coordinate::new(6, 0), (0, 1)), None);
    }

    #[test]
    fn side_scan_reaches_the_last_offset() {
        let index = index_from(
            &[&[3], &[12], &[12], &[12], &[12], &[9]],
            &LaneConfigMap::new(),
        );
        assert_eq!(
            scan_side(&index, Coordinate::new(5, 0), (-1, 0)),
            Some(Coordinate::new(0, 0))
        );
    }

    #[test]
    fn far_out_positions_never_overflow() {
        let index = corridor();
        for orientation in Direction::ALL {
            for (row, col) in [
                (i32::MAX, 0),
                (i32::MIN, 0),
                (0, i32::MAX),
                (i32::MAX - 1, i32::MIN + 1),
            ] {
                let spawn = TridentSpawn::new(row, col, orientation);
                let zones = trident_zones(&index, spawn);
                assert!(zones.zone_a.is_empty());
                assert!(zones.zone_b.is_empty());
                assert!(zones.zone_c.is_empty());
                assert!(rear_cell(&index, spawn).is_none());
                assert!(!is_valid_spawn(&index, spawn));
            }
        }
    }

    #[test]
    fn corridor_zones_land_on_sidewalks() {
        let index = corridor();
        let zones = trident_zones(&index, TridentSpawn::new(3, 0, Direction::East));
        assert_eq!(coords(&zones.zone_a), vec![(3, 3), (3, 4), (3, 5)]);
        assert_eq!(coords(&zones.zone_b), vec![(2, 3), (2, 4), (2, 5)]);
        assert_eq!(coords(&zones.zone_c), vec![(4, 3), (4, 4), (4, 5)]);
        assert!(zones.zone_a.iter().all(|c| c.surface == SurfaceType::Drivable));
        assert!(zones.zone_b.iter().all(|c| c.surface == SurfaceType::Walkable));
    }

    #[test]
    fn forward_zone_stops_at_grid_edge() {
        let index = corridor();
        let spawn = TridentSpawn::new(3, 2, Direction::East);
        assert_eq!(coords(&forward_zone(&index, spawn)), vec![(3, 5), (3, 6)]);
        assert!(!is_valid_spawn(&index, spawn));
        assert!(is_valid_spawn(&index, TridentSpawn::new(3, 1, Direction::East)));
    }

    #[test]
    fn median_marking_does_not_block_side_zone() {
        let index = index_from(
            &[
                &[0; 7],
                &[3; 7],
                &[12; 7],
                &[9; 7],
                &[9; 7],
                &[4; 7],
                &[0; 7],
            ],
            &LaneConfigMap::new(),
        );
        let spawn = TridentSpawn::new(3, 0, Direction::East);
        let zones = trident_zones(&index, spawn);
        assert_eq!(coords(&zones.zone_b), vec![(1, 3), (1, 4), (1, 5)]);
        assert_eq!(coords(&zones.zone_c), vec![(4, 3), (4, 4), (4, 5)]);
        assert!(is_valid_spawn(&index, spawn));
    }

    #[test]
    fn building_beside_road_invalidates_spawn() {
        let index = index_from(
            &[&[0; 7], &[0; 7], &[0; 7], &[9; 7], &[4; 7], &[0; 7], &[0; 7]],
            &LaneConfigMap::new(),
        );
        let spawn = TridentSpawn::new(3, 0, Direction::East);
        assert!(trident_zones(&index, spawn).zone_b.is_empty());
        assert!(!is_valid_spawn(&index, spawn));
    }

    #[test]
    fn spawns_only_come_from_drivable_lane_cells() {
        let lanes = LaneConfigMap::new()
            .with_lane(
                Direction::East,
                [
                    Coordinate::new(3, 0),
                    Coordinate::new(3, 1),
                    Coordinate::new(3, 2),
                    Coordinate::new(3, 0),
                ],
            )
            .with_lane(Direction::West, [Coordinate::new(2, 6)]);
        let index = corridor();
        let spawns = enumerate_spawns(&index, &lanes);
        assert_eq!(
            spawns,
            vec![
                TridentSpawn::new(3, 0, Direction::East),
                TridentSpawn::new(3, 1, Direction::East)
            ]
        );
    }

    #[test]
    fn rear_cell_requires_drivable_in_bounds() {
        let index = corridor();
        let rear = rear_cell(&index, TridentSpawn::new(3, 1, Direction::East)).unwrap();
        assert_eq!(rear.coordinate, Coordinate::new(3, 0));
        assert!(rear_cell(&index, TridentSpawn::new(3, 0, Direction::East)).is_none());
        assert!(rear_cell(&index, TridentSpawn::new(3, 3, Direction::North)).is_none());
    }
}
