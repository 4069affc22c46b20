//! Per-template spatial lookups built once at load time.

use ahash::AHashMap;
use scenario_schema::{
    Coordinate, Direction, EnrichedCoordinate, LaneConfigMap, SurfaceType, TemplateId,
};

use crate::{error::LoadError, tiles};

/// Surface and lane lookups for one template grid, stored row-major.
#[derive(Debug, Clone)]
pub struct GridIndex {
    width: u32,
    height: u32,
    surfaces: Vec<SurfaceType>,
    lanes: Vec<Option<Direction>>,
    cells_by_surface: AHashMap<SurfaceType, Vec<Coordinate>>,
}

impl GridIndex {
    /// Classify every cell through the tile catalog and invert the lane config.
    ///
    /// The grid must match the declared dimensions exactly and every lane cell
    /// must lie inside it.
    pub fn build(
        template: &TemplateId,
        grid: &[Vec<u16>],
        lane_config: &LaneConfigMap,
        width: u32,
        height: u32,
    ) -> Result<Self, LoadError> {
        if grid.len() != height as usize {
            return Err(LoadError::HeightMismatch {
                template: template.clone(),
                declared: height,
                actual: grid.len(),
            });
        }

        if let Some((row, codes)) = grid
            .iter()
            .enumerate()
            .find(|(_, codes)| codes.len() != width as usize)
        {
            return Err(LoadError::RowWidthMismatch {
                template: template.clone(),
                declared_width: width,
                declared_height: height,
                row,
                actual: codes.len(),
            });
        }

        // Sized from the grid itself now that it matches the declared shape.
        let total: usize = grid.iter().map(Vec::len).sum();
        let mut surfaces = Vec::with_capacity(total);
        let mut cells_by_surface: AHashMap<SurfaceType, Vec<Coordinate>> = AHashMap::new();
        for (row, codes) in grid.iter().enumerate() {
            for (col, code) in codes.iter().enumerate() {
                let surface = tiles::classify(*code);
                surfaces.push(surface);
                cells_by_surface
                    .entry(surface)
                    .or_default()
                    .push(Coordinate::new(row as i32, col as i32));
            }
        }

        let mut index = Self {
            width,
            height,
            surfaces,
            lanes: vec![None; total],
            cells_by_surface,
        };

        for (direction, cell) in lane_config.iter() {
            let Some(idx) = index.index(cell) else {
                return Err(LoadError::LaneOutOfBounds {
                    template: template.clone(),
                    direction,
                    cell,
                });
            };
            match index.lanes[idx] {
                None => index.lanes[idx] = Some(direction),
                Some(existing) if existing != direction => {
                    tracing::warn!(
                        target: "scenario_grid::templates",
                        template = %template,
                        cell = %cell,
                        kept = %existing,
                        ignored = %direction,
                        "grid_index.lane_conflict"
                    );
                }
                Some(_) => {}
            }
        }

        Ok(index)
    }

    #[inline]
    fn index(&self, cell: Coordinate) -> Option<usize> {
        if cell.row >= 0
            && cell.col >= 0
            && (cell.row as u32) < self.height
            && (cell.col as u32) < self.width
        {
            Some(cell.row as usize * self.width as usize + cell.col as usize)
        } else {
            None
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, cell: Coordinate) -> bool {
        self.index(cell).is_some()
    }

    /// `None` when the cell is outside the grid.
    #[inline]
    pub fn surface_at(&self, cell: Coordinate) -> Option<SurfaceType> {
        self.index(cell).map(|idx| self.surfaces[idx])
    }

    #[inline]
    pub fn lane_direction_at(&self, cell: Coordinate) -> Option<Direction> {
        self.index(cell).and_then(|idx| self.lanes[idx])
    }

    /// Cells of one surface in row-major order.
    pub fn cells(&self, surface: SurfaceType) -> &[Coordinate] {
        self.cells_by_surface
            .get(&surface)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn enrich(&self, cell: Coordinate) -> Option<EnrichedCoordinate> {
        let idx = self.index(cell)?;
        Some(EnrichedCoordinate {
            coordinate: cell,
            surface: self.surfaces[idx],
            orientation: self.lanes[idx],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> TemplateId {
        TemplateId::from("grid-test")
    }

    fn sample_grid() -> Vec<Vec<u16>> {
        vec![
            vec![0, 3, 3, 0],
            vec![9, 12, 9, 16],
            vec![0, 4, 4, 42],
        ]
    }

    #[test]
    fn lookups_match_catalog_and_lane_config() {
        let grid = sample_grid();
        let lanes = LaneConfigMap::new()
            .with_lane(Direction::East, [Coordinate::new(1, 0), Coordinate::new(1, 2)])
            .with_lane(Direction::West, [Coordinate::new(1, 3)]);
        let index = GridIndex::build(&id(), &grid, &lanes, 4, 3).unwrap();

        for (row, codes) in grid.iter().enumerate() {
            for (col, code) in codes.iter().enumerate() {
                let cell = Coordinate::new(row as i32, col as i32);
                assert_eq!(index.surface_at(cell), Some(tiles::classify(*code)));
                let expected = Direction::ALL
                    .into_iter()
                    .find(|direction| lanes.get(*direction).contains(&cell));
                assert_eq!(index.lane_direction_at(cell), expected);
            }
        }
        assert_eq!(index.surface_at(Coordinate::new(2, 3)), Some(SurfaceType::Building));
        assert_eq!(index.surface_at(Coordinate::new(-1, 0)), None);
        assert_eq!(index.surface_at(Coordinate::new(0, 4)), None);
    }

    #[test]
    fn surface_sets_cover_grid() {
        let index = GridIndex::build(&id(), &sample_grid(), &LaneConfigMap::new(), 4, 3).unwrap();
        let total: usize = SurfaceType::ALL.iter().map(|s| index.cells(*s).len()).sum();
        assert_eq!(total, 12);
        assert_eq!(
            index.cells(SurfaceType::Restricted),
            &[Coordinate::new(1, 1)]
        );
        assert_eq!(index.cells(SurfaceType::Walkable).len(), 4);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let mut grid = sample_grid();
        grid[1].pop();
        let err = GridIndex::build(&id(), &grid, &LaneConfigMap::new(), 4, 3).unwrap_err();
        assert!(matches!(err, LoadError::RowWidthMismatch { row: 1, actual: 3, .. }));
    }

    #[test]
    fn huge_declared_width_is_rejected_cheaply() {
        let grid = vec![vec![9, 9, 9]];
        let err = GridIndex::build(&id(), &grid, &LaneConfigMap::new(), 4_000_000_000, 1).unwrap_err();
        assert!(matches!(
            err,
            LoadError::RowWidthMismatch {
                declared_width: 4_000_000_000,
                row: 0,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn row_count_must_match_height() {
        let err = GridIndex::build(&id(), &sample_grid(), &LaneConfigMap::new(), 4, 4).unwrap_err();
        assert!(matches!(err, LoadError::HeightMismatch { declared: 4, actual: 3, .. }));
    }

    #[test]
    fn lane_cells_outside_grid_are_rejected() {
        let lanes = LaneConfigMap::new().with_lane(Direction::North, [Coordinate::new(3, 0)]);
        let err = GridIndex::build(&id(), &sample_grid(), &lanes, 4, 3).unwrap_err();
        assert!(matches!(
            err,
            LoadError::LaneOutOfBounds {
                direction: Direction::North,
                ..
            }
        ));
    }

    #[test]
    fn conflicting_lane_keeps_first_direction() {
        let cell = Coordinate::new(1, 0);
        let lanes = LaneConfigMap::new()
            .with_lane(Direction::West, [cell])
            .with_lane(Direction::South, [cell]);
        let index = GridIndex::build(&id(), &sample_grid(), &lanes, 4, 3).unwrap();
        assert_eq!(index.lane_direction_at(cell), Some(Direction::South));
    }
}
