use rand::{seq::SliceRandom, Rng};
use scenario_schema::{
    Coordinate, Direction, EnrichedCoordinate, LaneConfigMap, SurfaceType, TemplateId,
    TemplateRecord, TridentSpawn, TridentZones,
};

use crate::{
    error::{EngineError, LoadError},
    grid_index::GridIndex,
    trident,
};

/// A map template with every derived lookup built. Read-only once constructed.
#[derive(Debug, Clone)]
pub struct ContextTemplate {
    id: TemplateId,
    name: String,
    width: u32,
    height: u32,
    grid: Vec<Vec<u16>>,
    lane_config: LaneConfigMap,
    index: GridIndex,
    spawns: Vec<TridentSpawn>,
}

impl ContextTemplate {
    pub fn from_record(record: TemplateRecord) -> Result<Self, LoadError> {
        let TemplateRecord {
            id,
            name,
            width,
            height,
            grid_data,
            lane_config,
        } = record;

        let grid: Vec<Vec<u16>> =
            serde_json::from_value(grid_data).map_err(|source| LoadError::MalformedGrid {
                template: id.clone(),
                source,
            })?;
        let lane_config = match lane_config {
            None | Some(serde_json::Value::Null) => LaneConfigMap::default(),
            Some(value) => serde_json::from_value(value).map_err(|source| {
                LoadError::MalformedLaneConfig {
                    template: id.clone(),
                    source,
                }
            })?,
        };

        let index = GridIndex::build(&id, &grid, &lane_config, width, height)?;
        let spawns = trident::enumerate_spawns(&index, &lane_config);
        tracing::debug!(
            target: "scenario_grid::templates",
            template = %id,
            width,
            height,
            lane_cells = lane_config.len(),
            spawns = spawns.len(),
            "template.indexed"
        );

        Ok(Self {
            id,
            name,
            width,
            height,
            grid,
            lane_config,
            index,
            spawns,
        })
    }

    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `"width:height"`, the form the narrative generator expects.
    pub fn dimensions(&self) -> String {
        format!("{}:{}", self.width, self.height)
    }

    pub fn grid(&self) -> &[Vec<u16>] {
        &self.grid
    }

    pub fn lane_config(&self) -> &LaneConfigMap {
        &self.lane_config
    }

    pub fn index(&self) -> &GridIndex {
        &self.index
    }

    pub fn spawns(&self) -> &[TridentSpawn] {
        &self.spawns
    }

    pub fn cells_by_surface(&self, surface: SurfaceType) -> &[Coordinate] {
        self.index.cells(surface)
    }

    pub fn random_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TridentSpawn, EngineError> {
        self.spawns
            .choose(rng)
            .copied()
            .ok_or_else(|| EngineError::NoValidSpawn(self.id.clone()))
    }

    pub fn trident_zones(&self, spawn: TridentSpawn) -> TridentZones {
        trident::trident_zones(&self.index, spawn)
    }

    pub fn rear_coordinate(
        &self,
        row: i32,
        col: i32,
        orientation: Direction,
    ) -> Result<EnrichedCoordinate, EngineError> {
        let spawn = TridentSpawn::new(row, col, orientation);
        trident::rear_cell(&self.index, spawn).ok_or_else(|| EngineError::NoValidRearCoordinate {
            template: self.id.clone(),
            cell: spawn.position(),
            orientation,
        })
    }
}
