//! Process-wide template cache.
//!
//! Templates are indexed in parallel outside the lock and installed with a
//! single swap, so readers only ever observe a complete generation.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;
use rand::{seq::SliceRandom, Rng};
use rayon::prelude::*;
use scenario_schema::{
    Coordinate, Direction, EnrichedCoordinate, LaneConfigMap, SurfaceType, TemplateId,
    TemplateRecord, TridentSpawn, TridentZones,
};

use crate::{
    error::{EngineError, LoadError},
    template::ContextTemplate,
    template_source::TemplateSource,
};

#[derive(Debug, Default)]
struct CacheState {
    templates: Vec<Arc<ContextTemplate>>,
    by_id: AHashMap<TemplateId, usize>,
}

#[derive(Debug, Default)]
pub struct TemplateCache {
    state: RwLock<CacheState>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache contents with every template `source` yields.
    ///
    /// Any invalid template aborts the load and leaves the previous contents
    /// in place. Returns the number of templates now cached.
    pub fn load_all(&self, source: &dyn TemplateSource) -> Result<usize, EngineError> {
        let records = source.fetch_all().map_err(LoadError::from)?;
        self.load_records(records)
    }

    pub fn load_records(&self, records: Vec<TemplateRecord>) -> Result<usize, EngineError> {
        let mut seen = AHashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.clone()) {
                return Err(LoadError::DuplicateId(record.id.clone()).into());
            }
        }

        let templates = records
            .into_par_iter()
            .map(ContextTemplate::from_record)
            .collect::<Result<Vec<_>, _>>()?;

        let mut by_id = AHashMap::with_capacity(templates.len());
        let mut spawn_total = 0;
        for (slot, template) in templates.iter().enumerate() {
            by_id.insert(template.id().clone(), slot);
            spawn_total += template.spawns().len();
            if template.spawns().is_empty() {
                tracing::warn!(
                    target: "scenario_grid::templates",
                    template = %template.id(),
                    name = template.name(),
                    "templates.no_valid_spawn"
                );
            }
        }
        let count = templates.len();
        let next = CacheState {
            templates: templates.into_iter().map(Arc::new).collect(),
            by_id,
        };

        *self.state.write() = next;
        tracing::info!(
            target: "scenario_grid::templates",
            templates = count,
            spawns = spawn_total,
            "templates.loaded"
        );
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.state.read().templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().templates.is_empty()
    }

    pub fn ids(&self) -> Vec<TemplateId> {
        self.state
            .read()
            .templates
            .iter()
            .map(|template| template.id().clone())
            .collect()
    }

    /// Every cached template in load order.
    pub fn all(&self) -> Result<Vec<Arc<ContextTemplate>>, EngineError> {
        let state = self.state.read();
        if state.templates.is_empty() {
            return Err(EngineError::EmptyCache);
        }
        Ok(state.templates.clone())
    }

    pub fn get_by_id(&self, id: &TemplateId) -> Result<Arc<ContextTemplate>, EngineError> {
        let state = self.state.read();
        state
            .by_id
            .get(id)
            .map(|slot| Arc::clone(&state.templates[*slot]))
            .ok_or_else(|| EngineError::TemplateNotFound(id.clone()))
    }

    /// Uniform pick among templates not in `exclude`, or among all templates
    /// once every one has been used.
    pub fn pick_template<R: Rng + ?Sized>(
        &self,
        exclude: &[TemplateId],
        rng: &mut R,
    ) -> Result<Arc<ContextTemplate>, EngineError> {
        let state = self.state.read();
        if state.templates.is_empty() {
            return Err(EngineError::EmptyCache);
        }

        let candidates: Vec<&Arc<ContextTemplate>> = state
            .templates
            .iter()
            .filter(|template| !exclude.contains(template.id()))
            .collect();
        let picked = if candidates.is_empty() {
            tracing::debug!(
                target: "scenario_grid::templates",
                excluded = exclude.len(),
                "templates.pick_fallback"
            );
            state.templates.choose(rng)
        } else {
            candidates.choose(rng).copied()
        };
        picked.map(Arc::clone).ok_or(EngineError::EmptyCache)
    }

    pub fn lane_config(&self, id: &TemplateId) -> Result<LaneConfigMap, EngineError> {
        Ok(self.get_by_id(id)?.lane_config().clone())
    }

    pub fn cells_by_surface(
        &self,
        id: &TemplateId,
        surface: SurfaceType,
    ) -> Result<Vec<Coordinate>, EngineError> {
        Ok(self.get_by_id(id)?.cells_by_surface(surface).to_vec())
    }

    pub fn random_trident_spawn<R: Rng + ?Sized>(
        &self,
        id: &TemplateId,
        rng: &mut R,
    ) -> Result<TridentSpawn, EngineError> {
        self.get_by_id(id)?.random_spawn(rng)
    }

    pub fn trident_zones(
        &self,
        id: &TemplateId,
        spawn: TridentSpawn,
    ) -> Result<TridentZones, EngineError> {
        Ok(self.get_by_id(id)?.trident_zones(spawn))
    }

    pub fn rear_coordinate(
        &self,
        id: &TemplateId,
        row: i32,
        col: i32,
        orientation: Direction,
    ) -> Result<EnrichedCoordinate, EngineError> {
        self.get_by_id(id)?.rear_coordinate(row, col, orientation)
    }
}
