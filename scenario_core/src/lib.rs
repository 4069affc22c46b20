//! Scenario grid engine for the autonomous-vehicle dilemma study.
//!
//! Loads map templates into an in-memory [`TemplateCache`], finds where the ego
//! vehicle may start on each map and which cells surround it (the trident
//! zones), and generates balanced per-session experiment plans. A
//! [`ScenarioPlanner`] combines both into the context handed to the narrative
//! generator.

pub mod casting;
pub mod config;
pub mod entities;
mod error;
pub mod experiment;
pub mod grid_index;
mod scenario;
mod template;
mod template_cache;
pub mod template_source;
pub mod tiles;
pub mod trident;

pub use config::{
    load_engine_config_from_env, CastingConfig, EngineConfig, EngineConfigError,
    EngineConfigMetadata, ExperimentConfig,
};
pub use entities::{enrich_entities, entity_definition, EntityDefinition};
pub use error::{EngineError, LoadError};
pub use experiment::{plan_length, ExperimentDesigner};
pub use grid_index::GridIndex;
pub use scenario::{ScenarioPlanner, ScenarioStep};
pub use template::ContextTemplate;
pub use template_cache::TemplateCache;
pub use template_source::{
    load_template_source_from_env, JsonTemplateSource, TemplateSource, TemplateSourceError,
};
pub use tiles::{classify, TileDefinition, TileUsage, TILE_CATALOG};
pub use trident::{
    MAX_PERPENDICULAR_OFFSET, REQUIRED_SIDE_HITS, ZONE_DEPTH, ZONE_DISTANCE,
};
