use scenario_schema::{Coordinate, Direction, TemplateId};
use thiserror::Error;

use crate::template_source::TemplateSourceError;

/// Why a template could not be registered. Any of these aborts the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] TemplateSourceError),
    #[error("template `{template}` has malformed grid data: {source}")]
    MalformedGrid {
        template: TemplateId,
        #[source]
        source: serde_json::Error,
    },
    #[error("template `{template}` has malformed lane config: {source}")]
    MalformedLaneConfig {
        template: TemplateId,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "template `{template}` declares {declared_width}x{declared_height} but row {row} has {actual} cells"
    )]
    RowWidthMismatch {
        template: TemplateId,
        declared_width: u32,
        declared_height: u32,
        row: usize,
        actual: usize,
    },
    #[error("template `{template}` declares height {declared} but the grid has {actual} rows")]
    HeightMismatch {
        template: TemplateId,
        declared: u32,
        actual: usize,
    },
    #[error("template `{template}` lists lane cell {cell} ({direction}) outside the grid")]
    LaneOutOfBounds {
        template: TemplateId,
        direction: Direction,
        cell: Coordinate,
    },
    #[error("duplicate template id `{0}`")]
    DuplicateId(TemplateId),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("template load failed: {0}")]
    LoadFailure(#[from] LoadError),
    #[error("template `{0}` not found")]
    TemplateNotFound(TemplateId),
    #[error("template cache is empty")]
    EmptyCache,
    #[error("template `{0}` has no valid trident spawn")]
    NoValidSpawn(TemplateId),
    #[error("no drivable cell behind {cell} facing {orientation} on template `{template}`")]
    NoValidRearCoordinate {
        template: TemplateId,
        cell: Coordinate,
        orientation: Direction,
    },
}
