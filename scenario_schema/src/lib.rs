//! Data contracts shared between the scenario grid engine and its
//! collaborators (persistence, scenario service, narrative generator).
//!
//! Everything here is plain serde data; the algorithms live in
//! `scenario_core`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    Drivable,
    Walkable,
    Building,
    Restricted,
}

impl SurfaceType {
    pub const ALL: [SurfaceType; 4] = [
        SurfaceType::Drivable,
        SurfaceType::Walkable,
        SurfaceType::Building,
        SurfaceType::Restricted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceType::Drivable => "drivable",
            SurfaceType::Walkable => "walkable",
            SurfaceType::Building => "building",
            SurfaceType::Restricted => "restricted",
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compass orientation of a lane or of the ego vehicle. Rows grow southward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: i32,
    pub col: i32,
}

impl Coordinate {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move `steps` times along the unit vector `(d_row, d_col)`.
    ///
    /// `None` when the result does not fit in `i32`.
    pub fn offset(self, (d_row, d_col): (i32, i32), steps: i32) -> Option<Self> {
        let row = self.row.checked_add(d_row.checked_mul(steps)?)?;
        let col = self.col.checked_add(d_col.checked_mul(steps)?)?;
        Some(Self { row, col })
    }
}

impl From<[i32; 2]> for Coordinate {
    fn from([row, col]: [i32; 2]) -> Self {
        Self { row, col }
    }
}

impl From<Coordinate> for [i32; 2] {
    fn from(coord: Coordinate) -> Self {
        [coord.row, coord.col]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedCoordinate {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub surface: SurfaceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Direction>,
}

type RawLaneConfig = BTreeMap<Direction, Vec<[i32; 2]>>;

/// Which drivable cells carry traffic in which direction.
///
/// Serialized as `{"E": [[3, 0], [3, 1]], "W": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLaneConfig", into = "RawLaneConfig")]
pub struct LaneConfigMap {
    lanes: BTreeMap<Direction, Vec<Coordinate>>,
}

impl LaneConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lane(
        mut self,
        direction: Direction,
        cells: impl IntoIterator<Item = Coordinate>,
    ) -> Self {
        self.lanes.entry(direction).or_default().extend(cells);
        self
    }

    pub fn get(&self, direction: Direction) -> &[Coordinate] {
        self.lanes
            .get(&direction)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every (direction, coordinate) pair in direction order, then listing order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Coordinate)> + '_ {
        self.lanes
            .iter()
            .flat_map(|(direction, cells)| cells.iter().map(move |cell| (*direction, *cell)))
    }

    pub fn active_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.lanes
            .iter()
            .filter(|(_, cells)| !cells.is_empty())
            .map(|(direction, _)| *direction)
    }

    /// Total number of lane cells across all directions.
    pub fn len(&self) -> usize {
        self.lanes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<RawLaneConfig> for LaneConfigMap {
    fn from(raw: RawLaneConfig) -> Self {
        let lanes = raw
            .into_iter()
            .map(|(direction, cells)| {
                (
                    direction,
                    cells.into_iter().map(Coordinate::from).collect(),
                )
            })
            .collect();
        Self { lanes }
    }
}

impl From<LaneConfigMap> for RawLaneConfig {
    fn from(config: LaneConfigMap) -> Self {
        config
            .lanes
            .into_iter()
            .map(|(direction, cells)| (direction, cells.into_iter().map(Into::into).collect()))
            .collect()
    }
}

/// Where the ego vehicle starts and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TridentSpawn {
    pub row: i32,
    pub col: i32,
    pub orientation: Direction,
}

impl TridentSpawn {
    pub const fn new(row: i32, col: i32, orientation: Direction) -> Self {
        Self {
            row,
            col,
            orientation,
        }
    }

    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.row, self.col)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TridentZone {
    pub coordinates: Vec<EnrichedCoordinate>,
}

impl TridentZone {
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnrichedCoordinate> {
        self.coordinates.iter()
    }
}

/// Forward (A), left (B) and right (C) zones ahead of the ego vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TridentZones {
    pub zone_a: TridentZone,
    pub zone_b: TridentZone,
    pub zone_c: TridentZone,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A context template row as handed over by persistence. `grid_data` and
/// `lane_config` are raw JSON and are only validated when the template is
/// indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: TemplateId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub grid_data: serde_json::Value,
    #[serde(default)]
    pub lane_config: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Clear,
    Fog,
    Night,
    Rain,
}

impl Visibility {
    pub const ALL: [Visibility; 4] = [
        Visibility::Clear,
        Visibility::Fog,
        Visibility::Night,
        Visibility::Rain,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadCondition {
    Dry,
    Wet,
    Icy,
}

impl RoadCondition {
    pub const ALL: [RoadCondition; 3] = [RoadCondition::Dry, RoadCondition::Wet, RoadCondition::Icy];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "CN")]
    Cn,
    #[serde(rename = "FR")]
    Fr,
}

impl Location {
    pub const ALL: [Location; 4] = [Location::Us, Location::Uk, Location::Cn, Location::Fr];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrakeStatus {
    Active,
    Failed,
    Fade,
}

impl BrakeStatus {
    pub const ALL: [BrakeStatus; 3] = [BrakeStatus::Active, BrakeStatus::Failed, BrakeStatus::Fade];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speed {
    Low,
    Medium,
    High,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Low, Speed::Medium, Speed::High];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Behavior {
    Violation,
    Compliant,
}

/// Factor assignment for one scenario step of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFactors {
    pub visibility: Visibility,
    pub road_condition: RoadCondition,
    pub location: Location,
    pub brake_status: BrakeStatus,
    pub speed: Speed,
    pub has_tailgater: bool,
    pub primary_entity: String,
    pub primary_behavior: Behavior,
    pub background_entities: Vec<String>,
}

/// Ordered factor assignments for a whole session, fixed at session creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentPlan {
    pub steps: Vec<ScenarioFactors>,
}

impl ExperimentPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&ScenarioFactors> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioFactors> {
        self.steps.iter()
    }
}

/// Everything the narrative generator needs to stage one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioContext {
    pub template_id: TemplateId,
    pub template_name: String,
    /// `"width:height"`.
    pub grid_dimensions: String,
    pub factors: ScenarioFactors,
    pub ego: TridentSpawn,
    pub trident_zones: TridentZones,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tailgater: Option<EnrichedCoordinate>,
    pub lane_config: LaneConfigMap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntityMeta {
    #[serde(default)]
    pub is_star: bool,
    #[serde(default)]
    pub is_ego: bool,
    #[serde(default)]
    pub is_violation: bool,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub orientation: Option<Direction>,
}

/// Entity placement as returned by the narrative generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub row: i32,
    pub col: i32,
    #[serde(default)]
    pub metadata: RawEntityMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedEntityMeta {
    pub is_star: bool,
    pub is_ego: bool,
    pub is_violation: bool,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub emoji: String,
    pub row: i32,
    pub col: i32,
    pub metadata: EnrichedEntityMeta,
}
