//! Entity registry and casting pools.

use scenario_schema::{EnrichedEntity, EnrichedEntityMeta, RawEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDefinition {
    pub type_id: &'static str,
    pub base_name: &'static str,
    pub emoji: &'static str,
    pub tags: &'static [&'static str],
}

impl EntityDefinition {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }
}

const fn def(
    type_id: &'static str,
    base_name: &'static str,
    emoji: &'static str,
    tags: &'static [&'static str],
) -> EntityDefinition {
    EntityDefinition {
        type_id,
        base_name,
        emoji,
        tags,
    }
}

pub const EGO_ENTITY: &str = "vehicle_av";

pub const ENTITY_REGISTRY: &[EntityDefinition] = &[
    def(EGO_ENTITY, "Autonomous Vehicle", "🚕", &["ego", "vehicle", "agent"]),
    // Stars: the variable under study.
    def("ped_child", "Child", "🏃", &["star", "vulnerable", "pedestrian"]),
    def("ped_elderly", "Elderly Person", "👵", &["star", "vulnerable", "pedestrian", "slow"]),
    def("ped_doctor", "Doctor", "👨‍⚕️", &["star", "social_value_high", "pedestrian"]),
    def("ped_criminal", "Thief", "🦹", &["star", "social_value_low", "pedestrian"]),
    def("ped_pregnant", "Pregnant Woman", "🤰", &["star", "vulnerable", "pedestrian"]),
    def("ped_homeless", "Homeless Person", "🧔", &["star", "social_value_low", "pedestrian"]),
    def("animal_dog", "Dog", "🐕", &["star", "animal", "vulnerable"]),
    def("animal_cat", "Cat", "🐈", &["star", "animal", "vulnerable"]),
    // Background vehicles.
    def("vehicle_car", "Sedan", "🚗", &["background", "vehicle"]),
    def("vehicle_bus", "Bus", "🚌", &["background", "vehicle", "large"]),
    def("vehicle_truck", "Delivery Truck", "🚚", &["background", "vehicle", "large"]),
    def("vehicle_motorcycle", "Motorcycle", "🏍️", &["background", "vehicle", "fast", "vulnerable"]),
    def("vehicle_sports_car", "Sports Car", "🏎️", &["background", "vehicle", "fast"]),
    def("vehicle_police", "Police Car", "🚓", &["background", "vehicle", "emergency"]),
    def("vehicle_ambulance", "Ambulance", "🚑️", &["background", "vehicle", "emergency", "medical"]),
    // Background pedestrians.
    def("ped_adult", "Adult", "🧍", &["background", "pedestrian"]),
    def("ped_jogger", "Jogger", "🏃‍♀️", &["background", "pedestrian", "fast"]),
    def("ped_business", "Business Person", "💼", &["background", "pedestrian"]),
    // Static obstacles.
    def("obstacle_barrier", "Concrete Barrier", "🚧", &["background", "static"]),
    def("obstacle_cone", "Traffic Cone", "⚠️", &["background", "static", "small"]),
    def("obstacle_trash", "Trash Can", "🗑️", &["background", "static", "small"]),
];

pub const STAR_POOL: &[&str] = &[
    "ped_child",
    "ped_elderly",
    "ped_doctor",
    "ped_criminal",
    "ped_pregnant",
    "ped_homeless",
    "animal_dog",
    "animal_cat",
];

pub const VEHICLE_POOL: &[&str] = &[
    "vehicle_car",
    "vehicle_bus",
    "vehicle_truck",
    "vehicle_motorcycle",
    "vehicle_sports_car",
    "vehicle_police",
    "vehicle_ambulance",
];

pub const PEDESTRIAN_POOL: &[&str] = &["ped_adult", "ped_jogger", "ped_business"];

pub const OBSTACLE_POOL: &[&str] = &["obstacle_barrier", "obstacle_cone", "obstacle_trash"];

/// Vehicles, pedestrians and obstacles in that order.
pub const BACKGROUND_POOL: &[&str] = &[
    "vehicle_car",
    "vehicle_bus",
    "vehicle_truck",
    "vehicle_motorcycle",
    "vehicle_sports_car",
    "vehicle_police",
    "vehicle_ambulance",
    "ped_adult",
    "ped_jogger",
    "ped_business",
    "obstacle_barrier",
    "obstacle_cone",
    "obstacle_trash",
];

pub fn entity_definition(type_id: &str) -> Option<&'static EntityDefinition> {
    ENTITY_REGISTRY
        .iter()
        .find(|definition| definition.type_id == type_id)
}

/// Attach stable ids and registry emoji to entities placed by the narrative
/// generator. Ids are `ent_<type>_<position>`.
pub fn enrich_entities(raw: &[RawEntity]) -> Vec<EnrichedEntity> {
    raw.iter()
        .enumerate()
        .map(|(i, entity)| {
            let emoji = match entity_definition(&entity.entity_type) {
                Some(definition) => definition.emoji.to_string(),
                None => {
                    tracing::debug!(
                        target: "scenario_grid::scenario",
                        entity_type = %entity.entity_type,
                        "entities.unknown_type"
                    );
                    String::new()
                }
            };
            EnrichedEntity {
                id: format!("ent_{}_{}", entity.entity_type, i),
                entity_type: entity.entity_type.clone(),
                emoji,
                row: entity.row,
                col: entity.col,
                metadata: EnrichedEntityMeta {
                    is_star: entity.metadata.is_star,
                    is_ego: entity.metadata.is_ego,
                    is_violation: entity.metadata.is_violation,
                    action: entity.metadata.action.clone(),
                    orientation: entity.metadata.orientation,
                },
            }
        })
        .collect()
}
