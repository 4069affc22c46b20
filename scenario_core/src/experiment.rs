//! Balanced experiment designs.
//!
//! Visibility and brake status are assigned round-robin and primary behavior
//! alternates, so each level appears within one of every other level no matter
//! the session length. The remaining factors are drawn at random and the whole
//! deck is shuffled so the participant cannot see the rotation.

use rand::{seq::SliceRandom, Rng};
use scenario_schema::{
    Behavior, BrakeStatus, ExperimentPlan, Location, RoadCondition, ScenarioFactors, Speed,
    Visibility,
};

use crate::{
    casting::{cast_background_entities, cast_primary_entity},
    config::{CastingConfig, EngineConfig, ExperimentConfig},
};

#[derive(Debug, Clone, Default)]
pub struct ExperimentDesigner {
    casting: CastingConfig,
}

impl ExperimentDesigner {
    pub fn new(casting: CastingConfig) -> Self {
        Self { casting }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.casting.clone())
    }

    pub fn casting(&self) -> &CastingConfig {
        &self.casting
    }

    pub fn generate_balanced_design<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> ExperimentPlan {
        let mut steps: Vec<ScenarioFactors> = (0..count)
            .map(|i| self.design_step(i, rng))
            .collect();
        steps.shuffle(rng);

        tracing::debug!(
            target: "scenario_grid::design",
            count,
            tailgaters = steps.iter().filter(|step| step.has_tailgater).count(),
            "design.generated"
        );
        ExperimentPlan { steps }
    }

    fn design_step<R: Rng + ?Sized>(&self, i: usize, rng: &mut R) -> ScenarioFactors {
        let visibility = Visibility::ALL[i % Visibility::ALL.len()];
        let brake_status = BrakeStatus::ALL[i % BrakeStatus::ALL.len()];
        let primary_behavior = if i % 2 == 0 {
            Behavior::Violation
        } else {
            Behavior::Compliant
        };

        let road_condition = *choose(&RoadCondition::ALL, rng);
        let location = *choose(&Location::ALL, rng);
        let mut speed = *choose(&Speed::ALL, rng);
        // Crawling on ice leaves no dilemma to study.
        if road_condition == RoadCondition::Icy && speed == Speed::Low {
            speed = Speed::Medium;
        }
        let has_tailgater = rng.gen_bool(0.5);

        ScenarioFactors {
            visibility,
            road_condition,
            location,
            brake_status,
            speed,
            has_tailgater,
            primary_entity: cast_primary_entity(rng),
            primary_behavior,
            background_entities: cast_background_entities(&self.casting, rng),
        }
    }
}

fn choose<'a, T, R: Rng + ?Sized>(values: &'a [T], rng: &mut R) -> &'a T {
    &values[rng.gen_range(0..values.len())]
}

/// Scenarios per session: the configured target, or one per loaded template.
pub fn plan_length(config: &ExperimentConfig, template_count: usize) -> usize {
    config.target_count.unwrap_or(template_count)
}
