//! Assembles the context for a session's next scenario.

use rand::Rng;
use scenario_schema::{ExperimentPlan, ScenarioContext, TemplateId};

use crate::{error::EngineError, template_cache::TemplateCache};

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioStep {
    Next(Box<ScenarioContext>),
    /// Every step of the plan has been played.
    Completed,
}

pub struct ScenarioPlanner<'a> {
    cache: &'a TemplateCache,
}

impl<'a> ScenarioPlanner<'a> {
    pub fn new(cache: &'a TemplateCache) -> Self {
        Self { cache }
    }

    /// Plan the step after `used` (the templates already played, in order).
    ///
    /// A tailgater is only placed when a drivable cell exists behind the ego
    /// vehicle; otherwise the returned factors have `has_tailgater` cleared.
    pub fn next_scenario<R: Rng + ?Sized>(
        &self,
        plan: &ExperimentPlan,
        used: &[TemplateId],
        rng: &mut R,
    ) -> Result<ScenarioStep, EngineError> {
        let step = used.len();
        let Some(factors) = plan.step(step) else {
            tracing::info!(
                target: "scenario_grid::scenario",
                steps = plan.len(),
                "scenario.completed"
            );
            return Ok(ScenarioStep::Completed);
        };

        let template = self.cache.pick_template(used, rng)?;
        let ego = template.random_spawn(rng)?;
        let trident_zones = template.trident_zones(ego);

        let mut factors = factors.clone();
        let tailgater = if factors.has_tailgater {
            match template.rear_coordinate(ego.row, ego.col, ego.orientation) {
                Ok(rear) => Some(rear),
                Err(err) => {
                    tracing::debug!(
                        target: "scenario_grid::scenario",
                        template = %template.id(),
                        error = %err,
                        "scenario.tailgater_dropped"
                    );
                    factors.has_tailgater = false;
                    None
                }
            }
        } else {
            None
        };

        tracing::debug!(
            target: "scenario_grid::scenario",
            step,
            template = %template.id(),
            row = ego.row,
            col = ego.col,
            orientation = %ego.orientation,
            tailgater = tailgater.is_some(),
            "scenario.planned"
        );

        Ok(ScenarioStep::Next(Box::new(ScenarioContext {
            template_id: template.id().clone(),
            template_name: template.name().to_string(),
            grid_dimensions: template.dimensions(),
            factors,
            ego,
            trident_zones,
            tailgater,
            lane_config: template.lane_config().clone(),
        })))
    }
}
