use std::env;
use std::error::Error;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use scenario_core::{
    load_engine_config_from_env, load_template_source_from_env, plan_length, ExperimentDesigner,
    ScenarioPlanner, ScenarioStep, TemplateCache,
};
use scenario_schema::SurfaceType;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (config, metadata) = load_engine_config_from_env()?;
    let source = load_template_source_from_env()?;
    let cache = TemplateCache::new();
    cache.load_all(&source)?;

    info!(
        target: "scenario_grid::inspect",
        config_path = ?metadata.path(),
        templates_path = ?source.path(),
        templates = cache.len(),
        "scenario inspector ready"
    );

    for template in cache.all()? {
        info!(
            target: "scenario_grid::inspect",
            id = %template.id(),
            name = template.name(),
            dimensions = %template.dimensions(),
            spawns = template.spawns().len(),
            drivable = template.cells_by_surface(SurfaceType::Drivable).len(),
            walkable = template.cells_by_surface(SurfaceType::Walkable).len(),
            restricted = template.cells_by_surface(SurfaceType::Restricted).len(),
            building = template.cells_by_surface(SurfaceType::Building).len(),
            "template.summary"
        );
    }

    let mut rng = match env::var("SCENARIO_SEED").ok() {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(seed) => ChaCha8Rng::seed_from_u64(seed),
            Err(err) => {
                warn!(
                    target: "scenario_grid::inspect",
                    value = %raw,
                    error = %err,
                    "seed.invalid=using_entropy"
                );
                ChaCha8Rng::from_entropy()
            }
        },
        None => ChaCha8Rng::from_entropy(),
    };

    let designer = ExperimentDesigner::from_config(&config);
    let plan = designer.generate_balanced_design(plan_length(&config.experiment, cache.len()), &mut rng);
    let planner = ScenarioPlanner::new(&cache);
    match planner.next_scenario(&plan, &[], &mut rng)? {
        ScenarioStep::Next(context) => {
            println!("{}", serde_json::to_string_pretty(&context)?);
        }
        ScenarioStep::Completed => {
            info!(
                target: "scenario_grid::inspect",
                steps = plan.len(),
                "plan.empty"
            );
        }
    }

    Ok(())
}
