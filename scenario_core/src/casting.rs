//! Picks the entities a scenario is staged with.

use rand::{seq::SliceRandom, Rng};

use crate::{
    config::CastingConfig,
    entities::{BACKGROUND_POOL, PEDESTRIAN_POOL, STAR_POOL, VEHICLE_POOL},
};

fn pick<R: Rng + ?Sized>(pool: &[&'static str], rng: &mut R) -> String {
    pool[rng.gen_range(0..pool.len())].to_string()
}

pub fn cast_primary_entity<R: Rng + ?Sized>(rng: &mut R) -> String {
    pick(STAR_POOL, rng)
}

/// Background kit of `background_min..=background_max` entities.
///
/// The first slot is always a vehicle and the second a pedestrian so every
/// context zone has something to fill it; the kit is shuffled afterwards.
pub fn cast_background_entities<R: Rng + ?Sized>(
    config: &CastingConfig,
    rng: &mut R,
) -> Vec<String> {
    let low = config.background_min.min(config.background_max);
    let count = rng.gen_range(low..=config.background_max);

    let mut kit: Vec<String> = (0..count)
        .map(|slot| match slot {
            0 => pick(VEHICLE_POOL, rng),
            1 => pick(PEDESTRIAN_POOL, rng),
            _ => pick(BACKGROUND_POOL, rng),
        })
        .collect();
    kit.shuffle(rng);
    kit
}
