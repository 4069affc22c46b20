#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;

use anyhow::Result;
use scenario_core::{JsonTemplateSource, TemplateCache};
use scenario_schema::TemplateId;

static INIT: Once = Once::new();

pub const CORRIDOR_ID: &str = "corridor-7x7";

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Point `TEMPLATES_PATH` at the corridor fixture for env-driven loaders.
pub fn ensure_corridor_templates_env() {
    INIT.call_once(|| {
        let path = fixture_path("corridor_templates.json");
        debug_assert!(
            path.exists(),
            "missing corridor fixture at {}",
            path.display()
        );
        std::env::set_var("TEMPLATES_PATH", &path);
    });
}

pub fn corridor_cache() -> Result<TemplateCache> {
    let source = JsonTemplateSource::from_file(&fixture_path("corridor_templates.json"))?;
    let cache = TemplateCache::new();
    cache.load_all(&source)?;
    Ok(cache)
}

pub fn builtin_cache() -> Result<TemplateCache> {
    let source = JsonTemplateSource::builtin()?;
    let cache = TemplateCache::new();
    cache.load_all(&source)?;
    Ok(cache)
}

pub fn corridor_id() -> TemplateId {
    TemplateId::from(CORRIDOR_ID)
}
