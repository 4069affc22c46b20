//! Where template rows come from.
//!
//! The engine never talks to a database; persistence hands rows over through
//! [`TemplateSource`]. A JSON file source ships for local runs and tests.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use scenario_schema::TemplateRecord;
use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_TEMPLATES: &str = include_str!("data/templates.json");

pub trait TemplateSource {
    fn fetch_all(&self) -> Result<Vec<TemplateRecord>, TemplateSourceError>;
}

impl TemplateSource for Vec<TemplateRecord> {
    fn fetch_all(&self) -> Result<Vec<TemplateRecord>, TemplateSourceError> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TemplatesFile {
    templates: Vec<TemplateRecord>,
}

#[derive(Debug, Error)]
pub enum TemplateSourceError {
    #[error("failed to parse templates: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read templates from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct JsonTemplateSource {
    records: Vec<TemplateRecord>,
    path: Option<PathBuf>,
}

impl JsonTemplateSource {
    pub fn builtin() -> Result<Self, TemplateSourceError> {
        Self::from_json_str(BUILTIN_TEMPLATES)
    }

    pub fn from_json_str(json: &str) -> Result<Self, TemplateSourceError> {
        let parsed: TemplatesFile = serde_json::from_str(json)?;
        Ok(Self {
            records: parsed.templates,
            path: None,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, TemplateSourceError> {
        let contents = fs::read_to_string(path).map_err(|source| TemplateSourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut source = Self::from_json_str(&contents)?;
        source.path = Some(path.to_path_buf());
        Ok(source)
    }

    /// File the records were read from; `None` for the builtin set.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TemplateSource for JsonTemplateSource {
    fn fetch_all(&self) -> Result<Vec<TemplateRecord>, TemplateSourceError> {
        Ok(self.records.clone())
    }
}

/// Templates from `TEMPLATES_PATH` when set, otherwise the builtin set.
///
/// Unlike tuning config there is no silent fallback: a broken override file
/// is an error.
pub fn load_template_source_from_env() -> Result<JsonTemplateSource, TemplateSourceError> {
    match env::var("TEMPLATES_PATH").ok().map(PathBuf::from) {
        Some(path) => match JsonTemplateSource::from_file(&path) {
            Ok(source) => {
                tracing::info!(
                    target: "scenario_grid::templates",
                    path = %path.display(),
                    templates = source.len(),
                    "templates.source=file"
                );
                Ok(source)
            }
            Err(err) => {
                tracing::error!(
                    target: "scenario_grid::templates",
                    path = %path.display(),
                    error = %err,
                    "templates.source_failed"
                );
                Err(err)
            }
        },
        None => {
            let source = JsonTemplateSource::builtin()?;
            tracing::info!(
                target: "scenario_grid::templates",
                templates = source.len(),
                "templates.source=builtin"
            );
            Ok(source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_templates_parse() {
        let source = JsonTemplateSource::builtin().unwrap();
        assert!(source.len() >= 3);
        assert!(source.path().is_none());
        let records = source.fetch_all().unwrap();
        assert!(records.iter().all(|record| record.lane_config.is_some()));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = JsonTemplateSource::from_file(Path::new("/nonexistent/templates.json")).unwrap_err();
        assert!(matches!(err, TemplateSourceError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/templates.json"));
    }

    #[test]
    fn outer_document_must_list_templates() {
        let err = JsonTemplateSource::from_json_str(r#"{"maps": []}"#).unwrap_err();
        assert!(matches!(err, TemplateSourceError::Parse(_)));
    }
}
