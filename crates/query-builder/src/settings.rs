use crate::{
    classifier::ClassifierMode, error::BuilderError, fields::DEFAULT_MAX_CHART_DIMENSIONS,
    stream::DEFAULT_MAX_RESOLVE_DEPTH,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_STREAM_TYPE: &str = "logs";

/// Tunables for query analysis. Every field has a default, so an empty
/// JSON object is a valid settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Which construct set the builder classifier accepts
    pub classifier_mode: ClassifierMode,
    /// Recursion bound for stream resolution
    pub max_resolve_depth: usize,
    /// Grouping fields a chart can draw before falling back to a table
    pub max_chart_dimensions: usize,
    /// Stream type reported on decomposed panels
    pub default_stream_type: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            classifier_mode: ClassifierMode::default(),
            max_resolve_depth: DEFAULT_MAX_RESOLVE_DEPTH,
            max_chart_dimensions: DEFAULT_MAX_CHART_DIMENSIONS,
            default_stream_type: DEFAULT_STREAM_TYPE.to_string(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, BuilderError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BuilderError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), BuilderError> {
        if self.max_resolve_depth == 0 {
            return Err(BuilderError::InvalidSettings(
                "maxResolveDepth must be at least 1".to_string(),
            ));
        }
        if self.max_chart_dimensions == 0 {
            return Err(BuilderError::InvalidSettings(
                "maxChartDimensions must be at least 1".to_string(),
            ));
        }
        if self.default_stream_type.trim().is_empty() {
            return Err(BuilderError::InvalidSettings(
                "defaultStreamType must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SettingsBuilder {
    pub classifier_mode: Option<ClassifierMode>,
    pub max_resolve_depth: Option<usize>,
    pub max_chart_dimensions: Option<usize>,
    pub default_stream_type: Option<String>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classifier_mode(mut self, mode: ClassifierMode) -> Self {
        self.classifier_mode = Some(mode);
        self
    }

    pub fn max_resolve_depth(mut self, depth: usize) -> Self {
        self.max_resolve_depth = Some(depth);
        self
    }

    pub fn max_chart_dimensions(mut self, dimensions: usize) -> Self {
        self.max_chart_dimensions = Some(dimensions);
        self
    }

    pub fn default_stream_type(mut self, stream_type: &str) -> Self {
        self.default_stream_type = Some(stream_type.to_string());
        self
    }

    pub fn build(self) -> Result<Settings, BuilderError> {
        let defaults = Settings::default();
        let settings = Settings {
            classifier_mode: self.classifier_mode.unwrap_or(defaults.classifier_mode),
            max_resolve_depth: self.max_resolve_depth.unwrap_or(defaults.max_resolve_depth),
            max_chart_dimensions: self
                .max_chart_dimensions
                .unwrap_or(defaults.max_chart_dimensions),
            default_stream_type: self
                .default_stream_type
                .unwrap_or(defaults.default_stream_type),
        };
        settings.validate()?;
        Ok(settings)
    }
}
