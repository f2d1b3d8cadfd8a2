//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::{Result, TimelineError};

/// Configuration for the timeline engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Title override (None = derived from the text)
    pub title: Option<String>,
    /// Retention and synthesis limits
    pub limits: Limits,
    /// Multiplier applied to the default upper bound of critical milestones
    pub critical_widening: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: None,
            limits: Limits::default(),
            critical_widening: 1.5,
        }
    }
}

/// Caps applied while collecting evidence and milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Keyword tags kept per stage
    pub max_keywords: usize,
    /// Evidence snippets kept per stage
    pub max_evidence: usize,
    /// Source segment indices kept per stage
    pub max_source_segments: usize,
    /// Source segments scanned for milestones per stage
    pub milestone_segments: usize,
    /// Milestones guaranteed per stage
    pub min_milestones_per_stage: usize,
    /// Milestones kept per stage
    pub max_milestones_per_stage: usize,
}

impl Limits {
    /// Highest `min_milestones_per_stage` the fallback templates can always satisfy.
    pub const MAX_GUARANTEED_MILESTONES: usize = 3;
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_keywords: 10,
            max_evidence: 5,
            max_source_segments: 5,
            milestone_segments: 3,
            min_milestones_per_stage: 2,
            max_milestones_per_stage: 5,
        }
    }
}

impl EngineConfig {
    /// Check that the limits are coherent.
    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        if limits.min_milestones_per_stage == 0 {
            return Err(TimelineError::InvalidConfig(
                "min_milestones_per_stage must be at least 1".to_string(),
            ));
        }
        if limits.min_milestones_per_stage > Limits::MAX_GUARANTEED_MILESTONES {
            return Err(TimelineError::InvalidConfig(format!(
                "min_milestones_per_stage ({}) exceeds the {} fallback milestones available per stage",
                limits.min_milestones_per_stage,
                Limits::MAX_GUARANTEED_MILESTONES
            )));
        }
        if limits.min_milestones_per_stage > limits.max_milestones_per_stage {
            return Err(TimelineError::InvalidConfig(format!(
                "min_milestones_per_stage ({}) exceeds max_milestones_per_stage ({})",
                limits.min_milestones_per_stage, limits.max_milestones_per_stage
            )));
        }
        if !(self.critical_widening >= 1.0) {
            return Err(TimelineError::InvalidConfig(format!(
                "critical_widening must be >= 1.0, got {}",
                self.critical_widening
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.limits.max_milestones_per_stage, 5);
        assert_eq!(config.critical_widening, 1.5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"title": "My Plan", "limits": {"max_keywords": 4}}"#).unwrap();
        assert_eq!(config.title.as_deref(), Some("My Plan"));
        assert_eq!(config.limits.max_keywords, 4);
        assert_eq!(config.limits.max_evidence, 5);
    }

    #[test]
    fn test_rejects_inverted_milestone_bounds() {
        let result = EngineConfig::from_json(
            r#"{"limits": {"min_milestones_per_stage": 3, "max_milestones_per_stage": 2}}"#,
        );
        assert!(matches!(result, Err(TimelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_minimum_above_fallback_templates() {
        let result = EngineConfig::from_json(
            r#"{"limits": {"min_milestones_per_stage": 4, "max_milestones_per_stage": 5}}"#,
        );
        assert!(matches!(result, Err(TimelineError::InvalidConfig(_))));

        let config = EngineConfig::from_json(
            r#"{"limits": {"min_milestones_per_stage": 3, "max_milestones_per_stage": 5}}"#,
        )
        .unwrap();
        assert_eq!(config.limits.min_milestones_per_stage, Limits::MAX_GUARANTEED_MILESTONES);
    }

    #[test]
    fn test_rejects_shrinking_widening() {
        let mut config = EngineConfig::default();
        config.critical_widening = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"critical_widening": 2.0}}"#).unwrap();

        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.critical_widening, 2.0);
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = EngineConfig::from_json_file("/nonexistent/timeline.json");
        assert!(matches!(result, Err(TimelineError::Io(_))));
    }
}
