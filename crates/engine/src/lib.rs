//! Timeline engine - turns program text into a structured timeline.
//!
//! ```text
//! Segment → Detect stages → Extract milestones → Estimate durations → Map dependencies
//! ```

#![warn(missing_docs)]

pub mod schedule;

pub use schedule::{project_schedule, ScheduledStage};

use timeline_core::{
    EngineConfig, ItemType, SectionMap, SegmentType, StructuredTimeline, TextSegment,
};
use timeline_deps::{validate, DependencyMapper};
use timeline_estimate::DurationEstimator;
use timeline_extract::{MilestoneExtractor, Segmenter, StageDetector};
use tracing::{debug, info};

/// Title used when the text has no header and no override is configured.
pub const DEFAULT_TITLE: &str = "Program Timeline";

/// Runs the full pipeline over one document.
#[derive(Debug, Clone, Default)]
pub struct TimelineEngine {
    config: EngineConfig,
}

impl TimelineEngine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a structured timeline from text and an optional heading map.
    pub fn create_structured_timeline(
        &self,
        text: &str,
        section_map: Option<&SectionMap>,
    ) -> StructuredTimeline {
        let limits = self.config.limits;
        let segments = Segmenter::new().segment_text(text);

        let stages = StageDetector::with_limits(limits).detect_in_segments(&segments, section_map);
        let milestones = MilestoneExtractor::with_limits(limits).extract_from_segments(&segments, &stages);
        let durations = DurationEstimator::with_config(self.config.clone())
            .estimate_from_segments(&segments, &stages, &milestones);
        let dependencies = DependencyMapper::with_limits(limits)
            .map_from_segments(&segments, &stages, &milestones);

        let (total_min, total_max) = durations
            .iter()
            .filter(|d| d.item_type == ItemType::Stage)
            .fold((0.0, 0.0), |(min, max), d| {
                (min + d.duration_months_min, max + d.duration_months_max)
            });
        let is_dag_valid = validate(&dependencies);

        let title = self
            .config
            .title
            .clone()
            .or_else(|| header_title(&segments))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let description = format!(
            "{} stages, {} milestones and {} dependencies; estimated {}-{} months",
            stages.len(),
            milestones.len(),
            dependencies.len(),
            total_min,
            total_max
        );

        debug!("Timeline '{}' built from {} segments", title, segments.len());
        info!("Built timeline: {}", description);

        StructuredTimeline {
            title,
            description,
            stages,
            milestones,
            durations,
            dependencies,
            total_duration_months_min: total_min,
            total_duration_months_max: total_max,
            is_dag_valid,
        }
    }
}

/// Build a structured timeline with the default configuration.
pub fn create_structured_timeline(text: &str, section_map: Option<&SectionMap>) -> StructuredTimeline {
    TimelineEngine::new().create_structured_timeline(text, section_map)
}

/// First header segment, without markdown markers.
fn header_title(segments: &[TextSegment]) -> Option<String> {
    segments
        .iter()
        .find(|s| s.segment_type == SegmentType::Header)
        .and_then(|s| s.content.lines().next())
        .map(|line| line.trim_start_matches('#').trim().to_string())
        .filter(|title| !title.is_empty())
}
