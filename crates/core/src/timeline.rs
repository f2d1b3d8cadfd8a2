//! The structured timeline handed to the orchestration layer.

use serde::{Deserialize, Serialize};
use crate::{Dependency, DetectedStage, DurationEstimate, ExtractedMilestone};

/// Complete output of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredTimeline {
    /// Timeline title
    pub title: String,

    /// Summary line
    pub description: String,

    /// Stages in chronological order
    pub stages: Vec<DetectedStage>,

    /// Milestones grouped by stage
    pub milestones: Vec<ExtractedMilestone>,

    /// Stage estimates followed by milestone estimates
    pub durations: Vec<DurationEstimate>,

    /// Acyclic dependency edges
    pub dependencies: Vec<Dependency>,

    /// Sum of stage lower bounds
    pub total_duration_months_min: f64,

    /// Sum of stage upper bounds
    pub total_duration_months_max: f64,

    /// Whether the dependency set is acyclic
    pub is_dag_valid: bool,
}

impl StructuredTimeline {
    /// Milestones belonging to a stage title.
    pub fn milestones_for<'a>(&'a self, stage: &'a str) -> impl Iterator<Item = &'a ExtractedMilestone> + 'a {
        self.milestones.iter().filter(move |m| m.stage == stage)
    }

    /// Duration estimate for a named item.
    pub fn duration_of(&self, item: &str) -> Option<&DurationEstimate> {
        self.durations.iter().find(|d| d.item_description == item)
    }
}
