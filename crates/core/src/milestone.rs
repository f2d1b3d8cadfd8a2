//! Milestone model - checkpoints nested inside a stage.

use serde::{Deserialize, Serialize};

/// Milestone category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneType {
    /// Comprehensive or qualifying exam
    Exam,
    /// Proposal draft, defense or approval
    Proposal,
    /// Ethics, progress or committee review
    Review,
    /// Article, paper or presentation
    Publication,
    /// Draft, report or other artifact
    Deliverable,
    /// Thesis defense or viva
    Defense,
}

impl MilestoneType {
    /// Every milestone type, in scan order.
    pub const ALL: [MilestoneType; 6] = [
        MilestoneType::Exam,
        MilestoneType::Proposal,
        MilestoneType::Review,
        MilestoneType::Publication,
        MilestoneType::Deliverable,
        MilestoneType::Defense,
    ];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneType::Exam => "exam",
            MilestoneType::Proposal => "proposal",
            MilestoneType::Review => "review",
            MilestoneType::Publication => "publication",
            MilestoneType::Deliverable => "deliverable",
            MilestoneType::Defense => "defense",
        }
    }

    /// Types that are critical regardless of wording.
    pub fn is_inherently_critical(&self) -> bool {
        matches!(
            self,
            MilestoneType::Exam | MilestoneType::Defense | MilestoneType::Proposal
        )
    }
}

/// A milestone found in (or synthesized for) a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMilestone {
    /// Short name (at most 60 chars)
    pub name: String,

    /// Containing sentence (at most 200 chars)
    pub description: String,

    /// Title of the owning stage
    pub stage: String,

    /// Category
    pub milestone_type: MilestoneType,

    /// Supporting excerpt (at most 150 chars)
    pub evidence_snippet: String,

    /// Keywords that triggered the extraction
    pub keywords: Vec<String>,

    /// Segment the milestone came from; `None` when synthesized
    pub source_segment: Option<usize>,

    /// Whether the milestone gates later work
    pub is_critical: bool,

    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl ExtractedMilestone {
    /// Whether this milestone was generated from a template.
    pub fn is_synthesized(&self) -> bool {
        self.source_segment.is_none()
    }
}
