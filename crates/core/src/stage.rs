//! Stage model - program phases detected in free-form text.

use serde::{Deserialize, Serialize};

/// The fixed taxonomy of program phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageType {
    /// Taught courses and exams
    Coursework,
    /// Survey of prior work
    LiteratureReview,
    /// Research design
    Methodology,
    /// Research proposal and its defense
    ProposalDevelopment,
    /// Fieldwork, surveys, experiments
    DataCollection,
    /// Analysis of collected data
    Analysis,
    /// Thesis write-up
    Writing,
    /// Papers and presentations
    Publication,
    /// Thesis submission
    Submission,
    /// Oral defense
    Defense,
}

impl StageType {
    /// Every stage type in chronological order.
    pub const ALL: [StageType; 10] = [
        StageType::Coursework,
        StageType::LiteratureReview,
        StageType::Methodology,
        StageType::ProposalDevelopment,
        StageType::DataCollection,
        StageType::Analysis,
        StageType::Writing,
        StageType::Publication,
        StageType::Submission,
        StageType::Defense,
    ];

    /// Fixed chronological position (1-10).
    pub fn order_hint(&self) -> u8 {
        match self {
            StageType::Coursework => 1,
            StageType::LiteratureReview => 2,
            StageType::Methodology => 3,
            StageType::ProposalDevelopment => 4,
            StageType::DataCollection => 5,
            StageType::Analysis => 6,
            StageType::Writing => 7,
            StageType::Publication => 8,
            StageType::Submission => 9,
            StageType::Defense => 10,
        }
    }

    /// Display title, also used as the stage's node name in the dependency graph.
    pub fn title(&self) -> &'static str {
        match self {
            StageType::Coursework => "Coursework",
            StageType::LiteratureReview => "Literature Review",
            StageType::Methodology => "Methodology",
            StageType::ProposalDevelopment => "Proposal Development",
            StageType::DataCollection => "Data Collection",
            StageType::Analysis => "Analysis",
            StageType::Writing => "Thesis Writing",
            StageType::Publication => "Publication",
            StageType::Submission => "Submission",
            StageType::Defense => "Defense",
        }
    }

    /// Snake-case type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StageType::Coursework => "coursework",
            StageType::LiteratureReview => "literature_review",
            StageType::Methodology => "methodology",
            StageType::ProposalDevelopment => "proposal_development",
            StageType::DataCollection => "data_collection",
            StageType::Analysis => "analysis",
            StageType::Writing => "writing",
            StageType::Publication => "publication",
            StageType::Submission => "submission",
            StageType::Defense => "defense",
        }
    }

    /// Type name with underscores replaced by spaces, as it reads in prose.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl std::fmt::Display for StageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Which detection channel produced a piece of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    /// Heading from the heading map
    SectionHeader,
    /// Stage keyword in the text
    KeywordCluster,
    /// Time-related phrase in the text
    TemporalPhrase,
}

/// A short excerpt supporting a stage detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSnippet {
    /// Excerpt text
    pub text: String,

    /// Channel that produced it
    pub source: EvidenceSource,

    /// Where it was found, e.g. `segment 2` or `line 14`
    pub location: String,
}

/// A stage candidate with its supporting evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedStage {
    /// Stage type
    pub stage_type: StageType,

    /// Display title
    pub title: String,

    /// Human-readable summary of the detection
    pub description: String,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Matched keyword tags (at most 10)
    pub keywords_matched: Vec<String>,

    /// Indices of supporting segments (at most 5)
    pub source_segments: Vec<usize>,

    /// Supporting snippets (at most 5)
    pub evidence: Vec<EvidenceSnippet>,

    /// Chronological sort key
    pub order_hint: u8,
}
