//! Read-only detection tables.
//!
//! Raw pattern strings are plain `&'static` data; the compiled regexes are
//! built once behind a `OnceLock` and shared by every caller. All patterns are
//! matched case-insensitively.

use regex::Regex;
use std::sync::OnceLock;
use timeline_core::{MilestoneType, StageType};

/// Raw detection patterns for one stage type.
#[derive(Debug, Clone, Copy)]
pub struct StagePatterns {
    /// Stage type the patterns belong to
    pub stage_type: StageType,
    /// Lowercase phrases matched against heading titles
    pub header_phrases: &'static [&'static str],
    /// Keyword-cluster regexes
    pub keywords: &'static [&'static str],
    /// Temporal-phrase regexes
    pub temporal: &'static [&'static str],
}

/// Stage patterns in `StageType::ALL` order.
pub const STAGE_PATTERNS: [StagePatterns; 10] = [
    StagePatterns {
        stage_type: StageType::Coursework,
        header_phrases: &["coursework", "courses", "course requirements", "taught component", "training"],
        keywords: &[
            r"\bcoursework\b",
            r"\bcourses?\b",
            r"\bcredits?\b",
            r"\bseminars?\b",
            r"\bmodules?\b",
            r"\b(?:comprehensive|qualifying) exam(?:ination)?s?\b",
        ],
        temporal: &[
            r"\bfirst year\b",
            r"\bfirst (?:two )?semesters?\b",
            r"\byear one\b",
        ],
    },
    StagePatterns {
        stage_type: StageType::LiteratureReview,
        header_phrases: &["literature review", "literature", "background", "related work", "state of the art"],
        keywords: &[
            r"\bliterature reviews?\b",
            r"\breview(?:ing)? (?:of )?(?:the )?(?:existing )?literature\b",
            r"\bsystematic reviews?\b",
            r"\brelated work\b",
            r"\bprior research\b",
            r"\bstate of the art\b",
        ],
        temporal: &[
            r"\b(?:first|initial) (?:few )?months\b",
            r"\bbefore (?:collecting|gathering) (?:any )?data\b",
            r"\bat the (?:start|beginning) of the (?:program|programme|project)\b",
        ],
    },
    StagePatterns {
        stage_type: StageType::Methodology,
        header_phrases: &["methodology", "methods", "research design", "approach"],
        keywords: &[
            r"\bmethodolog(?:y|ies|ical)\b",
            r"\bresearch design\b",
            r"\bresearch methods?\b",
            r"\bpilot stud(?:y|ies)\b",
            r"\bsampling (?:strategy|frame|plan)\b",
        ],
        temporal: &[
            r"\bbefore (?:the )?pilot\b",
            r"\bonce the (?:research )?design is\b",
        ],
    },
    StagePatterns {
        stage_type: StageType::ProposalDevelopment,
        header_phrases: &["proposal", "prospectus", "research plan"],
        keywords: &[
            r"\b(?:research |thesis |dissertation )?proposals?\b",
            r"\bprospectus\b",
            r"\bresearch questions?\b",
            r"\bcandidacy\b",
        ],
        temporal: &[
            r"\bend of (?:the )?first year\b",
            r"\bby the end of year one\b",
        ],
    },
    StagePatterns {
        stage_type: StageType::DataCollection,
        header_phrases: &["data collection", "fieldwork", "data gathering", "experiments"],
        keywords: &[
            r"\bdata collection\b",
            r"\bcollect(?:ing)? (?:the )?data\b",
            r"\bgather(?:ing)? (?:the )?data\b",
            r"\bfieldwork\b",
            r"\bsurveys?\b",
            r"\binterviews?\b",
            r"\bexperiments?\b",
        ],
        temporal: &[
            r"\bsecond year\b",
            r"\bafter (?:the )?(?:proposal|ethics approval)\b",
            r"\bonce (?:ethics|irb) approval\b",
        ],
    },
    StagePatterns {
        stage_type: StageType::Analysis,
        header_phrases: &["analysis", "results", "findings"],
        keywords: &[
            r"\banaly(?:sis|ses|ze|zing|se|sing)\b",
            r"\bstatistical\b",
            r"\bcoding (?:the )?(?:data|transcripts)\b",
            r"\bmodell?ing\b",
        ],
        temporal: &[
            r"\bafter collecting\b",
            r"\bonce (?:the )?data (?:is|are|has been|have been) collected\b",
        ],
    },
    StagePatterns {
        stage_type: StageType::Writing,
        header_phrases: &["writing", "write-up", "writing up", "dissertation writing"],
        keywords: &[
            r"\bwrit(?:e|ing) up\b",
            r"\bwrit(?:e|ing) (?:the )?(?:thesis|dissertation)\b",
            r"\b(?:thesis|dissertation) writing\b",
            r"\bwrite-up\b",
            r"\bdraft(?:ing)? (?:the )?(?:thesis|dissertation|chapters?)\b",
            r"\bchapters?\b",
        ],
        temporal: &[
            r"\bfinal year\b",
            r"\bthird year\b",
            r"\blast year of\b",
        ],
    },
    StagePatterns {
        stage_type: StageType::Publication,
        header_phrases: &["publication", "dissemination"],
        keywords: &[
            r"\bpublish(?:ed|ing)?\b",
            r"\bpublications?\b",
            r"\bjournals?\b",
            r"\bconference (?:papers?|presentations?)\b",
            r"\bpeer[- ]review(?:ed)?\b",
            r"\bmanuscripts?\b",
        ],
        temporal: &[
            r"\bthroughout the (?:program|programme|phd|degree)\b",
        ],
    },
    StagePatterns {
        stage_type: StageType::Submission,
        header_phrases: &["submission", "completion"],
        keywords: &[
            r"\b(?:thesis|dissertation) submission\b",
            r"\bsubmit(?:ting)? (?:the |my |a |their )?(?:final )?(?:thesis|dissertation)\b",
            r"\bfinal (?:thesis|dissertation)\b",
            r"\bexaminers?\b",
        ],
        temporal: &[
            r"\bfinal (?:months?|semester)\b",
            r"\bat the end of the (?:program|programme|degree)\b",
        ],
    },
    StagePatterns {
        stage_type: StageType::Defense,
        header_phrases: &["defense", "defence", "viva", "oral examination"],
        keywords: &[
            r"\b(?:thesis |dissertation |final |oral )?defen[cs]es?\b",
            r"\bviva(?: voce)?\b",
            r"\boral exam(?:ination)?\b",
        ],
        temporal: &[
            r"\b(?:after|following) submission\b",
        ],
    },
];

/// Stage patterns with compiled regexes.
#[derive(Debug)]
pub struct CompiledStagePatterns {
    /// Stage type the patterns belong to
    pub stage_type: StageType,
    /// Lowercase phrases matched against heading titles
    pub header_phrases: &'static [&'static str],
    /// Compiled keyword-cluster regexes
    pub keywords: Vec<Regex>,
    /// Compiled temporal-phrase regexes
    pub temporal: Vec<Regex>,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){}", pattern)).expect("detection pattern must compile")
}

/// Compiled stage patterns in `StageType::ALL` order.
pub fn stage_patterns() -> &'static [CompiledStagePatterns] {
    static PATTERNS: OnceLock<Vec<CompiledStagePatterns>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        STAGE_PATTERNS
            .iter()
            .map(|p| CompiledStagePatterns {
                stage_type: p.stage_type,
                header_phrases: p.header_phrases,
                keywords: p.keywords.iter().map(|k| compile(k)).collect(),
                temporal: p.temporal.iter().map(|t| compile(t)).collect(),
            })
            .collect()
    })
}

/// Milestone keyword categories, in scan order.
pub const MILESTONE_KEYWORDS: [(MilestoneType, &[&str]); 6] = [
    (
        MilestoneType::Exam,
        &[
            r"\b(?:comprehensive|qualifying|candidacy|preliminary) exam(?:ination)?s?\b",
            r"\bexam(?:ination)?s?\b",
        ],
    ),
    (
        MilestoneType::Proposal,
        &[
            r"\b(?:research |thesis |dissertation )?proposal(?: defen[cs]e| approval)?\b",
            r"\bprospectus\b",
        ],
    ),
    (
        MilestoneType::Review,
        &[
            r"\b(?:ethics|ethical|irb) (?:approval|review|clearance)\b",
            r"\b(?:annual|progress|committee|mid-term|midterm) reviews?\b",
            r"\bapprovals?\b",
        ],
    ),
    (
        MilestoneType::Publication,
        &[
            r"\b(?:journal|conference) (?:articles?|papers?|presentations?)\b",
            r"\bpublications?\b",
            r"\bmanuscripts?\b",
        ],
    ),
    (
        MilestoneType::Deliverable,
        &[
            r"\bdeliverables?\b",
            r"\b(?:first|final|complete|full) drafts?\b",
            r"\b(?:thesis|dissertation) submission\b",
            r"\bprogress reports?\b",
        ],
    ),
    (
        MilestoneType::Defense,
        &[
            r"\b(?:thesis |dissertation |final |oral )?defen[cs]es?\b",
            r"\bviva(?: voce)?\b",
        ],
    ),
];

/// Compiled milestone keyword categories, in scan order.
pub fn milestone_patterns() -> &'static [(MilestoneType, Vec<Regex>)] {
    static PATTERNS: OnceLock<Vec<(MilestoneType, Vec<Regex>)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        MILESTONE_KEYWORDS
            .iter()
            .map(|(milestone_type, patterns)| {
                (*milestone_type, patterns.iter().map(|p| compile(p)).collect())
            })
            .collect()
    })
}

/// Words that make a milestone critical when they appear in its sentence.
pub fn criticality_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"\b(?:required|mandatory|must|critical|essential)\b"))
}

/// A generic milestone synthesized when the text names too few.
#[derive(Debug, Clone, Copy)]
pub struct MilestoneTemplate {
    /// Milestone name
    pub name: &'static str,
    /// Category
    pub milestone_type: MilestoneType,
    /// Whether the milestone gates later work
    pub is_critical: bool,
}

const fn template(name: &'static str, milestone_type: MilestoneType, is_critical: bool) -> MilestoneTemplate {
    MilestoneTemplate { name, milestone_type, is_critical }
}

type M = MilestoneType;

/// Fallback milestones per stage type, in synthesis order.
pub const MILESTONE_TEMPLATES: [(StageType, &[MilestoneTemplate]); 10] = [
    (
        StageType::Coursework,
        &[
            template("Core coursework completed", M::Deliverable, false),
            template("Comprehensive exam passed", M::Exam, true),
            template("Training requirements signed off", M::Review, false),
        ],
    ),
    (
        StageType::LiteratureReview,
        &[
            template("Literature search protocol defined", M::Deliverable, false),
            template("Literature review chapter drafted", M::Deliverable, false),
            template("Literature review approved by supervisor", M::Review, false),
        ],
    ),
    (
        StageType::Methodology,
        &[
            template("Research design finalized", M::Deliverable, false),
            template("Methodology reviewed by committee", M::Review, false),
            template("Pilot study completed", M::Deliverable, false),
        ],
    ),
    (
        StageType::ProposalDevelopment,
        &[
            template("Research proposal drafted", M::Proposal, true),
            template("Proposal defense completed", M::Proposal, true),
            template("Proposal revisions submitted", M::Deliverable, false),
        ],
    ),
    (
        StageType::DataCollection,
        &[
            template("Data collection instruments finalized", M::Deliverable, false),
            template("Data collection completed", M::Deliverable, false),
            template("Data quality review completed", M::Review, false),
        ],
    ),
    (
        StageType::Analysis,
        &[
            template("Preliminary analysis completed", M::Deliverable, false),
            template("Results reviewed with supervisor", M::Review, false),
            template("Final analysis completed", M::Deliverable, false),
        ],
    ),
    (
        StageType::Writing,
        &[
            template("Thesis outline approved", M::Review, false),
            template("Full thesis draft completed", M::Deliverable, false),
            template("Final draft approved by committee", M::Review, true),
        ],
    ),
    (
        StageType::Publication,
        &[
            template("First manuscript submitted", M::Publication, false),
            template("Conference presentation delivered", M::Publication, false),
            template("Journal article accepted", M::Publication, false),
        ],
    ),
    (
        StageType::Submission,
        &[
            template("Thesis formatted for submission", M::Deliverable, false),
            template("Thesis submitted", M::Deliverable, true),
            template("Examiners appointed", M::Review, false),
        ],
    ),
    (
        StageType::Defense,
        &[
            template("Defense scheduled", M::Defense, true),
            template("Oral defense completed", M::Defense, true),
            template("Final corrections approved", M::Review, false),
        ],
    ),
];

/// Fallback milestones for a stage type.
pub fn milestone_templates(stage_type: StageType) -> &'static [MilestoneTemplate] {
    MILESTONE_TEMPLATES
        .iter()
        .find(|(t, _)| *t == stage_type)
        .map(|(_, templates)| *templates)
        .unwrap_or(&[])
}
