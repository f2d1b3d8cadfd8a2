//! Duration estimation.
//!
//! Durations stated in the text win. Anything without an explicit mention
//! falls back to a fixed range for its stage or milestone type.

use regex::Regex;
use std::sync::OnceLock;
use timeline_core::text::context_window;
use timeline_core::{
    ConfidenceLevel, DetectedStage, DurationEstimate, EngineConfig, EstimateBasis,
    ExtractedMilestone, ItemType, MilestoneType, SectionMap, StageType, TextSegment,
};
use timeline_extract::{MilestoneExtractor, Segmenter, StageDetector};
use tracing::debug;

/// Chars of context kept on each side of a duration mention.
const CONTEXT_CHARS: usize = 50;

/// Default `(min_months, max_months)` per stage type.
pub fn stage_default_months(stage_type: StageType) -> (f64, f64) {
    match stage_type {
        StageType::Coursework => (6.0, 12.0),
        StageType::LiteratureReview => (3.0, 9.0),
        StageType::Methodology => (2.0, 6.0),
        StageType::ProposalDevelopment => (3.0, 6.0),
        StageType::DataCollection => (6.0, 18.0),
        StageType::Analysis => (3.0, 9.0),
        StageType::Writing => (6.0, 12.0),
        StageType::Publication => (3.0, 12.0),
        StageType::Submission => (1.0, 3.0),
        StageType::Defense => (1.0, 3.0),
    }
}

/// Default `(min_weeks, max_weeks)` per milestone type.
pub fn milestone_default_weeks(milestone_type: MilestoneType) -> (f64, f64) {
    match milestone_type {
        MilestoneType::Exam => (4.0, 12.0),
        MilestoneType::Proposal => (8.0, 16.0),
        MilestoneType::Review => (2.0, 6.0),
        MilestoneType::Publication => (12.0, 26.0),
        MilestoneType::Deliverable => (4.0, 8.0),
        MilestoneType::Defense => (2.0, 4.0),
    }
}

/// A duration mentioned in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitDuration {
    /// Surrounding text (±50 chars)
    pub context: String,
    /// Resolved length in months
    pub months: f64,
}

/// Duration patterns with their month multiplier.
fn duration_patterns() -> &'static [(Regex, f64)] {
    static PATTERNS: OnceLock<Vec<(Regex, f64)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"(?i)\b(\d{1,3}(?:\.\d+)?)[\s-]*months?\b", 1.0),
            (r"(?i)\b(\d{1,2}(?:\.\d+)?)[\s-]*years?\b", 12.0),
            (r"(?i)\b(one|two|three|four|five|six)[\s-]+months?\b", 1.0),
            (r"(?i)\b(one|two|three|four|five)[\s-]+years?\b", 12.0),
        ]
        .into_iter()
        .map(|(p, factor)| (Regex::new(p).expect("duration pattern must compile"), factor))
        .collect()
    })
}

fn parse_quantity(raw: &str) -> Option<f64> {
    match raw.to_lowercase().as_str() {
        "one" => Some(1.0),
        "two" => Some(2.0),
        "three" => Some(3.0),
        "four" => Some(4.0),
        "five" => Some(5.0),
        "six" => Some(6.0),
        digits => digits.parse().ok(),
    }
}

/// Estimates durations for stages and milestones.
#[derive(Debug, Clone)]
pub struct DurationEstimator {
    config: EngineConfig,
}

impl DurationEstimator {
    /// Create an estimator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an estimator with a custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Estimate durations from raw text.
    ///
    /// Stages and milestones are derived from the text when not supplied.
    pub fn estimate_durations(
        &self,
        text: &str,
        stages: Option<&[DetectedStage]>,
        milestones: Option<&[ExtractedMilestone]>,
        section_map: Option<&SectionMap>,
    ) -> Vec<DurationEstimate> {
        let segments = Segmenter::new().segment_text(text);

        let detected_stages;
        let stages = match stages {
            Some(stages) => stages,
            None => {
                detected_stages = StageDetector::with_limits(self.config.limits)
                    .detect_in_segments(&segments, section_map);
                &detected_stages
            }
        };

        let extracted;
        let milestones = match milestones {
            Some(milestones) => milestones,
            None => {
                extracted = MilestoneExtractor::with_limits(self.config.limits)
                    .extract_from_segments(&segments, stages);
                &extracted
            }
        };

        self.estimate_from_segments(&segments, stages, milestones)
    }

    /// Estimate durations over already segmented text.
    ///
    /// Stage estimates come first, then milestone estimates, each in input order.
    ///
    /// An explicit duration attaches to an item only when the item's name (or,
    /// for stages, the type label) appears within 50 chars of the mention in the
    /// same segment. A heading separated from its body by a blank line is its own
    /// segment, so durations in that body fall back to the default ranges.
    pub fn estimate_from_segments(
        &self,
        segments: &[TextSegment],
        stages: &[DetectedStage],
        milestones: &[ExtractedMilestone],
    ) -> Vec<DurationEstimate> {
        let explicit = Self::explicit_durations(segments);
        debug!("Found {} explicit duration mentions", explicit.len());

        let mut estimates = Vec::with_capacity(stages.len() + milestones.len());

        for stage in stages {
            let needles = [
                stage.title.to_lowercase(),
                stage.stage_type.label(),
                stage.stage_type.as_str().to_string(),
            ];
            let estimate = match find_explicit(&explicit, &needles) {
                Some(found) => {
                    DurationEstimate::from_months(&stage.title, ItemType::Stage, found.months, found.months)
                        .explicit(&found.context)
                }
                None => {
                    let (min, max) = stage_default_months(stage.stage_type);
                    DurationEstimate::from_months(&stage.title, ItemType::Stage, min, max)
                        .with_basis(ConfidenceLevel::Medium, EstimateBasis::Heuristic)
                }
            };
            estimates.push(estimate);
        }

        for milestone in milestones {
            let needles = [milestone.name.to_lowercase()];
            let estimate = match find_explicit(&explicit, &needles) {
                Some(found) => DurationEstimate::from_months(
                    &milestone.name,
                    ItemType::Milestone,
                    found.months,
                    found.months,
                )
                .explicit(&found.context),
                None => {
                    let (min, mut max) = milestone_default_weeks(milestone.milestone_type);
                    if milestone.is_critical {
                        max = (max * self.config.critical_widening).ceil();
                    }
                    DurationEstimate::from_weeks(&milestone.name, ItemType::Milestone, min, max)
                        .with_basis(ConfidenceLevel::Low, EstimateBasis::Default)
                }
            };
            estimates.push(estimate);
        }

        estimates
    }

    /// Every duration mention, keyed by its context, in document order.
    ///
    /// A context seen twice keeps its first value.
    pub fn explicit_durations(segments: &[TextSegment]) -> Vec<ExplicitDuration> {
        let mut found: Vec<ExplicitDuration> = Vec::new();

        for segment in segments {
            for (re, factor) in duration_patterns() {
                for caps in re.captures_iter(&segment.content) {
                    let (Some(whole), Some(quantity)) = (caps.get(0), caps.get(1)) else {
                        continue;
                    };
                    let Some(value) = parse_quantity(quantity.as_str()) else {
                        continue;
                    };
                    let months = value * factor;
                    if months <= 0.0 {
                        continue;
                    }

                    let context =
                        context_window(&segment.content, whole.start(), whole.end(), CONTEXT_CHARS, CONTEXT_CHARS)
                            .to_string();
                    if found.iter().any(|e| e.context == context) {
                        continue;
                    }
                    found.push(ExplicitDuration { context, months });
                }
            }
        }

        found
    }
}

impl Default for DurationEstimator {
    fn default() -> Self {
        Self::new()
    }
}

fn find_explicit<'a>(explicit: &'a [ExplicitDuration], needles: &[String]) -> Option<&'a ExplicitDuration> {
    explicit.iter().find(|e| {
        let context = e.context.to_lowercase();
        needles.iter().any(|n| !n.is_empty() && context.contains(n.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(text: &str) -> Vec<TextSegment> {
        Segmenter::new().segment_text(text)
    }

    #[test]
    fn test_empty_text() {
        assert!(DurationEstimator::new().estimate_durations("", None, None, None).is_empty());
    }

    #[test]
    fn test_explicit_patterns() {
        let found = DurationEstimator::explicit_durations(&segments(
            "Fieldwork lasts 9 months.\n\nWriting takes two years.\n\nThe pilot needs three months.\n\nOverall 1.5 years of analysis.",
        ));
        let months: Vec<f64> = found.iter().map(|e| e.months).collect();
        assert_eq!(months, vec![9.0, 24.0, 3.0, 18.0]);
    }

    #[test]
    fn test_hyphenated_duration() {
        let found = DurationEstimator::explicit_durations(&segments("A 6-month literature review."));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].months, 6.0);
    }

    #[test]
    fn test_context_window_is_bounded() {
        let text = format!("{} 4 months {}", "x".repeat(200), "y".repeat(200));
        let found = DurationEstimator::explicit_durations(&segments(&text));
        assert_eq!(found.len(), 1);
        assert!(found[0].context.chars().count() <= 50 + "4 months".len() + 50);
    }

    #[test]
    fn test_stage_explicit_estimate() {
        let text = "Data collection is expected to take 12 months.";
        let estimates = DurationEstimator::new().estimate_durations(text, None, None, None);

        let stage = estimates.iter().find(|e| e.item_type == ItemType::Stage).unwrap();
        assert_eq!(stage.item_description, "Data Collection");
        assert_eq!(stage.duration_months_min, 12.0);
        assert_eq!(stage.duration_months_max, 12.0);
        assert_eq!(stage.duration_weeks_min, 48.0);
        assert_eq!(stage.confidence, ConfidenceLevel::High);
        assert_eq!(stage.basis, EstimateBasis::Explicit);
        assert!(stage.source_text.as_deref().unwrap().contains("12 months"));
    }

    #[test]
    fn test_duration_in_separate_segment_is_not_attached() {
        let text = "Data Collection\n\nFieldwork takes 12 months.";
        let estimates = DurationEstimator::new().estimate_durations(text, None, None, None);

        let stage = estimates
            .iter()
            .find(|e| e.item_description == "Data Collection")
            .unwrap();
        assert_eq!(stage.basis, EstimateBasis::Heuristic);
        assert_eq!((stage.duration_months_min, stage.duration_months_max), (6.0, 18.0));
    }

    #[test]
    fn test_stage_heuristic_estimate() {
        let text = "The literature review covers prior research.";
        let estimates = DurationEstimator::new().estimate_durations(text, None, None, None);

        let stage = &estimates[0];
        assert_eq!(stage.item_type, ItemType::Stage);
        assert_eq!((stage.duration_months_min, stage.duration_months_max), (3.0, 9.0));
        assert_eq!((stage.duration_weeks_min, stage.duration_weeks_max), (12.0, 36.0));
        assert_eq!(stage.confidence, ConfidenceLevel::Medium);
        assert_eq!(stage.basis, EstimateBasis::Heuristic);
        assert!(stage.source_text.is_none());
    }

    #[test]
    fn test_critical_milestone_widened() {
        let text = "Ethics approval must be obtained before any data collection.";
        let estimates = DurationEstimator::new().estimate_durations(text, None, None, None);

        let ethics = estimates
            .iter()
            .find(|e| e.item_description == "Ethics approval must be obtained")
            .unwrap();
        assert_eq!(ethics.basis, EstimateBasis::Default);
        assert_eq!(ethics.confidence, ConfidenceLevel::Low);
        assert_eq!(ethics.duration_weeks_min, 2.0);
        assert_eq!(ethics.duration_weeks_max, 9.0);

        let regular = estimates
            .iter()
            .find(|e| e.item_description == "Data collection instruments finalized")
            .unwrap();
        assert_eq!((regular.duration_weeks_min, regular.duration_weeks_max), (4.0, 8.0));
    }

    #[test]
    fn test_milestone_explicit_estimate() {
        let text = "The qualifying exam takes 2 months.";
        let estimates = DurationEstimator::new().estimate_durations(text, None, None, None);

        let exam = estimates
            .iter()
            .find(|e| e.item_type == ItemType::Milestone && e.basis == EstimateBasis::Explicit)
            .unwrap();
        assert_eq!(exam.duration_months_min, 2.0);
        assert_eq!(exam.duration_weeks_max, 8.0);
    }

    #[test]
    fn test_ranges_are_ordered() {
        let text = "Coursework in year one.\n\nData collection over 18 months.\n\nThe thesis defense is mandatory.";
        for estimate in DurationEstimator::new().estimate_durations(text, None, None, None) {
            assert!(estimate.is_ordered(), "{:?}", estimate);
        }
    }
}
