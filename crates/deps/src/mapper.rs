//! Dependency mapping.
//!
//! Four sources propose candidate edges:
//! - explicit ordering signals naming two stages or two milestones
//! - the chronological order of the detected stages
//! - the order of milestones within each stage
//! - critical milestones that gate a later stage
//!
//! Candidates are then admitted one by one into a [`DependencyGraph`], highest
//! priority first, and dropped when they would close a cycle.

use crate::graph::{Admission, DependencyGraph};
use crate::signals::{blocked_stage, first_signal, Direction};
use timeline_core::{
    DetectedStage, Dependency, DependencyType, ExtractedMilestone, Limits, SectionMap, TextSegment,
};
use timeline_extract::{MilestoneExtractor, Segmenter, StageDetector};
use tracing::debug;

const EXPLICIT_STAGE_CONFIDENCE: f64 = 0.8;
const EXPLICIT_MILESTONE_CONFIDENCE: f64 = 0.7;
const IMPLICIT_STAGE_CONFIDENCE: f64 = 0.6;
const MILESTONE_ORDER_CONFIDENCE: f64 = 0.5;
const BLOCKING_CONFIDENCE: f64 = 0.9;

/// Maps ordering relations between stages and milestones.
#[derive(Debug, Clone)]
pub struct DependencyMapper {
    limits: Limits,
}

impl DependencyMapper {
    /// Create a mapper with default limits.
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create a mapper with custom limits (used when stages or milestones are derived).
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    /// Map dependencies from raw text.
    ///
    /// Stages and milestones are derived from the text when not supplied.
    pub fn map_dependencies(
        &self,
        text: &str,
        stages: Option<&[DetectedStage]>,
        milestones: Option<&[ExtractedMilestone]>,
        section_map: Option<&SectionMap>,
    ) -> Vec<Dependency> {
        let segments = Segmenter::new().segment_text(text);

        let detected_stages;
        let stages = match stages {
            Some(stages) => stages,
            None => {
                detected_stages =
                    StageDetector::with_limits(self.limits).detect_in_segments(&segments, section_map);
                &detected_stages
            }
        };

        let extracted;
        let milestones = match milestones {
            Some(milestones) => milestones,
            None => {
                extracted = MilestoneExtractor::with_limits(self.limits)
                    .extract_from_segments(&segments, stages);
                &extracted
            }
        };

        self.map_from_segments(&segments, stages, milestones)
    }

    /// Map dependencies over already segmented text. The result is acyclic.
    pub fn map_from_segments(
        &self,
        segments: &[TextSegment],
        stages: &[DetectedStage],
        milestones: &[ExtractedMilestone],
    ) -> Vec<Dependency> {
        let mut ordered: Vec<&DetectedStage> = stages.iter().collect();
        ordered.sort_by_key(|s| s.order_hint);

        let mut candidates = explicit_edges(segments, &ordered, milestones);
        candidates.extend(implicit_stage_edges(&ordered));
        candidates.extend(milestone_order_edges(&ordered, milestones));
        candidates.extend(blocking_edges(&ordered, milestones));

        let nodes = ordered
            .iter()
            .map(|s| s.title.as_str())
            .chain(milestones.iter().map(|m| m.name.as_str()));
        admit(candidates, nodes)
    }
}

impl Default for DependencyMapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Admit candidates in priority order, keeping only edges that leave the graph acyclic.
///
/// Order is `blocks`, then `sequential`, then the rest, with higher confidence
/// first inside each group. The sort is stable.
pub fn admit<'a>(mut candidates: Vec<Dependency>, nodes: impl IntoIterator<Item = &'a str>) -> Vec<Dependency> {
    candidates.sort_by(|a, b| {
        a.dependency_type
            .priority()
            .cmp(&b.dependency_type.priority())
            .then_with(|| b.confidence.total_cmp(&a.confidence))
    });

    let total = candidates.len();
    let mut graph = DependencyGraph::with_nodes(nodes);
    let mut admitted = Vec::new();

    for candidate in candidates {
        match graph.try_add_edge(&candidate.dependent_item, &candidate.depends_on_item) {
            Admission::Added => admitted.push(candidate),
            Admission::Cycle => debug!(
                "Dropped {} -> {}: would create a cycle",
                candidate.dependent_item, candidate.depends_on_item
            ),
            Admission::Duplicate | Admission::SelfLoop => {}
        }
    }

    debug!("Admitted {} of {} candidate dependencies", admitted.len(), total);
    admitted
}

/// Names mentioned in `text`, ordered by first occurrence.
fn mentions<'a>(text: &str, items: impl Iterator<Item = (&'a str, Vec<String>)>) -> Vec<(usize, &'a str)> {
    let mut found: Vec<(usize, &'a str)> = Vec::new();
    for (name, needles) in items {
        if found.iter().any(|(_, n)| *n == name) {
            continue;
        }
        let first = needles
            .iter()
            .filter(|n| !n.is_empty())
            .filter_map(|n| text.find(n.as_str()))
            .min();
        if let Some(pos) = first {
            found.push((pos, name));
        }
    }
    found.sort_by_key(|(pos, _)| *pos);
    found
}

fn signal_edge(
    named: &[(usize, &str)],
    signal_pos: usize,
    direction: Direction,
    dependency_type: DependencyType,
    confidence: f64,
    reason: &str,
) -> Option<Dependency> {
    let [(first_pos, first), (second_pos, second), ..] = named else {
        return None;
    };
    let backward_between =
        direction == Direction::Backward && *first_pos < signal_pos && signal_pos < *second_pos;
    let (dependent, depends_on) = if backward_between {
        (first, second)
    } else {
        (second, first)
    };
    Some(Dependency::new(*dependent, *depends_on, dependency_type, confidence, reason))
}

fn explicit_edges(
    segments: &[TextSegment],
    stages: &[&DetectedStage],
    milestones: &[ExtractedMilestone],
) -> Vec<Dependency> {
    let mut edges = Vec::new();

    for segment in segments {
        let text = segment.content.to_lowercase();
        let Some((signal, signal_pos)) = first_signal(&text) else {
            continue;
        };
        let reason = format!(
            "Explicit '{}' signal in segment {}",
            signal.phrase, segment.segment_index
        );

        let named_stages = mentions(
            &text,
            stages
                .iter()
                .map(|s| (s.title.as_str(), vec![s.title.to_lowercase(), s.stage_type.label()])),
        );
        edges.extend(signal_edge(
            &named_stages,
            signal_pos,
            signal.direction,
            signal.dependency_type,
            EXPLICIT_STAGE_CONFIDENCE,
            &reason,
        ));

        let named_milestones = mentions(
            &text,
            milestones
                .iter()
                .map(|m| (m.name.as_str(), vec![m.name.to_lowercase()])),
        );
        edges.extend(signal_edge(
            &named_milestones,
            signal_pos,
            signal.direction,
            signal.dependency_type,
            EXPLICIT_MILESTONE_CONFIDENCE,
            &reason,
        ));
    }

    edges
}

fn implicit_stage_edges(stages: &[&DetectedStage]) -> Vec<Dependency> {
    stages
        .windows(2)
        .map(|pair| {
            Dependency::new(
                &pair[1].title,
                &pair[0].title,
                DependencyType::Sequential,
                IMPLICIT_STAGE_CONFIDENCE,
                "Implicit chronological order",
            )
        })
        .collect()
}

fn milestone_order_edges(stages: &[&DetectedStage], milestones: &[ExtractedMilestone]) -> Vec<Dependency> {
    let mut edges = Vec::new();

    for stage in stages {
        let mut own: Vec<&ExtractedMilestone> =
            milestones.iter().filter(|m| m.stage == stage.title).collect();
        own.sort_by(|a, b| {
            b.is_critical
                .cmp(&a.is_critical)
                .then_with(|| b.confidence.total_cmp(&a.confidence))
        });

        for pair in own.windows(2) {
            edges.push(Dependency::new(
                &pair[1].name,
                &pair[0].name,
                DependencyType::Sequential,
                MILESTONE_ORDER_CONFIDENCE,
                format!("Milestone order within {}", stage.title),
            ));
        }
    }

    edges
}

fn blocking_edges(stages: &[&DetectedStage], milestones: &[ExtractedMilestone]) -> Vec<Dependency> {
    milestones
        .iter()
        .filter(|m| m.is_critical)
        .filter_map(|m| {
            let target = blocked_stage(&m.name)?;
            let stage = stages.iter().find(|s| s.stage_type == target)?;
            Some(Dependency::new(
                &stage.title,
                &m.name,
                DependencyType::Blocks,
                BLOCKING_CONFIDENCE,
                format!("Critical milestone '{}' blocks {}", m.name, stage.title),
            ))
        })
        .collect()
}
