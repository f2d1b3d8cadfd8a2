//! Milestone extraction.
//!
//! Scans the evidence-bearing segments of each detected stage for milestone
//! keywords, then tops every stage up to the configured minimum from a fixed
//! template table. Each stage ends with between `min_milestones_per_stage` and
//! `max_milestones_per_stage` milestones.

use crate::patterns::{criticality_re, milestone_patterns, milestone_templates, MilestoneTemplate};
use crate::{Segmenter, StageDetector};
use regex::Match;
use std::collections::HashSet;
use timeline_core::text::{context_window, sentence_bounds, truncate_chars};
use timeline_core::{
    DetectedStage, ExtractedMilestone, Limits, MilestoneType, SectionMap, TextSegment,
};
use tracing::debug;

const MAX_NAME_CHARS: usize = 60;
const MAX_DESCRIPTION_CHARS: usize = 200;
const MAX_EVIDENCE_CHARS: usize = 150;
const DEDUP_PREFIX_CHARS: usize = 50;

const WORDS_BEFORE: usize = 2;
const WORDS_AFTER: usize = 3;

/// Confidence of a milestone read from the text.
pub const EXPLICIT_CONFIDENCE: f64 = 0.7;
/// Confidence of a milestone generated from a template.
pub const SYNTHESIZED_CONFIDENCE: f64 = 0.4;

/// Extracts milestones for detected stages.
#[derive(Debug, Clone)]
pub struct MilestoneExtractor {
    limits: Limits,
}

impl MilestoneExtractor {
    /// Create an extractor with default limits.
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create an extractor with custom limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    /// Extract milestones from raw text.
    ///
    /// Stages are detected internally when `stages` is `None`.
    pub fn extract_milestones(
        &self,
        text: &str,
        section_map: Option<&SectionMap>,
        stages: Option<&[DetectedStage]>,
    ) -> Vec<ExtractedMilestone> {
        let segments = Segmenter::new().segment_text(text);
        let detected;
        let stages = match stages {
            Some(stages) => stages,
            None => {
                detected = StageDetector::with_limits(self.limits).detect_in_segments(&segments, section_map);
                &detected
            }
        };
        self.extract_from_segments(&segments, stages)
    }

    /// Extract milestones from already segmented text, stage by stage.
    pub fn extract_from_segments(
        &self,
        segments: &[TextSegment],
        stages: &[DetectedStage],
    ) -> Vec<ExtractedMilestone> {
        let milestones: Vec<_> = stages
            .iter()
            .flat_map(|stage| self.extract_for_stage(segments, stage))
            .collect();

        debug!("Extracted {} milestones for {} stages", milestones.len(), stages.len());
        milestones
    }

    fn extract_for_stage(&self, segments: &[TextSegment], stage: &DetectedStage) -> Vec<ExtractedMilestone> {
        let mut milestones = Vec::new();
        let mut seen = HashSet::new();

        for index in stage.source_segments.iter().take(self.limits.milestone_segments) {
            let Some(segment) = segments.iter().find(|s| s.segment_index == *index) else {
                continue;
            };

            // Byte ranges already claimed by an earlier keyword in this segment
            let mut claimed: Vec<(usize, usize)> = Vec::new();

            for (milestone_type, regexes) in milestone_patterns() {
                for re in regexes {
                    for m in re.find_iter(&segment.content) {
                        if claimed.iter().any(|(s, e)| m.start() < *e && *s < m.end()) {
                            continue;
                        }
                        claimed.push((m.start(), m.end()));

                        let milestone = explicit_milestone(segment, m, *milestone_type, stage);
                        push_unique(&mut milestones, &mut seen, milestone);
                    }
                }
            }
        }

        let explicit = milestones.len();
        if explicit < self.limits.min_milestones_per_stage {
            for template in milestone_templates(stage.stage_type) {
                if milestones.len() >= self.limits.min_milestones_per_stage {
                    break;
                }
                push_unique(&mut milestones, &mut seen, synthesized_milestone(template, stage));
            }
        }
        milestones.truncate(self.limits.max_milestones_per_stage);

        debug!(
            "Stage {}: {} explicit, {} total milestones",
            stage.title,
            explicit,
            milestones.len()
        );
        milestones
    }
}

impl Default for MilestoneExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn push_unique(
    milestones: &mut Vec<ExtractedMilestone>,
    seen: &mut HashSet<(String, String, MilestoneType)>,
    milestone: ExtractedMilestone,
) {
    let key = (
        truncate_chars(&milestone.name.to_lowercase(), DEDUP_PREFIX_CHARS),
        milestone.stage.clone(),
        milestone.milestone_type,
    );
    if seen.insert(key) {
        milestones.push(milestone);
    }
}

fn explicit_milestone(
    segment: &TextSegment,
    m: Match<'_>,
    milestone_type: MilestoneType,
    stage: &DetectedStage,
) -> ExtractedMilestone {
    let content = segment.content.as_str();
    let (s_start, s_end) = sentence_bounds(content, m.start());
    let sentence = &content[s_start..s_end];

    // Match offsets relative to the sentence
    let rel_start = m.start().saturating_sub(s_start).min(sentence.len());
    let rel_end = m.end().saturating_sub(s_start).clamp(rel_start, sentence.len());

    let is_critical =
        milestone_type.is_inherently_critical() || criticality_re().is_match(sentence);

    ExtractedMilestone {
        name: milestone_name(sentence, rel_start, rel_end),
        description: truncate_chars(sentence, MAX_DESCRIPTION_CHARS),
        stage: stage.title.clone(),
        milestone_type,
        evidence_snippet: evidence_excerpt(sentence, rel_start, rel_end),
        keywords: vec![m.as_str().to_lowercase()],
        source_segment: Some(segment.segment_index),
        is_critical,
        confidence: EXPLICIT_CONFIDENCE,
    }
}

fn synthesized_milestone(template: &MilestoneTemplate, stage: &DetectedStage) -> ExtractedMilestone {
    ExtractedMilestone {
        name: template.name.to_string(),
        description: format!("Expected {} milestone for {}", template.milestone_type.as_str(), stage.title),
        stage: stage.title.clone(),
        milestone_type: template.milestone_type,
        evidence_snippet: format!("No explicit milestone found for {}", stage.title),
        keywords: Vec::new(),
        source_segment: None,
        is_critical: template.is_critical,
        confidence: SYNTHESIZED_CONFIDENCE,
    }
}

/// Words around the keyword, or the whole sentence when the window is too thin.
fn milestone_name(sentence: &str, start: usize, end: usize) -> String {
    let words = word_spans(sentence);
    let first = words.iter().position(|(_, e)| *e > start);
    let last = words.iter().rposition(|(s, _)| *s < end);

    let name = match (first, last) {
        (Some(first), Some(last)) if first <= last => {
            let from = first.saturating_sub(WORDS_BEFORE);
            let to = (last + WORDS_AFTER).min(words.len() - 1);
            if to > from {
                &sentence[words[from].0..words[to].1]
            } else {
                sentence
            }
        }
        _ => sentence,
    };

    let name = trim_punctuation(name);
    trim_punctuation(&truncate_chars(name, MAX_NAME_CHARS)).to_string()
}

fn word_spans(s: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in s.char_indices() {
        if c.is_whitespace() {
            if let Some(st) = start.take() {
                spans.push((st, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(st) = start {
        spans.push((st, s.len()));
    }
    spans
}

fn trim_punctuation(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '.' | '!' | '?' | '(' | ')' | '"' | '\''))
}

/// The sentence, re-centered on the keyword when it is too long.
fn evidence_excerpt(sentence: &str, start: usize, end: usize) -> String {
    if sentence.chars().count() <= MAX_EVIDENCE_CHARS {
        return sentence.to_string();
    }
    let keyword_chars = sentence[start..end].chars().count();
    let room = MAX_EVIDENCE_CHARS.saturating_sub(keyword_chars);
    let before = room / 2;
    let window = context_window(sentence, start, end, before, room - before);
    truncate_chars(window, MAX_EVIDENCE_CHARS)
}
