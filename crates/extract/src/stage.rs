//! Stage detection.
//!
//! Every stage type gathers evidence from three independent channels:
//! - Section headers from the upstream heading map
//! - Keyword clusters in the segment text
//! - Temporal phrases ("first year", "after collecting", ...)
//!
//! Confidence grows with the number of channels that agree, plus a small bonus
//! for the total number of matches.

use crate::patterns::{stage_patterns, CompiledStagePatterns};
use crate::Segmenter;
use std::collections::BTreeSet;
use timeline_core::text::context_window;
use timeline_core::{
    DetectedStage, EvidenceSnippet, EvidenceSource, Limits, SectionMap, TextSegment,
};
use tracing::debug;

/// Weight of each contributing channel.
const CHANNEL_WEIGHT: f64 = 0.3;
/// Weight of each individual match.
const MATCH_WEIGHT: f64 = 0.02;
/// Cap on the match bonus.
const MATCH_BONUS_CAP: f64 = 0.1;

/// Detects program stages in segmented text.
#[derive(Debug, Clone)]
pub struct StageDetector {
    limits: Limits,
}

/// Evidence gathered for one stage type.
#[derive(Debug, Default)]
struct StageEvidence {
    channels: BTreeSet<EvidenceSource>,
    total_matches: usize,
    keywords: Vec<String>,
    segments: Vec<usize>,
    evidence: Vec<EvidenceSnippet>,
}

impl StageEvidence {
    fn record(
        &mut self,
        limits: &Limits,
        source: EvidenceSource,
        keyword: String,
        snippet: EvidenceSnippet,
        segment: Option<usize>,
    ) {
        self.channels.insert(source);
        self.total_matches += 1;

        if self.keywords.len() < limits.max_keywords && !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
        if let Some(index) = segment {
            if self.segments.len() < limits.max_source_segments && !self.segments.contains(&index) {
                self.segments.push(index);
            }
        }
        if self.evidence.len() < limits.max_evidence {
            self.evidence.push(snippet);
        }
    }

    fn confidence(&self) -> f64 {
        let score = self.channels.len() as f64 * CHANNEL_WEIGHT
            + (self.total_matches as f64 * MATCH_WEIGHT).min(MATCH_BONUS_CAP);
        round_hundredths(score.min(1.0))
    }
}

impl StageDetector {
    /// Create a detector with default limits.
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create a detector with custom limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    /// Detect stages in raw text.
    pub fn detect_stages(&self, text: &str, section_map: Option<&SectionMap>) -> Vec<DetectedStage> {
        let segments = Segmenter::new().segment_text(text);
        self.detect_in_segments(&segments, section_map)
    }

    /// Detect stages in already segmented text.
    ///
    /// Results are sorted by `(order_hint asc, confidence desc)`.
    pub fn detect_in_segments(
        &self,
        segments: &[TextSegment],
        section_map: Option<&SectionMap>,
    ) -> Vec<DetectedStage> {
        let mut stages: Vec<DetectedStage> = stage_patterns()
            .iter()
            .filter_map(|patterns| {
                let mut found = StageEvidence::default();
                if let Some(map) = section_map.filter(|m| !m.is_empty()) {
                    self.scan_headers(patterns, map, segments, &mut found);
                }
                self.scan_segments(patterns, segments, &mut found);

                if found.total_matches == 0 {
                    return None;
                }
                Some(self.build_stage(patterns, found))
            })
            .collect();

        stages.sort_by(|a, b| {
            a.order_hint
                .cmp(&b.order_hint)
                .then_with(|| b.confidence.total_cmp(&a.confidence))
        });

        debug!("Detected {} stages from {} segments", stages.len(), segments.len());
        stages
    }

    /// Section-header channel.
    fn scan_headers(
        &self,
        patterns: &CompiledStagePatterns,
        map: &SectionMap,
        segments: &[TextSegment],
        found: &mut StageEvidence,
    ) {
        for section in &map.sections {
            let title = section.title.to_lowercase();
            let Some(phrase) = patterns.header_phrases.iter().find(|p| title.contains(*p)) else {
                continue;
            };

            let snippet = EvidenceSnippet {
                text: section.title.trim().to_string(),
                source: EvidenceSource::SectionHeader,
                location: format!("line {}", section.start_line),
            };
            let segment = segment_for_line(segments, section.start_line);
            found.record(
                &self.limits,
                EvidenceSource::SectionHeader,
                phrase.to_string(),
                snippet,
                segment,
            );
        }
    }

    /// Keyword-cluster and temporal-phrase channels.
    fn scan_segments(
        &self,
        patterns: &CompiledStagePatterns,
        segments: &[TextSegment],
        found: &mut StageEvidence,
    ) {
        let channels = [
            (EvidenceSource::KeywordCluster, &patterns.keywords, 30, 30),
            (EvidenceSource::TemporalPhrase, &patterns.temporal, 20, 40),
        ];

        for segment in segments {
            for (source, regexes, before, after) in &channels {
                for re in regexes.iter() {
                    // First match per pattern per segment
                    let Some(m) = re.find(&segment.content) else {
                        continue;
                    };
                    let snippet = EvidenceSnippet {
                        text: context_window(&segment.content, m.start(), m.end(), *before, *after)
                            .to_string(),
                        source: *source,
                        location: format!("segment {}", segment.segment_index),
                    };
                    found.record(
                        &self.limits,
                        *source,
                        m.as_str().to_lowercase(),
                        snippet,
                        Some(segment.segment_index),
                    );
                }
            }
        }
    }

    fn build_stage(&self, patterns: &CompiledStagePatterns, found: StageEvidence) -> DetectedStage {
        let stage_type = patterns.stage_type;
        let confidence = found.confidence();
        let channel_names: Vec<&str> = found
            .channels
            .iter()
            .map(|c| match c {
                EvidenceSource::SectionHeader => "section header",
                EvidenceSource::KeywordCluster => "keywords",
                EvidenceSource::TemporalPhrase => "temporal phrases",
            })
            .collect();

        debug!(
            "Stage {} matched {} signal(s), confidence {:.2}",
            stage_type.title(),
            found.total_matches,
            confidence
        );

        DetectedStage {
            stage_type,
            title: stage_type.title().to_string(),
            description: format!(
                "{} detected from {} ({} match{})",
                stage_type.title(),
                channel_names.join(", "),
                found.total_matches,
                if found.total_matches == 1 { "" } else { "es" }
            ),
            confidence,
            keywords_matched: found.keywords,
            source_segments: found.segments,
            evidence: found.evidence,
            order_hint: stage_type.order_hint(),
        }
    }
}

impl Default for StageDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Segment holding a heading line, or the first one after it.
fn segment_for_line(segments: &[TextSegment], line: usize) -> Option<usize> {
    segments
        .iter()
        .find(|s| s.contains_line(line) || s.line_numbers.0 > line)
        .map(|s| s.segment_index)
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
