//! Text segmentation.
//!
//! Splits normalized text into blank-line separated segments and classifies
//! each one structurally. Line numbers are 1-based.

use regex::Regex;
use std::sync::OnceLock;
use timeline_core::{SegmentType, TextSegment};
use tracing::debug;

fn numbered_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\d{1,3}[.)]|\(\d{1,3}\)|[A-Za-z][.)])\s+\S")
            .expect("numbered-list regex must compile")
    })
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*+•]\s+\S").expect("bullet regex must compile"))
}

fn markdown_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#{1,6}\s+\S").expect("markdown header regex must compile"))
}

fn caps_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^a-z]*[A-Z][^a-z]*$").expect("caps header regex must compile")
    })
}

/// Splits text into classified segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter;

impl Segmenter {
    /// Create a new segmenter.
    pub fn new() -> Self {
        Self
    }

    /// Split text on blank lines. Empty or whitespace-only input yields no segments.
    pub fn segment_text(&self, text: &str) -> Vec<TextSegment> {
        let mut segments = Vec::new();
        let mut lines: Vec<&str> = Vec::new();
        let mut start_line = 0;

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                if !lines.is_empty() {
                    segments.push(build_segment(segments.len(), &lines, start_line));
                    lines.clear();
                }
                continue;
            }
            if lines.is_empty() {
                start_line = i + 1;
            }
            lines.push(line);
        }
        if !lines.is_empty() {
            segments.push(build_segment(segments.len(), &lines, start_line));
        }

        debug!("Segmented text into {} segments", segments.len());
        segments
    }
}

fn build_segment(index: usize, lines: &[&str], start_line: usize) -> TextSegment {
    let segment_type = classify(lines);
    let end_line = start_line + lines.len() - 1;
    debug!("Segment {}: {} (lines {}-{})", index, segment_type.as_str(), start_line, end_line);

    TextSegment {
        content: lines.join("\n"),
        segment_index: index,
        line_numbers: (start_line, end_line),
        segment_type,
    }
}

fn classify(lines: &[&str]) -> SegmentType {
    let first = lines[0];

    if numbered_re().is_match(first) {
        SegmentType::NumberedList
    } else if bullet_re().is_match(first) {
        SegmentType::BulletList
    } else if markdown_header_re().is_match(first)
        || (lines.len() == 1 && caps_header_re().is_match(first))
    {
        SegmentType::Header
    } else {
        SegmentType::Paragraph
    }
}
