//! Text segment model - blank-line separated blocks of the input.

use serde::{Deserialize, Serialize};

/// A contiguous block of non-blank lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    /// Trimmed lines joined with `\n`
    pub content: String,

    /// Position of this segment in the document
    pub segment_index: usize,

    /// First and last line (1-based, inclusive)
    pub line_numbers: (usize, usize),

    /// Structural classification
    pub segment_type: SegmentType,
}

impl TextSegment {
    /// Whether the given 1-based line falls inside this segment.
    pub fn contains_line(&self, line: usize) -> bool {
        self.line_numbers.0 <= line && line <= self.line_numbers.1
    }
}

/// Segment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    /// Plain prose
    Paragraph,
    /// Numbered or lettered list
    NumberedList,
    /// Bulleted list
    BulletList,
    /// Markdown or all-caps heading
    Header,
}

impl SegmentType {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::Paragraph => "paragraph",
            SegmentType::NumberedList => "numbered_list",
            SegmentType::BulletList => "bullet_list",
            SegmentType::Header => "header",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_line_inclusive() {
        let segment = TextSegment {
            content: "a\nb\nc".to_string(),
            segment_index: 0,
            line_numbers: (3, 5),
            segment_type: SegmentType::Paragraph,
        };

        assert!(!segment.contains_line(2));
        assert!(segment.contains_line(3));
        assert!(segment.contains_line(5));
        assert!(!segment.contains_line(6));
    }

    #[test]
    fn test_segment_type_serializes_snake_case() {
        let json = serde_json::to_string(&SegmentType::NumberedList).unwrap();
        assert_eq!(json, "\"numbered_list\"");
        assert_eq!(SegmentType::BulletList.as_str(), "bullet_list");
    }
}
