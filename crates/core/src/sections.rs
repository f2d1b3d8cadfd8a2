//! Heading map produced by the upstream heading-detection service.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Detected headings of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionMap {
    /// Headings in document order
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A single heading entry. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text
    pub title: String,

    /// Line of the heading (1-based)
    pub start_line: usize,

    /// Last line covered by the section, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,

    /// Heading depth, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl SectionMap {
    /// Build a map from `(title, start_line)` pairs.
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        Self {
            sections: titles
                .into_iter()
                .map(|(title, start_line)| Section {
                    title: title.into(),
                    start_line,
                    end_line: None,
                    level: None,
                })
                .collect(),
        }
    }

    /// Parse a heading map from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a heading map from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Whether the map has no headings.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_ignores_unknown_fields() {
        let json = r#"{"sections": [
            {"title": "Literature Review", "start_line": 1, "confidence": 0.9},
            {"title": "Analysis", "start_line": 9, "end_line": 12, "level": 2}
        ]}"#;

        let map = SectionMap::from_json(json).unwrap();
        assert_eq!(map.sections.len(), 2);
        assert_eq!(map.sections[0].title, "Literature Review");
        assert_eq!(map.sections[1].end_line, Some(12));
        assert_eq!(map.sections[1].level, Some(2));
    }

    #[test]
    fn test_from_json_missing_sections_is_empty() {
        let map = SectionMap::from_json("{}").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(SectionMap::from_json("not json").is_err());
    }

    #[test]
    fn test_from_titles() {
        let map = SectionMap::from_titles([("Data Collection", 4), ("Analysis", 8)]);
        assert_eq!(map.sections[1].start_line, 8);
        assert!(map.sections[0].level.is_none());
    }
}
