//! Duration estimate model.

use serde::{Deserialize, Serialize};

/// What kind of item an estimate covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// A detected stage
    Stage,
    /// A milestone
    Milestone,
}

/// Coarse confidence bucket for an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Read from the text
    High,
    /// Per-stage default
    Medium,
    /// Fallback
    Low,
}

/// Where an estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateBasis {
    /// A duration stated in the text
    Explicit,
    /// Per-stage-type default range
    Heuristic,
    /// Per-milestone-type fallback range
    Default,
}

/// Estimated duration range of a stage or milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationEstimate {
    /// Stage title or milestone name
    pub item_description: String,

    /// Stage or milestone
    pub item_type: ItemType,

    /// Lower bound in weeks
    pub duration_weeks_min: f64,

    /// Upper bound in weeks
    pub duration_weeks_max: f64,

    /// Lower bound in months
    pub duration_months_min: f64,

    /// Upper bound in months
    pub duration_months_max: f64,

    /// Confidence bucket
    pub confidence: ConfidenceLevel,

    /// Estimate basis
    pub basis: EstimateBasis,

    /// Context the explicit duration was read from
    pub source_text: Option<String>,
}

impl DurationEstimate {
    /// Build an estimate from a month range; weeks are four per month.
    pub fn from_months(
        item_description: impl Into<String>,
        item_type: ItemType,
        months_min: f64,
        months_max: f64,
    ) -> Self {
        Self {
            item_description: item_description.into(),
            item_type,
            duration_weeks_min: months_min * 4.0,
            duration_weeks_max: months_max * 4.0,
            duration_months_min: months_min,
            duration_months_max: months_max,
            confidence: ConfidenceLevel::Medium,
            basis: EstimateBasis::Heuristic,
            source_text: None,
        }
    }

    /// Build an estimate from a week range; months are rounded to one decimal.
    pub fn from_weeks(
        item_description: impl Into<String>,
        item_type: ItemType,
        weeks_min: f64,
        weeks_max: f64,
    ) -> Self {
        Self {
            item_description: item_description.into(),
            item_type,
            duration_weeks_min: weeks_min,
            duration_weeks_max: weeks_max,
            duration_months_min: round_tenth(weeks_min / 4.0),
            duration_months_max: round_tenth(weeks_max / 4.0),
            confidence: ConfidenceLevel::Low,
            basis: EstimateBasis::Default,
            source_text: None,
        }
    }

    /// Mark as read from the text.
    pub fn explicit(mut self, source_text: impl Into<String>) -> Self {
        self.confidence = ConfidenceLevel::High;
        self.basis = EstimateBasis::Explicit;
        self.source_text = Some(source_text.into());
        self
    }

    /// Set confidence and basis.
    pub fn with_basis(mut self, confidence: ConfidenceLevel, basis: EstimateBasis) -> Self {
        self.confidence = confidence;
        self.basis = basis;
        self
    }

    /// Whether both ranges are ordered.
    pub fn is_ordered(&self) -> bool {
        self.duration_weeks_min <= self.duration_weeks_max
            && self.duration_months_min <= self.duration_months_max
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_months_converts_weeks() {
        let estimate = DurationEstimate::from_months("Analysis", ItemType::Stage, 3.0, 9.0);
        assert_eq!(estimate.duration_weeks_min, 12.0);
        assert_eq!(estimate.duration_weeks_max, 36.0);
        assert_eq!(estimate.basis, EstimateBasis::Heuristic);
        assert!(estimate.is_ordered());
    }

    #[test]
    fn test_from_weeks_rounds_months() {
        let estimate = DurationEstimate::from_weeks("Draft", ItemType::Milestone, 2.0, 9.0);
        assert_eq!(estimate.duration_months_min, 0.5);
        assert_eq!(estimate.duration_months_max, 2.3);
        assert_eq!(estimate.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_explicit_sets_source() {
        let estimate = DurationEstimate::from_months("Analysis", ItemType::Stage, 3.0, 3.0)
            .explicit("analysis will take 3 months");
        assert_eq!(estimate.confidence, ConfidenceLevel::High);
        assert_eq!(estimate.basis, EstimateBasis::Explicit);
        assert_eq!(estimate.source_text.as_deref(), Some("analysis will take 3 months"));
    }
}
