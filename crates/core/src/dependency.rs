//! Dependency model - ordering edges between stages and milestones.

use serde::{Deserialize, Serialize};

/// Kind of dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    /// Runs after the other item
    Sequential,
    /// Needs the other item first
    Prerequisite,
    /// Runs alongside the other item
    Parallel,
    /// Gated by a critical milestone
    Blocks,
}

impl DependencyType {
    /// Admission priority (lower is admitted first).
    pub fn priority(&self) -> u8 {
        match self {
            DependencyType::Blocks => 0,
            DependencyType::Sequential => 1,
            DependencyType::Prerequisite | DependencyType::Parallel => 2,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Sequential => "sequential",
            DependencyType::Prerequisite => "prerequisite",
            DependencyType::Parallel => "parallel",
            DependencyType::Blocks => "blocks",
        }
    }
}

/// `dependent_item` depends on `depends_on_item`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// The item that waits
    pub dependent_item: String,

    /// The item waited on
    pub depends_on_item: String,

    /// Edge kind
    pub dependency_type: DependencyType,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Why the edge was proposed
    pub reason: String,
}

impl Dependency {
    /// Create a new dependency.
    pub fn new(
        dependent_item: impl Into<String>,
        depends_on_item: impl Into<String>,
        dependency_type: DependencyType,
        confidence: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            dependent_item: dependent_item.into(),
            depends_on_item: depends_on_item.into(),
            dependency_type,
            confidence,
            reason: reason.into(),
        }
    }
}
