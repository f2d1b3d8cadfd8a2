//! Timeline core data models.
//!
//! This crate defines the records produced by the timeline intelligence
//! pipeline: text segments, detected stages, milestones, duration estimates
//! and dependencies, plus the heading map consumed from upstream and the
//! engine configuration.

#![warn(missing_docs)]

// Input side
mod segment;
mod sections;

// Detection results
mod stage;
mod milestone;
mod duration;
mod dependency;
mod timeline;

// Ambient
pub mod config;
pub mod error;
pub mod text;

// Re-exports
pub use segment::{TextSegment, SegmentType};
pub use sections::{SectionMap, Section};

pub use stage::{StageType, DetectedStage, EvidenceSnippet, EvidenceSource};
pub use milestone::{ExtractedMilestone, MilestoneType};
pub use duration::{DurationEstimate, ItemType, ConfidenceLevel, EstimateBasis};
pub use dependency::{Dependency, DependencyType};
pub use timeline::StructuredTimeline;

pub use config::{EngineConfig, Limits};
pub use error::{TimelineError, Result};
