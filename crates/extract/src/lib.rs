//! Text extraction layer - segmentation, stage detection, and milestone extraction.

#![warn(missing_docs)]

pub mod segmenter;
pub mod patterns;
pub mod stage;
pub mod milestone;

pub use segmenter::Segmenter;
pub use stage::StageDetector;
pub use milestone::MilestoneExtractor;
