//! Duration estimation for detected stages and milestones.

#![warn(missing_docs)]

pub mod estimator;

pub use estimator::{DurationEstimator, ExplicitDuration};
