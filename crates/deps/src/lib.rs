//! Dependency mapping between stages and milestones.
//!
//! Candidate edges are proposed from several sources and admitted into an
//! acyclic graph in priority order.

#![warn(missing_docs)]

pub mod graph;
pub mod mapper;
pub mod signals;

pub use graph::{check, find_cycle, validate, Admission, DependencyGraph};
pub use mapper::DependencyMapper;
