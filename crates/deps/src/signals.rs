//! Ordering signals and blocking rules.

use regex::Regex;
use std::sync::OnceLock;
use timeline_core::{DependencyType, StageType};

/// Which way a signal phrase points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// "X after Y": the earlier mention waits on the later one
    Backward,
    /// "X before Y": the later mention waits on the earlier one
    Forward,
    /// No ordering
    Parallel,
}

/// A phrase that announces an ordering between two items.
#[derive(Debug, Clone, Copy)]
pub struct Signal {
    /// Phrase as written
    pub phrase: &'static str,
    /// Edge type emitted
    pub dependency_type: DependencyType,
    /// Direction of the edge
    pub direction: Direction,
}

const fn signal(phrase: &'static str, dependency_type: DependencyType, direction: Direction) -> Signal {
    Signal { phrase, dependency_type, direction }
}

/// Signal phrases, in tie-break order.
pub const SIGNALS: [Signal; 10] = [
    signal("after", DependencyType::Sequential, Direction::Backward),
    signal("following", DependencyType::Sequential, Direction::Backward),
    signal("once", DependencyType::Sequential, Direction::Backward),
    signal("requires", DependencyType::Prerequisite, Direction::Backward),
    signal("depends on", DependencyType::Prerequisite, Direction::Backward),
    signal("before", DependencyType::Sequential, Direction::Forward),
    signal("then", DependencyType::Sequential, Direction::Forward),
    signal("prerequisite", DependencyType::Prerequisite, Direction::Forward),
    signal("simultaneously", DependencyType::Parallel, Direction::Parallel),
    signal("in parallel", DependencyType::Parallel, Direction::Parallel),
];

/// Compiled signal phrases, in `SIGNALS` order.
pub fn signal_patterns() -> &'static [(Signal, Regex)] {
    static PATTERNS: OnceLock<Vec<(Signal, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SIGNALS
            .iter()
            .map(|s| {
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(s.phrase)))
                    .expect("signal pattern must compile");
                (*s, re)
            })
            .collect()
    })
}

/// Earliest signal in `text` with its byte offset. Ties go to table order.
pub fn first_signal(text: &str) -> Option<(Signal, usize)> {
    let mut best: Option<(Signal, usize)> = None;
    for (signal, re) in signal_patterns() {
        if let Some(m) = re.find(text) {
            if best.map_or(true, |(_, pos)| m.start() < pos) {
                best = Some((*signal, m.start()));
            }
        }
    }
    best
}

/// Critical-milestone name fragments and the stage each one blocks.
pub const BLOCKING_RULES: [(&str, StageType); 7] = [
    ("ethics approval", StageType::DataCollection),
    ("irb approval", StageType::DataCollection),
    ("proposal approval", StageType::DataCollection),
    ("proposal defense", StageType::DataCollection),
    ("comprehensive exam", StageType::ProposalDevelopment),
    ("qualifying exam", StageType::ProposalDevelopment),
    ("final draft", StageType::Defense),
];

/// Stage blocked by a milestone with this name, if any.
pub fn blocked_stage(milestone_name: &str) -> Option<StageType> {
    let name = milestone_name.to_lowercase();
    BLOCKING_RULES
        .iter()
        .find(|(fragment, _)| name.contains(fragment))
        .map(|(_, stage_type)| *stage_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_signal_by_position() {
        let (signal, pos) = first_signal("Analysis then writing, after the data is in.").unwrap();
        assert_eq!(signal.phrase, "then");
        assert_eq!(pos, 9);
    }

    #[test]
    fn test_signal_needs_word_boundary() {
        assert!(first_signal("Afterwards we thenceforth conclude.").is_none());
        assert!(first_signal("Nothing ordered here.").is_none());
    }

    #[test]
    fn test_multiword_signal() {
        let (signal, _) = first_signal("Writing runs IN PARALLEL with publication.").unwrap();
        assert_eq!(signal.dependency_type, DependencyType::Parallel);
    }

    #[test]
    fn test_blocked_stage() {
        assert_eq!(
            blocked_stage("Ethics approval must be obtained"),
            Some(StageType::DataCollection)
        );
        assert_eq!(
            blocked_stage("Comprehensive exam passed"),
            Some(StageType::ProposalDevelopment)
        );
        assert_eq!(blocked_stage("Final draft approved by committee"), Some(StageType::Defense));
        assert_eq!(blocked_stage("Data collection completed"), None);
    }
}
