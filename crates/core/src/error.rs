//! Error type for the fallible edges around the pipeline.
//!
//! The pipeline itself is total; only loading inputs and configuration can fail.

/// Result alias for timeline operations.
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Errors raised while loading inputs or configuration.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration rejected by validation
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A dependency list contains a cycle
    #[error("Dependency cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_display() {
        let err = TimelineError::Cycle(vec!["A".into(), "B".into(), "A".into()]);
        assert_eq!(err.to_string(), "Dependency cycle: A -> B -> A");
    }

    #[test]
    fn test_json_from() {
        let err: TimelineError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(err, TimelineError::Json(_)));
    }
}
