//! Error types for kinorrt

use std::fmt;

/// Main error type for planning and control operations
#[derive(Debug)]
pub enum PlannerError {
    /// Search budget exhausted without reaching the goal
    PlanningError(String),
    /// Invalid parameter or configuration
    InvalidParameter(String),
    /// Tree invariant violated (corrupted parent chain, bad indices)
    CorruptedTree(String),
    /// Control synthesis failed
    ControlError(String),
    /// Solution serialization/deserialization failed
    SerializationError(serde_json::Error),
    /// I/O error
    IoError(std::io::Error),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::PlanningError(msg) => write!(f, "Planning error: {}", msg),
            PlannerError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PlannerError::CorruptedTree(msg) => write!(f, "Corrupted tree: {}", msg),
            PlannerError::ControlError(msg) => write!(f, "Control error: {}", msg),
            PlannerError::SerializationError(e) => write!(f, "Serialization error: {}", e),
            PlannerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlannerError::IoError(e) => Some(e),
            PlannerError::SerializationError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(e: std::io::Error) -> Self {
        PlannerError::IoError(e)
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        PlannerError::SerializationError(e)
    }
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
