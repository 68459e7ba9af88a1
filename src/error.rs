//! ═══════════════════════════════════════════════════════════════════════════════
//! ERROR — Unified Error Type for Manifold
//! ═══════════════════════════════════════════════════════════════════════════════
//! Centralized error handling. No scattered .unwrap() or .expect() calls.
//! ═══════════════════════════════════════════════════════════════════════════════

use std::fmt;

/// The unified error type for the manifold crate
#[derive(Debug)]
pub enum ManifoldError {
    /// Vector dimension mismatch between input, node state, or compressor output
    Shape { expected: usize, actual: usize },
    /// A required collaborator was not wired before use
    CollaboratorMissing(&'static str),
    /// Configuration rejected at validation
    InvalidConfig { field: &'static str, message: String },
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
}

impl std::error::Error for ManifoldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ManifoldError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ManifoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifoldError::Shape { expected, actual } => {
                write!(
                    f,
                    "Shape mismatch: expected dimension {}, got {}",
                    expected, actual
                )
            }
            ManifoldError::CollaboratorMissing(name) => {
                write!(f, "Required collaborator not wired: {}", name)
            }
            ManifoldError::InvalidConfig { field, message } => {
                write!(f, "Invalid configuration for '{}': {}", field, message)
            }
            ManifoldError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl From<serde_json::Error> for ManifoldError {
    fn from(err: serde_json::Error) -> Self {
        ManifoldError::Json(err)
    }
}

/// Type alias for Result with ManifoldError
pub type ManifoldResult<T> = Result<T, ManifoldError>;
