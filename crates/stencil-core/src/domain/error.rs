// ============================================================================
// domain/error.rs - catalog and path errors
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// The resolution pipeline itself never fails: unknown categories, unknown
/// tags and unplaceable templates all degrade to empty or partial results.
/// These errors come from *constructing* catalog data with broken invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid template entry: {0}")]
    InvalidTemplate(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid ecosystem tag '{tag}': {reason}")]
    InvalidEcosystemTag { tag: String, reason: String },

    #[error("Invalid variable assignment '{input}': expected KEY=VALUE")]
    InvalidVariable { input: String },

    // ========================================================================
    // Path Errors
    // ========================================================================
    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the target root: {path}")]
    PathEscapesRoot { path: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidTemplate(msg) => vec![
                "Check the template catalog definition".into(),
                format!("Details: {msg}"),
            ],
            Self::InvalidCategory(_) => vec![
                "Known categories: service, module".into(),
                "Try: stencil list to see the catalog".into(),
            ],
            Self::InvalidEcosystemTag { .. } => vec![
                "Ecosystem tags are short names such as 'go' or 'py'".into(),
                "Tags may not contain whitespace or path separators".into(),
            ],
            Self::InvalidVariable { .. } => {
                vec!["Pass variables as --var KEY=VALUE, e.g. --var MODULE_PATH=pkg/user".into()]
            }
            Self::AbsolutePathNotAllowed { path } | Self::PathEscapesRoot { path } => vec![
                format!("Destination '{path}' must stay inside the target directory"),
                "Use a relative Template-Destination without '..' segments".into(),
            ],
            Self::MissingRequiredField { field } => {
                vec![format!("Provide a value for '{field}' before building")]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidTemplate(_)
            | Self::InvalidCategory(_)
            | Self::InvalidEcosystemTag { .. }
            | Self::InvalidVariable { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesRoot { .. } => ErrorCategory::Validation,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
