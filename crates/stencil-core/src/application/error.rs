//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not in the
//! resolution rules. Catalog construction errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while loading templates or materializing a plan.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A template reference could not be dereferenced by the store.
    #[error("Template not found: {template_ref}")]
    TemplateNotFound { template_ref: String },

    /// The template source (directory, archive...) is unusable.
    #[error("Template store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Template store error")]
    StoreLockError,

    /// Template rendering failed.
    #[error("Rendering '{template_ref}' failed: {reason}")]
    RenderingFailed {
        template_ref: String,
        reason: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Service or module name is not usable as a path segment.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Service directory already exists.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// A planned file would overwrite an existing one.
    #[error("File already exists: {path}")]
    FileExists { path: PathBuf },

    /// Module generation needs an existing service root.
    #[error("Service directory not found: {path}")]
    ServiceRootMissing { path: PathBuf },

    /// The catalog has nothing for this request.
    #[error("No templates for category '{category}' and ecosystem '{ecosystem}'")]
    NothingToGenerate { category: String, ecosystem: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { template_ref } => vec![
                format!("The catalog points at '{template_ref}' but it cannot be read"),
                "Check the templates directory for missing or renamed files".into(),
            ],
            Self::StoreUnavailable { .. } => vec![
                "Check --templates or STENCIL_TEMPLATES_DIR".into(),
                "Omit both to use the builtin templates".into(),
            ],
            Self::StoreLockError => vec![
                "The template store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::InvalidName { .. } => vec![
                "Names become directory and file names".into(),
                "Use letters, digits, '-' or '_' only".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to write into it anyway".into(),
                "Choose a different service name".into(),
            ],
            Self::FileExists { path } => vec![
                format!("Refusing to overwrite {}", path.display()),
                "Use --force to overwrite generated files".into(),
            ],
            Self::ServiceRootMissing { path } => vec![
                format!("No service at {}", path.display()),
                "Run stencil service <NAME> first, or pass --dir".into(),
            ],
            Self::NothingToGenerate { .. } => vec![
                "Try: stencil list to see categories and ecosystems".into(),
                "Pass --lang with one of the listed ecosystems".into(),
            ],
            Self::RenderingFailed { .. } => vec!["Check the template body for errors".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. }
            | Self::ServiceRootMissing { .. }
            | Self::NothingToGenerate { .. } => ErrorCategory::NotFound,
            Self::StoreUnavailable { .. } => ErrorCategory::Configuration,
            Self::InvalidName { .. } | Self::ProjectExists { .. } | Self::FileExists { .. } => {
                ErrorCategory::Validation
            }
            Self::StoreLockError | Self::RenderingFailed { .. } | Self::FilesystemError { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}
