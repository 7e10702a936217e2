//! Application layer for Stencil.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, TemplateService, Materializer)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer and owns every side
//! effect. Resolution rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CatalogFilter, CatalogSummary, MaterializeOptions, MaterializeReport, Materializer,
    ModuleRequest, RegistrationOutcome, ScaffoldReport, ScaffoldService, ServiceRequest,
    TemplateInfo, TemplateService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TemplateRenderer, TemplateStore};

pub use error::ApplicationError;
