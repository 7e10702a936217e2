//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "create a service" or "list the catalog".

pub mod materialize_service;
pub mod scaffold_service;
pub mod template_service;

pub use materialize_service::{
    MaterializeOptions, MaterializeReport, Materializer, RegistrationOutcome,
};
pub use scaffold_service::{ModuleRequest, ScaffoldReport, ScaffoldService, ServiceRequest};
pub use template_service::{CatalogFilter, CatalogSummary, TemplateInfo, TemplateService};
