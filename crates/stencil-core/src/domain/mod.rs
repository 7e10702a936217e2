// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Stencil.
//!
//! Everything in here is a pure function over in-memory data: the template
//! catalog, strings and small maps. Reading template bodies and writing
//! files is the application layer's job, through ports.
//!
//! ## Pipeline
//!
//! ```text
//! RawTemplate ──metadata::extract──▶ TemplateEntry ──▶ TemplateRegistry
//!                                                           │
//!                       (category, ecosystem) ──▶ OverrideResolver
//!                                                           │
//!                                   Variables ──▶ PlanBuilder ──▶ ResolutionPlan
//! ```
//!
//! - **No I/O**, no logging, no async
//! - **Read-only registry**: safe to share across threads once built
//! - **Never fails on lookups**: unknown categories, unknown tags and
//!   unplaceable templates degrade to empty or partial results
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod metadata;
pub mod plan_builder;
pub mod registration;
pub mod registry;
pub mod resolver;
pub mod value_objects;
pub mod variables;

// Re-exports for convenience
pub use entities::{
    DirectorySet, PlannedFile, ResolutionPlan, TemplateEntry, TemplateEntryBuilder,
    TemplateIdentity, TemplateRef, common::RelativePath,
};

pub use error::{DomainError, ErrorCategory};

pub use metadata::TemplateMetadata;
pub use plan_builder::PlanBuilder;
pub use registration::{DEFAULT_MARKER, ModuleRegistration};
pub use registry::{RawTemplate, RegistryBuilder, TemplateRegistry};
pub use resolver::OverrideResolver;
pub use value_objects::{Category, EcosystemTag, Scope};
pub use variables::{Assignment, Variables};
