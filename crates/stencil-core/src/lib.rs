//! Stencil Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Stencil
//! scaffolding engine, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stencil-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (ScaffoldService, TemplateService,      │
//! │  Materializer)                          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: Store, Filesystem, Render)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     stencil-adapters (Infrastructure)   │
//! │ (BuiltinStore, DirectoryStore, ...)     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (TemplateRegistry, OverrideResolver,    │
//! │  PlanBuilder, ResolutionPlan)           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stencil_core::domain::{Category, EcosystemTag, PlanBuilder, TemplateRegistry, Variables};
//!
//! let registry = TemplateRegistry::builder().build();
//! let plan = PlanBuilder::new(&registry).plan(
//!     &Category::Service,
//!     &EcosystemTag::new("go"),
//!     &Variables::for_service("orders"),
//! );
//! assert!(plan.is_empty());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CatalogFilter, MaterializeOptions, ModuleRequest, ScaffoldReport, ScaffoldService,
        ServiceRequest, TemplateService,
        ports::{Filesystem, TemplateRenderer, TemplateStore},
    };
    pub use crate::domain::{
        Category, EcosystemTag, PlanBuilder, RawTemplate, ResolutionPlan, TemplateEntry,
        TemplateRef, TemplateRegistry, Variables,
    };
    pub use crate::error::{StencilError, StencilResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
