//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stencil-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{TemplateRef, TemplateRegistry, Variables};
use crate::error::StencilResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stencil_adapters::filesystem::LocalFilesystem` (production)
/// - `stencil_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths are always absolute or root-joined by the caller; adapters never
/// consult the process working directory.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StencilResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> StencilResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> StencilResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StencilResult<()>;
}

/// Port for template catalogs and bodies.
///
/// Implemented by:
/// - `stencil_adapters::template_store::BuiltinStore` (embedded templates)
/// - `stencil_adapters::template_store::DirectoryStore` (templates-* layout on disk)
/// - `stencil_adapters::template_store::InMemoryStore` (tests, programmatic use)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Build the catalog this store serves.
    fn registry(&self) -> StencilResult<TemplateRegistry>;

    /// Read the body a catalog entry points at.
    fn read(&self, template_ref: &TemplateRef) -> StencilResult<String>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `stencil_adapters::renderer::PlaceholderRenderer` (`{{KEY}}` substitution)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render one template body.
    fn render(
        &self,
        template_ref: &TemplateRef,
        body: &str,
        variables: &Variables,
    ) -> StencilResult<String>;
}
