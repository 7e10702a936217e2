//! Infrastructure adapters for Stencil.
//!
//! This crate implements the ports defined in `stencil_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod renderer;
pub mod template_store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::PlaceholderRenderer;
pub use template_store::{BuiltinStore, DirectoryStore, InMemoryStore};
