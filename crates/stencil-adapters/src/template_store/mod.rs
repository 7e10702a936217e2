//! Template store adapters.
//!
//! - [`BuiltinStore`]: templates embedded in the binary
//! - [`DirectoryStore`]: a `templates-*` tree on disk
//! - [`InMemoryStore`]: mutable store for tests and programmatic use

pub mod builtin;
pub mod catalog;
mod directory;
mod memory;

pub use builtin::BuiltinStore;
pub use catalog::{CatalogManifest, MANIFEST_FILE, TemplateLocation};
pub use directory::DirectoryStore;
pub use memory::InMemoryStore;
