pub mod common;
pub mod plan;
pub mod template_entry;

pub use crate::domain::DomainError;
pub use plan::{DirectorySet, PlannedFile, ResolutionPlan};
pub use template_entry::{TemplateEntry, TemplateEntryBuilder, TemplateIdentity, TemplateRef};
