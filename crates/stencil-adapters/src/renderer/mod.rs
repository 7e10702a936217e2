//! Template renderers.

mod placeholder;

pub use placeholder::{PlaceholderRenderer, unresolved_placeholders};
