//! Module registration.
//!
//! Some ecosystems wire new modules into an entry point by hand. A
//! [`ModuleRegistration`] describes how to do that textually: find a marker
//! comment in the entry point and insert a rendered snippet just above it.
//! The marker stays in place so the next module can be registered the same
//! way.

use serde::{Deserialize, Serialize};

use crate::domain::Variables;

/// Marker comment the builtin Go entry point carries.
pub const DEFAULT_MARKER: &str = "// USE THIS COMMENT TO AUTO-GENERATE NEW MODULES";

/// How to register a module for one ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRegistration {
    /// Entry point, relative to the service root.
    pub entry_point: String,
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Snippet template; rendered with the module variables.
    pub snippet: String,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

impl ModuleRegistration {
    /// Insert the rendered snippet before every occurrence of the marker.
    ///
    /// Returns `None` when the marker is absent. The snippet is indented to
    /// match the marker line.
    pub fn apply(&self, source: &str, variables: &Variables) -> Option<String> {
        if self.marker.is_empty() || !source.contains(&self.marker) {
            return None;
        }

        let snippet = variables.substitute(&self.snippet);
        let mut out = String::with_capacity(source.len() + snippet.len() + 1);

        for line in source.split_inclusive('\n') {
            if let Some(at) = line.find(&self.marker) {
                let indent = &line[..at];
                let indent = if indent.trim().is_empty() { indent } else { "" };
                for snippet_line in snippet.lines() {
                    if snippet_line.is_empty() {
                        out.push('\n');
                    } else {
                        out.push_str(indent);
                        out.push_str(snippet_line);
                        out.push('\n');
                    }
                }
                out.push('\n');
            }
            out.push_str(line);
        }

        Some(out)
    }
}
