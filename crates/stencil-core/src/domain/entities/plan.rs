//! Materialization plans.
//!
//! A [`ResolutionPlan`] is the only thing the core hands to the outside
//! world. It is a value object: built fresh per request, never mutated after
//! the plan builder returns it.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{Category, EcosystemTag, TemplateIdentity, TemplateRef};

/// Set of project-relative directory paths.
///
/// Membership is what matters; iteration follows first insertion so plans
/// print the same way on every run. `""`, `"."` and trailing slashes are
/// normalised away on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DirectorySet {
    order: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl DirectorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a directory. Returns `false` if it was already present or is
    /// the project root itself.
    pub fn insert(&mut self, dir: impl AsRef<str>) -> bool {
        let Some(dir) = normalize_dir(dir.as_ref()) else {
            return false;
        };
        if self.seen.contains(&dir) {
            return false;
        }
        self.seen.insert(dir.clone());
        self.order.push(dir);
        true
    }

    pub fn contains(&self, dir: &str) -> bool {
        normalize_dir(dir).is_some_and(|d| self.seen.contains(&d))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn union(mut self, other: &DirectorySet) -> Self {
        self.extend(other.iter());
        self
    }
}

fn normalize_dir(dir: &str) -> Option<String> {
    let trimmed = dir.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    match trimmed {
        "" | "." => None,
        d => Some(d.to_string()),
    }
}

impl<S: AsRef<str>> Extend<S> for DirectorySet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for dir in iter {
            self.insert(dir);
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for DirectorySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// A single file the materializer must produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub destination_path: String,
    pub template_ref: TemplateRef,
    pub identity: TemplateIdentity,
}

/// Output of the plan builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionPlan {
    category: Category,
    ecosystem: EcosystemTag,
    directories: DirectorySet,
    files: Vec<PlannedFile>,
}

impl ResolutionPlan {
    pub(crate) fn new(
        category: Category,
        ecosystem: EcosystemTag,
        directories: DirectorySet,
        files: Vec<PlannedFile>,
    ) -> Self {
        Self {
            category,
            ecosystem,
            directories,
            files,
        }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn ecosystem(&self) -> &EcosystemTag {
        &self.ecosystem
    }

    pub fn directories(&self) -> &DirectorySet {
        &self.directories
    }

    pub fn files(&self) -> &[PlannedFile] {
        &self.files
    }

    /// Nothing to generate: no files, whatever baseline directories the
    /// ecosystem declares.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Destinations that still contain a `{{...}}` placeholder.
    ///
    /// Not an error for the core, but callers usually want to warn about it.
    pub fn unresolved_destinations(&self) -> impl Iterator<Item = &PlannedFile> {
        self.files.iter().filter(|f| {
            f.destination_path
                .find("{{")
                .is_some_and(|start| f.destination_path[start..].contains("}}"))
        })
    }
}
