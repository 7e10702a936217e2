//! Domain value objects: Category, Scope, EcosystemTag.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity.
//! `Category` is a closed set of well-known names plus an open variant so
//! that catalogs can introduce new kinds of artifacts without code changes.
//! An unknown category is not an error anywhere in the pipeline; it simply
//! resolves to nothing.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Category ─────────────────────────────────────────────────────────────────

/// The kind of artifact being generated.
///
/// `Service` is a whole project skeleton, `Module` one feature unit inside an
/// existing project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Service,
    Module,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Service => "service",
            Self::Module => "module",
            Self::Other(name) => name,
        }
    }

    /// Whether this is one of the categories the builtin catalog ships.
    pub const fn is_well_known(&self) -> bool {
        matches!(self, Self::Service | Self::Module)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "" => Err(DomainError::InvalidCategory("category name is empty".into())),
            "service" | "svc" => Ok(Self::Service),
            "module" | "mod" => Ok(Self::Module),
            other if other.contains(['/', '\\']) => Err(DomainError::InvalidCategory(format!(
                "'{other}' contains a path separator"
            ))),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

// ── Scope ─────────────────────────────────────────────────────────────────────

/// Whether a template applies to every ecosystem or only to listed tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    #[default]
    Shared,
    EcosystemSpecific,
}

impl Scope {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::EcosystemSpecific => "ecosystem-specific",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── EcosystemTag ──────────────────────────────────────────────────────────────

/// Identifier selecting a target-language convention, e.g. `go` or `py`.
///
/// Tags are open-ended: the registry tolerates tags it has never seen and
/// resolves them to the shared layer only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EcosystemTag(String);

impl EcosystemTag {
    /// Create a tag, panicking on malformed input.
    ///
    /// # Panics
    /// Panics if the tag is empty or contains whitespace or path separators.
    /// Use `parse` for user input.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        match Self::validate(&tag) {
            Ok(()) => Self(tag),
            Err(e) => panic!("{e}"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(tag: &str) -> Result<(), DomainError> {
        let reason = if tag.is_empty() {
            "tag is empty"
        } else if tag.chars().any(char::is_whitespace) {
            "tag contains whitespace"
        } else if tag.contains(['/', '\\']) {
            "tag contains a path separator"
        } else {
            return Ok(());
        };
        Err(DomainError::InvalidEcosystemTag {
            tag: tag.to_string(),
            reason: reason.into(),
        })
    }
}

impl fmt::Display for EcosystemTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EcosystemTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Self::validate(&tag)?;
        Ok(Self(tag))
    }
}

impl TryFrom<String> for EcosystemTag {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EcosystemTag> for String {
    fn from(tag: EcosystemTag) -> Self {
        tag.0
    }
}
