//! Placeholder substitution.
//!
//! Placeholders are `{{KEY}}` tokens. Substitution is literal, global and
//! case-sensitive; a key that is not in the map is left untouched. There is
//! no escaping and no nesting: substituted values are never rescanned.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Caller-supplied variable map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variables(BTreeMap<String, String>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables every service template can rely on.
    pub fn for_service(name: &str) -> Self {
        Self::new().with("SERVICE_NAME", name)
    }

    /// Variables every module template can rely on.
    ///
    /// `MODULE_PATH` defaults to `internal/<name>`.
    pub fn for_module(name: &str, module_path: Option<&str>) -> Self {
        let path = module_path
            .map(|p| p.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("internal/{name}"));

        Self::new()
            .with("MODULE_NAME", name)
            .with("MODULE_NAME_UPPER", capitalize(name))
            .with("module_name", to_snake_case(name))
            .with("moduleName", to_camel_case(name))
            .with("MODULE_PATH", path)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(mut self, other: &Variables) -> Self {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace every known `{{KEY}}` in `text`.
    pub fn substitute(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let candidate = &rest[start..];
            let inner = &candidate[OPEN.len()..];

            match inner.find(CLOSE) {
                Some(end) => match self.0.get(&inner[..end]) {
                    Some(value) => {
                        out.push_str(value);
                        rest = &inner[end + CLOSE.len()..];
                    }
                    None => {
                        // Unknown key: emit one brace and rescan, so `{{{A}}}`
                        // still finds `{{A}}`.
                        out.push('{');
                        rest = &candidate[1..];
                    }
                },
                None => {
                    out.push_str(candidate);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A single `KEY=VALUE` assignment, as given on a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok(Self {
                key: key.trim().to_string(),
                value: value.to_string(),
            }),
            _ => Err(DomainError::InvalidVariable { input: s.into() }),
        }
    }
}

// ── Name casing ───────────────────────────────────────────────────────────────

/// Uppercase the first character, leave the rest alone.
///
/// `user` → `User`, `user_profile` → `User_profile`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn to_snake_case(s: &str) -> String {
    words(s).join("_")
}

fn to_camel_case(s: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(s).iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}
