//! Inline template metadata.
//!
//! A template may declare where it lands and what it needs in its first
//! [`HEADER_LINES`] lines, using whichever comment syntax suits the target
//! file:
//!
//! ```text
//! // Template-Destination: {{MODULE_PATH}}/{{MODULE_NAME}}.model.go
//! // Template-Variables: MODULE_NAME, MODULE_PATH
//! # Template-Dependencies: internal, diagrams
//! ```
//!
//! Templates without a `Destination` directive are placed by a fixed naming
//! convention table ([`INFERENCE_RULES`], then [`MODULE_PARTS`] for module
//! templates). A template
//! that neither declares nor matches a convention is *unplaceable*:
//! [`extract`] returns `None` and the caller drops it.

use std::collections::BTreeMap;

use crate::domain::Category;

/// Only this many leading lines are scanned for directives.
pub const HEADER_LINES: usize = 10;

/// Comment prefixes accepted in front of a directive.
pub const COMMENT_MARKERS: &[&str] = &["//", "#"];

const DESTINATION: &str = "Template-Destination";
const VARIABLES: &str = "Template-Variables";
const DEPENDENCIES: &str = "Template-Dependencies";

/// Placement data for one template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateMetadata {
    pub destination: String,
    pub variables: BTreeMap<String, String>,
    pub dependencies: Vec<String>,
    /// `true` when `destination` came from the naming table rather than a
    /// directive.
    pub inferred: bool,
}

// ── Inference table ───────────────────────────────────────────────────────────

/// Substring of a template's base name and the path it implies.
#[derive(Debug, Clone, Copy)]
pub struct InferenceRule {
    pub needle: &'static str,
    pub destination: &'static str,
}

/// Whole-project files, checked first, first match wins.
pub static INFERENCE_RULES: &[InferenceRule] = &[
    InferenceRule {
        needle: "config.go",
        destination: "internal/config/config.go",
    },
    InferenceRule {
        needle: "config.py",
        destination: "internal/config/config.py",
    },
    InferenceRule {
        needle: "main.go",
        destination: "cmd/main.go",
    },
    InferenceRule {
        needle: "main.py",
        destination: "main.py",
    },
    InferenceRule {
        needle: "dockerignore",
        destination: ".dockerignore",
    },
    InferenceRule {
        needle: "env",
        destination: ".env",
    },
    InferenceRule {
        needle: "Dockerfile",
        destination: "Dockerfile",
    },
    InferenceRule {
        needle: "docker-compose",
        destination: "docker-compose.yml",
    },
    InferenceRule {
        needle: "requirements",
        destination: "requirements.txt",
    },
    InferenceRule {
        needle: "database.py",
        destination: "internal/database/database.py",
    },
];

/// Module building blocks. A module template whose base name contains one of
/// these is placed at `{{MODULE_PATH}}/{{MODULE_NAME}}.<base name>`.
pub static MODULE_PARTS: &[&str] = &["model", "repository", "service", "use-cases"];

// ── Extraction ────────────────────────────────────────────────────────────────

/// Extract placement metadata from a template body.
///
/// `template_name` is the template's identifier; only its final path
/// segment (minus `.tpl`) is used for inference, together with `category`.
/// Returns `None` when the template cannot be placed.
pub fn extract(
    content: &str,
    template_name: &str,
    category: &Category,
) -> Option<TemplateMetadata> {
    let mut destination = None;
    let mut variables = BTreeMap::new();
    let mut dependencies = Vec::new();

    for line in content.lines().take(HEADER_LINES) {
        let Some((name, value)) = parse_directive(line) else {
            continue;
        };
        match name {
            DESTINATION if !value.is_empty() => destination = Some(value.to_string()),
            VARIABLES => {
                for var in split_csv(value) {
                    variables.insert(var.to_string(), var.to_lowercase());
                }
            }
            DEPENDENCIES => dependencies.extend(split_csv(value).map(str::to_string)),
            _ => {}
        }
    }

    let (destination, inferred) = match destination {
        Some(dest) => (dest, false),
        None => (infer_destination(template_name, category)?, true),
    };

    Some(TemplateMetadata {
        destination,
        variables,
        dependencies,
        inferred,
    })
}

/// Place a template by name and category alone.
pub fn infer_destination(template_name: &str, category: &Category) -> Option<String> {
    let base = base_name(template_name);

    if let Some(rule) = INFERENCE_RULES.iter().find(|r| base.contains(r.needle)) {
        return Some(rule.destination.to_string());
    }
    if *category != Category::Module {
        return None;
    }

    MODULE_PARTS
        .iter()
        .find_map(|part| base.find(*part))
        .map(|at| format!("{{{{MODULE_PATH}}}}/{{{{MODULE_NAME}}}}.{}", &base[at..]))
}

fn base_name(template_name: &str) -> &str {
    let file = template_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(template_name);
    file.strip_suffix(".tpl").unwrap_or(file)
}

/// Split `<marker> Template-Name: value` into `(name, value)`.
///
/// Everything after the first `:` is the value, so destinations may contain
/// colons.
fn parse_directive(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let rest = COMMENT_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(*marker))?
        .trim_start();

    if !rest.starts_with("Template-") {
        return None;
    }
    let (name, value) = rest.split_once(':')?;
    Some((name.trim_end(), value.trim()))
}

fn split_csv(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_all_three_directives() {
        let body = "\
// Template-Destination: {{MODULE_PATH}}/{{MODULE_NAME}}.model.go
// Template-Variables: MODULE_NAME, MODULE_PATH
// Template-Dependencies: internal, diagrams
package {{MODULE_NAME}}
";
        let meta = extract(body, "module/model.go.tpl", &Category::Module).unwrap();

        assert_eq!(meta.destination, "{{MODULE_PATH}}/{{MODULE_NAME}}.model.go");
        assert_eq!(
            meta.variables.get("MODULE_NAME").map(String::as_str),
            Some("module_name")
        );
        assert_eq!(meta.variables.len(), 2);
        assert_eq!(meta.dependencies, vec!["internal", "diagrams"]);
        assert!(!meta.inferred);
    }

    #[test]
    fn accepts_hash_comments() {
        let meta = extract(
            "# Template-Destination: config/app.yml\nkey: 1\n",
            "x.tpl",
            &Category::Service,
        )
        .unwrap();
        assert_eq!(meta.destination, "config/app.yml");
    }

    #[test]
    fn keeps_colons_in_values() {
        let meta = extract(
            "# Template-Destination: c:/weird:name\n",
            "x.tpl",
            &Category::Service,
        )
        .unwrap();
        assert_eq!(meta.destination, "c:/weird:name");
    }

    #[test]
    fn ignores_directives_after_header_window() {
        let mut body = "line\n".repeat(HEADER_LINES);
        body.push_str("// Template-Destination: late.txt\n");
        assert_eq!(extract(&body, "unknown.tpl", &Category::Service), None);
    }

    #[test]
    fn falls_back_to_inference() {
        let meta = extract("package main\n", "service/main.go.tpl", &Category::Service).unwrap();
        assert_eq!(meta.destination, "cmd/main.go");
        assert!(meta.inferred);
    }

    #[test]
    fn inference_uses_file_name_only() {
        // "service/" in the directory must not trigger the module rule.
        assert_eq!(
            infer_destination("service/Dockerfile.tpl", &Category::Service).as_deref(),
            Some("Dockerfile")
        );
    }

    #[test]
    fn infers_module_parts_from_base_name() {
        assert_eq!(
            infer_destination("model.alpha.tpl", &Category::Module).as_deref(),
            Some("{{MODULE_PATH}}/{{MODULE_NAME}}.model.alpha")
        );
        assert_eq!(
            infer_destination("module/use-cases.py.tpl", &Category::Module).as_deref(),
            Some("{{MODULE_PATH}}/{{MODULE_NAME}}.use-cases.py")
        );
    }

    #[test]
    fn module_parts_apply_to_module_templates_only() {
        assert_eq!(infer_destination("service.go.tpl", &Category::Service), None);
        assert_eq!(
            infer_destination("model.txt.tpl", &Category::Other("docs".into())),
            None
        );
        assert_eq!(
            infer_destination("service.go.tpl", &Category::Module).as_deref(),
            Some("{{MODULE_PATH}}/{{MODULE_NAME}}.service.go")
        );
    }

    #[test]
    fn dockerignore_is_not_mistaken_for_env() {
        assert_eq!(
            infer_destination("shared/dockerignore.tpl", &Category::Service).as_deref(),
            Some(".dockerignore")
        );
        assert_eq!(
            infer_destination("shared/env.tpl", &Category::Service).as_deref(),
            Some(".env")
        );
    }

    #[test]
    fn unknown_names_are_unplaceable() {
        assert_eq!(extract("hello\n", "README.md.tpl", &Category::Service), None);
    }

    #[test]
    fn empty_destination_falls_back_to_inference() {
        let meta = extract(
            "# Template-Destination:\n",
            "requirements.txt.tpl",
            &Category::Service,
        )
        .unwrap();
        assert_eq!(meta.destination, "requirements.txt");
    }

    #[test]
    fn empty_csv_tokens_are_dropped() {
        let meta =
            extract("# Template-Variables: A, ,B,\n", "env.tpl", &Category::Service).unwrap();
        assert_eq!(meta.variables.keys().collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
