//! `{{KEY}}` substitution renderer.

use tracing::{debug, instrument, warn};

use stencil_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{TemplateRef, Variables},
    error::StencilResult,
};

/// Renders bodies with [`Variables::substitute`].
///
/// Unknown placeholders stay in the output. In strict mode they are an
/// error instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer {
    strict: bool,
}

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when a rendered body still contains a `{{KEY}}` placeholder.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

impl TemplateRenderer for PlaceholderRenderer {
    #[instrument(skip_all, fields(template = %template_ref))]
    fn render(
        &self,
        template_ref: &TemplateRef,
        body: &str,
        variables: &Variables,
    ) -> StencilResult<String> {
        let rendered = variables.substitute(body);

        let leftover = unresolved_placeholders(&rendered);
        if !leftover.is_empty() {
            if self.strict {
                return Err(ApplicationError::RenderingFailed {
                    template_ref: template_ref.to_string(),
                    reason: format!("unresolved placeholders: {}", leftover.join(", ")),
                }
                .into());
            }
            warn!(placeholders = ?leftover, "template left placeholders unresolved");
        }

        debug!(bytes = rendered.len(), "template rendered");
        Ok(rendered)
    }
}

/// Names of `{{NAME}}` placeholders in `text`, in order of appearance.
///
/// Only identifier-like names count, so `{{ }}` in embedded template
/// languages is left alone.
pub fn unresolved_placeholders(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                if is_identifier(name) && !found.contains(&name) {
                    found.push(name);
                }
                rest = &after[end + 2..];
            }
            None => break,
        }
    }

    found
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
