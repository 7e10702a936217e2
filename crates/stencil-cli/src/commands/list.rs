//! Implementation of the `stencil list` command.

use stencil_core::application::{CatalogFilter, TemplateInfo, TemplateService};

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat},
    commands::template_store,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

const CSV_HEADER: &str = "identity,category,scope,ecosystems,destination,template,required";

pub fn execute(
    args: ListArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let service = TemplateService::new(template_store(global, config));
    let filter = CatalogFilter {
        category: args.category,
        ecosystem: args.ecosystem,
    };
    let templates = service.list(&filter)?;

    let format = match args.format {
        ListFormat::Table if output.is_json() => ListFormat::Json,
        other => other,
    };

    match format {
        ListFormat::Table => {
            let summary = service.summary()?;
            output.header(&format!("Templates ({}):", templates.len()))?;
            for line in table(&templates) {
                output.data(&line)?;
            }
            if !summary.ecosystems.is_empty() {
                output.print("")?;
                output.info(&format!("Ecosystems: {}", summary.ecosystems.join(", ")))?;
            }
            for skipped in &summary.skipped {
                output.warning(&format!(
                    "{skipped} skipped: no usable destination"
                ))?;
            }
        }
        ListFormat::List => {
            for t in &templates {
                output.data(&t.identity)?;
            }
        }
        ListFormat::Json => output.json(&templates)?,
        ListFormat::Csv => {
            output.data(CSV_HEADER)?;
            for t in &templates {
                output.data(&csv_row(t))?;
            }
        }
    }

    Ok(())
}

/// Column-aligned rows, header first.
fn table(templates: &[TemplateInfo]) -> Vec<String> {
    let rows: Vec<[String; 4]> = templates
        .iter()
        .map(|t| {
            [
                format!("{}{}", t.identity, if t.required { " *" } else { "" }),
                t.scope.clone(),
                ecosystems(t),
                t.destination.clone(),
            ]
        })
        .collect();

    let header = ["IDENTITY", "SCOPE", "ECOSYSTEMS", "DESTINATION"].map(String::from);
    let mut widths = header.clone().map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    std::iter::once(&header)
        .chain(&rows)
        .map(|row| {
            format!(
                "  {:<w0$}  {:<w1$}  {:<w2$}  {}",
                row[0],
                row[1],
                row[2],
                row[3],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

fn ecosystems(t: &TemplateInfo) -> String {
    if t.ecosystems.is_empty() {
        "*".into()
    } else {
        t.ecosystems.join(" ")
    }
}

fn csv_row(t: &TemplateInfo) -> String {
    [
        t.identity.as_str(),
        t.category.as_str(),
        t.scope.as_str(),
        t.ecosystems.join(" ").as_str(),
        t.destination.as_str(),
        t.template_ref.as_str(),
        if t.required { "true" } else { "false" },
    ]
    .iter()
    .map(|field| csv_field(field))
    .collect::<Vec<_>>()
    .join(",")
}

/// Quote a field when it holds a comma, a quote or a newline.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(identity: &str, ecosystems: &[&str], required: bool) -> TemplateInfo {
        TemplateInfo {
            identity: identity.into(),
            category: "service".into(),
            scope: if ecosystems.is_empty() { "shared" } else { "ecosystem-specific" }.into(),
            ecosystems: ecosystems.iter().map(|s| s.to_string()).collect(),
            destination: ".env".into(),
            template_ref: "templates-common/service/env.tpl".into(),
            required,
        }
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn csv_row_has_every_column() {
        let row = csv_row(&info("service/env", &["go", "py"], true));
        assert_eq!(row.split(',').count(), CSV_HEADER.split(',').count());
        assert!(row.starts_with("service/env,service,"));
        assert!(row.contains(",go py,"));
        assert!(row.ends_with(",true"));
    }

    #[test]
    fn table_marks_required_and_shared() {
        let lines = table(&[info("service/env", &[], true)]);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("IDENTITY"));
        assert!(lines[1].contains("service/env *"));
        assert!(lines[1].contains(" * "));
    }
}
