//! Implementation of the `stubforge list` command.

use serde::Serialize;

use stubforge_core::{domain::ArtifactKind, error::StubforgeError};

use crate::{
    cli::{ListArgs, ListFormat},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// One row of the artifact table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactRow {
    type_key: &'static str,
    aliases: Vec<&'static str>,
    reserved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dir: Option<String>,
}

impl ArtifactRow {
    fn from_kind(kind: ArtifactKind) -> Self {
        let spec = kind.spec().ok();
        Self {
            type_key: kind.type_key(),
            aliases: kind.aliases().to_vec(),
            reserved: spec.is_none(),
            suffix: spec.as_ref().map(|s| s.suffix.clone()),
            namespace: spec.as_ref().map(|s| s.namespace.clone()),
            template: spec.as_ref().map(|s| s.template_name.clone()),
            output_dir: spec.map(|s| s.output_dir),
        }
    }

    fn field(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("-")
    }
}

fn rows() -> Vec<ArtifactRow> {
    ArtifactKind::ALL.into_iter().map(ArtifactRow::from_kind).collect()
}

pub fn execute(args: ListArgs, output: OutputManager) -> CliResult<()> {
    let rows = rows();

    match args.format {
        ListFormat::Table => {
            output.header("Artifact types:")?;
            for row in &rows {
                if row.reserved {
                    output.print(&format!("  {:<16} (reserved)", row.type_key))?;
                    continue;
                }
                output.print(&format!(
                    "  {:<16} {:<26} {:<28} {}",
                    row.type_key,
                    row.aliases.join(", "),
                    ArtifactRow::field(&row.namespace),
                    ArtifactRow::field(&row.output_dir),
                ))?;
            }
        }

        ListFormat::List => {
            for row in rows.iter().filter(|r| !r.reserved) {
                println!("{}", row.type_key);
            }
        }

        ListFormat::Json => {
            // Printed directly so the output stays parseable in pipes.
            let json = serde_json::to_string_pretty(&rows).map_err(|e| {
                CliError::Core(StubforgeError::Internal {
                    message: format!("cannot serialize artifact list: {e}"),
                })
            })?;
            println!("{json}");
        }

        ListFormat::Csv => {
            println!("type_key,aliases,suffix,namespace,template,output_dir,reserved");
            for row in &rows {
                println!("{}", csv_line(row));
            }
        }
    }

    Ok(())
}

fn csv_line(row: &ArtifactRow) -> String {
    let quote = |s: &str| {
        if s.contains([',', '"']) {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_owned()
        }
    };
    [
        row.type_key.to_owned(),
        quote(&row.aliases.join(" ")),
        quote(row.suffix.as_deref().unwrap_or("")),
        quote(row.namespace.as_deref().unwrap_or("")),
        quote(row.template.as_deref().unwrap_or("")),
        quote(row.output_dir.as_deref().unwrap_or("")),
        row.reserved.to_string(),
    ]
    .join(",")
}
