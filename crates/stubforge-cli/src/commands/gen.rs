//! `stubforge gen` - render one class file from a stub.
//!
//! Responsibility: translate CLI arguments into generation options, drive the
//! core `GenerationSession`, and display results. No business logic lives
//! here.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use stubforge_adapters::{HandlebarsRenderer, LocalFilesystem};
use stubforge_core::{
    application::{
        AliasResolver, Filesystem, GenerationOptions, GenerationOutcome, GenerationSession,
        GeneratorPorts, GeneratorSettings,
    },
    domain::{ArtifactOverrides, GenerationContext},
};

use crate::{
    cli::GenArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    interact::TerminalInteract,
    output::OutputManager,
};

#[instrument(skip_all, fields(type_key = %args.type_key))]
pub fn execute(args: GenArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let work_dir = std::env::current_dir().with_cli_context(|| "reading the working directory")?;

    let settings = GeneratorSettings {
        template_dir: config.generator.template_dir.clone(),
        template_ext: config.generator.template_ext.clone(),
        source_ext: config.generator.source_ext.clone(),
        work_dir: work_dir.clone(),
    };
    let type_key = args.type_key.clone();
    let mut session =
        GenerationSession::begin(&type_key, options(args), settings, ports(&config, &work_dir))?;
    let interact = TerminalInteract::new(output.clone());

    session.collect_name(&interact)?;
    session.fire_after_collect()?;

    if let Some(ctx) = session.context() {
        output.print(&format!("Metadata: \n{}", metadata_json(ctx)))?;
    }
    output.print(&format!("Target File: {}\n", session.destination()?.display()))?;

    match session.finalize_and_write(&interact)? {
        GenerationOutcome::Written { path } => {
            debug!(path = %path.display(), "written");
            output.success("OK, write successful!")?;
            Ok(())
        }
        GenerationOutcome::Declined { .. } => {
            output.print("Quit, Bye!")?;
            Ok(())
        }
        GenerationOutcome::WriteFailed { path, reason } => {
            Err(CliError::WriteFailed { path, reason })
        }
    }
}

fn options(args: GenArgs) -> GenerationOptions {
    let options = GenerationOptions {
        name: args.name,
        overrides: ArtifactOverrides {
            suffix: args.suffix,
            namespace: args.namespace,
            template_name: None,
            output_dir: args.dir,
            prefix: args.prefix,
            rest: args.rest,
        },
        template_dir: args.tpl_dir,
        template_file: None,
        assume_yes: args.yes,
        preview: args.preview,
    };

    match args.tpl_file.as_deref() {
        Some(template) => options.with_template(template),
        None => options,
    }
}

fn ports(config: &AppConfig, work_dir: &Path) -> GeneratorPorts {
    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let aliases: Arc<dyn AliasResolver> = Arc::new(config.aliases_for(work_dir));
    GeneratorPorts {
        renderer: Arc::new(HandlebarsRenderer::new(
            Arc::clone(&filesystem),
            Arc::clone(&aliases),
        )),
        filesystem,
        aliases,
    }
}

/// Template variables plus the template name, as pretty JSON.
fn metadata_json(ctx: &GenerationContext) -> String {
    let mut metadata = ctx.render_context();
    metadata.insert("tplFilename", &ctx.template_filename);
    serde_json::to_string_pretty(&metadata).unwrap_or_else(|_| "{}".into())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn gen_args(argv: &[&str]) -> GenArgs {
        let mut full = vec!["stubforge", "gen"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Gen(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn flags_become_overrides() {
        let opts = options(gen_args(&[
            "ctrl", "user", "@app/Api", "-n", "App\\Api", "--suffix", "Ctl", "--prefix", "/v1",
            "--rest", "false", "-y", "--preview",
        ]));

        assert_eq!(opts.name.as_deref(), Some("user"));
        assert_eq!(opts.overrides.output_dir.as_deref(), Some("@app/Api"));
        assert_eq!(opts.overrides.namespace.as_deref(), Some("App\\Api"));
        assert_eq!(opts.overrides.suffix.as_deref(), Some("Ctl"));
        assert_eq!(opts.overrides.prefix.as_deref(), Some("/v1"));
        assert_eq!(opts.overrides.rest, Some(false));
        assert!(opts.assume_yes);
        assert!(opts.preview);
    }

    #[test]
    fn tpl_file_name_or_path() {
        let by_name = options(gen_args(&["task", "x", "--tpl-file", "my-task"]));
        assert_eq!(by_name.overrides.template_name.as_deref(), Some("my-task"));
        assert!(by_name.template_file.is_none());

        let by_path = options(gen_args(&["task", "x", "--tpl-file", "./tpl/my-task.stub"]));
        assert_eq!(by_path.template_file, Some(PathBuf::from("./tpl/my-task.stub")));
    }

    #[test]
    fn metadata_lists_variables_and_template() {
        let spec = stubforge_core::domain::lookup("listener").unwrap();
        let ctx = GenerationContext::new(&spec, "order", PathBuf::from("/tpl"), PathBuf::from("/w"));

        let json = metadata_json(&ctx);
        assert!(json.contains("\"className\": \"OrderListener\""));
        assert!(json.contains("\"tplFilename\": \"listener\""));
    }
}
