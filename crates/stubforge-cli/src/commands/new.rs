//! `stubforge new app` and `stubforge new component`.
//!
//! Both follow the same sequence: validate, show the resolved information,
//! confirm unless `--yes`, then let the core creator do the work while every
//! step is echoed.

use std::sync::Arc;

use tracing::{info, instrument};

use stubforge_adapters::{HandlebarsRenderer, LocalFilesystem, ShellRunner};
use stubforge_core::{
    application::{ComponentCreator, Filesystem, Interact, ProjectCreator, ProjectSettings},
    domain::{ComponentRequest, ProjectRequest},
    error::StubforgeError,
};

use crate::{
    cli::{NewAppArgs, NewCommands, NewComponentArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    interact::TerminalInteract,
    output::OutputManager,
};

const DELETE_QUESTION: &str = "project has been exist! delete it";
const CREATE_APP_QUESTION: &str = "ensure create application";
const CREATE_COMPONENT_QUESTION: &str = "ensure create component";
const GOODBYE: &str = "GoodBye!";

pub fn execute(cmd: NewCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        NewCommands::App(args) => application(args, config, output),
        NewCommands::Component(args) => component(args, config, output),
    }
}

#[instrument(skip_all, fields(name = %args.name))]
fn application(args: NewAppArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let work_dir = std::env::current_dir().with_cli_context(|| "reading the working directory")?;

    let mut request = ProjectRequest::new(&args.name)
        .with_work_dir(work_dir)
        .refresh(args.refresh)
        .no_install(args.no_install);
    if let Some(project_type) = args.project_type {
        request = request.with_type(project_type);
    }
    if let Some(repo) = args.repo {
        request = request.with_repo(repo);
    }

    let settings = ProjectSettings {
        cache_dir: config.project.cache_dir,
        install_command: config.project.install_command,
    };
    let mut creator = ProjectCreator::new(
        request,
        settings,
        Box::new(ShellRunner::new()),
        Box::new(LocalFilesystem::new()),
    );

    let echo = output.clone();
    creator.on_exec(move |cmd| {
        let _ = echo.command(cmd);
    });

    if !creator.validate() {
        return Err(stored_error(creator.error()));
    }
    output.key_values("information", &creator.info())?;

    let interact = TerminalInteract::new(output.clone());
    let path = creator
        .project_path()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| stored_error(creator.error()))?;

    if path.exists() {
        if !args.yes && !interact.confirm(DELETE_QUESTION, false)? {
            output.print(GOODBYE)?;
            return Ok(());
        }
        creator.delete_dir(&path)?;
    }

    if !args.yes && !interact.confirm(CREATE_APP_QUESTION, true)? {
        output.print(GOODBYE)?;
        return Ok(());
    }

    creator.create()?;
    creator.install()?;

    info!(path = %path.display(), "application created");
    output.success("Completed!")?;
    output.success(&format!("Project: {} created", path.display()))?;
    Ok(())
}

#[instrument(skip_all, fields(name = %args.name))]
fn component(args: NewComponentArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let work_dir = std::env::current_dir().with_cli_context(|| "reading the working directory")?;

    let aliases = config.aliases_for(&work_dir);
    let AppConfig { component: defaults, .. } = config;

    let request = ComponentRequest {
        name: args.name,
        output_dir: args.output.map(|dir| work_dir.join(dir)),
        work_dir,
        username: args.username.unwrap_or(defaults.username),
        pkg_name: args.pkg_name,
        namespace: args.namespace,
        no_license: args.no_license,
    };

    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let renderer = HandlebarsRenderer::new(filesystem, Arc::new(aliases));
    let mut creator = ComponentCreator::new(
        request,
        defaults.template_dir,
        Box::new(renderer),
        Box::new(LocalFilesystem::new()),
    );

    let echo = output.clone();
    creator.on_notify(move |message| {
        let _ = echo.info(message);
    });

    if !creator.validate() {
        return Err(stored_error(creator.error()));
    }
    output.key_values("information", &creator.info())?;

    let interact = TerminalInteract::new(output.clone());
    if !args.yes && !interact.confirm(CREATE_COMPONENT_QUESTION, true)? {
        output.print(GOODBYE)?;
        return Ok(());
    }

    creator.create()?;
    output.success("Completed!")?;
    Ok(())
}

fn stored_error(err: Option<&StubforgeError>) -> CliError {
    match err {
        Some(err) => CliError::Core(err.clone()),
        None => CliError::Core(StubforgeError::Internal {
            message: "creator reported failure without an error".into(),
        }),
    }
}
