//! Generation session - one class file from one artifact type key.
//!
//! The session walks a fixed sequence:
//!
//! ```text
//! begin -> SpecResolved -> collect_name -> NameCollected
//!       -> fire_after_collect -> ContextFinalized
//!       -> finalize_and_write -> Rendered | Declined | Failed
//! ```
//!
//! Each step checks the current state, so the after-collect hook can never be
//! skipped once a spec is resolved.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{AliasResolver, Filesystem, Interact, TemplateRenderer},
    },
    domain::{ArtifactKind, ArtifactOverrides, ArtifactSpec, DomainError, GenerationContext},
    error::{StubforgeError, StubforgeResult},
};

pub const NAME_PROMPT: &str = "Please input class name(no suffix and ext. eg. test)";
pub const OVERRIDE_QUESTION: &str = "Target file has been exists, override it?";
pub const WRITE_QUESTION: &str = "Now, will write content to file, ensure continue?";

/// Runs after the name is collected and before rendering.
pub type AfterCollectHook = Box<dyn FnMut(&mut GenerationContext)>;

/// Where generation reads templates and writes classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub template_dir: PathBuf,
    pub template_ext: String,
    pub source_ext: String,
    pub work_dir: PathBuf,
}

impl GeneratorSettings {
    pub fn new(template_dir: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            template_ext: ".stub".into(),
            source_ext: "php".into(),
            work_dir: work_dir.into(),
        }
    }
}

/// Adapters a session talks to.
#[derive(Clone)]
pub struct GeneratorPorts {
    pub renderer: Arc<dyn TemplateRenderer>,
    pub filesystem: Arc<dyn Filesystem>,
    pub aliases: Arc<dyn AliasResolver>,
}

/// Per-request values from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    pub name: Option<String>,
    pub overrides: ArtifactOverrides,
    pub template_dir: Option<PathBuf>,
    pub template_file: Option<PathBuf>,
    pub assume_yes: bool,
    pub preview: bool,
}

impl GenerationOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// `--tpl-file`: a bare name selects a template in the template dir,
    /// anything with a path separator is used as-is.
    pub fn with_template(mut self, value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return self;
        }
        if value.contains(['/', '\\']) {
            self.template_file = Some(PathBuf::from(value));
        } else {
            self.overrides.template_name = Some(value.to_owned());
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SpecResolved,
    NameCollected,
    ContextFinalized,
    Rendered,
    Declined,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rendered | Self::Declined | Self::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SpecResolved => "spec-resolved",
            Self::NameCollected => "name-collected",
            Self::ContextFinalized => "context-finalized",
            Self::Rendered => "rendered",
            Self::Declined => "declined",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Written { path: PathBuf },
    Declined { path: PathBuf },
    WriteFailed { path: PathBuf, reason: String },
}

impl GenerationOutcome {
    /// Declining is not an error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Written { .. } | Self::Declined { .. } => 0,
            Self::WriteFailed { .. } => 1,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Written { path } | Self::Declined { path } | Self::WriteFailed { path, .. } => {
                path
            }
        }
    }

    fn terminal_state(&self) -> SessionState {
        match self {
            Self::Written { .. } => SessionState::Rendered,
            Self::Declined { .. } => SessionState::Declined,
            Self::WriteFailed { .. } => SessionState::Failed,
        }
    }
}

pub struct GenerationSession {
    spec: ArtifactSpec,
    options: GenerationOptions,
    settings: GeneratorSettings,
    ports: GeneratorPorts,
    state: SessionState,
    context: Option<GenerationContext>,
    after_collect: Option<AfterCollectHook>,
}

impl GenerationSession {
    /// Resolve the artifact spec and merge the command line overrides.
    ///
    /// Touches no port, so an unknown type key fails without I/O.
    #[instrument(skip_all, fields(type_key = %type_key))]
    pub fn begin(
        type_key: &str,
        options: GenerationOptions,
        settings: GeneratorSettings,
        ports: GeneratorPorts,
    ) -> StubforgeResult<Self> {
        let kind: ArtifactKind = type_key.parse()?;
        let spec = kind.spec()?.merge(&options.overrides);
        debug!(?spec, "resolved artifact spec");

        let after_collect = kind.specialization().map(|specialize| {
            let overrides = options.overrides.clone();
            Box::new(move |ctx: &mut GenerationContext| specialize(ctx, &overrides))
                as AfterCollectHook
        });

        Ok(Self {
            spec,
            options,
            settings,
            ports,
            state: SessionState::SpecResolved,
            context: None,
            after_collect,
        })
    }

    pub fn spec(&self) -> &ArtifactSpec {
        &self.spec
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn context(&self) -> Option<&GenerationContext> {
        self.context.as_ref()
    }

    /// Mutable access for callers that adjust the context between steps.
    pub fn context_mut(&mut self) -> Option<&mut GenerationContext> {
        self.context.as_mut()
    }

    /// Replace the after-collect hook (the kind's specialization by default).
    pub fn on_after_collect(&mut self, hook: impl FnMut(&mut GenerationContext) + 'static) {
        self.after_collect = Some(Box::new(hook));
    }

    /// Take the name from the options or ask for it.
    pub fn collect_name(&mut self, interact: &dyn Interact) -> StubforgeResult<String> {
        self.expect_state(SessionState::SpecResolved, "collect name")?;

        let result = self.build_context(interact);
        match &result {
            Ok(_) => self.state = SessionState::NameCollected,
            Err(_) => self.state = SessionState::Failed,
        }
        result
    }

    fn build_context(&mut self, interact: &dyn Interact) -> StubforgeResult<String> {
        let name = match self
            .options
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            Some(name) => name.to_owned(),
            None => interact.ask(NAME_PROMPT)?.trim().to_owned(),
        };
        if name.is_empty() {
            return Err(DomainError::MissingRequiredInput { field: "name" }.into());
        }

        let template_dir = self
            .options
            .template_dir
            .clone()
            .unwrap_or_else(|| self.settings.template_dir.clone());

        let mut ctx = GenerationContext::new(
            &self.spec,
            &name,
            template_dir,
            self.settings.work_dir.clone(),
        );
        ctx.template_file = self.options.template_file.clone();
        self.context = Some(ctx);
        Ok(name)
    }

    /// Run the after-collect hook, if any.
    pub fn fire_after_collect(&mut self) -> StubforgeResult<()> {
        self.expect_state(SessionState::NameCollected, "fire after-collect hook")?;

        let ctx = self.context.as_mut().ok_or_else(|| missing_context("fire"))?;
        if let Some(hook) = self.after_collect.as_mut() {
            hook(ctx);
        }
        self.state = SessionState::ContextFinalized;
        Ok(())
    }

    /// `<output dir>/<ClassName>.<source ext>`, with aliases expanded and
    /// relative directories taken from the working directory.
    pub fn destination(&self) -> StubforgeResult<PathBuf> {
        let ctx = self.context.as_ref().ok_or_else(|| missing_context("resolve destination"))?;

        let dir = self.ports.aliases.resolve(&ctx.output_dir)?;
        let dir = if dir.is_absolute() {
            dir
        } else {
            ctx.work_dir.join(dir)
        };
        let ext = self.settings.source_ext.trim_start_matches('.');
        Ok(dir.join(format!("{}.{}", ctx.class_name, ext)))
    }

    pub fn template_path(&self) -> StubforgeResult<PathBuf> {
        let ctx = self.context.as_ref().ok_or_else(|| missing_context("resolve template"))?;
        Ok(ctx.template_location(&self.settings.template_ext).resolve())
    }

    /// Render, confirm and write.
    ///
    /// Declines and write failures are outcomes. Template errors are `Err`.
    #[instrument(skip_all, fields(kind = %self.spec.kind))]
    pub fn finalize_and_write(
        &mut self,
        interact: &dyn Interact,
    ) -> StubforgeResult<GenerationOutcome> {
        self.expect_state(SessionState::ContextFinalized, "write")?;

        let result = self.write(interact);
        self.state = match &result {
            Ok(outcome) => outcome.terminal_state(),
            Err(_) => SessionState::Failed,
        };
        result
    }

    fn write(&self, interact: &dyn Interact) -> StubforgeResult<GenerationOutcome> {
        let ctx = self.context.as_ref().ok_or_else(|| missing_context("write"))?;
        let template = self.template_path()?;
        let path = self.destination()?;

        let content = self.ports.renderer.render(&template, &ctx.render_context())?;
        if self.options.preview {
            interact.preview(&content);
        }

        if !self.options.assume_yes {
            if self.ports.filesystem.exists(&path) && !interact.confirm(OVERRIDE_QUESTION, false)? {
                info!(path = %path.display(), "overwrite declined");
                return Ok(GenerationOutcome::Declined { path });
            }
            if !interact.confirm(WRITE_QUESTION, true)? {
                info!(path = %path.display(), "write declined");
                return Ok(GenerationOutcome::Declined { path });
            }
        }

        match self.ports.renderer.write_raw(&path, &content) {
            Ok(()) => {
                info!(path = %path.display(), "class file written");
                Ok(GenerationOutcome::Written { path })
            }
            Err(StubforgeError::Application(ApplicationError::WriteError { reason, .. })) => {
                warn!(path = %path.display(), %reason, "class file write failed");
                Ok(GenerationOutcome::WriteFailed { path, reason })
            }
            Err(e) => Err(e),
        }
    }

    /// All steps in order.
    pub fn run(&mut self, interact: &dyn Interact) -> StubforgeResult<GenerationOutcome> {
        self.collect_name(interact)?;
        self.fire_after_collect()?;
        self.finalize_and_write(interact)
    }

    fn expect_state(&self, expected: SessionState, operation: &'static str) -> StubforgeResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ApplicationError::InvalidState {
                operation,
                state: self.state.to_string(),
            }
            .into())
        }
    }
}

fn missing_context(operation: &'static str) -> StubforgeError {
    ApplicationError::InvalidState {
        operation,
        state: "without a context".into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockAliasResolver, MockFilesystem, MockInteract, MockTemplateRenderer,
    };
    use crate::domain::{ARTIFACT_REGISTRY, lookup};

    fn settings() -> GeneratorSettings {
        GeneratorSettings::new("/tpl/classes", "/work")
    }

    fn ports(renderer: MockTemplateRenderer, filesystem: MockFilesystem) -> GeneratorPorts {
        let mut aliases = MockAliasResolver::new();
        aliases
            .expect_resolve()
            .returning(|path| Ok(PathBuf::from(path)));
        GeneratorPorts {
            renderer: Arc::new(renderer),
            filesystem: Arc::new(filesystem),
            aliases: Arc::new(aliases),
        }
    }

    fn idle_ports() -> GeneratorPorts {
        ports(MockTemplateRenderer::new(), MockFilesystem::new())
    }

    fn rendering(content: &'static str) -> MockTemplateRenderer {
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .returning(move |_, _| Ok(content.to_owned()));
        renderer
    }

    fn existing(exists: bool) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(move |_| exists);
        fs
    }

    #[test]
    fn begin_with_no_overrides_matches_registry() {
        for def in ARTIFACT_REGISTRY {
            let session = GenerationSession::begin(
                def.kind.type_key(),
                GenerationOptions::default(),
                settings(),
                idle_ports(),
            )
            .unwrap();
            assert_eq!(session.spec(), &lookup(def.kind.type_key()).unwrap());
            assert_eq!(session.state(), SessionState::SpecResolved);
        }
    }

    #[test]
    fn unknown_type_key_fails_without_io() {
        let result = GenerationSession::begin(
            "nope",
            GenerationOptions::default(),
            settings(),
            idle_ports(),
        );
        assert!(matches!(
            result,
            Err(StubforgeError::Domain(DomainError::UnknownArtifactType { .. }))
        ));
    }

    #[test]
    fn http_controller_scenario() {
        let mut session = GenerationSession::begin(
            "httpController",
            GenerationOptions::named("user"),
            settings(),
            idle_ports(),
        )
        .unwrap();

        session.collect_name(&MockInteract::new()).unwrap();
        session.fire_after_collect().unwrap();

        let ctx = session.context().unwrap();
        assert_eq!(ctx.namespace, "App\\Http\\Controller");
        assert_eq!(ctx.suffix, "Controller");
        assert_eq!(ctx.class_name, "UserController");
        assert_eq!(ctx.output_dir, "app/Http/Controller");
        assert_eq!(ctx.get("prefix"), Some("/user"));
        assert_eq!(
            session.destination().unwrap(),
            PathBuf::from("/work/app/Http/Controller/UserController.php")
        );
        assert_eq!(
            session.template_path().unwrap(),
            PathBuf::from("/tpl/classes/http-rest-controller.stub")
        );
    }

    #[test]
    fn name_is_prompted_when_missing() {
        let mut interact = MockInteract::new();
        interact
            .expect_ask()
            .times(1)
            .returning(|_| Ok("  demo ".into()));

        let mut session =
            GenerationSession::begin("task", GenerationOptions::default(), settings(), idle_ports())
                .unwrap();
        assert_eq!(session.collect_name(&interact).unwrap(), "demo");
        assert_eq!(session.context().unwrap().class_name, "DemoTask");
    }

    #[test]
    fn empty_prompt_answer_is_missing_input() {
        let mut interact = MockInteract::new();
        interact.expect_ask().returning(|_| Ok(String::new()));

        let mut session =
            GenerationSession::begin("task", GenerationOptions::default(), settings(), idle_ports())
                .unwrap();
        let err = session.collect_name(&interact).unwrap_err();

        assert!(matches!(
            err,
            StubforgeError::Domain(DomainError::MissingRequiredInput { field: "name" })
        ));
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[test]
    fn steps_out_of_order_are_rejected() {
        let mut session = GenerationSession::begin(
            "task",
            GenerationOptions::named("demo"),
            settings(),
            idle_ports(),
        )
        .unwrap();

        let err = session.finalize_and_write(&MockInteract::new()).unwrap_err();
        assert!(matches!(
            err,
            StubforgeError::Application(ApplicationError::InvalidState { .. })
        ));
        assert!(session.fire_after_collect().is_err());
    }

    #[test]
    fn yes_flag_skips_every_confirmation() {
        let mut renderer = rendering("<?php class DemoTask {}");
        renderer
            .expect_write_raw()
            .withf(|path, content| {
                path == Path::new("/work/app/Task/DemoTask.php") && content.contains("DemoTask")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let options = GenerationOptions {
            assume_yes: true,
            ..GenerationOptions::named("demo")
        };
        let mut session =
            GenerationSession::begin("task", options, settings(), ports(renderer, existing(true)))
                .unwrap();

        // No expectations: any prompt would panic.
        let outcome = session.run(&MockInteract::new()).unwrap();

        assert_eq!(
            outcome,
            GenerationOutcome::Written {
                path: PathBuf::from("/work/app/Task/DemoTask.php")
            }
        );
        assert_eq!(session.state(), SessionState::Rendered);
    }

    #[test]
    fn declining_overwrite_writes_nothing() {
        let mut renderer = rendering("content");
        renderer.expect_write_raw().never();

        let mut interact = MockInteract::new();
        interact
            .expect_confirm()
            .withf(|question, default| question == OVERRIDE_QUESTION && !*default)
            .times(1)
            .returning(|_, _| Ok(false));

        let mut session = GenerationSession::begin(
            "task",
            GenerationOptions::named("demo"),
            settings(),
            ports(renderer, existing(true)),
        )
        .unwrap();
        let outcome = session.run(&interact).unwrap();

        assert!(matches!(outcome, GenerationOutcome::Declined { .. }));
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(session.state(), SessionState::Declined);
    }

    #[test]
    fn declining_final_confirmation_writes_nothing() {
        let mut renderer = rendering("content");
        renderer.expect_write_raw().never();

        let mut interact = MockInteract::new();
        interact
            .expect_confirm()
            .withf(|question, _| question == WRITE_QUESTION)
            .times(1)
            .returning(|_, _| Ok(false));

        let mut session = GenerationSession::begin(
            "task",
            GenerationOptions::named("demo"),
            settings(),
            ports(renderer, existing(false)),
        )
        .unwrap();

        assert!(matches!(
            session.run(&interact).unwrap(),
            GenerationOutcome::Declined { .. }
        ));
    }

    #[test]
    fn write_error_is_an_outcome() {
        let mut renderer = rendering("content");
        renderer.expect_write_raw().returning(|path, _| {
            Err(ApplicationError::WriteError {
                path: path.to_path_buf(),
                reason: "permission denied".into(),
            }
            .into())
        });

        let options = GenerationOptions {
            assume_yes: true,
            ..GenerationOptions::named("demo")
        };
        let mut session =
            GenerationSession::begin("task", options, settings(), ports(renderer, existing(false)))
                .unwrap();
        let outcome = session.run(&MockInteract::new()).unwrap();

        assert_eq!(outcome.exit_code(), 1);
        assert!(matches!(
            outcome,
            GenerationOutcome::WriteFailed { ref reason, .. } if reason == "permission denied"
        ));
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[test]
    fn template_errors_propagate() {
        let mut renderer = MockTemplateRenderer::new();
        renderer.expect_render().returning(|path, _| {
            Err(ApplicationError::TemplateNotFound {
                path: path.to_path_buf(),
            }
            .into())
        });

        let mut session = GenerationSession::begin(
            "task",
            GenerationOptions::named("demo"),
            settings(),
            ports(renderer, MockFilesystem::new()),
        )
        .unwrap();
        let err = session.run(&MockInteract::new()).unwrap_err();

        assert!(matches!(
            err,
            StubforgeError::Application(ApplicationError::TemplateNotFound { .. })
        ));
        assert_eq!(session.state(), SessionState::Failed);
    }

    #[test]
    fn preview_shows_rendered_content() {
        let mut renderer = rendering("rendered body");
        renderer.expect_write_raw().returning(|_, _| Ok(()));

        let mut interact = MockInteract::new();
        interact
            .expect_preview()
            .withf(|content| content == "rendered body")
            .times(1)
            .return_const(());

        let options = GenerationOptions {
            assume_yes: true,
            preview: true,
            ..GenerationOptions::named("demo")
        };
        let mut session =
            GenerationSession::begin("task", options, settings(), ports(renderer, existing(false)))
                .unwrap();
        session.run(&interact).unwrap();
    }

    #[test]
    fn custom_hook_replaces_specialization() {
        let mut session = GenerationSession::begin(
            "httpController",
            GenerationOptions::named("user"),
            settings(),
            idle_ports(),
        )
        .unwrap();
        session.on_after_collect(|ctx| ctx.set("prefix", "/api/users"));

        session.collect_name(&MockInteract::new()).unwrap();
        session.fire_after_collect().unwrap();

        let ctx = session.context().unwrap();
        assert_eq!(ctx.get("prefix"), Some("/api/users"));
        assert_eq!(ctx.get("idVar"), None);
    }

    #[test]
    fn template_option_classifies_names_and_paths() {
        let by_name = GenerationOptions::default().with_template("my-task");
        assert_eq!(by_name.overrides.template_name.as_deref(), Some("my-task"));
        assert!(by_name.template_file.is_none());

        let by_path = GenerationOptions::default().with_template("./stubs/task.tpl");
        assert_eq!(by_path.template_file, Some(PathBuf::from("./stubs/task.tpl")));
        assert!(by_path.overrides.template_name.is_none());
    }

    #[test]
    fn overrides_flow_into_destination() {
        let options = GenerationOptions {
            overrides: ArtifactOverrides {
                output_dir: Some("/abs/out".into()),
                suffix: Some("Job".into()),
                ..Default::default()
            },
            ..GenerationOptions::named("sync")
        };
        let mut session =
            GenerationSession::begin("task", options, settings(), idle_ports()).unwrap();
        session.collect_name(&MockInteract::new()).unwrap();
        session.fire_after_collect().unwrap();

        assert_eq!(
            session.destination().unwrap(),
            PathBuf::from("/abs/out/SyncJob.php")
        );
    }
}
