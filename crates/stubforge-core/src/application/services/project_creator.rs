//! Project creator - application skeletons from a cached git clone.
//!
//! Every step checks the stored error first. Once a step fails, later steps
//! return that same error and issue no further commands.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, Filesystem},
    },
    domain::{ProjectCreationState, ProjectRequest},
    error::{StubforgeError, StubforgeResult},
};

/// Cache directory permissions: owner rwx, group rwx, others r-x.
pub const CACHE_DIR_MODE: u32 = 0o775;

/// Paths shorter than this are never handed to `rm -rf`.
pub const MIN_DELETE_PATH_LEN: usize = 6;

/// Called with every command line before it runs.
pub type ExecNotifier = Box<dyn Fn(&str)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    pub cache_dir: PathBuf,
    pub install_command: String,
}

impl ProjectSettings {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            install_command: "composer install --no-progress".into(),
        }
    }
}

pub struct ProjectCreator {
    request: ProjectRequest,
    settings: ProjectSettings,
    runner: Box<dyn CommandRunner>,
    filesystem: Box<dyn Filesystem>,
    state: Option<ProjectCreationState>,
    error: Option<StubforgeError>,
    on_exec: Option<ExecNotifier>,
}

impl ProjectCreator {
    pub fn new(
        request: ProjectRequest,
        settings: ProjectSettings,
        runner: Box<dyn CommandRunner>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            request,
            settings,
            runner,
            filesystem,
            state: None,
            error: None,
            on_exec: None,
        }
    }

    /// Register the before-exec notification.
    pub fn on_exec(&mut self, notify: impl Fn(&str) + 'static) {
        self.on_exec = Some(Box::new(notify));
    }

    /// Check the request. On failure the error is stored and `false` returned.
    #[instrument(skip_all, fields(name = %self.request.name))]
    pub fn validate(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        match self.request.validate() {
            Ok(state) => {
                debug!(
                    url = %state.source.resolved_url,
                    path = %state.project_path.display(),
                    "project request valid"
                );
                self.state = Some(state);
                true
            }
            Err(e) => {
                warn!(error = %e, "project request invalid");
                self.error = Some(e.into());
                false
            }
        }
    }

    pub fn error(&self) -> Option<&StubforgeError> {
        self.error.as_ref()
    }

    pub fn state(&self) -> Option<&ProjectCreationState> {
        self.state.as_ref()
    }

    pub fn project_path(&self) -> Option<&Path> {
        self.state.as_ref().map(|s| s.project_path.as_path())
    }

    pub fn info(&self) -> BTreeMap<&'static str, String> {
        self.state.as_ref().map(ProjectCreationState::info).unwrap_or_default()
    }

    /// Clone (or reuse) the cached skeleton and copy it to the project path.
    #[instrument(skip_all)]
    pub fn create(&mut self) -> StubforgeResult<()> {
        let state = self.checked_state()?;
        let result = self.create_from(&state);
        self.record(result)
    }

    fn create_from(&self, state: &ProjectCreationState) -> StubforgeResult<()> {
        let path = &state.project_path;
        if self.filesystem.exists(path) {
            return Err(ApplicationError::TargetExists { path: path.clone() }.into());
        }

        let cache_dir = &self.settings.cache_dir;
        if !self.filesystem.exists(cache_dir) {
            self.filesystem.create_dir_all(cache_dir)?;
            self.filesystem.set_mode(cache_dir, CACHE_DIR_MODE)?;
        }

        let cached = cache_dir.join(state.source.cache_dir_name());
        let mut has_cache = self.filesystem.exists(&cached);

        if has_cache && state.refresh {
            info!(path = %cached.display(), "refreshing cached skeleton");
            self.remove_dir(&cached)?;
            has_cache = false;
        }

        if !has_cache {
            self.exec(&format!(
                "cd {} && git clone --no-tags --depth 1 {}",
                quote(&cache_dir.to_string_lossy()),
                quote(&state.source.resolved_url)
            ))?;
        } else {
            debug!(path = %cached.display(), "reusing cached skeleton");
        }

        let target = path.to_string_lossy();
        self.exec(&format!(
            "cp -R {} {} && rm -rf {}",
            quote(&cached.to_string_lossy()),
            quote(&target),
            quote(&format!("{target}/.git"))
        ))?;

        info!(path = %path.display(), "project created");
        Ok(())
    }

    /// Run the dependency installer in the new project, unless skipped.
    #[instrument(skip_all)]
    pub fn install(&mut self) -> StubforgeResult<()> {
        let state = self.checked_state()?;
        if state.no_install {
            debug!("dependency install skipped");
            return Ok(());
        }

        let command = format!(
            "cd {} && {}",
            quote(&state.project_path.to_string_lossy()),
            self.settings.install_command
        );
        let result = self.exec(&command);
        self.record(result)
    }

    /// `rm -rf` a directory, refusing suspiciously short paths.
    pub fn delete_dir(&mut self, path: &Path) -> StubforgeResult<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let result = self.remove_dir(path);
        self.record(result)
    }

    fn remove_dir(&self, path: &Path) -> StubforgeResult<()> {
        let display = path.to_string_lossy();
        if display.trim().chars().count() < MIN_DELETE_PATH_LEN {
            return Err(ApplicationError::UnsafeDeletePath {
                path: display.into_owned(),
            }
            .into());
        }
        self.exec(&format!("rm -rf {}", quote(&display)))
    }

    fn exec(&self, command: &str) -> StubforgeResult<()> {
        if let Some(notify) = &self.on_exec {
            notify(command);
        }
        debug!(%command, "exec");

        let output = self.runner.run(command)?;
        if output.is_success() {
            Ok(())
        } else {
            warn!(%command, code = output.code, "command failed");
            Err(ApplicationError::ShellCommandFailed {
                command: command.to_owned(),
                output: output.output,
            }
            .into())
        }
    }

    /// Stored error first, then implicit validation.
    fn checked_state(&mut self) -> StubforgeResult<ProjectCreationState> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.state.is_none() {
            self.validate();
        }
        match (&self.error, &self.state) {
            (Some(err), _) => Err(err.clone()),
            (None, Some(state)) => Ok(state.clone()),
            (None, None) => Err(StubforgeError::Internal {
                message: "project validated without a state".into(),
            }),
        }
    }

    fn record(&mut self, result: StubforgeResult<()>) -> StubforgeResult<()> {
        if let Err(err) = &result {
            self.error = Some(err.clone());
        }
        result
    }
}

/// Single-quote a shell word when it holds anything beyond a safe set.
pub fn quote(word: &str) -> Cow<'_, str> {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@%+=,~".contains(c));
    if safe {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(format!("'{}'", word.replace('\'', r"'\''")))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use mockall::Sequence;

    use super::*;
    use crate::application::ports::{CommandOutput, MockCommandRunner, MockFilesystem};
    use crate::domain::DomainError;

    const CACHE: &str = "/tmp/stubforge-app-demos";
    const HTTP_URL: &str = "https://github.com/swoft-cloud/swoft-http-project.git";

    fn creator(
        request: ProjectRequest,
        runner: MockCommandRunner,
        fs: MockFilesystem,
    ) -> ProjectCreator {
        ProjectCreator::new(
            request,
            ProjectSettings::new(CACHE),
            Box::new(runner),
            Box::new(fs),
        )
    }

    fn http_request() -> ProjectRequest {
        ProjectRequest::new("demo").with_type("http").with_work_dir("/tmp/x")
    }

    #[test]
    fn quote_leaves_plain_words_alone() {
        assert_eq!(quote("/tmp/x/demo"), "/tmp/x/demo");
        assert_eq!(quote(HTTP_URL), HTTP_URL);
        assert_eq!(quote("my dir"), "'my dir'");
        assert_eq!(quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn fresh_http_project_clones_then_copies() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .withf(|p| p == Path::new("/tmp/x/demo"))
            .return_const(false);
        fs.expect_exists()
            .withf(|p| p == Path::new(CACHE))
            .return_const(true);
        fs.expect_exists()
            .withf(|p| *p == Path::new(CACHE).join("swoft-http-project"))
            .return_const(false);

        let mut seq = Sequence::new();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|cmd| {
                cmd == format!("cd {CACHE} && git clone --no-tags --depth 1 {HTTP_URL}")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::success("Cloning...")));
        runner
            .expect_run()
            .withf(|cmd| {
                cmd == format!(
                    "cp -R {CACHE}/swoft-http-project /tmp/x/demo && rm -rf /tmp/x/demo/.git"
                )
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(CommandOutput::success("")));

        let mut creator = creator(http_request(), runner, fs);
        assert!(creator.validate());
        creator.create().unwrap();
        assert!(creator.error().is_none());
    }

    #[test]
    fn cache_dir_is_created_with_mode() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| *p == Path::new(CACHE).join("swoft-http-project"));
        fs.expect_create_dir_all()
            .withf(|p| p == Path::new(CACHE))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_set_mode()
            .withf(|p, mode| p == Path::new(CACHE) && *mode == 0o775)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd.starts_with("cp -R"))
            .times(1)
            .returning(|_| Ok(CommandOutput::success("")));

        let mut creator = creator(http_request(), runner, fs);
        creator.create().unwrap();
    }

    #[test]
    fn refresh_deletes_cache_then_clones() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .withf(|p| p == Path::new("/tmp/x/demo"))
            .return_const(false);
        fs.expect_exists().return_const(true);

        let issued = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&issued);
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(3).returning(|_| Ok(CommandOutput::success("")));

        let mut creator = creator(http_request().refresh(true), runner, fs);
        creator.on_exec(move |cmd| log.borrow_mut().push(cmd.to_owned()));
        creator.create().unwrap();

        let issued = issued.borrow();
        assert_eq!(issued[0], format!("rm -rf {CACHE}/swoft-http-project"));
        assert!(issued[1].contains("git clone --no-tags --depth 1"));
        assert!(issued[2].starts_with("cp -R"));
    }

    #[test]
    fn invalid_request_never_runs_commands() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let mut creator = creator(
            ProjectRequest::new("demo").with_repo("not a repo"),
            runner,
            MockFilesystem::new(),
        );
        assert!(!creator.validate());

        let err = creator.create().unwrap_err();
        assert!(matches!(
            err,
            StubforgeError::Domain(DomainError::InvalidRepoAddress { .. })
        ));
        assert!(creator.install().is_err());
    }

    #[test]
    fn repo_without_a_name_never_touches_the_cache() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let mut creator = creator(
            ProjectRequest::new("demo")
                .with_repo("git@host:")
                .with_work_dir("/tmp/x"),
            runner,
            fs,
        );
        assert!(!creator.validate());
        assert!(matches!(
            creator.create().unwrap_err(),
            StubforgeError::Domain(DomainError::InvalidRepoAddress { ref repo }) if repo == "git@host:"
        ));
    }

    #[test]
    fn existing_project_path_is_target_exists() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let mut creator = creator(http_request(), runner, fs);
        let err = creator.create().unwrap_err();
        assert!(matches!(
            err,
            StubforgeError::Application(ApplicationError::TargetExists { .. })
        ));
    }

    #[test]
    fn failed_clone_stops_the_workflow() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p == Path::new(CACHE));

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_| Ok(CommandOutput::failure(128, "fatal: could not read from remote")));

        let mut creator = creator(http_request(), runner, fs);
        let err = creator.create().unwrap_err();
        assert_eq!(err.to_string(), "exec command fail: fatal: could not read from remote");

        // Stored error replays without new commands.
        assert_eq!(creator.install().unwrap_err().to_string(), err.to_string());
    }

    #[test]
    fn failed_refresh_delete_aborts_before_clone() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .withf(|p| p == Path::new("/tmp/x/demo"))
            .return_const(false);
        fs.expect_exists().return_const(true);

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd == format!("rm -rf {CACHE}/swoft-http-project"))
            .times(1)
            .returning(|_| Ok(CommandOutput::failure(1, "rm: cannot remove: Permission denied")));
        runner
            .expect_run()
            .withf(|cmd| cmd.contains("git clone") || cmd.starts_with("cp -R"))
            .never();

        let mut creator = creator(http_request().refresh(true), runner, fs);
        let err = creator.create().unwrap_err();
        assert!(matches!(
            err,
            StubforgeError::Application(ApplicationError::ShellCommandFailed { ref command, .. })
                if command.starts_with("rm -rf")
        ));
        assert_eq!(
            creator.error().map(ToString::to_string),
            Some(err.to_string())
        );
    }

    #[test]
    fn install_runs_in_project_dir() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|cmd| cmd == "cd /tmp/x/demo && composer install --no-progress")
            .times(1)
            .returning(|_| Ok(CommandOutput::success("")));

        let mut creator = creator(http_request(), runner, MockFilesystem::new());
        assert!(creator.validate());
        creator.install().unwrap();
    }

    #[test]
    fn install_can_be_skipped() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let mut creator = creator(http_request().no_install(true), runner, MockFilesystem::new());
        creator.install().unwrap();
    }

    #[test]
    fn short_paths_are_never_deleted() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let mut creator = creator(http_request(), runner, MockFilesystem::new());
        let err = creator.delete_dir(Path::new("/tmp")).unwrap_err();
        assert!(matches!(
            err,
            StubforgeError::Application(ApplicationError::UnsafeDeletePath { .. })
        ));
    }

    #[test]
    fn info_is_empty_before_validation() {
        let creator = creator(http_request(), MockCommandRunner::new(), MockFilesystem::new());
        assert!(creator.info().is_empty());
        assert!(creator.project_path().is_none());
    }
}
