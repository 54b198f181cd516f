//! Component creator - a reusable library skeleton from a file manifest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer},
    },
    domain::{ComponentCreationState, ComponentRequest, FileManifestEntry, RenderContext},
    error::{StubforgeError, StubforgeResult},
};

/// Called with a progress message before each step and file write.
pub type Notifier = Box<dyn Fn(&str)>;

pub struct ComponentCreator {
    request: ComponentRequest,
    template_dir: PathBuf,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    year: i32,
    state: Option<ComponentCreationState>,
    error: Option<StubforgeError>,
    on_notify: Option<Notifier>,
}

impl ComponentCreator {
    pub fn new(
        request: ComponentRequest,
        template_dir: impl Into<PathBuf>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            request,
            template_dir: template_dir.into(),
            renderer,
            filesystem,
            year: chrono::Local::now().year(),
            state: None,
            error: None,
            on_notify: None,
        }
    }

    /// Pin the `{{year}}` template variable.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn on_notify(&mut self, notify: impl Fn(&str) + 'static) {
        self.on_notify = Some(Box::new(notify));
    }

    #[instrument(skip_all, fields(name = %self.request.name))]
    pub fn validate(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        match self.request.validate() {
            Ok(state) => {
                debug!(path = %state.target_path.display(), "component request valid");
                self.state = Some(state);
                true
            }
            Err(e) => {
                warn!(error = %e, "component request invalid");
                self.error = Some(e.into());
                false
            }
        }
    }

    pub fn error(&self) -> Option<&StubforgeError> {
        self.error.as_ref()
    }

    pub fn state(&self) -> Option<&ComponentCreationState> {
        self.state.as_ref()
    }

    pub fn info(&self) -> BTreeMap<&'static str, String> {
        self.state
            .as_ref()
            .map(ComponentCreationState::info)
            .unwrap_or_default()
    }

    /// Create the component directory and materialize the manifest.
    #[instrument(skip_all)]
    pub fn create(&mut self) -> StubforgeResult<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.state.is_none() && !self.validate() {
            return Err(self.stored_error());
        }
        let Some(state) = self.state.clone() else {
            return Err(self.stored_error());
        };

        let result = self.create_from(&state);
        if let Err(err) = &result {
            self.error = Some(err.clone());
        }
        result
    }

    fn create_from(&self, state: &ComponentCreationState) -> StubforgeResult<()> {
        let target = &state.target_path;
        if self.filesystem.exists(target) {
            return Err(ApplicationError::TargetExists {
                path: target.clone(),
            }
            .into());
        }

        self.notify(&format!("Create component dir: {}", target.display()));
        self.filesystem.create_dir_all(target)?;

        self.notify("Create directory structure and base files");
        let context = state.render_context(self.year);
        for entry in state.manifest() {
            let destination = entry.destination_path(target);
            self.notify(&format!("create file: {}", destination.display()));
            self.materialize(&entry, &destination, &context)?;
        }

        self.notify(&format!(
            "Component: {} created(path: {})",
            state.name,
            target.display()
        ));
        info!(path = %target.display(), "component created");
        Ok(())
    }

    fn materialize(
        &self,
        entry: &FileManifestEntry,
        destination: &Path,
        context: &RenderContext,
    ) -> StubforgeResult<()> {
        let source = entry.source_path(&self.template_dir);
        if entry.render {
            return self.renderer.render_to_file(&source, context, destination);
        }

        if !self.filesystem.exists(&source) {
            return Err(ApplicationError::TemplateNotFound { path: source }.into());
        }
        let content = self.filesystem.read_to_string(&source)?;
        self.renderer.write_raw(destination, &content)
    }

    fn notify(&self, message: &str) {
        debug!(%message);
        if let Some(notify) = &self.on_notify {
            notify(message);
        }
    }

    fn stored_error(&self) -> StubforgeError {
        self.error.clone().unwrap_or_else(|| StubforgeError::Internal {
            message: "component validated without a state".into(),
        })
    }
}
