use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::{error::DomainError, repository::RepositorySource};

/// Raw input for `new app`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRequest {
    pub name: String,
    pub project_type: Option<String>,
    pub repo: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub refresh: bool,
    pub no_install: bool,
}

impl ProjectRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = Some(project_type.into());
        self
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(work_dir.into());
        self
    }

    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn no_install(mut self, no_install: bool) -> Self {
        self.no_install = no_install;
        self
    }

    /// Check the rules in order: name, then repository source.
    pub fn validate(&self) -> Result<ProjectCreationState, DomainError> {
        let name = self.name.trim_matches(|c| c == ' ' || c == '/');
        if name.is_empty() {
            return Err(DomainError::MissingRequiredInput { field: "name" });
        }

        let source =
            RepositorySource::resolve(self.repo.as_deref(), self.project_type.as_deref())?;

        let work_dir = self
            .work_dir
            .clone()
            .filter(|dir| !dir.as_os_str().is_empty());
        let project_path = match &work_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        };

        Ok(ProjectCreationState {
            name: name.to_owned(),
            project_type: self.project_type.clone(),
            repo: self.repo.clone(),
            source,
            work_dir,
            project_path,
            refresh: self.refresh,
            no_install: self.no_install,
        })
    }
}

/// Validated `new app` request. Never mutated after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreationState {
    pub name: String,
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    pub repo: Option<String>,
    pub source: RepositorySource,
    pub work_dir: Option<PathBuf>,
    pub project_path: PathBuf,
    pub refresh: bool,
    pub no_install: bool,
}

impl ProjectCreationState {
    /// Non-empty fields, for display before creation.
    pub fn info(&self) -> BTreeMap<&'static str, String> {
        let mut info = BTreeMap::new();
        info.insert("name", self.name.clone());
        if let Some(kind) = self.project_type.as_deref().filter(|t| !t.is_empty()) {
            info.insert("type", kind.to_owned());
        }
        if let Some(repo) = self.repo.as_deref().filter(|r| !r.is_empty()) {
            info.insert("repo", repo.to_owned());
        }
        info.insert("repoUrl", self.source.resolved_url.clone());
        if let Some(dir) = &self.work_dir {
            info.insert("workDir", dir.display().to_string());
        }
        info.insert("projectPath", self.project_path.display().to_string());
        if self.refresh {
            info.insert("refresh", "true".into());
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_path_joins_work_dir() {
        let state = ProjectRequest::new("demo")
            .with_type("http")
            .with_work_dir("/tmp/x")
            .validate()
            .unwrap();
        assert_eq!(state.project_path, PathBuf::from("/tmp/x/demo"));
    }

    #[test]
    fn empty_work_dir_uses_bare_name() {
        let state = ProjectRequest::new("demo")
            .with_type("http")
            .with_work_dir("")
            .validate()
            .unwrap();
        assert_eq!(state.project_path, PathBuf::from("demo"));
        assert!(state.work_dir.is_none());
    }

    #[test]
    fn name_is_trimmed_of_spaces_and_slashes() {
        let state = ProjectRequest::new(" demo/ ").with_type("ws").validate().unwrap();
        assert_eq!(state.name, "demo");
    }

    #[test]
    fn missing_name_is_checked_first() {
        let err = ProjectRequest::new("  ").validate().unwrap_err();
        assert_eq!(err, DomainError::MissingRequiredInput { field: "name" });
    }

    #[test]
    fn missing_source_fails() {
        assert_eq!(
            ProjectRequest::new("demo").validate(),
            Err(DomainError::MissingSource)
        );
    }

    #[test]
    fn invalid_preset_fails() {
        let err = ProjectRequest::new("demo")
            .with_type("bogus")
            .validate()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTypeName { .. }));
    }

    #[test]
    fn info_skips_empty_fields() {
        let state = ProjectRequest::new("demo").with_type("http").validate().unwrap();
        let info = state.info();
        assert_eq!(info.get("type").map(String::as_str), Some("http"));
        assert!(!info.contains_key("repo"));
        assert!(!info.contains_key("refresh"));
    }
}
