use std::fmt;

use serde::Serialize;

use crate::domain::error::DomainError;

/// Host prepended to `user/repo` shorthands.
pub const GITHUB_URL: &str = "https://github.com";

/// Named application skeletons.
pub static PRESET_REPOSITORIES: &[(&str, &str)] = &[
    ("http", "https://github.com/swoft-cloud/swoft-http-project.git"),
    ("ws", "https://github.com/swoft-cloud/swoft-ws-project.git"),
    ("tcp", "https://github.com/swoft-cloud/swoft-tcp-project.git"),
    ("rpc", "https://github.com/swoft-cloud/swoft-rpc-project.git"),
];

const URL_SCHEMES: &[&str] = &["http:", "https:", "git@"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    ExplicitUrl,
    NamedPreset,
}

/// Where a new application skeleton is cloned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySource {
    pub kind: SourceKind,
    pub raw_value: String,
    pub resolved_url: String,
}

impl RepositorySource {
    /// Classify an explicit `--repo` value.
    ///
    /// Full URLs pass through, `user/repo` becomes a GitHub clone URL, anything
    /// without a `/` past the first character is rejected. So is any address
    /// whose last segment cannot name a cache entry (`git@host:`, `me/..`).
    pub fn from_repo(repo: &str) -> Result<Self, DomainError> {
        let raw = repo.trim();
        let invalid = || DomainError::InvalidRepoAddress {
            repo: raw.to_owned(),
        };

        let resolved_url = if is_full_url(raw) {
            raw.to_owned()
        } else if raw.find('/').is_some_and(|pos| pos > 0) {
            let path = raw.trim_end_matches('/');
            if path.ends_with(".git") {
                format!("{GITHUB_URL}/{path}")
            } else {
                format!("{GITHUB_URL}/{path}.git")
            }
        } else {
            return Err(invalid());
        };

        if matches!(repo_base_name(&resolved_url), "" | "." | "..") {
            return Err(invalid());
        }

        Ok(Self {
            kind: SourceKind::ExplicitUrl,
            raw_value: raw.to_owned(),
            resolved_url,
        })
    }

    pub fn from_preset(name: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        let url = preset_url(name).ok_or_else(|| DomainError::InvalidTypeName {
            name: name.to_owned(),
            allowed: preset_names().join(", "),
        })?;

        Ok(Self {
            kind: SourceKind::NamedPreset,
            raw_value: name.to_owned(),
            resolved_url: url.to_owned(),
        })
    }

    /// An explicit repository wins over a preset name; blank values count as unset.
    pub fn resolve(repo: Option<&str>, preset: Option<&str>) -> Result<Self, DomainError> {
        let repo = repo.map(str::trim).filter(|r| !r.is_empty());
        let preset = preset.map(str::trim).filter(|p| !p.is_empty());

        match (repo, preset) {
            (Some(repo), _) => Self::from_repo(repo),
            (None, Some(preset)) => Self::from_preset(preset),
            (None, None) => Err(DomainError::MissingSource),
        }
    }

    /// Cache entry name: last URL segment without a trailing `.git`.
    pub fn cache_dir_name(&self) -> String {
        repo_base_name(&self.resolved_url).to_owned()
    }
}

impl fmt::Display for RepositorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolved_url)
    }
}

fn repo_base_name(url: &str) -> &str {
    let url = url.trim_end_matches('/');
    let base = url.rsplit(['/', ':']).next().unwrap_or(url);
    base.strip_suffix(".git").unwrap_or(base)
}

pub fn is_full_url(value: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| value.starts_with(scheme))
}

pub fn preset_url(name: &str) -> Option<&'static str> {
    PRESET_REPOSITORIES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, url)| *url)
}

pub fn preset_names() -> Vec<&'static str> {
    PRESET_REPOSITORIES.iter().map(|(key, _)| *key).collect()
}
