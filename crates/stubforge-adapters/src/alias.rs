//! Path alias resolution (`@app/Http/Controller` style paths).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use stubforge_core::{
    application::ports::AliasResolver, domain::DomainError, error::StubforgeResult,
};

const MARKER: char = '@';

/// Explicit alias table. Keys always carry the leading `@`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasMap {
    aliases: BTreeMap<String, PathBuf>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// `@root` is the working directory, `@app` is `<work_dir>/app`.
    pub fn with_defaults(work_dir: impl AsRef<Path>) -> Self {
        let work_dir = work_dir.as_ref();
        Self::new()
            .with_alias("@root", work_dir)
            .with_alias("@app", work_dir.join("app"))
    }

    pub fn with_alias(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.insert(name, path);
        self
    }

    pub fn insert(&mut self, name: &str, path: impl Into<PathBuf>) {
        self.aliases.insert(normalize(name), path.into());
    }

    /// Add every alias from `other`, replacing existing ones.
    pub fn merge(&mut self, other: &AliasMap) {
        for (name, path) in &other.aliases {
            self.aliases.insert(normalize(name), path.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.aliases.get(&normalize(name)).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }
}

impl AliasResolver for AliasMap {
    fn resolve(&self, path: &str) -> StubforgeResult<PathBuf> {
        if !path.starts_with(MARKER) {
            return Ok(PathBuf::from(path));
        }

        let (alias, rest) = path.split_once(['/', '\\']).unwrap_or((path, ""));
        let base = self.get(alias).ok_or_else(|| DomainError::UnknownAlias {
            alias: alias.to_owned(),
            path: path.to_owned(),
        })?;

        Ok(if rest.is_empty() {
            base.to_path_buf()
        } else {
            base.join(rest)
        })
    }
}

fn normalize(name: &str) -> String {
    let name = name.trim();
    if name.starts_with(MARKER) {
        name.to_owned()
    } else {
        format!("{MARKER}{name}")
    }
}
