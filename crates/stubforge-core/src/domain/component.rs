use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{
    context::{RenderContext, capitalize},
    error::DomainError,
};

/// Raw input for `new component`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentRequest {
    pub name: String,
    pub work_dir: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub username: String,
    pub pkg_name: Option<String>,
    pub namespace: Option<String>,
    pub no_license: bool,
}

impl ComponentRequest {
    pub fn validate(&self) -> Result<ComponentCreationState, DomainError> {
        let name = self.name.trim_matches(|c| c == ' ' || c == '/');
        if name.is_empty() {
            return Err(DomainError::MissingRequiredInput { field: "name" });
        }

        let output_dir = self
            .output_dir
            .clone()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| self.work_dir.clone());

        let pkg_name = non_empty(self.pkg_name.as_deref())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{}/{}", self.username, name));

        let namespace = non_empty(self.namespace.as_deref())
            .map(str::to_owned)
            .unwrap_or_else(|| capitalize(name))
            .replace('/', "\\");

        Ok(ComponentCreationState {
            name: name.to_owned(),
            target_path: output_dir.join(name),
            output_dir,
            username: self.username.clone(),
            pkg_name,
            namespace,
            no_license: self.no_license,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validated `new component` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCreationState {
    pub name: String,
    pub output_dir: PathBuf,
    pub target_path: PathBuf,
    pub username: String,
    pub pkg_name: String,
    pub namespace: String,
    pub no_license: bool,
}

impl ComponentCreationState {
    pub fn render_context(&self, year: i32) -> RenderContext {
        RenderContext::new()
            .with_variable("name", &self.name)
            .with_variable("upName", capitalize(&self.name))
            .with_variable("pkgName", &self.pkg_name)
            .with_variable("pkgNamespace", &self.namespace)
            .with_variable("escapePkgNamespace", self.namespace.replace('\\', "\\\\"))
            .with_variable("year", year.to_string())
    }

    pub fn info(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("name", self.name.clone()),
            ("outputDir", self.output_dir.display().to_string()),
            ("targetPath", self.target_path.display().to_string()),
            ("pkgName", self.pkg_name.clone()),
            ("namespace", self.namespace.clone()),
            ("license", (!self.no_license).to_string()),
        ])
    }

    pub fn manifest(&self) -> Vec<FileManifestEntry> {
        component_manifest(self.no_license)
    }
}

/// One boilerplate file: template source relative to the component template
/// directory, destination relative to the component root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileManifestEntry {
    pub source: &'static str,
    pub destination: &'static str,
    pub render: bool,
}

impl FileManifestEntry {
    pub const fn copy(source: &'static str, destination: &'static str) -> Self {
        Self {
            source,
            destination,
            render: false,
        }
    }

    pub const fn render(source: &'static str, destination: &'static str) -> Self {
        Self {
            source,
            destination,
            render: true,
        }
    }

    pub fn source_path(&self, template_dir: &Path) -> PathBuf {
        template_dir.join(self.source)
    }

    pub fn destination_path(&self, target: &Path) -> PathBuf {
        target.join(self.destination)
    }
}

const README: FileManifestEntry = FileManifestEntry::render("component/README.stub", "README.md");
const README_NO_LICENSE: FileManifestEntry =
    FileManifestEntry::render("component/README-nlc.stub", "README.md");
const LICENSE: FileManifestEntry = FileManifestEntry::copy("LICENSE.stub", "LICENSE");

/// Files every component starts with.
pub fn component_manifest(no_license: bool) -> Vec<FileManifestEntry> {
    let mut manifest = vec![FileManifestEntry::copy("gitignore.stub", ".gitignore")];

    if no_license {
        manifest.push(README_NO_LICENSE);
    } else {
        manifest.push(LICENSE);
        manifest.push(README);
    }

    manifest.extend([
        FileManifestEntry::copy("component/test-bootstrap.stub", "test/bootstrap.php"),
        FileManifestEntry::render("component/autoload.stub", "src/AutoLoader.php"),
        FileManifestEntry::render("component/composer.json.stub", "composer.json"),
    ]);
    manifest
}
