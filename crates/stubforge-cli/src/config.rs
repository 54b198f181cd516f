//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `STUBFORGE__<SECTION>__<KEY>`
//! 3. `--config FILE`, or `.stubforge.toml` in the working directory
//! 4. The user config file (see [`AppConfig::config_path`])
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use stubforge_adapters::AliasMap;

/// File name of the per-directory config.
pub const LOCAL_CONFIG_FILE: &str = ".stubforge.toml";

/// Overrides the directory holding the shipped templates.
pub const TEMPLATES_ENV: &str = "STUBFORGE_TEMPLATES_DIR";

const TEMPLATES_DIR: &str = "templates";

const ENV_PREFIX: &str = "STUBFORGE";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub project: ProjectConfig,
    pub component: ComponentConfig,
    /// Extra `@alias` entries; `@root` and `@app` are always present.
    #[serde(default)]
    pub aliases: AliasMap,
    pub output: OutputConfig,
}

/// `stubforge gen`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub template_dir: PathBuf,
    pub template_ext: String,
    pub source_ext: String,
}

/// `stubforge new app`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Where cloned skeletons are kept between runs.
    pub cache_dir: PathBuf,
    pub install_command: String,
}

/// `stubforge new component`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub template_dir: PathBuf,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let templates = templates_root();
        Self {
            generator: GeneratorConfig {
                template_dir: templates.join("classes"),
                template_ext: ".stub".into(),
                source_ext: "php".into(),
            },
            project: ProjectConfig {
                cache_dir: std::env::temp_dir().join("stubforge-app-demos"),
                install_command: "composer install --no-progress".into(),
            },
            component: ComponentConfig {
                template_dir: templates,
                username: default_username(),
            },
            aliases: AliasMap::new(),
            output: OutputConfig {
                no_color: false,
                format: "human".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration, layering files and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the implicit ones are optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::from(Self::config_path()).format(FileFormat::Toml).required(false));

        builder = match config_file {
            Some(path) => builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(true),
            ),
            None => builder.add_source(
                File::from(PathBuf::from(LOCAL_CONFIG_FILE))
                    .format(FileFormat::Toml)
                    .required(false),
            ),
        };

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stubforge.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "stubforge", "stubforge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Aliases for a run in `work_dir`: the built-in ones, then configured ones.
    pub fn aliases_for(&self, work_dir: &Path) -> AliasMap {
        let mut aliases = AliasMap::with_defaults(work_dir);
        aliases.merge(&self.aliases);
        aliases
    }
}

/// `$STUBFORGE_TEMPLATES_DIR`, else the first existing candidate from
/// [`template_candidates`], else `templates` in the working directory.
fn templates_root() -> PathBuf {
    if let Some(dir) = std::env::var_os(TEMPLATES_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    first_existing_dir(template_candidates()).unwrap_or_else(|| PathBuf::from(TEMPLATES_DIR))
}

/// Installed data dir, then next to the executable, then `../share/stubforge`
/// relative to it.
fn template_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> =
        directories::ProjectDirs::from("com", "stubforge", "stubforge")
            .map(|d| d.data_dir().join(TEMPLATES_DIR))
            .into_iter()
            .collect();

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    if let Some(dir) = exe_dir {
        candidates.push(dir.join(TEMPLATES_DIR));
        candidates.push(dir.join("../share/stubforge").join(TEMPLATES_DIR));
    }

    candidates
}

fn first_existing_dir(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|dir| dir.is_dir())
}

fn default_username() -> String {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "author".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_php_toolchain() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.generator.template_ext, ".stub");
        assert_eq!(cfg.generator.source_ext, "php");
        assert_eq!(cfg.project.install_command, "composer install --no-progress");
        assert!(cfg.project.cache_dir.ends_with("stubforge-app-demos"));
    }

    #[test]
    fn class_templates_live_under_component_root() {
        let cfg = AppConfig::default();
        assert_eq!(
            cfg.generator.template_dir,
            cfg.component.template_dir.join("classes")
        );
    }

    #[test]
    fn first_existing_template_dir_wins() {
        let dir = tempfile::tempdir().unwrap();
        let shipped = dir.path().join("share/templates");
        std::fs::create_dir_all(&shipped).unwrap();

        let found = first_existing_dir([
            dir.path().join("data/templates"),
            shipped.clone(),
            dir.path().to_path_buf(),
        ]);
        assert_eq!(found, Some(shipped));
        assert_eq!(first_existing_dir([dir.path().join("none")]), None);
    }

    #[test]
    fn template_candidates_are_runtime_paths() {
        let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
        let candidates = template_candidates();
        assert!(candidates.contains(&exe_dir.join("templates")));
        assert!(
            candidates
                .iter()
                .all(|c| !c.starts_with(env!("CARGO_MANIFEST_DIR")))
        );
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        std::fs::write(
            &file,
            "[generator]\nsource_ext = \"inc\"\n\n[aliases]\n\"@lib\" = \"/opt/lib\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&file)).unwrap();
        assert_eq!(cfg.generator.source_ext, "inc");
        assert_eq!(cfg.generator.template_ext, ".stub");
        assert_eq!(cfg.aliases.get("@lib"), Some(Path::new("/opt/lib")));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }

    #[test]
    fn configured_aliases_extend_builtins() {
        let mut cfg = AppConfig::default();
        cfg.aliases.insert("@app", "/elsewhere");
        let aliases = cfg.aliases_for(Path::new("/work"));
        assert_eq!(aliases.get("@root"), Some(Path::new("/work")));
        assert_eq!(aliases.get("@app"), Some(Path::new("/elsewhere")));
    }

    #[test]
    fn defaults_serialize_to_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[generator]"));
        assert!(text.contains("install_command"));
    }
}
