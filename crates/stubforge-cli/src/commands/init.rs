//! `stubforge init` - write a default configuration file.

use std::path::PathBuf;

use tracing::info;

use crate::{
    cli::InitArgs,
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Write the built-in defaults as TOML, to the user config file or with
/// `--local` to `.stubforge.toml` in the working directory.
pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    let config_path = target_path(args.local)?;

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    let toml = toml::to_string_pretty(&AppConfig::default())
        .with_cli_context(|| "Failed to serialise default config")?;

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }

    std::fs::write(&config_path, toml).with_cli_context(|| {
        format!("Failed to write config to '{}'", config_path.display())
    })?;

    info!(path = %config_path.display(), "config written");
    output.success(&format!("Configuration created at {}", config_path.display()))?;
    Ok(())
}

fn target_path(local: bool) -> CliResult<PathBuf> {
    if local {
        let cwd = std::env::current_dir().with_cli_context(|| "reading the working directory")?;
        Ok(cwd.join(LOCAL_CONFIG_FILE))
    } else {
        Ok(AppConfig::config_path())
    }
}
