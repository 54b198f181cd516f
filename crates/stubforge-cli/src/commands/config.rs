//! `stubforge config` - inspect the effective configuration.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.print(&get_config_value(&config, &key)?)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).with_cli_context(|| "Failed to serialise config")?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

/// Look up a dotted key such as `generator.template_dir`.
///
/// Scalars print bare; tables print as TOML.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let root = toml::Value::try_from(config).with_cli_context(|| "Failed to serialise config")?;

    let unknown = || CliError::UnknownConfigKey { key: key.to_owned() };
    let value = key
        .split('.')
        .try_fold(&root, |value, part| value.get(part))
        .ok_or_else(unknown)?;

    Ok(match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Table(table) => {
            toml::to_string_pretty(table).with_cli_context(|| "Failed to serialise config")?
        }
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "generator.source_ext").unwrap(), "php");
        assert_eq!(get_config_value(&cfg, "generator.template_ext").unwrap(), ".stub");
    }

    #[test]
    fn get_no_color_default() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
    }

    #[test]
    fn get_section_prints_table() {
        let cfg = AppConfig::default();
        let section = get_config_value(&cfg, "project").unwrap();
        assert!(section.contains("install_command = \"composer install --no-progress\""));
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::UnknownConfigKey { .. })
        ));
        assert!(matches!(
            get_config_value(&cfg, "generator.source_ext.deeper"),
            Err(CliError::UnknownConfigKey { .. })
        ));
    }
}
