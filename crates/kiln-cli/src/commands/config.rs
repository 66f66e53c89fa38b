//! `kiln config` - inspect configuration values.

use serde_json::Value;

use crate::{
    cli::{ConfigCommands, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(serialised.trim_end())?;
        }

        ConfigCommands::Path => {
            output.print(
                &AppConfig::active_path(global.config.as_ref())
                    .display()
                    .to_string(),
            )?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Look up a dotted key such as `scaffold.source_dir`.
///
/// Unset optional values print as an empty string.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let unknown = || CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    };

    let root = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;

    let mut node = &root;
    for part in key.split('.') {
        node = node.get(part).ok_or_else(unknown)?;
    }

    match node {
        Value::Object(_) => Err(unknown()),
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        other => Ok(other.to_string()),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "scaffold.source_dir").unwrap(), "src");
        assert_eq!(get_config_value(&cfg, "output.format").unwrap(), "auto");
    }

    #[test]
    fn unset_default_is_empty() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "defaults.framework").unwrap(), "");
    }

    #[test]
    fn configured_list_prints_as_json_array() {
        let mut cfg = AppConfig::default();
        cfg.scaffold.startapp_command = Some(vec!["python".into(), "manage.py".into()]);
        assert_eq!(
            get_config_value(&cfg, "scaffold.startapp_command").unwrap(),
            r#"["python","manage.py"]"#
        );
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn section_is_not_a_value() {
        let cfg = AppConfig::default();
        assert!(get_config_value(&cfg, "defaults").is_err());
    }

    #[test]
    fn get_no_color_default() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
    }
}
