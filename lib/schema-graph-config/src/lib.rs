pub mod display;
mod env_overrides;
pub mod log;
pub mod primitives;
pub mod source;

use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat, FileSourceFile};
use envconfig::Envconfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    display::DisplayConfig,
    env_overrides::{EnvVarOverrides, EnvVarOverridesError},
    log::LoggingConfig,
    primitives::file_path::with_start_path,
    source::SchemaSource,
};

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SchemaGraphConfig {
    #[serde(skip)]
    root_directory: PathBuf,

    /// The logger configuration. Logs are written to stderr.
    #[serde(default)]
    pub log: LoggingConfig,

    /// Options for deriving and drawing the type graph.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Where the schema is read from when no input is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SchemaSource>,
}

impl SchemaGraphConfig {
    /// Directory relative paths in the config were resolved against.
    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
    #[error("Failed to apply configuration overrides: {0}")]
    EnvVarOverridesError(#[from] EnvVarOverridesError),
    #[error("Failed to load the environment variables: {0}")]
    EnvVarLoadError(#[from] envconfig::Error),
    #[error("Failed to get the current directory: {0}")]
    CurrentDirError(std::io::Error),
    #[error("Failed to read schema source '{path}': {source}")]
    SourceRead {
        path: String,
        source: std::io::Error,
    },
}

static DEFAULT_FILE_NAMES: &[&str] = &[
    "schema-graph.config.yaml",
    "schema-graph.config.yml",
    "schema-graph.config.json",
    "schema-graph.config.json5",
];

fn get_current_dir() -> Result<PathBuf, ConfigError> {
    std::env::current_dir().map_err(ConfigError::CurrentDirError)
}

/// Loads the config from `override_config_path`, or from the first default
/// file name found in the current directory, then applies environment overrides.
pub fn load_config(override_config_path: Option<&str>) -> Result<SchemaGraphConfig, ConfigError> {
    let env_overrides = EnvVarOverrides::init_from_env()?;
    let mut config = Config::builder();
    let mut config_root_path = get_current_dir()?;

    if let Some(path_str) = override_config_path {
        let path_buf = PathBuf::from(path_str);
        if let Some(parent_dir) = path_buf.parent() {
            config_root_path = config_root_path.join(parent_dir);
        }
        let as_file: File<FileSourceFile, _> = path_buf.into();
        config = config.add_source(as_file.required(true));
    } else {
        for name in DEFAULT_FILE_NAMES {
            config = config.add_source(File::with_name(name).required(false));
        }
    }

    config = env_overrides.apply_overrides(config)?;

    let mut loaded = with_start_path(&config_root_path, || {
        config.build()?.try_deserialize::<SchemaGraphConfig>()
    })?;

    loaded.root_directory = config_root_path;

    Ok(loaded)
}

pub fn parse_yaml_config(config_raw: &str) -> Result<SchemaGraphConfig, ConfigError> {
    parse_with_overrides(config_raw, EnvVarOverrides::default())
}

fn parse_with_overrides(
    config_raw: &str,
    overrides: EnvVarOverrides,
) -> Result<SchemaGraphConfig, ConfigError> {
    let config_root_path = get_current_dir()?;
    let config = overrides.apply_overrides(
        Config::builder().add_source(File::from_str(config_raw, FileFormat::Yaml)),
    )?;

    let mut parsed = with_start_path(&config_root_path, || {
        config.build()?.try_deserialize::<SchemaGraphConfig>()
    })?;
    parsed.root_directory = config_root_path;

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        log::{LogFormat, LogLevel},
        source::SourceFormat,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_yaml_config("").unwrap();

        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.log.level, LogLevel::Warn);
        assert!(config.source.is_none());
    }

    #[test]
    fn reads_display_and_log_sections() {
        let config = parse_yaml_config(
            r#"
log:
  level: debug
  format: json
display:
  focus_on: Pet
  sort_by_alphabet: true
  skip_relay: false
"#,
        )
        .unwrap();

        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.env_filter_str(), "debug");
        assert_eq!(config.display.focus_on.as_deref(), Some("Pet"));
        assert!(config.display.sort_by_alphabet);
        assert!(!config.display.skip_relay);
        assert!(config.display.show_subattributes);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = parse_yaml_config("display:\n  show_everything: true\n").unwrap_err();

        assert!(matches!(err, ConfigError::ConfigLoadError(_)), "{err}");
    }

    #[test]
    fn resolves_source_paths_against_the_config_directory() {
        let config = parse_yaml_config("source:\n  source: file\n  path: Cargo.toml\n").unwrap();
        let Some(SchemaSource::File { path }) = &config.source else {
            panic!("expected a file source");
        };

        assert!(path.absolute.is_absolute());
        assert_eq!(path.relative, "Cargo.toml");
        assert_eq!(config.source.unwrap().format(), SourceFormat::Sdl);
    }

    #[test]
    fn environment_overrides_win() {
        let overrides = EnvVarOverrides {
            log_level: Some(LogLevel::Trace),
            focus_on: Some("Owner".into()),
            root_type: Some("Pet".into()),
            ..EnvVarOverrides::default()
        };

        let config = parse_with_overrides("display:\n  focus_on: Pet\n", overrides).unwrap();

        assert_eq!(config.log.level, LogLevel::Trace);
        assert_eq!(config.display.focus_on.as_deref(), Some("Owner"));
        assert_eq!(config.display.root_type.as_deref(), Some("Pet"));
    }
}
