use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// The level of logging to use. Logs go to stderr, so the default keeps
    /// command output free of noise.
    ///
    /// Can also be set via the `LOG_LEVEL` environment variable.
    #[serde(default)]
    pub level: LogLevel,

    /// The format of the log messages.
    ///
    /// Can also be set via the `LOG_FORMAT` environment variable.
    #[serde(default)]
    pub format: LogFormat,

    /// An `EnvFilter` directive (for example `schema_graph::editing=debug`)
    /// used instead of `level` when set.
    ///
    /// Can also be set via the `LOG_FILTER` environment variable.
    #[serde(default)]
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn env_filter_str(&self) -> &str {
        self.filter.as_deref().unwrap_or(self.level.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema, EnumString, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum LogFormat {
    #[serde(rename = "pretty-tree")]
    #[strum(serialize = "pretty-tree")]
    PrettyTree,
    #[default]
    #[serde(rename = "pretty-compact")]
    #[strum(serialize = "pretty-compact")]
    PrettyCompact,
    #[serde(rename = "json")]
    #[strum(serialize = "json")]
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_env_values_case_insensitively() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("Pretty-Tree".parse::<LogFormat>(), Ok(LogFormat::PrettyTree));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn filter_wins_over_level() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.env_filter_str(), "warn");

        config.filter = Some("schema_graph=trace".into());
        assert_eq!(config.env_filter_str(), "schema_graph=trace");
    }
}
