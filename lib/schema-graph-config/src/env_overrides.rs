use config::{builder::BuilderState, ConfigBuilder};
use envconfig::Envconfig;
use tracing::debug;

use crate::log::{LogFormat, LogLevel};

#[derive(Envconfig, Default)]
pub struct EnvVarOverrides {
    // Logger overrides
    #[envconfig(from = "LOG_LEVEL")]
    pub log_level: Option<LogLevel>,
    #[envconfig(from = "LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
    #[envconfig(from = "LOG_FILTER")]
    pub log_filter: Option<String>,

    // Source overrides
    #[envconfig(from = "INTROSPECTION_FILE_PATH")]
    pub introspection_file_path: Option<String>,

    // Display overrides
    #[envconfig(from = "FOCUS_ON")]
    pub focus_on: Option<String>,
    #[envconfig(from = "ROOT_TYPE")]
    pub root_type: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnvVarOverridesError {
    #[error("Failed to override configuration: {0}")]
    FailedToOverrideConfig(#[from] config::ConfigError),
}

impl EnvVarOverrides {
    pub fn apply_overrides<T: BuilderState>(
        mut self,
        mut config: ConfigBuilder<T>,
    ) -> Result<ConfigBuilder<T>, EnvVarOverridesError> {
        if let Some(log_level) = self.log_level.take() {
            debug!("[config-override] 'log.level' = {:?}", log_level);
            config = config.set_override("log.level", log_level.as_str())?;
        }
        if let Some(log_format) = self.log_format.take() {
            debug!("[config-override] 'log.format' = {:?}", log_format);
            config = config.set_override("log.format", log_format.as_str())?;
        }
        if let Some(log_filter) = self.log_filter.take() {
            debug!("[config-override] 'log.filter' = {:?}", log_filter);
            config = config.set_override("log.filter", log_filter)?;
        }

        if let Some(path) = self.introspection_file_path.take() {
            debug!("[config-override] 'source.path' = {}", path);
            config = config.set_override("source.source", "file")?;
            config = config.set_override("source.path", path)?;
        }

        if let Some(focus_on) = self.focus_on.take() {
            debug!("[config-override] 'display.focus_on' = {}", focus_on);
            config = config.set_override("display.focus_on", focus_on)?;
        }
        if let Some(root_type) = self.root_type.take() {
            debug!("[config-override] 'display.root_type' = {}", root_type);
            config = config.set_override("display.root_type", root_type)?;
        }

        Ok(config)
    }
}
