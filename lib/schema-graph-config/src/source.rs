use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{primitives::file_path::FilePath, ConfigError};

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "source")]
pub enum SchemaSource {
    /// Loads the schema from the filesystem. A `.json` file holds an
    /// introspection result, anything else is read as SDL.
    /// The path is resolved relative to the config file.
    #[serde(rename = "file")]
    File { path: FilePath },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Introspection,
    Sdl,
}

impl SourceFormat {
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SourceFormat::Introspection,
            _ => SourceFormat::Sdl,
        }
    }
}

impl SchemaSource {
    pub fn format(&self) -> SourceFormat {
        match self {
            SchemaSource::File { path } => SourceFormat::from_extension(path.extension()),
        }
    }

    pub fn load(&self) -> Result<String, ConfigError> {
        match self {
            SchemaSource::File { path } => {
                debug!(path = %path, "reading schema source");
                std::fs::read_to_string(&path.absolute).map_err(|err| ConfigError::SourceRead {
                    path: path.to_string(),
                    source: err,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_format_by_extension() {
        let introspection = SchemaSource::File {
            path: "schema.JSON".into(),
        };
        let sdl = SchemaSource::File {
            path: "schema.graphql".into(),
        };

        assert_eq!(introspection.format(), SourceFormat::Introspection);
        assert_eq!(sdl.format(), SourceFormat::Sdl);
        assert_eq!(SourceFormat::from_extension(None), SourceFormat::Sdl);
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let source = SchemaSource::File {
            path: "does-not-exist.json".into(),
        };

        let err = source.load().unwrap_err();
        assert!(err.to_string().contains("does-not-exist.json"), "{err}");
    }
}
