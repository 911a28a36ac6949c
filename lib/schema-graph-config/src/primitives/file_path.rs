use std::{
    cell::RefCell,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use schemars::{json_schema, JsonSchema};
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

/// A path written in a config file, resolved against the directory of that file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePath {
    pub relative: String,
    pub absolute: PathBuf,
}

// Deserialization has no way to receive the config directory, so it travels
// through a thread-local set for the duration of one `with_start_path` call.
thread_local!(static CONTEXT_START_PATH: RefCell<Option<PathBuf>> = const { RefCell::new(None) });

pub fn with_start_path<F, T>(start_path: &Path, f: F) -> T
where
    F: FnOnce() -> T,
{
    CONTEXT_START_PATH.with(|ctx| {
        *ctx.borrow_mut() = Some(start_path.to_path_buf());
    });

    let result = f();

    CONTEXT_START_PATH.with(|ctx| {
        *ctx.borrow_mut() = None;
    });

    result
}

impl FilePath {
    /// Resolves `relative_path` against `base_path`. With `canonicalize`, the
    /// file has to exist.
    pub fn resolve(base_path: &Path, relative_path: &str, canonicalize: bool) -> io::Result<Self> {
        let joined = base_path.join(relative_path);
        let absolute = if canonicalize {
            fs::canonicalize(joined)?
        } else {
            joined
        };

        Ok(FilePath {
            relative: relative_path.to_string(),
            absolute,
        })
    }

    pub fn extension(&self) -> Option<&str> {
        self.absolute.extension().and_then(|ext| ext.to_str())
    }
}

impl From<&str> for FilePath {
    fn from(path: &str) -> Self {
        FilePath {
            relative: path.to_string(),
            absolute: PathBuf::from(path),
        }
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.absolute.display())
    }
}

impl Serialize for FilePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.relative)
    }
}

impl JsonSchema for FilePath {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        "FilePath".into()
    }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        json_schema!({
            "type": "string",
            "format": "path"
        })
    }

    fn inline_schema() -> bool {
        true
    }
}

struct FilePathVisitor;

impl Visitor<'_> for FilePathVisitor {
    type Value = FilePath;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a path, absolute or relative to the config file")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        CONTEXT_START_PATH.with(|ctx| match ctx.borrow().as_ref() {
            Some(start_path) => FilePath::resolve(start_path, v, true)
                .map_err(|err| E::custom(format!("Failed to resolve path '{}': {}", v, err))),
            None => Err(E::custom("FilePath deserialization context (start_path) is not set")),
        })
    }
}

impl<'de> Deserialize<'de> for FilePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(FilePathVisitor)
    }
}
