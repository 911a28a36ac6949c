use schema_graph::DisplayOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the type graph is derived and drawn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Type to use as the diagram root instead of the query type.
    ///
    /// Can also be set via the `ROOT_TYPE` environment variable.
    #[serde(default)]
    pub root_type: Option<String>,

    /// Collapse Relay connections into plain lists.
    #[serde(default = "default_true")]
    pub skip_relay: bool,

    /// Drop deprecated fields.
    #[serde(default = "default_true")]
    pub skip_deprecated: bool,

    #[serde(default)]
    pub sort_by_alphabet: bool,

    /// Draw scalar and enum fields.
    #[serde(default = "default_true")]
    pub show_leaf_fields: bool,

    #[serde(default)]
    pub hide_root: bool,

    /// Only draw types reachable from this one.
    ///
    /// Can also be set via the `FOCUS_ON` environment variable.
    #[serde(default)]
    pub focus_on: Option<String>,

    /// When off, only types with an `id` field list their fields.
    #[serde(default = "default_true")]
    pub show_subattributes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            root_type: None,
            skip_relay: true,
            skip_deprecated: true,
            sort_by_alphabet: false,
            show_leaf_fields: true,
            hide_root: false,
            focus_on: None,
            show_subattributes: true,
        }
    }
}

impl From<&DisplayConfig> for DisplayOptions {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            root_type: config.root_type.clone(),
            skip_relay: config.skip_relay,
            skip_deprecated: config.skip_deprecated,
            sort_by_alphabet: config.sort_by_alphabet,
            show_leaf_fields: config.show_leaf_fields,
            hide_root: config.hide_root,
            focus_on: config.focus_on.clone(),
            show_subattributes: config.show_subattributes,
        }
    }
}
