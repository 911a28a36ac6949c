use serde::{Deserialize, Serialize};

/// Presentation switches shared by the type graph and the diagram generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayOptions {
    /// Type to anchor the graph on instead of the query type.
    pub root_type: Option<String>,
    pub skip_relay: bool,
    pub skip_deprecated: bool,
    pub sort_by_alphabet: bool,
    pub show_leaf_fields: bool,
    /// Leaves the selected root (`root_type` or the synthetic root) out of the listing.
    pub hide_root: bool,
    /// Restricts field rows to types reachable from this one.
    pub focus_on: Option<String>,
    /// When off, only types with an `id` field list their fields.
    pub show_subattributes: bool,
}

impl Default for DisplayOptions {
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
