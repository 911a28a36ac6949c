use tracing::instrument;

use crate::{
    enrich::enrich_introspection,
    error::SchemaError,
    introspection::IntrospectionDocument,
    normalize::{fold_relay_types, remove_deprecated_fields},
    schema::{assign_types_and_ids, SchemaGraph},
    simplified::simplify_schema,
    type_graph::DisplayOptions,
};

/// Which optional normalization passes [`build_schema`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaOptions {
    pub skip_relay: bool,
    pub skip_deprecated: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            skip_relay: true,
            skip_deprecated: true,
        }
    }
}

impl From<&DisplayOptions> for SchemaOptions {
    fn from(options: &DisplayOptions) -> Self {
        Self {
            skip_relay: options.skip_relay,
            skip_deprecated: options.skip_deprecated,
        }
    }
}

/// Enriches, simplifies and resolves `document`, then applies the enabled folds.
#[instrument(level = "debug", skip_all, fields(
    types = document.schema().types.len(),
    skip_relay = options.skip_relay,
    skip_deprecated = options.skip_deprecated,
))]
pub fn build_schema(
    document: &IntrospectionDocument,
    options: &SchemaOptions,
) -> Result<SchemaGraph, SchemaError> {
    let enriched = enrich_introspection(document);
    let simplified = simplify_schema(enriched.schema())?;
    let mut schema = assign_types_and_ids(&simplified)?;

    if options.skip_relay {
        fold_relay_types(&mut schema);
    }
    if options.skip_deprecated {
        remove_deprecated_fields(&mut schema);
    }

    Ok(schema)
}
