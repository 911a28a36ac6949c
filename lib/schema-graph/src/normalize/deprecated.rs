use tracing::{debug, instrument};

use crate::schema::SchemaGraph;

/// Drops every deprecated field.
///
/// Types left without fields are kept: `@deprecated` is not applied
/// consistently enough to know that nothing else still points at them.
#[instrument(level = "debug", skip_all)]
pub fn remove_deprecated_fields(schema: &mut SchemaGraph) {
    let mut removed = 0;

    for idx in schema.type_indices().collect::<Vec<_>>() {
        if let Some(fields) = schema.ty_mut(idx).fields_mut() {
            let before = fields.len();
            fields.retain(|_, field| !field.is_deprecated);
            removed += before - fields.len();
        }
    }

    debug!(removed, "removed deprecated fields");
}
