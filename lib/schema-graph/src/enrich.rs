//! Synthetic root injection.
//!
//! Every document handed to the rest of the pipeline has a query type named
//! [`FAKE_ROOT_ID`] exposing one field per top-level object or union, so
//! adding a type is always "add a field to the root".

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::introspection::{
    IntrospectionDocument, IntrospectionField, IntrospectionSchema, IntrospectionType, TypeKind,
    TypeRef,
};

pub const FAKE_ROOT_ID: &str = "FAKE_ROOT_INTERNAL___";

/// Root descriptions written by earlier versions started with this text.
const LEGACY_ROOT_DESCRIPTION_PREFIX: &str = "This is a hidden";

pub fn is_root_candidate(ty: &IntrospectionType) -> bool {
    matches!(ty.kind, TypeKind::Object | TypeKind::Union)
        && !ty.is_introspection_type()
        && ty.name != FAKE_ROOT_ID
}

/// Name of the root field exposing `type_name`: the lowercased type name, with
/// the first free counter from 2 appended when that name is in `taken`.
pub fn root_field_name(type_name: &str, taken: &HashSet<String>) -> String {
    let base = type_name.to_lowercase();
    if !taken.contains(&base) {
        return base;
    }

    (2..)
        .map(|counter| format!("{base}{counter}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

/// Root field exposing `ty` under a name not yet in `taken`; records that name.
pub fn root_field(ty: &IntrospectionType, taken: &mut HashSet<String>) -> IntrospectionField {
    let name = root_field_name(&ty.name, taken);
    taken.insert(name.clone());
    IntrospectionField::new(name, TypeRef::named(ty.kind, &ty.name))
}

fn root_fields(schema: &IntrospectionSchema) -> Vec<IntrospectionField> {
    let mut taken = HashSet::new();
    schema
        .types
        .iter()
        .filter(|ty| is_root_candidate(ty))
        .map(|ty| root_field(ty, &mut taken))
        .collect()
}

/// Returns a copy of `document` whose query type is the synthetic root.
///
/// Running it on an already enriched document only recomputes the root's
/// field list, so it can be re-applied after every edit.
#[instrument(level = "debug", skip_all, fields(query_type = %document.schema().query_type.name))]
pub fn enrich_introspection(document: &IntrospectionDocument) -> IntrospectionDocument {
    let mut copy = document.clone();
    let fields = root_fields(copy.schema());
    let root_count = fields.len();

    let schema = copy.schema_mut();
    let previous_root = std::mem::replace(&mut schema.query_type.name, FAKE_ROOT_ID.to_string());
    let already_enriched = previous_root == FAKE_ROOT_ID;

    match schema.types.iter_mut().find(|ty| ty.name == FAKE_ROOT_ID) {
        Some(root) => {
            root.fields = Some(fields);
            if !already_enriched {
                root.description = Some(previous_root);
            }
        }
        None => {
            let mut root = IntrospectionType::object(FAKE_ROOT_ID, fields);
            root.description = (!already_enriched).then_some(previous_root);
            schema.types.push(root);
        }
    }

    migrate_legacy_root_description(schema);

    debug!(root_fields = root_count, already_enriched, "synthetic root ready");

    copy
}

/// Documents persisted by an earlier version carry a marker text as the root
/// description instead of the original root name. Replaces it with the name
/// of the second declared type, which is where that version put the original root.
pub fn migrate_legacy_root_description(schema: &mut IntrospectionSchema) {
    let replacement = schema.types.get(1).map(|ty| ty.name.clone());

    if let Some(root) = schema.types.iter_mut().find(|ty| ty.name == FAKE_ROOT_ID) {
        let is_legacy = root
            .description
            .as_deref()
            .is_some_and(|description| description.starts_with(LEGACY_ROOT_DESCRIPTION_PREFIX));

        if is_legacy {
            debug!(description = ?replacement, "migrating legacy root description");
            root.description = replacement;
        }
    }
}
