//! Copy-on-write edits of a raw introspection document.
//!
//! Every operation deep-clones the input and returns the edited clone. Type
//! identifiers embed names, so renames and deletes finish with a global
//! reference rewrite; afterwards no reference names a type that is gone.

mod error;
mod intent;
mod rewrite;

use std::collections::HashSet;

use indexmap::IndexSet;
use tracing::{debug, instrument};

use crate::{
    enrich::{root_field, FAKE_ROOT_ID},
    ids,
    introspection::{
        IntrospectionDocument, IntrospectionField, IntrospectionSchema, IntrospectionType,
        TypeKind, TypeRef,
    },
};

pub use error::EditError;
pub use intent::{EditKind, FieldEdit, TypeEdit};
pub use rewrite::replace_type_references;

const NEW_TYPE_BASE_NAME: &str = "NewSetting";
const COPY_SUFFIX: &str = "_Copy";

fn is_editable(ty: &IntrospectionType) -> bool {
    matches!(ty.kind, TypeKind::Object | TypeKind::Union)
}

fn position_of(schema: &IntrospectionSchema, name: &str) -> Option<usize> {
    schema.types.iter().position(|ty| ty.name == name)
}

/// Kind to stamp on a reference to `name`; unknown names are assumed to be objects.
fn kind_for(schema: &IntrospectionSchema, name: &str) -> TypeKind {
    schema
        .types
        .iter()
        .find(|ty| ty.name == name)
        .map(|ty| ty.kind)
        .unwrap_or(TypeKind::Object)
}

fn build_type_ref(schema: &IntrospectionSchema, edit: &FieldEdit) -> TypeRef {
    TypeRef::from_wrappers(
        &edit.type_wrappers,
        kind_for(schema, &edit.type_name),
        edit.type_name.as_str(),
    )
}

fn new_field(schema: &IntrospectionSchema, edit: &FieldEdit) -> IntrospectionField {
    IntrospectionField {
        description: edit.description.clone(),
        ..IntrospectionField::new(edit.name.as_str(), build_type_ref(schema, edit))
    }
}

fn member_refs(members: &[String]) -> Vec<TypeRef> {
    members
        .iter()
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(|member| TypeRef::named(TypeKind::Object, member.as_str()))
        .collect()
}

/// Matches existing fields against the edit by current name: matched fields
/// keep their arguments and deprecation, unmatched ones are dropped, and
/// edit entries with no existing field are added. The result is ordered by
/// `original_position`.
fn reconcile_fields(
    schema: &IntrospectionSchema,
    existing: Vec<IntrospectionField>,
    edit: &TypeEdit,
) -> Vec<IntrospectionField> {
    let mut matched = IndexSet::new();
    let mut positioned = Vec::with_capacity(edit.fields.len());

    for mut field in existing {
        let Some(target) = edit.fields.get(&field.name) else {
            debug!(field = %field.name, "dropping field");
            continue;
        };

        matched.insert(field.name.clone());
        field.name = target.name.clone();
        field.description = target.description.clone();
        field.type_ref = build_type_ref(schema, target);
        positioned.push((target.original_position, field));
    }

    for (key, target) in &edit.fields {
        if !matched.contains(key) {
            debug!(field = %target.name, "adding field");
            positioned.push((target.original_position, new_field(schema, target)));
        }
    }

    positioned.sort_by_key(|(position, _)| *position);
    positioned.into_iter().map(|(_, field)| field).collect()
}

fn type_from_edit(schema: &IntrospectionSchema, edit: &TypeEdit) -> IntrospectionType {
    let mut ty = match edit.kind {
        EditKind::Object => {
            let mut fields = edit.fields.values().collect::<Vec<_>>();
            fields.sort_by_key(|field| field.original_position);
            IntrospectionType::object(
                edit.name.as_str(),
                fields.into_iter().map(|field| new_field(schema, field)).collect(),
            )
        }
        EditKind::Union => {
            IntrospectionType::union(edit.name.as_str(), member_refs(&edit.possible_types))
        }
    };
    ty.description = edit.description.clone();
    ty
}

/// Applies `edit` to the object or union identified by `type_id`, or creates
/// the type (plus a synthetic-root field exposing it) when there is none.
#[instrument(level = "debug", skip(document, edit), fields(name = %edit.name))]
pub fn edit_type(
    document: &IntrospectionDocument,
    type_id: &str,
    edit: &TypeEdit,
) -> Result<IntrospectionDocument, EditError> {
    let mut copy = document.clone();
    let Some(current_name) = ids::type_name_from_type_id(type_id) else {
        debug!(type_id, "not a type identifier, nothing to do");
        return Ok(copy);
    };

    let schema = copy.schema_mut();
    let existing = schema
        .types
        .iter()
        .position(|ty| ty.name == current_name && is_editable(ty));

    let name_taken = |schema: &IntrospectionSchema| {
        schema
            .types
            .iter()
            .enumerate()
            .any(|(position, ty)| ty.name == edit.name && Some(position) != existing)
    };
    if name_taken(schema) {
        return Err(EditError::TypeNameTaken(
            current_name.to_string(),
            edit.name.clone(),
        ));
    }

    match existing {
        Some(position) => {
            match schema.types[position].kind {
                TypeKind::Union => {
                    schema.types[position].possible_types = Some(member_refs(&edit.possible_types));
                }
                _ => {
                    let fields = schema.types[position].fields.take().unwrap_or_default();
                    let fields = reconcile_fields(schema, fields, edit);
                    schema.types[position].fields = Some(fields);
                }
            }

            let ty = &mut schema.types[position];
            ty.name = edit.name.clone();
            ty.description = edit.description.clone();

            if current_name != edit.name {
                replace_type_references(schema, current_name, &edit.name, None);
            }
        }
        None => {
            let ty = type_from_edit(schema, edit);

            match schema.types.iter_mut().find(|root| root.name == FAKE_ROOT_ID) {
                Some(root) => {
                    let fields = root.fields.get_or_insert_with(Vec::new);
                    let mut taken: HashSet<String> = fields.iter().map(|field| field.name.clone()).collect();
                    fields.push(root_field(&ty, &mut taken));
                }
                None => debug!("document has no synthetic root, not exposing the new type"),
            }
            schema.types.push(ty);
        }
    }

    Ok(copy)
}

/// Renames the object or union `from` to `to`, keeping everything else.
pub fn rename_type(
    document: &IntrospectionDocument,
    from: &str,
    to: &str,
) -> Result<IntrospectionDocument, EditError> {
    let edit = document
        .find_type(from)
        .filter(|ty| is_editable(ty))
        .and_then(TypeEdit::from_type)
        .ok_or_else(|| EditError::UnknownType(from.to_string()))?;

    edit_type(document, &ids::type_id(from), &edit.renamed(to))
}

/// Removes the type identified by `type_id`. Fields and arguments typed at it
/// are retargeted to the first other scalar of the document, keeping their
/// wrappers; union and interface memberships naming it are dropped.
#[instrument(level = "debug", skip(document))]
pub fn delete_type(
    document: &IntrospectionDocument,
    type_id: &str,
) -> Result<IntrospectionDocument, EditError> {
    let mut copy = document.clone();
    let Some(name) = ids::type_name_from_type_id(type_id) else {
        debug!(type_id, "not a type identifier, nothing to delete");
        return Ok(copy);
    };

    let schema = copy.schema_mut();
    if name == FAKE_ROOT_ID || name == schema.query_type.name {
        return Err(EditError::CannotDeleteRoot);
    }

    let Some(position) = position_of(schema, name) else {
        debug!(name, "type not found, nothing to delete");
        return Ok(copy);
    };

    let fallback = schema
        .types
        .iter()
        .find(|ty| ty.kind == TypeKind::Scalar && ty.name != name)
        .map(|ty| ty.name.clone())
        .ok_or_else(|| EditError::NoFallbackScalar(name.to_string()))?;

    schema.types.remove(position);

    for ty in &mut schema.types {
        for relations in [&mut ty.interfaces, &mut ty.possible_types] {
            if let Some(relations) = relations {
                relations.retain(|relation| relation.named_type_name() != Some(name));
            }
        }
    }

    for root in [&mut schema.mutation_type, &mut schema.subscription_type] {
        if root.as_ref().is_some_and(|root| root.name == name) {
            *root = None;
        }
    }

    replace_type_references(schema, name, &fallback, Some(TypeKind::Scalar));

    Ok(copy)
}

/// Replaces the members of the union identified by `type_id`.
#[instrument(level = "debug", skip(document))]
pub fn edit_union_members(
    document: &IntrospectionDocument,
    type_id: &str,
    members: &[String],
) -> Result<IntrospectionDocument, EditError> {
    let mut copy = document.clone();
    let Some(name) = ids::type_name_from_type_id(type_id) else {
        debug!(type_id, "not a type identifier, nothing to do");
        return Ok(copy);
    };

    match copy
        .schema_mut()
        .types
        .iter_mut()
        .find(|ty| ty.name == name && ty.kind == TypeKind::Union)
    {
        Some(union) => union.possible_types = Some(member_refs(members)),
        None => debug!(name, "union not found, nothing to edit"),
    }

    Ok(copy)
}

/// First free name of the form `<base><n>`, counting from 1.
pub fn unique_type_name(document: &IntrospectionDocument, base: &str) -> String {
    (1..)
        .map(|counter| format!("{base}{counter}"))
        .find(|candidate| document.find_type(candidate).is_none())
        .unwrap_or_else(|| base.to_string())
}

/// Adds a `NewSetting<n>` object with an `id: String!` field.
/// Returns the edited document and the new type's identifier.
pub fn add_new_type(
    document: &IntrospectionDocument,
) -> Result<(IntrospectionDocument, String), EditError> {
    let name = unique_type_name(document, NEW_TYPE_BASE_NAME);
    let type_id = ids::type_id(&name);
    let edited = edit_type(document, &type_id, &TypeEdit::new_object(name))?;

    Ok((edited, type_id))
}

/// Copies the object identified by `type_id` under a fresh `<Name>_Copy<n>`
/// name. Arguments and deprecation of the copied fields are not carried over.
/// Returns `None` when there is no such object.
pub fn clone_type(
    document: &IntrospectionDocument,
    type_id: &str,
) -> Result<Option<(IntrospectionDocument, String)>, EditError> {
    let Some(source) = ids::type_name_from_type_id(type_id)
        .and_then(|name| document.find_type(name))
        .filter(|ty| ty.kind == TypeKind::Object)
    else {
        debug!(type_id, "no object to clone");
        return Ok(None);
    };

    let name = unique_type_name(document, &format!("{}{}", source.name, COPY_SUFFIX));
    let new_id = ids::type_id(&name);
    let edit = TypeEdit::from_type(source)
        .map(|edit| edit.renamed(name))
        .ok_or_else(|| EditError::UnknownType(source.name.clone()))?;

    let edited = edit_type(document, &new_id, &edit)?;
    Ok(Some((edited, new_id)))
}
