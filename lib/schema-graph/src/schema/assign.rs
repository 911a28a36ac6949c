use indexmap::IndexMap;
use tracing::instrument;

use crate::{
    error::SchemaError,
    ids,
    schema::{
        SchemaField, SchemaGraph, SchemaInputValue, SchemaType, SchemaTypeKind, TypeIdx,
        TypeRelation,
    },
    simplified::{SimplifiedArgument, SimplifiedField, SimplifiedIntrospection, SimplifiedKind},
};

struct Resolver<'a> {
    simplified: &'a SimplifiedIntrospection,
}

impl Resolver<'_> {
    fn resolve(&self, name: &str) -> Result<TypeIdx, SchemaError> {
        self.simplified
            .types
            .get_index_of(name)
            .map(TypeIdx)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    fn resolve_root(&self, operation: &'static str, name: &str) -> Result<TypeIdx, SchemaError> {
        self.resolve(name)
            .map_err(|_| SchemaError::MissingRootType(operation, name.to_string()))
    }

    fn relations(
        &self,
        names: &[String],
        make_id: impl Fn(&str) -> String,
    ) -> Result<Vec<TypeRelation>, SchemaError> {
        names
            .iter()
            .map(|name| {
                Ok(TypeRelation {
                    id: make_id(name),
                    ty: self.resolve(name)?,
                })
            })
            .collect()
    }

    fn fields(
        &self,
        owner: &str,
        fields: &IndexMap<String, SimplifiedField>,
    ) -> Result<IndexMap<String, SchemaField>, SchemaError> {
        fields
            .iter()
            .map(|(key, field)| {
                let args: IndexMap<String, SchemaInputValue> = field
                    .args
                    .iter()
                    .map(|(arg_key, arg)| {
                        let id = ids::argument_id(owner, &field.name, &arg.name);
                        Ok((arg_key.clone(), self.input_value(id, arg)?))
                    })
                    .collect::<Result<_, SchemaError>>()?;

                let resolved = SchemaField {
                    id: ids::field_id(owner, &field.name),
                    name: field.name.clone(),
                    description: field.description.clone(),
                    ty: self.resolve(&field.type_name)?,
                    type_wrappers: field.type_wrappers.clone(),
                    is_deprecated: field.is_deprecated,
                    deprecation_reason: field.deprecation_reason.clone(),
                    args,
                    relay_type: None,
                    relay_args: IndexMap::new(),
                };

                Ok((key.clone(), resolved))
            })
            .collect()
    }

    fn input_value(&self, id: String, arg: &SimplifiedArgument) -> Result<SchemaInputValue, SchemaError> {
        Ok(SchemaInputValue {
            id,
            name: arg.name.clone(),
            description: arg.description.clone(),
            ty: self.resolve(&arg.type_name)?,
            type_wrappers: arg.type_wrappers.clone(),
            default_value: arg.default_value.clone(),
        })
    }
}

/// Attaches identifiers to every element and turns every type name into a
/// reference into the ID-keyed table.
#[instrument(level = "debug", skip_all, fields(types = simplified.types.len()))]
pub fn assign_types_and_ids(simplified: &SimplifiedIntrospection) -> Result<SchemaGraph, SchemaError> {
    let resolver = Resolver { simplified };

    let query_type = resolver.resolve_root("query", &simplified.query_type)?;
    let mutation_type = simplified
        .mutation_type
        .as_deref()
        .map(|name| resolver.resolve_root("mutation", name))
        .transpose()?;
    let subscription_type = simplified
        .subscription_type
        .as_deref()
        .map(|name| resolver.resolve_root("subscription", name))
        .transpose()?;

    let mut types = IndexMap::with_capacity(simplified.types.len());

    for ty in simplified.types.values() {
        let name = ty.name.as_str();
        let kind = match &ty.kind {
            SimplifiedKind::Object { interfaces, fields } => SchemaTypeKind::Object {
                interfaces: resolver.relations(interfaces, |base| ids::interface_id(name, base))?,
                fields: resolver.fields(name, fields)?,
            },
            SimplifiedKind::Interface {
                derived_types,
                fields,
            } => SchemaTypeKind::Interface {
                derived_types: resolver
                    .relations(derived_types, |derived| ids::derived_type_id(name, derived))?,
                fields: resolver.fields(name, fields)?,
            },
            SimplifiedKind::Union { possible_types } => SchemaTypeKind::Union {
                possible_types: resolver
                    .relations(possible_types, |member| ids::possible_type_id(name, member))?,
            },
            SimplifiedKind::Enum { enum_values } => SchemaTypeKind::Enum {
                enum_values: enum_values.clone(),
            },
            SimplifiedKind::InputObject { input_fields } => SchemaTypeKind::InputObject {
                input_fields: input_fields
                    .iter()
                    .map(|(key, input)| {
                        let id = ids::field_id(name, &input.name);
                        Ok((key.clone(), resolver.input_value(id, input)?))
                    })
                    .collect::<Result<_, SchemaError>>()?,
            },
            SimplifiedKind::Scalar => SchemaTypeKind::Scalar,
        };

        let id = ids::type_id(name);
        types.insert(
            id.clone(),
            SchemaType {
                id,
                name: ty.name.clone(),
                description: ty.description.clone(),
                kind,
                is_relay_type: false,
            },
        );
    }

    Ok(SchemaGraph::from_parts(
        types,
        query_type,
        mutation_type,
        subscription_type,
    ))
}
