use indexmap::{IndexMap, IndexSet};
use tracing::instrument;

use crate::{
    error::SchemaError,
    introspection::{
        IntrospectionField, IntrospectionInputValue, IntrospectionSchema, IntrospectionType,
        TypeKind, TypeRef, TypeWrapper,
    },
    simplified::{
        SimplifiedArgument, SimplifiedField, SimplifiedIntrospection, SimplifiedKind,
        SimplifiedType,
    },
};

#[instrument(level = "debug", skip(schema), fields(types = schema.types.len()))]
pub fn simplify_schema(schema: &IntrospectionSchema) -> Result<SimplifiedIntrospection, SchemaError> {
    let mut types = IndexMap::with_capacity(schema.types.len());

    for raw_type in &schema.types {
        let simplified = convert_type(raw_type)?;
        types.insert(simplified.name.clone(), simplified);
    }

    Ok(SimplifiedIntrospection {
        types,
        query_type: schema.query_type.name.clone(),
        mutation_type: schema.mutation_type.as_ref().map(|t| t.name.clone()),
        subscription_type: schema.subscription_type.as_ref().map(|t| t.name.clone()),
    })
}

fn convert_type(raw_type: &IntrospectionType) -> Result<SimplifiedType, SchemaError> {
    let owner = raw_type.name.as_str();
    let kind = match raw_type.kind {
        TypeKind::Object => SimplifiedKind::Object {
            interfaces: unique_names(raw_type.interfaces.as_deref()),
            fields: convert_fields(owner, raw_type.fields.as_deref())?,
        },
        TypeKind::Interface => SimplifiedKind::Interface {
            derived_types: unique_names(raw_type.possible_types.as_deref()),
            fields: convert_fields(owner, raw_type.fields.as_deref())?,
        },
        TypeKind::Union => SimplifiedKind::Union {
            possible_types: unique_names(raw_type.possible_types.as_deref()),
        },
        TypeKind::Enum => SimplifiedKind::Enum {
            enum_values: raw_type.enum_values.clone().unwrap_or_default(),
        },
        TypeKind::InputObject => SimplifiedKind::InputObject {
            input_fields: convert_args(owner, raw_type.input_fields.as_deref())?,
        },
        TypeKind::Scalar => SimplifiedKind::Scalar,
        TypeKind::List | TypeKind::NonNull => {
            return Err(SchemaError::UnexpectedWrapperKind(
                raw_type.name.clone(),
                raw_type.kind,
            ))
        }
    };

    Ok(SimplifiedType {
        name: raw_type.name.clone(),
        description: raw_type.description.clone(),
        kind,
    })
}

fn unique_names(refs: Option<&[TypeRef]>) -> Vec<String> {
    refs.unwrap_or_default()
        .iter()
        .filter_map(|r| r.name.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

fn unwrap_type(location: &str, type_ref: &TypeRef) -> Result<(String, Vec<TypeWrapper>), SchemaError> {
    let (wrappers, named) = type_ref.unwrap();
    match (&named.name, named.kind.is_wrapper()) {
        (Some(name), false) => Ok((name.clone(), wrappers)),
        _ => Err(SchemaError::MalformedTypeRef(location.to_string())),
    }
}

fn convert_fields(
    owner: &str,
    fields: Option<&[IntrospectionField]>,
) -> Result<IndexMap<String, SimplifiedField>, SchemaError> {
    fields
        .unwrap_or_default()
        .iter()
        .map(|field| {
            let location = format!("{}.{}", owner, field.name);
            let (type_name, type_wrappers) = unwrap_type(&location, &field.type_ref)?;
            let converted = SimplifiedField {
                name: field.name.clone(),
                description: field.description.clone(),
                type_name,
                type_wrappers,
                is_deprecated: field.is_deprecated,
                deprecation_reason: field
                    .is_deprecated
                    .then(|| field.deprecation_reason.clone())
                    .flatten(),
                args: convert_args(&location, Some(&field.args))?,
            };

            Ok((field.name.clone(), converted))
        })
        .collect()
}

fn convert_args(
    owner: &str,
    args: Option<&[IntrospectionInputValue]>,
) -> Result<IndexMap<String, SimplifiedArgument>, SchemaError> {
    args.unwrap_or_default()
        .iter()
        .map(|arg| {
            let (type_name, type_wrappers) =
                unwrap_type(&format!("{}({})", owner, arg.name), &arg.type_ref)?;
            let converted = SimplifiedArgument {
                name: arg.name.clone(),
                description: arg.description.clone(),
                type_name,
                type_wrappers,
                default_value: arg.default_value.clone(),
            };

            Ok((arg.name.clone(), converted))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{introspection::IntrospectionDocument, tests::testkit::pets_introspection};
    use pretty_assertions::assert_eq;

    #[test]
    fn flattens_wrappers_and_keys_by_name() {
        let doc = pets_introspection();
        let simplified = simplify_schema(doc.schema()).unwrap();

        assert_eq!(simplified.query_type, "Query");
        assert_eq!(simplified.mutation_type, None);

        let query_fields = simplified.types["Query"].kind.fields().unwrap();
        let pets = &query_fields["pets"];
        assert_eq!(pets.type_name, "Pet");
        assert_eq!(pets.type_wrappers, vec![TypeWrapper::List]);

        let pet_fields = simplified.types["Pet"].kind.fields().unwrap();
        assert_eq!(pet_fields["id"].type_wrappers, vec![TypeWrapper::NonNull]);
        assert_eq!(pet_fields["id"].type_name, "ID");
        assert_eq!(
            pet_fields.keys().collect::<Vec<_>>(),
            vec!["id", "name", "owner", "kind"]
        );
    }

    #[test]
    fn keeps_only_kind_specific_collections() {
        let doc = IntrospectionDocument::from_json(
            r#"{
              "data": {
                "__schema": {
                  "queryType": { "name": "Query" },
                  "types": [
                    { "kind": "OBJECT", "name": "Query", "interfaces": [{ "kind": "INTERFACE", "name": "Node" }, { "kind": "INTERFACE", "name": "Node" }],
                      "fields": [{ "name": "search", "type": { "kind": "UNION", "name": "Result" },
                                   "args": [{ "name": "term", "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "String" } }, "defaultValue": "\"x\"" }] }] },
                    { "kind": "INTERFACE", "name": "Node", "fields": [], "possibleTypes": [{ "kind": "OBJECT", "name": "Query" }] },
                    { "kind": "UNION", "name": "Result", "possibleTypes": [{ "kind": "OBJECT", "name": "Query" }] },
                    { "kind": "INPUT_OBJECT", "name": "Filter", "inputFields": [{ "name": "limit", "type": { "kind": "SCALAR", "name": "Int" } }] },
                    { "kind": "ENUM", "name": "Color", "enumValues": [{ "name": "RED" }] },
                    { "kind": "SCALAR", "name": "String" }
                  ]
                }
              }
            }"#,
        )
        .unwrap();

        let simplified = simplify_schema(doc.schema()).unwrap();

        match &simplified.types["Query"].kind {
            SimplifiedKind::Object { interfaces, fields } => {
                assert_eq!(interfaces, &vec!["Node".to_string()]);
                let term = &fields["search"].args["term"];
                assert_eq!(term.type_wrappers, vec![TypeWrapper::NonNull]);
                assert_eq!(term.default_value.as_deref(), Some("\"x\""));
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert!(matches!(
            &simplified.types["Node"].kind,
            SimplifiedKind::Interface { derived_types, .. } if derived_types == &vec!["Query".to_string()]
        ));
        assert!(matches!(
            &simplified.types["Result"].kind,
            SimplifiedKind::Union { possible_types } if possible_types.len() == 1
        ));
        assert!(matches!(
            &simplified.types["Filter"].kind,
            SimplifiedKind::InputObject { input_fields } if input_fields["limit"].type_name == "Int"
        ));
        assert!(matches!(
            &simplified.types["Color"].kind,
            SimplifiedKind::Enum { enum_values } if enum_values[0].name == "RED"
        ));
        assert_eq!(simplified.types["String"].kind, SimplifiedKind::Scalar);
    }

    #[test]
    fn deprecation_reason_only_kept_for_deprecated_fields() {
        let doc = pets_introspection();
        let simplified = simplify_schema(doc.schema()).unwrap();
        let fields = simplified.types["Pet"].kind.fields().unwrap();

        assert!(fields.values().all(|f| f.deprecation_reason.is_none()));
    }

    #[test]
    fn wrapper_kind_declared_as_named_type_is_rejected() {
        let doc = IntrospectionDocument::from_json(
            r#"{ "data": { "__schema": { "queryType": { "name": "Q" },
                 "types": [{ "kind": "LIST", "name": "Q" }] } } }"#,
        )
        .unwrap();

        assert!(matches!(
            simplify_schema(doc.schema()),
            Err(SchemaError::UnexpectedWrapperKind(name, TypeKind::List)) if name == "Q"
        ));
    }
}
