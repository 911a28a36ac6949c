use std::path::PathBuf;
use std::sync::Once;

use lazy_static::lazy_static;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::introspection::{
    IntrospectionData, IntrospectionDocument, IntrospectionEnumValue, IntrospectionField,
    IntrospectionInputValue, IntrospectionSchema, IntrospectionType, NamedTypeRef, TypeKind,
    TypeRef, TypeWrapper,
};

fn init_test_logger_internal() {
    let tree_layer = tracing_tree::HierarchicalLayer::new(2)
        .with_bracketed_fields(true)
        .with_deferred_spans(false)
        .with_wraparound(25)
        .with_indent_lines(true)
        .with_timer(tracing_tree::time::Uptime::default())
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_targets(false);

    tracing_subscriber::registry()
        .with(tree_layer)
        .with(EnvFilter::from_default_env())
        .init();
}

lazy_static! {
    static ref TRACING_INIT: Once = Once::new();
}

pub fn init_logger() {
    TRACING_INIT.call_once(|| {
        init_test_logger_internal();
    });
}

pub fn read_introspection(fixture_path: &str) -> IntrospectionDocument {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(fixture_path);
    let json = std::fs::read_to_string(path).expect("Unable to read fixture file");

    IntrospectionDocument::from_json(&json).expect("failed to parse introspection fixture")
}

/// `Query { pets: [Pet], pet(id: ID!): Pet, search: [SearchResult] }`, `Pet`, `Owner`,
/// `union SearchResult = Pet | Owner`, `enum PetKind` and the `ID`/`String` scalars.
pub fn pets_introspection() -> IntrospectionDocument {
    read_introspection("fixture/pets.introspection.json")
}

pub fn doc(query: &str, types: Vec<IntrospectionType>) -> IntrospectionDocument {
    IntrospectionDocument {
        data: IntrospectionData {
            schema: IntrospectionSchema {
                query_type: NamedTypeRef::new(query),
                mutation_type: None,
                subscription_type: None,
                types,
                directives: vec![],
            },
        },
    }
}

pub fn named(kind: TypeKind, name: &str) -> TypeRef {
    TypeRef::named(kind, name)
}

pub fn wrapped(wrappers: &[TypeWrapper], kind: TypeKind, name: &str) -> TypeRef {
    TypeRef::from_wrappers(wrappers, kind, name)
}

pub fn field(name: &str, type_ref: TypeRef) -> IntrospectionField {
    IntrospectionField::new(name, type_ref)
}

pub fn field_with_args(
    name: &str,
    type_ref: TypeRef,
    args: Vec<IntrospectionInputValue>,
) -> IntrospectionField {
    IntrospectionField {
        args,
        ..IntrospectionField::new(name, type_ref)
    }
}

pub fn deprecated_field(name: &str, type_ref: TypeRef) -> IntrospectionField {
    IntrospectionField {
        is_deprecated: true,
        deprecation_reason: Some("no longer supported".into()),
        ..IntrospectionField::new(name, type_ref)
    }
}

pub fn arg(name: &str, type_ref: TypeRef) -> IntrospectionInputValue {
    IntrospectionInputValue {
        name: name.into(),
        description: None,
        type_ref,
        default_value: None,
    }
}

pub fn object(name: &str, fields: Vec<IntrospectionField>) -> IntrospectionType {
    IntrospectionType::object(name, fields)
}

pub fn object_implementing(
    name: &str,
    interfaces: &[&str],
    fields: Vec<IntrospectionField>,
) -> IntrospectionType {
    IntrospectionType {
        interfaces: Some(
            interfaces
                .iter()
                .map(|i| named(TypeKind::Interface, i))
                .collect(),
        ),
        ..IntrospectionType::object(name, fields)
    }
}

pub fn interface(
    name: &str,
    fields: Vec<IntrospectionField>,
    implementations: &[&str],
) -> IntrospectionType {
    IntrospectionType {
        kind: TypeKind::Interface,
        interfaces: Some(vec![]),
        possible_types: Some(
            implementations
                .iter()
                .map(|i| named(TypeKind::Object, i))
                .collect(),
        ),
        ..IntrospectionType::object(name, fields)
    }
}

pub fn union(name: &str, members: &[&str]) -> IntrospectionType {
    IntrospectionType::union(
        name,
        members.iter().map(|m| named(TypeKind::Object, m)).collect(),
    )
}

pub fn enum_type(name: &str, values: &[(&str, Option<&str>)]) -> IntrospectionType {
    IntrospectionType {
        kind: TypeKind::Enum,
        enum_values: Some(
            values
                .iter()
                .map(|(value, description)| IntrospectionEnumValue {
                    name: value.to_string(),
                    description: description.map(str::to_string),
                    is_deprecated: false,
                    deprecation_reason: None,
                })
                .collect(),
        ),
        ..IntrospectionType::scalar(name)
    }
}

pub fn scalar(name: &str) -> IntrospectionType {
    IntrospectionType::scalar(name)
}

/// A Relay-style schema: `Query.users` and `User.friends` are `UserConnection`s
/// over `UserEdge.node: User`, `Query.node` exposes the `Node` interface.
pub fn relay_introspection() -> IntrospectionDocument {
    use TypeKind::{Interface, Object, Scalar};
    use TypeWrapper::{List, NonNull};

    let pagination = || {
        vec![
            arg("first", named(Scalar, "Int")),
            arg("after", named(Scalar, "String")),
            arg("last", named(Scalar, "Int")),
            arg("before", named(Scalar, "String")),
        ]
    };

    let mut users_args = pagination();
    users_args.push(arg("role", named(Scalar, "String")));

    doc(
        "Query",
        vec![
            object(
                "Query",
                vec![
                    field_with_args(
                        "node",
                        named(Interface, "Node"),
                        vec![arg("id", wrapped(&[NonNull], Scalar, "ID"))],
                    ),
                    field_with_args("users", named(Object, "UserConnection"), users_args),
                    field("viewer", named(Object, "User")),
                ],
            ),
            interface(
                "Node",
                vec![field("id", wrapped(&[NonNull], Scalar, "ID"))],
                &["User"],
            ),
            object_implementing(
                "User",
                &["Node"],
                vec![
                    field("id", wrapped(&[NonNull], Scalar, "ID")),
                    field("name", named(Scalar, "String")),
                    field_with_args(
                        "friends",
                        wrapped(&[NonNull], Object, "UserConnection"),
                        pagination(),
                    ),
                    field("bestFriendEdge", named(Object, "UserEdge")),
                ],
            ),
            object(
                "UserConnection",
                vec![
                    field("edges", wrapped(&[List], Object, "UserEdge")),
                    field("pageInfo", wrapped(&[NonNull], Object, "PageInfo")),
                    field("totalCount", named(Scalar, "Int")),
                ],
            ),
            object(
                "UserEdge",
                vec![
                    field("node", named(Object, "User")),
                    field("cursor", wrapped(&[NonNull], Scalar, "String")),
                ],
            ),
            object(
                "PageInfo",
                vec![
                    field("hasNextPage", wrapped(&[NonNull], Scalar, "Boolean")),
                    field("endCursor", named(Scalar, "String")),
                ],
            ),
            scalar("ID"),
            scalar("String"),
            scalar("Int"),
            scalar("Boolean"),
        ],
    )
}
