use pretty_assertions::assert_eq;

use crate::{
    dot::render_dot,
    editing::delete_type,
    enrich::FAKE_ROOT_ID,
    introspection::{IntrospectionDocument, TypeKind, TypeWrapper},
    pipeline::{build_schema, SchemaOptions},
    tests::testkit::{deprecated_field, doc, field, init_logger, named, object, scalar, wrapped},
    type_graph::{DisplayOptions, TypeGraph},
};

/// `type Query { pets: [Pet] }`, `type Pet { id: ID!, name: String }`.
fn pets_only(scalars: &[&str]) -> IntrospectionDocument {
    use TypeKind::*;

    let mut types = vec![
        object("Query", vec![field("pets", wrapped(&[TypeWrapper::List], Object, "Pet"))]),
        object(
            "Pet",
            vec![
                field("id", wrapped(&[TypeWrapper::NonNull], Scalar, "ID")),
                field("name", named(Scalar, "String")),
            ],
        ),
    ];
    types.extend(scalars.iter().map(|name| scalar(name)));

    doc("Query", types)
}

#[test]
fn enriched_root_exposes_the_original_query() {
    init_logger();

    let schema = build_schema(&pets_only(&["ID", "String"]), &SchemaOptions::default()).unwrap();
    let graph = TypeGraph::new(&schema, &DisplayOptions::default());

    assert_eq!(graph.root_id(), format!("TYPE::{FAKE_ROOT_ID}"));

    let query_field = graph.root_type().field("query").unwrap();
    let query = schema.ty(query_field.ty);
    assert_eq!(query.name, "Query");

    let pets = query.field("pets").unwrap();
    assert_eq!(schema.ty(pets.ty).name, "Pet");
    assert_eq!(pets.type_wrappers, vec![TypeWrapper::List]);

    insta::assert_snapshot!(graph.to_string(), @r"
    root: TYPE::FAKE_ROOT_INTERNAL___
    OBJECT FAKE_ROOT_INTERNAL___ (root)
      query: Query
      pet: Pet
    OBJECT Query
      pets: [Pet]
    OBJECT Pet
      id: ID!
      name: String
    ");
}

#[test]
fn root_diagram_links_to_the_original_query() {
    let schema = build_schema(&pets_only(&["ID", "String"]), &SchemaOptions::default()).unwrap();
    let dot = render_dot(&TypeGraph::new(&schema, &DisplayOptions::default()));

    assert!(dot.starts_with("digraph {"));
    insta::assert_snapshot!(
        dot.lines()
            .skip_while(|line| !line.contains("-> \"Query\""))
            .take(4)
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n"),
        @r#"
    "FAKE_ROOT_INTERNAL___":"query" -> "Query" [
    id = "FIELD::FAKE_ROOT_INTERNAL___::query => TYPE::Query"
    label = "FAKE_ROOT_INTERNAL___:query"
    ]
    "#
    );
    assert!(dot.contains("  \"Query\":\"pets\" -> \"Pet\" [\n"));
}

#[test]
fn deleted_type_becomes_first_scalar_inside_its_wrappers() {
    init_logger();

    let document = pets_only(&["String", "ID"]);
    let edited = delete_type(&document, "TYPE::Pet").unwrap();

    let pets = &edited.find_type("Query").unwrap().fields.as_ref().unwrap()[0];
    assert_eq!(pets.type_ref, wrapped(&[TypeWrapper::List], TypeKind::Scalar, "String"));
    assert_eq!(pets.type_ref.to_string(), "[String]");
    assert!(document.find_type("Pet").is_some());

    let schema = build_schema(&edited, &SchemaOptions::default()).unwrap();
    let graph = TypeGraph::new(&schema, &DisplayOptions::default());
    insta::assert_snapshot!(graph.to_string(), @r"
    root: TYPE::FAKE_ROOT_INTERNAL___
    OBJECT FAKE_ROOT_INTERNAL___ (root)
      query: Query
    OBJECT Query
      pets: [String]
    ");
}

#[test]
fn deprecated_fields_disappear_but_their_types_stay() {
    use TypeKind::*;

    let document = doc(
        "Query",
        vec![
            object(
                "Query",
                vec![
                    field("pets", wrapped(&[TypeWrapper::List], Object, "Pet")),
                    field("ghost", named(Object, "Ghost")),
                ],
            ),
            object(
                "Pet",
                vec![
                    field("id", wrapped(&[TypeWrapper::NonNull], Scalar, "ID")),
                    deprecated_field("legacyTag", named(Scalar, "String")),
                    field("name", named(Scalar, "String")),
                ],
            ),
            object("Ghost", vec![deprecated_field("haunts", named(Object, "Pet"))]),
            scalar("ID"),
            scalar("String"),
        ],
    );

    let folded = build_schema(&document, &SchemaOptions::default()).unwrap();
    let pet = folded.type_by_name("Pet").unwrap();
    let ghost = folded.type_by_name("Ghost").unwrap();

    assert_eq!(pet.fields().unwrap().keys().collect::<Vec<_>>(), vec!["id", "name"]);
    assert!(ghost.fields().unwrap().is_empty());

    let kept = build_schema(
        &document,
        &SchemaOptions {
            skip_deprecated: false,
            ..SchemaOptions::default()
        },
    )
    .unwrap();
    assert!(kept.type_by_name("Pet").unwrap().has_field("legacyTag"));
    assert!(kept.type_by_name("Ghost").unwrap().has_field("haunts"));
}
