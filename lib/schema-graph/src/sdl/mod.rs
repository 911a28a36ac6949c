//! SDL round-trip for introspection documents.
//!
//! Edited schemas are persisted as SDL text and turned back into an
//! introspection document when loaded.

mod error;
mod printer;

use std::collections::{HashMap, HashSet};

use graphql_parser::schema::{
    self as ast, Definition, SchemaDefinition, TypeDefinition, Value,
};
use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use crate::introspection::{
    IntrospectionData, IntrospectionDocument, IntrospectionEnumValue, IntrospectionField,
    IntrospectionInputValue, IntrospectionSchema, IntrospectionType, NamedTypeRef, TypeKind,
    TypeRef, TypeWrapper,
};

pub use error::SdlError;
pub use printer::SchemaPrinter;

pub const BUILT_IN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Present in every built document, referenced or not.
const ALWAYS_PRESENT_SCALARS: [&str; 2] = ["String", "Boolean"];

const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Starting point for a brand-new model.
pub const EMPTY_MODEL_SDL: &str = "schema { query: root } type root { value: String }";

pub fn print_schema(document: &IntrospectionDocument) -> String {
    SchemaPrinter::new(document).to_string()
}

pub fn empty_model() -> Result<IntrospectionDocument, SdlError> {
    introspection_from_sdl(EMPTY_MODEL_SDL)
}

#[instrument(level = "debug", skip_all, fields(len = sdl.len()))]
pub fn introspection_from_sdl(sdl: &str) -> Result<IntrospectionDocument, SdlError> {
    let document =
        ast::parse_schema::<String>(sdl).map_err(|err| SdlError::Parse(err.to_string()))?;

    let document = SdlConverter::new(&document).convert(&document)?;
    debug!(types = document.schema().types.len(), "built introspection from SDL");

    Ok(document)
}

struct SdlConverter {
    kinds: HashMap<String, TypeKind>,
    defined: HashSet<String>,
    referenced: HashSet<String>,
}

impl SdlConverter {
    fn new(document: &ast::Document<'_, String>) -> Self {
        let mut kinds: HashMap<String, TypeKind> = document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                Definition::TypeDefinition(ty) => Some(definition_name_and_kind(ty)),
                _ => None,
            })
            .map(|(name, kind)| (name.to_string(), kind))
            .collect();
        let defined = kinds.keys().cloned().collect();

        for scalar in BUILT_IN_SCALARS {
            kinds.entry(scalar.to_string()).or_insert(TypeKind::Scalar);
        }

        Self {
            kinds,
            defined,
            referenced: HashSet::new(),
        }
    }

    fn convert(
        mut self,
        document: &ast::Document<'_, String>,
    ) -> Result<IntrospectionDocument, SdlError> {
        let mut schema_definition = None;
        let mut types = Vec::new();

        for definition in &document.definitions {
            match definition {
                Definition::SchemaDefinition(schema) => schema_definition = Some(schema),
                Definition::TypeDefinition(ty) => {
                    if let Some(ty) = self.convert_type(ty)? {
                        types.push(ty);
                    }
                }
                Definition::TypeExtension(_) => {
                    warn!("type extensions are not supported, ignoring one");
                }
                Definition::DirectiveDefinition(directive) => {
                    debug!(directive = %directive.name, "skipping directive definition");
                }
            }
        }

        assign_interface_implementers(&mut types);

        let (query_type, mutation_type, subscription_type) = self.root_types(schema_definition)?;

        for scalar in BUILT_IN_SCALARS {
            let needed =
                ALWAYS_PRESENT_SCALARS.contains(&scalar) || self.referenced.contains(scalar);
            if needed && !self.defined.contains(scalar) {
                types.push(IntrospectionType::scalar(scalar));
            }
        }

        Ok(IntrospectionDocument {
            data: IntrospectionData {
                schema: IntrospectionSchema {
                    query_type,
                    mutation_type,
                    subscription_type,
                    types,
                    directives: vec![],
                },
            },
        })
    }

    fn root_types(
        &mut self,
        schema_definition: Option<&SchemaDefinition<'_, String>>,
    ) -> Result<(NamedTypeRef, Option<NamedTypeRef>, Option<NamedTypeRef>), SdlError> {
        let (query, mutation, subscription) = match schema_definition {
            Some(schema) => (
                schema.query.clone(),
                schema.mutation.clone(),
                schema.subscription.clone(),
            ),
            None => (
                self.default_root("Query"),
                self.default_root("Mutation"),
                self.default_root("Subscription"),
            ),
        };

        let query = query.ok_or(SdlError::MissingQueryType)?;
        let mut root = |name: String| -> Result<NamedTypeRef, SdlError> {
            self.kind_of(&name)?;
            Ok(NamedTypeRef::new(name))
        };

        Ok((
            root(query)?,
            mutation.map(&mut root).transpose()?,
            subscription.map(&mut root).transpose()?,
        ))
    }

    fn default_root(&self, name: &str) -> Option<String> {
        self.defined.contains(name).then(|| name.to_string())
    }

    fn kind_of(&mut self, name: &str) -> Result<TypeKind, SdlError> {
        let kind = self
            .kinds
            .get(name)
            .copied()
            .ok_or_else(|| SdlError::UnknownType(name.to_string()))?;
        self.referenced.insert(name.to_string());

        Ok(kind)
    }

    fn type_ref(&mut self, ty: &ast::Type<'_, String>) -> Result<TypeRef, SdlError> {
        Ok(match ty {
            ast::Type::NamedType(name) => TypeRef::named(self.kind_of(name)?, name),
            ast::Type::ListType(inner) => TypeRef::wrap(TypeWrapper::List, self.type_ref(inner)?),
            ast::Type::NonNullType(inner) => {
                TypeRef::wrap(TypeWrapper::NonNull, self.type_ref(inner)?)
            }
        })
    }

    fn named_refs(&mut self, names: &[String]) -> Result<Vec<TypeRef>, SdlError> {
        names
            .iter()
            .map(|name| Ok(TypeRef::named(self.kind_of(name)?, name)))
            .collect()
    }

    fn convert_type(
        &mut self,
        definition: &TypeDefinition<'_, String>,
    ) -> Result<Option<IntrospectionType>, SdlError> {
        let (name, _) = definition_name_and_kind(definition);
        if name.starts_with("__") {
            debug!(name, "skipping introspection type");
            return Ok(None);
        }

        let ty = match definition {
            TypeDefinition::Scalar(scalar) => IntrospectionType {
                description: scalar.description.clone(),
                ..IntrospectionType::scalar(&scalar.name)
            },
            TypeDefinition::Object(object) => IntrospectionType {
                description: object.description.clone(),
                interfaces: Some(self.named_refs(&object.implements_interfaces)?),
                ..IntrospectionType::object(&object.name, self.convert_fields(&object.fields)?)
            },
            TypeDefinition::Interface(interface) => IntrospectionType {
                kind: TypeKind::Interface,
                description: interface.description.clone(),
                interfaces: Some(self.named_refs(&interface.implements_interfaces)?),
                possible_types: Some(vec![]),
                ..IntrospectionType::object(
                    &interface.name,
                    self.convert_fields(&interface.fields)?,
                )
            },
            TypeDefinition::Union(union) => IntrospectionType {
                description: union.description.clone(),
                ..IntrospectionType::union(&union.name, self.named_refs(&union.types)?)
            },
            TypeDefinition::Enum(enum_type) => IntrospectionType {
                kind: TypeKind::Enum,
                description: enum_type.description.clone(),
                enum_values: Some(
                    enum_type
                        .values
                        .iter()
                        .map(|value| {
                            let (is_deprecated, deprecation_reason) =
                                deprecation(&value.directives);
                            IntrospectionEnumValue {
                                name: value.name.clone(),
                                description: value.description.clone(),
                                is_deprecated,
                                deprecation_reason,
                            }
                        })
                        .collect(),
                ),
                ..IntrospectionType::scalar(&enum_type.name)
            },
            TypeDefinition::InputObject(input) => IntrospectionType {
                kind: TypeKind::InputObject,
                description: input.description.clone(),
                input_fields: Some(
                    input
                        .fields
                        .iter()
                        .map(|value| self.convert_input_value(value))
                        .collect::<Result<_, _>>()?,
                ),
                ..IntrospectionType::scalar(&input.name)
            },
        };

        Ok(Some(ty))
    }

    fn convert_fields(
        &mut self,
        fields: &[ast::Field<'_, String>],
    ) -> Result<Vec<IntrospectionField>, SdlError> {
        fields
            .iter()
            .filter(|field| !field.name.starts_with("__"))
            .map(|field| {
                let (is_deprecated, deprecation_reason) = deprecation(&field.directives);
                Ok(IntrospectionField {
                    name: field.name.clone(),
                    description: field.description.clone(),
                    args: field
                        .arguments
                        .iter()
                        .map(|arg| self.convert_input_value(arg))
                        .collect::<Result<_, _>>()?,
                    type_ref: self.type_ref(&field.field_type)?,
                    is_deprecated,
                    deprecation_reason,
                })
            })
            .collect()
    }

    fn convert_input_value(
        &mut self,
        value: &ast::InputValue<'_, String>,
    ) -> Result<IntrospectionInputValue, SdlError> {
        Ok(IntrospectionInputValue {
            name: value.name.clone(),
            description: value.description.clone(),
            type_ref: self.type_ref(&value.value_type)?,
            default_value: value.default_value.as_ref().map(ToString::to_string),
        })
    }
}

fn definition_name_and_kind<'d>(definition: &'d TypeDefinition<'_, String>) -> (&'d str, TypeKind) {
    match definition {
        TypeDefinition::Scalar(ty) => (&ty.name, TypeKind::Scalar),
        TypeDefinition::Object(ty) => (&ty.name, TypeKind::Object),
        TypeDefinition::Interface(ty) => (&ty.name, TypeKind::Interface),
        TypeDefinition::Union(ty) => (&ty.name, TypeKind::Union),
        TypeDefinition::Enum(ty) => (&ty.name, TypeKind::Enum),
        TypeDefinition::InputObject(ty) => (&ty.name, TypeKind::InputObject),
    }
}

fn deprecation(directives: &[ast::Directive<'_, String>]) -> (bool, Option<String>) {
    let Some(directive) = directives.iter().find(|d| d.name == "deprecated") else {
        return (false, None);
    };

    let reason = directive
        .arguments
        .iter()
        .find_map(|(name, value)| match (name.as_str(), value) {
            ("reason", Value::String(reason)) => Some(reason.clone()),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_DEPRECATION_REASON.to_string());

    (true, Some(reason))
}

/// Interfaces list the objects implementing them as `possibleTypes`.
fn assign_interface_implementers(types: &mut [IntrospectionType]) {
    let mut implementers: IndexMap<String, Vec<TypeRef>> = IndexMap::new();

    for ty in types.iter().filter(|ty| ty.kind == TypeKind::Object) {
        for interface in ty.interfaces.iter().flatten() {
            if let Some(name) = interface.named_type_name() {
                implementers
                    .entry(name.to_string())
                    .or_default()
                    .push(TypeRef::named(TypeKind::Object, &ty.name));
            }
        }
    }

    for ty in types.iter_mut().filter(|ty| ty.kind == TypeKind::Interface) {
        ty.possible_types = Some(implementers.shift_remove(&ty.name).unwrap_or_default());
    }
}
