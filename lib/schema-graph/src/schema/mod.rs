//! The resolved, ID-keyed schema.
//!
//! Every type is stored once in a table keyed by its `TYPE::` identifier and
//! every reference between types is a [`TypeIdx`] into that table, so the
//! schema can be walked as a graph without any name lookups.

mod assign;

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;

use crate::{
    ids,
    introspection::{stringify_wrappers, IntrospectionEnumValue, TypeWrapper},
};

pub use assign::assign_types_and_ids;

/// Position of a type inside [`SchemaGraph`]. Only the identity assigner mints these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdx(usize);

impl TypeIdx {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct SchemaGraph {
    types: IndexMap<String, SchemaType>,
    pub query_type: TypeIdx,
    pub mutation_type: Option<TypeIdx>,
    pub subscription_type: Option<TypeIdx>,
}

#[derive(Debug, Clone)]
pub struct SchemaType {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: SchemaTypeKind,
    /// Set by the Relay fold on Connection/Edge/Node/PageInfo types.
    pub is_relay_type: bool,
}

#[derive(Debug, Clone)]
pub enum SchemaTypeKind {
    Object {
        interfaces: Vec<TypeRelation>,
        fields: IndexMap<String, SchemaField>,
    },
    Interface {
        derived_types: Vec<TypeRelation>,
        fields: IndexMap<String, SchemaField>,
    },
    Union {
        possible_types: Vec<TypeRelation>,
    },
    Enum {
        enum_values: Vec<IntrospectionEnumValue>,
    },
    InputObject {
        input_fields: IndexMap<String, SchemaInputValue>,
    },
    Scalar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindTag {
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    Scalar,
}

impl KindTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindTag::Object => "OBJECT",
            KindTag::Interface => "INTERFACE",
            KindTag::Union => "UNION",
            KindTag::Enum => "ENUM",
            KindTag::InputObject => "INPUT_OBJECT",
            KindTag::Scalar => "SCALAR",
        }
    }

    /// Scalars and enums terminate a path through the graph.
    pub fn is_leaf(&self) -> bool {
        matches!(self, KindTag::Scalar | KindTag::Enum)
    }
}

impl SchemaTypeKind {
    pub fn tag(&self) -> KindTag {
        match self {
            SchemaTypeKind::Object { .. } => KindTag::Object,
            SchemaTypeKind::Interface { .. } => KindTag::Interface,
            SchemaTypeKind::Union { .. } => KindTag::Union,
            SchemaTypeKind::Enum { .. } => KindTag::Enum,
            SchemaTypeKind::InputObject { .. } => KindTag::InputObject,
            SchemaTypeKind::Scalar => KindTag::Scalar,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaField {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeIdx,
    pub type_wrappers: Vec<TypeWrapper>,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
    pub args: IndexMap<String, SchemaInputValue>,
    /// The Connection/Edge reference this field had before the Relay fold.
    pub relay_type: Option<RelayOrigin>,
    /// Pagination arguments split off by the Relay fold.
    pub relay_args: IndexMap<String, SchemaInputValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOrigin {
    pub ty: TypeIdx,
    pub type_wrappers: Vec<TypeWrapper>,
}

#[derive(Debug, Clone)]
pub struct SchemaInputValue {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeIdx,
    pub type_wrappers: Vec<TypeWrapper>,
    pub default_value: Option<String>,
}

/// An interface, possible-type or derived-type edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRelation {
    pub id: String,
    pub ty: TypeIdx,
}

impl SchemaType {
    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    pub fn fields(&self) -> Option<&IndexMap<String, SchemaField>> {
        match &self.kind {
            SchemaTypeKind::Object { fields, .. } | SchemaTypeKind::Interface { fields, .. } => {
                Some(fields)
            }
            _ => None,
        }
    }

    pub fn fields_mut(&mut self) -> Option<&mut IndexMap<String, SchemaField>> {
        match &mut self.kind {
            SchemaTypeKind::Object { fields, .. } | SchemaTypeKind::Interface { fields, .. } => {
                Some(fields)
            }
            _ => None,
        }
    }

    pub fn interfaces(&self) -> &[TypeRelation] {
        match &self.kind {
            SchemaTypeKind::Object { interfaces, .. } => interfaces,
            _ => &[],
        }
    }

    pub fn possible_types(&self) -> &[TypeRelation] {
        match &self.kind {
            SchemaTypeKind::Union { possible_types } => possible_types,
            _ => &[],
        }
    }

    pub fn derived_types(&self) -> &[TypeRelation] {
        match &self.kind {
            SchemaTypeKind::Interface { derived_types, .. } => derived_types,
            _ => &[],
        }
    }

    pub fn enum_values(&self) -> &[IntrospectionEnumValue] {
        match &self.kind {
            SchemaTypeKind::Enum { enum_values } => enum_values,
            _ => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields().and_then(|fields| fields.get(name))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn is_introspection_type(&self) -> bool {
        self.name.starts_with("__")
    }
}

impl SchemaGraph {
    pub(crate) fn from_parts(
        types: IndexMap<String, SchemaType>,
        query_type: TypeIdx,
        mutation_type: Option<TypeIdx>,
        subscription_type: Option<TypeIdx>,
    ) -> Self {
        Self {
            types,
            query_type,
            mutation_type,
            subscription_type,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resolves a reference. References are only minted for this table, so this cannot miss.
    pub fn ty(&self, idx: TypeIdx) -> &SchemaType {
        &self.types[idx.0]
    }

    pub(crate) fn ty_mut(&mut self, idx: TypeIdx) -> &mut SchemaType {
        &mut self.types[idx.0]
    }

    pub fn idx_of(&self, id: &str) -> Option<TypeIdx> {
        self.types.get_index_of(id).map(TypeIdx)
    }

    pub fn type_by_id(&self, id: &str) -> Option<&SchemaType> {
        self.types.get(id)
    }

    pub fn type_by_name(&self, name: &str) -> Option<&SchemaType> {
        self.type_by_id(&ids::type_id(name))
    }

    pub fn query(&self) -> &SchemaType {
        self.ty(self.query_type)
    }

    pub fn types(&self) -> impl Iterator<Item = (TypeIdx, &SchemaType)> {
        self.types
            .values()
            .enumerate()
            .map(|(index, ty)| (TypeIdx(index), ty))
    }

    pub fn type_indices(&self) -> impl Iterator<Item = TypeIdx> {
        (0..self.types.len()).map(TypeIdx)
    }
}

fn fmt_wrapped(schema: &SchemaGraph, ty: TypeIdx, wrappers: &[TypeWrapper]) -> String {
    let (prefix, suffix) = stringify_wrappers(wrappers);
    format!("{}{}{}", prefix, schema.ty(ty).name, suffix)
}

impl Display for SchemaGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (idx, ty) in self.types() {
            let marker = match (idx == self.query_type, ty.is_relay_type) {
                (true, _) => " (query)",
                (false, true) => " (relay)",
                (false, false) => "",
            };
            writeln!(f, "{} {} [{}]{}", ty.tag().as_str(), ty.name, ty.id, marker)?;

            for relation in ty.interfaces() {
                writeln!(f, "  implements {}", self.ty(relation.ty).name)?;
            }
            for relation in ty.possible_types().iter().chain(ty.derived_types()) {
                writeln!(f, "  | {}", self.ty(relation.ty).name)?;
            }
            for field in ty.fields().into_iter().flat_map(|fields| fields.values()) {
                let args = field
                    .args
                    .values()
                    .map(|arg| format!("{}: {}", arg.name, fmt_wrapped(self, arg.ty, &arg.type_wrappers)))
                    .collect::<Vec<_>>();
                let args = if args.is_empty() {
                    String::new()
                } else {
                    format!("({})", args.join(", "))
                };
                let relay = match &field.relay_type {
                    Some(origin) => format!(
                        " (relay: {})",
                        fmt_wrapped(self, origin.ty, &origin.type_wrappers)
                    ),
                    None => String::new(),
                };
                writeln!(
                    f,
                    "  {}{}: {}{}",
                    field.name,
                    args,
                    fmt_wrapped(self, field.ty, &field.type_wrappers),
                    relay
                )?;
            }
            if let SchemaTypeKind::InputObject { input_fields } = &ty.kind {
                for input in input_fields.values() {
                    writeln!(
                        f,
                        "  {}: {}",
                        input.name,
                        fmt_wrapped(self, input.ty, &input.type_wrappers)
                    )?;
                }
            }
            for value in ty.enum_values() {
                writeln!(f, "  {}", value.name)?;
            }
        }

        Ok(())
    }
}
