mod type_ref;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

pub use type_ref::{stringify_wrappers, TypeRef, TypeWrapper};

/// The standard introspection result (`{ data: { __schema } }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntrospectionDocument {
    pub data: IntrospectionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntrospectionData {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    pub query_type: NamedTypeRef,
    #[serde(default)]
    pub mutation_type: Option<NamedTypeRef>,
    #[serde(default)]
    pub subscription_type: Option<NamedTypeRef>,
    pub types: Vec<IntrospectionType>,
    /// Directives are carried through untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTypeRef {
    pub name: String,
}

impl NamedTypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::Interface => "INTERFACE",
            TypeKind::Union => "UNION",
            TypeKind::Enum => "ENUM",
            TypeKind::InputObject => "INPUT_OBJECT",
            TypeKind::List => "LIST",
            TypeKind::NonNull => "NON_NULL",
        }
    }

    pub fn is_wrapper(&self) -> bool {
        matches!(self, TypeKind::List | TypeKind::NonNull)
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named type as it appears in `__schema.types`.
///
/// Every kind-specific collection is optional, mirroring the wire format where
/// collections that do not apply to a kind are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionType {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    pub input_fields: Option<Vec<IntrospectionInputValue>>,
    #[serde(default)]
    pub interfaces: Option<Vec<TypeRef>>,
    #[serde(default)]
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
    #[serde(default)]
    pub possible_types: Option<Vec<TypeRef>>,
}

impl IntrospectionType {
    /// An OBJECT type with the given fields and no interfaces.
    pub fn object(name: impl Into<String>, fields: Vec<IntrospectionField>) -> Self {
        Self {
            kind: TypeKind::Object,
            name: name.into(),
            description: None,
            fields: Some(fields),
            input_fields: None,
            interfaces: Some(vec![]),
            enum_values: None,
            possible_types: None,
        }
    }

    pub fn union(name: impl Into<String>, members: Vec<TypeRef>) -> Self {
        Self {
            kind: TypeKind::Union,
            name: name.into(),
            description: None,
            fields: None,
            input_fields: None,
            interfaces: None,
            enum_values: None,
            possible_types: Some(members),
        }
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Scalar,
            name: name.into(),
            description: None,
            fields: None,
            input_fields: None,
            interfaces: None,
            enum_values: None,
            possible_types: None,
        }
    }

    pub fn is_introspection_type(&self) -> bool {
        self.name.starts_with("__")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionField {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

impl IntrospectionField {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            args: vec![],
            type_ref,
            is_deprecated: false,
            deprecation_reason: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

impl IntrospectionDocument {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn schema(&self) -> &IntrospectionSchema {
        &self.data.schema
    }

    pub fn schema_mut(&mut self) -> &mut IntrospectionSchema {
        &mut self.data.schema
    }

    pub fn find_type(&self, name: &str) -> Option<&IntrospectionType> {
        self.data.schema.types.iter().find(|t| t.name == name)
    }

    /// Kind of the named type, if the document declares it.
    pub fn kind_of(&self, name: &str) -> Option<TypeKind> {
        self.find_type(name).map(|t| t.kind)
    }
}
