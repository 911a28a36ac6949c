//! Name-keyed, flattened view of an introspection schema.
//!
//! Wrapper types are peeled into ordered tag sequences, field and argument
//! lists become name-keyed maps and every type keeps only the collection that
//! applies to its kind. References between types are still plain names here;
//! [`crate::schema`] resolves them.

mod simplify;

use indexmap::IndexMap;
use serde::Serialize;

use crate::introspection::{IntrospectionEnumValue, TypeWrapper};

pub use simplify::simplify_schema;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedIntrospection {
    pub types: IndexMap<String, SimplifiedType>,
    pub query_type: String,
    pub mutation_type: Option<String>,
    pub subscription_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedType {
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: SimplifiedKind,
}

/// Kind-specific part of a type. Only the collection valid for the kind exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum SimplifiedKind {
    Object {
        interfaces: Vec<String>,
        fields: IndexMap<String, SimplifiedField>,
    },
    Interface {
        derived_types: Vec<String>,
        fields: IndexMap<String, SimplifiedField>,
    },
    Union {
        possible_types: Vec<String>,
    },
    Enum {
        enum_values: Vec<IntrospectionEnumValue>,
    },
    InputObject {
        input_fields: IndexMap<String, SimplifiedArgument>,
    },
    Scalar,
}

impl SimplifiedKind {
    pub fn fields(&self) -> Option<&IndexMap<String, SimplifiedField>> {
        match self {
            SimplifiedKind::Object { fields, .. } | SimplifiedKind::Interface { fields, .. } => {
                Some(fields)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedField {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    pub type_wrappers: Vec<TypeWrapper>,
    pub is_deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
    pub args: IndexMap<String, SimplifiedArgument>,
}

/// An argument or an input field. Unlike fields, these have no nested `args`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedArgument {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    pub type_wrappers: Vec<TypeWrapper>,
    pub default_value: Option<String>,
}
