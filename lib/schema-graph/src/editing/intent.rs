use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::introspection::{IntrospectionType, TypeKind, TypeWrapper};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditKind {
    Object,
    Union,
}

impl EditKind {
    pub fn type_kind(&self) -> TypeKind {
        match self {
            EditKind::Object => TypeKind::Object,
            EditKind::Union => TypeKind::Union,
        }
    }
}

/// Desired state of an object or union type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeEdit {
    pub kind: EditKind,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Target fields, keyed by the field's current name (or its new name for added fields).
    #[serde(default)]
    pub fields: IndexMap<String, FieldEdit>,
    /// Member names, used for unions only.
    #[serde(default)]
    pub possible_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEdit {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub type_wrappers: Vec<TypeWrapper>,
    /// Final position of the field inside its type.
    pub original_position: usize,
}

impl FieldEdit {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, original_position: usize) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_name: type_name.into(),
            type_wrappers: vec![],
            original_position,
        }
    }

    pub fn with_wrappers(mut self, type_wrappers: Vec<TypeWrapper>) -> Self {
        self.type_wrappers = type_wrappers;
        self
    }
}

impl TypeEdit {
    /// A fresh object type with a single `id: String!` field.
    pub fn new_object(name: impl Into<String>) -> Self {
        let id = FieldEdit::new("id", "String", 0).with_wrappers(vec![TypeWrapper::NonNull]);

        Self {
            kind: EditKind::Object,
            name: name.into(),
            description: None,
            fields: IndexMap::from([("id".to_string(), id)]),
            possible_types: vec![],
        }
    }

    /// Describes `ty` as it currently is; applying it unchanged is a no-op.
    /// Returns `None` for kinds other than OBJECT and UNION.
    pub fn from_type(ty: &IntrospectionType) -> Option<Self> {
        let kind = match ty.kind {
            TypeKind::Object => EditKind::Object,
            TypeKind::Union => EditKind::Union,
            _ => return None,
        };

        let fields = ty
            .fields
            .iter()
            .flatten()
            .enumerate()
            .map(|(position, field)| {
                let (type_wrappers, named) = field.type_ref.unwrap();
                let edit = FieldEdit {
                    name: field.name.clone(),
                    description: field.description.clone(),
                    type_name: named.name.clone().unwrap_or_default(),
                    type_wrappers,
                    original_position: position,
                };
                (field.name.clone(), edit)
            })
            .collect();

        let possible_types = ty
            .possible_types
            .iter()
            .flatten()
            .filter_map(|member| member.named_type_name().map(str::to_string))
            .collect();

        Some(Self {
            kind,
            name: ty.name.clone(),
            description: ty.description.clone(),
            fields,
            possible_types,
        })
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::testkit::pets_introspection;
    use pretty_assertions::assert_eq;

    #[test]
    fn captures_fields_in_order() {
        let document = pets_introspection();
        let edit = TypeEdit::from_type(document.find_type("Owner").unwrap()).unwrap();

        assert_eq!(edit.kind, EditKind::Object);
        assert_eq!(edit.fields.keys().collect::<Vec<_>>(), vec!["id", "name", "pets"]);
        assert_eq!(
            edit.fields["pets"],
            FieldEdit::new("pets", "Pet", 2).with_wrappers(vec![
                TypeWrapper::NonNull,
                TypeWrapper::List,
                TypeWrapper::NonNull
            ])
        );
    }

    #[test]
    fn captures_union_members() {
        let document = pets_introspection();
        let edit = TypeEdit::from_type(document.find_type("SearchResult").unwrap()).unwrap();

        assert_eq!(edit.kind, EditKind::Union);
        assert_eq!(edit.possible_types, vec!["Pet", "Owner"]);
    }

    #[test]
    fn other_kinds_are_not_editable() {
        let document = pets_introspection();

        assert!(TypeEdit::from_type(document.find_type("PetKind").unwrap()).is_none());
    }

    #[test]
    fn deserializes_from_camel_case() {
        let edit: TypeEdit = serde_json::from_str(
            r#"{
              "kind": "OBJECT",
              "name": "Toy",
              "fields": {
                "id": { "name": "id", "type": "ID", "typeWrappers": ["NON_NULL"], "originalPosition": 0 }
              }
            }"#,
        )
        .unwrap();

        assert_eq!(edit.fields["id"].type_wrappers, vec![TypeWrapper::NonNull]);
        assert!(edit.possible_types.is_empty());
    }
}
