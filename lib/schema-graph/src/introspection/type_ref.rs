use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::TypeKind;

/// A possibly wrapped type reference (`{ kind, name, ofType }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

/// A NON_NULL or LIST modifier, kept as an ordered tag sequence (outermost first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeWrapper {
    NonNull,
    List,
}

impl TypeWrapper {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeWrapper::NonNull => TypeKind::NonNull,
            TypeWrapper::List => TypeKind::List,
        }
    }
}

impl TypeRef {
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            of_type: None,
        }
    }

    pub fn wrap(wrapper: TypeWrapper, inner: TypeRef) -> Self {
        Self {
            kind: wrapper.kind(),
            name: None,
            of_type: Some(Box::new(inner)),
        }
    }

    /// Builds a nested descriptor from wrapper tags (outermost first) around a named type.
    pub fn from_wrappers(wrappers: &[TypeWrapper], kind: TypeKind, name: impl Into<String>) -> Self {
        wrappers
            .iter()
            .rev()
            .fold(TypeRef::named(kind, name), |inner, wrapper| {
                TypeRef::wrap(*wrapper, inner)
            })
    }

    /// Peels NON_NULL/LIST layers, returning the wrapper tags (outermost first)
    /// and the innermost reference.
    pub fn unwrap(&self) -> (Vec<TypeWrapper>, &TypeRef) {
        let mut wrappers = Vec::new();
        let mut current = self;

        loop {
            let wrapper = match current.kind {
                TypeKind::NonNull => TypeWrapper::NonNull,
                TypeKind::List => TypeWrapper::List,
                _ => break,
            };

            match current.of_type.as_deref() {
                Some(inner) => {
                    wrappers.push(wrapper);
                    current = inner;
                }
                None => break,
            }
        }

        (wrappers, current)
    }

    pub fn named_type(&self) -> &TypeRef {
        self.unwrap().1
    }

    pub fn named_type_name(&self) -> Option<&str> {
        let named = self.named_type();
        if named.kind.is_wrapper() {
            return None;
        }
        named.name.as_deref()
    }

    /// Points the innermost reference at `to` when it currently names `from`,
    /// whatever the wrapper depth. Returns whether a rewrite happened.
    pub fn replace_named_type(&mut self, from: &str, to: &str, to_kind: Option<TypeKind>) -> bool {
        if self.kind.is_wrapper() {
            return match self.of_type.as_deref_mut() {
                Some(inner) => inner.replace_named_type(from, to, to_kind),
                None => false,
            };
        }

        if self.name.as_deref() != Some(from) {
            return false;
        }

        self.name = Some(to.to_string());
        if let Some(kind) = to_kind {
            self.kind = kind;
        }

        true
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (wrappers, named) = self.unwrap();
        let (prefix, suffix) = stringify_wrappers(&wrappers);
        write!(
            f,
            "{}{}{}",
            prefix,
            named.name.as_deref().unwrap_or_default(),
            suffix
        )
    }
}

/// Renders wrapper tags as the text around a type name, e.g. `[NON_NULL, LIST]` as `("[", "]!")`.
pub fn stringify_wrappers(wrappers: &[TypeWrapper]) -> (String, String) {
    wrappers
        .iter()
        .rev()
        .fold((String::new(), String::new()), |(left, right), wrapper| {
            match wrapper {
                TypeWrapper::NonNull => (left, right + "!"),
                TypeWrapper::List => (format!("[{left}"), right + "]"),
            }
        })
}
