//! String identifiers for every addressable element of a schema.
//!
//! An identifier is a kind tag followed by the `::`-joined name path of the
//! element, so two differently-kinded elements can never collide and the
//! identifier of a type changes together with its name.

pub const TYPE_PREFIX: &str = "TYPE::";

const SEPARATOR: &str = "::";
const EDGE_SEPARATOR: &str = " => ";

pub fn type_id(type_name: &str) -> String {
    format!("{TYPE_PREFIX}{type_name}")
}

pub fn field_id(type_name: &str, field_name: &str) -> String {
    format!("FIELD::{type_name}::{field_name}")
}

pub fn argument_id(type_name: &str, field_name: &str, arg_name: &str) -> String {
    format!("ARGUMENT::{type_name}::{field_name}::{arg_name}")
}

pub fn possible_type_id(union_name: &str, member_name: &str) -> String {
    format!("POSSIBLE_TYPE::{union_name}::{member_name}")
}

pub fn derived_type_id(interface_name: &str, implementation_name: &str) -> String {
    format!("DERIVED_TYPE::{interface_name}::{implementation_name}")
}

pub fn interface_id(type_name: &str, interface_name: &str) -> String {
    format!("INTERFACE::{type_name}::{interface_name}")
}

pub fn enum_values_id(type_name: &str, field_name: &str) -> String {
    format!("ENUM_VALUES::{type_name}::{field_name}")
}

pub fn edge_id(source_id: &str, target_id: &str) -> String {
    format!("{source_id}{EDGE_SEPARATOR}{target_id}")
}

/// Returns the type name embedded in any identifier (the segment right after the kind tag).
pub fn type_name_from_id(id: &str) -> Option<&str> {
    id.split(SEPARATOR).nth(1).filter(|name| !name.is_empty())
}

/// Returns the type name of a `TYPE::` identifier; `None` for any other kind.
pub fn type_name_from_type_id(id: &str) -> Option<&str> {
    id.strip_prefix(TYPE_PREFIX)
        .filter(|name| !name.is_empty() && !name.contains(SEPARATOR))
}

/// Maps an element or edge identifier to the `TYPE::` identifier of the type owning it.
///
/// For edges (`a => b`) the source side decides.
pub fn extract_type_id(id: &str) -> Option<String> {
    let source = id.split(EDGE_SEPARATOR).next()?;
    type_name_from_id(source).map(type_id)
}
