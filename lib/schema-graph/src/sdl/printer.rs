use std::fmt::{Display, Formatter, Result};

use crate::introspection::{
    IntrospectionDocument, IntrospectionEnumValue, IntrospectionField, IntrospectionInputValue,
    IntrospectionSchema, IntrospectionType, TypeKind, TypeRef,
};

use super::BUILT_IN_SCALARS;

/// Writes a document as SDL: the schema block first, then every declared
/// type in document order, blocks separated by a blank line.
pub struct SchemaPrinter<'a> {
    document: &'a IntrospectionDocument,
}

impl<'a> SchemaPrinter<'a> {
    pub fn new(document: &'a IntrospectionDocument) -> Self {
        Self { document }
    }
}

impl Display for SchemaPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let schema = self.document.schema();
        write_schema_block(f, schema)?;

        for ty in schema.types.iter().filter(|ty| is_printable(ty)) {
            f.write_str("\n\n")?;
            write_type(f, ty)?;
        }

        writeln!(f)
    }
}

fn is_printable(ty: &IntrospectionType) -> bool {
    if ty.is_introspection_type() || ty.kind.is_wrapper() {
        return false;
    }

    !(ty.kind == TypeKind::Scalar && BUILT_IN_SCALARS.contains(&ty.name.as_str()))
}

fn write_schema_block(f: &mut Formatter<'_>, schema: &IntrospectionSchema) -> Result {
    writeln!(f, "schema {{")?;
    writeln!(f, "  query: {}", schema.query_type.name)?;
    if let Some(mutation) = &schema.mutation_type {
        writeln!(f, "  mutation: {}", mutation.name)?;
    }
    if let Some(subscription) = &schema.subscription_type {
        writeln!(f, "  subscription: {}", subscription.name)?;
    }
    write!(f, "}}")
}

fn write_type(f: &mut Formatter<'_>, ty: &IntrospectionType) -> Result {
    write_description(f, ty.description.as_deref(), "")?;

    match ty.kind {
        TypeKind::Object | TypeKind::Interface => {
            let keyword = if ty.kind == TypeKind::Object {
                "type"
            } else {
                "interface"
            };
            write!(f, "{} {}", keyword, ty.name)?;
            write_implements(f, ty.interfaces.as_deref().unwrap_or_default())?;
            write_block(f, ty.fields.as_deref().unwrap_or_default(), write_field)
        }
        TypeKind::Union => {
            write!(f, "union {}", ty.name)?;
            let members = names(ty.possible_types.as_deref().unwrap_or_default());
            if !members.is_empty() {
                write!(f, " = {}", members.join(" | "))?;
            }
            Ok(())
        }
        TypeKind::Enum => {
            write!(f, "enum {}", ty.name)?;
            write_block(f, ty.enum_values.as_deref().unwrap_or_default(), write_enum_value)
        }
        TypeKind::InputObject => {
            write!(f, "input {}", ty.name)?;
            write_block(f, ty.input_fields.as_deref().unwrap_or_default(), |f, input| {
                write_description(f, input.description.as_deref(), "  ")?;
                f.write_str("  ")?;
                write_input_value(f, input)
            })
        }
        TypeKind::Scalar | TypeKind::List | TypeKind::NonNull => write!(f, "scalar {}", ty.name),
    }
}

fn names(refs: &[TypeRef]) -> Vec<&str> {
    refs.iter().filter_map(TypeRef::named_type_name).collect()
}

fn write_implements(f: &mut Formatter<'_>, interfaces: &[TypeRef]) -> Result {
    let interfaces = names(interfaces);
    if interfaces.is_empty() {
        return Ok(());
    }
    write!(f, " implements {}", interfaces.join(" & "))
}

/// Empty member lists print no braces at all; `{}` is not valid SDL.
fn write_block<T>(
    f: &mut Formatter<'_>,
    items: &[T],
    write_item: impl Fn(&mut Formatter<'_>, &T) -> Result,
) -> Result {
    if items.is_empty() {
        return Ok(());
    }

    writeln!(f, " {{")?;
    for item in items {
        write_item(f, item)?;
        writeln!(f)?;
    }
    write!(f, "}}")
}

fn write_field(f: &mut Formatter<'_>, field: &IntrospectionField) -> Result {
    write_description(f, field.description.as_deref(), "  ")?;
    write!(f, "  {}", field.name)?;

    if !field.args.is_empty() {
        if field.args.iter().any(|arg| arg.description.is_some()) {
            writeln!(f, "(")?;
            for arg in &field.args {
                write_description(f, arg.description.as_deref(), "    ")?;
                f.write_str("    ")?;
                write_input_value(f, arg)?;
                writeln!(f)?;
            }
            f.write_str("  )")?;
        } else {
            f.write_str("(")?;
            for (position, arg) in field.args.iter().enumerate() {
                if position > 0 {
                    f.write_str(", ")?;
                }
                write_input_value(f, arg)?;
            }
            f.write_str(")")?;
        }
    }

    write!(f, ": {}", field.type_ref)?;
    write_deprecation(f, field.is_deprecated, field.deprecation_reason.as_deref())
}

fn write_input_value(f: &mut Formatter<'_>, input: &IntrospectionInputValue) -> Result {
    write!(f, "{}: {}", input.name, input.type_ref)?;
    if let Some(default_value) = &input.default_value {
        write!(f, " = {}", default_value)?;
    }
    Ok(())
}

fn write_enum_value(f: &mut Formatter<'_>, value: &IntrospectionEnumValue) -> Result {
    write_description(f, value.description.as_deref(), "  ")?;
    write!(f, "  {}", value.name)?;
    write_deprecation(f, value.is_deprecated, value.deprecation_reason.as_deref())
}

fn write_deprecation(f: &mut Formatter<'_>, is_deprecated: bool, reason: Option<&str>) -> Result {
    match (is_deprecated, reason) {
        (false, _) => Ok(()),
        (true, None) => f.write_str(" @deprecated"),
        (true, Some(reason)) => write!(f, " @deprecated(reason: {})", string_literal(reason)),
    }
}

fn write_description(f: &mut Formatter<'_>, description: Option<&str>, indent: &str) -> Result {
    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return Ok(());
    };

    let escaped = description.replace("\"\"\"", "\\\"\"\"");
    if !escaped.contains('\n') && !escaped.ends_with('"') {
        return writeln!(f, "{indent}\"\"\"{escaped}\"\"\"");
    }

    writeln!(f, "{indent}\"\"\"")?;
    for line in escaped.lines() {
        writeln!(f, "{indent}{line}")?;
    }
    writeln!(f, "{indent}\"\"\"")
}

fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
