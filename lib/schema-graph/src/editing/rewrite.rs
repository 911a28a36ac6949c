use tracing::debug;

use crate::introspection::{IntrospectionSchema, TypeKind};

/// Points every reference to `from` at `to`: field, argument and input-field
/// types at any wrapper depth, `interfaces`/`possibleTypes` entries and the
/// root pointers. When `to_kind` is given, rewritten type references take that
/// kind; relation entries keep theirs.
///
/// Returns the number of rewritten references.
pub fn replace_type_references(
    schema: &mut IntrospectionSchema,
    from: &str,
    to: &str,
    to_kind: Option<TypeKind>,
) -> usize {
    let mut rewritten = 0;

    for ty in &mut schema.types {
        for field in ty.fields.iter_mut().flatten() {
            rewritten += usize::from(field.type_ref.replace_named_type(from, to, to_kind));
            for arg in &mut field.args {
                rewritten += usize::from(arg.type_ref.replace_named_type(from, to, to_kind));
            }
        }

        for input in ty.input_fields.iter_mut().flatten() {
            rewritten += usize::from(input.type_ref.replace_named_type(from, to, to_kind));
        }

        let relations = ty
            .interfaces
            .iter_mut()
            .flatten()
            .chain(ty.possible_types.iter_mut().flatten());
        for relation in relations {
            rewritten += usize::from(relation.replace_named_type(from, to, None));
        }
    }

    let roots = std::iter::once(&mut schema.query_type)
        .chain(schema.mutation_type.as_mut())
        .chain(schema.subscription_type.as_mut());
    for root in roots {
        if root.name == from {
            root.name = to.to_string();
            rewritten += 1;
        }
    }

    debug!(from, to, rewritten, "rewrote type references");

    rewritten
}
