use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::{
    enrich::FAKE_ROOT_ID,
    ids,
    introspection::TypeWrapper,
    schema::{KindTag, RelayOrigin, SchemaGraph, SchemaInputValue, SchemaTypeKind, TypeIdx},
};

/// Cursor pagination arguments moved from `args` to `relay_args`.
pub const RELAY_ARG_NAMES: [&str; 4] = ["first", "last", "before", "after"];

const CONNECTION_SUFFIX: &str = "Connection";

struct FieldRewrite {
    owner: TypeIdx,
    field: String,
    target: TypeIdx,
}

/// Returns `(edge type, node type)` when `idx` is a `<X>Connection` object
/// exposing `edges` of an object type that exposes `node`.
fn connection_parts(schema: &SchemaGraph, idx: TypeIdx) -> Option<(TypeIdx, TypeIdx)> {
    let connection = schema.ty(idx);
    let is_connection_name = connection.name.len() > CONNECTION_SUFFIX.len()
        && connection.name.ends_with(CONNECTION_SUFFIX);
    if !is_connection_name || connection.tag() != KindTag::Object {
        return None;
    }

    let edges = connection.field("edges")?;
    let edge_type = schema.ty(edges.ty);
    if edge_type.tag() != KindTag::Object {
        return None;
    }

    let node = edge_type.field("node")?;
    Some((edges.ty, node.ty))
}

fn split_relay_args(
    args: IndexMap<String, SchemaInputValue>,
) -> (IndexMap<String, SchemaInputValue>, IndexMap<String, SchemaInputValue>) {
    args.into_iter()
        .partition(|(name, _)| RELAY_ARG_NAMES.contains(&name.as_str()))
}

fn mark_relay_type(schema: &mut SchemaGraph, idx: TypeIdx) {
    schema.ty_mut(idx).is_relay_type = true;
}

/// Collapses Connection/Edge/Node chains into direct list relations.
#[instrument(level = "debug", skip_all)]
pub fn fold_relay_types(schema: &mut SchemaGraph) {
    let node_interface = schema.idx_of(&ids::type_id("Node"));
    for well_known in [node_interface, schema.idx_of(&ids::type_id("PageInfo"))]
        .into_iter()
        .flatten()
    {
        mark_relay_type(schema, well_known);
    }

    if let Some(node_interface) = node_interface {
        for idx in schema.type_indices().collect::<Vec<_>>() {
            if let SchemaTypeKind::Object { interfaces, .. } = &mut schema.ty_mut(idx).kind {
                interfaces.retain(|relation| relation.ty != node_interface);
            }
        }
    }

    let mut connection_folds = Vec::new();
    let mut edge_types: HashMap<TypeIdx, TypeIdx> = HashMap::new();
    let mut relay_types: HashSet<TypeIdx> = HashSet::new();

    for (owner, ty) in schema.types() {
        for (key, field) in ty.fields().into_iter().flatten() {
            if let Some((edge_type, node_type)) = connection_parts(schema, field.ty) {
                relay_types.insert(field.ty);
                relay_types.insert(edge_type);
                edge_types.insert(edge_type, node_type);
                connection_folds.push(FieldRewrite {
                    owner,
                    field: key.clone(),
                    target: node_type,
                });
            }
        }
    }

    for idx in relay_types {
        mark_relay_type(schema, idx);
    }

    for rewrite in &connection_folds {
        if let Some(field) = schema
            .ty_mut(rewrite.owner)
            .fields_mut()
            .and_then(|fields| fields.get_mut(&rewrite.field))
        {
            field.relay_type = Some(RelayOrigin {
                ty: field.ty,
                type_wrappers: std::mem::take(&mut field.type_wrappers),
            });
            field.ty = rewrite.target;
            field.type_wrappers = vec![TypeWrapper::List];

            let (relay_args, args) = split_relay_args(std::mem::take(&mut field.args));
            field.relay_args = relay_args;
            field.args = args;
        }
    }

    let edge_folds = schema
        .types()
        .flat_map(|(owner, ty)| {
            ty.fields()
                .into_iter()
                .flatten()
                .filter_map(|(key, field)| {
                    edge_types.get(&field.ty).map(|node_type| FieldRewrite {
                        owner,
                        field: key.clone(),
                        target: *node_type,
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    for rewrite in &edge_folds {
        if let Some(field) = schema
            .ty_mut(rewrite.owner)
            .fields_mut()
            .and_then(|fields| fields.get_mut(&rewrite.field))
        {
            field.relay_type = Some(RelayOrigin {
                ty: field.ty,
                type_wrappers: field.type_wrappers.clone(),
            });
            field.ty = rewrite.target;
        }
    }

    strip_relay_root_fields(schema);

    debug!(
        connections = connection_folds.len(),
        edges = edge_folds.len(),
        "folded relay connections"
    );
}

/// Operation roots a Relay schema may hang `node`/`nodes`/`relay` off. When the
/// query type is the synthetic root, the root it replaced is named by its description.
fn operation_roots(schema: &SchemaGraph) -> Vec<TypeIdx> {
    let mut roots = vec![schema.query_type];
    let query = schema.query();
    if query.name == FAKE_ROOT_ID {
        roots.extend(
            query
                .description
                .as_deref()
                .and_then(|name| schema.idx_of(&ids::type_id(name))),
        );
    }
    for root in [schema.mutation_type, schema.subscription_type].into_iter().flatten() {
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

/// Drops `node`/`nodes` (pointing at Relay types) and `relay` (pointing back at
/// a root) from every operation root.
fn strip_relay_root_fields(schema: &mut SchemaGraph) {
    let roots = operation_roots(schema);

    for root in roots.iter().copied() {
        let removable = ["node", "nodes", "relay"]
            .into_iter()
            .filter(|name| {
                schema.ty(root).field(name).is_some_and(|field| match *name {
                    "relay" => roots.contains(&field.ty),
                    _ => schema.ty(field.ty).is_relay_type,
                })
            })
            .collect::<Vec<_>>();

        let root_name = schema.ty(root).name.clone();
        if let Some(fields) = schema.ty_mut(root).fields_mut() {
            for name in removable {
                debug!(root = %root_name, field = name, "removing relay root field");
                fields.shift_remove(name);
            }
        }
    }
}
