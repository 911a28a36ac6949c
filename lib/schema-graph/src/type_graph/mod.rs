//! Navigable node/edge view over a resolved schema.
//!
//! The graph never prunes unreachable types: every object, interface and
//! union stays a node so the caller can navigate anywhere. Options only
//! change presentation order and what the diagram draws.

mod options;

use std::fmt::{Display, Formatter};

use indexmap::IndexSet;
use tracing::{debug, instrument, warn};

use crate::{
    ids,
    introspection::stringify_wrappers,
    schema::{KindTag, SchemaField, SchemaGraph, SchemaType, TypeIdx},
};

pub use options::DisplayOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Field,
    PossibleType,
    DerivedType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    /// `<source element id> => <target type id>`
    pub id: String,
    pub kind: EdgeKind,
    pub source: TypeIdx,
    pub target: TypeIdx,
    /// `Owner:field` for field edges, the member name for relation edges.
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct TypeGraph<'a> {
    schema: &'a SchemaGraph,
    options: DisplayOptions,
    root: TypeIdx,
    nodes: IndexSet<TypeIdx>,
}

fn is_graph_node(ty: &SchemaType) -> bool {
    matches!(
        ty.tag(),
        KindTag::Object | KindTag::Interface | KindTag::Union
    ) && !ty.is_introspection_type()
        && !ty.is_relay_type
}

impl<'a> TypeGraph<'a> {
    #[instrument(level = "debug", skip_all, fields(root_type = ?options.root_type))]
    pub fn new(schema: &'a SchemaGraph, options: &DisplayOptions) -> Self {
        let root = match options.root_type.as_deref() {
            Some(name) => schema.idx_of(&ids::type_id(name)).unwrap_or_else(|| {
                warn!(root_type = name, "root type not found, using the query type");
                schema.query_type
            }),
            None => schema.query_type,
        };

        let nodes: IndexSet<TypeIdx> = schema
            .types()
            .filter(|(idx, ty)| *idx == root || is_graph_node(ty))
            .map(|(idx, _)| idx)
            .collect();

        debug!(nodes = nodes.len(), root = %schema.ty(root).name, "type graph ready");

        Self {
            schema,
            options: options.clone(),
            root,
            nodes,
        }
    }

    pub fn schema(&self) -> &'a SchemaGraph {
        self.schema
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    pub fn root(&self) -> TypeIdx {
        self.root
    }

    pub fn root_id(&self) -> &'a str {
        &self.schema.ty(self.root).id
    }

    pub fn root_type(&self) -> &'a SchemaType {
        self.schema.ty(self.root)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, idx: TypeIdx) -> bool {
        self.nodes.contains(&idx)
    }

    pub fn node_idx(&self, id: &str) -> Option<TypeIdx> {
        self.schema.idx_of(id).filter(|idx| self.contains(*idx))
    }

    pub fn node(&self, id: &str) -> Option<&'a SchemaType> {
        self.node_idx(id).map(|idx| self.schema.ty(idx))
    }

    /// Nodes in schema table order.
    pub fn nodes(&self) -> impl Iterator<Item = (TypeIdx, &'a SchemaType)> + '_ {
        let schema = self.schema;
        self.nodes.iter().map(move |idx| (*idx, schema.ty(*idx)))
    }

    /// Nodes in presentation order: the root first, then the rest in table
    /// order, or by name when sorting alphabetically.
    ///
    /// `hide_root` leaves out the selected root: the `root_type` override when
    /// it resolves, otherwise the synthetic query root. It stays a node of the
    /// graph and keeps its edges.
    pub fn listing(&self) -> Vec<(TypeIdx, &'a SchemaType)> {
        let mut rest = self
            .nodes()
            .filter(|(idx, _)| *idx != self.root)
            .collect::<Vec<_>>();

        if self.options.sort_by_alphabet {
            rest.sort_by(|(_, a), (_, b)| a.name.cmp(&b.name));
        }

        if self.options.hide_root {
            return rest;
        }

        let mut listing = Vec::with_capacity(rest.len() + 1);
        listing.push((self.root, self.root_type()));
        listing.extend(rest);
        listing
    }

    /// Fields of `node` in presentation order.
    pub fn fields(&self, node: &'a SchemaType) -> Vec<&'a SchemaField> {
        let mut fields = node
            .fields()
            .map(|fields| fields.values().collect::<Vec<_>>())
            .unwrap_or_default();

        if self.options.sort_by_alphabet {
            fields.sort_by(|a, b| a.name.cmp(&b.name));
        }

        fields
    }

    /// Every field, possible-type and derived-type edge between two nodes.
    pub fn edges(&self) -> Vec<GraphEdge> {
        let mut edges = Vec::new();

        for (source, node) in self.nodes() {
            for field in self.fields(node) {
                if self.contains(field.ty) {
                    edges.push(GraphEdge {
                        id: ids::edge_id(&field.id, &self.schema.ty(field.ty).id),
                        kind: EdgeKind::Field,
                        source,
                        target: field.ty,
                        label: format!("{}:{}", node.name, field.name),
                    });
                }
            }

            let relations = node
                .possible_types()
                .iter()
                .map(|relation| (EdgeKind::PossibleType, relation))
                .chain(
                    node.derived_types()
                        .iter()
                        .map(|relation| (EdgeKind::DerivedType, relation)),
                );

            for (kind, relation) in relations {
                if self.contains(relation.ty) {
                    let target = self.schema.ty(relation.ty);
                    edges.push(GraphEdge {
                        id: ids::edge_id(&relation.id, &target.id),
                        kind,
                        source,
                        target: relation.ty,
                        label: target.name.clone(),
                    });
                }
            }
        }

        edges
    }
}

impl Display for TypeGraph<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "root: {}", self.root_id())?;

        for (idx, node) in self.listing() {
            let marker = if idx == self.root { " (root)" } else { "" };
            writeln!(f, "{} {}{}", node.tag().as_str(), node.name, marker)?;

            for field in self.fields(node) {
                let (prefix, suffix) = stringify_wrappers(&field.type_wrappers);
                writeln!(
                    f,
                    "  {}: {}{}{}",
                    field.name,
                    prefix,
                    self.schema.ty(field.ty).name,
                    suffix
                )?;
            }
            for relation in node.possible_types().iter().chain(node.derived_types()) {
                writeln!(f, "  | {}", self.schema.ty(relation.ty).name)?;
            }
        }

        Ok(())
    }
}
