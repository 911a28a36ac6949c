//! Graphviz DOT rendering of a [`TypeGraph`].
//!
//! Node and edge `id` attributes, `PORT` names and the `HREF`/`ID` pairs on
//! table cells are read back from the rendered SVG by interactive viewers,
//! so their format is stable.

mod html;

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, instrument};

use crate::{
    ids,
    introspection::stringify_wrappers,
    schema::{KindTag, SchemaField, SchemaType, TypeIdx, TypeRelation},
    type_graph::TypeGraph,
};

use html::{escape, html_id, text};

const ENUM_VALUES_SUFFIX: &str = "enumValues";

const HEADER: &str = r#"digraph {
  graph [
    rankdir = "LR"
  ];
  node [
    fontsize = "16"
    fontname = "helvetica, open-sans"
    shape = "plaintext"
  ];
  edge [
  ];
  ranksep = 2.0
"#;

const TABLE_OPEN: &str =
    r#"<<TABLE ALIGN="LEFT" BORDER="0" CELLBORDER="1" CELLSPACING="0" CELLPADDING="5">"#;

/// Renders the diagram for `graph` using the graph's display options.
pub fn render_dot(graph: &TypeGraph<'_>) -> String {
    DotContext::new(graph).render()
}

/// State of one rendering pass. Both memo tables start empty for every
/// context, so separate renders never observe each other.
pub struct DotContext<'g, 'a> {
    graph: &'g TypeGraph<'a>,
    focus: Option<&'g str>,
    drawn: HashSet<TypeIdx>,
    /// `(source, target)` pairs that already have an edge, consulted in focus mode.
    existing_edges: HashSet<(TypeIdx, TypeIdx)>,
    /// Reachability from the focused type, per candidate type.
    known_paths: HashMap<TypeIdx, bool>,
    /// Enum pseudo-nodes already emitted, by `ENUM_VALUES::` id.
    enum_nodes: HashSet<String>,
}

impl<'g, 'a> DotContext<'g, 'a> {
    pub fn new(graph: &'g TypeGraph<'a>) -> Self {
        Self {
            graph,
            focus: graph.options().focus_on.as_deref(),
            drawn: graph.listing().into_iter().map(|(idx, _)| idx).collect(),
            existing_edges: HashSet::new(),
            known_paths: HashMap::new(),
            enum_nodes: HashSet::new(),
        }
    }

    #[instrument(level = "debug", skip_all, fields(nodes = self.drawn.len(), focus = ?self.focus))]
    pub fn render(mut self) -> String {
        let mut out = String::from(HEADER);

        for (idx, node) in self.graph.listing() {
            out.push_str(&self.node_block(idx, node));
        }

        out.push_str("}\n");

        debug!(
            edges = self.existing_edges.len(),
            enum_nodes = self.enum_nodes.len(),
            "rendered diagram"
        );

        out
    }

    /// Whether `candidate` can be reached from the focused type by following
    /// object-typed fields. Always true outside focus mode; false when the
    /// focused type is not a node.
    pub fn is_reachable_from_focused(&mut self, candidate: TypeIdx) -> bool {
        let Some(focus) = self.focus else {
            return true;
        };

        if let Some(known) = self.known_paths.get(&candidate) {
            return *known;
        }

        let reachable = self.search_from(focus, candidate);
        self.known_paths.insert(candidate, reachable);
        reachable
    }

    fn search_from(&self, focus: &str, candidate: TypeIdx) -> bool {
        let Some(start) = self.graph.node_idx(&ids::type_id(focus)) else {
            return false;
        };
        let schema = self.graph.schema();

        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for field in schema.ty(current).fields().into_iter().flat_map(|f| f.values()) {
                if schema.ty(field.ty).tag() != KindTag::Object {
                    continue;
                }
                if field.ty == candidate {
                    return true;
                }
                if self.graph.contains(field.ty) && visited.insert(field.ty) {
                    queue.push_back(field.ty);
                }
            }
        }

        false
    }

    fn can_display_row(&mut self, owner_idx: TypeIdx, owner: &SchemaType, field: &SchemaField) -> bool {
        let graph = self.graph;
        let options = graph.options();

        if !options.show_subattributes && !owner.has_field("id") {
            return false;
        }

        if let Some(focus) = self.focus {
            if focus != owner.name && !self.is_reachable_from_focused(owner_idx) {
                return false;
            }
        }

        if graph.schema().ty(field.ty).tag().is_leaf() {
            return options.show_leaf_fields;
        }

        true
    }

    fn node_block(&mut self, idx: TypeIdx, node: &'a SchemaType) -> String {
        let schema = self.graph.schema();
        let mut rows = vec![title_row(&format!("TYPE_TITLE::{}", node.name), node)];
        let mut edges = Vec::new();

        for field in self.graph.fields(node) {
            let displayed = self.can_display_row(idx, node, field);
            if displayed {
                rows.push(field_row(self.graph, field));
            }

            if let Some(edge) = self.field_edge(idx, node, field, displayed) {
                edges.push(edge);
            }

            let target = schema.ty(field.ty);
            if displayed && target.tag() == KindTag::Enum {
                if let Some(block) = self.enum_values_block(node, field, target) {
                    edges.push(block);
                }
            }
        }

        rows.extend(relation_rows("possible settings", node.possible_types(), self.graph));
        rows.extend(relation_rows("implementations", node.derived_types(), self.graph));

        for relation in node.possible_types() {
            edges.extend(self.relation_edge(node, relation, "dashed"));
        }
        for relation in node.derived_types() {
            edges.extend(self.relation_edge(node, relation, "dotted"));
        }

        let mut block = node_declaration(&node.name, &node.id, &rows);
        for edge in edges {
            block.push_str(&edge);
        }
        block
    }

    fn field_edge(
        &mut self,
        owner_idx: TypeIdx,
        owner: &SchemaType,
        field: &SchemaField,
        from_port: bool,
    ) -> Option<String> {
        if !self.drawn.contains(&field.ty) {
            return None;
        }

        let first_between_pair = self.existing_edges.insert((owner_idx, field.ty));
        let create = self.focus.is_none()
            || first_between_pair
            || self.focus == Some(owner.name.as_str());
        if !create {
            return None;
        }

        let target = self.graph.schema().ty(field.ty);
        let label = format!("{}:{}", owner.name, field.name);

        Some(if from_port {
            edge_statement(
                &format!("\"{}\":\"{}\"", owner.name, field.name),
                &target.name,
                &ids::edge_id(&field.id, &target.id),
                &[("label", label.as_str())],
            )
        } else {
            edge_statement(
                &format!("\"{}\"", owner.name),
                &target.name,
                &ids::edge_id(&owner.id, &target.id),
                &[("label", label.as_str())],
            )
        })
    }

    fn relation_edge(&self, owner: &SchemaType, relation: &TypeRelation, style: &str) -> Option<String> {
        if !self.drawn.contains(&relation.ty) {
            return None;
        }

        let target = self.graph.schema().ty(relation.ty);
        Some(edge_statement(
            &format!("\"{}\":\"{}\"", owner.name, target.name),
            &target.name,
            &ids::edge_id(&relation.id, &target.id),
            &[("style", style)],
        ))
    }

    /// One pseudo-node per owner and enum-typed field, listing the enum values.
    fn enum_values_block(
        &mut self,
        owner: &SchemaType,
        field: &SchemaField,
        enum_type: &SchemaType,
    ) -> Option<String> {
        let pseudo_id = ids::enum_values_id(&owner.name, &field.name);
        if !self.enum_nodes.insert(pseudo_id.clone()) {
            return None;
        }

        let pseudo_name = format!("{}::{}::{}", owner.name, field.name, ENUM_VALUES_SUFFIX);
        let mut rows = vec![title_row(&pseudo_id, enum_type)];
        rows.extend(enum_type.enum_values().iter().map(|value| {
            let text = value.description.as_deref().unwrap_or(&value.name);
            format!(r#"<TR><TD ALIGN="LEFT">{}</TD></TR>"#, escape(text))
        }));

        let label = format!("{}:{}", owner.name, field.name);
        let mut block = node_declaration(&pseudo_name, &pseudo_id, &rows);
        block.push_str(&edge_statement(
            &format!("\"{}\":\"{}\"", owner.name, field.name),
            &pseudo_name,
            &ids::edge_id(&field.id, &pseudo_id),
            &[("label", label.as_str())],
        ));
        Some(block)
    }
}

fn node_declaration(name: &str, id: &str, rows: &[String]) -> String {
    let mut block = format!("  \"{name}\" [\n    id = \"{id}\"\n    label = {TABLE_OPEN}\n");
    for row in rows {
        block.push_str("      ");
        block.push_str(row);
        block.push('\n');
    }
    block.push_str("    </TABLE>>\n  ]\n");
    block
}

fn edge_statement(source: &str, target_name: &str, id: &str, attributes: &[(&str, &str)]) -> String {
    let mut statement = format!("  {source} -> \"{target_name}\" [\n    id = \"{id}\"\n");
    for (key, value) in attributes {
        statement.push_str(&format!("    {key} = \"{value}\"\n"));
    }
    statement.push_str("  ]\n");
    statement
}

fn title_row(title_id: &str, ty: &SchemaType) -> String {
    let kind_label = match ty.tag() {
        KindTag::Object => String::new(),
        tag => format!("&lt;&lt;{}&gt;&gt;", tag.as_str().to_lowercase()),
    };

    format!(
        r#"<TR><TD CELLPADDING="4" {}><FONT POINT-SIZE="18">{}</FONT><BR/>{}</TD></TR>"#,
        html_id(title_id),
        escape(&ty.name),
        kind_label
    )
}

fn field_row(graph: &TypeGraph<'_>, field: &SchemaField) -> String {
    let deprecated = if field.is_deprecated { text("{D}") } else { String::new() };
    let relay = if field.relay_type.is_some() { text("{R}") } else { String::new() };
    let (prefix, suffix) = stringify_wrappers(&field.type_wrappers);

    format!(
        concat!(
            r#"<TR><TD {} ALIGN="LEFT" PORT="{}">"#,
            r#"<TABLE CELLPADDING="0" CELLSPACING="0" BORDER="0"><TR>"#,
            r#"<TD ALIGN="LEFT">{}<FONT>  </FONT></TD>"#,
            r#"<TD ALIGN="RIGHT">{}{}{}{}{}</TD>"#,
            r#"</TR></TABLE></TD></TR>"#
        ),
        html_id(&field.id),
        field.name,
        field.name,
        deprecated,
        relay,
        text(&prefix),
        escape(&graph.schema().ty(field.ty).name),
        text(&suffix)
    )
}

fn relation_rows(heading: &str, relations: &[TypeRelation], graph: &TypeGraph<'_>) -> Vec<String> {
    if relations.is_empty() {
        return vec![];
    }

    let mut rows = vec![format!("<TR><TD>{heading}</TD></TR>")];
    rows.extend(relations.iter().map(|relation| {
        let name = &graph.schema().ty(relation.ty).name;
        format!(
            r#"<TR><TD {} ALIGN="LEFT" PORT="{}">{}</TD></TR>"#,
            html_id(&relation.id),
            name,
            name
        )
    }));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pipeline::{build_schema, SchemaOptions},
        schema::SchemaGraph,
        introspection::TypeKind,
        tests::testkit::{
            doc, enum_type, field, init_logger, named, object, pets_introspection,
            relay_introspection, scalar,
        },
        type_graph::DisplayOptions,
    };
    use pretty_assertions::assert_eq;

    fn pets_schema() -> SchemaGraph {
        build_schema(&pets_introspection(), &SchemaOptions::default()).unwrap()
    }

    fn focus_on(name: &str) -> DisplayOptions {
        DisplayOptions {
            focus_on: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn declares_nodes_and_field_edges() {
        init_logger();
        let schema = pets_schema();
        let dot = render_dot(&TypeGraph::new(&schema, &DisplayOptions::default()));

        assert!(dot.starts_with("digraph {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("  \"Pet\" [\n    id = \"TYPE::Pet\"\n"));
        assert!(dot.contains(
            "  \"Pet\":\"owner\" -> \"Owner\" [\n    id = \"FIELD::Pet::owner => TYPE::Owner\"\n    label = \"Pet:owner\"\n  ]\n"
        ));
        assert!(dot.contains(r#"HREF="remove_me_url" ID="FIELD::Owner::pets" ALIGN="LEFT" PORT="pets""#));
        assert!(!dot.contains("\"PetKind\" ["));
    }

    #[test]
    fn wraps_list_brackets_in_font_tags() {
        let schema = pets_schema();
        let dot = render_dot(&TypeGraph::new(&schema, &DisplayOptions::default()));

        assert!(dot.contains("<FONT>[</FONT>Pet<FONT>!&#93;!</FONT>"));
    }

    #[test]
    fn union_members_get_rows_and_dashed_edges() {
        let schema = pets_schema();
        let dot = render_dot(&TypeGraph::new(&schema, &DisplayOptions::default()));

        assert!(dot.contains("<TR><TD>possible settings</TD></TR>"));
        assert!(dot.contains(
            "  \"SearchResult\":\"Pet\" -> \"Pet\" [\n    id = \"POSSIBLE_TYPE::SearchResult::Pet => TYPE::Pet\"\n    style = \"dashed\"\n  ]\n"
        ));
        assert!(dot.contains("&lt;&lt;union&gt;&gt;"));
    }

    #[test]
    fn enum_fields_fan_out_into_pseudo_nodes() {
        let schema = pets_schema();
        let dot = render_dot(&TypeGraph::new(&schema, &DisplayOptions::default()));

        assert!(dot.contains("  \"Pet::kind::enumValues\" [\n    id = \"ENUM_VALUES::Pet::kind\"\n"));
        assert!(dot.contains(r#"<TR><TD ALIGN="LEFT">A cat</TD></TR>"#));
        assert!(dot.contains(r#"<TR><TD ALIGN="LEFT">DOG</TD></TR>"#));
        assert!(dot.contains("id = \"FIELD::Pet::kind => ENUM_VALUES::Pet::kind\""));
        assert_eq!(
            dot.matches("\"Pet::kind::enumValues\" [\n    id = \"ENUM_VALUES::Pet::kind\"").count(),
            1
        );
    }

    #[test]
    fn shared_enum_gets_one_pseudo_node_per_owner_field() {
        let document = doc(
            "Query",
            vec![
                object("Query", vec![field("dog", named(TypeKind::Object, "Dog"))]),
                object(
                    "Dog",
                    vec![
                        field("mood", named(TypeKind::Enum, "Mood")),
                        field("usualMood", named(TypeKind::Enum, "Mood")),
                    ],
                ),
                enum_type("Mood", &[("HAPPY", Some("Tail <wagging>")), ("SAD", None)]),
                scalar("String"),
            ],
        );
        let schema = build_schema(&document, &SchemaOptions::default()).unwrap();
        let dot = render_dot(&TypeGraph::new(&schema, &DisplayOptions::default()));

        for field in ["mood", "usualMood"] {
            assert!(dot.contains(&format!("id = \"ENUM_VALUES::Dog::{field}\"")), "{field}");
        }
        assert_eq!(dot.matches(r#"<TR><TD ALIGN="LEFT">SAD</TD></TR>"#).count(), 2);
        assert!(dot.contains(r#"<TR><TD ALIGN="LEFT">Tail &lt;wagging&gt;</TD></TR>"#));
        assert!(!dot.contains("\"Mood\" ["));
    }

    #[test]
    fn hiding_leaf_fields_drops_scalar_rows_and_enum_nodes() {
        let schema = pets_schema();
        let options = DisplayOptions {
            show_leaf_fields: false,
            ..Default::default()
        };
        let dot = render_dot(&TypeGraph::new(&schema, &options));

        assert!(!dot.contains("ID=\"FIELD::Pet::name\""));
        assert!(dot.contains("ID=\"FIELD::Pet::owner\""));
        assert!(!dot.contains("ENUM_VALUES::"));
    }

    #[test]
    fn subattributes_off_keeps_rows_of_identity_types_only() {
        let schema = pets_schema();
        let options = DisplayOptions {
            show_subattributes: false,
            ..Default::default()
        };
        let dot = render_dot(&TypeGraph::new(&schema, &options));

        assert!(dot.contains("ID=\"FIELD::Pet::name\""));
        assert!(!dot.contains("ID=\"FIELD::Query::pets\""));
        // rows are gone, so the edge leaves the node instead of the port
        assert!(dot.contains("  \"Query\" -> \"Pet\" [\n    id = \"TYPE::Query => TYPE::Pet\"\n"));
    }

    #[test]
    fn focus_mode_hides_rows_of_unreachable_types() {
        let schema = pets_schema();
        let dot = render_dot(&TypeGraph::new(&schema, &focus_on("Owner")));

        // Owner -> Pet -> Owner
        assert!(dot.contains("ID=\"FIELD::Pet::name\""));
        assert!(dot.contains("ID=\"FIELD::Owner::name\""));
        assert!(!dot.contains("ID=\"FIELD::Query::pets\""));
    }

    #[test]
    fn focus_mode_draws_one_edge_per_pair() {
        let schema = pets_schema();
        let dot = render_dot(&TypeGraph::new(&schema, &focus_on("Pet")));

        // Query.pets and Query.pet both point at Pet, only the first is drawn
        assert!(dot.contains("id = \"TYPE::Query => TYPE::Pet\""));
        assert_eq!(dot.matches("-> \"Pet\" [\n    id = \"TYPE::Query").count(), 1);
        assert_eq!(dot.matches("\"Pet\":\"owner\" -> \"Owner\"").count(), 1);
    }

    #[test]
    fn missing_focus_type_is_unreachable() {
        let schema = pets_schema();
        let graph = TypeGraph::new(&schema, &focus_on("Nope"));
        let mut context = DotContext::new(&graph);

        for (idx, _) in graph.nodes() {
            assert!(!context.is_reachable_from_focused(idx));
        }
    }

    #[test]
    fn reachability_cache_does_not_change_answers() {
        let schema = build_schema(&relay_introspection(), &SchemaOptions::default()).unwrap();
        let pets = pets_schema();

        for (schema, focus) in [(&pets, "Pet"), (&pets, "Query"), (&schema, "User")] {
            let graph = TypeGraph::new(schema, &focus_on(focus));
            let mut warm = DotContext::new(&graph);
            let candidates = graph.nodes().map(|(idx, _)| idx).collect::<Vec<_>>();

            let first_pass = candidates
                .iter()
                .map(|idx| warm.is_reachable_from_focused(*idx))
                .collect::<Vec<_>>();
            let warm_pass = candidates
                .iter()
                .map(|idx| warm.is_reachable_from_focused(*idx))
                .collect::<Vec<_>>();
            let cold_pass = candidates
                .iter()
                .map(|idx| DotContext::new(&graph).is_reachable_from_focused(*idx))
                .collect::<Vec<_>>();

            assert_eq!(first_pass, warm_pass, "{focus}");
            assert_eq!(first_pass, cold_pass, "{focus}");
        }
    }

    #[test]
    fn renders_do_not_share_state() {
        let pets = pets_schema();
        let relay = build_schema(&relay_introspection(), &SchemaOptions::default()).unwrap();
        let pets_graph = TypeGraph::new(&pets, &focus_on("Pet"));
        let relay_graph = TypeGraph::new(&relay, &focus_on("User"));

        let pets_alone = render_dot(&pets_graph);
        let _ = render_dot(&relay_graph);
        let pets_again = render_dot(&pets_graph);

        assert_eq!(pets_alone, pets_again);
        assert!(!pets_again.contains("TYPE::User"));
    }

    #[test]
    fn relay_fields_are_marked() {
        let schema = build_schema(&relay_introspection(), &SchemaOptions::default()).unwrap();
        let dot = render_dot(&TypeGraph::new(&schema, &DisplayOptions::default()));

        assert!(dot.contains("<FONT>{R}</FONT><FONT>[</FONT>User<FONT>&#93;</FONT>"));
        assert!(!dot.contains("\"UserConnection\" ["));
    }
}
