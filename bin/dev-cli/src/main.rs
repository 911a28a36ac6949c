//! Developer CLI driving the schema-graph pipeline end to end.

mod logger;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use schema_graph::{
    build_schema,
    editing::{self, add_new_type, clone_type, rename_type},
    enrich_introspection, ids, introspection_from_sdl, print_schema, render_dot,
    DisplayOptions, IntrospectionDocument, SchemaOptions, TypeGraph,
};
use schema_graph_config::{load_config, source::SourceFormat, SchemaGraphConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[clap(name = "schema-graph", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of `schema-graph.config.{yaml,yml,json,json5}`
    #[clap(long, global = true)]
    config: Option<String>,

    /// Schema to read: a `.json` introspection result or an SDL file.
    /// Defaults to the configured `source`.
    #[clap(long, short, global = true)]
    input: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dump the resolved, ID-keyed schema
    Schema,
    /// Dump the type graph nodes, fields and relations
    Graph,
    /// Print the diagram description
    Dot,
    /// Print the introspection result with the synthetic root added
    Enrich,
    /// Print the schema as SDL
    Sdl,
    /// Rename an object or union type
    RenameType { from: String, to: String },
    /// Delete a type, retargeting its references to a scalar
    DeleteType { name: String },
    /// Replace the members of a union
    UnionMembers {
        union: String,
        #[clap(required = true)]
        members: Vec<String>,
    },
    /// Add a fresh object type exposed on the synthetic root
    NewType,
    /// Copy an object type under a new name
    CloneType { name: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    logger::init(&config.log)?;

    let document = load_document(cli.input.as_deref(), &config)?;
    let options = DisplayOptions::from(&config.display);

    print!("{}", run(cli.command, &document, &options)?);

    Ok(())
}

fn load_document(
    input: Option<&Path>,
    config: &SchemaGraphConfig,
) -> anyhow::Result<IntrospectionDocument> {
    let (raw, format) = match input {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file '{}'", path.display()))?;
            let extension = path.extension().and_then(|ext| ext.to_str());
            (raw, SourceFormat::from_extension(extension))
        }
        None => {
            let source = config
                .source
                .as_ref()
                .context("No schema given: pass --input or configure a `source`")?;
            (source.load()?, source.format())
        }
    };

    let document = match format {
        SourceFormat::Introspection => IntrospectionDocument::from_json(&raw)?,
        SourceFormat::Sdl => introspection_from_sdl(&raw)?,
    };
    info!(types = document.schema().types.len(), "schema loaded");

    Ok(document)
}

/// Edits apply to the enriched document, the same one the graph is built from.
fn run(
    command: Command,
    document: &IntrospectionDocument,
    options: &DisplayOptions,
) -> anyhow::Result<String> {
    let enriched = || enrich_introspection(document);

    let edited = match command {
        Command::Schema => {
            let schema = build_schema(document, &SchemaOptions::from(options))?;
            return Ok(schema.to_string());
        }
        Command::Graph => {
            let schema = build_schema(document, &SchemaOptions::from(options))?;
            return Ok(TypeGraph::new(&schema, options).to_string());
        }
        Command::Dot => {
            let schema = build_schema(document, &SchemaOptions::from(options))?;
            return Ok(render_dot(&TypeGraph::new(&schema, options)));
        }
        Command::Sdl => return Ok(print_schema(document)),
        Command::Enrich => enriched(),
        Command::RenameType { from, to } => rename_type(&enriched(), &from, &to)?,
        Command::DeleteType { name } => editing::delete_type(&enriched(), &ids::type_id(&name))?,
        Command::UnionMembers { union, members } => {
            editing::edit_union_members(&enriched(), &ids::type_id(&union), &members)?
        }
        Command::NewType => {
            let (edited, type_id) = add_new_type(&enriched())?;
            info!(%type_id, "added type");
            edited
        }
        Command::CloneType { name } => {
            match clone_type(&enriched(), &ids::type_id(&name))? {
                Some((edited, type_id)) => {
                    info!(%type_id, "cloned type");
                    edited
                }
                None => bail!("'{}' is not an object type", name),
            }
        }
    };

    Ok(edited.to_json_pretty()? + "\n")
}
