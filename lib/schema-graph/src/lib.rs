pub mod dot;
pub mod editing;
pub mod enrich;
pub mod error;
pub mod ids;
pub mod introspection;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod sdl;
pub mod simplified;
pub mod type_graph;

#[cfg(test)]
mod tests;

pub use dot::render_dot;
pub use editing::{delete_type, edit_type, edit_union_members, EditError, TypeEdit};
pub use enrich::{enrich_introspection, FAKE_ROOT_ID};
pub use error::SchemaError;
pub use introspection::IntrospectionDocument;
pub use pipeline::{build_schema, SchemaOptions};
pub use schema::SchemaGraph;
pub use sdl::{introspection_from_sdl, print_schema, SdlError};
pub use type_graph::{DisplayOptions, TypeGraph};
