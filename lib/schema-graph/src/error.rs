#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("Failed to process introspection JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Type '{0}' is referenced but not defined")]
    UnknownType(String),
    #[error("Type '{0}' is declared with wrapper kind '{1}'")]
    UnexpectedWrapperKind(String, crate::introspection::TypeKind),
    #[error("Reference in '{0}' does not end in a named type")]
    MalformedTypeRef(String),
    #[error("Root {0} type '{1}' was not found")]
    MissingRootType(&'static str, String),
}
