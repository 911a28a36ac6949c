#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SdlError {
    #[error("Failed to parse SDL: {0}")]
    Parse(String),
    #[error("Type '{0}' is referenced but not defined")]
    UnknownType(String),
    #[error("SDL defines no query type: add a schema definition or a type named 'Query'")]
    MissingQueryType,
}
