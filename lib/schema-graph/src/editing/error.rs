#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Cannot name type '{0}' '{1}': another type already uses that name")]
    TypeNameTaken(String, String),
    #[error("The root type cannot be deleted")]
    CannotDeleteRoot,
    #[error("No scalar type is left to take over references to '{0}'")]
    NoFallbackScalar(String),
    #[error("Type '{0}' does not exist or is not an object or union")]
    UnknownType(String),
}
