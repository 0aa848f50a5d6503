use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Preference profile contributed no usable fields")]
    EmptyProfile,

    #[error("Similarity undefined for {0}: zero-norm vector")]
    UndefinedSimilarity(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Malformed or inconsistent input documents.
///
/// Raised while loading the corpus (the index is never partially built) and while
/// extracting fields from a preference profile.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("entry #{0} has no identifier")]
    MissingIdentifier(usize),

    #[error("entry #{0} has an empty identifier")]
    EmptyIdentifier(usize),

    #[error("identifier '{0}' appears more than once")]
    DuplicateIdentifier(String),

    #[error("entry #{position} is malformed: {reason}")]
    MalformedRecord { position: usize, reason: String },

    #[error("entry '{0}' has no vector")]
    MissingVector(String),

    #[error("entry '{0}' has a non-finite vector component")]
    NonFiniteComponent(String),

    #[error("entry '{identifier}' has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        identifier: String,
        expected: usize,
        actual: usize,
    },

    #[error("profile field '{field}' is malformed: {reason}")]
    MalformedProfile { field: String, reason: String },
}

impl Error {
    /// True for conditions caused by the caller's input rather than the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Schema(_)
                | Error::EmptyProfile
                | Error::UndefinedSimilarity(_)
                | Error::InvalidDimension { .. }
        )
    }
}
