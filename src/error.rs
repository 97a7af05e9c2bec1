//! Unified error type for all catalog operations.

/// Things that can go wrong when using the catalog.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// File system problem (read, write, rename).
    Io(String),
    /// Failed to serialize the product list to bytes.
    Serialize(String),
    /// The backing file exists but does not hold a valid product list.
    Deserialize(String),
    /// Bad configuration (empty path, etc.).
    Config(String),
    /// A required field is missing, empty, zero or of the wrong type.
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// No product carries this id.
    NotFound {
        /// The id that was looked up.
        id: u64,
    },
    /// An update tried to change a store-managed field.
    ImmutableField(&'static str),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::Deserialize(msg) => write!(f, "deserialization error: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Validation { field, reason } => {
                write!(f, "invalid product: field `{field}` {reason}")
            }
            Error::NotFound { id } => write!(f, "product with id {id} not found"),
            Error::ImmutableField(field) => write!(f, "field `{field}` cannot be updated"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            // a type mismatch is as corrupt as bad syntax
            Error::Deserialize(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
