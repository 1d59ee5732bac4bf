use mygit_types::{ObjectId, TypeError};

use crate::object::ObjectKind;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(String),

    /// Header, size field, tree entry boundary, or compressed stream could
    /// not be parsed.
    #[error("malformed object: {0}")]
    MalformedObject(String),

    /// An abbreviated address matched more than one stored object.
    #[error("ambiguous object prefix {prefix}: {} candidates", .candidates.len())]
    AmbiguousPrefix {
        prefix: String,
        candidates: Vec<ObjectId>,
    },

    /// A kind tag that cannot be written into an object header.
    #[error("invalid object kind {0:?}")]
    InvalidKind(String),

    /// The caller-supplied address is not usable.
    #[error("invalid object address: {0}")]
    InvalidAddress(String),

    /// The object exists but is not of the requested kind.
    #[error("object {id} is a {actual}, expected {expected}")]
    UnexpectedKind {
        id: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedObject(reason.into())
    }

    /// Returns `true` for the not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        Self::InvalidAddress(err.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
