use thiserror::Error;

/// Canonical result for the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything a terminal call can report.
///
/// Errors are raised synchronously by the pull that detects them and are
/// never retried; evaluation is pure in-memory computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A reducer or accessor with no predicate ran over an empty sequence.
    #[error("sequence contains no elements")]
    EmptySequence,

    /// A predicate-qualified accessor found nothing.
    #[error("sequence contains no matching element")]
    NoMatch,

    #[error("sequence contains more than one matching element")]
    MultipleElementsMatch,

    #[error("index {index} is out of range for a sequence of {len} elements")]
    IndexOutOfRange { index: String, len: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("an element with the key {0} has already been added")]
    DuplicateKey(String),

    /// Two keys or values could not be compared (e.g. a NaN ordering key).
    #[error("values are not comparable: {0}")]
    TypeMismatch(String),

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// A new enumeration was opened on a single-pass source that already completed.
    #[error("single-pass sequence has already been enumerated")]
    ExhaustedSequence,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Hashing error: {0}")]
    Hash(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}
