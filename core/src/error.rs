use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    io::Error as IoError,
};

/// Errors that can occur while constructing or driving a fuzzy term enumeration.
#[derive(Debug)]
pub enum FuzzyMatchError {
    /// The enumerator was constructed with an out-of-range `s_min`, a negative prefix length, or
    /// another invalid parameter. Raised at construction time; no resources are allocated.
    ArgumentInvalid(String),

    /// The underlying term cursor failed. The enumerator must be discarded; its state is
    /// indeterminate.
    IndexIo(IoError),
}

impl Display for FuzzyMatchError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::ArgumentInvalid(message) => write!(f, "invalid argument: {message}"),
            Self::IndexIo(source) => write!(f, "term cursor I/O error: {source}"),
        }
    }
}

impl Error for FuzzyMatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ArgumentInvalid(_) => None,
            Self::IndexIo(source) => Some(source),
        }
    }
}

impl From<IoError> for FuzzyMatchError {
    fn from(source: IoError) -> Self {
        Self::IndexIo(source)
    }
}

/// A type alias for a `Result` with a [FuzzyMatchError].
pub type FuzzyResult<T> = Result<T, FuzzyMatchError>;
