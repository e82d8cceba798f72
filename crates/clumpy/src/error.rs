//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! precondition violations, malformed or unsupported `.npy` data, array shape mismatches,
//! IO, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("malformed npy data: {0}")]
    Format(String),

    #[error("unsupported dtype '{descr}'")]
    UnsupportedDtype { descr: String },

    #[error("{what} has wrong shape: expected {expected}, found {found:?}")]
    Shape {
        what: String,
        expected: String,
        found: Vec<usize>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn shape(what: &str, expected: &str, found: &[usize]) -> Self {
        Error::Shape {
            what: what.to_owned(),
            expected: expected.to_owned(),
            found: found.to_vec(),
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
