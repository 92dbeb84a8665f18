use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reason a mutator refused an operation.
/// The state handed to the mutator is left as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("prefix {0} is already announced")]
    DuplicatePrefix(String),
    #[error("peer {0} already exists")]
    DuplicatePeer(String),
    #[error("invalid peer ASN {0:?}")]
    InvalidAsn(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("rejected: {0}")]
    ValidationRejected(#[from] Rejection),
    #[error("storage unavailable ({path:?}): {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("decode failure: {0}")]
    DecodeFailure(#[from] serde_json::Error),
    #[error("invalid server config: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

impl Error {
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::StorageUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Rejections are local no-ops, everything else is a failed operation
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::ValidationRejected(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
