use serde_derive::{Deserialize, Serialize};

use crate::mvcc::Version;

/// mvkv errors. All variants except `Internal` are expected request-level
/// outcomes; `Internal` signals a broken invariant and is never expected in
/// normal operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Error {
    /// The key has no record visible to the caller.
    KeyNotFound,

    /// The given transaction id is not registered in the transaction table.
    TxnNotFound(Version),

    /// The given transaction is no longer active.
    TxnBadState(Version),

    /// A malformed client request.
    InvalidRequest(String),

    /// An internal invariant was violated.
    Internal(String),
}

/// mvkv result type.
pub type CResult<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
            Error::TxnNotFound(id) => write!(f, "transaction not found: {}", id),
            Error::TxnBadState(id) => write!(f, "transaction is not active: {}", id),
            Error::InvalidRequest(mesg) => write!(f, "{}", mesg),
            Error::Internal(mesg) => write!(f, "internal error: {}", mesg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Error::Internal(format!("mutex poisoned: {}", err))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(Error::TxnNotFound(3).to_string(), "transaction not found: 3");
        assert_eq!(Error::TxnBadState(7).to_string(), "transaction is not active: 7");
        assert_eq!(
            Error::InvalidRequest("invalid request".to_string()).to_string(),
            "invalid request"
        );
    }
}
