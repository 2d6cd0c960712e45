use serde_derive::{Deserialize, Serialize};

use crate::mvcc::Version;

/// The xmax of a record that has not been deleted.
pub const LIVE: Version = 0;

/// A single immutable version of a key's value. Once appended to a chain a
/// record is never mutated: an update or delete appends a new record instead,
/// and a deletion is a copy of the prior record carrying the deleting
/// transaction in `xmax` (a tombstone).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The stored value, an opaque byte string.
    pub value: Vec<u8>,

    /// The transaction that inserted this version. Never the zero sentinel.
    pub xmin: Version,

    /// The transaction that deleted this version, or [`LIVE`].
    pub xmax: Version,
}

impl Record {
    /// Creates a live record inserted by `xmin`.
    pub fn for_insert(value: Vec<u8>, xmin: Version) -> Self {
        Self { value, xmin, xmax: LIVE }
    }
}
