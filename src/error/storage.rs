//! This module contains errors pertaining to the reconciliation of contract
//! storage and big-map diffs across protocol epochs.

use thiserror::Error;

use crate::error::{decode, unpack};

/// Errors that occur while parsing operation results into rich storage and
/// while splicing big-map contents back into storage snapshots.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// A big-map pointer observed in an operation result has no matching bin
    /// path in the contract's metadata. Fatal for that operation's storage
    /// decode; the caller logs and skips rather than crashing the batch.
    #[error("Invalid big map pointer value: {ptr}")]
    UnresolvedPointer { ptr: i64 },

    /// Two distinct bin paths resolved to the same big-map pointer while
    /// building the pointer map.
    #[error("Pointer already exists: {ptr}")]
    DuplicatePointer { ptr: i64 },

    /// A big-map slot in a storage snapshot holds something other than an
    /// integer pointer, so the snapshot and the metadata disagree about the
    /// protocol epoch.
    #[error("Path {bin_path} is not a big map pointer")]
    NotAPointer { bin_path: String },

    /// An expected retrieval produced zero results. Treated as "not
    /// applicable" by callers, e.g. no previous storage for a first write.
    #[error("Empty response: {description}")]
    EmptyResponse { description: String },

    /// The operation's protocol hash is not in the supported table.
    #[error("Unknown protocol: {protocol}")]
    UnknownProtocol { protocol: String },

    /// The operation content is missing a field the reconciler requires.
    #[error("Operation content is missing field: {field}")]
    MissingField { field: &'static str },

    /// The node fetch for post-origination storage failed.
    #[error("Storage fetch failed for {address} at level {level}: {message}")]
    Fetch {
        address: String,
        level:   i64,
        message: String,
    },

    /// Errors raised while navigating storage values by bin path.
    #[error(transparent)]
    Decode(#[from] decode::Error),

    /// Errors raised while packing keys for hashing.
    #[error(transparent)]
    Unpack(#[from] unpack::Error),
}

impl Error {
    /// Constructs an [`Error::EmptyResponse`] with the provided
    /// `description`.
    pub fn empty(description: impl Into<String>) -> Self {
        Self::EmptyResponse {
            description: description.into(),
        }
    }
}

/// The result type for operations that may fail with storage errors.
pub type Result<T> = std::result::Result<T, Error>;
