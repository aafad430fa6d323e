//! This module contains the primary error type for the decoder's interface.
//! It also re-exports the more specific error types that are
//! subsystem-specific.

pub mod decode;
pub mod storage;
pub mod unpack;

use thiserror::Error;

/// The interface result type for the library.
///
/// # Usage
///
/// Any function considered to be part of the public interface of the library
/// should return this result type. Subsystems should return the more-specific
/// child error types as appropriate.
pub type Result<T> = std::result::Result<T, Error>;

/// The interface error type for the library.
///
/// All errors returned from the library interface (and hence encountered by
/// the clients of the library) should be members of this enum.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    /// Errors that come from metadata construction and value decoding.
    #[error(transparent)]
    Decode(#[from] decode::Error),

    /// Errors from the storage reconciliation subsystem of the library.
    #[error(transparent)]
    Storage(#[from] storage::Error),

    /// Errors from the PACKed-byte unpacking subsystem of the library.
    #[error(transparent)]
    Unpack(#[from] unpack::Error),

    /// An unknown error, represented as a string.
    #[error("Unknown Error: {_0:?}")]
    Other(String),
}

impl Error {
    /// Constructs an unknown error with the provided `message`.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
