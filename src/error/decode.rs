//! This module contains errors pertaining to metadata construction and to the
//! type-directed decoding of Micheline values into display trees.

use thiserror::Error;

/// Errors that occur while building type-tree metadata or while decoding a
/// value against it.
///
/// `UnknownPath` is the dominant error class surfaced to callers of the
/// decoder: it means the value tree and the type tree disagree about their
/// shape, which indicates a protocol or type-tree bug rather than bad input.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// A bin path was requested that the metadata builder never assigned.
    #[error("Unknown metadata path: {path}")]
    UnknownPath { path: String },

    /// A decoded value does not match the shape its slot's type demands.
    #[error("Invalid field type at {path}: expected {expected}")]
    InvalidFieldType { path: String, expected: &'static str },

    /// A decoded map key cannot be rendered as a key string.
    #[error("Invalid map key type: {reason}")]
    InvalidKeyType { reason: String },

    /// The input is not a well-formed Micheline expression.
    #[error("Malformed Micheline expression: {reason}")]
    MalformedExpression { reason: String },
}

impl Error {
    /// Constructs an [`Error::UnknownPath`] for the provided `path`.
    pub fn unknown_path(path: impl Into<String>) -> Self {
        Self::UnknownPath { path: path.into() }
    }

    /// Constructs an [`Error::InvalidFieldType`] for the provided `path`.
    pub fn invalid_field_type(path: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidFieldType {
            path: path.into(),
            expected,
        }
    }

    /// Constructs an [`Error::MalformedExpression`] with the provided
    /// `reason`.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedExpression {
            reason: reason.into(),
        }
    }
}

/// The result type for operations that may fail with decode errors.
pub type Result<T> = std::result::Result<T, Error>;
