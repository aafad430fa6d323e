//! This module contains errors pertaining to the decoding of PACKed byte
//! strings back into structured values.

use thiserror::Error;

/// Errors that occur while unpacking serialized scalars and expressions.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The input's hex length does not match any encoding of the claimed
    /// kind. Returned instead of ever producing a wrong decode.
    #[error("[{kind}] Wrong length of {input}. Expected {expected}, Got: {actual}")]
    LengthMismatch {
        kind:     &'static str,
        input:    String,
        expected: String,
        actual:   usize,
    },

    /// The input is not valid hex.
    #[error("Invalid hex input: {_0}")]
    InvalidHex(String),

    /// The binary expression ended before the current atom was complete.
    #[error("Truncated input while reading {reading}")]
    Truncated { reading: &'static str },

    /// The binary expression began with a tag byte outside the codec.
    #[error("Unknown expression tag: 0x{tag:02x}")]
    UnknownTag { tag: u8 },

    /// A primitive index has no entry in the canonical primitive table.
    #[error("Unknown primitive index: {index}")]
    UnknownPrimIndex { index: u8 },

    /// A primitive cannot be written because it has no index in the canonical
    /// primitive table (for example a synthetic macro primitive).
    #[error("Primitive {prim} has no binary encoding")]
    UnencodablePrim { prim: String },

    /// A decoded string atom is not valid UTF-8.
    #[error("String atom is not valid UTF-8")]
    InvalidString,

    /// An unknown curve tag was found inside a packed key or address.
    #[error("Unknown curve tag: 0x{tag:02x}")]
    UnknownCurveTag { tag: u8 },
}

impl From<hex::FromHexError> for Error {
    fn from(value: hex::FromHexError) -> Self {
        Self::InvalidHex(value.to_string())
    }
}

/// The result type for operations that may fail with unpack errors.
pub type Result<T> = std::result::Result<T, Error>;
