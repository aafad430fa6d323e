//! This module contains constants that are needed throughout the codebase.

/// The length in hex characters of a PACKed signature.
pub const SIGNATURE_HEX_LENGTH: usize = 128;

/// The length in hex characters of a PACKed chain id.
pub const CHAIN_ID_HEX_LENGTH: usize = 8;

/// The length in hex characters of a PACKed address (implicit or originated).
pub const ADDRESS_HEX_LENGTH: usize = 44;

/// The length in hex characters of a PACKed key hash.
pub const KEY_HASH_HEX_LENGTH: usize = 42;

/// The length in hex characters of a PACKed ed25519 public key.
pub const PUBLIC_KEY_ED25519_HEX_LENGTH: usize = 66;

/// The length in hex characters of a PACKed secp256k1 or p256 public key.
pub const PUBLIC_KEY_CURVE_HEX_LENGTH: usize = 68;

/// The leading hex byte marking an originated (contract) address inside a
/// PACKed address.
pub const KT_PREFIX: &str = "01";

/// The trailing hex byte of an originated (contract) address inside a PACKed
/// address.
pub const KT_SUFFIX: &str = "00";

/// The marker byte, as hex, that prefixes every PACKed expression.
pub const PACKED_EXPR_PREFIX: &str = "05";

/// The lowest byte value considered printable when interpreting raw bytes as
/// ASCII text.
pub const MIN_PRINTABLE_ASCII: u8 = 32;

/// The highest byte value considered printable when interpreting raw bytes as
/// ASCII text.
pub const MAX_PRINTABLE_ASCII: u8 = 126;

/// The bin path assigned to the root of every type tree.
pub const ROOT_PATH: &str = "0";

/// The bin path at which early-epoch protocols embed a contract's single
/// big-map.
pub const ALPHA_BIG_MAP_PATH: &str = "0/0";

/// The separator between the components of a compound (pair-typed) map key
/// when it is rendered as a single string.
pub const COMPOUND_KEY_SEPARATOR: &str = "@";

/// The default line width used when pretty-printing Micheline expressions as
/// Michelson source.
pub const DEFAULT_LINE_SIZE: usize = 100;

/// The number of bytes in a script-expression hash digest.
pub const SCRIPT_EXPR_HASH_BYTES: usize = 32;

/// The number of checksum bytes appended by the base58check encoding.
pub const BASE58_CHECKSUM_BYTES: usize = 4;
