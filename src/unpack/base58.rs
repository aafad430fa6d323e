//! This module contains the base58check rendering used for addresses, keys,
//! signatures, chain ids and script-expression hashes.
//!
//! The inputs here are at most a few dozen bytes, so the encoding runs plain
//! byte-wise long division rather than pulling in a bignum.

use sha2::{Digest, Sha256};

use crate::constant::BASE58_CHECKSUM_BYTES;

/// The base58 alphabet, in value order.
const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// The domain prefixes prepended before encoding so that each kind of value
/// renders with its well-known human-readable lead-in.
pub mod prefix {
    /// Implicit account hashes per curve: `tz1`, `tz2`, `tz3`.
    pub const TZ1: &[u8] = &[6, 161, 159];
    pub const TZ2: &[u8] = &[6, 161, 161];
    pub const TZ3: &[u8] = &[6, 161, 164];

    /// Originated contract hashes: `KT1`.
    pub const KT1: &[u8] = &[2, 90, 121];

    /// Public keys per curve: `edpk`, `sppk`, `p2pk`.
    pub const EDPK: &[u8] = &[13, 15, 37, 217];
    pub const SPPK: &[u8] = &[3, 254, 226, 86];
    pub const P2PK: &[u8] = &[3, 178, 139, 127];

    /// Curve-agnostic signatures: `sig`.
    pub const SIG: &[u8] = &[4, 130, 43];

    /// Chain ids: `Net`.
    pub const NET: &[u8] = &[87, 82, 0];

    /// Script expression hashes: `expr`.
    pub const EXPR: &[u8] = &[13, 44, 64, 27];
}

/// Encodes `payload` with the provided domain `prefix` and a four-byte
/// double-SHA256 checksum.
#[must_use]
pub fn encode_check(prefix: &[u8], payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(prefix.len() + payload.len() + BASE58_CHECKSUM_BYTES);
    data.extend_from_slice(prefix);
    data.extend_from_slice(payload);

    let checksum = Sha256::digest(Sha256::digest(&data));
    data.extend_from_slice(&checksum[..BASE58_CHECKSUM_BYTES]);

    encode(&data)
}

fn encode(bytes: &[u8]) -> String {
    let leading_zeros = bytes.iter().take_while(|b| **b == 0).count();

    let mut digits: Vec<u8> = Vec::new();
    for &byte in &bytes[leading_zeros..] {
        let mut carry = u32::from(byte);
        for digit in &mut digits {
            carry += u32::from(*digit) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(leading_zeros + digits.len());
    for _ in 0..leading_zeros {
        out.push('1');
    }
    for &digit in digits.iter().rev() {
        out.push(char::from(ALPHABET[usize::from(digit)]));
    }
    out
}
