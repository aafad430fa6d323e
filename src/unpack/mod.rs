//! This module contains the PACKed-byte unpacker: decoding of serialized
//! scalars (addresses, keys, signatures, chain ids) and of full packed
//! expressions back into structured, human-readable form.
//!
//! Every scalar rule validates the exact hex length of its input before
//! attempting a decode and fails with a length-mismatch error otherwise, so
//! a wrong-sized input can never decode into the wrong kind.

pub mod base58;
pub mod rawbytes;

use crate::{
    constant::{
        ADDRESS_HEX_LENGTH,
        CHAIN_ID_HEX_LENGTH,
        KEY_HASH_HEX_LENGTH,
        KT_PREFIX,
        KT_SUFFIX,
        MAX_PRINTABLE_ASCII,
        MIN_PRINTABLE_ASCII,
        PACKED_EXPR_PREFIX,
        PUBLIC_KEY_CURVE_HEX_LENGTH,
        PUBLIC_KEY_ED25519_HEX_LENGTH,
        SIGNATURE_HEX_LENGTH,
    },
    error::unpack::{Error, Result},
    formatter,
    unpack::base58::prefix,
};

/// Decodes a PACKed public key: an ed25519 key of 66 hex characters or a
/// secp256k1/p256 key of 68, selected by the leading curve tag.
///
/// # Errors
///
/// Returns [`Err`] on a length mismatch or an unknown curve tag.
pub fn public_key(input: &str) -> Result<String> {
    if input.len() != PUBLIC_KEY_ED25519_HEX_LENGTH && input.len() != PUBLIC_KEY_CURVE_HEX_LENGTH {
        return Err(length_mismatch(
            "PublicKey",
            input,
            format!("{PUBLIC_KEY_ED25519_HEX_LENGTH} or {PUBLIC_KEY_CURVE_HEX_LENGTH}"),
        ));
    }

    let bytes = hex::decode(input)?;
    let (tag, body) = split_tag(&bytes)?;
    let encoded = match tag {
        0x00 => base58::encode_check(prefix::EDPK, body),
        0x01 => base58::encode_check(prefix::SPPK, body),
        0x02 => base58::encode_check(prefix::P2PK, body),
        tag => return Err(Error::UnknownCurveTag { tag }),
    };
    Ok(encoded)
}

/// Decodes a PACKed key hash (42 hex characters) into its `tz1`/`tz2`/`tz3`
/// rendering.
///
/// # Errors
///
/// Returns [`Err`] on a length mismatch or an unknown curve tag.
pub fn key_hash(input: &str) -> Result<String> {
    if input.len() != KEY_HASH_HEX_LENGTH {
        return Err(length_mismatch(
            "KeyHash",
            input,
            KEY_HASH_HEX_LENGTH.to_string(),
        ));
    }

    let bytes = hex::decode(input)?;
    let (tag, body) = split_tag(&bytes)?;
    let encoded = match tag {
        0x00 => base58::encode_check(prefix::TZ1, body),
        0x01 => base58::encode_check(prefix::TZ2, body),
        0x02 => base58::encode_check(prefix::TZ3, body),
        tag => return Err(Error::UnknownCurveTag { tag }),
    };
    Ok(encoded)
}

/// Decodes a PACKed address (44 hex characters): the `01…00` sentinel bytes
/// denote an originated contract, anything else an implicit account.
///
/// # Errors
///
/// Returns [`Err`] on a length mismatch or an unknown curve tag.
pub fn address(input: &str) -> Result<String> {
    if input.len() != ADDRESS_HEX_LENGTH {
        return Err(length_mismatch(
            "Address",
            input,
            ADDRESS_HEX_LENGTH.to_string(),
        ));
    }

    ensure_single_byte_chars(input)?;
    if input.starts_with(KT_PREFIX) && input.ends_with(KT_SUFFIX) {
        let bytes = hex::decode(&input[KT_PREFIX.len()..input.len() - KT_SUFFIX.len()])?;
        return Ok(base58::encode_check(prefix::KT1, &bytes));
    }

    key_hash(&input[2..])
}

/// Decodes a PACKed signature (128 hex characters) into the curve-agnostic
/// `sig` rendering.
///
/// # Errors
///
/// Returns [`Err`] on a length mismatch.
pub fn signature(input: &str) -> Result<String> {
    if input.len() != SIGNATURE_HEX_LENGTH {
        return Err(length_mismatch(
            "Signature",
            input,
            SIGNATURE_HEX_LENGTH.to_string(),
        ));
    }

    let bytes = hex::decode(input)?;
    Ok(base58::encode_check(prefix::SIG, &bytes))
}

/// Decodes a PACKed chain id (8 hex characters) into the `Net` rendering.
///
/// # Errors
///
/// Returns [`Err`] on a length mismatch.
pub fn chain_id(input: &str) -> Result<String> {
    if input.len() != CHAIN_ID_HEX_LENGTH {
        return Err(length_mismatch(
            "ChainID",
            input,
            CHAIN_ID_HEX_LENGTH.to_string(),
        ));
    }

    let bytes = hex::decode(input)?;
    Ok(base58::encode_check(prefix::NET, &bytes))
}

/// Decodes a PACKed contract reference: an address optionally followed by a
/// raw entrypoint name, rendered as `address%entrypoint`.
///
/// # Errors
///
/// Returns [`Err`] if the leading address cannot be decoded or the suffix is
/// not valid hex.
pub fn contract(input: &str) -> Result<String> {
    if input.len() < ADDRESS_HEX_LENGTH {
        return Err(length_mismatch(
            "Contract",
            input,
            format!("at least {ADDRESS_HEX_LENGTH}"),
        ));
    }

    ensure_single_byte_chars(input)?;
    let decoded = address(&input[..ADDRESS_HEX_LENGTH])?;
    if input.len() == ADDRESS_HEX_LENGTH {
        return Ok(decoded);
    }

    let tail = hex::decode(&input[ADDRESS_HEX_LENGTH..])?;
    let entrypoint = String::from_utf8(tail).map_err(|_| Error::InvalidString)?;
    Ok(format!("{decoded}%{entrypoint}"))
}

/// Renders an opaque byte blob as the most useful string available.
///
/// Three tiers, in order: a payload carrying the generic packed-expression
/// marker is decoded and pretty-printed as Michelson; otherwise bytes that
/// are printable ASCII are shown as text; otherwise the original hex is
/// returned unchanged. This never fails.
#[must_use]
pub fn bytes(input: &str) -> String {
    if let Some(payload) = input.strip_prefix(PACKED_EXPR_PREFIX) {
        if let Ok(node) = rawbytes::to_micheline(payload) {
            return formatter::format_default(&node);
        }
    }

    if let Ok(decoded) = hex::decode(input) {
        if is_printable_ascii(&decoded) {
            if let Ok(text) = String::from_utf8(decoded) {
                return text;
            }
        }
    }

    input.to_owned()
}

/// Checks whether every byte is printable ASCII.
#[must_use]
pub fn is_printable_ascii(input: &[u8]) -> bool {
    !input.is_empty()
        && input
            .iter()
            .all(|b| (MIN_PRINTABLE_ASCII..=MAX_PRINTABLE_ASCII).contains(b))
}

/// The byte-indexed slicing above is only sound on single-byte characters;
/// multi-byte UTF-8 in a malformed input must fail as invalid hex instead of
/// panicking on a char boundary.
fn ensure_single_byte_chars(input: &str) -> Result<()> {
    if input.is_ascii() {
        Ok(())
    } else {
        Err(Error::InvalidHex(input.to_owned()))
    }
}

fn split_tag(bytes: &[u8]) -> Result<(u8, &[u8])> {
    match bytes.split_first() {
        Some((tag, body)) => Ok((*tag, body)),
        None => Err(Error::Truncated { reading: "curve tag" }),
    }
}

fn length_mismatch(kind: &'static str, input: &str, expected: String) -> Error {
    Error::LengthMismatch {
        kind,
        input: input.to_owned(),
        expected,
        actual: input.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::{address, bytes, chain_id, contract, key_hash, public_key, signature};

    #[test]
    fn contract_addresses_decode_as_kt1() -> anyhow::Result<()> {
        let input = format!("01{}00", "ab".repeat(20));
        assert!(address(&input)?.starts_with("KT1"));
        Ok(())
    }

    #[test]
    fn implicit_addresses_decode_per_curve() -> anyhow::Result<()> {
        let input = format!("0000{}", "cd".repeat(20));
        assert!(address(&input)?.starts_with("tz1"));

        let input = format!("0002{}", "cd".repeat(20));
        assert!(address(&input)?.starts_with("tz3"));
        Ok(())
    }

    #[test]
    fn key_hashes_decode_at_exactly_42_chars() -> anyhow::Result<()> {
        let input = format!("00{}", "ef".repeat(20));
        assert!(key_hash(&input)?.starts_with("tz1"));
        Ok(())
    }

    #[test]
    fn wrong_lengths_fail_rather_than_misdecode() {
        assert!(public_key("0011").is_err());
        assert!(key_hash("0011").is_err());
        assert!(address("0011").is_err());
        assert!(signature("0011").is_err());
        assert!(chain_id("0011223344").is_err());
    }

    #[test]
    fn multi_byte_characters_fail_as_invalid_hex() {
        // 22 two-byte characters pass the 44-byte length gate.
        let input = "é".repeat(22);
        assert!(address(&input).is_err());
        assert!(contract(&input).is_err());
    }

    #[test]
    fn packed_expressions_pretty_print() {
        // 05 marker, then the string "abc".
        let input = "050100000003616263";
        assert_eq!(bytes(input), "\"abc\"");
    }

    #[test]
    fn ascii_bytes_render_as_text() {
        assert_eq!(bytes("68656c6c6f"), "hello");
    }

    #[test]
    fn opaque_bytes_pass_through() {
        assert_eq!(bytes("c0ffee"), "c0ffee");
    }
}
