//! This module tests the recovery of human-readable values from PACKed
//! bytes: scalar address forms, packed expressions and the fallbacks.
#![cfg(test)]

use michelson_decoder::{
    error::unpack::Error,
    unpack,
};

mod common;

#[test]
fn unpacks_an_implicit_account_key_hash() -> anyhow::Result<()> {
    let rendered = unpack::key_hash("002422090f872dfd3a39471bb23f180e6dfed030f3")?;

    assert!(rendered.starts_with("tz1"));
    assert_eq!(rendered.len(), 36);
    Ok(())
}

#[test]
fn unpacks_an_originated_contract_address() -> anyhow::Result<()> {
    let rendered = unpack::address("012422090f872dfd3a39471bb23f180e6dfed030f300")?;

    assert!(rendered.starts_with("KT1"));
    assert_eq!(rendered.len(), 36);
    Ok(())
}

#[test]
fn renders_contract_entrypoint_suffixes() -> anyhow::Result<()> {
    // "do" appended after the padded address is the called entrypoint.
    let rendered = unpack::contract("012422090f872dfd3a39471bb23f180e6dfed030f300646f")?;

    let (address, entrypoint) = rendered
        .split_once('%')
        .ok_or_else(|| anyhow::anyhow!("expected an entrypoint suffix"))?;
    assert!(address.starts_with("KT1"));
    assert_eq!(entrypoint, "do");
    Ok(())
}

#[test]
fn rejects_inputs_of_the_wrong_length() {
    let error = unpack::key_hash("0024").unwrap_err();

    assert!(matches!(error, Error::LengthMismatch { .. }));
}

#[test]
fn rejects_non_hex_bytes_without_panicking() {
    // Multi-byte characters reach the right byte length but must come back
    // as a decode error so one bad contract cannot abort a batch.
    let input = "é".repeat(22);
    let error = unpack::address(&input).unwrap_err();

    assert!(matches!(error, Error::InvalidHex(_)));
    assert!(matches!(
        unpack::contract(&input).unwrap_err(),
        Error::InvalidHex(_)
    ));
}

#[test]
fn rejects_unknown_curve_tags() {
    let error = unpack::key_hash("072422090f872dfd3a39471bb23f180e6dfed030f3").unwrap_err();

    assert!(matches!(error, Error::UnknownCurveTag { .. }));
}

#[test]
fn packed_expressions_pretty_print() {
    // 0x05 prefix, string tag, 4-byte length, then "abc".
    let rendered = unpack::bytes("050100000003616263");

    assert_eq!(rendered, "\"abc\"");
}

#[test]
fn printable_ascii_passes_through_decoded() {
    assert_eq!(unpack::bytes("68656c6c6f"), "hello");
}

#[test]
fn opaque_bytes_stay_hexadecimal() {
    assert_eq!(unpack::bytes("deadbeef"), "deadbeef");
}
