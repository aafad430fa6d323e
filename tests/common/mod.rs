//! This module contains common utilities for simplifying the writing of
//! integration tests for this library.

#![cfg(test)]

use chrono::{TimeZone, Utc};
use michelson_decoder::{
    metadata::Metadata,
    micheline::Micheline,
    storage::OperationContext,
};

/// Initialises test logging from `RUST_LOG` so reconciliation warnings are
/// visible when a test fails. Safe to call from every test.
#[allow(unused)] // It is actually
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds the metadata map for a type tree given in JSON wire form.
#[allow(unused)] // It is actually
pub fn metadata(ty: &serde_json::Value) -> anyhow::Result<Metadata> {
    let ty = Micheline::from_json(ty)?;
    Ok(Metadata::build(&ty)?)
}

/// Parses a Micheline value from its JSON wire form.
#[allow(unused)] // It is actually
pub fn micheline(value: &serde_json::Value) -> anyhow::Result<Micheline> {
    Ok(Micheline::from_json(value)?)
}

/// Constructs a fixed operation context for stamping diffs in tests.
#[allow(unused)] // It is actually
pub fn operation_context() -> OperationContext {
    OperationContext {
        id: "test-operation".to_owned(),
        level: 800_000,
        network: "mainnet".to_owned(),
        protocol: "PsBabyM1eUXZseaJdmXFApDSBqj8YBfwELoxZHHW77EMcAbbwAS".to_owned(),
        timestamp: Utc.with_ymd_and_hms(2020, 1, 15, 12, 0, 0).unwrap(),
    }
}
