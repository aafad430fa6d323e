//! This module tests the full reconciliation pipeline: an operation's
//! storage effects are parsed, the deflated snapshot is enriched again and
//! the result is decoded into a display tree.
#![cfg(test)]

use std::sync::Arc;

use michelson_decoder::{
    display,
    error::storage::Result as StorageResult,
    macros::MacroRegistry,
    protocols::{epoch_for, Epoch},
    storage::{
        alpha::Alpha,
        babylon::Babylon,
        StorageFetcher,
        StorageParser,
    },
};
use serde_json::{json, Value};

mod common;

#[derive(Debug)]
struct FixedFetcher(Value);

impl StorageFetcher for FixedFetcher {
    fn storage_at(&self, _address: &str, _level: i64) -> StorageResult<Value> {
        Ok(self.0.clone())
    }
}

fn ledger_type() -> serde_json::Value {
    json!({
        "prim": "pair",
        "args": [
            {
                "prim": "big_map",
                "annots": ["%ledger"],
                "args": [{ "prim": "string" }, { "prim": "nat" }],
            },
            { "prim": "nat", "annots": ["%total"] },
        ],
    })
}

#[test]
fn babylon_round_trips_through_deflation() -> anyhow::Result<()> {
    common::init_tracing();
    let metadata = common::metadata(&ledger_type())?;
    let parser = Babylon::new(Arc::new(FixedFetcher(Value::Null)));
    let content = json!({
        "destination": "KT1Example",
        "metadata": {
            "operation_result": {
                "storage": {
                    "prim": "Pair",
                    "args": [{ "int": "31" }, { "int": "100" }],
                },
                "big_map_diff": [
                    {
                        "action": "update",
                        "big_map": "31",
                        "key": { "string": "alice" },
                        "key_hash": "expralice",
                        "value": { "int": "60" },
                    },
                    {
                        "action": "update",
                        "big_map": "31",
                        "key": { "string": "bob" },
                        "key_hash": "exprbob",
                        "value": { "int": "40" },
                    },
                ],
            },
        },
    });

    let rich = parser.parse_transaction(&content, &metadata, &common::operation_context())?;
    let deflated = rich
        .deflated_storage
        .ok_or_else(|| anyhow::anyhow!("expected a storage snapshot"))?;

    let enriched = parser.enrich(&deflated, &rich.big_map_diffs, false)?;

    // The pointer slot now holds the full entry list.
    let expected = common::micheline(&json!({
        "prim": "Pair",
        "args": [
            [
                { "prim": "Elt", "args": [{ "string": "alice" }, { "int": "60" }] },
                { "prim": "Elt", "args": [{ "string": "bob" }, { "int": "40" }] },
            ],
            { "int": "100" },
        ],
    }))?;
    assert_eq!(enriched, expected);
    Ok(())
}

#[test]
fn enriched_storage_decodes_into_a_display_tree() -> anyhow::Result<()> {
    let metadata = common::metadata(&ledger_type())?;
    let registry = MacroRegistry::standard();
    let enriched = common::micheline(&json!({
        "prim": "Pair",
        "args": [
            [{ "prim": "Elt", "args": [{ "string": "alice" }, { "int": "60" }] }],
            { "int": "100" },
        ],
    }))?;

    let tree = display::storage_tree(&enriched, &metadata, &registry)?;

    assert_eq!(tree.children.len(), 2);
    let ledger = &tree.children[0];
    assert_eq!(ledger.name.as_deref(), Some("ledger"));
    assert_eq!(ledger.children[0].name.as_deref(), Some("alice"));
    assert_eq!(ledger.children[0].value, Some(json!(60)));
    Ok(())
}

#[test]
fn alpha_originations_round_trip_through_deflation() -> anyhow::Result<()> {
    let metadata = common::metadata(&json!({
        "prim": "pair",
        "args": [
            {
                "prim": "big_map",
                "args": [{ "prim": "string" }, { "prim": "nat" }],
            },
            { "prim": "nat" },
        ],
    }))?;
    let storage = json!({
        "prim": "Pair",
        "args": [
            [{ "prim": "Elt", "args": [{ "string": "alice" }, { "int": "10" }] }],
            { "int": "1" },
        ],
    });
    let content = json!({
        "script": { "storage": storage },
        "metadata": {
            "operation_result": { "originated_contracts": ["KT1Example"] },
        },
    });

    let rich = Alpha.parse_origination(&content, &metadata, &common::operation_context())?;
    let deflated = rich
        .deflated_storage
        .ok_or_else(|| anyhow::anyhow!("expected a storage snapshot"))?;
    let enriched = Alpha.enrich(&deflated, &rich.big_map_diffs, false)?;

    assert_eq!(enriched, common::micheline(&storage)?);
    Ok(())
}

#[test]
fn protocol_hashes_select_their_epoch() -> anyhow::Result<()> {
    assert_eq!(
        epoch_for("PsBabyM1eUXZseaJdmXFApDSBqj8YBfwELoxZHHW77EMcAbbwAS")?,
        Epoch::Babylon
    );
    assert_eq!(
        epoch_for("PtYuensgYBb3G3x1hLLbCmcav8ue8Kyd2khADcL5LsT5R1hcXex")?,
        Epoch::Alpha
    );
    assert!(epoch_for("PtUnknownProtocolHash").is_err());
    Ok(())
}
