//! Storage reconciliation for the inline big-map epoch.
//!
//! Early protocols store a contract's single big-map inline as an `Elt`
//! sequence in the first storage slot, and transaction results report writes
//! in a flat `big_map_diff` list without pointers. The diff templates below
//! therefore always target the fixed `0/0` bin path.

use serde_json::Value;

use crate::{
    constant::ALPHA_BIG_MAP_PATH,
    error::storage::{Error, Result},
    metadata::{path, Metadata, TypeClass},
    micheline::Micheline,
    storage::{
        elt_entries,
        hash,
        operation_result,
        string_field,
        BigMapDiff,
        OperationContext,
        RichStorage,
        StorageParser,
    },
};

/// The reconciler for the inline big-map epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct Alpha;

impl StorageParser for Alpha {
    fn parse_transaction(
        &self,
        content: &Value,
        _metadata: &Metadata,
        operation: &OperationContext,
    ) -> Result<RichStorage> {
        let address = string_field(content, "destination")?;
        let result = operation_result(content)?;

        let mut diffs = Vec::new();
        if let Some(items) = result.get("big_map_diff").and_then(Value::as_array) {
            for item in items {
                diffs.push(diff_from_result(item, address, operation)?);
            }
        }

        let storage = result
            .get("storage")
            .ok_or_else(|| Error::empty("transaction result carries no storage"))?;

        Ok(RichStorage {
            deflated_storage: Some(Micheline::from_json(storage)?),
            big_map_diffs: diffs,
            empty: false,
        })
    }

    fn parse_origination(
        &self,
        content: &Value,
        metadata: &Metadata,
        operation: &OperationContext,
    ) -> Result<RichStorage> {
        let result = operation_result(content)?;
        let address = result
            .get("originated_contracts")
            .and_then(Value::as_array)
            .and_then(|contracts| contracts.first())
            .and_then(Value::as_str)
            .ok_or(Error::MissingField {
                field: "originated_contracts",
            })?;

        let storage = content
            .get("script")
            .and_then(|script| script.get("storage"))
            .ok_or_else(|| Error::empty("origination script carries no storage"))?;
        let storage = Micheline::from_json(storage)?;

        if !has_inline_big_map(metadata) {
            return Ok(RichStorage {
                deflated_storage: Some(storage),
                big_map_diffs: Vec::new(),
                empty: false,
            });
        }

        let mut diffs = Vec::new();
        for slot in path::collect_at(&storage, ALPHA_BIG_MAP_PATH)? {
            let Some(entries) = slot.elements() else {
                continue;
            };
            for entry in entries {
                let args = entry.args();
                let key = args.first().cloned().ok_or_else(|| {
                    Error::empty("big map entry carries no key")
                })?;
                let key_hash = hash::key(&key)?;
                diffs.push(BigMapDiff::new(
                    None,
                    ALPHA_BIG_MAP_PATH,
                    key,
                    key_hash,
                    args.get(1).cloned(),
                    address,
                    operation,
                ));
            }
        }

        let deflated = if diffs.is_empty() {
            storage
        } else {
            path::replace_at(&storage, ALPHA_BIG_MAP_PATH, Micheline::Seq(Vec::new()))?
        };

        Ok(RichStorage {
            deflated_storage: Some(deflated),
            big_map_diffs: diffs,
            empty: false,
        })
    }

    fn enrich(
        &self,
        storage: &Micheline,
        diffs: &[BigMapDiff],
        skip_empty: bool,
    ) -> Result<Micheline> {
        if diffs.is_empty() {
            return Ok(storage.clone());
        }

        let grouped: Vec<&BigMapDiff> = diffs.iter().collect();
        let entries = elt_entries(&grouped, skip_empty);
        Ok(path::replace_at(
            storage,
            ALPHA_BIG_MAP_PATH,
            Micheline::Seq(entries),
        )?)
    }
}

/// Checks whether the contract's storage type has a big-map in the fixed
/// inline slot.
fn has_inline_big_map(metadata: &Metadata) -> bool {
    metadata
        .get(ALPHA_BIG_MAP_PATH)
        .is_ok_and(|node| node.type_class == TypeClass::BigMap)
}

/// Builds a diff from one `big_map_diff` entry of a transaction result.
fn diff_from_result(
    item: &Value,
    address: &str,
    operation: &OperationContext,
) -> Result<BigMapDiff> {
    let key = item
        .get("key")
        .ok_or(Error::MissingField { field: "key" })?;
    let key = Micheline::from_json(key)?;
    let key_hash = string_field(item, "key_hash")?;
    let value = match item.get("value") {
        None | Some(Value::Null) => None,
        Some(value) => Some(Micheline::from_json(value)?),
    };

    Ok(BigMapDiff::new(
        None,
        ALPHA_BIG_MAP_PATH,
        key,
        key_hash.to_owned(),
        value,
        address,
        operation,
    ))
}
