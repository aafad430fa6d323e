//! Storage reconciliation for the pointer big-map epoch.
//!
//! From Babylon onward, storage values hold big-maps as integer pointers
//! into node-side tables, and operation results report writes against those
//! pointers. Reconciliation therefore needs a pointer → bin path map, built
//! by reading the pointer out of every big-map slot of an actual storage
//! snapshot. Originations are the awkward case: the origination content only
//! carries the pre-allocation storage, so the post-origination snapshot is
//! recovered through a [`StorageFetcher`].

use std::collections::HashMap;

use num_bigint::BigInt;
use serde_json::Value;
use tracing::warn;

use crate::{
    constant::ROOT_PATH,
    error::storage::{Error, Result},
    metadata::{path, Metadata},
    micheline::Micheline,
    storage::{
        elt_entries,
        int_field,
        operation_result,
        string_field,
        BigMapDiff,
        DynStorageFetcher,
        OperationContext,
        RichStorage,
        StorageParser,
    },
};

/// The reconciler for the pointer big-map epoch.
pub struct Babylon {
    fetcher: DynStorageFetcher,
}

impl Babylon {
    /// Constructs a reconciler backed by the provided snapshot fetcher.
    #[must_use]
    pub fn new(fetcher: DynStorageFetcher) -> Self {
        Self { fetcher }
    }

    fn fetch_storage(&self, address: &str, level: i64) -> Result<Micheline> {
        let raw = self.fetcher.storage_at(address, level)?;
        Ok(Micheline::from_json(&raw)?)
    }
}

impl StorageParser for Babylon {
    fn parse_transaction(
        &self,
        content: &Value,
        metadata: &Metadata,
        operation: &OperationContext,
    ) -> Result<RichStorage> {
        let address = string_field(content, "destination")?;
        let result = operation_result(content)?;

        let storage = result
            .get("storage")
            .ok_or_else(|| Error::empty("transaction result carries no storage"))?;
        let storage = Micheline::from_json(storage)?;

        let pointers = pointer_map(metadata, &storage)?;
        let diffs = collect_diffs(result, &pointers, address, operation)?;

        Ok(RichStorage {
            deflated_storage: Some(storage),
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

        let storage = self.fetch_storage(address, operation.level)?;
        let pointers = pointer_map(metadata, &storage)?;
        let diffs = collect_diffs(result, &pointers, address, operation)?;

        Ok(RichStorage {
            deflated_storage: Some(storage),
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
        let mut grouped: HashMap<i64, Vec<&BigMapDiff>> = HashMap::new();
        for diff in diffs {
            let ptr = diff.ptr.ok_or_else(|| {
                Error::empty("big map diff carries no pointer")
            })?;
            grouped.entry(ptr).or_default().push(diff);
        }

        let mut pointers: Vec<i64> = grouped.keys().copied().collect();
        pointers.sort_unstable();

        let mut enriched = storage.clone();
        for ptr in pointers {
            let group = &grouped[&ptr];
            let bin_path = &group[0].bin_path;
            let entries = Micheline::Seq(elt_entries(group, skip_empty));
            let expected = BigInt::from(ptr);

            // Only the slot at the diff's own path may be spliced; an
            // unrelated integer field can coincide with the pointer value.
            let (next, replaced) = path::replace_matching(
                &enriched,
                bin_path,
                |slot| matches!(slot, Micheline::Int(value) if *value == expected),
                &entries,
            )?;
            if !replaced {
                return Err(Error::UnresolvedPointer { ptr });
            }
            enriched = next;
        }
        Ok(enriched)
    }
}

/// Builds the pointer → bin path map for one storage snapshot.
///
/// A bare integer snapshot is the degenerate whole-storage big-map and maps
/// to the root path. A big-map slot nested under a map fans out to several
/// pointers sharing one bin path, which is why the mapping is not a
/// bijection.
///
/// # Errors
///
/// Returns [`Err`] if one pointer appears in two distinct slots, or if a
/// big-map slot holds something other than an integer.
pub fn pointer_map(metadata: &Metadata, storage: &Micheline) -> Result<HashMap<i64, String>> {
    let mut pointers = HashMap::new();

    if let Micheline::Int(value) = storage {
        pointers.insert(pointer_value(value)?, ROOT_PATH.to_owned());
        return Ok(pointers);
    }

    for bin_path in metadata.big_map_paths() {
        for slot in path::collect_at(storage, bin_path)? {
            let Micheline::Int(value) = slot else {
                return Err(Error::NotAPointer {
                    bin_path: bin_path.to_owned(),
                });
            };
            let ptr = pointer_value(value)?;
            if pointers.insert(ptr, bin_path.to_owned()).is_some() {
                return Err(Error::DuplicatePointer { ptr });
            }
        }
    }
    Ok(pointers)
}

fn pointer_value(value: &BigInt) -> Result<i64> {
    i64::try_from(value).map_err(|_| Error::empty("big map pointer exceeds i64"))
}

/// Extracts the `action: update` entries of a result's `big_map_diff` list,
/// resolving each pointer to its bin path.
fn collect_diffs(
    result: &Value,
    pointers: &HashMap<i64, String>,
    address: &str,
    operation: &OperationContext,
) -> Result<Vec<BigMapDiff>> {
    let Some(items) = result.get("big_map_diff").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut diffs = Vec::new();
    for item in items {
        if item.get("action").and_then(Value::as_str) != Some("update") {
            continue;
        }
        let ptr = int_field(item, "big_map")?;
        let Some(bin_path) = pointers.get(&ptr) else {
            warn!(ptr, address, "big map pointer has no metadata path");
            return Err(Error::UnresolvedPointer { ptr });
        };

        let key = item
            .get("key")
            .ok_or(Error::MissingField { field: "key" })?;
        let key = Micheline::from_json(key)?;
        let key_hash = string_field(item, "key_hash")?;
        let value = match item.get("value") {
            None | Some(Value::Null) => None,
            Some(value) => Some(Micheline::from_json(value)?),
        };

        diffs.push(BigMapDiff::new(
            Some(ptr),
            bin_path.clone(),
            key,
            key_hash.to_owned(),
            value,
            address,
            operation,
        ));
    }
    Ok(diffs)
}
