//! Reconciliation of operation results into rich storage.
//!
//! Each protocol epoch represents big-maps differently in operation results,
//! so each epoch gets its own [`StorageParser`] implementation. Both parsers
//! produce the same [`RichStorage`]: a deflated storage snapshot with every
//! big-map slot emptied, plus the flat list of [`BigMapDiff`]s extracted from
//! the operation. [`StorageParser::enrich`] is the inverse direction,
//! splicing diffs back into a snapshot to reconstruct the full value.

pub mod alpha;
pub mod babylon;
pub mod hash;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::storage::{Error, Result},
    metadata::Metadata,
    micheline::{Micheline, Prim},
};

/// One key write observed against a contract's big-map.
///
/// A `value` of [`None`] is a tombstone: the key was removed. Tombstones are
/// kept so that a later enrich pass can decide whether to surface or drop
/// them.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BigMapDiff {
    /// A unique identifier for this diff record.
    pub id: String,

    /// The big-map pointer the write targeted, when the epoch exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ptr: Option<i64>,

    /// The bin path of the big-map slot inside the contract's storage type.
    pub bin_path: String,

    /// The written key.
    pub key: Micheline,

    /// The script-expression hash of the key.
    pub key_hash: String,

    /// The written value, or [`None`] for a removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Micheline>,

    /// The identifier of the operation that performed the write.
    pub operation_id: String,

    /// The block level of the operation.
    pub level: i64,

    /// The address of the contract owning the big-map.
    pub address: String,

    /// The network the operation was observed on.
    pub network: String,

    /// The protocol hash active at the operation's level.
    pub protocol: String,

    /// The block timestamp of the operation.
    pub timestamp: DateTime<Utc>,

    /// The wall-clock time at which the diff was indexed, in microseconds.
    pub indexed_time: i64,
}

/// The output of parsing one operation's storage effects.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RichStorage {
    /// The storage snapshot with every big-map slot deflated to an empty
    /// container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deflated_storage: Option<Micheline>,

    /// The big-map writes extracted from the operation result.
    pub big_map_diffs: Vec<BigMapDiff>,

    /// Set when the operation carried no storage effects at all.
    pub empty: bool,
}

impl RichStorage {
    /// Constructs the result for an operation with no storage effects.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            deflated_storage: None,
            big_map_diffs: Vec::new(),
            empty: true,
        }
    }
}

/// The identifying context of the operation being parsed, carried onto every
/// diff it produces.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct OperationContext {
    /// The identifier of the operation.
    pub id: String,

    /// The block level of the operation.
    pub level: i64,

    /// The network the operation was observed on.
    pub network: String,

    /// The protocol hash active at the operation's level.
    pub protocol: String,

    /// The block timestamp of the operation.
    pub timestamp: DateTime<Utc>,
}

/// The interface to an epoch-specific storage reconciler.
pub trait StorageParser {
    /// Parses the storage effects of a transaction operation.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the operation content is malformed or a big-map
    /// pointer cannot be resolved against the contract's metadata.
    fn parse_transaction(
        &self,
        content: &Value,
        metadata: &Metadata,
        operation: &OperationContext,
    ) -> Result<RichStorage>;

    /// Parses the storage effects of an origination operation.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the operation content is malformed or a big-map
    /// pointer cannot be resolved against the contract's metadata.
    fn parse_origination(
        &self,
        content: &Value,
        metadata: &Metadata,
        operation: &OperationContext,
    ) -> Result<RichStorage>;

    /// Splices `diffs` back into a deflated `storage` snapshot.
    ///
    /// When `skip_empty` is set, tombstone diffs are dropped entirely;
    /// otherwise they are spliced key-only.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if a diff targets a location the snapshot does not
    /// contain.
    fn enrich(
        &self,
        storage: &Micheline,
        diffs: &[BigMapDiff],
        skip_empty: bool,
    ) -> Result<Micheline>;
}

/// The interface to a node backend able to serve storage snapshots, used by
/// the pointer-era reconciler to recover post-origination storage.
pub trait StorageFetcher {
    /// Fetches the contract's storage value as of `level`, in Micheline JSON
    /// wire form.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the backend cannot produce the snapshot.
    fn storage_at(&self, address: &str, level: i64) -> Result<Value>;
}

/// A fetcher that can be shared across threads.
pub type DynStorageFetcher = Arc<dyn StorageFetcher + Send + Sync>;

/// Locates the result object of an operation content, preferring the baked-in
/// `metadata.operation_result` and falling back to a bare `result`.
pub(crate) fn operation_result(content: &Value) -> Result<&Value> {
    content
        .get("metadata")
        .and_then(|metadata| metadata.get("operation_result"))
        .or_else(|| content.get("result"))
        .ok_or_else(|| Error::empty("operation content carries no result"))
}

/// Gets a required string field from an operation content object.
pub(crate) fn string_field<'v>(value: &'v Value, field: &'static str) -> Result<&'v str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or(Error::MissingField { field })
}

/// Gets an integer field that the node may encode either as a JSON number or
/// as a decimal string.
pub(crate) fn int_field(value: &Value, field: &'static str) -> Result<i64> {
    let node = value.get(field).ok_or(Error::MissingField { field })?;
    match node {
        Value::Number(number) => number.as_i64().ok_or(Error::MissingField { field }),
        Value::String(text) => text.parse().map_err(|_| Error::MissingField { field }),
        _ => Err(Error::MissingField { field }),
    }
}

impl BigMapDiff {
    /// Constructs a diff from one parsed write, stamping it with the
    /// operation's context.
    pub(crate) fn new(
        ptr: Option<i64>,
        bin_path: impl Into<String>,
        key: Micheline,
        key_hash: impl Into<String>,
        value: Option<Micheline>,
        address: impl Into<String>,
        operation: &OperationContext,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ptr,
            bin_path: bin_path.into(),
            key,
            key_hash: key_hash.into(),
            value,
            operation_id: operation.id.clone(),
            level: operation.level,
            address: address.into(),
            network: operation.network.clone(),
            protocol: operation.protocol.clone(),
            timestamp: operation.timestamp,
            indexed_time: Utc::now().timestamp_micros(),
        }
    }

    /// Renders the diff as an `Elt` entry for splicing into a storage
    /// snapshot. Tombstones become key-only entries.
    #[must_use]
    pub fn to_elt(&self) -> Micheline {
        let mut args = vec![self.key.clone()];
        if let Some(value) = &self.value {
            args.push(value.clone());
        }
        Micheline::app(Prim::Elt, args)
    }
}

/// Renders a group of diffs as the `Elt` sequence of one big-map, applying
/// the `skip_empty` tombstone policy.
pub(crate) fn elt_entries(diffs: &[&BigMapDiff], skip_empty: bool) -> Vec<Micheline> {
    diffs
        .iter()
        .filter(|diff| !skip_empty || diff.value.is_some())
        .map(|diff| diff.to_elt())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn context() -> OperationContext {
        OperationContext {
            id: "op-1".to_owned(),
            level: 157_102,
            network: "mainnet".to_owned(),
            protocol: "PsBabyM1eUXZseaJdmXFApDSBqj8YBfwELoxZHHW77EMcAbbwAS".to_owned(),
            timestamp: Utc.with_ymd_and_hms(2019, 10, 18, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn prefers_baked_in_operation_result() {
        let content = json!({
            "metadata": { "operation_result": { "status": "applied" } },
            "result": { "status": "backtracked" },
        });

        let result = operation_result(&content).unwrap();

        assert_eq!(result["status"], "applied");
    }

    #[test]
    fn falls_back_to_bare_result() {
        let content = json!({ "result": { "status": "applied" } });

        let result = operation_result(&content).unwrap();

        assert_eq!(result["status"], "applied");
    }

    #[test]
    fn missing_result_is_an_empty_response() {
        let content = json!({ "kind": "transaction" });

        let error = operation_result(&content).unwrap_err();

        assert!(matches!(error, Error::EmptyResponse { .. }));
    }

    #[test]
    fn int_field_accepts_string_encoding() {
        let content = json!({ "big_map": "17" });

        assert_eq!(int_field(&content, "big_map").unwrap(), 17);
    }

    #[test]
    fn tombstones_render_key_only() {
        let diff = BigMapDiff::new(
            Some(4),
            "0/0",
            Micheline::String("holder".to_owned()),
            "exprtest",
            None,
            "KT1Example",
            &context(),
        );

        let elt = diff.to_elt();

        assert_eq!(elt.args().len(), 1);
    }

    #[test]
    fn skip_empty_drops_tombstones() {
        let live = BigMapDiff::new(
            Some(4),
            "0/0",
            Micheline::String("a".to_owned()),
            "expra",
            Some(Micheline::int(1)),
            "KT1Example",
            &context(),
        );
        let dead = BigMapDiff::new(
            Some(4),
            "0/0",
            Micheline::String("b".to_owned()),
            "exprb",
            None,
            "KT1Example",
            &context(),
        );

        let entries = elt_entries(&[&live, &dead], true);

        assert_eq!(entries.len(), 1);
    }
}
