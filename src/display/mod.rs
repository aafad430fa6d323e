//! Type-directed decoding of Micheline values into display trees.
//!
//! The decoder walks a value and its [`Metadata`] in lockstep: at every bin
//! path the node's [`TypeClass`] selects one of the per-class decoders below,
//! which renders scalars into JSON values and recurses into children. The
//! resulting [`DisplayNode`] tree is what indexer frontends consume, and what
//! [`diff`] annotates when comparing two storage snapshots.

pub mod diff;

mod lambda;
mod list;
mod literal;
mod map;
mod option;
mod tuple;
mod union;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    constant::ROOT_PATH,
    error::Result,
    macros::MacroRegistry,
    metadata::{path, Metadata, NodeMetadata, TypeClass},
    micheline::{Micheline, Prim},
};

pub use diff::DiffState;

/// One node of the human-readable rendition of a decoded value.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DisplayNode {
    /// The Michelson primitive of the slot's type.
    pub prim: String,

    /// The semantic class the node was decoded as.
    #[serde(rename = "type")]
    pub type_class: TypeClass,

    /// The declared field or variant name, or the key string for map
    /// entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The rendered scalar value, absent for containers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// The decoded children, empty for scalars.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<DisplayNode>,

    /// Set when the slot is optional.
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub is_option: bool,

    /// The change state assigned by [`diff::compare`], absent when
    /// unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffState>,

    /// The previous rendered value for changed scalars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
}

impl DisplayNode {
    pub(crate) fn from_metadata(meta: &NodeMetadata) -> Self {
        Self {
            prim: meta.prim.to_string(),
            type_class: meta.type_class,
            name: meta.field_name.clone(),
            value: None,
            children: Vec::new(),
            is_option: false,
            diff: None,
            old_value: None,
        }
    }
}

/// Everything the per-class decoders share: the contract's metadata and the
/// macro table used to render lambdas.
pub(crate) struct Ctx<'a> {
    pub metadata: &'a Metadata,
    pub registry: &'a MacroRegistry,
}

/// Decodes a full storage value into its display tree.
///
/// # Errors
///
/// Returns [`Err`] if the value's shape contradicts the contract's storage
/// type at any path.
pub fn storage_tree(
    storage: &Micheline,
    metadata: &Metadata,
    registry: &MacroRegistry,
) -> Result<DisplayNode> {
    let ctx = Ctx { metadata, registry };
    decode(&ctx, storage, ROOT_PATH)
}

/// Decodes a big-map's `Elt` sequence into its display tree, starting at the
/// big-map's own bin path.
///
/// # Errors
///
/// Returns [`Err`] if the value's shape contradicts the big-map's type.
pub fn big_map_tree(
    data: &Micheline,
    bin_path: &str,
    metadata: &Metadata,
    registry: &MacroRegistry,
) -> Result<DisplayNode> {
    let ctx = Ctx { metadata, registry };
    decode(&ctx, data, bin_path)
}

/// Decodes a transaction parameter into its display tree.
///
/// The parameter may arrive in three wire shapes: a bare Micheline value, an
/// `{ "entrypoint": …, "value": … }` object, or a one-element array of the
/// latter. Entrypoint names resolve to their bin path through the metadata,
/// and any residual `Left`/`Right` wrappers are walked before decoding.
///
/// # Errors
///
/// Returns [`Err`] if the parameter's shape contradicts the contract's
/// parameter type.
pub fn parameter_tree(
    data: &Value,
    metadata: &Metadata,
    registry: &MacroRegistry,
) -> Result<DisplayNode> {
    let ctx = Ctx { metadata, registry };

    let unwrapped = match data {
        Value::Array(items) => items.first().unwrap_or(data),
        _ => data,
    };

    let (raw, mut bin_path) = match unwrapped.get("entrypoint").and_then(Value::as_str) {
        Some(entrypoint) => {
            let value = unwrapped
                .get("value")
                .ok_or_else(|| crate::error::decode::Error::malformed(
                    "entrypoint parameter carries no value",
                ))?;
            (value, entrypoint_path(metadata, entrypoint)?)
        }
        _ => (unwrapped, ROOT_PATH.to_owned()),
    };

    let mut node = Micheline::from_json(raw)?;
    loop {
        match node.prim_tag() {
            Some(Prim::Left) if node.args().len() == 1 => {
                bin_path.push_str("/0");
                node = node.args()[0].clone();
            }
            Some(Prim::Right) if node.args().len() == 1 => {
                bin_path.push_str("/1");
                node = node.args()[0].clone();
            }
            _ => break,
        }
    }

    decode(&ctx, &node, &bin_path)
}

/// Resolves an entrypoint name against the parameter metadata.
///
/// The `default` entrypoint, a non-union root, and an unknown name all fall
/// back to the root path, matching how nodes address parameters.
fn entrypoint_path(metadata: &Metadata, entrypoint: &str) -> Result<String> {
    let root = metadata.get(ROOT_PATH)?;
    let is_union = matches!(
        root.type_class,
        TypeClass::Union | TypeClass::NamedUnion
    );
    if !is_union || entrypoint == "default" {
        return Ok(ROOT_PATH.to_owned());
    }
    Ok(metadata
        .path_by_field_name(entrypoint)
        .map_or_else(|| ROOT_PATH.to_owned(), ToOwned::to_owned))
}

/// Decodes one value node against the type at `bin_path`.
pub(crate) fn decode(ctx: &Ctx, data: &Micheline, bin_path: &str) -> Result<DisplayNode> {
    let meta = ctx.metadata.get(bin_path)?;
    let mut node = match meta.type_class {
        TypeClass::Tuple | TypeClass::NamedTuple => tuple::decode(ctx, data, bin_path, meta)?,
        TypeClass::List | TypeClass::Set => list::decode(ctx, data, bin_path, meta)?,
        TypeClass::Map | TypeClass::BigMap => map::decode(ctx, data, bin_path, meta)?,
        TypeClass::Union | TypeClass::NamedUnion => union::decode(ctx, data, bin_path)?,
        TypeClass::Option => option::decode(ctx, data, bin_path, meta)?,
        TypeClass::Lambda => lambda::decode(ctx, data, meta),
        TypeClass::Literal => literal::decode(data, bin_path, meta)?,
    };
    node.is_option |= path::is_option(bin_path);
    Ok(node)
}

/// Renders a big integer as a JSON number when it fits `i64`, and as a
/// decimal string otherwise.
pub(crate) fn int_value(value: &BigInt) -> Value {
    i64::try_from(value).map_or_else(|_| Value::String(value.to_string()), Value::from)
}
