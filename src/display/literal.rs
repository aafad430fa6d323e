//! The decoder for scalar slots.
//!
//! Each literal type has its own rendering: numeric types become JSON
//! numbers, timestamps become RFC 3339 strings, and the byte-encoded address
//! family is unpacked into base58check form.

use serde_json::Value;

use crate::{
    error::{decode::Error, Result},
    metadata::NodeMetadata,
    micheline::{Micheline, Prim},
    unpack,
};

use super::{int_value, DisplayNode};

pub(crate) fn decode(
    data: &Micheline,
    bin_path: &str,
    meta: &NodeMetadata,
) -> Result<DisplayNode> {
    let mut node = DisplayNode::from_metadata(meta);
    node.value = render(data, bin_path, &meta.prim)?;
    Ok(node)
}

fn render(data: &Micheline, bin_path: &str, prim: &Prim) -> Result<Option<Value>> {
    let value = match (prim, data) {
        (Prim::IntT | Prim::NatT | Prim::MutezT, Micheline::Int(value)) => {
            Some(int_value(value))
        }
        (Prim::StringT, Micheline::String(text)) => Some(Value::String(text.clone())),
        (Prim::BytesT, Micheline::Bytes(hex)) => Some(Value::String(unpack::bytes(hex))),
        (Prim::TimestampT, Micheline::Int(seconds)) => Some(timestamp(seconds)),
        (Prim::TimestampT, Micheline::String(text)) => Some(Value::String(text.clone())),
        (Prim::BoolT, Micheline::App { prim, .. }) => match prim {
            Prim::True => Some(Value::Bool(true)),
            Prim::False => Some(Value::Bool(false)),
            _ => return Err(Error::invalid_field_type(bin_path, "boolean value").into()),
        },
        (Prim::UnitT, _) => None,
        (Prim::AddressT | Prim::ContractT, Micheline::String(text)) => {
            Some(Value::String(text.clone()))
        }
        (Prim::AddressT | Prim::ContractT, Micheline::Bytes(hex)) => {
            Some(Value::String(unpack::contract(hex)?))
        }
        (Prim::KeyT, Micheline::String(text)) => Some(Value::String(text.clone())),
        (Prim::KeyT, Micheline::Bytes(hex)) => Some(Value::String(unpack::public_key(hex)?)),
        (Prim::KeyHashT, Micheline::String(text)) => Some(Value::String(text.clone())),
        (Prim::KeyHashT, Micheline::Bytes(hex)) => Some(Value::String(unpack::key_hash(hex)?)),
        (Prim::SignatureT, Micheline::String(text)) => Some(Value::String(text.clone())),
        (Prim::SignatureT, Micheline::Bytes(hex)) => {
            Some(Value::String(unpack::signature(hex)?))
        }
        (Prim::ChainIdT, Micheline::String(text)) => Some(Value::String(text.clone())),
        (Prim::ChainIdT, Micheline::Bytes(hex)) => Some(Value::String(unpack::chain_id(hex)?)),
        // Unknown scalar types pass their wire value through.
        (_, Micheline::Int(value)) => Some(int_value(value)),
        (_, Micheline::String(text)) => Some(Value::String(text.clone())),
        (_, Micheline::Bytes(hex)) => Some(Value::String(unpack::bytes(hex))),
        _ => return Err(Error::invalid_field_type(bin_path, "scalar value").into()),
    };
    Ok(value)
}

fn timestamp(seconds: &num_bigint::BigInt) -> Value {
    let Ok(seconds) = i64::try_from(seconds) else {
        return Value::String(seconds.to_string());
    };
    chrono::DateTime::from_timestamp(seconds, 0).map_or_else(
        || Value::String(seconds.to_string()),
        |moment| Value::String(moment.to_rfc3339()),
    )
}
