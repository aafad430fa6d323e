//! The decoder for maps and big-maps.
//!
//! Entries become children named by their key string. Compound keys join
//! their scalar components with `@`, an undeflated big-map pointer becomes a
//! value-only node, and the historical inline slot renders an empty big-map
//! as a zero count.

use serde_json::Value;

use crate::{
    constant::{ALPHA_BIG_MAP_PATH, COMPOUND_KEY_SEPARATOR, DEFAULT_LINE_SIZE},
    error::{decode::Error, Result},
    formatter,
    metadata::NodeMetadata,
    micheline::{Micheline, Prim},
};

use super::{int_value, Ctx, DisplayNode};

pub(crate) fn decode(
    ctx: &Ctx,
    data: &Micheline,
    bin_path: &str,
    meta: &NodeMetadata,
) -> Result<DisplayNode> {
    let mut node = DisplayNode::from_metadata(meta);

    match data {
        Micheline::Int(pointer) => {
            node.value = Some(int_value(pointer));
            Ok(node)
        }
        Micheline::Seq(entries) => {
            if entries.is_empty() && bin_path == ALPHA_BIG_MAP_PATH {
                node.value = Some(Value::from(0));
                return Ok(node);
            }
            for entry in entries {
                node.children.push(entry_node(ctx, entry, bin_path)?);
            }
            Ok(node)
        }
        _ => Err(Error::invalid_field_type(bin_path, "map entry sequence").into()),
    }
}

/// Decodes one `Elt` entry into the value node, named by its key string. A
/// key-only entry stands for a removed key and keeps an empty value node.
fn entry_node(ctx: &Ctx, entry: &Micheline, bin_path: &str) -> Result<DisplayNode> {
    if !entry.is_prim(&Prim::Elt) {
        return Err(Error::invalid_field_type(bin_path, "Elt application").into());
    }
    let args = entry.args();
    let key = args
        .first()
        .ok_or_else(|| Error::invalid_field_type(bin_path, "Elt with key and value"))?;

    let key_path = format!("{bin_path}/k");
    let value_path = format!("{bin_path}/v");

    let key_node = super::decode(ctx, key, &key_path)?;
    let name = key_string(&key_node, key)?;

    let mut value_node = match args.get(1) {
        Some(value) => super::decode(ctx, value, &value_path)?,
        None => DisplayNode::from_metadata(ctx.metadata.get(&value_path)?),
    };
    value_node.name = Some(name);
    Ok(value_node)
}

/// Renders a decoded key as the entry's name.
fn key_string(key_node: &DisplayNode, raw_key: &Micheline) -> Result<String> {
    if let Some(value) = &key_node.value {
        return scalar_string(value).ok_or_else(|| {
            Error::InvalidKeyType {
                reason: format!("unrepresentable key value: {value}"),
            }
            .into()
        });
    }

    if !key_node.children.is_empty() {
        let parts: Option<Vec<String>> = key_node
            .children
            .iter()
            .map(|child| child.value.as_ref().and_then(scalar_string))
            .collect();
        return Ok(match parts {
            Some(parts) => parts.join(COMPOUND_KEY_SEPARATOR),
            // Entry names must stay single-line however large the key is.
            None => formatter::format(raw_key, true, DEFAULT_LINE_SIZE),
        });
    }

    Err(Error::InvalidKeyType {
        reason: "key decoded to neither a scalar nor a record".to_owned(),
    }
    .into())
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
