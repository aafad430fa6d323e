//! The decoder for optional slots.

use crate::{
    error::{decode::Error, Result},
    metadata::NodeMetadata,
    micheline::{Micheline, Prim},
};

use super::{Ctx, DisplayNode};

pub(crate) fn decode(
    ctx: &Ctx,
    data: &Micheline,
    bin_path: &str,
    meta: &NodeMetadata,
) -> Result<DisplayNode> {
    let payload_path = format!("{bin_path}/o");

    match data.prim_tag() {
        Some(Prim::Some) => {
            let payload = data.args().first().ok_or_else(|| {
                Error::invalid_field_type(bin_path, "Some with a payload")
            })?;
            let mut node = super::decode(ctx, payload, &payload_path)?;
            if node.name.is_none() {
                node.name = meta.field_name.clone();
            }
            Ok(node)
        }
        Some(Prim::None) => {
            let mut node = DisplayNode::from_metadata(ctx.metadata.get(&payload_path)?);
            node.is_option = true;
            if node.name.is_none() {
                node.name = meta.field_name.clone();
            }
            Ok(node)
        }
        _ => Err(Error::invalid_field_type(bin_path, "option value").into()),
    }
}
