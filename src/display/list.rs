//! The decoder for lists and sets.

use crate::{
    error::{decode::Error, Result},
    metadata::{NodeMetadata, TypeClass},
    micheline::Micheline,
};

use super::{Ctx, DisplayNode};

pub(crate) fn decode(
    ctx: &Ctx,
    data: &Micheline,
    bin_path: &str,
    meta: &NodeMetadata,
) -> Result<DisplayNode> {
    let Some(elements) = data.elements() else {
        return Err(Error::invalid_field_type(bin_path, "sequence").into());
    };

    let segment = if meta.type_class == TypeClass::Set { "s" } else { "l" };
    let child_path = format!("{bin_path}/{segment}");

    let mut node = DisplayNode::from_metadata(meta);
    node.children = elements
        .iter()
        .map(|element| super::decode(ctx, element, &child_path))
        .collect::<Result<_>>()?;
    Ok(node)
}
