//! The decoder for code literals: macros are collapsed, then the code is
//! pretty-printed as the node's value.

use serde_json::Value;

use crate::{formatter, metadata::NodeMetadata, micheline::Micheline};

use super::{Ctx, DisplayNode};

pub(crate) fn decode(ctx: &Ctx, data: &Micheline, meta: &NodeMetadata) -> DisplayNode {
    let mut node = DisplayNode::from_metadata(meta);
    let normalized = ctx.registry.normalize(data);
    node.value = Some(Value::String(formatter::format_default(&normalized)));
    node
}
