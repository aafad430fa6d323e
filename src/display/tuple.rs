//! The decoder for pairs, flattening nested unnamed pairs into one record.

use crate::{
    error::{decode::Error, Result},
    metadata::{NodeMetadata, TypeClass},
    micheline::{Micheline, Prim},
};

use super::{Ctx, DisplayNode};

pub(crate) fn decode(
    ctx: &Ctx,
    data: &Micheline,
    bin_path: &str,
    meta: &NodeMetadata,
) -> Result<DisplayNode> {
    let mut node = DisplayNode::from_metadata(meta);
    components(ctx, data, bin_path, &mut node.children)?;
    Ok(node)
}

/// Decodes both sides of a pair into `out`, treating the trailing arguments
/// of a comb pair as the right side.
fn components(
    ctx: &Ctx,
    data: &Micheline,
    bin_path: &str,
    out: &mut Vec<DisplayNode>,
) -> Result<()> {
    let args = data.args();
    if !data.is_prim(&Prim::Pair) || args.len() < 2 {
        return Err(Error::invalid_field_type(bin_path, "pair with two components").into());
    }

    side(ctx, &args[0], &format!("{bin_path}/0"), out)?;
    if args.len() == 2 {
        side(ctx, &args[1], &format!("{bin_path}/1"), out)
    } else {
        let rest = Micheline::app(Prim::Pair, args[1..].to_vec());
        side(ctx, &rest, &format!("{bin_path}/1"), out)
    }
}

/// Decodes one pair side, splicing its children into the parent record when
/// the side is itself an anonymous pair.
fn side(
    ctx: &Ctx,
    data: &Micheline,
    bin_path: &str,
    out: &mut Vec<DisplayNode>,
) -> Result<()> {
    let meta = ctx.metadata.get(bin_path)?;
    let anonymous_pair = matches!(
        meta.type_class,
        TypeClass::Tuple | TypeClass::NamedTuple
    ) && meta.field_name.is_none();

    if anonymous_pair {
        components(ctx, data, bin_path, out)
    } else {
        out.push(super::decode(ctx, data, bin_path)?);
        Ok(())
    }
}
