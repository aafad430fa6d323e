//! The decoder for unions: only the written branch appears in the tree.

use crate::{
    error::{decode::Error, Result},
    micheline::{Micheline, Prim},
};

use super::{Ctx, DisplayNode};

pub(crate) fn decode(ctx: &Ctx, data: &Micheline, bin_path: &str) -> Result<DisplayNode> {
    let mut path = bin_path.to_owned();
    let mut selected = data;

    loop {
        let arg = match selected.prim_tag() {
            Some(Prim::Left) => {
                path.push_str("/0");
                selected.args().first()
            }
            Some(Prim::Right) => {
                path.push_str("/1");
                selected.args().first()
            }
            _ => break,
        };
        selected = arg.ok_or_else(|| {
            Error::invalid_field_type(&*path, "selector with a payload")
        })?;
    }

    if path == bin_path {
        return Err(Error::invalid_field_type(bin_path, "Left or Right application").into());
    }

    super::decode(ctx, selected, &path)
}
