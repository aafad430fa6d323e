//! This module contains the family recognizing the `FAIL` macro.

use crate::{
    macros::{window_matches, Collapse, MacroFamily},
    micheline::{Micheline, Prim},
};

/// Recognizes the canonical `FAIL` expansion `UNIT; FAILWITH`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FailFamily;

impl MacroFamily for FailFamily {
    fn find(&self, window: &[Micheline]) -> Option<Collapse> {
        use Prim::{Failwith, UnitOp};

        window_matches(window, &[UnitOp, Failwith]).then(|| Collapse {
            skip:        2,
            replacement: Micheline::prim(Prim::Fail),
        })
    }
}
