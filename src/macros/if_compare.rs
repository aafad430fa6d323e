//! This module contains the family fusing an already-collapsed `CMP*`
//! primitive with the `IF` that consumes its result.

use crate::{
    macros::{Collapse, MacroFamily},
    micheline::{Micheline, Prim},
};

/// Recognizes `CMP*; IF a b` and fuses the two into `IFCMP* a b`, keeping
/// the `IF`'s branches.
///
/// This relies on the scan running to a fixpoint: the `CMP*` node only
/// exists after [`super::compare::CompareFamily`] has collapsed the
/// underlying `COMPARE; predicate` window in an earlier pass.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct IfCompareFamily;

fn fused(cmp: &Prim) -> Option<Prim> {
    match cmp {
        Prim::CmpEq => Some(Prim::IfCmpEq),
        Prim::CmpNeq => Some(Prim::IfCmpNeq),
        Prim::CmpLt => Some(Prim::IfCmpLt),
        Prim::CmpGt => Some(Prim::IfCmpGt),
        Prim::CmpLe => Some(Prim::IfCmpLe),
        Prim::CmpGe => Some(Prim::IfCmpGe),
        _ => None,
    }
}

impl MacroFamily for IfCompareFamily {
    fn find(&self, window: &[Micheline]) -> Option<Collapse> {
        let [cmp, cond, ..] = window else {
            return None;
        };
        let replacement = fused(cmp.prim_tag()?)?;
        if !cond.is_prim(&Prim::If) {
            return None;
        }

        Some(Collapse {
            skip:        2,
            replacement: Micheline::app_with_annots(
                replacement,
                cond.args().to_vec(),
                cmp.annots().to_vec(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::IfCompareFamily;
    use crate::{
        macros::MacroFamily,
        micheline::{Micheline, Prim},
    };

    #[test]
    fn keeps_the_if_branches() {
        let branches = vec![
            Micheline::Seq(vec![Micheline::prim(Prim::Drop)]),
            Micheline::Seq(Vec::new()),
        ];
        let window = vec![
            Micheline::prim(Prim::CmpEq),
            Micheline::app(Prim::If, branches.clone()),
        ];

        let collapse = IfCompareFamily.find(&window).unwrap();
        assert!(collapse.replacement.is_prim(&Prim::IfCmpEq));
        assert_eq!(collapse.replacement.args(), branches.as_slice());
    }
}
