//! This module contains the family fusing `COMPARE` with the comparison
//! predicate that follows it.

use crate::{
    macros::{Collapse, MacroFamily},
    micheline::{Micheline, Prim},
};

/// Recognizes `COMPARE; {EQ,NEQ,LT,GT,LE,GE}` and fuses the two into the
/// matching `CMP*` primitive, carrying the predicate's annotations.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CompareFamily;

/// Maps a comparison predicate to its fused counterpart.
pub(crate) fn fused(predicate: &Prim) -> Option<Prim> {
    match predicate {
        Prim::Eq => Some(Prim::CmpEq),
        Prim::Neq => Some(Prim::CmpNeq),
        Prim::Lt => Some(Prim::CmpLt),
        Prim::Gt => Some(Prim::CmpGt),
        Prim::Le => Some(Prim::CmpLe),
        Prim::Ge => Some(Prim::CmpGe),
        _ => None,
    }
}

impl MacroFamily for CompareFamily {
    fn find(&self, window: &[Micheline]) -> Option<Collapse> {
        let [compare, predicate, ..] = window else {
            return None;
        };
        if !compare.is_prim(&Prim::Compare) {
            return None;
        }
        let replacement = fused(predicate.prim_tag()?)?;

        Some(Collapse {
            skip:        2,
            replacement: Micheline::app_with_annots(
                replacement,
                Vec::new(),
                predicate.annots().to_vec(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::CompareFamily;
    use crate::{
        macros::MacroFamily,
        micheline::{Micheline, Prim},
    };

    #[test]
    fn fuses_each_predicate() {
        for (predicate, expected) in [
            (Prim::Eq, Prim::CmpEq),
            (Prim::Ge, Prim::CmpGe),
            (Prim::Lt, Prim::CmpLt),
        ] {
            let window = vec![Micheline::prim(Prim::Compare), Micheline::prim(predicate)];
            let collapse = CompareFamily.find(&window).unwrap();
            assert!(collapse.replacement.is_prim(&expected));
        }
    }

    #[test]
    fn leaves_compare_without_a_predicate_alone() {
        let window = vec![Micheline::prim(Prim::Compare), Micheline::prim(Prim::Swap)];
        assert!(CompareFamily.find(&window).is_none());
    }
}
