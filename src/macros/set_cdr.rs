//! This module contains the family recognizing the `SET_CDR` macro, which
//! replaces the second component of a pair on the stack.

use crate::{
    macros::{window_matches, Collapse, MacroFamily},
    micheline::{Micheline, Prim},
};

/// Recognizes both expansions of `SET_CDR`: the annotated compiler form
/// `DUP; CDR; DROP; CAR; PAIR` (annotations carried from the consumed `CDR`)
/// and the canonical short form `CAR; PAIR`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SetCdrFamily;

impl MacroFamily for SetCdrFamily {
    fn find(&self, window: &[Micheline]) -> Option<Collapse> {
        use Prim::{Car, Cdr, Drop, Dup, PairOp};

        if window_matches(window, &[Dup, Cdr, Drop, Car, PairOp]) {
            let annots = window[1].annots().to_vec();
            return Some(Collapse {
                skip:        5,
                replacement: Micheline::app_with_annots(Prim::SetCdr, Vec::new(), annots),
            });
        }

        if window_matches(window, &[Car, PairOp]) {
            return Some(Collapse {
                skip:        2,
                replacement: Micheline::prim(Prim::SetCdr),
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::SetCdrFamily;
    use crate::{
        macros::MacroFamily,
        micheline::{Micheline, Prim},
    };

    #[test]
    fn matches_the_compiler_form() {
        let window = vec![
            Micheline::prim(Prim::Dup),
            Micheline::app_with_annots(Prim::Cdr, Vec::new(), vec!["%amount".to_owned()]),
            Micheline::prim(Prim::Drop),
            Micheline::prim(Prim::Car),
            Micheline::prim(Prim::PairOp),
        ];

        let collapse = SetCdrFamily.find(&window).unwrap();
        assert_eq!(collapse.skip, 5);
        assert_eq!(collapse.replacement.annots(), &["%amount".to_owned()]);
    }
}
