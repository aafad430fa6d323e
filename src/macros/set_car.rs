//! This module contains the family recognizing the `SET_CAR` macro, which
//! replaces the first component of a pair on the stack.

use crate::{
    macros::{window_matches, Collapse, MacroFamily},
    micheline::{Micheline, Prim},
};

/// Recognizes both expansions of `SET_CAR`:
///
/// - the annotated form the compiler emits, `DUP; CAR; DROP; CDR; SWAP;
///   PAIR`, carrying the consumed `CAR`'s annotations onto the synthetic
///   node, and
/// - the canonical short form `CDR; SWAP; PAIR`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SetCarFamily;

impl MacroFamily for SetCarFamily {
    fn find(&self, window: &[Micheline]) -> Option<Collapse> {
        use Prim::{Car, Cdr, Drop, Dup, PairOp, Swap};

        if window_matches(window, &[Dup, Car, Drop, Cdr, Swap, PairOp]) {
            let annots = window[1].annots().to_vec();
            return Some(Collapse {
                skip:        6,
                replacement: Micheline::app_with_annots(Prim::SetCar, Vec::new(), annots),
            });
        }

        if window_matches(window, &[Cdr, Swap, PairOp]) {
            return Some(Collapse {
                skip:        3,
                replacement: Micheline::prim(Prim::SetCar),
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::SetCarFamily;
    use crate::{
        macros::MacroFamily,
        micheline::{Micheline, Prim},
    };

    #[test]
    fn carries_the_car_annotation_through() {
        let window = vec![
            Micheline::prim(Prim::Dup),
            Micheline::app_with_annots(Prim::Car, Vec::new(), vec!["%owner".to_owned()]),
            Micheline::prim(Prim::Drop),
            Micheline::prim(Prim::Cdr),
            Micheline::prim(Prim::Swap),
            Micheline::prim(Prim::PairOp),
        ];

        let collapse = SetCarFamily.find(&window).unwrap();
        assert_eq!(collapse.skip, 6);
        assert!(collapse.replacement.is_prim(&Prim::SetCar));
        assert_eq!(collapse.replacement.annots(), &["%owner".to_owned()]);
    }

    #[test]
    fn matches_the_short_form_without_annotations() {
        let window = vec![
            Micheline::prim(Prim::Cdr),
            Micheline::prim(Prim::Swap),
            Micheline::prim(Prim::PairOp),
        ];

        let collapse = SetCarFamily.find(&window).unwrap();
        assert_eq!(collapse.skip, 3);
        assert!(collapse.replacement.annots().is_empty());
    }
}
