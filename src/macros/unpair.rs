//! This module contains the family recognizing the `UNPAIR` macro, which
//! splits a pair into its two components on the stack.

use crate::{
    macros::{window_matches, Collapse, MacroFamily},
    micheline::{Micheline, Prim},
};

/// Recognizes the canonical `UNPAIR` expansion `DUP; CAR; DIP { CDR }`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct UnpairFamily;

impl MacroFamily for UnpairFamily {
    fn find(&self, window: &[Micheline]) -> Option<Collapse> {
        use Prim::{Car, Cdr, Dip, Dup};

        if !window_matches(window, &[Dup, Car, Dip]) {
            return None;
        }

        // The DIP body must be exactly { CDR }.
        let [body] = window[2].args() else {
            return None;
        };
        let Some([only]) = body.elements() else {
            return None;
        };
        if !only.is_prim(&Cdr) {
            return None;
        }

        Some(Collapse {
            skip:        3,
            replacement: Micheline::prim(Prim::Unpair),
        })
    }
}
