//! This module contains the family recognizing the `ASSERT` macro.

use crate::{
    macros::{Collapse, MacroFamily},
    micheline::{Micheline, Prim},
};

/// Recognizes `ASSERT` as `IF {} { FAIL }`.
///
/// Normalization is bottom-up, so by the time this family sees the `IF` its
/// failing branch has already been collapsed to the synthetic `FAIL` node.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct AssertFamily;

impl MacroFamily for AssertFamily {
    fn find(&self, window: &[Micheline]) -> Option<Collapse> {
        let node = window.first()?;
        if !node.is_prim(&Prim::If) {
            return None;
        }
        let [then_branch, else_branch] = node.args() else {
            return None;
        };

        let then_empty = then_branch.elements().is_some_and(<[Micheline]>::is_empty);
        let else_fails = matches!(
            else_branch.elements(),
            Some([only]) if only.is_prim(&Prim::Fail)
        );
        if !(then_empty && else_fails) {
            return None;
        }

        Some(Collapse {
            skip:        1,
            replacement: Micheline::app_with_annots(
                Prim::Assert,
                Vec::new(),
                node.annots().to_vec(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AssertFamily;
    use crate::{
        macros::MacroFamily,
        micheline::{Micheline, Prim},
    };

    #[test]
    fn matches_if_with_empty_then_and_failing_else() {
        let node = Micheline::app(
            Prim::If,
            vec![
                Micheline::Seq(Vec::new()),
                Micheline::Seq(vec![Micheline::prim(Prim::Fail)]),
            ],
        );
        assert!(AssertFamily.find(&[node]).is_some());
    }

    #[test]
    fn ignores_if_with_a_populated_then_branch() {
        let node = Micheline::app(
            Prim::If,
            vec![
                Micheline::Seq(vec![Micheline::prim(Prim::Drop)]),
                Micheline::Seq(vec![Micheline::prim(Prim::Fail)]),
            ],
        );
        assert!(AssertFamily.find(&[node]).is_none());
    }
}
