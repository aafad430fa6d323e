//! This module contains the peephole macro normalizer: a registry of pattern
//! families that collapse compiler-emitted multi-instruction idioms into
//! single synthetic primitives.
//!
//! Matching is a pure function of primitive tags — never of literal values —
//! so normalization is deterministic and side-effect-free. When several
//! families could match overlapping windows at the same offset, registration
//! order decides: earlier wins. That order is calibrated against the official
//! compiler's macro set and must be preserved.

pub mod assert;
pub mod compare;
pub mod fail;
pub mod if_compare;
pub mod set_car;
pub mod set_cdr;
pub mod unpair;

use std::{
    any::{Any, TypeId},
    fmt::Debug,
};

use downcast_rs::{impl_downcast, Downcast};

use crate::{
    macros::{
        assert::AssertFamily,
        compare::CompareFamily,
        fail::FailFamily,
        if_compare::IfCompareFamily,
        set_car::SetCarFamily,
        set_cdr::SetCdrFamily,
        unpair::UnpairFamily,
    },
    micheline::Micheline,
};

/// The result of a successful match: the synthetic node to emit and the
/// number of input nodes it consumed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Collapse {
    /// How many nodes of the input window the macro consumed.
    pub skip: usize,

    /// The synthetic node replacing the consumed window.
    pub replacement: Micheline,
}

/// A trait representing one recognizable macro idiom.
///
/// A family inspects the prefix of the remaining instruction sequence and
/// decides whether its idiom starts there. Implementations must match on
/// primitive tags only and must consume at least one node when they match.
pub trait MacroFamily
where
    Self: Any + Debug + Downcast,
{
    /// Tries to match the family's idiom at the start of `window`, returning
    /// the collapse to apply if it matches.
    fn find(&self, window: &[Micheline]) -> Option<Collapse>;
}

impl_downcast!(MacroFamily);

/// An ordered registry of macro families, consulted in registration order.
#[derive(Debug, Default)]
pub struct MacroRegistry {
    families: Vec<Box<dyn MacroFamily>>,
}

impl MacroRegistry {
    /// Constructs an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs the registry with the standard families in their canonical
    /// priority order.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(SetCarFamily);
        registry.add(SetCdrFamily);
        registry.add(UnpairFamily);
        registry.add(FailFamily);
        registry.add(AssertFamily);
        registry.add(CompareFamily);
        registry.add(IfCompareFamily);
        registry
    }

    /// Adds the `family` to the end of the priority ordering.
    ///
    /// If a family of the given type already exists in the ordering, it will
    /// not be added.
    pub fn add<F: MacroFamily>(&mut self, family: F) {
        let ids: Vec<TypeId> = self.families.iter().map(|f| f.as_ref().type_id()).collect();
        if ids.contains(&family.type_id()) {
            return;
        }
        self.families.push(Box::new(family));
    }

    /// Gets a reference to the family of the given type, if it is
    /// registered.
    #[must_use]
    pub fn get<F: MacroFamily>(&self) -> Option<&F> {
        self.families
            .iter()
            .find(|f| f.as_ref().as_any().is::<F>())
            .and_then(|f| f.as_ref().as_any().downcast_ref::<F>())
    }

    /// Normalizes a code node, collapsing every recognized idiom.
    ///
    /// The walk is bottom-up: a node's arguments are normalized before the
    /// node's own sequence is scanned, so idioms that contain other idioms
    /// (`ASSERT` containing `FAIL`) collapse from the inside out. The result
    /// is a freshly-built tree sharing no nodes with the input.
    #[must_use]
    pub fn normalize(&self, node: &Micheline) -> Micheline {
        match node {
            Micheline::Seq(elements) => {
                let mut current: Vec<Micheline> =
                    elements.iter().map(|e| self.normalize(e)).collect();
                loop {
                    let (next, changed) = self.scan(&current);
                    current = next;
                    if !changed {
                        break;
                    }
                }
                Micheline::Seq(current)
            }
            Micheline::App { prim, args, annots } => Micheline::app_with_annots(
                prim.clone(),
                args.iter().map(|a| self.normalize(a)).collect(),
                annots.clone(),
            ),
            other => other.clone(),
        }
    }

    /// Runs one left-to-right scan over a flat sequence. At each position the
    /// families are tried in priority order; the first match wins and the
    /// scan advances by its skip count, otherwise the node is copied through
    /// unchanged.
    fn scan(&self, seq: &[Micheline]) -> (Vec<Micheline>, bool) {
        let mut out = Vec::with_capacity(seq.len());
        let mut changed = false;
        let mut i = 0;

        while i < seq.len() {
            let window = &seq[i..];
            match self.families.iter().find_map(|f| f.find(window)) {
                Some(collapse) => {
                    debug_assert!(collapse.skip >= 1);
                    out.push(collapse.replacement);
                    i += collapse.skip.max(1);
                    changed = true;
                }
                None => {
                    out.push(seq[i].clone());
                    i += 1;
                }
            }
        }

        (out, changed)
    }
}

/// Checks that the window starts with exactly the provided primitive tags.
pub(crate) fn window_matches(window: &[Micheline], tags: &[crate::micheline::Prim]) -> bool {
    window.len() >= tags.len()
        && window
            .iter()
            .zip(tags.iter())
            .all(|(node, tag)| node.is_prim(tag))
}
