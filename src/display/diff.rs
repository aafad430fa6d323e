//! Structural diffing of two display trees.
//!
//! The comparison never mutates its inputs: it returns a copy of the current
//! tree with change states stamped onto the nodes that differ. Map children
//! are matched by their key name, everything else positionally. Entries that
//! only exist in the previous tree are retained in the output, marked
//! removed, so a frontend can still show what disappeared.

use serde::{Deserialize, Serialize};

use crate::metadata::TypeClass;

use super::DisplayNode;

/// The change state of one display node relative to the previous snapshot.
/// Unchanged nodes carry no state at all.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffState {
    /// The node exists now but not in the previous snapshot.
    Added,

    /// The node existed in the previous snapshot only.
    Removed,

    /// The node's value differs from the previous snapshot.
    Changed,
}

/// Compares a display tree against the previous snapshot's tree.
///
/// An absent previous snapshot marks the entire current tree as added.
#[must_use]
pub fn compare(current: &DisplayNode, previous: Option<&DisplayNode>) -> DisplayNode {
    match previous {
        Some(previous) => compare_nodes(current, previous),
        None => mark_all(current, DiffState::Added),
    }
}

fn compare_nodes(current: &DisplayNode, previous: &DisplayNode) -> DisplayNode {
    let mut result = current.clone();
    result.diff = None;
    result.old_value = None;

    if current.children.is_empty() && previous.children.is_empty() {
        if current.value != previous.value || current.prim != previous.prim {
            result.diff = Some(DiffState::Changed);
            result.old_value = previous.value.clone();
        }
        return result;
    }

    if current.children.is_empty() || previous.children.is_empty() {
        // The slot changed shape between snapshots.
        result.diff = Some(DiffState::Changed);
        result.old_value = previous.value.clone();
        return result;
    }

    result.children = match current.type_class {
        TypeClass::Map | TypeClass::BigMap => {
            compare_keyed(&current.children, &previous.children)
        }
        _ => compare_positional(&current.children, &previous.children),
    };
    result
}

/// Matches children by their key name, as map entries have no stable order.
fn compare_keyed(current: &[DisplayNode], previous: &[DisplayNode]) -> Vec<DisplayNode> {
    let mut out = Vec::with_capacity(current.len());
    for child in current {
        match previous.iter().find(|prev| prev.name == child.name) {
            Some(prev) => out.push(compare_nodes(child, prev)),
            None => out.push(mark_all(child, DiffState::Added)),
        }
    }
    for prev in previous {
        if !current.iter().any(|child| child.name == prev.name) {
            out.push(mark_all(prev, DiffState::Removed));
        }
    }
    out
}

fn compare_positional(current: &[DisplayNode], previous: &[DisplayNode]) -> Vec<DisplayNode> {
    let mut out = Vec::with_capacity(current.len());
    for (index, child) in current.iter().enumerate() {
        match previous.get(index) {
            Some(prev) => out.push(compare_nodes(child, prev)),
            None => out.push(mark_all(child, DiffState::Added)),
        }
    }
    for prev in previous.iter().skip(current.len()) {
        out.push(mark_all(prev, DiffState::Removed));
    }
    out
}

fn mark_all(node: &DisplayNode, state: DiffState) -> DisplayNode {
    let mut result = node.clone();
    result.diff = Some(state);
    result.old_value = None;
    result.children = node
        .children
        .iter()
        .map(|child| mark_all(child, state))
        .collect();
    result
}
