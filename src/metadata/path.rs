//! This module contains the bin-path grammar utilities: navigation of a
//! *value* tree by a path assigned over the *type* tree, and the explicit
//! rebuilds used to splice replacement subtrees into a value.
//!
//! The two trees are structurally different JSON shapes, so the same path
//! grammar is interpreted differently here than in the metadata builder:
//! pair components index `Pair` arguments, `o` steps through `Some`, `l`/`s`
//! fan out over sequence elements and `k`/`v` over `Elt` sides.

use crate::{
    error::decode::{Error, Result},
    micheline::{Micheline, Prim},
};

/// Splits a bin path into its segments.
#[must_use]
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Checks whether a path addresses an optional slot.
#[must_use]
pub fn is_option(path: &str) -> bool {
    path.ends_with("/o")
}

/// Collects every value located at `path` within `value`.
///
/// List, set and map segments fan out, so the result may hold zero or many
/// nodes: a `None` along the way contributes nothing, while a big-map with
/// three entries contributes three keys for a `k` segment.
///
/// # Errors
///
/// Returns [`Err`] if the value's shape contradicts the path at any step —
/// that mismatch is a decode error, never a panic.
pub fn collect_at<'v>(value: &'v Micheline, path: &str) -> Result<Vec<&'v Micheline>> {
    let segs = segments(path);
    let Some((root, rest)) = segs.split_first() else {
        return Err(Error::unknown_path(path));
    };
    if *root != "0" {
        return Err(Error::unknown_path(path));
    }

    let mut current = vec![value];
    for seg in rest {
        let mut next = Vec::new();
        for node in current {
            step(node, seg, path, &mut next)?;
        }
        current = next;
    }
    Ok(current)
}

fn step<'v>(
    node: &'v Micheline,
    seg: &str,
    path: &str,
    out: &mut Vec<&'v Micheline>,
) -> Result<()> {
    match seg {
        "0" | "1" => {
            let index = usize::from(seg == "1");
            let args = node.args();
            match args.get(index) {
                Some(arg) => out.push(arg),
                None => return Err(Error::invalid_field_type(path, "pair with two components")),
            }
        }
        "o" => match node.prim_tag() {
            Some(Prim::Some) => match node.args().first() {
                Some(inner) => out.push(inner),
                None => return Err(Error::invalid_field_type(path, "Some with a payload")),
            },
            Some(Prim::None) => {}
            _ => return Err(Error::invalid_field_type(path, "option value")),
        },
        "l" | "s" => match node.elements() {
            Some(elements) => out.extend(elements.iter()),
            None => return Err(Error::invalid_field_type(path, "sequence")),
        },
        "k" | "v" => {
            let index = usize::from(seg == "v");
            let Some(elements) = node.elements() else {
                return Err(Error::invalid_field_type(path, "map entry sequence"));
            };
            for elt in elements {
                if !elt.is_prim(&Prim::Elt) {
                    return Err(Error::invalid_field_type(path, "Elt application"));
                }
                match elt.args().get(index) {
                    Some(arg) => out.push(arg),
                    None => return Err(Error::invalid_field_type(path, "Elt with key and value")),
                }
            }
        }
        _ => return Err(Error::unknown_path(path)),
    }
    Ok(())
}

/// Rebuilds `value` with the subtree at `path` replaced by `replacement`.
///
/// Only pair-component and option segments can be traversed: a path through
/// a list or map does not address a single node. The original tree is left
/// untouched; the result shares no nodes with the replacement site's spine.
///
/// # Errors
///
/// Returns [`Err`] if the path cannot be traversed in this value.
pub fn replace_at(value: &Micheline, path: &str, replacement: Micheline) -> Result<Micheline> {
    let segs = segments(path);
    let Some((root, rest)) = segs.split_first() else {
        return Err(Error::unknown_path(path));
    };
    if *root != "0" {
        return Err(Error::unknown_path(path));
    }
    rebuild(value, rest, path, replacement)
}

fn rebuild(
    node: &Micheline,
    rest: &[&str],
    path: &str,
    replacement: Micheline,
) -> Result<Micheline> {
    let Some((seg, tail)) = rest.split_first() else {
        return Ok(replacement);
    };

    match *seg {
        "0" | "1" => {
            let index = usize::from(*seg == "1");
            let Micheline::App { prim, args, annots } = node else {
                return Err(Error::invalid_field_type(path, "pair with two components"));
            };
            if args.len() <= index {
                return Err(Error::invalid_field_type(path, "pair with two components"));
            }
            let mut new_args = args.clone();
            new_args[index] = rebuild(&args[index], tail, path, replacement)?;
            Ok(Micheline::app_with_annots(
                prim.clone(),
                new_args,
                annots.clone(),
            ))
        }
        "o" => {
            let Micheline::App { prim, args, annots } = node else {
                return Err(Error::invalid_field_type(path, "option value"));
            };
            match prim {
                Prim::Some => {
                    let current = args
                        .first()
                        .ok_or_else(|| Error::invalid_field_type(path, "Some with a payload"))?;
                    let inner = rebuild(current, tail, path, replacement)?;
                    Ok(Micheline::app_with_annots(
                        Prim::Some,
                        vec![inner],
                        annots.clone(),
                    ))
                }
                Prim::None => Ok(node.clone()),
                _ => Err(Error::invalid_field_type(path, "option value")),
            }
        }
        _ => Err(Error::invalid_field_type(path, "addressable subtree")),
    }
}

/// Rebuilds `value` with every node at `path` accepted by `accepts` replaced
/// by a copy of `replacement`, reporting whether any node was replaced.
///
/// Unlike [`replace_at`], list and map segments are traversed by fanning
/// out, so the path may address several candidate slots; only the accepted
/// ones are swapped and the rest are kept as they are.
///
/// # Errors
///
/// Returns [`Err`] if the value's shape contradicts the path at any step.
pub fn replace_matching<F>(
    value: &Micheline,
    path: &str,
    accepts: F,
    replacement: &Micheline,
) -> Result<(Micheline, bool)>
where
    F: Fn(&Micheline) -> bool,
{
    let segs = segments(path);
    let Some((root, rest)) = segs.split_first() else {
        return Err(Error::unknown_path(path));
    };
    if *root != "0" {
        return Err(Error::unknown_path(path));
    }
    rebuild_matching(value, rest, path, &accepts, replacement)
}

fn rebuild_matching<F>(
    node: &Micheline,
    rest: &[&str],
    path: &str,
    accepts: &F,
    replacement: &Micheline,
) -> Result<(Micheline, bool)>
where
    F: Fn(&Micheline) -> bool,
{
    let Some((seg, tail)) = rest.split_first() else {
        if accepts(node) {
            return Ok((replacement.clone(), true));
        }
        return Ok((node.clone(), false));
    };

    match *seg {
        "0" | "1" => {
            let index = usize::from(*seg == "1");
            let Micheline::App { prim, args, annots } = node else {
                return Err(Error::invalid_field_type(path, "pair with two components"));
            };
            if args.len() <= index {
                return Err(Error::invalid_field_type(path, "pair with two components"));
            }
            let (next, hit) = rebuild_matching(&args[index], tail, path, accepts, replacement)?;
            let mut new_args = args.clone();
            new_args[index] = next;
            Ok((
                Micheline::app_with_annots(prim.clone(), new_args, annots.clone()),
                hit,
            ))
        }
        "o" => match node {
            Micheline::App {
                prim: Prim::Some,
                args,
                annots,
            } => {
                let current = args
                    .first()
                    .ok_or_else(|| Error::invalid_field_type(path, "Some with a payload"))?;
                let (inner, hit) = rebuild_matching(current, tail, path, accepts, replacement)?;
                Ok((
                    Micheline::app_with_annots(Prim::Some, vec![inner], annots.clone()),
                    hit,
                ))
            }
            Micheline::App {
                prim: Prim::None, ..
            } => Ok((node.clone(), false)),
            _ => Err(Error::invalid_field_type(path, "option value")),
        },
        "l" | "s" => {
            let Some(elements) = node.elements() else {
                return Err(Error::invalid_field_type(path, "sequence"));
            };
            let mut hit = false;
            let mut rebuilt = Vec::with_capacity(elements.len());
            for element in elements {
                let (next, matched) = rebuild_matching(element, tail, path, accepts, replacement)?;
                hit |= matched;
                rebuilt.push(next);
            }
            Ok((Micheline::Seq(rebuilt), hit))
        }
        "k" | "v" => {
            let index = usize::from(*seg == "v");
            let Some(elements) = node.elements() else {
                return Err(Error::invalid_field_type(path, "map entry sequence"));
            };
            let mut hit = false;
            let mut rebuilt = Vec::with_capacity(elements.len());
            for elt in elements {
                let Micheline::App {
                    prim: Prim::Elt,
                    args,
                    annots,
                } = elt
                else {
                    return Err(Error::invalid_field_type(path, "Elt application"));
                };
                if args.len() <= index {
                    return Err(Error::invalid_field_type(path, "Elt with key and value"));
                }
                let (next, matched) = rebuild_matching(&args[index], tail, path, accepts, replacement)?;
                hit |= matched;
                let mut new_args = args.clone();
                new_args[index] = next;
                rebuilt.push(Micheline::app_with_annots(Prim::Elt, new_args, annots.clone()));
            }
            Ok((Micheline::Seq(rebuilt), hit))
        }
        _ => Err(Error::unknown_path(path)),
    }
}
