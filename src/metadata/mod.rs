//! This module contains the metadata builder: a single pre-order walk of a
//! contract's type expression that assigns every type node a stable bin path
//! and records what the decoder needs to know about it.

pub mod entrypoint;
pub mod path;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    constant::ROOT_PATH,
    error::decode::{Error, Result},
    micheline::{Micheline, Prim},
};

/// The coarse semantic class of a type-tree node, driving decoder dispatch.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeClass {
    /// A pair whose components are unnamed.
    Tuple,

    /// A pair whose components carry `%field` annotations, decoded as a
    /// record.
    NamedTuple,

    /// An `or` whose branches are unnamed.
    Union,

    /// An `or` whose branches carry `%variant` annotations.
    NamedUnion,

    /// A homogeneous list.
    List,

    /// A homogeneous set.
    Set,

    /// An eagerly-stored map.
    Map,

    /// A lazily-stored big-map, inline in early epochs and pointer-indexed
    /// in later ones.
    BigMap,

    /// An optional value.
    Option,

    /// A code literal.
    Lambda,

    /// Any scalar type; the decoder's fallback class.
    Literal,
}

/// Everything the decoder needs to know about one position in a type tree.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NodeMetadata {
    /// The Michelson primitive of the type node.
    pub prim: Prim,

    /// The semantic class the decoder dispatches on.
    #[serde(rename = "type")]
    pub type_class: TypeClass,

    /// The declared field or variant name, taken from a `%field` annotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    /// All annotations on the type node, markers included.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub annots: Vec<String>,
}

/// The path → type metadata mapping for one (contract, protocol) pair.
///
/// Built once per pair and read-only thereafter; every decode and diff call
/// for that contract version shares it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Metadata {
    nodes: HashMap<String, NodeMetadata>,
}

impl Metadata {
    /// Builds metadata from a contract's parsed type expression.
    ///
    /// A single-element sequence wrapper (the form in which script sections
    /// arrive) is unwrapped before the walk.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the expression is not a well-formed type tree.
    pub fn build(ty: &Micheline) -> Result<Self> {
        let ty = unwrap_section(ty);
        let mut nodes = HashMap::new();
        walk(ty, ROOT_PATH.to_owned(), &mut nodes)?;
        Ok(Self { nodes })
    }

    /// Resolves a bin path, failing with `UnknownPath` if the builder never
    /// assigned it.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the path is absent from the map.
    pub fn get(&self, path: &str) -> Result<&NodeMetadata> {
        self.nodes.get(path).ok_or_else(|| Error::unknown_path(path))
    }

    /// Checks whether the builder assigned the provided path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Iterates over every (path, metadata) entry in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &NodeMetadata)> {
        self.nodes.iter()
    }

    /// Gets the paths of every big-map-typed node, sorted for determinism.
    #[must_use]
    pub fn big_map_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .nodes
            .iter()
            .filter(|(_, nm)| nm.prim.is_big_map())
            .map(|(path, _)| path.as_str())
            .collect();
        paths.sort_unstable();
        paths
    }

    /// Finds the path whose declared field name matches `name`, if any.
    #[must_use]
    pub fn path_by_field_name(&self, name: &str) -> Option<&str> {
        self.nodes
            .iter()
            .find(|(_, nm)| nm.field_name.as_deref() == Some(name))
            .map(|(path, _)| path.as_str())
    }

    /// Gets the number of assigned paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Checks whether the metadata is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Strips the section wrappers a script uses around its type expressions:
/// `parameter`/`storage` applications and single-element sequences.
pub(crate) fn unwrap_section(node: &Micheline) -> &Micheline {
    match node {
        Micheline::Seq(elements) if elements.len() == 1 => unwrap_section(&elements[0]),
        Micheline::App { prim, args, .. }
            if matches!(prim, Prim::Parameter | Prim::Storage) && args.len() == 1 =>
        {
            unwrap_section(&args[0])
        }
        other => other,
    }
}

fn walk(ty: &Micheline, path: String, nodes: &mut HashMap<String, NodeMetadata>) -> Result<()> {
    let Micheline::App { prim, args, annots } = ty else {
        return Err(Error::malformed(format!(
            "type tree node at {path} is not a primitive application"
        )));
    };

    let type_class = classify(prim, args);
    nodes.insert(
        path.clone(),
        NodeMetadata {
            prim: prim.clone(),
            type_class,
            field_name: ty.field_annot().map(str::to_owned),
            annots: annots.clone(),
        },
    );

    match prim {
        Prim::PairT | Prim::OrT => {
            expect_args(args, 2, &path)?;
            walk(&args[0], format!("{path}/0"), nodes)?;
            walk(&args[1], format!("{path}/1"), nodes)?;
        }
        Prim::OptionT => {
            expect_args(args, 1, &path)?;
            walk(&args[0], format!("{path}/o"), nodes)?;
        }
        Prim::ListT => {
            expect_args(args, 1, &path)?;
            walk(&args[0], format!("{path}/l"), nodes)?;
        }
        Prim::SetT => {
            expect_args(args, 1, &path)?;
            walk(&args[0], format!("{path}/s"), nodes)?;
        }
        Prim::MapT | Prim::BigMapT => {
            expect_args(args, 2, &path)?;
            walk(&args[0], format!("{path}/k"), nodes)?;
            walk(&args[1], format!("{path}/v"), nodes)?;
        }
        // Lambda parameter and return types are not value-addressable.
        _ => {}
    }

    Ok(())
}

fn expect_args(args: &[Micheline], count: usize, path: &str) -> Result<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(Error::malformed(format!(
            "type node at {path} has {} args, expected {count}",
            args.len()
        )))
    }
}

fn classify(prim: &Prim, args: &[Micheline]) -> TypeClass {
    let named = |args: &[Micheline]| args.iter().any(|arg| arg.field_annot().is_some());
    match prim {
        Prim::PairT => {
            if named(args) {
                TypeClass::NamedTuple
            } else {
                TypeClass::Tuple
            }
        }
        Prim::OrT => {
            if named(args) {
                TypeClass::NamedUnion
            } else {
                TypeClass::Union
            }
        }
        Prim::ListT => TypeClass::List,
        Prim::SetT => TypeClass::Set,
        Prim::MapT => TypeClass::Map,
        Prim::BigMapT => TypeClass::BigMap,
        Prim::OptionT => TypeClass::Option,
        Prim::LambdaT => TypeClass::Lambda,
        _ => TypeClass::Literal,
    }
}
