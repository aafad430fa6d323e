//! This module contains the typed representation of a Micheline expression,
//! the JSON-encoded form in which a node RPC emits Michelson code, storage
//! and parameter values.

pub mod prim;

use num_bigint::BigInt;
use serde_json::{json, Value};

use crate::error::decode::{Error, Result};

pub use prim::Prim;

/// A single Micheline node.
///
/// Micheline has exactly five syntactic forms: integer, string and byte
/// literals, sequences, and primitive applications carrying ordered argument
/// nodes and annotations. A node owns its children exclusively; macro
/// rewriting replaces nodes wholesale rather than mutating them in place.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Micheline {
    /// An arbitrary-precision integer literal, `{"int": "..."}` on the wire.
    Int(BigInt),

    /// A string literal, `{"string": "..."}` on the wire.
    String(String),

    /// A byte literal carried as lowercase hex, `{"bytes": "..."}` on the
    /// wire.
    Bytes(String),

    /// A sequence of nodes, a JSON array on the wire.
    Seq(Vec<Micheline>),

    /// A primitive application, `{"prim": ..., "args": ..., "annots": ...}`
    /// on the wire.
    App {
        prim:   Prim,
        args:   Vec<Micheline>,
        annots: Vec<String>,
    },
}

impl Micheline {
    /// Constructs a primitive application with no arguments or annotations.
    #[must_use]
    pub fn prim(prim: Prim) -> Self {
        Self::App {
            prim,
            args: Vec::new(),
            annots: Vec::new(),
        }
    }

    /// Constructs a primitive application with the provided `args`.
    #[must_use]
    pub fn app(prim: Prim, args: Vec<Micheline>) -> Self {
        Self::App {
            prim,
            args,
            annots: Vec::new(),
        }
    }

    /// Constructs a primitive application with the provided `args` and
    /// `annots`.
    #[must_use]
    pub fn app_with_annots(prim: Prim, args: Vec<Micheline>, annots: Vec<String>) -> Self {
        Self::App { prim, args, annots }
    }

    /// Constructs an integer literal from anything convertible to a
    /// [`BigInt`].
    #[must_use]
    pub fn int(value: impl Into<BigInt>) -> Self {
        Self::Int(value.into())
    }

    /// Gets the primitive tag if the node is an application.
    #[must_use]
    pub fn prim_tag(&self) -> Option<&Prim> {
        match self {
            Self::App { prim, .. } => Some(prim),
            _ => None,
        }
    }

    /// Checks whether the node is an application of the provided primitive.
    #[must_use]
    pub fn is_prim(&self, prim: &Prim) -> bool {
        self.prim_tag() == Some(prim)
    }

    /// Gets the argument nodes if the node is an application, or an empty
    /// slice otherwise.
    #[must_use]
    pub fn args(&self) -> &[Micheline] {
        match self {
            Self::App { args, .. } => args,
            _ => &[],
        }
    }

    /// Gets the annotations if the node is an application, or an empty slice
    /// otherwise.
    #[must_use]
    pub fn annots(&self) -> &[String] {
        match self {
            Self::App { annots, .. } => annots,
            _ => &[],
        }
    }

    /// Gets the elements if the node is a sequence.
    #[must_use]
    pub fn elements(&self) -> Option<&[Micheline]> {
        match self {
            Self::Seq(elements) => Some(elements),
            _ => None,
        }
    }

    /// Gets the first annotation naming a field (a `%name` annotation), with
    /// the marker stripped.
    #[must_use]
    pub fn field_annot(&self) -> Option<&str> {
        self.annots()
            .iter()
            .find_map(|annot| annot.strip_prefix('%'))
            .filter(|name| !name.is_empty())
    }

    /// Parses a Micheline node from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the JSON does not follow the Micheline shape.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Array(items) => {
                let elements = items
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Seq(elements))
            }
            Value::Object(fields) => {
                if let Some(int) = fields.get("int") {
                    let digits = int
                        .as_str()
                        .ok_or_else(|| Error::malformed("int literal is not a string"))?;
                    let parsed = digits
                        .parse::<BigInt>()
                        .map_err(|_| Error::malformed(format!("bad int literal: {digits}")))?;
                    return Ok(Self::Int(parsed));
                }
                if let Some(string) = fields.get("string") {
                    let s = string
                        .as_str()
                        .ok_or_else(|| Error::malformed("string literal is not a string"))?;
                    return Ok(Self::String(s.to_owned()));
                }
                if let Some(bytes) = fields.get("bytes") {
                    let hex = bytes
                        .as_str()
                        .ok_or_else(|| Error::malformed("bytes literal is not a string"))?;
                    return Ok(Self::Bytes(hex.to_lowercase()));
                }
                let Some(prim) = fields.get("prim").and_then(Value::as_str) else {
                    return Err(Error::malformed("object has neither literal nor prim"));
                };
                let args = match fields.get("args") {
                    Some(Value::Array(items)) => items
                        .iter()
                        .map(Self::from_json)
                        .collect::<Result<Vec<_>>>()?,
                    Some(_) => return Err(Error::malformed("args is not an array")),
                    None => Vec::new(),
                };
                let annots = match fields.get("annots") {
                    Some(Value::Array(items)) => items
                        .iter()
                        .map(|item| {
                            item.as_str()
                                .map(str::to_owned)
                                .ok_or_else(|| Error::malformed("annotation is not a string"))
                        })
                        .collect::<Result<Vec<_>>>()?,
                    Some(_) => return Err(Error::malformed("annots is not an array")),
                    None => Vec::new(),
                };
                Ok(Self::App {
                    prim: Prim::from_tag(prim),
                    args,
                    annots,
                })
            }
            _ => Err(Error::malformed(format!(
                "unexpected JSON value: {value}"
            ))),
        }
    }

    /// Serializes the node back into its JSON wire form.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int(value) => json!({ "int": value.to_string() }),
            Self::String(value) => json!({ "string": value }),
            Self::Bytes(value) => json!({ "bytes": value }),
            Self::Seq(elements) => {
                Value::Array(elements.iter().map(Micheline::to_json).collect())
            }
            Self::App { prim, args, annots } => {
                let mut object = serde_json::Map::new();
                object.insert("prim".to_owned(), Value::String(prim.as_str().to_owned()));
                if !args.is_empty() {
                    object.insert(
                        "args".to_owned(),
                        Value::Array(args.iter().map(Micheline::to_json).collect()),
                    );
                }
                if !annots.is_empty() {
                    object.insert(
                        "annots".to_owned(),
                        Value::Array(
                            annots.iter().map(|a| Value::String(a.clone())).collect(),
                        ),
                    );
                }
                Value::Object(object)
            }
        }
    }
}

impl serde::Serialize for Micheline {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Micheline {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}
