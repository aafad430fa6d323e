//! This library implements the Micheline decoding layer of a
//! [Tezos](https://tezos.com) contract indexer: it turns the raw JSON values
//! a node returns for contract scripts, storage and parameters into typed
//! display trees that a frontend can render directly.
//!
//! Note that this library is not a Michelson interpreter or typechecker; it
//! decodes values against their declared types and reconciles storage, and
//! nothing more.
//!
//! # How it Works
//!
//! From a very high level, decoding one operation proceeds as follows:
//!
//! 1. The contract's type tree is ingested into a [`metadata::Metadata`]
//!    map, assigning every type node a bin path and a semantic class.
//! 2. The operation's storage effects are reconciled by the epoch's
//!    [`storage::StorageParser`], separating the deflated storage snapshot
//!    from its [`storage::BigMapDiff`]s.
//! 3. Lambda values have their instruction macros collapsed by a
//!    [`macros::MacroRegistry`], and PACKed byte values are recovered through
//!    the [`unpack`] module.
//! 4. The value and its metadata are walked in lockstep to produce a
//!    [`DisplayNode`] tree, which [`display::diff::compare`] can annotate
//!    against the previous snapshot's tree.
//!
//! # Basic Usage
//!
//! For the most basic usage of the library, build the metadata for a type
//! tree and decode a value against it.
//!
//! ```
//! use michelson_decoder::{
//!     display,
//!     macros::MacroRegistry,
//!     metadata::Metadata,
//!     micheline::Micheline,
//! };
//! use serde_json::json;
//!
//! let ty = Micheline::from_json(&json!({
//!     "prim": "pair",
//!     "args": [
//!         { "prim": "nat", "annots": ["%counter"] },
//!         { "prim": "string", "annots": ["%owner"] },
//!     ],
//! }))
//! .unwrap();
//! let value = Micheline::from_json(&json!({
//!     "prim": "Pair",
//!     "args": [{ "int": "7" }, { "string": "alice" }],
//! }))
//! .unwrap();
//!
//! let metadata = Metadata::build(&ty).unwrap();
//! let registry = MacroRegistry::standard();
//! let tree = display::storage_tree(&value, &metadata, &registry).unwrap();
//!
//! assert_eq!(tree.children.len(), 2);
//! assert_eq!(tree.children[0].name.as_deref(), Some("counter"));
//! ```

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming

pub mod cache;
pub mod constant;
pub mod display;
pub mod error;
pub mod formatter;
pub mod macros;
pub mod metadata;
pub mod micheline;
pub mod protocols;
pub mod storage;
pub mod unpack;

// Re-exports to provide the library interface.
pub use display::{DiffState, DisplayNode};
pub use error::{Error, Result};
pub use metadata::Metadata;
pub use micheline::{Micheline, Prim};
pub use protocols::Epoch;
