//! This module contains the vocabulary of Michelson primitives, including the
//! synthetic primitives produced by macro collapsing and the canonical
//! primitive index table used by the binary expression codec.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A Michelson primitive tag.
///
/// Micheline distinguishes primitives by case: `Pair` is a data constructor,
/// `PAIR` an instruction and `pair` a type. The variants here follow the same
/// split, with instruction variants suffixed `Op` and type variants suffixed
/// `T` where the names would otherwise collide.
///
/// Only the primitives the decoder inspects get named variants; everything
/// else round-trips through [`Prim::Other`] unchanged.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Prim {
    // Data constructors.
    False,
    True,
    Unit,
    None,
    Some,
    Pair,
    Left,
    Right,
    Elt,

    // Script fields.
    Parameter,
    Storage,
    Code,

    // Types.
    PairT,
    OrT,
    OptionT,
    ListT,
    SetT,
    MapT,
    BigMapT,
    LambdaT,
    IntT,
    NatT,
    StringT,
    BytesT,
    MutezT,
    TimestampT,
    AddressT,
    KeyT,
    KeyHashT,
    SignatureT,
    ChainIdT,
    BoolT,
    UnitT,
    OperationT,
    ContractT,

    // Instructions the macro normalizer inspects.
    Dup,
    Car,
    Cdr,
    Drop,
    Swap,
    PairOp,
    Dip,
    If,
    IfNone,
    Failwith,
    UnitOp,
    Compare,
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,

    // Synthetic primitives produced by macro collapsing. These never appear
    // on chain and have no binary encoding.
    SetCar,
    SetCdr,
    Unpair,
    Fail,
    Assert,
    CmpEq,
    CmpNeq,
    CmpLt,
    CmpGt,
    CmpLe,
    CmpGe,
    IfCmpEq,
    IfCmpNeq,
    IfCmpLt,
    IfCmpGt,
    IfCmpLe,
    IfCmpGe,

    /// Any primitive without a named variant, carried through verbatim.
    Other(String),
}

impl Prim {
    /// Parses a primitive from its Micheline string form.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "False" => Self::False,
            "True" => Self::True,
            "Unit" => Self::Unit,
            "None" => Self::None,
            "Some" => Self::Some,
            "Pair" => Self::Pair,
            "Left" => Self::Left,
            "Right" => Self::Right,
            "Elt" => Self::Elt,
            "parameter" => Self::Parameter,
            "storage" => Self::Storage,
            "code" => Self::Code,
            "pair" => Self::PairT,
            "or" => Self::OrT,
            "option" => Self::OptionT,
            "list" => Self::ListT,
            "set" => Self::SetT,
            "map" => Self::MapT,
            "big_map" => Self::BigMapT,
            "lambda" => Self::LambdaT,
            "int" => Self::IntT,
            "nat" => Self::NatT,
            "string" => Self::StringT,
            "bytes" => Self::BytesT,
            "mutez" => Self::MutezT,
            "timestamp" => Self::TimestampT,
            "address" => Self::AddressT,
            "key" => Self::KeyT,
            "key_hash" => Self::KeyHashT,
            "signature" => Self::SignatureT,
            "chain_id" => Self::ChainIdT,
            "bool" => Self::BoolT,
            "unit" => Self::UnitT,
            "operation" => Self::OperationT,
            "contract" => Self::ContractT,
            "DUP" => Self::Dup,
            "CAR" => Self::Car,
            "CDR" => Self::Cdr,
            "DROP" => Self::Drop,
            "SWAP" => Self::Swap,
            "PAIR" => Self::PairOp,
            "DIP" => Self::Dip,
            "IF" => Self::If,
            "IF_NONE" => Self::IfNone,
            "FAILWITH" => Self::Failwith,
            "UNIT" => Self::UnitOp,
            "COMPARE" => Self::Compare,
            "EQ" => Self::Eq,
            "NEQ" => Self::Neq,
            "LT" => Self::Lt,
            "GT" => Self::Gt,
            "LE" => Self::Le,
            "GE" => Self::Ge,
            "SET_CAR" => Self::SetCar,
            "SET_CDR" => Self::SetCdr,
            "UNPAIR" => Self::Unpair,
            "FAIL" => Self::Fail,
            "ASSERT" => Self::Assert,
            "CMPEQ" => Self::CmpEq,
            "CMPNEQ" => Self::CmpNeq,
            "CMPLT" => Self::CmpLt,
            "CMPGT" => Self::CmpGt,
            "CMPLE" => Self::CmpLe,
            "CMPGE" => Self::CmpGe,
            "IFCMPEQ" => Self::IfCmpEq,
            "IFCMPNEQ" => Self::IfCmpNeq,
            "IFCMPLT" => Self::IfCmpLt,
            "IFCMPGT" => Self::IfCmpGt,
            "IFCMPLE" => Self::IfCmpLe,
            "IFCMPGE" => Self::IfCmpGe,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Gets the Micheline string form of the primitive.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::False => "False",
            Self::True => "True",
            Self::Unit => "Unit",
            Self::None => "None",
            Self::Some => "Some",
            Self::Pair => "Pair",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Elt => "Elt",
            Self::Parameter => "parameter",
            Self::Storage => "storage",
            Self::Code => "code",
            Self::PairT => "pair",
            Self::OrT => "or",
            Self::OptionT => "option",
            Self::ListT => "list",
            Self::SetT => "set",
            Self::MapT => "map",
            Self::BigMapT => "big_map",
            Self::LambdaT => "lambda",
            Self::IntT => "int",
            Self::NatT => "nat",
            Self::StringT => "string",
            Self::BytesT => "bytes",
            Self::MutezT => "mutez",
            Self::TimestampT => "timestamp",
            Self::AddressT => "address",
            Self::KeyT => "key",
            Self::KeyHashT => "key_hash",
            Self::SignatureT => "signature",
            Self::ChainIdT => "chain_id",
            Self::BoolT => "bool",
            Self::UnitT => "unit",
            Self::OperationT => "operation",
            Self::ContractT => "contract",
            Self::Dup => "DUP",
            Self::Car => "CAR",
            Self::Cdr => "CDR",
            Self::Drop => "DROP",
            Self::Swap => "SWAP",
            Self::PairOp => "PAIR",
            Self::Dip => "DIP",
            Self::If => "IF",
            Self::IfNone => "IF_NONE",
            Self::Failwith => "FAILWITH",
            Self::UnitOp => "UNIT",
            Self::Compare => "COMPARE",
            Self::Eq => "EQ",
            Self::Neq => "NEQ",
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::Le => "LE",
            Self::Ge => "GE",
            Self::SetCar => "SET_CAR",
            Self::SetCdr => "SET_CDR",
            Self::Unpair => "UNPAIR",
            Self::Fail => "FAIL",
            Self::Assert => "ASSERT",
            Self::CmpEq => "CMPEQ",
            Self::CmpNeq => "CMPNEQ",
            Self::CmpLt => "CMPLT",
            Self::CmpGt => "CMPGT",
            Self::CmpLe => "CMPLE",
            Self::CmpGe => "CMPGE",
            Self::IfCmpEq => "IFCMPEQ",
            Self::IfCmpNeq => "IFCMPNEQ",
            Self::IfCmpLt => "IFCMPLT",
            Self::IfCmpGt => "IFCMPGT",
            Self::IfCmpLe => "IFCMPLE",
            Self::IfCmpGe => "IFCMPGE",
            Self::Other(s) => s,
        }
    }

    /// Checks whether the primitive is one of the big-map type tags.
    #[must_use]
    pub fn is_big_map(&self) -> bool {
        matches!(self, Self::BigMapT)
    }
}

impl fmt::Display for Prim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Prim {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Prim {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Ok(Self::from_tag(&s))
    }
}

/// The canonical primitive index table used by the chain's binary expression
/// encoding, ordered by wire index.
///
/// The order is fixed by the protocol; appending is the only permitted
/// change when new protocols add primitives.
pub const PRIM_TABLE: &[&str] = &[
    "parameter",
    "storage",
    "code",
    "False",
    "Elt",
    "Left",
    "None",
    "Pair",
    "Right",
    "Some",
    "True",
    "Unit",
    "PACK",
    "UNPACK",
    "BLAKE2B",
    "SHA256",
    "SHA512",
    "ABS",
    "ADD",
    "AMOUNT",
    "AND",
    "BALANCE",
    "CAR",
    "CDR",
    "CHECK_SIGNATURE",
    "COMPARE",
    "CONCAT",
    "CONS",
    "CREATE_ACCOUNT",
    "CREATE_CONTRACT",
    "IMPLICIT_ACCOUNT",
    "DIP",
    "DROP",
    "DUP",
    "EDIV",
    "EMPTY_MAP",
    "EMPTY_SET",
    "EQ",
    "EXEC",
    "FAILWITH",
    "GE",
    "GET",
    "GT",
    "HASH_KEY",
    "IF",
    "IF_CONS",
    "IF_LEFT",
    "IF_NONE",
    "INT",
    "LAMBDA",
    "LE",
    "LEFT",
    "LOOP",
    "LSL",
    "LSR",
    "LT",
    "MAP",
    "MEM",
    "MUL",
    "NEG",
    "NEQ",
    "NIL",
    "NONE",
    "NOT",
    "NOW",
    "OR",
    "PAIR",
    "PUSH",
    "RIGHT",
    "SIZE",
    "SOME",
    "SOURCE",
    "SENDER",
    "SELF",
    "STEPS_TO_QUOTA",
    "SUB",
    "SWAP",
    "TRANSFER_TOKENS",
    "SET_DELEGATE",
    "UNIT",
    "UPDATE",
    "XOR",
    "ITER",
    "LOOP_LEFT",
    "ADDRESS",
    "CONTRACT",
    "ISNAT",
    "CAST",
    "RENAME",
    "bool",
    "contract",
    "int",
    "key",
    "key_hash",
    "lambda",
    "list",
    "map",
    "big_map",
    "nat",
    "option",
    "or",
    "pair",
    "set",
    "signature",
    "string",
    "bytes",
    "mutez",
    "timestamp",
    "unit",
    "operation",
    "address",
    "SLICE",
    "DIG",
    "DUG",
    "EMPTY_BIG_MAP",
    "APPLY",
    "chain_id",
    "CHAIN_ID",
];

/// Looks up the wire index for a primitive, if it has one.
#[must_use]
pub fn prim_index(prim: &Prim) -> Option<u8> {
    let tag = prim.as_str();
    PRIM_TABLE
        .iter()
        .position(|candidate| *candidate == tag)
        .and_then(|idx| u8::try_from(idx).ok())
}

/// Looks up the primitive for a wire index, if the index is in the table.
#[must_use]
pub fn prim_at_index(index: u8) -> Option<Prim> {
    PRIM_TABLE
        .get(usize::from(index))
        .map(|tag| Prim::from_tag(tag))
}

#[cfg(test)]
mod tests {
    use super::{prim_at_index, prim_index, Prim};

    #[test]
    fn round_trips_known_tags_through_strings() {
        for tag in ["Pair", "PAIR", "pair", "big_map", "SET_CAR", "IF_NONE"] {
            assert_eq!(Prim::from_tag(tag).as_str(), tag);
        }
    }

    #[test]
    fn preserves_unknown_tags() {
        let prim = Prim::from_tag("SAPLING_VERIFY_UPDATE");
        assert_eq!(prim, Prim::Other("SAPLING_VERIFY_UPDATE".to_owned()));
        assert_eq!(prim.as_str(), "SAPLING_VERIFY_UPDATE");
    }

    #[test]
    fn indexes_match_the_canonical_table() {
        assert_eq!(prim_index(&Prim::Parameter), Some(0));
        assert_eq!(prim_index(&Prim::Pair), Some(7));
        assert_eq!(prim_at_index(7), Some(Prim::Pair));
        assert_eq!(prim_index(&Prim::SetCar), None);
    }
}
