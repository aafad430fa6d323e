//! Script-expression hashing for big-map keys.

use blake2::{digest::consts::U32, Blake2b, Digest};

use crate::{
    error::storage::Result,
    micheline::Micheline,
    unpack::{base58, rawbytes},
};

type Blake2b256 = Blake2b<U32>;

/// Computes the script-expression hash of a big-map key: the key is packed
/// with the `0x05` expression prefix, digested with 32-byte Blake2b, and
/// rendered base58check under the `expr` prefix.
///
/// # Errors
///
/// Returns [`Err`] if the key contains a primitive with no binary encoding.
pub fn key(node: &Micheline) -> Result<String> {
    let mut packed = vec![0x05];
    packed.extend(rawbytes::from_micheline(node)?);

    let mut hasher = Blake2b256::new();
    hasher.update(&packed);
    let digest = hasher.finalize();

    Ok(base58::encode_check(base58::prefix::EXPR, &digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::micheline::{Micheline, Prim};

    #[test]
    fn string_key_hashes_to_expr_address() {
        let hash = key(&Micheline::String("hello".to_owned())).unwrap();

        assert!(hash.starts_with("expr"));
        assert_eq!(hash.len(), 54);
    }

    #[test]
    fn hashing_is_deterministic() {
        let node = Micheline::app(
            Prim::Pair,
            vec![Micheline::int(42), Micheline::String("x".to_owned())],
        );

        assert_eq!(key(&node).unwrap(), key(&node).unwrap());
    }

    #[test]
    fn distinct_keys_hash_differently() {
        let first = key(&Micheline::int(1)).unwrap();
        let second = key(&Micheline::int(2)).unwrap();

        assert_ne!(first, second);
    }
}
