//! This module contains the chain's canonical binary expression codec: the
//! wire format produced by `PACK` and consumed by `UNPACK`, independent of
//! the JSON encoding.
//!
//! Reading turns a hex payload back into a [`Micheline`] tree; writing is
//! the inverse and exists for script-expression hashing.

use num_bigint::{BigInt, BigUint, Sign};

use crate::{
    error::unpack::{Error, Result},
    micheline::{
        prim::{prim_at_index, prim_index},
        Micheline,
    },
};

/// The wire tags for each syntactic form.
const TAG_INT: u8 = 0x00;
const TAG_STRING: u8 = 0x01;
const TAG_SEQUENCE: u8 = 0x02;
const TAG_PRIM_0: u8 = 0x03;
const TAG_PRIM_0_ANNOTS: u8 = 0x04;
const TAG_PRIM_1: u8 = 0x05;
const TAG_PRIM_1_ANNOTS: u8 = 0x06;
const TAG_PRIM_2: u8 = 0x07;
const TAG_PRIM_2_ANNOTS: u8 = 0x08;
const TAG_PRIM_GENERAL: u8 = 0x09;
const TAG_BYTES: u8 = 0x0a;

/// Decodes a hex payload (without the leading `05` pack marker) into a
/// Micheline tree.
///
/// # Errors
///
/// Returns [`Err`] if the payload is truncated, carries an unknown tag or an
/// unknown primitive index, or is not fully consumed.
pub fn to_micheline(input: &str) -> Result<Micheline> {
    let bytes = hex::decode(input)?;
    let mut reader = Reader::new(&bytes);
    let node = reader.read_expr()?;
    if reader.remaining() > 0 {
        return Err(Error::Truncated {
            reading: "trailing bytes after expression",
        });
    }
    Ok(node)
}

/// Encodes a Micheline tree into its binary form, without the pack marker.
///
/// # Errors
///
/// Returns [`Err`] if the tree contains a primitive with no wire index, such
/// as a synthetic macro primitive.
pub fn from_micheline(node: &Micheline) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_expr(node, &mut out)?;
    Ok(out)
}

struct Reader<'b> {
    bytes: &'b [u8],
    pos:   usize,
}

impl<'b> Reader<'b> {
    fn new(bytes: &'b [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn next(&mut self, reading: &'static str) -> Result<u8> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(Error::Truncated { reading })?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, count: usize, reading: &'static str) -> Result<&'b [u8]> {
        if self.remaining() < count {
            return Err(Error::Truncated { reading });
        }
        let slice = &self.bytes[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    fn read_length(&mut self, reading: &'static str) -> Result<usize> {
        let bytes = self.take(4, reading)?;
        let mut value: usize = 0;
        for byte in bytes {
            value = (value << 8) | usize::from(*byte);
        }
        Ok(value)
    }

    fn read_expr(&mut self) -> Result<Micheline> {
        let tag = self.next("expression tag")?;
        match tag {
            TAG_INT => self.read_int(),
            TAG_STRING => {
                let length = self.read_length("string length")?;
                let bytes = self.take(length, "string body")?;
                let text = String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidString)?;
                Ok(Micheline::String(text))
            }
            TAG_SEQUENCE => {
                let length = self.read_length("sequence length")?;
                let body = self.take(length, "sequence body")?;
                let mut inner = Reader::new(body);
                let mut elements = Vec::new();
                while inner.remaining() > 0 {
                    elements.push(inner.read_expr()?);
                }
                Ok(Micheline::Seq(elements))
            }
            TAG_PRIM_0 => self.read_prim(0, false),
            TAG_PRIM_0_ANNOTS => self.read_prim(0, true),
            TAG_PRIM_1 => self.read_prim(1, false),
            TAG_PRIM_1_ANNOTS => self.read_prim(1, true),
            TAG_PRIM_2 => self.read_prim(2, false),
            TAG_PRIM_2_ANNOTS => self.read_prim(2, true),
            TAG_PRIM_GENERAL => {
                let index = self.next("primitive index")?;
                let prim = prim_at_index(index).ok_or(Error::UnknownPrimIndex { index })?;

                let args_length = self.read_length("argument list length")?;
                let body = self.take(args_length, "argument list body")?;
                let mut inner = Reader::new(body);
                let mut args = Vec::new();
                while inner.remaining() > 0 {
                    args.push(inner.read_expr()?);
                }

                let annots = self.read_annots()?;
                Ok(Micheline::app_with_annots(prim, args, annots))
            }
            TAG_BYTES => {
                let length = self.read_length("bytes length")?;
                let bytes = self.take(length, "bytes body")?;
                Ok(Micheline::Bytes(hex::encode(bytes)))
            }
            tag => Err(Error::UnknownTag { tag }),
        }
    }

    fn read_prim(&mut self, arity: usize, with_annots: bool) -> Result<Micheline> {
        let index = self.next("primitive index")?;
        let prim = prim_at_index(index).ok_or(Error::UnknownPrimIndex { index })?;

        let mut args = Vec::with_capacity(arity);
        for _ in 0..arity {
            args.push(self.read_expr()?);
        }

        let annots = if with_annots {
            self.read_annots()?
        } else {
            Vec::new()
        };
        Ok(Micheline::app_with_annots(prim, args, annots))
    }

    fn read_annots(&mut self) -> Result<Vec<String>> {
        let length = self.read_length("annotation length")?;
        let bytes = self.take(length, "annotation body")?;
        let text = String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidString)?;
        Ok(text.split(' ').filter(|s| !s.is_empty()).map(str::to_owned).collect())
    }

    /// Reads a zarith-encoded signed integer: six value bits plus a sign bit
    /// in the first byte, then seven value bits per continuation byte,
    /// little-endian.
    fn read_int(&mut self) -> Result<Micheline> {
        let first = self.next("integer")?;
        let negative = first & 0x40 != 0;
        let mut value = BigUint::from(first & 0x3f);
        let mut shift = 6u32;
        let mut more = first & 0x80 != 0;

        while more {
            let byte = self.next("integer continuation")?;
            value |= BigUint::from(byte & 0x7f) << shift;
            shift += 7;
            more = byte & 0x80 != 0;
        }

        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Ok(Micheline::Int(BigInt::from_biguint(sign, value)))
    }
}

fn write_expr(node: &Micheline, out: &mut Vec<u8>) -> Result<()> {
    match node {
        Micheline::Int(value) => {
            out.push(TAG_INT);
            write_int(value, out);
        }
        Micheline::String(value) => {
            out.push(TAG_STRING);
            write_length(value.len(), out);
            out.extend_from_slice(value.as_bytes());
        }
        Micheline::Bytes(value) => {
            let bytes = hex::decode(value)?;
            out.push(TAG_BYTES);
            write_length(bytes.len(), out);
            out.extend_from_slice(&bytes);
        }
        Micheline::Seq(elements) => {
            out.push(TAG_SEQUENCE);
            let mut body = Vec::new();
            for element in elements {
                write_expr(element, &mut body)?;
            }
            write_length(body.len(), out);
            out.extend_from_slice(&body);
        }
        Micheline::App { prim, args, annots } => {
            let index = prim_index(prim).ok_or_else(|| Error::UnencodablePrim {
                prim: prim.to_string(),
            })?;

            match (args.len(), annots.is_empty()) {
                (0, true) => {
                    out.push(TAG_PRIM_0);
                    out.push(index);
                }
                (0, false) => {
                    out.push(TAG_PRIM_0_ANNOTS);
                    out.push(index);
                    write_annots(annots, out);
                }
                (1, true) => {
                    out.push(TAG_PRIM_1);
                    out.push(index);
                    write_expr(&args[0], out)?;
                }
                (1, false) => {
                    out.push(TAG_PRIM_1_ANNOTS);
                    out.push(index);
                    write_expr(&args[0], out)?;
                    write_annots(annots, out);
                }
                (2, true) => {
                    out.push(TAG_PRIM_2);
                    out.push(index);
                    write_expr(&args[0], out)?;
                    write_expr(&args[1], out)?;
                }
                (2, false) => {
                    out.push(TAG_PRIM_2_ANNOTS);
                    out.push(index);
                    write_expr(&args[0], out)?;
                    write_expr(&args[1], out)?;
                    write_annots(annots, out);
                }
                _ => {
                    out.push(TAG_PRIM_GENERAL);
                    out.push(index);
                    let mut body = Vec::new();
                    for arg in args {
                        write_expr(arg, &mut body)?;
                    }
                    write_length(body.len(), out);
                    out.extend_from_slice(&body);
                    write_annots(annots, out);
                }
            }
        }
    }
    Ok(())
}

fn write_length(length: usize, out: &mut Vec<u8>) {
    let length = u32::try_from(length).unwrap_or(u32::MAX);
    out.extend_from_slice(&length.to_be_bytes());
}

fn write_annots(annots: &[String], out: &mut Vec<u8>) {
    let joined = annots.join(" ");
    write_length(joined.len(), out);
    out.extend_from_slice(joined.as_bytes());
}

fn write_int(value: &BigInt, out: &mut Vec<u8>) {
    let negative = value.sign() == Sign::Minus;
    let mut magnitude = value.magnitude().clone();

    let low6 = (&magnitude & BigUint::from(0x3fu8))
        .iter_u32_digits()
        .next()
        .unwrap_or(0) as u8;
    let mut byte = low6 | if negative { 0x40 } else { 0 };
    magnitude >>= 6u32;

    let zero = BigUint::from(0u8);
    if magnitude != zero {
        byte |= 0x80;
    }
    out.push(byte);

    while magnitude != zero {
        let mut next = (&magnitude & BigUint::from(0x7fu8))
            .iter_u32_digits()
            .next()
            .unwrap_or(0) as u8;
        magnitude >>= 7u32;
        if magnitude != zero {
            next |= 0x80;
        }
        out.push(next);
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use super::{from_micheline, to_micheline};
    use crate::micheline::{Micheline, Prim};

    #[test]
    fn zarith_encodes_known_values() -> anyhow::Result<()> {
        assert_eq!(from_micheline(&Micheline::int(1))?, vec![0x00, 0x01]);
        assert_eq!(from_micheline(&Micheline::int(-1))?, vec![0x00, 0x41]);
        assert_eq!(from_micheline(&Micheline::int(64))?, vec![0x00, 0x80, 0x01]);
        Ok(())
    }

    #[test]
    fn zarith_round_trips_large_values() -> anyhow::Result<()> {
        let value = "123456789012345678901234567890".parse::<BigInt>()?;
        let node = Micheline::Int(value);
        let bytes = from_micheline(&node)?;
        assert_eq!(to_micheline(&hex::encode(bytes))?, node);
        Ok(())
    }

    #[test]
    fn expressions_round_trip() -> anyhow::Result<()> {
        let node = Micheline::app_with_annots(
            Prim::Pair,
            vec![
                Micheline::String("hello".to_owned()),
                Micheline::Seq(vec![Micheline::Bytes("deadbeef".to_owned())]),
            ],
            vec!["%greeting".to_owned()],
        );
        let bytes = from_micheline(&node)?;
        assert_eq!(to_micheline(&hex::encode(bytes))?, node);
        Ok(())
    }

    #[test]
    fn synthetic_primitives_are_unencodable() {
        let node = Micheline::prim(Prim::SetCar);
        assert!(from_micheline(&node).is_err());
    }

    #[test]
    fn truncated_inputs_fail_cleanly() {
        assert!(to_micheline("01").is_err());
        assert!(to_micheline("ff").is_err());
    }
}
