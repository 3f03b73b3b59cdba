//! A small, self-contained DER (ASN.1 X.690) encoder/decoder — only the
//! shapes ECDSA keys and signatures need, not a general-purpose ASN.1
//! library.

use primitive_types::U256;

use crate::error::Error;

pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_BIT_STRING: u8 = 0x03;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_OID: u8 = 0x06;
pub const TAG_SEQUENCE: u8 = 0x30;

/// A decoded DER value, tagged by shape rather than by raw byte tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Sequence(Vec<Value>),
    Integer(Vec<u8>),
    OctetString(Vec<u8>),
    BitString(Vec<u8>),
    Oid(Vec<u64>),
    /// A constructed, context-specific tag `[n]` (`0xA0 | n`), e.g. the
    /// `[0]`/`[1]` fields of a SEC1 `ECPrivateKey`.
    Constructed(u8, Box<Value>),
}

impl Value {
    pub fn integer_from_u256(v: U256) -> Value {
        let mut bytes = [0u8; 32];
        v.to_big_endian(&mut bytes);
        let first_nonzero = bytes.iter().position(|b| *b != 0).unwrap_or(31);
        Value::Integer(bytes[first_nonzero..].to_vec())
    }

    pub fn as_u256(&self) -> Result<U256, Error> {
        match self {
            Value::Integer(bytes) => {
                if bytes.len() > 32 {
                    return Err(Error::PointOutOfRange);
                }
                Ok(U256::from_big_endian(bytes))
            }
            _ => Err(Error::TagMismatch {
                wanted: TAG_INTEGER,
                got: tag_of(self),
            }),
        }
    }

    pub fn as_sequence(&self) -> Result<&[Value], Error> {
        match self {
            Value::Sequence(items) => Ok(items),
            _ => Err(Error::TagMismatch {
                wanted: TAG_SEQUENCE,
                got: tag_of(self),
            }),
        }
    }

    pub fn as_octet_string(&self) -> Result<&[u8], Error> {
        match self {
            Value::OctetString(bytes) => Ok(bytes),
            _ => Err(Error::TagMismatch {
                wanted: TAG_OCTET_STRING,
                got: tag_of(self),
            }),
        }
    }

    pub fn as_bit_string(&self) -> Result<&[u8], Error> {
        match self {
            Value::BitString(bytes) => Ok(bytes),
            _ => Err(Error::TagMismatch {
                wanted: TAG_BIT_STRING,
                got: tag_of(self),
            }),
        }
    }

    pub fn as_oid(&self) -> Result<&[u64], Error> {
        match self {
            Value::Oid(arcs) => Ok(arcs),
            _ => Err(Error::TagMismatch {
                wanted: TAG_OID,
                got: tag_of(self),
            }),
        }
    }

    pub fn as_constructed(&self, want_tag: u8) -> Result<&Value, Error> {
        match self {
            Value::Constructed(tag, inner) if *tag == want_tag => Ok(inner),
            Value::Constructed(tag, _) => Err(Error::TagMismatch {
                wanted: 0xA0 | want_tag,
                got: 0xA0 | *tag,
            }),
            _ => Err(Error::TagMismatch {
                wanted: 0xA0 | want_tag,
                got: tag_of(self),
            }),
        }
    }
}

fn tag_of(v: &Value) -> u8 {
    match v {
        Value::Sequence(_) => TAG_SEQUENCE,
        Value::Integer(_) => TAG_INTEGER,
        Value::OctetString(_) => TAG_OCTET_STRING,
        Value::BitString(_) => TAG_BIT_STRING,
        Value::Oid(_) => TAG_OID,
        Value::Constructed(tag, _) => 0xA0 | tag,
    }
}

/// Encode `value` to its DER byte representation.
pub fn encode(value: &Value) -> Vec<u8> {
    match value {
        Value::Sequence(items) => {
            let body: Vec<u8> = items.iter().flat_map(encode).collect();
            wrap(TAG_SEQUENCE, &body)
        }
        Value::Integer(magnitude) => wrap(TAG_INTEGER, &integer_body(magnitude)),
        Value::OctetString(bytes) => wrap(TAG_OCTET_STRING, bytes),
        Value::BitString(bytes) => {
            let mut body = Vec::with_capacity(bytes.len() + 1);
            body.push(0x00); // unused-bits count: this crate only emits whole-byte bit strings.
            body.extend_from_slice(bytes);
            wrap(TAG_BIT_STRING, &body)
        }
        Value::Oid(arcs) => wrap(TAG_OID, &oid_body(arcs)),
        Value::Constructed(tag, inner) => {
            let body = encode(inner);
            wrap(0xA0 | tag, &body)
        }
    }
}

fn integer_body(magnitude: &[u8]) -> Vec<u8> {
    // Odd-length hex is conceptually left-padded with a zero nibble; here
    // that just means: strip leading zero *bytes* down to one significant
    // byte, keep the representation minimal, then apply the DER
    // non-negative-sign rule.
    let mut trimmed = magnitude;
    while trimmed.len() > 1 && trimmed[0] == 0 {
        trimmed = &trimmed[1..];
    }
    if trimmed.is_empty() {
        return vec![0x00];
    }
    if trimmed[0] & 0x80 != 0 {
        let mut out = Vec::with_capacity(trimmed.len() + 1);
        out.push(0x00);
        out.extend_from_slice(trimmed);
        out
    } else {
        trimmed.to_vec()
    }
}

fn oid_body(arcs: &[u64]) -> Vec<u8> {
    assert!(arcs.len() >= 2, "OID needs at least two arcs");
    let mut out = vec![(arcs[0] * 40 + arcs[1]) as u8];
    for &arc in &arcs[2..] {
        out.extend(base128(arc));
    }
    out
}

fn base128(mut arc: u64) -> Vec<u8> {
    let mut digits = vec![(arc & 0x7f) as u8];
    arc >>= 7;
    while arc > 0 {
        digits.push(((arc & 0x7f) as u8) | 0x80);
        arc >>= 7;
    }
    digits.reverse();
    digits
}

fn wrap(tag: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(encode_length(body.len()));
    out.extend_from_slice(body);
    out
}

fn encode_length(len: usize) -> Vec<u8> {
    if len < 128 {
        vec![len as u8]
    } else {
        let mut be = Vec::new();
        let mut remaining = len;
        while remaining > 0 {
            be.push((remaining & 0xff) as u8);
            remaining >>= 8;
        }
        be.reverse();
        let mut out = vec![0x80 | (be.len() as u8)];
        out.extend(be);
        out
    }
}

/// Decode one top-level DER value, returning it and the unconsumed tail —
/// callers that require the whole input to be consumed should check the
/// tail is empty themselves (see [`decode_exact`]).
pub fn decode(input: &[u8]) -> Result<(Value, &[u8]), Error> {
    let (tag, len_start) = (
        *input.first().ok_or(Error::TruncatedLength { offset: 0 })?,
        1,
    );
    let (len, body_start) = decode_length(input, len_start)?;
    let body_end = body_start
        .checked_add(len)
        .ok_or(Error::TruncatedValue { expected: len, found: 0 })?;
    if body_end > input.len() {
        return Err(Error::TruncatedValue {
            expected: len,
            found: input.len() - body_start.min(input.len()),
        });
    }
    let body = &input[body_start..body_end];
    let rest = &input[body_end..];

    let value = match tag {
        TAG_SEQUENCE => {
            let mut items = Vec::new();
            let mut cursor = body;
            while !cursor.is_empty() {
                let (item, tail) = decode(cursor)?;
                items.push(item);
                cursor = tail;
            }
            Value::Sequence(items)
        }
        TAG_INTEGER => {
            if let Some(&first) = body.first() {
                if first >= 0xA0 {
                    return Err(Error::IntegerOutOfRange(first));
                }
            }
            Value::Integer(body.to_vec())
        }
        TAG_OCTET_STRING => Value::OctetString(body.to_vec()),
        TAG_BIT_STRING => {
            if body.is_empty() {
                return Err(Error::TruncatedValue { expected: 1, found: 0 });
            }
            Value::BitString(body[1..].to_vec())
        }
        TAG_OID => Value::Oid(decode_oid(body)?),
        t if (0xA0..=0xBF).contains(&t) => {
            let (inner, tail) = decode(body)?;
            if !tail.is_empty() {
                return Err(Error::MalformedConstructed(t));
            }
            Value::Constructed(t & 0x1f, Box::new(inner))
        }
        other => {
            return Err(Error::TagMismatch {
                wanted: TAG_SEQUENCE,
                got: other,
            })
        }
    };

    Ok((value, rest))
}

/// Decode a DER value that must consume the entire input.
pub fn decode_exact(input: &[u8]) -> Result<Value, Error> {
    let (value, rest) = decode(input)?;
    if !rest.is_empty() {
        return Err(Error::TrailingData(hex::encode(rest)));
    }
    Ok(value)
}

fn decode_length(input: &[u8], at: usize) -> Result<(usize, usize), Error> {
    let first = *input
        .get(at)
        .ok_or(Error::TruncatedLength { offset: at })?;
    if first & 0x80 == 0 {
        Ok((first as usize, at + 1))
    } else {
        let count = (first & 0x7f) as usize;
        let start = at + 1;
        let end = start
            .checked_add(count)
            .ok_or(Error::TruncatedLength { offset: at })?;
        if end > input.len() {
            return Err(Error::TruncatedLength { offset: at });
        }
        let mut len = 0usize;
        for &b in &input[start..end] {
            len = (len << 8) | b as usize;
        }
        Ok((len, end))
    }
}

fn decode_oid(body: &[u8]) -> Result<Vec<u64>, Error> {
    if body.is_empty() {
        return Err(Error::MalformedOid);
    }
    let mut arcs = vec![(body[0] / 40) as u64, (body[0] % 40) as u64];
    let mut value: u64 = 0;
    let mut any = false;
    for &b in &body[1..] {
        any = true;
        value = (value << 7) | (b & 0x7f) as u64;
        if b & 0x80 == 0 {
            arcs.push(value);
            value = 0;
            any = false;
        }
    }
    if any {
        return Err(Error::MalformedOid);
    }
    Ok(arcs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_round_trips() {
        let v = Value::integer_from_u256(U256::from(300));
        let encoded = encode(&v);
        let decoded = decode_exact(&encoded).unwrap();
        assert_eq!(decoded.as_u256().unwrap(), U256::from(300));
    }

    #[test]
    fn integer_with_high_bit_gets_padding_byte() {
        let v = Value::Integer(vec![0xFF]);
        let encoded = encode(&v);
        assert_eq!(encoded, vec![0x02, 0x02, 0x00, 0xFF]);
    }

    #[test]
    fn sequence_round_trips() {
        let v = Value::Sequence(vec![
            Value::integer_from_u256(U256::one()),
            Value::integer_from_u256(U256::from(2)),
        ]);
        let encoded = encode(&v);
        let decoded = decode_exact(&encoded).unwrap();
        assert_eq!(decoded, v);
    }

    #[test]
    fn oid_round_trips() {
        let v = Value::Oid(vec![1, 2, 840, 10045, 2, 1]);
        let encoded = encode(&v);
        let decoded = decode_exact(&encoded).unwrap();
        assert_eq!(decoded.as_oid().unwrap(), &[1, 2, 840, 10045, 2, 1]);
    }

    #[test]
    fn bit_string_round_trips() {
        let v = Value::BitString(vec![0x04, 0xAB, 0xCD]);
        let encoded = encode(&v);
        assert_eq!(encoded[2], 0x00); // unused-bits byte
        let decoded = decode_exact(&encoded).unwrap();
        assert_eq!(decoded.as_bit_string().unwrap(), &[0x04, 0xAB, 0xCD]);
    }

    #[test]
    fn long_form_length_round_trips() {
        let body = vec![0x41; 200];
        let v = Value::OctetString(body.clone());
        let encoded = encode(&v);
        assert_eq!(encoded[1], 0x81); // one length byte follows
        let decoded = decode_exact(&encoded).unwrap();
        assert_eq!(decoded.as_octet_string().unwrap(), body.as_slice());
    }

    #[test]
    fn trailing_junk_is_rejected() {
        let v = Value::integer_from_u256(U256::one());
        let mut encoded = encode(&v);
        encoded.push(0xFF);
        assert!(decode_exact(&encoded).is_err());
    }

    #[test]
    fn truncated_length_is_rejected() {
        assert!(decode_exact(&[0x30, 0x85]).is_err());
    }

    #[test]
    fn integer_first_byte_out_of_range_is_rejected() {
        assert!(decode_exact(&[0x02, 0x01, 0xFF]).is_err());
    }
}
