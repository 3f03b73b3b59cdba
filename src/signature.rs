//! The `(r, s)` signature pair and its DER / Base64 codec.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use primitive_types::U256;

use crate::der::{self, Value};
use crate::error::Error;

/// An ECDSA signature. Range constraints on `r`/`s` (`1 <= r,s <= N-1`)
/// are enforced by [`crate::ecdsa::verify`], not by construction —
/// `Signature` itself is just a pair of integers, so a decoded signature
/// that happens to violate the range can still be represented and
/// inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: U256,
    pub s: U256,
}

impl Signature {
    pub fn new(r: U256, s: U256) -> Self {
        Self { r, s }
    }

    pub fn to_der(&self) -> Vec<u8> {
        let value = Value::Sequence(vec![
            Value::integer_from_u256(self.r),
            Value::integer_from_u256(self.s),
        ]);
        der::encode(&value)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_der())
    }

    pub fn from_der(bytes: &[u8]) -> Result<Self, Error> {
        let value = der::decode_exact(bytes)?;
        let items = value.as_sequence()?;
        if items.len() != 2 {
            return Err(Error::TrailingData(hex::encode(bytes)));
        }
        Ok(Self {
            r: items[0].as_u256()?,
            s: items[1].as_u256()?,
        })
    }

    pub fn from_der_unwrap(bytes: &[u8]) -> Self {
        Self::from_der(bytes).expect("malformed Signature DER")
    }

    pub fn from_base64(s: &str) -> Result<Self, Error> {
        let der = STANDARD
            .decode(s)
            .map_err(|e| Error::InvalidBase64(e.to_string()))?;
        Self::from_der(&der)
    }

    pub fn from_base64_unwrap(s: &str) -> Self {
        Self::from_base64(s).expect("malformed Signature base64")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn der_round_trips() {
        let sig = Signature::new(U256::from(12345), U256::from(67890));
        let back = Signature::from_der(&sig.to_der()).unwrap();
        assert_eq!(sig, back);
    }

    #[test]
    fn base64_round_trips() {
        let sig = Signature::new(U256::from(1), U256::MAX);
        let back = Signature::from_base64(&sig.to_base64()).unwrap();
        assert_eq!(sig, back);
    }

    #[test]
    fn known_base64_vector_decodes_to_expected_r_s() {
        let sig = Signature::from_base64(
            "MEYCIQD861pJq/fZE7GnDBycwAbb3YglVoSCVub6TwMkgFS0NgIhAJCEZTh1Mlp1cWCgMXABqh9nOQznEXnhGoSYmZK6T99T",
        )
        .unwrap();
        let expected_r = U256::from_dec_str(
            "114398670046563728651181765316495176217036114587592994448444521545026466264118",
        )
        .unwrap();
        let expected_s = U256::from_dec_str(
            "65366972607021398158454632864220554542282541376523937745916477386966386597715",
        )
        .unwrap();
        assert_eq!(sig.r, expected_r);
        assert_eq!(sig.s, expected_s);
    }
}
