//! Key types and their DER / PEM / raw-string envelopes: SEC1
//! `ECPrivateKey` for private keys, `SubjectPublicKeyInfo` for public keys.

use primitive_types::U256;
use rand_core::CryptoRngCore;

use crate::bigint::between;
use crate::curve::{Curve, ID_EC_PUBLIC_KEY_OID};
use crate::der::{self, Value};
use crate::error::Error;
use crate::pem;
use crate::point::AffinePoint;

/// An elliptic-curve private key: a secret scalar `1 <= secret <= N-1`
/// together with the curve it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub secret: U256,
    pub curve: &'static Curve,
}

/// An elliptic-curve public key: an affine point on `curve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub point: AffinePoint,
    pub curve: &'static Curve,
}

impl PrivateKey {
    /// Draw a uniformly random secret in `[1, N-1]` for `curve`.
    pub fn generate(curve: &'static Curve, rng: &mut impl CryptoRngCore) -> Self {
        let secret = between(U256::one(), curve.n - U256::one(), rng);
        Self { secret, curve }
    }

    pub fn from_secret(secret: U256, curve: &'static Curve) -> Self {
        Self { secret, curve }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            point: self.curve.generator().multiply(self.secret, self.curve),
            curve: self.curve,
        }
    }

    /// Fixed-width big-endian raw string: just the secret, left-zero-padded
    /// to the curve's element length.
    pub fn to_raw_string(&self) -> Vec<u8> {
        fixed_width_be(self.secret, self.curve.element_len())
    }

    pub fn to_der(&self) -> Vec<u8> {
        let l = self.curve.element_len();
        let pub_point = self.public_key().to_uncompressed_point();
        let value = Value::Sequence(vec![
            Value::integer_from_u256(U256::one()),
            Value::OctetString(fixed_width_be(self.secret, l)),
            Value::Constructed(0, Box::new(Value::Oid(self.curve.oid.to_vec()))),
            Value::Constructed(1, Box::new(Value::BitString(pub_point))),
        ]);
        der::encode(&value)
    }

    pub fn to_pem(&self) -> String {
        pem::encode("EC PRIVATE KEY", &self.to_der())
    }

    pub fn from_der(bytes: &[u8]) -> Result<Self, Error> {
        let value = der::decode_exact(bytes)?;
        let items = value.as_sequence()?;
        if items.len() < 3 {
            return Err(Error::TrailingData(hex::encode(bytes)));
        }
        let version = items[0].as_u256()?;
        if version != U256::one() {
            return Err(Error::UnsupportedVersion(version.to_string()));
        }
        let secret_bytes = items[1].as_octet_string()?;
        let secret = U256::from_big_endian(secret_bytes);
        let oid = items[2].as_constructed(0)?.as_oid()?;
        let curve = Curve::by_oid(oid)?;
        Ok(Self { secret, curve })
    }

    pub fn from_der_unwrap(bytes: &[u8]) -> Self {
        Self::from_der(bytes).expect("malformed SEC1 ECPrivateKey DER")
    }

    pub fn from_pem(input: &str) -> Result<Self, Error> {
        let stripped = pem::strip_ec_parameters(input);
        let (label, der) = pem::decode(stripped)?;
        if label != "EC PRIVATE KEY" {
            return Err(Error::InvalidPem(format!("unexpected PEM label: {label}")));
        }
        Self::from_der(&der)
    }

    pub fn from_pem_unwrap(input: &str) -> Self {
        Self::from_pem(input).expect("malformed EC PRIVATE KEY PEM")
    }
}

impl PublicKey {
    /// `04 || X || Y`, the uncompressed point encoding this crate always
    /// uses (compressed points are out of scope).
    pub fn to_uncompressed_point(&self) -> Vec<u8> {
        let l = self.curve.element_len();
        let (x, y) = match self.point {
            AffinePoint::Affine { x, y } => (x, y),
            AffinePoint::Infinity => (U256::zero(), U256::zero()),
        };
        let mut out = Vec::with_capacity(1 + 2 * l);
        out.push(0x04);
        out.extend(fixed_width_be(x, l));
        out.extend(fixed_width_be(y, l));
        out
    }

    /// `"\x00\x04" || X || Y`: the BIT STRING content, unused-bits byte
    /// included, as a raw string.
    pub fn to_raw_string(&self) -> Vec<u8> {
        let mut out = vec![0x00];
        out.extend(self.to_uncompressed_point());
        out
    }

    pub fn to_der(&self) -> Vec<u8> {
        let value = Value::Sequence(vec![
            Value::Sequence(vec![
                Value::Oid(ID_EC_PUBLIC_KEY_OID.to_vec()),
                Value::Oid(self.curve.oid.to_vec()),
            ]),
            Value::BitString(self.to_uncompressed_point()),
        ]);
        der::encode(&value)
    }

    pub fn to_pem(&self) -> String {
        pem::encode("PUBLIC KEY", &self.to_der())
    }

    pub fn from_der(bytes: &[u8]) -> Result<Self, Error> {
        let value = der::decode_exact(bytes)?;
        let items = value.as_sequence()?;
        if items.len() != 2 {
            return Err(Error::TrailingData(hex::encode(bytes)));
        }
        let alg = items[0].as_sequence()?;
        if alg.len() != 2 {
            return Err(Error::TrailingData(hex::encode(bytes)));
        }
        let alg_oid = alg[0].as_oid()?;
        if alg_oid != ID_EC_PUBLIC_KEY_OID {
            return Err(Error::UnexpectedAlgorithmOid {
                wanted: ID_EC_PUBLIC_KEY_OID.to_vec(),
                got: alg_oid.to_vec(),
            });
        }
        let curve_oid = alg[1].as_oid()?;
        let curve = Curve::by_oid(curve_oid)?;

        let bits = items[1].as_bit_string()?;
        let point = point_from_uncompressed(bits, curve.element_len())?;
        Ok(Self { point, curve })
    }

    pub fn from_der_unwrap(bytes: &[u8]) -> Self {
        Self::from_der(bytes).expect("malformed SubjectPublicKeyInfo DER")
    }

    /// Like [`PublicKey::from_der`], but additionally checks the point is
    /// in range, on the curve, not at infinity, and that `N*Q = O`.
    pub fn from_der_validated(bytes: &[u8]) -> Result<Self, Error> {
        let key = Self::from_der(bytes)?;
        key.validate()?;
        Ok(key)
    }

    pub fn from_pem(input: &str) -> Result<Self, Error> {
        let (label, der) = pem::decode(input)?;
        if label != "PUBLIC KEY" {
            return Err(Error::InvalidPem(format!("unexpected PEM label: {label}")));
        }
        Self::from_der(&der)
    }

    pub fn from_pem_unwrap(input: &str) -> Self {
        Self::from_pem(input).expect("malformed PUBLIC KEY PEM")
    }

    /// `0 <= x,y < P`, on-curve, not at infinity, and `N*Q = O`.
    pub fn validate(&self) -> Result<(), Error> {
        let (x, y) = match self.point {
            AffinePoint::Infinity => return Err(Error::PointAtInfinity),
            AffinePoint::Affine { x, y } => (x, y),
        };
        if x >= self.curve.p || y >= self.curve.p {
            return Err(Error::PointOutOfRange);
        }
        if !self.curve.contains(&self.point) {
            return Err(Error::PointNotOnCurve);
        }
        let check = self.point.multiply(self.curve.n, self.curve);
        if !check.is_infinity() {
            return Err(Error::CofactorCheckFailed);
        }
        Ok(())
    }
}

fn point_from_uncompressed(bits: &[u8], element_len: usize) -> Result<AffinePoint, Error> {
    // `bits` here is already past the unused-bits byte (der::decode strips it).
    let expected = 1 + 2 * element_len;
    if bits.len() != expected || bits[0] != 0x04 {
        return Err(Error::WrongLength {
            expected,
            found: bits.len(),
        });
    }
    let x = U256::from_big_endian(&bits[1..1 + element_len]);
    let y = U256::from_big_endian(&bits[1 + element_len..]);
    Ok(AffinePoint::Affine { x, y })
}

fn fixed_width_be(v: U256, len: usize) -> Vec<u8> {
    let mut full = [0u8; 32];
    v.to_big_endian(&mut full);
    full[32 - len..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{PRIME256V1, SECP256K1};
    use rand::rngs::OsRng;

    #[test]
    fn private_key_der_round_trips() {
        let key = PrivateKey::generate(&SECP256K1, &mut OsRng);
        let back = PrivateKey::from_der(&key.to_der()).unwrap();
        assert_eq!(key, back);
    }

    #[test]
    fn private_key_pem_round_trips() {
        let key = PrivateKey::generate(&PRIME256V1, &mut OsRng);
        let back = PrivateKey::from_pem(&key.to_pem()).unwrap();
        assert_eq!(key, back);
    }

    #[test]
    fn public_key_der_round_trips() {
        let key = PrivateKey::generate(&SECP256K1, &mut OsRng);
        let pubkey = key.public_key();
        let back = PublicKey::from_der(&pubkey.to_der()).unwrap();
        assert_eq!(pubkey, back);
    }

    #[test]
    fn public_key_pem_round_trips() {
        let key = PrivateKey::generate(&PRIME256V1, &mut OsRng);
        let pubkey = key.public_key();
        let back = PublicKey::from_pem(&pubkey.to_pem()).unwrap();
        assert_eq!(pubkey, back);
    }

    #[test]
    fn public_key_raw_string_round_trips_coordinates() {
        let key = PrivateKey::generate(&SECP256K1, &mut OsRng);
        let pubkey = key.public_key();
        let raw = pubkey.to_raw_string();
        assert_eq!(raw[0], 0x00);
        assert_eq!(raw[1], 0x04);
        let l = SECP256K1.element_len();
        let x = U256::from_big_endian(&raw[2..2 + l]);
        let y = U256::from_big_endian(&raw[2 + l..]);
        assert_eq!(AffinePoint::Affine { x, y }, pubkey.point);
    }

    #[test]
    fn generated_public_key_validates() {
        let key = PrivateKey::generate(&SECP256K1, &mut OsRng);
        let pubkey = key.public_key();
        assert!(pubkey.validate().is_ok());
    }

    #[test]
    fn private_key_der_has_sec1_shape() {
        let key = PrivateKey::generate(&SECP256K1, &mut OsRng);
        let der = key.to_der();
        assert_eq!(der[0], der::TAG_SEQUENCE);
    }

    #[test]
    fn private_key_der_rejects_non_unit_version() {
        let l = SECP256K1.element_len();
        let value = Value::Sequence(vec![
            Value::integer_from_u256(U256::from(2)),
            Value::OctetString(fixed_width_be(U256::one(), l)),
            Value::Constructed(0, Box::new(Value::Oid(SECP256K1.oid.to_vec()))),
            Value::Constructed(
                1,
                Box::new(Value::BitString(
                    PublicKey {
                        point: SECP256K1.generator(),
                        curve: &*SECP256K1,
                    }
                    .to_uncompressed_point(),
                )),
            ),
        ]);
        let bytes = der::encode(&value);
        assert!(matches!(
            PrivateKey::from_der(&bytes),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn public_key_der_rejects_wrong_algorithm_oid() {
        let rsa_oid = vec![1, 2, 840, 113549, 1, 1, 1];
        let value = Value::Sequence(vec![
            Value::Sequence(vec![Value::Oid(rsa_oid), Value::Oid(SECP256K1.oid.to_vec())]),
            Value::BitString(
                PublicKey {
                    point: SECP256K1.generator(),
                    curve: &*SECP256K1,
                }
                .to_uncompressed_point(),
            ),
        ]);
        let bytes = der::encode(&value);
        assert!(matches!(
            PublicKey::from_der(&bytes),
            Err(Error::UnexpectedAlgorithmOid { .. })
        ));
    }
}
