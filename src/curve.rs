//! The curve-parameter registry: immutable records for every short
//! Weierstrass curve this crate knows about, looked up by name or by OID.

use once_cell::sync::Lazy;
use primitive_types::U256;

use crate::error::Error;
use crate::point::AffinePoint;

/// `y^2 = x^3 + A*x + B (mod P)`, a generator `G` of prime order `N`.
///
/// Curve records are built once, lazily, and never mutated — there is
/// exactly one `Curve` value per supported curve, shared by reference
/// everywhere a `PrivateKey`/`PublicKey` names its curve.
#[derive(Debug, PartialEq, Eq)]
pub struct Curve {
    pub name: &'static str,
    pub oid: &'static [u64],
    pub a: U256,
    pub b: U256,
    pub p: U256,
    pub n: U256,
    pub gx: U256,
    pub gy: U256,
}

impl Curve {
    /// `G`, the generator, as an affine point.
    pub fn generator(&self) -> AffinePoint {
        AffinePoint::Affine {
            x: self.gx,
            y: self.gy,
        }
    }

    /// `true` iff `point` is on this curve: coordinates in range and
    /// `y^2 - (x^3 + A*x + B) ≡ 0 (mod P)`.
    pub fn contains(&self, point: &AffinePoint) -> bool {
        let (x, y) = match point {
            AffinePoint::Infinity => return false,
            AffinePoint::Affine { x, y } => (*x, *y),
        };
        if x >= self.p || y >= self.p {
            return false;
        }
        let lhs = crate::bigint::mul_mod(y, y, self.p);
        let x3 = crate::bigint::mul_mod(crate::bigint::mul_mod(x, x, self.p), x, self.p);
        let ax = crate::bigint::mul_mod(self.a, x, self.p);
        let rhs = crate::bigint::add_mod(crate::bigint::add_mod(x3, ax, self.p), self.b, self.p);
        lhs == rhs
    }

    /// Byte length of a field element for this curve: `⌈bits(N)/8⌉`.
    /// `32` for both built-in curves.
    pub fn element_len(&self) -> usize {
        bit_len(self.n).div_ceil(8)
    }

    pub fn by_name(name: &str) -> Result<&'static Curve, Error> {
        registry()
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| Error::UnknownCurve(name.to_string()))
    }

    pub fn by_oid(oid: &[u64]) -> Result<&'static Curve, Error> {
        registry()
            .iter()
            .find(|c| c.oid == oid)
            .copied()
            .ok_or_else(|| Error::UnknownOid(oid.to_vec()))
    }
}

fn bit_len(v: U256) -> usize {
    if v.is_zero() {
        0
    } else {
        v.bits()
    }
}

fn hex(s: &str) -> U256 {
    U256::from_str_radix(s, 16).expect("hard-coded curve constant")
}

fn registry() -> &'static [&'static Curve; 2] {
    static REGISTRY: Lazy<[&'static Curve; 2]> = Lazy::new(|| [&*SECP256K1, &*PRIME256V1]);
    &REGISTRY
}

/// `1.2.840.10045.2.1` — `id-ecPublicKey`, the algorithm OID every
/// SubjectPublicKeyInfo / SEC1 envelope this crate emits carries.
pub const ID_EC_PUBLIC_KEY_OID: &[u64] = &[1, 2, 840, 10045, 2, 1];

/// SEC2 parameters for secp256k1 (<https://www.secg.org/sec2-v2.pdf>).
pub static SECP256K1: Lazy<Curve> = Lazy::new(|| Curve {
    name: "secp256k1",
    oid: &[1, 3, 132, 0, 10],
    a: U256::zero(),
    b: hex("7"),
    p: hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F"),
    n: hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"),
    gx: hex("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798"),
    gy: hex("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8"),
});

/// NIST P-256 / `prime256v1` parameters (FIPS 186-4).
pub static PRIME256V1: Lazy<Curve> = Lazy::new(|| Curve {
    name: "prime256v1",
    oid: &[1, 2, 840, 10045, 3, 1, 7],
    a: hex("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC"),
    b: hex("5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B"),
    p: hex("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF"),
    n: hex("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551"),
    gx: hex("6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296"),
    gy: hex("4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5"),
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_on_both_curves() {
        assert!(SECP256K1.contains(&SECP256K1.generator()));
        assert!(PRIME256V1.contains(&PRIME256V1.generator()));
    }

    #[test]
    fn element_len_is_32_for_both_curves() {
        assert_eq!(SECP256K1.element_len(), 32);
        assert_eq!(PRIME256V1.element_len(), 32);
    }

    #[test]
    fn lookup_by_name_is_case_insensitive() {
        assert_eq!(Curve::by_name("SECP256K1").unwrap().name, "secp256k1");
        assert_eq!(Curve::by_name("prime256v1").unwrap().name, "prime256v1");
        assert!(Curve::by_name("not-a-curve").is_err());
    }

    #[test]
    fn lookup_by_oid_round_trips() {
        assert_eq!(Curve::by_oid(SECP256K1.oid).unwrap().name, "secp256k1");
        assert_eq!(Curve::by_oid(PRIME256V1.oid).unwrap().name, "prime256v1");
    }
}
