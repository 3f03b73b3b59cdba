//! Affine and Jacobian point arithmetic over a short Weierstrass curve.
//!
//! The source this crate descends from conflates "point at infinity" with
//! the sentinel `y == 0`. Per the redesign this spec calls for, both point
//! types are tagged enums instead: `Infinity` is a distinct variant, and
//! arithmetic never has to special-case a coordinate value to recognize
//! the identity element.

use primitive_types::U256;

use crate::bigint::{add_mod, inv_mod, mul_mod, sub_mod};
use crate::curve::Curve;

/// An affine point on the curve, or the point at infinity (additive
/// identity of the curve group).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffinePoint {
    Infinity,
    Affine { x: U256, y: U256 },
}

impl AffinePoint {
    pub fn is_infinity(&self) -> bool {
        matches!(self, AffinePoint::Infinity)
    }

    pub fn x(&self) -> Option<U256> {
        match self {
            AffinePoint::Infinity => None,
            AffinePoint::Affine { x, .. } => Some(*x),
        }
    }

    pub fn y(&self) -> Option<U256> {
        match self {
            AffinePoint::Infinity => None,
            AffinePoint::Affine { y, .. } => Some(*y),
        }
    }

    pub fn to_jacobian(self) -> JacobianPoint {
        match self {
            AffinePoint::Infinity => JacobianPoint::Infinity,
            AffinePoint::Affine { x, y } => JacobianPoint::Point { x, y, z: U256::one() },
        }
    }

    /// Scalar multiplication `scalar * self`, by way of Jacobian
    /// coordinates (double-and-add; see [`JacobianPoint::multiply`]).
    pub fn multiply(&self, scalar: U256, curve: &Curve) -> AffinePoint {
        self.to_jacobian().multiply(scalar, curve).to_affine(curve)
    }

    pub fn add(&self, other: &AffinePoint, curve: &Curve) -> AffinePoint {
        self.to_jacobian()
            .add(&other.to_jacobian(), curve)
            .to_affine(curve)
    }
}

/// A point in Jacobian projective coordinates: `(X, Y, Z)` represents the
/// affine point `(X/Z^2, Y/Z^3)`. Used internally by the scalar multiplier
/// to avoid a field inversion at every doubling/addition step.
#[derive(Debug, Clone, Copy)]
pub enum JacobianPoint {
    Infinity,
    Point { x: U256, y: U256, z: U256 },
}

impl JacobianPoint {
    pub fn is_infinity(&self) -> bool {
        matches!(self, JacobianPoint::Infinity)
    }

    /// `(X/Z^2, Y/Z^3)`.
    pub fn to_affine(&self, curve: &Curve) -> AffinePoint {
        let (x, y, z) = match self {
            JacobianPoint::Infinity => return AffinePoint::Infinity,
            JacobianPoint::Point { x, y, z } => (*x, *y, *z),
        };
        let p = curve.p;
        let z_inv = inv_mod(z, p);
        let z_inv2 = mul_mod(z_inv, z_inv, p);
        let z_inv3 = mul_mod(z_inv2, z_inv, p);
        AffinePoint::Affine {
            x: mul_mod(x, z_inv2, p),
            y: mul_mod(y, z_inv3, p),
        }
    }

    /// `2P`.
    pub fn double(&self, curve: &Curve) -> JacobianPoint {
        let (x, y, z) = match self {
            JacobianPoint::Infinity => return JacobianPoint::Infinity,
            JacobianPoint::Point { x, y, z } => (*x, *y, *z),
        };
        if y.is_zero() {
            return JacobianPoint::Infinity;
        }
        let p = curve.p;

        let ysq = mul_mod(y, y, p);
        let s = mul_mod(U256::from(4), mul_mod(x, ysq, p), p);
        let z4 = mul_mod(mul_mod(z, z, p), mul_mod(z, z, p), p);
        let m = add_mod(
            mul_mod(U256::from(3), mul_mod(x, x, p), p),
            mul_mod(curve.a, z4, p),
            p,
        );

        let rx = sub_mod(mul_mod(m, m, p), mul_mod(U256::from(2), s, p), p);
        let ry = sub_mod(
            mul_mod(m, sub_mod(s, rx, p), p),
            mul_mod(U256::from(8), mul_mod(ysq, ysq, p), p),
            p,
        );
        let rz = mul_mod(U256::from(2), mul_mod(y, z, p), p);

        JacobianPoint::Point { x: rx, y: ry, z: rz }
    }

    /// `P + Q`.
    pub fn add(&self, other: &JacobianPoint, curve: &Curve) -> JacobianPoint {
        let (x1, y1, z1) = match self {
            JacobianPoint::Infinity => return *other,
            JacobianPoint::Point { x, y, z } => (*x, *y, *z),
        };
        let (x2, y2, z2) = match other {
            JacobianPoint::Infinity => return *self,
            JacobianPoint::Point { x, y, z } => (*x, *y, *z),
        };
        let p = curve.p;

        let z1z1 = mul_mod(z1, z1, p);
        let z2z2 = mul_mod(z2, z2, p);

        let u1 = mul_mod(x1, z2z2, p);
        let u2 = mul_mod(x2, z1z1, p);
        let s1 = mul_mod(y1, mul_mod(z2, z2z2, p), p);
        let s2 = mul_mod(y2, mul_mod(z1, z1z1, p), p);

        if u1 == u2 {
            if s1 != s2 {
                return JacobianPoint::Infinity;
            }
            return self.double(curve);
        }

        let h = sub_mod(u2, u1, p);
        let h2 = mul_mod(h, h, p);
        let h3 = mul_mod(h2, h, p);
        let r = sub_mod(s2, s1, p);
        let v = mul_mod(u1, h2, p);

        let x3 = sub_mod(
            sub_mod(mul_mod(r, r, p), h3, p),
            mul_mod(U256::from(2), v, p),
            p,
        );
        let y3 = sub_mod(mul_mod(r, sub_mod(v, x3, p), p), mul_mod(s1, h3, p), p);
        let z3 = mul_mod(h, mul_mod(z1, z2, p), p);

        JacobianPoint::Point { x: x3, y: y3, z: z3 }
    }

    /// Double-and-add scalar multiplication. `scalar` is normalized into
    /// `[0, N)` first, so callers never have to reduce it themselves.
    pub fn multiply(&self, scalar: U256, curve: &Curve) -> JacobianPoint {
        if self.is_infinity() || scalar.is_zero() {
            return JacobianPoint::Infinity;
        }
        let scalar = scalar % curve.n;
        if scalar.is_zero() {
            return JacobianPoint::Infinity;
        }
        if scalar == U256::one() {
            return *self;
        }

        let half = scalar / U256::from(2);
        let half_result = self.multiply(half, curve).double(curve);
        if scalar.bit(0) {
            half_result.add(self, curve)
        } else {
            half_result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::SECP256K1;

    #[test]
    fn generator_round_trips_through_jacobian() {
        let g = SECP256K1.generator();
        let back = g.to_jacobian().to_affine(&SECP256K1);
        assert_eq!(g, back);
    }

    #[test]
    fn doubling_matches_addition_with_itself() {
        let g = SECP256K1.generator().to_jacobian();
        let doubled = g.double(&SECP256K1).to_affine(&SECP256K1);
        let added = g.add(&g, &SECP256K1).to_affine(&SECP256K1);
        assert_eq!(doubled, added);
    }

    #[test]
    fn n_times_generator_is_infinity() {
        let g = SECP256K1.generator().to_jacobian();
        let result = g.multiply(SECP256K1.n, &SECP256K1);
        assert!(result.is_infinity());
    }

    #[test]
    fn scalar_one_is_identity_for_multiply() {
        let g = SECP256K1.generator();
        let result = g.multiply(U256::one(), &SECP256K1);
        assert_eq!(result, g);
    }

    #[test]
    fn random_multiple_of_generator_is_on_curve() {
        let g = SECP256K1.generator();
        let k = U256::from(123456789u64);
        let point = g.multiply(k, &SECP256K1);
        assert!(SECP256K1.contains(&point));
    }
}
