//! Fixed-256-bit arithmetic helpers shared by the curve and field code.
//!
//! `primitive_types::U256` stands in for an arbitrary-precision integer:
//! every field element and scalar of the two built-in curves fits in 256
//! bits, so a 256-bit word is sufficient "bignum" for this crate's purposes
//! without reaching for the host's native machine integers.

use primitive_types::{U256, U512};
use rand_core::CryptoRngCore;

/// `x mod n`, normalized into `[0, n)`.
///
/// `U256` has no negative values, so the only normalization `modulo` ever
/// has to do is the ordinary remainder; it exists as a named operation
/// because callers that generalize to signed bignums (the extended
/// Euclidean algorithm below) need the sign-correct version.
pub fn modulo(x: U256, n: U256) -> U256 {
    x % n
}

/// `base^exp mod n`, by square-and-multiply. `exp = 0` yields `1`.
pub fn pow_mod(base: U256, exp: U256, n: U256) -> U256 {
    if n == U256::one() {
        return U256::zero();
    }
    let mut result = U256::one();
    let mut base = modulo(base, n);
    let mut exp = exp;
    while exp > U256::zero() {
        if exp.bit(0) {
            result = mul_mod(result, base, n);
        }
        exp >>= 1;
        if exp > U256::zero() {
            base = mul_mod(base, base, n);
        }
    }
    result
}

/// `(a + b) mod n`, guarding against the `U256` addition overflowing.
pub fn add_mod(a: U256, b: U256, n: U256) -> U256 {
    let a = modulo(a, n);
    let b = modulo(b, n);
    let (sum, overflowed) = a.overflowing_add(b);
    if overflowed {
        // sum wrapped past 2**256; add back the amount that wrapping lost.
        let wrapped_back = U256::MAX - n + U256::one();
        modulo(sum + wrapped_back, n)
    } else {
        modulo(sum, n)
    }
}

/// `(a - b) mod n`.
pub fn sub_mod(a: U256, b: U256, n: U256) -> U256 {
    let a = modulo(a, n);
    let b = modulo(b, n);
    if a >= b {
        a - b
    } else {
        n - (b - a)
    }
}

/// `(a * b) mod n` via a widening multiply into `U512`, then a single
/// reduction — the optimization noted but not taken in the source this
/// crate is descended from (its double-and-add multiplier is `O(256)`
/// additions per multiplication; this is one multiply and one divide).
pub fn mul_mod(a: U256, b: U256, n: U256) -> U256 {
    let product: U512 = a.full_mul(b);
    let (_, rem) = product.div_mod(n.into());
    rem.try_into()
        .expect("remainder of a U512 mod a U256 modulus always fits in U256")
}

/// Modular inverse via the extended Euclidean algorithm.
///
/// `inv(0, n) = 0` by convention: callers must not rely on this holding
/// any particular algebraic meaning, only that it does not panic.
pub fn inv_mod(x: U256, n: U256) -> U256 {
    if x.is_zero() {
        return U256::zero();
    }

    // Extended Euclidean algorithm, carried out on (value, sign) pairs so
    // the intermediate "negative" remainders and coefficients can be
    // represented with the unsigned U256 this crate uses everywhere else.
    let (mut old_r, mut r) = (n, modulo(x, n));
    let (mut old_s, mut s) = (Signed::zero(), Signed::one());

    while !r.is_zero() {
        let quotient = old_r / r;
        let new_r = old_r - quotient * r;
        old_r = r;
        r = new_r;

        let new_s = old_s.sub(&s.mul_u256(quotient));
        old_s = s;
        s = new_s;
    }

    // old_r is now gcd(x, n), which must be 1 for x to be invertible mod n.
    old_s.reduce(n)
}

/// A signed `U256` magnitude, just large enough for the extended Euclidean
/// algorithm's Bezout coefficients, which alternate sign every step.
#[derive(Clone, Copy)]
struct Signed {
    negative: bool,
    magnitude: U256,
}

impl Signed {
    fn zero() -> Self {
        Self {
            negative: false,
            magnitude: U256::zero(),
        }
    }

    fn one() -> Self {
        Self {
            negative: false,
            magnitude: U256::one(),
        }
    }

    fn mul_u256(&self, rhs: U256) -> Self {
        Self {
            negative: self.negative,
            magnitude: self.magnitude * rhs,
        }
    }

    fn sub(&self, rhs: &Self) -> Self {
        // self - rhs, with independent signs on each operand.
        if self.negative == rhs.negative {
            if self.magnitude >= rhs.magnitude {
                Self {
                    negative: self.negative,
                    magnitude: self.magnitude - rhs.magnitude,
                }
            } else {
                Self {
                    negative: !self.negative,
                    magnitude: rhs.magnitude - self.magnitude,
                }
            }
        } else {
            Self {
                negative: self.negative,
                magnitude: self.magnitude + rhs.magnitude,
            }
        }
    }

    /// Fold back into `[0, n)`.
    fn reduce(&self, n: U256) -> U256 {
        let m = modulo(self.magnitude, n);
        if self.negative && !m.is_zero() {
            n - m
        } else {
            m
        }
    }
}

/// Draw a uniform integer in the closed interval `[min, max]` with no
/// modulo bias: find the smallest byte count and bitmask covering the
/// range, draw that many random bytes, mask them, and reject-and-retry if
/// the result lands outside the range. Expected retries < 2.
pub fn between(min: U256, max: U256, rng: &mut impl CryptoRngCore) -> U256 {
    assert!(max >= min, "between: empty range");
    let range = max - min + U256::one();

    let bits = bit_length(range);
    let byte_count = bits.div_ceil(8).max(1);
    let mask = if bits >= 256 {
        U256::MAX
    } else {
        (U256::one() << bits) - U256::one()
    };

    loop {
        let mut buf = [0u8; 32];
        rng.fill_bytes(&mut buf[..byte_count]);
        // Interpret the drawn bytes little-endian.
        let mut value = U256::zero();
        for (i, byte) in buf[..byte_count].iter().enumerate() {
            value |= U256::from(*byte) << (8 * i);
        }
        value &= mask;
        if value < range {
            return min + value;
        }
    }
}

/// `⌈log2(range)⌉`: the number of bits needed so that `2^bits - 1 >= range - 1`.
fn bit_length(range: U256) -> usize {
    if range <= U256::one() {
        return 0;
    }
    (range - U256::one()).bits()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn add_mod_wraps_correctly() {
        let p = U256::from_str_radix(
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
            16,
        )
        .unwrap();
        let a = p - U256::one();
        let b = U256::from(3);
        assert_eq!(add_mod(a, b, p), U256::from(2));
    }

    #[test]
    fn sub_mod_wraps_correctly() {
        let p = U256::from(11);
        assert_eq!(sub_mod(U256::from(2), U256::from(5), p), U256::from(8));
    }

    #[test]
    fn mul_mod_matches_naive() {
        let p = U256::from(0xFFFFu64);
        let a = U256::from(0xABCDu64);
        let b = U256::from(0x1234u64);
        let expected = (0xABCDu64 * 0x1234u64) % 0xFFFFu64;
        assert_eq!(mul_mod(a, b, p), U256::from(expected));
    }

    #[test]
    fn pow_mod_known_value() {
        assert_eq!(pow_mod(U256::from(2), U256::from(10), U256::from(1000)), U256::from(24));
        assert_eq!(pow_mod(U256::from(5), U256::zero(), U256::from(97)), U256::one());
    }

    #[test]
    fn inv_mod_is_multiplicative_inverse() {
        let p = U256::from(97);
        for x in 1u64..97 {
            let inv = inv_mod(U256::from(x), p);
            assert_eq!(mul_mod(U256::from(x), inv, p), U256::one());
        }
    }

    #[test]
    fn inv_mod_zero_is_zero_by_convention() {
        assert_eq!(inv_mod(U256::zero(), U256::from(97)), U256::zero());
    }

    #[test]
    fn between_stays_within_bounds() {
        let min = U256::from(1);
        let max = U256::from(6);
        for _ in 0..10_000 {
            let v = between(min, max, &mut OsRng);
            assert!(v >= min && v <= max);
        }
    }

    #[test]
    fn between_full_width_range_does_not_panic() {
        let n = U256::from_str_radix(
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
            16,
        )
        .unwrap();
        for _ in 0..100 {
            let v = between(U256::one(), n - U256::one(), &mut OsRng);
            assert!(v >= U256::one() && v <= n - U256::one());
        }
    }
}
