//! `sign`/`verify`: the nonce draw, the `(r, s)` computation, the
//! verification equation, and the defensive range/infinity/on-curve
//! checks.

use digest::Digest;
use primitive_types::U256;
use rand_core::CryptoRngCore;

use crate::bigint::{add_mod, between, inv_mod, mul_mod};
use crate::curve::Curve;
use crate::error::Error;
use crate::key::{PrivateKey, PublicKey};
use crate::point::AffinePoint;
use crate::signature::Signature;

/// `int(hash(message))`, big-endian, truncated to the leftmost 32 bytes.
/// Both built-in curves have a 256-bit order, so a 32-byte hash (the
/// default, SHA-256) needs no further truncation; a wider digest is cut
/// down to the same width this crate's field elements use.
pub fn hash_to_integer<D: Digest>(message: &[u8]) -> U256 {
    let digest = D::digest(message);
    let len = digest.len().min(32);
    U256::from_big_endian(&digest[..len])
}

/// Sign `message` with `key`, drawing the per-signature nonce from `rng`.
///
/// Retries with a fresh nonce when `r` or `s` comes out to zero — the
/// degenerate case the source this crate descends from does not guard
/// against (see the crate's design notes). The probability of hitting it
/// for either built-in curve is astronomically small.
pub fn sign<D: Digest>(
    message: &[u8],
    key: &PrivateKey,
    rng: &mut impl CryptoRngCore,
) -> Result<Signature, Error> {
    let curve = key.curve;
    let e = hash_to_integer::<D>(message);

    loop {
        let k = between(U256::one(), curve.n - U256::one(), rng);
        let r_point = curve.generator().multiply(k, curve);
        let x1 = match r_point {
            AffinePoint::Infinity => continue,
            AffinePoint::Affine { x, .. } => x,
        };
        let r = x1 % curve.n;
        if r.is_zero() {
            continue;
        }

        let k_inv = inv_mod(k, curve.n);
        let s = mul_mod(k_inv, add_mod(e, mul_mod(r, key.secret, curve.n), curve.n), curve.n);
        if s.is_zero() {
            continue;
        }

        return Ok(Signature::new(r, s));
    }
}

/// Verify `signature` over `message` against `key`. Returns `false` on
/// any shape-level failure (out-of-range `r`/`s`, point at infinity) —
/// it never surfaces an `Error`.
pub fn verify<D: Digest>(message: &[u8], signature: &Signature, key: &PublicKey) -> bool {
    let curve = key.curve;
    let n = curve.n;

    if signature.r.is_zero() || signature.r >= n || signature.s.is_zero() || signature.s >= n {
        return false;
    }

    let e = hash_to_integer::<D>(message);
    let w = inv_mod(signature.s, n);
    let u1 = mul_mod(e, w, n);
    let u2 = mul_mod(signature.r, w, n);

    let v = curve
        .generator()
        .multiply(u1, curve)
        .add(&key.point.multiply(u2, curve), curve);

    match v {
        AffinePoint::Infinity => false,
        AffinePoint::Affine { x, .. } => x % n == signature.r,
    }
}

pub use sha2::Sha256;

/// Convenience wrapper over [`sign`] defaulting to SHA-256.
pub fn sign_sha256(
    message: &[u8],
    key: &PrivateKey,
    rng: &mut impl CryptoRngCore,
) -> Result<Signature, Error> {
    sign::<Sha256>(message, key, rng)
}

/// Convenience wrapper over [`verify`] defaulting to SHA-256.
pub fn verify_sha256(message: &[u8], signature: &Signature, key: &PublicKey) -> bool {
    verify::<Sha256>(message, signature, key)
}
