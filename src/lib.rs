//! Pure-Rust ECDSA over short Weierstrass curves, with ASN.1 DER / PEM
//! encodings matching what OpenSSL emits for `secp256k1` and
//! `prime256v1` (NIST P-256).

pub mod bigint;
pub mod curve;
pub mod der;
pub mod ecdsa;
pub mod error;
pub mod key;
pub mod pem;
pub mod point;
pub mod signature;

pub use curve::{Curve, PRIME256V1, SECP256K1};
pub use ecdsa::{sign, sign_sha256, verify, verify_sha256};
pub use error::Error;
pub use key::{PrivateKey, PublicKey};
pub use point::AffinePoint;
pub use signature::Signature;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn end_to_end_sign_and_verify_on_secp256k1() {
        let key = PrivateKey::generate(&SECP256K1, &mut OsRng);
        let pubkey = key.public_key();
        let message = b"the quick brown fox jumps over the lazy dog";

        let sig = sign_sha256(message, &key, &mut OsRng).unwrap();
        assert!(verify_sha256(message, &sig, &pubkey));

        let recovered_key = PrivateKey::from_pem(&key.to_pem()).unwrap();
        let recovered_pub = PublicKey::from_pem(&pubkey.to_pem()).unwrap();
        assert!(verify_sha256(message, &sig, &recovered_pub));
        assert_eq!(recovered_key.public_key(), recovered_pub);
    }
}
