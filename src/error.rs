use thiserror::Error;

/// Everything that can go wrong decoding, validating, or looking up
/// curve/key/signature material.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("unknown curve: {0}")]
    UnknownCurve(String),

    #[error("unknown curve oid: {0:?}")]
    UnknownOid(Vec<u64>),

    #[error("unexpected algorithm oid: wanted id-ecPublicKey {wanted:?}, got {got:?}")]
    UnexpectedAlgorithmOid { wanted: Vec<u64>, got: Vec<u64> },

    #[error("unsupported ECPrivateKey version: wanted 1, got {0}")]
    UnsupportedVersion(String),

    #[error("wanted tag {wanted:#04x}, got {got:#04x}")]
    TagMismatch { wanted: u8, got: u8 },

    #[error("truncated DER length at offset {offset}")]
    TruncatedLength { offset: usize },

    #[error("truncated DER value: expected {expected} bytes, found {found}")]
    TruncatedValue { expected: usize, found: usize },

    #[error("trailing data after top-level DER structure: {0}")]
    TrailingData(String),

    #[error("INTEGER first byte out of range: {0:#04x}")]
    IntegerOutOfRange(u8),

    #[error("malformed OBJECT IDENTIFIER")]
    MalformedOid,

    #[error("malformed constructed tag {0:#04x}")]
    MalformedConstructed(u8),

    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    #[error("invalid PEM: {0}")]
    InvalidPem(String),

    #[error("point is not on the curve")]
    PointNotOnCurve,

    #[error("point coordinates out of range for the field")]
    PointOutOfRange,

    #[error("point is the point at infinity")]
    PointAtInfinity,

    #[error("n*Q is not the point at infinity (cofactor/order check failed)")]
    CofactorCheckFailed,

    #[error("expected {expected} bytes, got {found}")]
    WrongLength { expected: usize, found: usize },
}
