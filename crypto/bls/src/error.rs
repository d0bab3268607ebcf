use std::fmt;

/// Failure modes surfaced by this crate's thin wrapper over `blst`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `blst` rejected a point, scalar, or signature during decompression/validation.
    InvalidPoint,
    /// A byte slice handed to a `from_bytes` constructor had the wrong length.
    InvalidByteLength { got: usize, expected: usize },
    /// An aggregate signature was asked to absorb a signature that failed group-membership
    /// validation.
    InvalidSignature,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidPoint => write!(f, "invalid BLS curve point"),
            Error::InvalidByteLength { got, expected } => {
                write!(f, "invalid byte length: got {got}, expected {expected}")
            }
            Error::InvalidSignature => write!(f, "signature failed validation"),
        }
    }
}

impl std::error::Error for Error {}

impl From<blst::BLST_ERROR> for Error {
    fn from(e: blst::BLST_ERROR) -> Self {
        match e {
            blst::BLST_ERROR::BLST_BAD_ENCODING => Error::InvalidPoint,
            blst::BLST_ERROR::BLST_POINT_NOT_ON_CURVE => Error::InvalidPoint,
            blst::BLST_ERROR::BLST_POINT_NOT_IN_GROUP => Error::InvalidPoint,
            _ => Error::InvalidSignature,
        }
    }
}
