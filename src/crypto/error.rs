// Error types for key construction and decoding

use thiserror::Error;

/// Reasons a curve point or public key could not be built.
///
/// Each construction path fails with one specific variant so callers can
/// branch on the kind rather than the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("first argument is required, please include public key data")]
    MissingArgument,

    #[error("first argument is an unrecognized data format")]
    UnrecognizedInputType,

    #[error("invalid public key prefix: {0:#04x}")]
    UnrecognizedFormat(u8),

    #[error("invalid public key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid x,y value for curve, cannot equal 0 or exceed the field prime")]
    InvalidPointCoordinates,

    #[error("invalid y value for curve")]
    InvalidYForCurve,

    #[error("private scalar must be in the range [1, n)")]
    InvalidPrivateScalar,

    #[error("point cannot be equal to infinity")]
    PointAtInfinityForbidden,

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

pub type Result<T> = std::result::Result<T, KeyError>;
