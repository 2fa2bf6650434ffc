// Error types for merkle proofs

use thiserror::Error;

/// Structural problems with a proof or its encoding.
///
/// A proof that is well formed but whose root differs from the header is not
/// an error; see `MerkleVerification`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    #[error("merkle tree malformed: {0}")]
    MerkleTreeMalformed(String),

    #[error("merkle block truncated while reading {0}")]
    Truncated(&'static str),

    #[error("merkle block has {0} unexpected trailing bytes")]
    TrailingBytes(usize),

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl MerkleError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        MerkleError::MerkleTreeMalformed(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, MerkleError>;
