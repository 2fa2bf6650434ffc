// keyproof: secp256k1 public keys and merkle block proofs

pub mod core;
pub mod crypto;
pub mod merkle;
pub mod cli;

// Re-exports for convenience
pub use core::{BlockHeader, Hash256};
pub use crypto::{CurvePoint, KeyError, Network, PrivateKey, PublicKey, ScalarSource};
pub use merkle::{MerkleBlock, MerkleError, MerkleVerification, PartialMerkleTree};
pub use cli::{Cli, CliHandler};
