// Merkle inclusion proofs for filtered blocks

mod block;
mod error;
mod partial;

pub use block::MerkleBlock;
pub use error::{MerkleError, Result};
pub use partial::{merkle_root, MerkleVerification, PartialMerkleTree, MAX_PROOF_TRANSACTIONS};
