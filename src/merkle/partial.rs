// Partial merkle trees
//
// A partial merkle tree proves that a subset of a block's transactions is
// committed to by the header's merkle root. The proof is the list of hashes
// the producer kept plus one flag bit per visited node, packed least
// significant bit first. Both sides walk the full binary tree depth-first,
// left before right:
//
// - flag 0: the node's hash is supplied, its subtree is not descended
// - flag 1 at a leaf: the supplied hash is a matched transaction
// - flag 1 above the leaves: descend; a missing right child reuses the left
//   value, and the node is hash256(left ‖ right)

use serde::{Deserialize, Serialize};

use super::error::{MerkleError, Result};
use crate::core::{merkle_parent, Hash256};

/// Largest leaf count a proof may declare: the 2 MB maximum block size
/// divided by the 60-byte minimum transaction size.
pub const MAX_PROOF_TRANSACTIONS: u32 = 2_000_000 / 60;

/// Flag bits and hashes of a pruned merkle tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialMerkleTree {
    /// Leaf count of the full tree
    num_transactions: u32,
    hashes: Vec<Hash256>,
    flags: Vec<u8>,
}

/// Result of walking a structurally sound proof
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleVerification {
    /// Matched transaction hashes, left to right
    pub matched: Vec<Hash256>,
    pub computed_root: Hash256,
    pub expected_root: Hash256,
}

impl MerkleVerification {
    /// True when the proof commits to the expected root
    pub fn is_valid(&self) -> bool {
        self.computed_root == self.expected_root
    }
}

impl PartialMerkleTree {
    pub fn new(num_transactions: u32, hashes: Vec<Hash256>, flags: Vec<u8>) -> Self {
        Self {
            num_transactions,
            hashes,
            flags,
        }
    }

    /// Build the proof for `txids` that reveals the leaves where `matches` is true
    pub fn from_txids(txids: &[Hash256], matches: &[bool]) -> Result<Self> {
        if txids.is_empty() {
            return Err(MerkleError::malformed("no transactions"));
        }
        if txids.len() != matches.len() {
            return Err(MerkleError::malformed(format!(
                "{} txids but {} match flags",
                txids.len(),
                matches.len()
            )));
        }
        let num_transactions = u32::try_from(txids.len())
            .map_err(|_| MerkleError::malformed("too many transactions"))?;

        let mut builder = Builder {
            txids,
            matches,
            shape: TreeShape::new(num_transactions),
            bits: Vec::new(),
            hashes: Vec::new(),
        };
        builder.build(builder.shape.height(), 0);

        let mut flags = vec![0u8; builder.bits.len().div_ceil(8)];
        for (i, bit) in builder.bits.iter().enumerate() {
            if *bit {
                flags[i / 8] |= 1 << (i % 8);
            }
        }

        Ok(Self::new(num_transactions, builder.hashes, flags))
    }

    pub fn num_transactions(&self) -> u32 {
        self.num_transactions
    }

    pub fn hashes(&self) -> &[Hash256] {
        &self.hashes
    }

    pub fn flags(&self) -> &[u8] {
        &self.flags
    }

    /// Height of the full tree: ceil(log2(num_transactions))
    pub fn height(&self) -> u32 {
        TreeShape::new(self.num_transactions).height()
    }

    /// Walk the proof and return the matched hashes and the computed root.
    ///
    /// Fails with `MerkleTreeMalformed` when the declared sizes are
    /// inconsistent, the hashes or flag bits run out, or hashes are left over.
    pub fn extract_matches(&self) -> Result<(Vec<Hash256>, Hash256)> {
        self.check_bounds()?;

        let mut walk = Traversal {
            tree: self,
            shape: TreeShape::new(self.num_transactions),
            bits_used: 0,
            hashes_used: 0,
            matched: Vec::new(),
        };
        let root = walk.visit(walk.shape.height(), 0)?;

        if walk.hashes_used != self.hashes.len() {
            return Err(self.reject(format!(
                "{} of {} hashes consumed",
                walk.hashes_used,
                self.hashes.len()
            )));
        }

        log::debug!(
            "Partial merkle tree: {} leaves, height {}, {} flag bits and {} hashes used, {} matched",
            self.num_transactions,
            walk.shape.height(),
            walk.bits_used,
            walk.hashes_used,
            walk.matched.len()
        );
        Ok((walk.matched, root))
    }

    /// Walk the proof and compare its root against `expected_root`.
    ///
    /// A mismatch is reported through `MerkleVerification::is_valid`, never as
    /// an error.
    pub fn verify(&self, expected_root: &Hash256) -> Result<MerkleVerification> {
        let (matched, computed_root) = self.extract_matches()?;
        Ok(MerkleVerification {
            matched,
            computed_root,
            expected_root: *expected_root,
        })
    }

    fn check_bounds(&self) -> Result<()> {
        let n = self.num_transactions;
        if n == 0 {
            return Err(self.reject("zero transactions"));
        }
        if n > MAX_PROOF_TRANSACTIONS {
            return Err(self.reject(format!(
                "{} transactions exceeds the limit of {}",
                n, MAX_PROOF_TRANSACTIONS
            )));
        }
        if self.hashes.len() > n as usize {
            return Err(self.reject(format!(
                "{} hashes for {} transactions",
                self.hashes.len(),
                n
            )));
        }
        if self.hashes.is_empty() || self.flags.is_empty() {
            return Err(self.reject("proof carries no hashes or no flag bits"));
        }
        if self.flags.len() * 8 < self.hashes.len() {
            return Err(self.reject(format!(
                "{} flag bits for {} hashes",
                self.flags.len() * 8,
                self.hashes.len()
            )));
        }
        Ok(())
    }

    fn reject(&self, reason: impl Into<String>) -> MerkleError {
        let err = MerkleError::malformed(reason);
        log::warn!("Rejecting partial merkle tree: {}", err);
        err
    }
}

/// Node counts per level of a tree with a given number of leaves
#[derive(Clone, Copy)]
struct TreeShape {
    leaves: u64,
}

impl TreeShape {
    fn new(leaves: u32) -> Self {
        Self {
            leaves: leaves as u64,
        }
    }

    /// Number of nodes at `height` above the leaves
    fn width(&self, height: u32) -> u64 {
        (self.leaves + (1u64 << height) - 1) >> height
    }

    fn height(&self) -> u32 {
        let mut height = 0;
        while self.width(height) > 1 {
            height += 1;
        }
        height
    }

    fn has_right_child(&self, height: u32, pos: u64) -> bool {
        pos * 2 + 1 < self.width(height - 1)
    }
}

struct Traversal<'a> {
    tree: &'a PartialMerkleTree,
    shape: TreeShape,
    bits_used: usize,
    hashes_used: usize,
    matched: Vec<Hash256>,
}

impl Traversal<'_> {
    fn next_flag(&mut self) -> Result<bool> {
        let byte = *self
            .tree
            .flags
            .get(self.bits_used / 8)
            .ok_or_else(|| self.tree.reject("ran out of flag bits"))?;
        let bit = (byte >> (self.bits_used % 8)) & 1 == 1;
        self.bits_used += 1;
        Ok(bit)
    }

    fn next_hash(&mut self) -> Result<Hash256> {
        let hash = *self
            .tree
            .hashes
            .get(self.hashes_used)
            .ok_or_else(|| self.tree.reject("ran out of hashes"))?;
        self.hashes_used += 1;
        Ok(hash)
    }

    fn visit(&mut self, height: u32, pos: u64) -> Result<Hash256> {
        let parent_of_match = self.next_flag()?;

        if height == 0 || !parent_of_match {
            let hash = self.next_hash()?;
            if height == 0 && parent_of_match {
                self.matched.push(hash);
            }
            return Ok(hash);
        }

        let left = self.visit(height - 1, pos * 2)?;
        let right = if self.shape.has_right_child(height, pos) {
            let right = self.visit(height - 1, pos * 2 + 1)?;
            if right == left {
                return Err(self.tree.reject("identical sibling subtrees"));
            }
            right
        } else {
            left
        };

        Ok(merkle_parent(&left, &right))
    }
}

struct Builder<'a> {
    txids: &'a [Hash256],
    matches: &'a [bool],
    shape: TreeShape,
    bits: Vec<bool>,
    hashes: Vec<Hash256>,
}

impl Builder<'_> {
    fn subtree_hash(&self, height: u32, pos: u64) -> Hash256 {
        if height == 0 {
            return self.txids[pos as usize];
        }
        let left = self.subtree_hash(height - 1, pos * 2);
        let right = if self.shape.has_right_child(height, pos) {
            self.subtree_hash(height - 1, pos * 2 + 1)
        } else {
            left
        };
        merkle_parent(&left, &right)
    }

    fn build(&mut self, height: u32, pos: u64) {
        let start = (pos << height) as usize;
        let end = (((pos + 1) << height) as usize).min(self.txids.len());
        let parent_of_match = self.matches[start..end].iter().any(|m| *m);
        self.bits.push(parent_of_match);

        if height == 0 || !parent_of_match {
            let hash = self.subtree_hash(height, pos);
            self.hashes.push(hash);
        } else {
            self.build(height - 1, pos * 2);
            if self.shape.has_right_child(height, pos) {
                self.build(height - 1, pos * 2 + 1);
            }
        }
    }
}

/// Merkle root over a full list of transaction hashes
pub fn merkle_root(txids: &[Hash256]) -> Option<Hash256> {
    if txids.is_empty() {
        return None;
    }

    let mut level = txids.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| merkle_parent(&pair[0], pair.get(1).unwrap_or(&pair[0])))
            .collect();
    }
    level.first().copied()
}
