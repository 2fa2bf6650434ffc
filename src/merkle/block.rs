// Merkle block: a header plus a partial merkle tree proving some of its transactions

use serde::{Deserialize, Serialize};

use super::error::{MerkleError, Result};
use super::partial::{MerkleVerification, PartialMerkleTree};
use crate::core::{write_varint, BlockHeader, Hash256, WireReader, HEADER_SIZE};

/// Filtered block as relayed in a `merkleblock` message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleBlock {
    pub header: BlockHeader,
    #[serde(flatten)]
    pub tree: PartialMerkleTree,
}

impl MerkleBlock {
    pub fn new(header: BlockHeader, tree: PartialMerkleTree) -> Self {
        Self { header, tree }
    }

    /// Parse the wire form:
    /// header (80) ‖ u32 LE leaf count ‖ varint + hashes ‖ varint + flag bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(data);

        let header = BlockHeader::read(&mut reader).ok_or(MerkleError::Truncated("header"))?;
        let num_transactions = reader
            .read_u32_le()
            .ok_or(MerkleError::Truncated("transaction count"))?;

        let hash_count = reader
            .read_varint()
            .ok_or(MerkleError::Truncated("hash count"))?;
        // Checked against the remaining input before allocating
        if hash_count > (reader.remaining() / 32) as u64 {
            return Err(MerkleError::Truncated("hashes"));
        }
        let mut hashes = Vec::with_capacity(hash_count as usize);
        for _ in 0..hash_count {
            hashes.push(reader.read_hash().ok_or(MerkleError::Truncated("hashes"))?);
        }

        let flag_count = reader
            .read_varint()
            .ok_or(MerkleError::Truncated("flag count"))?;
        if flag_count > reader.remaining() as u64 {
            return Err(MerkleError::Truncated("flags"));
        }
        let flags = reader
            .read_bytes(flag_count as usize)
            .ok_or(MerkleError::Truncated("flags"))?
            .to_vec();

        if reader.remaining() > 0 {
            return Err(MerkleError::TrailingBytes(reader.remaining()));
        }

        log::debug!(
            "Decoded merkle block {}: {} transactions, {} hashes, {} flag bytes",
            header.hash(),
            num_transactions,
            hashes.len(),
            flags.len()
        );

        Ok(Self::new(
            header,
            PartialMerkleTree::new(num_transactions, hashes, flags),
        ))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.trim()).map_err(|e| MerkleError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let tree = &self.tree;
        let mut buf = Vec::with_capacity(
            HEADER_SIZE + 4 + 9 + tree.hashes().len() * 32 + 9 + tree.flags().len(),
        );

        buf.extend_from_slice(&self.header.to_bytes());
        buf.extend_from_slice(&tree.num_transactions().to_le_bytes());
        write_varint(&mut buf, tree.hashes().len() as u64);
        for hash in tree.hashes() {
            buf.extend_from_slice(hash.as_bytes());
        }
        write_varint(&mut buf, tree.flags().len() as u64);
        buf.extend_from_slice(tree.flags());

        buf
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Walk the proof and compare against the header's merkle root
    pub fn verify(&self) -> Result<MerkleVerification> {
        let verification = self.tree.verify(&self.header.merkle_root)?;
        if !verification.is_valid() {
            log::info!(
                "Merkle root mismatch for block {}: computed {}, header has {}",
                self.header.hash(),
                verification.computed_root,
                verification.expected_root
            );
        }
        Ok(verification)
    }

    /// True when the proof is well formed and commits to the header's root
    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.verify()?.is_valid())
    }

    /// Transaction hashes the proof reveals, whether or not the root matches
    pub fn filtered_tx_hashes(&self) -> Result<Vec<Hash256>> {
        let (matched, _) = self.tree.extract_matches()?;
        Ok(matched)
    }

    /// True when `txid` is a matched leaf of a valid proof
    pub fn has_transaction(&self, txid: &Hash256) -> Result<bool> {
        let verification = self.verify()?;
        Ok(verification.is_valid() && verification.matched.contains(txid))
    }
}
