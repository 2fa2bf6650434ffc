// Block header

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::serialize::WireReader;
use crate::core::{hash256, Hash256};

/// Size of a serialized block header
pub const HEADER_SIZE: usize = 80;

/// Block header - 80 bytes on the wire, integers little-endian
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    /// Block version
    pub version: u32,
    /// Hash of the previous block
    pub prev_hash: Hash256,
    /// Merkle root of all transactions in the block
    pub merkle_root: Hash256,
    /// Block timestamp (Unix epoch)
    pub time: u32,
    /// Difficulty target (compact format)
    pub bits: u32,
    /// Nonce for proof-of-work
    pub nonce: u32,
}

impl BlockHeader {
    /// Create a new block header
    pub fn new(
        version: u32,
        prev_hash: Hash256,
        merkle_root: Hash256,
        time: u32,
        bits: u32,
        nonce: u32,
    ) -> Self {
        Self {
            version,
            prev_hash,
            merkle_root,
            time,
            bits,
            nonce,
        }
    }

    /// Double hash of the serialized header
    pub fn hash(&self) -> Hash256 {
        hash256(&self.to_bytes())
    }

    /// Serialize the block header (always 80 bytes)
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.version.to_le_bytes());
        buf[4..36].copy_from_slice(self.prev_hash.as_bytes());
        buf[36..68].copy_from_slice(self.merkle_root.as_bytes());
        buf[68..72].copy_from_slice(&self.time.to_le_bytes());
        buf[72..76].copy_from_slice(&self.bits.to_le_bytes());
        buf[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        buf
    }

    /// Deserialize a block header from exactly 80 bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, String> {
        if data.len() != HEADER_SIZE {
            return Err(format!(
                "Block header must be {} bytes, got {}",
                HEADER_SIZE,
                data.len()
            ));
        }
        let mut reader = WireReader::new(data);
        Self::read(&mut reader).ok_or_else(|| "Block header truncated".to_string())
    }

    /// Read a header from the front of a longer message
    pub fn read(reader: &mut WireReader) -> Option<Self> {
        Some(Self {
            version: reader.read_u32_le()?,
            prev_hash: reader.read_hash()?,
            merkle_root: reader.read_hash()?,
            time: reader.read_u32_le()?,
            bits: reader.read_u32_le()?,
            nonce: reader.read_u32_le()?,
        })
    }
}

// Objects carry the header hash for readers; it is recomputed, never trusted on input
impl Serialize for BlockHeader {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BlockHeader", 7)?;
        state.serialize_field("hash", &self.hash())?;
        state.serialize_field("version", &self.version)?;
        state.serialize_field("prevHash", &self.prev_hash)?;
        state.serialize_field("merkleRoot", &self.merkle_root)?;
        state.serialize_field("time", &self.time)?;
        state.serialize_field("bits", &self.bits)?;
        state.serialize_field("nonce", &self.nonce)?;
        state.end()
    }
}
