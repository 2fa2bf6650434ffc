// Basic protocol types

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// 256-bit hash (32 bytes) in internal byte order
/// Used for block hashes, transaction IDs, and Merkle roots
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Create a new Hash256 from a byte array
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a Hash256 from a slice in internal byte order
    pub fn from_slice(slice: &[u8]) -> Result<Self, String> {
        let bytes: [u8; 32] = slice
            .try_into()
            .map_err(|_| format!("Invalid hash length: expected 32, got {}", slice.len()))?;
        Ok(Self(bytes))
    }

    /// Get the hash as a byte array
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// All-zero hash
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Display hex (byte-reversed, Bitcoin convention)
    pub fn to_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }

    /// Parse display hex (byte-reversed)
    pub fn from_hex(hex_str: &str) -> Result<Self, String> {
        let mut hash = Self::from_internal_hex(hex_str)?;
        hash.0.reverse();
        Ok(hash)
    }

    /// Hex of the internal byte order, as the bytes appear on the wire
    pub fn to_internal_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse hex that is already in internal byte order
    pub fn from_internal_hex(hex_str: &str) -> Result<Self, String> {
        let bytes = hex::decode(hex_str).map_err(|e| format!("Invalid hex string: {}", e))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

// JSON form is the display hex
impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash256::from_hex(&s).map_err(de::Error::custom)
    }
}
