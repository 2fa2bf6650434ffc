// Private scalar source consumed by key derivation

use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;

use super::error::{KeyError, Result};
use super::network::Network;
use super::params::curve;
use super::public_key::PublicKey;

/// Anything that can hand out a secret scalar for base-point multiplication.
///
/// Text encodings of private keys live with the caller; derivation only reads
/// the scalar and the network tag.
pub trait ScalarSource {
    /// Big-endian 32-byte scalar
    fn scalar_bytes(&self) -> [u8; 32];

    fn network(&self) -> Network;

    fn scalar(&self) -> BigUint {
        BigUint::from_bytes_be(&self.scalar_bytes())
    }
}

/// Minimal private key value: a scalar in [1, n) plus its network
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    bytes: [u8; 32],
    network: Network,
}

impl PrivateKey {
    /// Wrap a big-endian scalar, rejecting 0 and values >= n
    pub fn from_bytes(bytes: [u8; 32], network: Network) -> Result<Self> {
        let scalar = BigUint::from_bytes_be(&bytes);
        if scalar.is_zero() || scalar >= curve().n {
            return Err(KeyError::InvalidPrivateScalar);
        }
        Ok(Self { bytes, network })
    }

    /// Parse a 64-character hex scalar
    pub fn from_hex(hex_str: &str, network: Network) -> Result<Self> {
        let raw = hex::decode(hex_str).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
        let bytes: [u8; 32] = raw.as_slice().try_into().map_err(|_| KeyError::InvalidLength {
            expected: 32,
            actual: raw.len(),
        })?;
        Self::from_bytes(bytes, network)
    }

    /// Derive the compressed public key
    pub fn to_public_key(&self) -> Result<PublicKey> {
        PublicKey::from_private_key(self)
    }
}

impl ScalarSource for PrivateKey {
    fn scalar_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    fn network(&self) -> Network {
        self.network
    }
}

// Never print the scalar
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<PrivateKey: {}>", self.network)
    }
}
