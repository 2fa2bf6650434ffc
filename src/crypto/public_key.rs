// Public keys: validation and SEC1 encoding of secp256k1 points
//
// Encodings:
// - uncompressed: 0x04 ‖ X(32) ‖ Y(32), 65 bytes
// - compressed:   0x02/0x03 ‖ X(32), 33 bytes, 0x03 when Y is odd
// - object:       {"x": hex, "y": hex, "compressed": bool}

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::error::{KeyError, Result};
use super::network::Network;
use super::params::curve;
use super::point::CurvePoint;
use super::private_key::ScalarSource;
use crate::core::hash160;

pub const COMPRESSED_SIZE: usize = 33;
pub const UNCOMPRESSED_SIZE: usize = 65;

const PREFIX_EVEN: u8 = 0x02;
const PREFIX_ODD: u8 = 0x03;
const PREFIX_UNCOMPRESSED: u8 = 0x04;

/// Structured interchange form of a public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyObject {
    pub x: String,
    pub y: String,
    pub compressed: bool,
}

/// Every shape a public key can be built from
#[derive(Clone)]
pub enum KeyInput<'a> {
    Bytes(&'a [u8]),
    Hex(&'a str),
    Point(CurvePoint),
    PrivateKey(&'a dyn ScalarSource),
    Object(PublicKeyObject),
    PublicKey(&'a PublicKey),
}

/// A validated secp256k1 public key.
///
/// The point is always finite and on the curve. Equality compares the point
/// only; the compression flag and network do not take part.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "PublicKeyObject", into = "PublicKeyObject")]
pub struct PublicKey {
    point: CurvePoint,
    compressed: bool,
    network: Network,
}

impl PublicKey {
    /// Wrap an existing point; infinity and off-curve points are refused
    pub fn from_point(point: CurvePoint, compressed: bool) -> Result<Self> {
        match &point {
            CurvePoint::Infinity => return Err(KeyError::PointAtInfinityForbidden),
            CurvePoint::Finite { x, y } => {
                if x.is_zero() || y.is_zero() {
                    return Err(KeyError::InvalidPointCoordinates);
                }
                if !CurvePoint::is_on_curve(x, y) {
                    return Err(KeyError::InvalidYForCurve);
                }
            }
        }
        Ok(Self {
            point,
            compressed,
            network: Network::default(),
        })
    }

    /// Decode SEC1 bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let (&prefix, body) = data.split_first().ok_or(KeyError::MissingArgument)?;
        match prefix {
            PREFIX_UNCOMPRESSED => {
                check_length(data, UNCOMPRESSED_SIZE)?;
                let x = BigUint::from_bytes_be(&body[..32]);
                let y = BigUint::from_bytes_be(&body[32..]);
                Self::from_point(CurvePoint::from_coordinates(x, y)?, false)
            }
            PREFIX_EVEN | PREFIX_ODD => {
                check_length(data, COMPRESSED_SIZE)?;
                Self::from_x(prefix == PREFIX_ODD, BigUint::from_bytes_be(body))
            }
            other => {
                log::debug!("Rejecting public key with prefix {:#04x}", other);
                Err(KeyError::UnrecognizedFormat(other))
            }
        }
    }

    /// Decode SEC1 bytes given as hex (either case)
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        if hex_str.is_empty() {
            return Err(KeyError::MissingArgument);
        }
        let data = hex::decode(hex_str).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&data)
    }

    /// Compressed key from an x coordinate and the parity of y
    pub fn from_x(odd: bool, x: BigUint) -> Result<Self> {
        Self::from_point(CurvePoint::from_x(x, odd)?, true)
    }

    /// scalar·G for a scalar in [1, n), compressed
    pub fn from_scalar(scalar: &BigUint, compressed: bool) -> Result<Self> {
        if scalar.is_zero() || scalar >= &curve().n {
            return Err(KeyError::InvalidPrivateScalar);
        }
        Self::from_point(CurvePoint::generator().mul(scalar), compressed)
    }

    /// Derive from a private key collaborator, keeping its network
    pub fn from_private_key(key: &dyn ScalarSource) -> Result<Self> {
        Ok(Self::from_scalar(&key.scalar(), true)?.with_network(key.network()))
    }

    pub fn from_object(object: &PublicKeyObject) -> Result<Self> {
        let x = parse_coordinate(&object.x)?;
        let y = parse_coordinate(&object.y)?;
        Self::from_point(CurvePoint::from_coordinates(x, y)?, object.compressed)
    }

    pub fn from_public_key(other: &PublicKey) -> Self {
        other.clone()
    }

    /// Single entry point over every supported input shape
    pub fn from_input(input: KeyInput) -> Result<Self> {
        match input {
            KeyInput::Bytes(data) => Self::from_bytes(data),
            KeyInput::Hex(s) => Self::from_hex(s),
            KeyInput::Point(point) => Self::from_point(point, true),
            KeyInput::PrivateKey(key) => Self::from_private_key(key),
            KeyInput::Object(object) => Self::from_object(&object),
            KeyInput::PublicKey(other) => Ok(Self::from_public_key(other)),
        }
    }

    /// Untyped entry point for JSON input: a hex string or an {x, y, compressed} object
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Err(KeyError::MissingArgument),
            Value::String(s) => Self::from_hex(s),
            Value::Object(_) => {
                let object: PublicKeyObject = serde_json::from_value(value.clone())
                    .map_err(|_| KeyError::UnrecognizedInputType)?;
                Self::from_object(&object)
            }
            _ => Err(KeyError::UnrecognizedInputType),
        }
    }

    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Validate hex without keeping the key
    pub fn validation_error(hex_str: &str) -> Option<KeyError> {
        Self::from_hex(hex_str).err()
    }

    pub fn is_valid(hex_str: &str) -> bool {
        Self::validation_error(hex_str).is_none()
    }

    pub fn point(&self) -> &CurvePoint {
        &self.point
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// SEC1 encoding in the key's own compression form
    pub fn to_bytes(&self) -> Vec<u8> {
        let (x, y) = self.coordinates();
        if self.compressed {
            let mut out = Vec::with_capacity(COMPRESSED_SIZE);
            out.push(if y[31] & 1 == 1 { PREFIX_ODD } else { PREFIX_EVEN });
            out.extend_from_slice(&x);
            out
        } else {
            let mut out = Vec::with_capacity(UNCOMPRESSED_SIZE);
            out.push(PREFIX_UNCOMPRESSED);
            out.extend_from_slice(&x);
            out.extend_from_slice(&y);
            out
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn to_object(&self) -> PublicKeyObject {
        let (x, y) = self.coordinates();
        PublicKeyObject {
            x: hex::encode(x),
            y: hex::encode(y),
            compressed: self.compressed,
        }
    }

    /// hash160 of the serialized key, the identity addresses are built from
    pub fn pubkey_hash(&self) -> [u8; 20] {
        hash160(&self.to_bytes())
    }

    fn coordinates(&self) -> ([u8; 32], [u8; 32]) {
        match &self.point {
            CurvePoint::Finite { x, y } => (x.to_bytes_be(), y.to_bytes_be()),
            // Constructors never admit infinity
            CurvePoint::Infinity => ([0u8; 32], [0u8; 32]),
        }
    }
}

fn check_length(data: &[u8], expected: usize) -> Result<()> {
    if data.len() != expected {
        return Err(KeyError::InvalidLength {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// A record coordinate is exactly 32 bytes of hex, like the SEC1 form
fn parse_coordinate(hex_str: &str) -> Result<BigUint> {
    let bytes = hex::decode(hex_str).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
    check_length(&bytes, 32)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl Eq for PublicKey {}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.compressed {
            write!(f, "<PublicKey: {}>", self.to_hex())
        } else {
            write!(f, "<PublicKey: {}, uncompressed>", self.to_hex())
        }
    }
}

impl TryFrom<PublicKeyObject> for PublicKey {
    type Error = KeyError;

    fn try_from(object: PublicKeyObject) -> Result<Self> {
        Self::from_object(&object)
    }
}

impl From<PublicKey> for PublicKeyObject {
    fn from(key: PublicKey) -> Self {
        key.to_object()
    }
}

impl<'a> TryFrom<KeyInput<'a>> for PublicKey {
    type Error = KeyError;

    fn try_from(input: KeyInput<'a>) -> Result<Self> {
        Self::from_input(input)
    }
}
