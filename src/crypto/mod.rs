// secp256k1 keys: curve arithmetic and public key encoding

pub mod params;
mod field;
mod point;
mod network;
mod private_key;
mod public_key;
mod error;

pub use field::FieldElement;
pub use point::CurvePoint;
pub use network::Network;
pub use private_key::{PrivateKey, ScalarSource};
pub use public_key::{KeyInput, PublicKey, PublicKeyObject, COMPRESSED_SIZE, UNCOMPRESSED_SIZE};
pub use error::{KeyError, Result};
