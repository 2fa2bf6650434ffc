// Public key derivation and encoding checked against libsecp256k1

use keyproof::crypto::{KeyError, KeyInput, Network, PrivateKey, PublicKey, ScalarSource};
use num_bigint::BigUint;
use rand::Rng;
use secp256k1::Secp256k1;

struct KnownKey {
    wif: &'static str,
    address: &'static str,
    scalar: &'static str,
    public: &'static str,
    x: &'static str,
    y: &'static str,
}

// Keys whose coordinates have leading bytes that are easy to mishandle
const KNOWN_KEYS: [KnownKey; 2] = [
    KnownKey {
        wif: "Kn2mEzRoX4xRZvFP85FStmgsDCxAoseXhAw8UqNg2am7Se3xXHwL",
        address: "7dNXKo17Z4y6DGgGwB2TWMWaGvM4evYoFB",
        scalar: "EDD4EC6D14E46DBA3475C3B94035EE4BED4C52EE7ED1DCCFCCE60F79E87EE096",
        public: "02b492d383fb931e4777c9ab458978438e5146a2d9be07d3a3d0594d11f79aae11",
        x: "b492d383fb931e4777c9ab458978438e5146a2d9be07d3a3d0594d11f79aae11",
        y: "80e432d5a3e83e7aaad3e8b73afab4417014eb853e905f7b9995fb879f575724",
    },
    KnownKey {
        wif: "KiW6X5Q9kv3Mg33qjNnbRAVi4ZA6eRsPCw7MiSwa74uNNBALfJ1t",
        address: "7oeyMnxLvbAGxMv6TVdAKGRdWWHq3tETe6",
        scalar: "848AFEDCE6C98D50C6420CDF5E3D724D68A509B8B1FB7690956E3F69EBB1AD63",
        public: "03fa340d491b6e895096d8974a652da37b3c36f7c59794502e9005283067fd41c9",
        x: "fa340d491b6e895096d8974a652da37b3c36f7c59794502e9005283067fd41c9",
        y: "242e6424f0b59021ea31156be0fa25417f529d635d2694a746f622231c0be9e5",
    },
];

/// Minimal WIF reader: version byte, scalar, optional compression marker
struct WifKey {
    bytes: [u8; 32],
}

impl WifKey {
    fn decode(wif: &str) -> Self {
        let payload = bs58::decode(wif).with_check(None).into_vec().unwrap();
        assert_eq!(payload.len(), 34);
        assert_eq!(payload[33], 0x01);
        Self {
            bytes: payload[1..33].try_into().unwrap(),
        }
    }
}

impl ScalarSource for WifKey {
    fn scalar_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    fn network(&self) -> Network {
        Network::Livenet
    }
}

#[test]
fn test_derive_from_hex_scalar() {
    let key = PrivateKey::from_hex(
        "29BE1B0DA6F6A489B311DEF7BD8762CB3E87B1D24FCF01103F392DE1554891DD",
        Network::Livenet,
    )
    .unwrap();
    assert_eq!(
        key.to_public_key().unwrap().to_hex(),
        "03d800b90a4fb65d975a8a74f3a7d02672633190239e091f4dcaa801d80064f662"
    );
}

#[test]
fn test_known_keys_from_wif() {
    for known in &KNOWN_KEYS {
        let wif = WifKey::decode(known.wif);
        assert_eq!(hex::encode_upper(wif.bytes), known.scalar);

        let key = PublicKey::from_input(KeyInput::PrivateKey(&wif)).unwrap();
        assert_eq!(key.to_hex(), known.public);

        let object = key.to_object();
        assert_eq!(object.x, known.x);
        assert_eq!(object.y, known.y);
    }
}

#[test]
fn test_pubkey_hash_matches_address_payload() {
    for known in &KNOWN_KEYS {
        let payload = bs58::decode(known.address)
            .with_check(None)
            .into_vec()
            .unwrap();
        assert_eq!(payload.len(), 21);

        let key = PublicKey::from_hex(known.public).unwrap();
        assert_eq!(key.pubkey_hash().as_slice(), &payload[1..]);
    }

    let first = PublicKey::from_hex(KNOWN_KEYS[0].public).unwrap();
    assert_eq!(
        hex::encode(first.pubkey_hash()),
        "784259714b4b99ff08ea255c955e9e702eaee777"
    );
}

#[test]
fn test_known_keys_decompress() {
    for known in &KNOWN_KEYS {
        let key = PublicKey::from_hex(known.public).unwrap();
        let object = key.to_object();
        assert_eq!(object.y, known.y);
        assert!(key.is_compressed());
    }
}

#[test]
fn test_matches_libsecp256k1_for_random_scalars() {
    let secp = Secp256k1::new();
    let mut rng = rand::thread_rng();

    for _ in 0..16 {
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        let Ok(secret) = secp256k1::SecretKey::from_slice(&bytes) else {
            continue;
        };
        let reference = secp256k1::PublicKey::from_secret_key(&secp, &secret);

        let scalar = BigUint::from_bytes_be(&bytes);
        let compressed = PublicKey::from_scalar(&scalar, true).unwrap();
        let uncompressed = PublicKey::from_scalar(&scalar, false).unwrap();

        assert_eq!(compressed.to_bytes(), reference.serialize().to_vec());
        assert_eq!(
            uncompressed.to_bytes(),
            reference.serialize_uncompressed().to_vec()
        );
        assert_eq!(compressed, uncompressed);
    }
}

#[test]
fn test_decompression_matches_libsecp256k1() {
    let secp = Secp256k1::new();
    let mut rng = rand::thread_rng();

    for _ in 0..16 {
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        let Ok(secret) = secp256k1::SecretKey::from_slice(&bytes) else {
            continue;
        };
        let reference = secp256k1::PublicKey::from_secret_key(&secp, &secret);

        let key = PublicKey::from_bytes(&reference.serialize()).unwrap();
        let expanded = PublicKey::from_object(&keyproof::crypto::PublicKeyObject {
            compressed: false,
            ..key.to_object()
        })
        .unwrap();
        assert_eq!(expanded.to_bytes(), reference.serialize_uncompressed().to_vec());
    }
}

#[test]
fn test_json_value_inputs() {
    let hex_input = serde_json::json!(KNOWN_KEYS[0].public);
    let from_string = PublicKey::from_value(&hex_input).unwrap();

    let object_input = serde_json::json!({
        "x": KNOWN_KEYS[0].x,
        "y": KNOWN_KEYS[0].y,
        "compressed": true
    });
    let from_object = PublicKey::from_value(&object_input).unwrap();
    assert_eq!(from_string, from_object);

    assert_eq!(
        PublicKey::from_value(&serde_json::Value::Null),
        Err(KeyError::MissingArgument)
    );
    assert_eq!(
        PublicKey::from_value(&serde_json::json!(42)),
        Err(KeyError::UnrecognizedInputType)
    );
}

#[test]
fn test_network_follows_private_key() {
    let key = PrivateKey::from_hex(KNOWN_KEYS[1].scalar, Network::Testnet).unwrap();
    let public = key.to_public_key().unwrap();
    assert_eq!(public.network(), Network::Testnet);
    assert_eq!(public.to_hex(), KNOWN_KEYS[1].public);
}
