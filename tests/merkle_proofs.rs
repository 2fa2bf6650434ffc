// Merkle block proofs against mainnet blocks

use keyproof::core::Hash256;
use keyproof::merkle::{MerkleBlock, MerkleError, PartialMerkleTree};
use serde_json::json;

fn block_from_json(value: serde_json::Value) -> MerkleBlock {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_single_transaction_block_161200() {
    let block = block_from_json(json!({
        "header": {
            "hash": "000000000002486c6eba4cf563f50877b7b0ade331d486a8151ca32fdfe268d8",
            "version": 536870913,
            "prevHash": "00000000000129624b4602b2e9bb23fe596d21c02b1061053344e89099a6dc0b",
            "merkleRoot": "2f0e0f273ee8be303c5b128f716fef6657c176e2421a71efece310c8ab17e4fc",
            "time": 1507641442,
            "bits": 453135532,
            "nonce": 2323383189u32
        },
        "numTransactions": 1,
        "hashes": ["2f0e0f273ee8be303c5b128f716fef6657c176e2421a71efece310c8ab17e4fc"],
        "flags": [0]
    }));

    let verification = block.verify().unwrap();
    assert!(verification.is_valid());
    assert!(verification.matched.is_empty());
}

#[test]
fn test_two_transaction_block_165210() {
    let block = block_from_json(json!({
        "header": {
            "version": 536870913,
            "prevHash": "0000000000016ce3869f278d2e8ea60299f9605932d90e7ddd01e2d1bf27640e",
            "merkleRoot": "d0772192f4e1c3faae6ff058f9209b91d02c6dbc6bdf3e04d4d2fc04e0ef4ff6",
            "time": 1507810273,
            "bits": 453119658,
            "nonce": 2506450827u32
        },
        "numTransactions": 2,
        "hashes": [
            "2f15c5ce34fccb8cca9f131ea7852ab66cf233269b09cc5489b24e0db5cdeb53",
            "b6b9ca4b5f31aa8e2ae143239efa1e49198a1fc0de63b3d0595e95d10e753102"
        ],
        "flags": [219, 63]
    }));

    assert!(block.is_valid().unwrap());

    let first = Hash256::from_hex("2f15c5ce34fccb8cca9f131ea7852ab66cf233269b09cc5489b24e0db5cdeb53")
        .unwrap();
    let second = Hash256::from_hex("b6b9ca4b5f31aa8e2ae143239efa1e49198a1fc0de63b3d0595e95d10e753102")
        .unwrap();
    assert_eq!(block.filtered_tx_hashes().unwrap(), vec![first]);
    assert!(block.has_transaction(&first).unwrap());
    assert!(!block.has_transaction(&second).unwrap());

    // Only three of the sixteen flag bits are read
    let reencoded = MerkleBlock::from_bytes(&block.to_bytes()).unwrap();
    assert_eq!(reencoded, block);
}

fn block_12363(leaf: &str) -> MerkleBlock {
    block_from_json(json!({
        "header": {
            "version": 2,
            "prevHash": "000000000b7c6b508d001f7ccdee9aa5938ed4225c6fd30e7cbc7354b23d11d7",
            "merkleRoot": "503bb32178ecbf539887671f96525c9496f0c6c8d5ef9ac5a17120a02566385a",
            "time": 1391670030,
            "nonce": 3887755349u32,
            "bits": 471254460
        },
        "numTransactions": 1,
        "hashes": [leaf],
        "flags": [0]
    }))
}

#[test]
fn test_leaf_hashes_use_display_order() {
    let block = block_12363("503bb32178ecbf539887671f96525c9496f0c6c8d5ef9ac5a17120a02566385a");
    assert!(block.is_valid().unwrap());

    // The same bytes written in internal order are a different hash
    let swapped = block_12363("5a386625a02071a1c59aefd5c8c6f096945c52961f67879853bfec7821b33b50");
    let verification = swapped.verify().unwrap();
    assert!(!verification.is_valid());
    assert_eq!(verification.computed_root, swapped.tree.hashes()[0]);
}

#[test]
fn test_single_transaction_block_280472_matched() {
    // Leaf written in display order; the internal-order form is 9f46ef88...
    let block = block_from_json(json!({
        "flags": [1],
        "numTransactions": 1,
        "hashes": ["e3fa46c96a64642311789496f06be0ec2060432321ac4bafdcf4ac6988ef469f"],
        "header": {
            "prevHash": "000000000009a2104d476751e045a436ba9431ba511a4e9384c9c145162931f0",
            "merkleRoot": "e3fa46c96a64642311789496f06be0ec2060432321ac4bafdcf4ac6988ef469f",
            "time": 1433459232,
            "version": 3,
            "nonce": 3851491840u32,
            "bits": 455002837
        }
    }));

    let coinbase = block.header.merkle_root;
    assert_eq!(block.filtered_tx_hashes().unwrap(), vec![coinbase]);
    assert!(block.has_transaction(&coinbase).unwrap());
}

#[test]
fn test_hostile_leaf_count_fails_fast() {
    let mut block = block_12363("503bb32178ecbf539887671f96525c9496f0c6c8d5ef9ac5a17120a02566385a");
    block.tree = PartialMerkleTree::new(
        1_000_000_000,
        block.tree.hashes().to_vec(),
        block.tree.flags().to_vec(),
    );

    assert!(matches!(
        block.verify(),
        Err(MerkleError::MerkleTreeMalformed(_))
    ));
    assert!(block.has_transaction(&block.header.merkle_root).is_err());
}

#[test]
fn test_missing_hashes_and_flags() {
    let block = block_12363("503bb32178ecbf539887671f96525c9496f0c6c8d5ef9ac5a17120a02566385a");

    let no_hashes = MerkleBlock::new(
        block.header.clone(),
        PartialMerkleTree::new(1, vec![], vec![0]),
    );
    assert!(matches!(
        no_hashes.verify(),
        Err(MerkleError::MerkleTreeMalformed(_))
    ));

    let no_flags = MerkleBlock::new(
        block.header.clone(),
        PartialMerkleTree::new(1, block.tree.hashes().to_vec(), vec![]),
    );
    assert!(matches!(
        no_flags.verify(),
        Err(MerkleError::MerkleTreeMalformed(_))
    ));
}

#[test]
fn test_built_proof_over_wire() {
    let txids: Vec<Hash256> = (0u8..13).map(|i| keyproof::core::hash256(&[i])).collect();
    let mut matches = vec![false; txids.len()];
    matches[4] = true;
    matches[12] = true;

    let tree = PartialMerkleTree::from_txids(&txids, &matches).unwrap();
    let root = keyproof::merkle::merkle_root(&txids).unwrap();
    let header = keyproof::core::BlockHeader::new(1, Hash256::zero(), root, 0, 0x1d00ffff, 0);

    let block = MerkleBlock::from_hex(&MerkleBlock::new(header, tree).to_hex()).unwrap();
    assert!(block.is_valid().unwrap());
    assert_eq!(block.filtered_tx_hashes().unwrap(), vec![txids[4], txids[12]]);
}

#[test]
fn test_proof_larger_than_bitcoin_weight_limit() {
    let txids: Vec<Hash256> = (0u32..20_000)
        .map(|i| keyproof::core::hash256(&i.to_le_bytes()))
        .collect();
    let mut matches = vec![false; txids.len()];
    matches[9_999] = true;

    let tree = PartialMerkleTree::from_txids(&txids, &matches).unwrap();
    let root = keyproof::merkle::merkle_root(&txids).unwrap();
    let header = keyproof::core::BlockHeader::new(1, Hash256::zero(), root, 0, 0x1e0ffff0, 0);
    let block = MerkleBlock::from_bytes(&MerkleBlock::new(header, tree).to_bytes()).unwrap();

    let verification = block.verify().unwrap();
    assert!(verification.is_valid());
    assert_eq!(verification.matched, vec![txids[9_999]]);
}
