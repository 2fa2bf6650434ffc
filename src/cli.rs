// CLI commands

use clap::{Parser, Subcommand};

use crate::crypto::{Network, PrivateKey, PublicKey, ScalarSource};
use crate::merkle::MerkleBlock;

#[derive(Parser, Debug)]
#[command(name = "keyproof")]
#[command(about = "Inspect secp256k1 public keys and verify merkle block proofs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Public key commands
    #[command(subcommand)]
    Pubkey(PubkeyCommands),

    /// Merkle proof commands
    #[command(subcommand)]
    Merkle(MerkleCommands),
}

#[derive(Subcommand, Debug)]
pub enum PubkeyCommands {
    /// Decode a SEC1 public key and print its coordinates
    Inspect {
        /// Compressed or uncompressed key as hex
        key: String,
    },

    /// Derive the public key for a private scalar
    Derive {
        /// 32-byte private scalar as hex
        scalar: String,
        /// Emit the 65-byte uncompressed encoding
        #[arg(long)]
        uncompressed: bool,
        /// Tag the key with the test network
        #[arg(long)]
        testnet: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum MerkleCommands {
    /// Check a serialized merkle block against its header
    Verify {
        /// merkleblock payload as hex
        proof: String,
    },
}

/// Text produced by a command and whether it succeeded
#[derive(Debug, Default)]
pub struct Report {
    pub lines: Vec<String>,
    pub success: bool,
}

impl Report {
    fn ok() -> Self {
        Self {
            lines: Vec::new(),
            success: true,
        }
    }

    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }
}

/// CLI handler
#[derive(Default)]
pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    /// Run a command and print its report; returns false on a failed verification
    pub fn handle(&self, cli: Cli) -> Result<bool, String> {
        let report = self.execute(cli)?;
        for line in &report.lines {
            println!("{}", line);
        }
        Ok(report.success)
    }

    /// Run a command without printing
    pub fn execute(&self, cli: Cli) -> Result<Report, String> {
        match cli.command {
            Commands::Pubkey(cmd) => self.handle_pubkey(cmd),
            Commands::Merkle(cmd) => self.handle_merkle(cmd),
        }
    }

    fn handle_pubkey(&self, cmd: PubkeyCommands) -> Result<Report, String> {
        let mut report = Report::ok();
        match cmd {
            PubkeyCommands::Inspect { key } => {
                let key = PublicKey::from_hex(key.trim()).map_err(|e| e.to_string())?;
                let object = serde_json::to_string_pretty(&key).map_err(|e| e.to_string())?;

                report.line(format!("{:?}", key));
                report.line(object);
                report.line(format!("Hash160: {}", hex::encode(key.pubkey_hash())));
            }
            PubkeyCommands::Derive {
                scalar,
                uncompressed,
                testnet,
            } => {
                let network = if testnet {
                    Network::Testnet
                } else {
                    Network::Livenet
                };
                let private_key =
                    PrivateKey::from_hex(scalar.trim(), network).map_err(|e| e.to_string())?;
                let key = PublicKey::from_scalar(&private_key.scalar(), !uncompressed)
                    .map_err(|e| e.to_string())?
                    .with_network(private_key.network());

                log::info!("Derived {:?} on {}", key, key.network());
                report.line(key.to_hex());
            }
        }
        Ok(report)
    }

    fn handle_merkle(&self, cmd: MerkleCommands) -> Result<Report, String> {
        let mut report = Report::ok();
        match cmd {
            MerkleCommands::Verify { proof } => {
                let block = MerkleBlock::from_hex(&proof).map_err(|e| e.to_string())?;
                let verification = block.verify().map_err(|e| e.to_string())?;

                report.line(format!("Block: {}", block.header.hash()));
                report.line(format!("Transactions: {}", block.tree.num_transactions()));
                report.line(format!("Computed root: {}", verification.computed_root));
                report.line(format!("Declared root: {}", verification.expected_root));
                report.line(format!("Matched ({}):", verification.matched.len()));
                for txid in &verification.matched {
                    report.line(format!("  {}", txid));
                }

                report.success = verification.is_valid();
                report.line(if report.success {
                    "✓ Proof valid"
                } else {
                    "✗ Merkle root mismatch"
                });
            }
        }
        Ok(report)
    }
}
