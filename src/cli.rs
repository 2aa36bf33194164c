use crate::constants::FIXTURE_PBKDF2_C;
use crate::fixtures::{test_alloc_accounts, TestCredential};
use crate::genesis::{GenesisAlloc, GenesisDoc, GenesisValidator, PublicKey, PublicKeyKind};
use crate::primitives::parse_address;
use clap::{Args, Parser, Subcommand};
use eyre::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// CLI arguments for the genesis tool
#[derive(Parser, Debug)]
#[command(name = "genesis", about = "Create and check POA genesis documents")]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a genesis file, validate it and print a summary
    Validate {
        /// Path to the genesis JSON
        path: PathBuf,
    },
    /// Build a genesis document and write it to disk
    New(NewArgs),
    /// List the embedded test-credential addresses, or mint a new record
    Credentials(CredentialsArgs),
}

/// Arguments for `genesis credentials`
#[derive(Args, Debug)]
pub struct CredentialsArgs {
    /// Decrypt every keystore and check it derives its address
    #[arg(long)]
    pub verify: bool,

    #[command(subcommand)]
    pub action: Option<CredentialsCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CredentialsCommand {
    /// Encrypt a private key into a test-credential record and print it as JSON
    Mint(MintArgs),
}

/// Arguments for `genesis credentials mint`
#[derive(Args, Debug)]
pub struct MintArgs {
    /// Private key, hex with or without `0x`
    #[arg(long)]
    pub key: String,

    /// Keystore password
    #[arg(long)]
    pub password: String,

    /// PBKDF2 iteration count
    #[arg(long, default_value_t = FIXTURE_PBKDF2_C)]
    pub iterations: u32,
}

impl MintArgs {
    /// Build the credential record described by these arguments.
    pub fn mint(&self) -> Result<TestCredential> {
        TestCredential::mint(&self.key, &self.password, self.iterations)
            .wrap_err("Failed to mint test credential")
    }
}

/// Arguments for `genesis new`
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Chain identifier
    #[arg(long)]
    pub chain_id: String,

    /// Validator as `type:pubkey:coinbase:power[:name]`, repeatable.
    ///
    /// Example: `secp256k1:0x03ab...:0xf39f...:10:validator-0`
    #[arg(long = "validator", required = true, value_parser = parse_validator_spec)]
    pub validators: Vec<GenesisValidator>,

    /// Pre-fund the well-known test addresses and the test-credential accounts
    #[arg(long)]
    pub test_alloc: bool,

    /// JSON file with an address → account map to pre-fund
    #[arg(long)]
    pub alloc_file: Option<PathBuf>,

    /// Fixed genesis time instead of the current time
    #[arg(long)]
    pub genesis_time: Option<String>,

    /// Output path
    #[arg(long)]
    pub out: PathBuf,
}

impl NewArgs {
    /// Assemble the (unvalidated) document described by these arguments.
    ///
    /// Entries from `--alloc-file` override test-alloc entries for the same address.
    pub fn build(&self) -> Result<GenesisDoc> {
        let mut alloc = GenesisAlloc::new();
        if self.test_alloc {
            alloc.extend(test_alloc_accounts());
        }
        if let Some(path) = &self.alloc_file {
            let data = fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read alloc file: {}", path.display()))?;
            let from_file: GenesisAlloc = serde_json::from_str(&data)
                .wrap_err_with(|| format!("Failed to parse alloc file: {}", path.display()))?;
            alloc.extend(from_file);
        }

        let mut doc = GenesisDoc::new(self.chain_id.clone(), self.validators.clone());
        if self.test_alloc || self.alloc_file.is_some() {
            doc = doc.with_accounts(alloc);
        }
        if let Some(time) = &self.genesis_time {
            doc = doc.with_genesis_time(time.clone());
        }
        Ok(doc)
    }
}

/// Parse `type:pubkey:coinbase:power[:name]` into a validator record.
pub fn parse_validator_spec(s: &str) -> Result<GenesisValidator, String> {
    let parts: Vec<&str> = s.splitn(5, ':').collect();
    if parts.len() < 4 {
        return Err(format!("expected type:pubkey:coinbase:power[:name], got {s:?}"));
    }

    let kind: PublicKeyKind = parts[0].parse().map_err(|e| format!("{e}"))?;
    let pub_key = PublicKey::from_hex(kind, parts[1]).map_err(|e| format!("{e}"))?;
    let coinbase = parse_address(parts[2]).map_err(|e| format!("{e}"))?;
    let power: i64 = parts[3]
        .parse()
        .map_err(|e| format!("invalid power {:?}: {e}", parts[3]))?;
    let name = parts.get(4).copied().unwrap_or_default();

    Ok(GenesisValidator::new(pub_key, coinbase, power, name))
}
