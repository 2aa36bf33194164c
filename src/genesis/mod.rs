//! Genesis document
//!
//! The genesis document fixes a chain's identity, its consensus parameters,
//! the validator set of block zero and the pre-funded accounts. A node reads it
//! once at first boot:
//!
//! ```text
//!   file bytes → GenesisDoc::from_json → validate_and_complete
//!              → state / validator set builders
//! ```
//!
//! and tooling writes it with [`GenesisDoc::save_as`].
//!
//! # Format
//!
//! ```json
//! {
//!   "genesis_time": "2024-01-15T00:00:00.000000000Z",
//!   "chain_id": "meowchain-1",
//!   "consensus_params": { "block": { ... }, "evidence": { ... }, ... },
//!   "validators": [
//!     {
//!       "pub_key": { "type": "secp256k1", "value": "0x03..." },
//!       "coinbase": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
//!       "power": 10,
//!       "name": "validator-0"
//!     }
//!   ],
//!   "accounts": {
//!     "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266": { "balance": "1000", "nonce": 0 }
//!   }
//! }
//! ```
//!
//! `consensus_params` and `accounts` are optional. Unknown keys are rejected.

pub mod account;
pub mod clock;
pub mod errors;
pub mod validator;

pub use account::{GenesisAccount, GenesisAlloc};
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{GenesisError, GenesisErrorKind};
pub use validator::{GenesisValidator, PublicKey, PublicKeyKind};

use crate::consensus::{default_consensus_params, ConsensusParams};
use crate::constants::GENESIS_FILE_MODE;
use crate::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Initial-state manifest of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisDoc {
    /// Genesis time, filled with the current time during completion if empty
    #[serde(default)]
    pub genesis_time: String,
    /// Network identifier, never empty once validated
    #[serde(default)]
    pub chain_id: String,
    /// Consensus parameters, defaulted during completion if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_params: Option<ConsensusParams>,
    /// Validator set of block zero, in order
    #[serde(default)]
    pub validators: Vec<GenesisValidator>,
    /// Pre-funded accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<GenesisAlloc>,
}

impl GenesisDoc {
    /// Create a document with the given chain id and validators.
    ///
    /// The result is not validated; call [`validate_and_complete`](Self::validate_and_complete).
    pub fn new(chain_id: impl Into<String>, validators: Vec<GenesisValidator>) -> Self {
        Self {
            genesis_time: String::new(),
            chain_id: chain_id.into(),
            consensus_params: None,
            validators,
            accounts: None,
        }
    }

    /// Builder method to set the pre-funded accounts
    pub fn with_accounts(mut self, accounts: GenesisAlloc) -> Self {
        self.accounts = Some(accounts);
        self
    }

    /// Builder method to set consensus parameters
    pub fn with_consensus_params(mut self, params: ConsensusParams) -> Self {
        self.consensus_params = Some(params);
        self
    }

    /// Builder method to set the genesis time
    pub fn with_genesis_time(mut self, genesis_time: impl Into<String>) -> Self {
        self.genesis_time = genesis_time.into();
        self
    }

    /// Parse a document from JSON bytes, then validate and complete it.
    pub fn from_json(bytes: &[u8]) -> Result<Self, GenesisError> {
        Self::from_json_with(bytes, &SystemClock)
    }

    /// [`from_json`](Self::from_json) with an explicit clock for the
    /// `genesis_time` fill-in.
    pub fn from_json_with(bytes: &[u8], clock: &impl Clock) -> Result<Self, GenesisError> {
        let mut doc: Self = serde_json::from_slice(bytes).map_err(GenesisError::MalformedJson)?;
        debug!(
            chain_id = %doc.chain_id,
            validators = doc.validators.len(),
            "Parsed genesis document"
        );
        doc.validate_and_complete_with(clock)?;
        Ok(doc)
    }

    /// Read, parse, validate and complete a genesis file.
    ///
    /// Read failures are reported as [`GenesisError::Io`]; anything wrong with
    /// the contents is wrapped in [`GenesisError::File`] naming the path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GenesisError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| GenesisError::Io {
            action: "read",
            path: path.to_path_buf(),
            source,
        })?;

        let doc = Self::from_json(&bytes).map_err(|err| GenesisError::File {
            path: path.to_path_buf(),
            source: Box::new(err),
        })?;

        info!(
            path = %path.display(),
            chain_id = %doc.chain_id,
            validators = doc.validators.len(),
            accounts = doc.accounts.as_ref().map_or(0, |a| a.len()),
            "Loaded genesis"
        );
        Ok(doc)
    }

    /// Indented JSON form: two-space indent, trailing newline.
    pub fn to_json(&self) -> Result<String, GenesisError> {
        let mut json = serde_json::to_string_pretty(self).map_err(GenesisError::Serialize)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the document to `path`.
    ///
    /// The JSON goes to a temporary file next to `path` which is then renamed
    /// over it, so an existing file is either left intact or fully replaced.
    /// New files get mode 0644 on Unix.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<(), GenesisError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        let io_err = move |action: &'static str| {
            move |source: std::io::Error| GenesisError::Io {
                action,
                path: path.to_path_buf(),
                source,
            }
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err("create"))?;
        tmp.write_all(json.as_bytes()).map_err(io_err("write"))?;
        tmp.as_file().sync_all().map_err(io_err("write"))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(GENESIS_FILE_MODE))
                .map_err(io_err("write"))?;
        }

        tmp.persist(path).map_err(|err| io_err("replace")(err.error))?;

        info!(path = %path.display(), chain_id = %self.chain_id, "Saved genesis");
        Ok(())
    }

    /// Validate the document and materialize defaults, using the system clock.
    pub fn validate_and_complete(&mut self) -> Result<(), GenesisError> {
        self.validate_and_complete_with(&SystemClock)
    }

    /// Validate the document and materialize defaults.
    ///
    /// Checks, in order: `chain_id` non-empty, `consensus_params` valid if
    /// present, at least one validator, no validator with zero power. On
    /// success an absent `consensus_params` becomes the default bundle and an
    /// empty `genesis_time` is taken from `clock`. On error the document is
    /// left untouched.
    pub fn validate_and_complete_with(&mut self, clock: &impl Clock) -> Result<(), GenesisError> {
        if let Err(err) = self.validate() {
            warn!(chain_id = %self.chain_id, %err, "Genesis validation failed");
            return Err(err);
        }

        if self.consensus_params.is_none() {
            debug!(chain_id = %self.chain_id, "Installing default consensus params");
            self.consensus_params = Some(default_consensus_params());
        }
        if self.genesis_time.is_empty() {
            self.genesis_time = clock.now();
            debug!(genesis_time = %self.genesis_time, "Filled in genesis time");
        }
        Ok(())
    }

    /// Run every check without completing anything.
    pub fn validate(&self) -> Result<(), GenesisError> {
        if self.chain_id.is_empty() {
            return Err(GenesisError::MissingChainId);
        }

        if let Some(params) = &self.consensus_params {
            params.validate()?;
        }

        if self.validators.is_empty() {
            return Err(GenesisError::NoValidators);
        }

        if let Some((index, validator)) =
            self.validators.iter().enumerate().find(|(_, v)| v.power == 0)
        {
            return Err(GenesisError::ZeroPowerValidator {
                index,
                validator: Box::new(validator.clone()),
            });
        }

        Ok(())
    }

    /// Sum of validator voting power, `None` on overflow
    pub fn total_voting_power(&self) -> Option<i64> {
        self.validators.iter().try_fold(0i64, |acc, v| acc.checked_add(v.power))
    }

    /// Find the validator paid to `coinbase`
    pub fn validator_by_coinbase(&self, coinbase: &Address) -> Option<(usize, &GenesisValidator)> {
        self.validators.iter().enumerate().find(|(_, v)| v.coinbase == *coinbase)
    }
}
