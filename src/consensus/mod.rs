//! Consensus parameters carried by the genesis document
//!
//! The consensus engine owns the meaning of these values. Genesis only needs
//! to know the defaults and to refuse a bundle the engine would reject later,
//! so every section here is plain data plus a `validate()` check.

pub mod errors;

pub use errors::ConsensusParamsError;

use crate::constants::{
    DEFAULT_BLOCK_MAX_BYTES, DEFAULT_BLOCK_MAX_GAS, DEFAULT_EVIDENCE_MAX_AGE_DURATION_MS,
    DEFAULT_EVIDENCE_MAX_AGE_NUM_BLOCKS, DEFAULT_TIME_IOTA_MS, MAX_BLOCK_SIZE_BYTES,
};
use crate::genesis::PublicKeyKind;
use serde::{Deserialize, Serialize};

/// Consensus parameter bundle installed at block zero
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsensusParams {
    /// Block size and timing limits
    pub block: BlockParams,
    /// Evidence retention rules
    pub evidence: EvidenceParams,
    /// Accepted validator key schemes
    pub validator: ValidatorParams,
    /// Round timeout schedule
    pub timeout: TimeoutParams,
}

/// Block production limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockParams {
    /// Maximum block size in bytes
    pub max_bytes: i64,
    /// Maximum gas per block (-1 = unlimited)
    pub max_gas: i64,
    /// Minimum time increment between consecutive blocks in milliseconds
    pub time_iota_ms: i64,
}

impl Default for BlockParams {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_BLOCK_MAX_BYTES,
            max_gas: DEFAULT_BLOCK_MAX_GAS,
            time_iota_ms: DEFAULT_TIME_IOTA_MS,
        }
    }
}

/// Evidence handling parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvidenceParams {
    /// Maximum evidence age in blocks
    pub max_age_num_blocks: i64,
    /// Maximum evidence age in milliseconds
    pub max_age_duration_ms: i64,
}

impl Default for EvidenceParams {
    fn default() -> Self {
        Self {
            max_age_num_blocks: DEFAULT_EVIDENCE_MAX_AGE_NUM_BLOCKS,
            max_age_duration_ms: DEFAULT_EVIDENCE_MAX_AGE_DURATION_MS,
        }
    }
}

/// Validator key configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorParams {
    /// Public key schemes validators may use
    pub pub_key_types: Vec<String>,
}

impl Default for ValidatorParams {
    fn default() -> Self {
        Self {
            pub_key_types: PublicKeyKind::ALL.iter().map(|kind| kind.to_string()).collect(),
        }
    }
}

/// Consensus round timeouts in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutParams {
    /// Wait for a proposal
    pub propose_ms: u64,
    /// Added to `propose_ms` per round
    pub propose_delta_ms: u64,
    /// Wait for prevotes after +2/3 is seen
    pub prevote_ms: u64,
    /// Added to `prevote_ms` per round
    pub prevote_delta_ms: u64,
    /// Wait for precommits after +2/3 is seen
    pub precommit_ms: u64,
    /// Added to `precommit_ms` per round
    pub precommit_delta_ms: u64,
    /// Pause after commit before starting the next height
    pub commit_ms: u64,
}

impl Default for TimeoutParams {
    fn default() -> Self {
        Self {
            propose_ms: 3_000,
            propose_delta_ms: 500,
            prevote_ms: 1_000,
            prevote_delta_ms: 500,
            precommit_ms: 1_000,
            precommit_delta_ms: 500,
            commit_ms: 1_000,
        }
    }
}

/// Default consensus parameters installed when a genesis omits them
pub fn default_consensus_params() -> ConsensusParams {
    ConsensusParams::default()
}

impl ConsensusParams {
    /// Check the bundle against the limits the consensus engine enforces.
    ///
    /// Returns the first violation found, checking sections in declaration order.
    pub fn validate(&self) -> Result<(), ConsensusParamsError> {
        self.block.validate()?;
        self.evidence.validate()?;
        self.validator.validate()?;
        self.timeout.validate()
    }
}

impl BlockParams {
    fn validate(&self) -> Result<(), ConsensusParamsError> {
        if self.max_bytes <= 0 {
            return Err(ConsensusParamsError::BlockMaxBytesNotPositive(self.max_bytes));
        }
        if self.max_bytes > MAX_BLOCK_SIZE_BYTES {
            return Err(ConsensusParamsError::BlockMaxBytesTooLarge {
                got: self.max_bytes,
                max: MAX_BLOCK_SIZE_BYTES,
            });
        }
        if self.max_gas < -1 {
            return Err(ConsensusParamsError::BlockMaxGasTooLow(self.max_gas));
        }
        if self.time_iota_ms <= 0 {
            return Err(ConsensusParamsError::TimeIotaNotPositive(self.time_iota_ms));
        }
        Ok(())
    }
}

impl EvidenceParams {
    fn validate(&self) -> Result<(), ConsensusParamsError> {
        if self.max_age_num_blocks <= 0 {
            return Err(ConsensusParamsError::EvidenceMaxAgeBlocksNotPositive(
                self.max_age_num_blocks,
            ));
        }
        if self.max_age_duration_ms <= 0 {
            return Err(ConsensusParamsError::EvidenceMaxAgeDurationNotPositive(
                self.max_age_duration_ms,
            ));
        }
        Ok(())
    }
}

impl ValidatorParams {
    fn validate(&self) -> Result<(), ConsensusParamsError> {
        if self.pub_key_types.is_empty() {
            return Err(ConsensusParamsError::NoPubKeyTypes);
        }
        for name in &self.pub_key_types {
            if name.parse::<PublicKeyKind>().is_err() {
                return Err(ConsensusParamsError::UnknownPubKeyType(name.clone()));
            }
        }
        Ok(())
    }
}

impl TimeoutParams {
    fn validate(&self) -> Result<(), ConsensusParamsError> {
        let required = [
            ("propose_ms", self.propose_ms),
            ("prevote_ms", self.prevote_ms),
            ("precommit_ms", self.precommit_ms),
            ("commit_ms", self.commit_ms),
        ];
        match required.into_iter().find(|(_, value)| *value == 0) {
            Some((field, _)) => Err(ConsensusParamsError::ZeroTimeout(field)),
            None => Ok(()),
        }
    }
}
