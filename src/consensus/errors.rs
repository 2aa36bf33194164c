use thiserror::Error;

/// Reasons a consensus parameter bundle is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsensusParamsError {
    /// `block.max_bytes` must be positive
    #[error("block.max_bytes must be greater than 0, got {0}")]
    BlockMaxBytesNotPositive(i64),

    /// `block.max_bytes` exceeds the hard cap
    #[error("block.max_bytes is too big: {got} > {max}")]
    BlockMaxBytesTooLarge {
        /// Configured value
        got: i64,
        /// Hard cap
        max: i64,
    },

    /// `block.max_gas` below -1
    #[error("block.max_gas must be greater or equal to -1, got {0}")]
    BlockMaxGasTooLow(i64),

    /// `block.time_iota_ms` must be positive
    #[error("block.time_iota_ms must be greater than 0, got {0}")]
    TimeIotaNotPositive(i64),

    /// `evidence.max_age_num_blocks` must be positive
    #[error("evidence.max_age_num_blocks must be greater than 0, got {0}")]
    EvidenceMaxAgeBlocksNotPositive(i64),

    /// `evidence.max_age_duration_ms` must be positive
    #[error("evidence.max_age_duration_ms must be greater than 0, got {0}")]
    EvidenceMaxAgeDurationNotPositive(i64),

    /// `validator.pub_key_types` is empty
    #[error("validator.pub_key_types must not be empty")]
    NoPubKeyTypes,

    /// `validator.pub_key_types` names a scheme the chain does not know
    #[error("validator.pub_key_types contains unknown type {0:?}")]
    UnknownPubKeyType(String),

    /// A consensus round timeout is zero
    #[error("timeout.{0} must be greater than 0")]
    ZeroTimeout(&'static str),
}
