use super::GenesisValidator;
use crate::consensus::ConsensusParamsError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, validating or saving a genesis document
#[derive(Debug, Error)]
pub enum GenesisError {
    /// Bytes are not JSON or do not match the genesis shape
    #[error("malformed genesis JSON: {0}")]
    MalformedJson(serde_json::Error),

    /// `chain_id` absent or empty
    #[error("genesis chain_id is missing or empty")]
    MissingChainId,

    /// `validators` absent or empty
    #[error("genesis must have at least one validator")]
    NoValidators,

    /// A validator has zero voting power
    #[error("validator {index} ({:?}) has zero voting power", .validator.name)]
    ZeroPowerValidator {
        /// Position in the validators array
        index: usize,
        /// The offending record
        validator: Box<GenesisValidator>,
    },

    /// `consensus_params` rejected by its own validation
    #[error("invalid consensus_params: {0}")]
    BadConsensusParams(#[from] ConsensusParamsError),

    /// The document could not be encoded as JSON
    #[error("failed to encode genesis JSON: {0}")]
    Serialize(serde_json::Error),

    /// Filesystem read or write failed
    #[error("failed to {action} genesis file {}: {source}", path.display())]
    Io {
        /// What was being attempted
        action: &'static str,
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A parse or validation failure for a document read from `path`
    #[error("genesis file {}: {source}", path.display())]
    File {
        /// File the document came from
        path: PathBuf,
        /// What went wrong with its contents
        source: Box<GenesisError>,
    },
}

/// Error taxonomy tag, independent of message and context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenesisErrorKind {
    /// See [`GenesisError::MalformedJson`]
    MalformedJson,
    /// See [`GenesisError::MissingChainId`]
    MissingChainId,
    /// See [`GenesisError::NoValidators`]
    NoValidators,
    /// See [`GenesisError::ZeroPowerValidator`]
    ZeroPowerValidator,
    /// See [`GenesisError::BadConsensusParams`]
    BadConsensusParams,
    /// See [`GenesisError::Io`] and [`GenesisError::Serialize`]
    IoFailure,
}

impl GenesisError {
    /// Taxonomy tag of this error, looking through file context
    pub fn kind(&self) -> GenesisErrorKind {
        match self {
            Self::MalformedJson(_) => GenesisErrorKind::MalformedJson,
            Self::MissingChainId => GenesisErrorKind::MissingChainId,
            Self::NoValidators => GenesisErrorKind::NoValidators,
            Self::ZeroPowerValidator { .. } => GenesisErrorKind::ZeroPowerValidator,
            Self::BadConsensusParams(_) => GenesisErrorKind::BadConsensusParams,
            Self::Serialize(_) | Self::Io { .. } => GenesisErrorKind::IoFailure,
            Self::File { source, .. } => source.kind(),
        }
    }
}

impl fmt::Display for GenesisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedJson => "MalformedJSON",
            Self::MissingChainId => "MissingChainID",
            Self::NoValidators => "NoValidators",
            Self::ZeroPowerValidator => "ZeroPowerValidator",
            Self::BadConsensusParams => "BadConsensusParams",
            Self::IoFailure => "IOFailure",
        };
        f.write_str(name)
    }
}
