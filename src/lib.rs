//! # POA genesis
//!
//! Genesis documents for a proof-of-authority chain: the data model, its JSON
//! form, validation and defaulting, and the test fixtures used to pre-fund
//! integration-test chains.

pub mod cli;
pub mod consensus;
pub mod constants;
pub mod fixtures;
pub mod genesis;
pub mod keystore;
pub mod output;
pub mod primitives;

pub use consensus::{default_consensus_params, ConsensusParams, ConsensusParamsError};
pub use genesis::{
    GenesisAccount, GenesisAlloc, GenesisDoc, GenesisError, GenesisErrorKind, GenesisValidator,
    PublicKey, PublicKeyKind,
};
