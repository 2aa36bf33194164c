use crate::primitives::{serde_address, Address, PrimitiveError};
use alloy_primitives::FixedBytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Public key schemes a validator may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicKeyKind {
    /// Ed25519, 32-byte key
    Ed25519,
    /// secp256k1, 33-byte compressed key
    Secp256k1,
}

impl PublicKeyKind {
    /// Every supported scheme
    pub const ALL: [PublicKeyKind; 2] = [PublicKeyKind::Ed25519, PublicKeyKind::Secp256k1];

    /// Wire name of the scheme
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
        }
    }

    /// Encoded key length in bytes
    pub const fn key_len(&self) -> usize {
        match self {
            Self::Ed25519 => 32,
            Self::Secp256k1 => 33,
        }
    }
}

impl fmt::Display for PublicKeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicKeyKind {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PrimitiveError::UnknownKeyType(s.to_string()))
    }
}

/// Validator public key, tagged with its scheme.
///
/// Serialized as `{"type": "secp256k1", "value": "0x02..."}`. The genesis
/// subsystem never interprets the bytes beyond their length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PublicKey {
    /// Ed25519 key
    Ed25519(FixedBytes<32>),
    /// Compressed secp256k1 key
    Secp256k1(FixedBytes<33>),
}

impl PublicKey {
    /// Build a key of the given scheme from raw bytes
    pub fn from_slice(kind: PublicKeyKind, bytes: &[u8]) -> Result<Self, PrimitiveError> {
        if bytes.len() != kind.key_len() {
            return Err(PrimitiveError::InvalidPublicKey {
                kind: kind.as_str(),
                expected: kind.key_len(),
                got: bytes.len(),
            });
        }
        Ok(match kind {
            PublicKeyKind::Ed25519 => Self::Ed25519(FixedBytes::from_slice(bytes)),
            PublicKeyKind::Secp256k1 => Self::Secp256k1(FixedBytes::from_slice(bytes)),
        })
    }

    /// Build a key of the given scheme from hex (with or without `0x`)
    pub fn from_hex(kind: PublicKeyKind, s: &str) -> Result<Self, PrimitiveError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| PrimitiveError::InvalidPublicKey {
            kind: kind.as_str(),
            expected: kind.key_len(),
            got: digits.len() / 2,
        })?;
        Self::from_slice(kind, &bytes)
    }

    /// Scheme of this key
    pub fn kind(&self) -> PublicKeyKind {
        match self {
            Self::Ed25519(_) => PublicKeyKind::Ed25519,
            Self::Secp256k1(_) => PublicKeyKind::Secp256k1,
        }
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Ed25519(key) => key.as_slice(),
            Self::Secp256k1(key) => key.as_slice(),
        }
    }
}

/// Validator authorized at block zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisValidator {
    /// Consensus public key
    pub pub_key: PublicKey,
    /// Address credited with this validator's rewards
    #[serde(with = "serde_address")]
    pub coinbase: Address,
    /// Voting power (never zero at genesis)
    pub power: i64,
    /// Display name
    #[serde(default)]
    pub name: String,
}

impl GenesisValidator {
    /// Create a validator record
    pub fn new(pub_key: PublicKey, coinbase: Address, power: i64, name: impl Into<String>) -> Self {
        Self {
            pub_key,
            coinbase,
            power,
            name: name.into(),
        }
    }
}
