//! Address and balance primitives
//!
//! Genesis files carry addresses as `0x`-prefixed lowercase hex and balances as
//! strings, either decimal or `0x`-prefixed hex. The serde modules here are
//! used with `#[serde(with = ...)]` on every field that holds one of them, so
//! the external form stays canonical no matter how alloy renders the types.

use crate::constants::{ADDRESS_HEX_LENGTH, ADDRESS_LENGTH};
use thiserror::Error;

pub use alloy_primitives::{Address, U256};

/// Errors raised while decoding primitives from their textual form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Address is not 40 hex digits
    #[error("invalid address {0:?}: expected 0x followed by 40 hex digits")]
    InvalidAddress(String),

    /// Balance is not a non-negative decimal or 0x-hex integer that fits 256 bits
    #[error("invalid balance {0:?}: expected a non-negative decimal or 0x-prefixed hex integer")]
    InvalidBalance(String),

    /// Public key bytes have the wrong length for their scheme
    #[error("invalid {kind} public key: expected {expected} bytes, got {got}")]
    InvalidPublicKey {
        /// Key scheme name
        kind: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Unknown public key scheme name
    #[error("unknown public key type {0:?}")]
    UnknownKeyType(String),
}

/// Render an address in its canonical form: `0x` + 40 lowercase hex digits.
pub fn address_to_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Parse a `0x`-prefixed address in either case.
///
/// Mixed-case input is accepted without checksum verification.
pub fn parse_address(s: &str) -> Result<Address, PrimitiveError> {
    let digits =
        strip_hex_prefix(s).ok_or_else(|| PrimitiveError::InvalidAddress(s.to_string()))?;
    decode_address(s, digits)
}

/// Parse an address with or without the `0x` prefix, as keystore files store it.
pub fn parse_address_lenient(s: &str) -> Result<Address, PrimitiveError> {
    decode_address(s, strip_hex_prefix(s).unwrap_or(s))
}

fn decode_address(s: &str, digits: &str) -> Result<Address, PrimitiveError> {
    if digits.len() != ADDRESS_HEX_LENGTH {
        return Err(PrimitiveError::InvalidAddress(s.to_string()));
    }

    let mut bytes = [0u8; ADDRESS_LENGTH];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|_| PrimitiveError::InvalidAddress(s.to_string()))?;
    Ok(Address::from(bytes))
}

/// Parse a balance from decimal (`"1000"`) or `0x`-prefixed hex (`"0x3e8"`).
pub fn parse_balance(s: &str) -> Result<U256, PrimitiveError> {
    let (digits, radix) = match strip_hex_prefix(s) {
        Some(hex_digits) => (hex_digits, 16),
        None => (s, 10),
    };

    // from_str_radix tolerates '_' separators, genesis files must not
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix as u32)) {
        return Err(PrimitiveError::InvalidBalance(s.to_string()));
    }

    U256::from_str_radix(digits, radix).map_err(|_| PrimitiveError::InvalidBalance(s.to_string()))
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

/// Serde codec for a single address in canonical lowercase form.
pub mod serde_address {
    use super::{address_to_hex, parse_address, Address};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize as `0x` + lowercase hex
    pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&address_to_hex(address))
    }

    /// Deserialize from a hex string in either case
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_address(&s).map_err(de::Error::custom)
    }
}

/// Serde codec for balances: decimal string out, decimal or hex string (or a
/// non-negative JSON integer up to `u64::MAX`) in.
pub mod serde_balance {
    use super::{parse_balance, U256};
    use serde::{de, Deserializer, Serializer};
    use std::fmt;

    /// Serialize as a decimal string
    pub fn serialize<S: Serializer>(balance: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&balance.to_string())
    }

    /// Deserialize from a decimal / hex string or an unsigned integer
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        deserializer.deserialize_any(BalanceVisitor)
    }

    struct BalanceVisitor;

    impl<'de> de::Visitor<'de> for BalanceVisitor {
        type Value = U256;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative decimal or 0x-prefixed hex balance")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<U256, E> {
            parse_balance(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<U256, E> {
            Ok(U256::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<U256, E> {
            u64::try_from(v)
                .map(U256::from)
                .map_err(|_| E::custom(format!("negative balance {v}")))
        }

        // Integers wider than u64 reach here as floats and have already lost precision
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<U256, E> {
            Err(E::custom(format!(
                "balance {v} is not a u64 integer; write larger balances as a decimal or hex string"
            )))
        }
    }
}
