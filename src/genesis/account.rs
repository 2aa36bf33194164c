use crate::primitives::{address_to_hex, parse_address, serde_balance, Address, U256};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Pre-funded account state at block zero
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisAccount {
    /// Balance in the chain's smallest unit
    #[serde(with = "serde_balance")]
    pub balance: U256,
    /// Account nonce
    #[serde(default)]
    pub nonce: u64,
}

impl GenesisAccount {
    /// Account holding `balance` with a zero nonce
    pub fn with_balance(balance: U256) -> Self {
        Self { balance, nonce: 0 }
    }
}

/// Alloc table: address to pre-funded account.
///
/// Keys are written as canonical lowercase hex. Two keys that decode to the
/// same address (e.g. differing only in case) are rejected on input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenesisAlloc(BTreeMap<Address, GenesisAccount>);

impl GenesisAlloc {
    /// Empty alloc table
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all balances, `None` on 256-bit overflow
    pub fn total_balance(&self) -> Option<U256> {
        self.0.values().try_fold(U256::ZERO, |acc, account| acc.checked_add(account.balance))
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<Address, GenesisAccount> {
        self.0
    }
}

impl Deref for GenesisAlloc {
    type Target = BTreeMap<Address, GenesisAccount>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for GenesisAlloc {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<BTreeMap<Address, GenesisAccount>> for GenesisAlloc {
    fn from(map: BTreeMap<Address, GenesisAccount>) -> Self {
        Self(map)
    }
}

impl FromIterator<(Address, GenesisAccount)> for GenesisAlloc {
    fn from_iter<I: IntoIterator<Item = (Address, GenesisAccount)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(Address, GenesisAccount)> for GenesisAlloc {
    fn extend<I: IntoIterator<Item = (Address, GenesisAccount)>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for GenesisAlloc {
    type Item = (Address, GenesisAccount);
    type IntoIter = std::collections::btree_map::IntoIter<Address, GenesisAccount>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for GenesisAlloc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (address, account) in &self.0 {
            map.serialize_entry(&address_to_hex(address), account)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GenesisAlloc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AllocVisitor)
    }
}

struct AllocVisitor;

impl<'de> Visitor<'de> for AllocVisitor {
    type Value = GenesisAlloc;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of address to account")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<GenesisAlloc, A::Error> {
        let mut alloc = BTreeMap::new();
        while let Some((key, account)) = access.next_entry::<String, GenesisAccount>()? {
            let address = parse_address(&key).map_err(de::Error::custom)?;
            if alloc.insert(address, account).is_some() {
                return Err(de::Error::custom(format!(
                    "duplicate account {}",
                    address_to_hex(&address)
                )));
            }
        }
        Ok(GenesisAlloc(alloc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_account_nonce_defaults_to_zero() {
        let account: GenesisAccount = serde_json::from_str(r#"{"balance":"0x10"}"#).unwrap();
        assert_eq!(account, GenesisAccount::with_balance(U256::from(16u64)));
    }

    #[test]
    fn test_account_requires_balance_and_rejects_unknown_fields() {
        assert!(serde_json::from_str::<GenesisAccount>(r#"{"nonce":1}"#).is_err());
        assert!(serde_json::from_str::<GenesisAccount>(r#"{"balance":"1","code":"0x"}"#).is_err());
        assert!(serde_json::from_str::<GenesisAccount>(r#"{"balance":"-1"}"#).is_err());
    }

    #[test]
    fn test_alloc_keys_written_lowercase_balances_decimal() {
        let mut alloc = GenesisAlloc::new();
        alloc.insert(
            address!("A73810E519E1075010678D706533486D8ECC8000"),
            GenesisAccount {
                balance: U256::from(0x3e8u64),
                nonce: 2,
            },
        );
        let json = serde_json::to_string(&alloc).unwrap();
        assert_eq!(
            json,
            r#"{"0xa73810e519e1075010678d706533486d8ecc8000":{"balance":"1000","nonce":2}}"#
        );
    }

    #[test]
    fn test_alloc_accepts_mixed_case_keys() {
        let alloc: GenesisAlloc = serde_json::from_str(
            r#"{"0xA73810E519E1075010678D706533486D8ECC8000":{"balance":"0x295be96e64066972000000"}}"#,
        )
        .unwrap();
        let account = alloc.get(&address!("a73810e519e1075010678d706533486d8ecc8000")).unwrap();
        assert_eq!(account.balance.to_string(), "50000000000000000000000000");
    }

    #[test]
    fn test_alloc_rejects_duplicates_and_bad_keys() {
        let dup = r#"{
            "0xa73810e519e1075010678d706533486d8ecc8000":{"balance":"1"},
            "0xA73810E519E1075010678D706533486D8ECC8000":{"balance":"2"}
        }"#;
        let err = serde_json::from_str::<GenesisAlloc>(dup).unwrap_err();
        assert!(err.to_string().contains("duplicate account"), "{err}");

        assert!(serde_json::from_str::<GenesisAlloc>(r#"{"0x12":{"balance":"1"}}"#).is_err());
    }

    #[test]
    fn test_alloc_rejects_unprefixed_keys() {
        let json = r#"{"54fb1c7d0f011dd63b08f85ed7b518ab82028100":{"balance":"1"}}"#;
        let err = serde_json::from_str::<GenesisAlloc>(json).unwrap_err();
        assert!(err.to_string().contains("invalid address"), "{err}");
    }

    #[test]
    fn test_total_balance() {
        let alloc: GenesisAlloc = [
            (Address::with_last_byte(1), GenesisAccount::with_balance(U256::from(5u64))),
            (Address::with_last_byte(2), GenesisAccount::with_balance(U256::from(7u64))),
        ]
        .into_iter()
        .collect();
        assert_eq!(alloc.total_balance(), Some(U256::from(12u64)));

        let overflow: GenesisAlloc = [
            (Address::with_last_byte(1), GenesisAccount::with_balance(U256::MAX)),
            (Address::with_last_byte(2), GenesisAccount::with_balance(U256::from(1u64))),
        ]
        .into_iter()
        .collect();
        assert_eq!(overflow.total_balance(), None);
    }
}
