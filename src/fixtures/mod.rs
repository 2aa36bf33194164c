//! Test fixtures
//!
//! Pre-funded alloc maps and the embedded test-credential table. The table
//! lives in `fixtures/test_credentials.json` and is decoded once on first use.

use crate::constants::TEST_BALANCE_EXPONENT;
use crate::genesis::{GenesisAccount, GenesisAlloc};
use crate::keystore::{encrypt_key_with_iterations, KeystoreFile};
use crate::primitives::{serde_address, Address, U256};
use alloy_primitives::address;
use alloy_signer_local::PrivateKeySigner;
use eyre::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Addresses funded by [`test_alloc_accounts`] in addition to the credential table
pub const WELL_KNOWN_TEST_ADDRESSES: [Address; 2] = [
    address!("54fb1c7d0f011dd63b08f85ed7b518ab82028100"),
    address!("a73810e519e1075010678d706533486d8ecc8000"),
];

static TEST_CREDENTIALS_JSON: &str = include_str!("../../fixtures/test_credentials.json");

static TEST_CREDENTIALS: LazyLock<Vec<TestCredential>> = LazyLock::new(|| {
    serde_json::from_str(TEST_CREDENTIALS_JSON).expect("embedded test credentials are valid")
});

/// Funded account whose key is recoverable in tests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCredential {
    /// Account address
    #[serde(with = "serde_address")]
    pub address: Address,
    /// Encrypted private key
    pub keystore: KeystoreFile,
    /// Keystore password
    pub password: String,
}

impl TestCredential {
    /// Encrypt `private_key_hex` into a new credential record.
    pub fn mint(private_key_hex: &str, password: &str, iterations: u32) -> Result<Self> {
        let keystore = encrypt_key_with_iterations(private_key_hex, password, iterations)?;
        let address = keystore.address()?;
        Ok(Self {
            address,
            keystore,
            password: password.to_string(),
        })
    }

    /// Private key as 64 hex digits
    pub fn decrypt_private_key(&self) -> Result<String> {
        self.keystore.decrypt(&self.password)
    }

    /// Signer for this credential. Fails if the decrypted key does not
    /// belong to [`address`](Self::address).
    pub fn signer(&self) -> Result<PrivateKeySigner> {
        let signer = self.keystore.signer(&self.password)?;
        ensure!(
            signer.address() == self.address,
            "credential {} decrypts to {}",
            self.address,
            signer.address()
        );
        Ok(signer)
    }
}

/// The embedded credential table, in file order
pub fn test_credentials() -> &'static [TestCredential] {
    &TEST_CREDENTIALS
}

/// Addresses of [`test_credentials`], in table order
pub fn test_credential_addresses() -> Vec<Address> {
    test_credentials().iter().map(|credential| credential.address).collect()
}

/// Balance given to every test account: 10^34
pub fn test_balance() -> U256 {
    U256::from(10u64).pow(U256::from(TEST_BALANCE_EXPONENT))
}

/// Alloc map funding the well-known test addresses and every credential
/// address with [`test_balance`].
pub fn test_alloc_accounts() -> GenesisAlloc {
    let balance = test_balance();
    WELL_KNOWN_TEST_ADDRESSES
        .into_iter()
        .chain(test_credential_addresses())
        .map(|address| (address, GenesisAccount::with_balance(balance)))
        .collect()
}

/// Production pre-funding. Empty until a funding policy is configured.
pub fn alloc_accounts() -> GenesisAlloc {
    GenesisAlloc::new()
}
