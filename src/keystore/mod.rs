//! Keystore V3 codec
//!
//! The test credentials shipped with this crate are stored as Ethereum
//! Keystore V3 documents (PBKDF2-HMAC-SHA256 key derivation, AES-128-CTR
//! encryption, keccak256 MAC), the same format geth and reth read:
//!
//! ```json
//! {
//!   "version": 3,
//!   "id": "uuid-v4",
//!   "address": "hex-address-without-0x",
//!   "crypto": {
//!     "cipher": "aes-128-ctr",
//!     "ciphertext": "hex",
//!     "cipherparams": { "iv": "hex" },
//!     "kdf": "pbkdf2",
//!     "kdfparams": { "dklen": 32, "c": 1024, "prf": "hmac-sha256", "salt": "hex" },
//!     "mac": "hex"
//!   }
//! }
//! ```

use crate::primitives::{parse_address_lenient, Address};
use aes::cipher::{KeyIvInit, StreamCipher};
use alloy_primitives::{keccak256, B256};
use alloy_signer_local::PrivateKeySigner;
use eyre::{ensure, eyre, Context, Result};
use serde::{Deserialize, Serialize};

type Aes128Ctr = ctr::Ctr64BE<aes::Aes128>;

const DKLEN: usize = 32;
const CIPHER: &str = "aes-128-ctr";
const KDF: &str = "pbkdf2";
const PRF: &str = "hmac-sha256";

/// Keystore V3 document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreFile {
    /// Always 3
    pub version: u32,
    /// UUID v4
    pub id: String,
    /// Account address, hex without `0x`
    pub address: String,
    /// Encrypted key material
    pub crypto: CryptoJson,
}

/// `crypto` section of a keystore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoJson {
    /// Cipher algorithm, always `aes-128-ctr`
    pub cipher: String,
    /// Encrypted private key, hex
    pub ciphertext: String,
    /// Cipher parameters
    pub cipherparams: CipherParams,
    /// Key derivation function, always `pbkdf2`
    pub kdf: String,
    /// KDF parameters
    pub kdfparams: KdfParams,
    /// keccak256(derived_key[16..32] || ciphertext)
    pub mac: String,
}

/// AES-128-CTR parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherParams {
    /// 16-byte IV, hex
    pub iv: String,
}

/// PBKDF2 parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Derived key length in bytes, always 32
    pub dklen: u32,
    /// Iteration count
    pub c: u32,
    /// Pseudo-random function, always `hmac-sha256`
    pub prf: String,
    /// Salt, hex
    pub salt: String,
}

impl KeystoreFile {
    /// Address recorded in the document (not checked against the key)
    pub fn address(&self) -> Result<Address> {
        parse_address_lenient(&self.address)
            .wrap_err_with(|| format!("keystore {} has a bad address", self.id))
    }

    /// Decrypt and return the private key as 64 lowercase hex digits.
    pub fn decrypt(&self, password: &str) -> Result<String> {
        decrypt_key(self, password)
    }

    /// Decrypt and build a signer, checking that the key matches the
    /// recorded address.
    pub fn signer(&self, password: &str) -> Result<PrivateKeySigner> {
        let key_hex = self.decrypt(password)?;
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| eyre!("decrypted key is not a secp256k1 key: {e}"))?;
        let recorded = self.address()?;
        ensure!(
            signer.address() == recorded,
            "keystore {} holds the key for {}, not {}",
            self.id,
            signer.address(),
            recorded
        );
        Ok(signer)
    }
}

/// Encrypt a hex private key (with or without `0x`) with the given PBKDF2
/// iteration count.
pub fn encrypt_key_with_iterations(
    private_key_hex: &str,
    password: &str,
    iterations: u32,
) -> Result<KeystoreFile> {
    let digits = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
    let key = hex::decode(digits).wrap_err("private key is not hex")?;
    ensure!(
        key.len() == 32,
        "private key must be 32 bytes, got {}",
        key.len()
    );

    let signer: PrivateKeySigner = digits
        .parse()
        .map_err(|e| eyre!("invalid private key: {e}"))?;

    let salt = random_bytes::<32>();
    let iv = random_bytes::<16>();
    let derived = derive_key(password, &salt, iterations);

    let mut ciphertext = key;
    let mut cipher = Aes128Ctr::new(derived[..16].into(), iv.as_slice().into());
    cipher.apply_keystream(&mut ciphertext);
    let mac = keystore_mac(&derived, &ciphertext);

    Ok(KeystoreFile {
        version: 3,
        id: uuid::Uuid::new_v4().to_string(),
        address: hex::encode(signer.address()),
        crypto: CryptoJson {
            cipher: CIPHER.to_string(),
            ciphertext: hex::encode(&ciphertext),
            cipherparams: CipherParams {
                iv: hex::encode(iv),
            },
            kdf: KDF.to_string(),
            kdfparams: KdfParams {
                dklen: DKLEN as u32,
                c: iterations,
                prf: PRF.to_string(),
                salt: hex::encode(salt),
            },
            mac: hex::encode(mac),
        },
    })
}

/// Decrypt a keystore, verifying its MAC first.
pub fn decrypt_key(keystore: &KeystoreFile, password: &str) -> Result<String> {
    let crypto = &keystore.crypto;
    ensure!(
        keystore.version == 3,
        "unsupported keystore version {}",
        keystore.version
    );
    ensure!(crypto.cipher == CIPHER, "unsupported cipher {}", crypto.cipher);
    ensure!(crypto.kdf == KDF, "unsupported kdf {}", crypto.kdf);
    ensure!(
        crypto.kdfparams.prf == PRF,
        "unsupported prf {}",
        crypto.kdfparams.prf
    );
    ensure!(
        crypto.kdfparams.dklen as usize == DKLEN,
        "unsupported dklen {}",
        crypto.kdfparams.dklen
    );

    let salt = hex::decode(&crypto.kdfparams.salt).wrap_err("bad salt hex")?;
    let iv = hex::decode(&crypto.cipherparams.iv).wrap_err("bad iv hex")?;
    let ciphertext = hex::decode(&crypto.ciphertext).wrap_err("bad ciphertext hex")?;
    let mac = hex::decode(&crypto.mac).wrap_err("bad mac hex")?;
    ensure!(iv.len() == 16, "iv must be 16 bytes, got {}", iv.len());
    ensure!(
        ciphertext.len() == 32,
        "ciphertext must be 32 bytes, got {}",
        ciphertext.len()
    );

    let derived = derive_key(password, &salt, crypto.kdfparams.c);
    ensure!(
        keystore_mac(&derived, &ciphertext).as_slice() == mac.as_slice(),
        "MAC mismatch: wrong password or corrupted keystore"
    );

    let mut plaintext = ciphertext;
    let mut cipher = Aes128Ctr::new(derived[..16].into(), iv.as_slice().into());
    cipher.apply_keystream(&mut plaintext);
    Ok(hex::encode(plaintext))
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; DKLEN] {
    let mut derived = [0u8; DKLEN];
    pbkdf2::pbkdf2_hmac::<sha2::Sha256>(password.as_bytes(), salt, iterations, &mut derived);
    derived
}

fn keystore_mac(derived: &[u8; DKLEN], ciphertext: &[u8]) -> B256 {
    let mut input = Vec::with_capacity(16 + ciphertext.len());
    input.extend_from_slice(&derived[16..]);
    input.extend_from_slice(ciphertext);
    keccak256(&input)
}

/// N bytes from the platform CSPRNG
fn random_bytes<const N: usize>() -> [u8; N] {
    let mut out = [0u8; N];
    for chunk in out.chunks_mut(32) {
        let random = B256::random();
        chunk.copy_from_slice(&random[..chunk.len()]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hardhat dev key 0
    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "f39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const TEST_PASSWORD: &str = "test-password-123";
    const FAST_C: u32 = 2;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let keystore = encrypt_key_with_iterations(TEST_KEY, TEST_PASSWORD, FAST_C).unwrap();
        assert_eq!(keystore.decrypt(TEST_PASSWORD).unwrap(), TEST_KEY);
    }

    #[test]
    fn test_accepts_0x_prefixed_key() {
        let keystore =
            encrypt_key_with_iterations(&format!("0x{TEST_KEY}"), TEST_PASSWORD, FAST_C).unwrap();
        assert_eq!(keystore.address, TEST_ADDRESS);
        assert_eq!(keystore.decrypt(TEST_PASSWORD).unwrap(), TEST_KEY);
    }

    #[test]
    fn test_keystore_format() {
        let keystore = encrypt_key_with_iterations(TEST_KEY, TEST_PASSWORD, FAST_C).unwrap();
        assert_eq!(keystore.version, 3);
        assert_eq!(keystore.address, TEST_ADDRESS);
        assert_eq!(keystore.crypto.cipher, "aes-128-ctr");
        assert_eq!(keystore.crypto.kdf, "pbkdf2");
        assert_eq!(keystore.crypto.kdfparams.prf, "hmac-sha256");
        assert_eq!(keystore.crypto.kdfparams.dklen, 32);
        assert_eq!(keystore.crypto.kdfparams.c, FAST_C);
        assert_eq!(keystore.crypto.kdfparams.salt.len(), 64);
        assert_eq!(keystore.crypto.cipherparams.iv.len(), 32);
        assert_eq!(keystore.crypto.mac.len(), 64);
        assert!(uuid::Uuid::parse_str(&keystore.id).is_ok());

        let json = serde_json::to_string(&keystore).unwrap();
        let decoded: KeystoreFile = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, keystore);
    }

    #[test]
    fn test_wrong_password_fails() {
        let keystore = encrypt_key_with_iterations(TEST_KEY, TEST_PASSWORD, FAST_C).unwrap();
        let err = keystore.decrypt("wrong-password").unwrap_err().to_string();
        assert!(err.contains("MAC mismatch"), "{err}");
    }

    #[test]
    fn test_tampered_ciphertext_fails_mac() {
        let mut keystore = encrypt_key_with_iterations(TEST_KEY, TEST_PASSWORD, FAST_C).unwrap();
        let mut bytes = hex::decode(&keystore.crypto.ciphertext).unwrap();
        bytes[0] ^= 0xff;
        keystore.crypto.ciphertext = hex::encode(bytes);
        assert!(keystore.decrypt(TEST_PASSWORD).is_err());
    }

    #[test]
    fn test_unsupported_parameters_rejected() {
        let base = encrypt_key_with_iterations(TEST_KEY, TEST_PASSWORD, FAST_C).unwrap();

        let mut scrypt = base.clone();
        scrypt.crypto.kdf = "scrypt".into();
        assert!(scrypt.decrypt(TEST_PASSWORD).unwrap_err().to_string().contains("kdf"));

        let mut v4 = base.clone();
        v4.version = 4;
        assert!(v4.decrypt(TEST_PASSWORD).is_err());

        let mut cbc = base;
        cbc.crypto.cipher = "aes-128-cbc".into();
        assert!(cbc.decrypt(TEST_PASSWORD).is_err());
    }

    #[test]
    fn test_invalid_key_rejected() {
        assert!(encrypt_key_with_iterations("not-hex", TEST_PASSWORD, FAST_C).is_err());
        assert!(encrypt_key_with_iterations("abcd", TEST_PASSWORD, FAST_C).is_err());
        assert!(encrypt_key_with_iterations(&"00".repeat(32), TEST_PASSWORD, FAST_C).is_err());
    }

    #[test]
    fn test_signer_checks_recorded_address() {
        let keystore = encrypt_key_with_iterations(TEST_KEY, TEST_PASSWORD, FAST_C).unwrap();
        let signer = keystore.signer(TEST_PASSWORD).unwrap();
        assert_eq!(signer.address(), keystore.address().unwrap());

        let mut mislabeled = keystore;
        mislabeled.address = "70997970c51812dc3a010c7d01b50e0d17dc79c8".into();
        let err = mislabeled.signer(TEST_PASSWORD).unwrap_err().to_string();
        assert!(err.contains("holds the key for"), "{err}");
    }

    #[test]
    fn test_random_bytes_lengths() {
        let a = random_bytes::<48>();
        let b = random_bytes::<48>();
        assert_ne!(a, b);
        assert_eq!(random_bytes::<16>().len(), 16);
    }
}
