//! Reading and writing genesis files on disk.

use poa_genesis::fixtures::{test_alloc_accounts, WELL_KNOWN_TEST_ADDRESSES};
use poa_genesis::genesis::{
    GenesisDoc, GenesisError, GenesisErrorKind, GenesisValidator, PublicKey, PublicKeyKind,
};
use poa_genesis::primitives::parse_address;
use std::fs;
use tempfile::TempDir;

const SECP_KEY: &str = "0x038318535b54105d4a7aae60c08fc45f9687181b4fdfc625bd1a753fa7397fed75";

fn completed_doc() -> GenesisDoc {
    let validator = GenesisValidator::new(
        PublicKey::from_hex(PublicKeyKind::Secp256k1, SECP_KEY).unwrap(),
        parse_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap(),
        10,
        "validator-0",
    );
    let mut doc = GenesisDoc::new("meowchain-it", vec![validator])
        .with_accounts(test_alloc_accounts())
        .with_genesis_time("2024-01-15T00:00:00.000000000Z");
    doc.validate_and_complete().unwrap();
    doc
}

// S5
#[test]
fn test_save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genesis.json");

    let doc = completed_doc();
    doc.save_as(&path).unwrap();
    let loaded = GenesisDoc::from_file(&path).unwrap();

    assert_eq!(loaded, doc);
    assert_eq!(fs::read_to_string(&path).unwrap(), doc.to_json().unwrap());
}

#[cfg(unix)]
#[test]
fn test_saved_file_is_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genesis.json");
    completed_doc().save_as(&path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

#[test]
fn test_save_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genesis.json");
    fs::write(&path, "old contents that are longer than nothing").unwrap();

    let doc = completed_doc();
    doc.save_as(&path).unwrap();
    assert_eq!(GenesisDoc::from_file(&path).unwrap(), doc);

    // no temp files left behind
    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("genesis.json");

    let err = completed_doc().save_as(&path).unwrap_err();
    assert_eq!(err.kind(), GenesisErrorKind::IoFailure);
    assert!(!path.exists());
}

#[test]
fn test_missing_file_is_io_failure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.json");

    let err = GenesisDoc::from_file(&path).unwrap_err();
    assert_eq!(err.kind(), GenesisErrorKind::IoFailure);
    match &err {
        GenesisError::Io {
            path: reported,
            action,
            ..
        } => {
            assert_eq!(reported, &path);
            assert_eq!(*action, "read");
        }
        other => panic!("Expected Io error, got {:?}", other),
    }
    assert!(err.to_string().contains("nope.json"), "{err}");
}

#[test]
fn test_invalid_contents_name_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genesis.json");

    fs::write(&path, r#"{"chain_id":"c","validators":[]}"#).unwrap();
    let err = GenesisDoc::from_file(&path).unwrap_err();
    assert_eq!(err.kind(), GenesisErrorKind::NoValidators);
    assert!(matches!(err, GenesisError::File { .. }));
    assert!(err.to_string().contains("genesis.json"), "{err}");

    fs::write(&path, "{ not json").unwrap();
    let err = GenesisDoc::from_file(&path).unwrap_err();
    assert_eq!(err.kind(), GenesisErrorKind::MalformedJson);
}

#[test]
fn test_loaded_file_is_completed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("genesis.json");
    fs::write(
        &path,
        format!(
            r#"{{
  "chain_id": "loaded",
  "validators": [
    {{
      "pub_key": {{ "type": "secp256k1", "value": "{SECP_KEY}" }},
      "coinbase": "0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266",
      "power": 1
    }}
  ],
  "accounts": {{
    "0x54fb1c7d0f011dd63b08f85ed7b518ab82028100": {{ "balance": "0x295be96e64066972000000" }}
  }}
}}"#
        ),
    )
    .unwrap();

    let doc = GenesisDoc::from_file(&path).unwrap();
    assert!(doc.consensus_params.is_some());
    assert!(!doc.genesis_time.is_empty());

    let accounts = doc.accounts.as_ref().unwrap();
    assert_eq!(
        accounts[&WELL_KNOWN_TEST_ADDRESSES[0]].balance.to_string(),
        "50000000000000000000000000"
    );

    // canonical form on the way back out
    let json = doc.to_json().unwrap();
    assert!(json.contains("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"));
    assert!(json.contains(r#""balance": "50000000000000000000000000""#));
}
