/// Address length in bytes
pub const ADDRESS_LENGTH: usize = 20;
/// Hex digits in an address, without the `0x` prefix
pub const ADDRESS_HEX_LENGTH: usize = ADDRESS_LENGTH * 2;

/// Hard upper bound for `block.max_bytes` (100 MiB)
pub const MAX_BLOCK_SIZE_BYTES: i64 = 104_857_600;
/// Default `block.max_bytes` (21 MiB)
pub const DEFAULT_BLOCK_MAX_BYTES: i64 = 22_020_096;
/// Default `block.max_gas` (-1 = unlimited)
pub const DEFAULT_BLOCK_MAX_GAS: i64 = -1;
/// Default minimum spacing between block timestamps in milliseconds
pub const DEFAULT_TIME_IOTA_MS: i64 = 1_000;
/// Default evidence age in blocks
pub const DEFAULT_EVIDENCE_MAX_AGE_NUM_BLOCKS: i64 = 100_000;
/// Default evidence age in milliseconds (48h)
pub const DEFAULT_EVIDENCE_MAX_AGE_DURATION_MS: i64 = 172_800_000;

/// Decimal exponent of the balance given to every test account (10^34)
pub const TEST_BALANCE_EXPONENT: u64 = 34;

/// File mode for newly written genesis files (owner rw, others r)
pub const GENESIS_FILE_MODE: u32 = 0o644;

/// PBKDF2 iterations for minted test-credential keystores
pub const FIXTURE_PBKDF2_C: u32 = 1_024;
