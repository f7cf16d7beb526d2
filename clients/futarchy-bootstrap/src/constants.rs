use solana_sdk::pubkey::Pubkey;

// Deployed program ids (overridable through ClientConfig)
pub const GOVERNANCE_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("meta3cxKzFBmWYgCVozmvCQAS3y9b3fGxrG9HkHL7Wi");
pub const CONDITIONAL_VAULT_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("vAuLTQjV5AZx5f3UgE75wcnkxnQowWxThn1hGjfCVwP");
pub const ORDERBOOK_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("opnb2LAfJYbRMAHHvqjCwQxanZn7ReEHp1k81EohpZb");
pub const TWAP_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("TWAPrdhADy2aTKN5iFZtNnkQYXERD9NvKjPFVPMSCNN");

// Seeds for PDA derivation: ["WWCACOTMICMIBMHAFTTWYGHMB"]
pub const DAO_SEED: &[u8] = b"WWCACOTMICMIBMHAFTTWYGHMB";

// Seeds for PDA derivation: ["Market", market]
pub const MARKET_AUTHORITY_SEED: &[u8] = b"Market";

// Seeds for PDA derivation: ["__event_authority"]
pub const EVENT_AUTHORITY_SEED: &[u8] = b"__event_authority";

// Seeds for PDA derivation: ["twap_market", market]
pub const TWAP_MARKET_SEED: &[u8] = b"twap_market";

// Seeds for PDA derivation: ["conditional_vault", settlement_authority, mint, nonce]
pub const CONDITIONAL_VAULT_SEED: &[u8] = b"conditional_vault";

// Seeds for PDA derivation: ["conditional_token", vault]
pub const CONDITIONAL_TOKEN_SEED: &[u8] = b"conditional_token";

pub const ANCHOR_DISCRIMINATOR: usize = 8;

// Order book buffers are fixed-size and cannot be resized after creation
pub const BOOK_SIDE_SPACE: usize = 90_952;
pub const EVENT_QUEUE_SPACE: usize = 91_288;

// Vault nonce role flags. Low bits carry the proposal sequence number.
pub const VAULT_NONCE_QUOTE_FLAG: u64 = 1 << 63;
pub const VAULT_NONCE_FAIL_FLAG: u64 = 1 << 62;
pub const VAULT_NONCE_SEQUENCE_MASK: u64 = VAULT_NONCE_FAIL_FLAG - 1;

// Oracle defaults for newly created markets
pub const DEFAULT_CONF_FILTER: f32 = 0.1;
pub const DEFAULT_MAX_STALENESS_SLOTS: u32 = 100;

pub const DEFAULT_TWAP_WINDOW: u64 = 1_000;

pub const DEFAULT_QUOTE_LOT_SIZE: i64 = 1;
pub const DEFAULT_BASE_LOT_SIZE: i64 = 1;

pub const PASS_MARKET_NAME: &str = "PASS-MARKET";
pub const FAIL_MARKET_NAME: &str = "FAIL-MARKET";

// Confirmation polling
pub const DEFAULT_CONFIRM_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
