//! Error types for the bootstrap client

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Client error type
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("No valid program address for seeds under program {program_id}")]
    NoValidDerivation { program_id: Pubkey },

    #[error("Proposal sequence {0} collides with vault role flags")]
    SequenceOverflow(u64),

    #[error("Account {address} has an unexpected discriminator")]
    DiscriminatorMismatch { address: Pubkey },

    #[error("Failed to decode account {address}: {reason}")]
    AccountDecode { address: Pubkey, reason: String },

    #[error("Failed to encode instruction {name}: {reason}")]
    InstructionEncode { name: &'static str, reason: String },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Wallet returned {returned} transactions, expected {expected}")]
    WalletCountMismatch { expected: usize, returned: usize },

    #[error("Transaction {index} is not fully signed after wallet approval")]
    UnsignedTransaction { index: usize },

    #[error("Transaction {index} carries a signature that does not verify")]
    InvalidSignature { index: usize },

    #[error("Transaction {index} is missing a signature from {signer}")]
    MissingCoSigner { index: usize, signer: Pubkey },

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, BootstrapError>;

impl From<std::io::Error> for BootstrapError {
    fn from(err: std::io::Error) -> Self {
        BootstrapError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for BootstrapError {
    fn from(err: toml::de::Error) -> Self {
        BootstrapError::Config(err.to_string())
    }
}

impl From<solana_client::client_error::ClientError> for BootstrapError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        BootstrapError::Rpc(err.to_string())
    }
}

impl From<solana_sdk::signer::SignerError> for BootstrapError {
    fn from(err: solana_sdk::signer::SignerError) -> Self {
        BootstrapError::Signing(err.to_string())
    }
}
