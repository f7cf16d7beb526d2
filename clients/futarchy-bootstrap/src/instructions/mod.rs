// Typed instruction schemas
//
// Each on-chain instruction this client sends has one argument struct that
// implements InstructionSchema. The struct fixes both the name (and so the
// Anchor discriminator) and the Borsh field layout at compile time.

pub mod conditional_vault;
pub mod governance;
pub mod orderbook;
pub mod twap;

pub use conditional_vault::*;
pub use governance::*;
pub use orderbook::*;
pub use twap::*;

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};

use crate::error::{BootstrapError, Result};

/// Build Anchor instruction discriminator (first 8 bytes of sha256("global:method_name"))
pub fn anchor_discriminator(method: &str) -> [u8; 8] {
    hashed_prefix("global", method)
}

/// Build Anchor account discriminator (first 8 bytes of sha256("account:AccountName"))
pub fn account_discriminator(account: &str) -> [u8; 8] {
    hashed_prefix("account", account)
}

fn hashed_prefix(namespace: &str, name: &str) -> [u8; 8] {
    let preimage = format!("{}:{}", namespace, name);
    let hash = Sha256::digest(preimage.as_bytes());
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash[..8]);
    discriminator
}

pub trait InstructionSchema: BorshSerialize {
    /// snake_case method name as declared by the on-chain program
    const NAME: &'static str;

    fn discriminator() -> [u8; 8] {
        anchor_discriminator(Self::NAME)
    }

    /// Discriminator followed by the Borsh-encoded arguments
    fn encode(&self) -> Result<Vec<u8>> {
        let mut data = Self::discriminator().to_vec();
        self.serialize(&mut data)
            .map_err(|e| BootstrapError::InstructionEncode {
                name: Self::NAME,
                reason: e.to_string(),
            })?;
        Ok(data)
    }
}
