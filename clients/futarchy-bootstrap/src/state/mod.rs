pub mod dao;
pub mod proposal;

pub use dao::*;
pub use proposal::*;

use solana_sdk::pubkey::Pubkey;

use crate::constants::ANCHOR_DISCRIMINATOR;
use crate::error::{BootstrapError, Result};
use crate::instructions::account_discriminator;

// Split off the Anchor account discriminator after checking it names `account`
fn strip_discriminator<'a>(address: &Pubkey, account: &str, data: &'a [u8]) -> Result<&'a [u8]> {
    if data.len() < ANCHOR_DISCRIMINATOR {
        return Err(BootstrapError::AccountDecode {
            address: *address,
            reason: format!("{} bytes is shorter than the discriminator", data.len()),
        });
    }
    let (discriminator, body) = data.split_at(ANCHOR_DISCRIMINATOR);
    if discriminator != account_discriminator(account) {
        return Err(BootstrapError::DiscriminatorMismatch { address: *address });
    }
    Ok(body)
}
