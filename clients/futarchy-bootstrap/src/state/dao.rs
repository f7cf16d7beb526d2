use borsh::BorshDeserialize;
use solana_sdk::pubkey::Pubkey;

use super::strip_discriminator;
use crate::error::{BootstrapError, Result};

// governance singleton, as laid out on-chain
#[derive(BorshDeserialize)]
struct DaoLayout {
    treasury_pda_bump: u8,
    treasury: [u8; 32],
    base_mint: [u8; 32],
    quote_mint: [u8; 32],
    proposal_count: u32,
    last_proposal_slot: u64,
    pass_threshold_bps: u16,
    base_burn_lamports: u64,
    burn_decay_per_slot_lamports: u64,
    slots_per_proposal: u64,
    market_taker_fee: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaoAccount {
    pub treasury_pda_bump: u8,
    pub treasury: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub proposal_count: u32,
    pub last_proposal_slot: u64,
    /// basis points the pass TWAP must clear the fail TWAP by
    pub pass_threshold_bps: u16,
    pub base_burn_lamports: u64,
    pub burn_decay_per_slot_lamports: u64,
    pub slots_per_proposal: u64,
    pub market_taker_fee: i64,
}

impl DaoAccount {
    pub const ACCOUNT_NAME: &'static str = "Dao";

    pub fn decode(address: &Pubkey, data: &[u8]) -> Result<Self> {
        let mut body = strip_discriminator(address, Self::ACCOUNT_NAME, data)?;
        let raw = DaoLayout::deserialize(&mut body).map_err(|e| BootstrapError::AccountDecode {
            address: *address,
            reason: e.to_string(),
        })?;

        Ok(Self {
            treasury_pda_bump: raw.treasury_pda_bump,
            treasury: Pubkey::new_from_array(raw.treasury),
            base_mint: Pubkey::new_from_array(raw.base_mint),
            quote_mint: Pubkey::new_from_array(raw.quote_mint),
            proposal_count: raw.proposal_count,
            last_proposal_slot: raw.last_proposal_slot,
            pass_threshold_bps: raw.pass_threshold_bps,
            base_burn_lamports: raw.base_burn_lamports,
            burn_decay_per_slot_lamports: raw.burn_decay_per_slot_lamports,
            slots_per_proposal: raw.slots_per_proposal,
            market_taker_fee: raw.market_taker_fee,
        })
    }

    /// Sequence number the next proposal's vault nonces are built from
    pub fn next_sequence(&self) -> u64 {
        u64::from(self.proposal_count)
    }
}
