// Program-derived address helpers
//
// All derivations are local and pure. A seed set with no off-curve bump
// surfaces as NoValidDerivation instead of a silently different address.

use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

use crate::constants::*;
use crate::error::{BootstrapError, Result};

pub fn derive(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    Pubkey::try_find_program_address(seeds, program_id).ok_or(BootstrapError::NoValidDerivation {
        program_id: *program_id,
    })
}

// Derive the Dao PDA using seeds: ["WWCACOTMICMIBMHAFTTWYGHMB"]
pub fn derive_dao_pda(governance_program: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(&[DAO_SEED], governance_program)
}

// Derive the treasury PDA using seeds: [dao]
pub fn derive_treasury_pda(dao: &Pubkey, governance_program: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(&[dao.as_ref()], governance_program)
}

// Derive the market authority PDA using seeds: ["Market", market]
pub fn derive_market_authority_pda(
    market: &Pubkey,
    orderbook_program: &Pubkey,
) -> Result<(Pubkey, u8)> {
    derive(&[MARKET_AUTHORITY_SEED, market.as_ref()], orderbook_program)
}

// Derive the event authority PDA using seeds: ["__event_authority"]
pub fn derive_event_authority_pda(orderbook_program: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(&[EVENT_AUTHORITY_SEED], orderbook_program)
}

// Derive the TWAP market PDA using seeds: ["twap_market", market]
pub fn derive_twap_market_pda(market: &Pubkey, twap_program: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(&[TWAP_MARKET_SEED, market.as_ref()], twap_program)
}

// Derive the conditional vault PDA using seeds:
// ["conditional_vault", settlement_authority, underlying_mint, nonce]
pub fn derive_conditional_vault_pda(
    settlement_authority: &Pubkey,
    underlying_mint: &Pubkey,
    nonce: u64,
    vault_program: &Pubkey,
) -> Result<(Pubkey, u8)> {
    derive(
        &[
            CONDITIONAL_VAULT_SEED,
            settlement_authority.as_ref(),
            underlying_mint.as_ref(),
            &nonce.to_le_bytes(),
        ],
        vault_program,
    )
}

// Derive the conditional token mint PDA using seeds: ["conditional_token", vault]
pub fn derive_conditional_token_mint_pda(
    vault: &Pubkey,
    vault_program: &Pubkey,
) -> Result<(Pubkey, u8)> {
    derive(&[CONDITIONAL_TOKEN_SEED, vault.as_ref()], vault_program)
}

/// Addresses shared by every instruction in one bootstrap run.
///
/// Computed once so the same Dao and treasury flow into every instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaoAddresses {
    pub dao: Pubkey,
    pub treasury: Pubkey,
}

impl DaoAddresses {
    pub fn derive(governance_program: &Pubkey) -> Result<Self> {
        let (dao, _) = derive_dao_pda(governance_program)?;
        let (treasury, _) = derive_treasury_pda(&dao, governance_program)?;
        tracing::debug!(%dao, %treasury, "derived dao addresses");
        Ok(Self { dao, treasury })
    }
}

/// Token vaults owned by a market's authority
pub fn market_token_vaults(
    market_authority: &Pubkey,
    base_mint: &Pubkey,
    quote_mint: &Pubkey,
) -> (Pubkey, Pubkey) {
    (
        get_associated_token_address(market_authority, base_mint),
        get_associated_token_address(market_authority, quote_mint),
    )
}
