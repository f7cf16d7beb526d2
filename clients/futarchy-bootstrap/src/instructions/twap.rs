use borsh::BorshSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_system_interface::program::ID as system_program;

use super::InstructionSchema;
use crate::error::Result;
use crate::pda::derive_twap_market_pda;

/// `create_twap_market(window_size)`
#[derive(BorshSerialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateTwapMarket {
    pub window_size: u64,
}

impl InstructionSchema for CreateTwapMarket {
    const NAME: &'static str = "create_twap_market";
}

// Build create_twap_market instruction
pub fn build_create_twap_market_ix(
    payer: &Pubkey,
    market: &Pubkey,
    window_size: u64,
    twap_program: &Pubkey,
) -> Result<Instruction> {
    let (twap_market, _) = derive_twap_market_pda(market, twap_program)?;

    Ok(Instruction {
        program_id: *twap_program,
        accounts: vec![
            AccountMeta::new_readonly(*market, false),
            AccountMeta::new(twap_market, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(system_program, false),
        ],
        data: CreateTwapMarket { window_size }.encode()?,
    })
}
