use borsh::BorshSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_system_interface::program::ID as system_program;

use super::InstructionSchema;
use crate::error::Result;
use crate::pda::DaoAddresses;

/// `initialize_dao()`: creates the singleton Dao account
#[derive(BorshSerialize, Debug, Clone, Default)]
pub struct InitializeDao {}

impl InstructionSchema for InitializeDao {
    const NAME: &'static str = "initialize_dao";
}

// Build initialize_dao instruction
pub fn build_initialize_dao_ix(
    payer: &Pubkey,
    base_mint: &Pubkey,
    quote_mint: &Pubkey,
    governance_program: &Pubkey,
) -> Result<Instruction> {
    let addresses = DaoAddresses::derive(governance_program)?;

    Ok(Instruction {
        program_id: *governance_program,
        accounts: vec![
            AccountMeta::new(addresses.dao, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(system_program, false),
            AccountMeta::new_readonly(*base_mint, false),
            AccountMeta::new_readonly(*quote_mint, false),
        ],
        data: InitializeDao::default().encode()?,
    })
}
