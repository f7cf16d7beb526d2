use borsh::BorshSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_system_interface::program::ID as system_program;
use spl_associated_token_account::get_associated_token_address;

use super::InstructionSchema;
use crate::error::Result;
use crate::pda::{derive_conditional_token_mint_pda, derive_conditional_vault_pda};

// Standard program IDs
const TOKEN_PROGRAM_ID: Pubkey = spl_token::ID;
const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = spl_associated_token_account::ID;

/// `initialize_conditional_vault(settlement_authority, nonce)`
#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct InitializeConditionalVault {
    pub settlement_authority: [u8; 32],
    pub nonce: u64,
}

impl InstructionSchema for InitializeConditionalVault {
    const NAME: &'static str = "initialize_conditional_vault";
}

// Build initialize_conditional_vault instruction
pub fn build_initialize_conditional_vault_ix(
    payer: &Pubkey,
    settlement_authority: &Pubkey,
    underlying_mint: &Pubkey,
    nonce: u64,
    vault_program: &Pubkey,
) -> Result<Instruction> {
    let (vault, _) =
        derive_conditional_vault_pda(settlement_authority, underlying_mint, nonce, vault_program)?;
    let (conditional_token_mint, _) = derive_conditional_token_mint_pda(&vault, vault_program)?;
    let vault_underlying_token_account = get_associated_token_address(&vault, underlying_mint);

    let args = InitializeConditionalVault {
        settlement_authority: settlement_authority.to_bytes(),
        nonce,
    };

    Ok(Instruction {
        program_id: *vault_program,
        accounts: vec![
            AccountMeta::new(vault, false),
            AccountMeta::new_readonly(*underlying_mint, false),
            AccountMeta::new(vault_underlying_token_account, false),
            AccountMeta::new(conditional_token_mint, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(system_program, false),
        ],
        data: args.encode()?,
    })
}
