use borsh::BorshSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_system_interface::program::ID as system_program;

use super::InstructionSchema;
use crate::error::Result;

// Standard program IDs
const TOKEN_PROGRAM_ID: Pubkey = spl_token::ID;
const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = spl_associated_token_account::ID;

#[derive(BorshSerialize, Debug, Clone, Copy, PartialEq)]
pub struct OracleConfigParams {
    pub conf_filter: f32,
    pub max_staleness_slots: Option<u32>,
}

/// `create_market(name, oracle_config, quote_lot_size, base_lot_size,
/// maker_fee, taker_fee, time_expiry)`
#[derive(BorshSerialize, Debug, Clone, PartialEq)]
pub struct CreateMarket {
    pub name: String,
    pub oracle_config: OracleConfigParams,
    pub quote_lot_size: i64,
    pub base_lot_size: i64,
    pub maker_fee: i64,
    pub taker_fee: i64,
    pub time_expiry: i64,
}

impl InstructionSchema for CreateMarket {
    const NAME: &'static str = "create_market";
}

/// Every account the create_market instruction touches.
///
/// Optional accounts are passed as the order book program id when absent,
/// which is how Anchor encodes `Option<Account>`.
#[derive(Debug, Clone, Copy)]
pub struct CreateMarketAccounts {
    pub market: Pubkey,
    pub market_authority: Pubkey,
    pub bids: Pubkey,
    pub asks: Pubkey,
    pub event_queue: Pubkey,
    pub payer: Pubkey,
    pub market_base_vault: Pubkey,
    pub market_quote_vault: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub oracle_a: Option<Pubkey>,
    pub oracle_b: Option<Pubkey>,
    pub collect_fee_admin: Pubkey,
    pub open_orders_admin: Option<Pubkey>,
    pub consume_events_admin: Option<Pubkey>,
    pub close_market_admin: Option<Pubkey>,
    pub event_authority: Pubkey,
}

// Build create_market instruction
pub fn build_create_market_ix(
    args: &CreateMarket,
    accounts: &CreateMarketAccounts,
    orderbook_program: &Pubkey,
) -> Result<Instruction> {
    let optional = |key: Option<Pubkey>| {
        AccountMeta::new_readonly(key.unwrap_or(*orderbook_program), false)
    };

    Ok(Instruction {
        program_id: *orderbook_program,
        accounts: vec![
            AccountMeta::new(accounts.market, true),
            AccountMeta::new_readonly(accounts.market_authority, false),
            AccountMeta::new(accounts.bids, false),
            AccountMeta::new(accounts.asks, false),
            AccountMeta::new(accounts.event_queue, false),
            AccountMeta::new(accounts.payer, true),
            AccountMeta::new(accounts.market_base_vault, false),
            AccountMeta::new(accounts.market_quote_vault, false),
            AccountMeta::new_readonly(accounts.base_mint, false),
            AccountMeta::new_readonly(accounts.quote_mint, false),
            AccountMeta::new_readonly(system_program, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            optional(accounts.oracle_a),
            optional(accounts.oracle_b),
            AccountMeta::new_readonly(accounts.collect_fee_admin, false),
            optional(accounts.open_orders_admin),
            optional(accounts.consume_events_admin),
            optional(accounts.close_market_admin),
            AccountMeta::new_readonly(accounts.event_authority, false),
            AccountMeta::new_readonly(*orderbook_program, false),
        ],
        data: args.encode()?,
    })
}
