//! Order book market creation requests
//!
//! A market needs four fresh keypairs: the market itself plus its bid side,
//! ask side and event queue buffers. The buffers are created with system
//! `create_account` instructions in the same transaction as `create_market`,
//! so all four keypairs co-sign that one transaction.

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

use crate::config::MarketConfig;
use crate::constants::*;
use crate::error::Result;
use crate::instructions::{build_create_market_ix, CreateMarket, CreateMarketAccounts, OracleConfigParams};
use crate::pda::{derive_event_authority_pda, derive_market_authority_pda, market_token_vaults};
use crate::provision::{ProvisionedAccount, RentSchedule};
use crate::rpc::RpcConnection;

#[derive(Debug, Clone, PartialEq)]
pub struct MarketRequest {
    pub name: String,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub oracle_config: OracleConfigParams,
    pub quote_lot_size: i64,
    pub base_lot_size: i64,
    pub maker_fee: i64,
    pub taker_fee: i64,
    pub time_expiry: i64,
    pub oracle_a: Option<Pubkey>,
    pub oracle_b: Option<Pubkey>,
    /// Defaults to the payer when unset
    pub collect_fee_admin: Option<Pubkey>,
    pub open_orders_admin: Option<Pubkey>,
    pub consume_events_admin: Option<Pubkey>,
    pub close_market_admin: Option<Pubkey>,
}

impl MarketRequest {
    pub fn new(name: impl Into<String>, base_mint: Pubkey, quote_mint: Pubkey) -> Self {
        Self {
            name: name.into(),
            base_mint,
            quote_mint,
            oracle_config: OracleConfigParams {
                conf_filter: DEFAULT_CONF_FILTER,
                max_staleness_slots: Some(DEFAULT_MAX_STALENESS_SLOTS),
            },
            quote_lot_size: DEFAULT_QUOTE_LOT_SIZE,
            base_lot_size: DEFAULT_BASE_LOT_SIZE,
            maker_fee: 0,
            taker_fee: 0,
            time_expiry: 0,
            oracle_a: None,
            oracle_b: None,
            collect_fee_admin: None,
            open_orders_admin: None,
            consume_events_admin: None,
            close_market_admin: None,
        }
    }

    pub fn with_config(mut self, config: &MarketConfig) -> Self {
        self.oracle_config = OracleConfigParams {
            conf_filter: config.conf_filter,
            max_staleness_slots: config.max_staleness_slots,
        };
        self.quote_lot_size = config.quote_lot_size;
        self.base_lot_size = config.base_lot_size;
        self.time_expiry = config.time_expiry;
        self
    }

    pub fn oracles(mut self, oracle_a: Option<Pubkey>, oracle_b: Option<Pubkey>) -> Self {
        self.oracle_a = oracle_a;
        self.oracle_b = oracle_b;
        self
    }

    pub fn fees(mut self, maker_fee: i64, taker_fee: i64) -> Self {
        self.maker_fee = maker_fee;
        self.taker_fee = taker_fee;
        self
    }

    pub fn collect_fee_admin(mut self, admin: Pubkey) -> Self {
        self.collect_fee_admin = Some(admin);
        self
    }

    pub fn open_orders_admin(mut self, admin: Pubkey) -> Self {
        self.open_orders_admin = Some(admin);
        self
    }

    pub fn consume_events_admin(mut self, admin: Pubkey) -> Self {
        self.consume_events_admin = Some(admin);
        self
    }

    pub fn close_market_admin(mut self, admin: Pubkey) -> Self {
        self.close_market_admin = Some(admin);
        self
    }

    fn args(&self) -> CreateMarket {
        CreateMarket {
            name: self.name.clone(),
            oracle_config: self.oracle_config,
            quote_lot_size: self.quote_lot_size,
            base_lot_size: self.base_lot_size,
            maker_fee: self.maker_fee,
            taker_fee: self.taker_fee,
            time_expiry: self.time_expiry,
        }
    }

    /// Provision the market's buffers and assemble its instruction sequence.
    ///
    /// `market` is taken from the caller so addresses derived from it (such
    /// as a TWAP wrapper used as admin) can be fixed before the request is
    /// built.
    pub async fn build<C>(
        &self,
        connection: &C,
        rent: &mut RentSchedule,
        market: Keypair,
        payer: &Pubkey,
        orderbook_program: &Pubkey,
    ) -> Result<MarketPlan>
    where
        C: RpcConnection + ?Sized,
    {
        let bids = rent
            .provision(connection, payer, BOOK_SIDE_SPACE, orderbook_program)
            .await?;
        let asks = rent
            .provision(connection, payer, BOOK_SIDE_SPACE, orderbook_program)
            .await?;
        let event_queue = rent
            .provision(connection, payer, EVENT_QUEUE_SPACE, orderbook_program)
            .await?;

        self.assemble(market, bids, asks, event_queue, payer, orderbook_program)
    }

    fn assemble(
        &self,
        market: Keypair,
        bids: ProvisionedAccount,
        asks: ProvisionedAccount,
        event_queue: ProvisionedAccount,
        payer: &Pubkey,
        orderbook_program: &Pubkey,
    ) -> Result<MarketPlan> {
        let market_key = market.pubkey();
        let (market_authority, _) = derive_market_authority_pda(&market_key, orderbook_program)?;
        let (event_authority, _) = derive_event_authority_pda(orderbook_program)?;
        let (market_base_vault, market_quote_vault) =
            market_token_vaults(&market_authority, &self.base_mint, &self.quote_mint);

        let accounts = CreateMarketAccounts {
            market: market_key,
            market_authority,
            bids: bids.pubkey(),
            asks: asks.pubkey(),
            event_queue: event_queue.pubkey(),
            payer: *payer,
            market_base_vault,
            market_quote_vault,
            base_mint: self.base_mint,
            quote_mint: self.quote_mint,
            oracle_a: self.oracle_a,
            oracle_b: self.oracle_b,
            collect_fee_admin: self.collect_fee_admin.unwrap_or(*payer),
            open_orders_admin: self.open_orders_admin,
            consume_events_admin: self.consume_events_admin,
            close_market_admin: self.close_market_admin,
            event_authority,
        };
        let create_market = build_create_market_ix(&self.args(), &accounts, orderbook_program)?;

        tracing::debug!(
            name = %self.name,
            market = %market_key,
            %market_authority,
            "assembled market"
        );

        Ok(MarketPlan {
            market,
            bids,
            asks,
            event_queue,
            market_authority,
            market_base_vault,
            market_quote_vault,
            create_market,
        })
    }
}

/// Everything needed to put one market on chain in a single transaction
#[derive(Debug)]
pub struct MarketPlan {
    pub market: Keypair,
    pub bids: ProvisionedAccount,
    pub asks: ProvisionedAccount,
    pub event_queue: ProvisionedAccount,
    pub market_authority: Pubkey,
    pub market_base_vault: Pubkey,
    pub market_quote_vault: Pubkey,
    pub create_market: Instruction,
}

impl MarketPlan {
    pub fn market_pubkey(&self) -> Pubkey {
        self.market.pubkey()
    }

    /// bids, asks and event queue creates followed by create_market
    pub fn instructions(&self) -> Vec<Instruction> {
        vec![
            self.bids.instruction.clone(),
            self.asks.instruction.clone(),
            self.event_queue.instruction.clone(),
            self.create_market.clone(),
        ]
    }

    pub fn into_co_signers(self) -> Vec<Keypair> {
        vec![
            self.market,
            self.bids.keypair,
            self.asks.keypair,
            self.event_queue.keypair,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(payer: &Pubkey, space: usize) -> ProvisionedAccount {
        ProvisionedAccount::new(payer, space, 1_000, &ORDERBOOK_PROGRAM_ID)
    }

    fn plan(request: &MarketRequest, payer: &Pubkey) -> MarketPlan {
        request
            .assemble(
                Keypair::new(),
                buffer(payer, BOOK_SIDE_SPACE),
                buffer(payer, BOOK_SIDE_SPACE),
                buffer(payer, EVENT_QUEUE_SPACE),
                payer,
                &ORDERBOOK_PROGRAM_ID,
            )
            .unwrap()
    }

    #[test]
    fn defaults_match_bootstrap_market() {
        let request = MarketRequest::new("PASS", Pubkey::new_from_array([1; 32]), Pubkey::new_from_array([2; 32]));
        assert_eq!(request.oracle_config.conf_filter, 0.1);
        assert_eq!(request.oracle_config.max_staleness_slots, Some(100));
        assert_eq!(request.maker_fee, 0);
        assert_eq!(request.taker_fee, 0);
        assert!(request.oracle_a.is_none() && request.oracle_b.is_none());
    }

    #[test]
    fn fee_admin_defaults_to_payer() {
        let payer = Keypair::new().pubkey();
        let request = MarketRequest::new("PASS", Pubkey::new_from_array([1; 32]), Pubkey::new_from_array([2; 32]));
        let market = plan(&request, &payer);
        assert_eq!(market.create_market.accounts[15].pubkey, payer);

        let admin = Keypair::new().pubkey();
        let market = plan(&request.clone().collect_fee_admin(admin), &payer);
        assert_eq!(market.create_market.accounts[15].pubkey, admin);
    }

    #[test]
    fn market_vaults_belong_to_market_authority() {
        let payer = Keypair::new().pubkey();
        let base = Pubkey::new_from_array([1; 32]);
        let quote = Pubkey::new_from_array([2; 32]);
        let market = plan(&MarketRequest::new("FAIL", base, quote), &payer);

        let (authority, _) =
            derive_market_authority_pda(&market.market_pubkey(), &ORDERBOOK_PROGRAM_ID).unwrap();
        assert_eq!(market.market_authority, authority);
        assert_eq!(
            (market.market_base_vault, market.market_quote_vault),
            market_token_vaults(&authority, &base, &quote)
        );
    }

    #[test]
    fn instruction_sequence_and_co_signers_line_up() {
        let payer = Keypair::new().pubkey();
        let market = plan(&MarketRequest::new("PASS", Pubkey::new_from_array([1; 32]), Pubkey::new_from_array([2; 32])), &payer);

        let instructions = market.instructions();
        assert_eq!(instructions.len(), 4);
        assert_eq!(instructions[3], market.create_market);

        let referenced: Vec<Pubkey> = vec![
            market.market_pubkey(),
            market.bids.pubkey(),
            market.asks.pubkey(),
            market.event_queue.pubkey(),
        ];
        let co_signers: Vec<Pubkey> = market.into_co_signers().iter().map(|k| k.pubkey()).collect();
        assert_eq!(co_signers, referenced);
    }
}
