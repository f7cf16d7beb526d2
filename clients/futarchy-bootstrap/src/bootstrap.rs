//! DAO bootstrap orchestrator
//!
//! Stands up a Dao instance in one wallet approval: the Dao itself (when it
//! does not exist yet), four conditional vaults, a pass and a fail order book
//! market, and a TWAP wrapper around each market.
//!
//! Transactions, in batch order:
//!
//! 1. initialize-dao (only for a new Dao)
//! 2. base-pass + base-fail vaults
//! 3. quote-pass + quote-fail vaults
//! 4. pass market: bids, asks, event queue creates + create_market
//! 5. fail market: same shape as the pass market
//! 6. both create_twap_market instructions
//!
//! All six share one blockhash and are sent concurrently.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

use crate::batch::{assemble_batch, verify_wallet_response, BootstrapStep, TransactionPlan};
use crate::cache::DaoCache;
use crate::config::{ClientConfig, MarketConfig, ProgramIds};
use crate::constants::{FAIL_MARKET_NAME, PASS_MARKET_NAME};
use crate::error::Result;
use crate::instructions::{build_create_twap_market_ix, build_initialize_dao_ix};
use crate::market::{MarketPlan, MarketRequest};
use crate::pda::{derive_twap_market_pda, DaoAddresses};
use crate::provision::RentSchedule;
use crate::rpc::{RpcConnection, SendOptions};
use crate::state::DaoAccount;
use crate::submit::{submit_batch, BootstrapReport, ConfirmPolicy};
use crate::vault::{VaultRole, VaultSet};
use crate::wallet::WalletAdapter;

/// Why a bootstrap returned before touching the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    WalletNotConnected,
    BatchSigningUnsupported,
    MintsNotLoaded,
}

/// Every address the bootstrap creates or relies on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapAddresses {
    pub dao: Pubkey,
    pub treasury: Pubkey,
    pub vaults: Vec<(VaultRole, Pubkey)>,
    pub pass_market: Pubkey,
    pub fail_market: Pubkey,
    pub pass_twap_market: Pubkey,
    pub fail_twap_market: Pubkey,
}

#[derive(Debug)]
pub enum BootstrapResult {
    Skipped(SkipReason),
    Submitted {
        addresses: BootstrapAddresses,
        report: BootstrapReport,
    },
}

pub struct DaoBootstrapper<C, W> {
    connection: C,
    wallet: W,
    cache: DaoCache,
    programs: ProgramIds,
    market: MarketConfig,
    send_options: SendOptions,
    confirm_policy: ConfirmPolicy,
}

impl<C, W> DaoBootstrapper<C, W>
where
    C: RpcConnection,
    W: WalletAdapter,
{
    pub fn new(connection: C, wallet: W, config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            connection,
            wallet,
            cache: DaoCache::new(),
            programs: config.program_ids()?,
            market: config.market.clone(),
            send_options: SendOptions {
                skip_preflight: config.submission.skip_preflight,
            },
            confirm_policy: ConfirmPolicy {
                timeout: config.confirm_timeout(),
                poll_interval: config.poll_interval(),
            },
        })
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn cache(&self) -> &DaoCache {
        &self.cache
    }

    pub fn programs(&self) -> &ProgramIds {
        &self.programs
    }

    /// Current Dao record, read through the cache
    pub async fn dao(&self) -> Result<Option<DaoAccount>> {
        let addresses = DaoAddresses::derive(&self.programs.governance)?;
        self.cache
            .get_or_fetch(&self.connection, &addresses.dao)
            .await
    }

    /// Build, sign and submit the whole bootstrap batch.
    ///
    /// Missing preconditions return `Skipped` without any network call. The
    /// wallet is asked to sign exactly once per call.
    pub async fn run(
        &self,
        base_mint: Option<Pubkey>,
        quote_mint: Option<Pubkey>,
    ) -> Result<BootstrapResult> {
        let Some(payer) = self.wallet.public_key() else {
            tracing::debug!("bootstrap skipped: wallet not connected");
            return Ok(BootstrapResult::Skipped(SkipReason::WalletNotConnected));
        };
        if !self.wallet.supports_sign_all() {
            tracing::debug!("bootstrap skipped: wallet cannot sign a batch");
            return Ok(BootstrapResult::Skipped(SkipReason::BatchSigningUnsupported));
        }
        let (Some(base_mint), Some(quote_mint)) = (base_mint, quote_mint) else {
            tracing::debug!("bootstrap skipped: mints not loaded");
            return Ok(BootstrapResult::Skipped(SkipReason::MintsNotLoaded));
        };

        let dao_addresses = DaoAddresses::derive(&self.programs.governance)?;
        let dao = match self
            .cache
            .get_or_fetch(&self.connection, &dao_addresses.dao)
            .await
        {
            Ok(dao) => dao,
            Err(err) => {
                tracing::warn!(dao = %dao_addresses.dao, error = %err, "failed to load dao");
                return Err(err);
            }
        };
        let sequence = dao.as_ref().map_or(0, DaoAccount::next_sequence);

        let (plans, addresses) = self
            .plan(&payer, dao_addresses, &base_mint, &quote_mint, sequence, dao.is_none())
            .await?;

        let blockhash = self.connection.get_latest_blockhash().await?;
        let batch = assemble_batch(plans, &payer, blockhash)?;
        tracing::info!(
            transactions = batch.len(),
            sequence,
            %blockhash,
            "requesting wallet approval"
        );

        let (steps, unsigned): (Vec<BootstrapStep>, Vec<_>) = batch
            .into_iter()
            .map(|prepared| (prepared.step, prepared.transaction))
            .unzip();
        let signed = self.wallet.sign_all_transactions(unsigned).await?;
        verify_wallet_response(steps.len(), &signed)?;

        let report = submit_batch(
            &self.connection,
            steps.into_iter().zip(signed).collect(),
            self.send_options,
            self.confirm_policy,
        )
        .await;

        if report.any_confirmed() {
            self.cache.invalidate(&dao_addresses.dao).await;
        }
        tracing::info!(outcome = ?report.outcome(), "bootstrap finished");

        Ok(BootstrapResult::Submitted { addresses, report })
    }

    async fn plan(
        &self,
        payer: &Pubkey,
        dao_addresses: DaoAddresses,
        base_mint: &Pubkey,
        quote_mint: &Pubkey,
        sequence: u64,
        initialize_dao: bool,
    ) -> Result<(Vec<TransactionPlan>, BootstrapAddresses)> {
        let programs = &self.programs;
        let mut plans = Vec::with_capacity(6);

        if initialize_dao {
            let ix = build_initialize_dao_ix(payer, base_mint, quote_mint, &programs.governance)?;
            plans.push(TransactionPlan::new(BootstrapStep::InitializeDao, vec![ix]));
        }

        let vaults = VaultSet::build(
            payer,
            &dao_addresses.treasury,
            base_mint,
            quote_mint,
            sequence,
            &programs.conditional_vault,
        )?;
        plans.push(TransactionPlan::new(BootstrapStep::BaseVaults, vaults.base_pair()));
        plans.push(TransactionPlan::new(BootstrapStep::QuoteVaults, vaults.quote_pair()));

        let mut rent = RentSchedule::new();
        let (pass, pass_twap) = self
            .plan_market(&mut rent, PASS_MARKET_NAME, payer, base_mint, quote_mint)
            .await?;
        let (fail, fail_twap) = self
            .plan_market(&mut rent, FAIL_MARKET_NAME, payer, base_mint, quote_mint)
            .await?;
        let pass_market = pass.market_pubkey();
        let fail_market = fail.market_pubkey();

        let twap_instructions = vec![
            build_create_twap_market_ix(payer, &pass_market, self.market.twap_window, &programs.twap)?,
            build_create_twap_market_ix(payer, &fail_market, self.market.twap_window, &programs.twap)?,
        ];

        let pass_instructions = pass.instructions();
        plans.push(
            TransactionPlan::new(BootstrapStep::PassMarket, pass_instructions)
                .with_co_signers(pass.into_co_signers()),
        );
        let fail_instructions = fail.instructions();
        plans.push(
            TransactionPlan::new(BootstrapStep::FailMarket, fail_instructions)
                .with_co_signers(fail.into_co_signers()),
        );
        plans.push(TransactionPlan::new(BootstrapStep::TwapMarkets, twap_instructions));

        let addresses = BootstrapAddresses {
            dao: dao_addresses.dao,
            treasury: dao_addresses.treasury,
            vaults: vaults.iter().map(|v| (v.role, v.address)).collect(),
            pass_market,
            fail_market,
            pass_twap_market: pass_twap,
            fail_twap_market: fail_twap,
        };
        Ok((plans, addresses))
    }

    // TWAP wrapper is open-orders and close-market admin of its market
    async fn plan_market(
        &self,
        rent: &mut RentSchedule,
        name: &str,
        payer: &Pubkey,
        base_mint: &Pubkey,
        quote_mint: &Pubkey,
    ) -> Result<(MarketPlan, Pubkey)> {
        let market = Keypair::new();
        let (twap_market, _) = derive_twap_market_pda(&market.pubkey(), &self.programs.twap)?;

        let request = MarketRequest::new(name, *base_mint, *quote_mint)
            .with_config(&self.market)
            .open_orders_admin(twap_market)
            .close_market_admin(twap_market);
        let plan = request
            .build(&self.connection, rent, market, payer, &self.programs.orderbook)
            .await?;
        Ok((plan, twap_market))
    }
}
