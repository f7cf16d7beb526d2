// Test utilities for the bootstrap client
//
// LiteSVM stands in for the cluster behind the RpcConnection seam. None of
// the governance programs are deployed in it, so anything past the system
// program fails with a missing-program error.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Once;
use std::time::Duration;

use async_trait::async_trait;
use futarchy_bootstrap::instructions::account_discriminator;
use futarchy_bootstrap::{
    BootstrapError, ClientConfig, KeypairWallet, Result, RpcConnection, SendError, SendOptions,
    WalletAdapter,
};
use litesvm::LiteSVM;
use solana_sdk::{
    account::Account,
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::{Transaction, TransactionError},
};

pub const DAO_ACCOUNT_SPACE: usize = 512;

static TRACING: Once = Once::new();

// Route client logs through the test harness; RUST_LOG picks the level
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ======================== CONNECTION ========================

/// RpcConnection over an in-process LiteSVM
pub struct LiteSvmConnection {
    svm: RefCell<LiteSVM>,
    statuses: RefCell<HashMap<Signature, std::result::Result<(), TransactionError>>>,
    /// Report every signature as unseen, as if the cluster dropped it
    pub withhold_statuses: Cell<bool>,
    pub calls: Cell<usize>,
    pub sends: Cell<usize>,
}

impl LiteSvmConnection {
    pub fn new(svm: LiteSVM) -> Self {
        Self {
            svm: RefCell::new(svm),
            statuses: RefCell::new(HashMap::new()),
            withhold_statuses: Cell::new(false),
            calls: Cell::new(0),
            sends: Cell::new(0),
        }
    }

    pub fn svm(&self) -> std::cell::RefMut<'_, LiteSVM> {
        self.svm.borrow_mut()
    }

    fn record_call(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

#[async_trait(?Send)]
impl RpcConnection for LiteSvmConnection {
    async fn get_latest_blockhash(&self) -> Result<Hash> {
        self.record_call();
        Ok(self.svm.borrow().latest_blockhash())
    }

    async fn get_minimum_balance_for_rent_exemption(&self, space: usize) -> Result<u64> {
        self.record_call();
        Ok(self.svm.borrow().minimum_balance_for_rent_exemption(space))
    }

    // With preflight skipped a rejected transaction still gets a signature
    // and its error only shows up through the status poll.
    async fn send_transaction(
        &self,
        transaction: &Transaction,
        options: SendOptions,
    ) -> std::result::Result<Signature, SendError> {
        self.record_call();
        self.sends.set(self.sends.get() + 1);

        let signature = transaction.signatures[0];
        let result = self
            .svm
            .borrow_mut()
            .send_transaction(transaction.clone())
            .map(|_| ())
            .map_err(|failed| failed.err);

        match result {
            Err(err) if !options.skip_preflight => Err(SendError::Transaction(err)),
            result => {
                self.statuses.borrow_mut().insert(signature, result);
                Ok(signature)
            }
        }
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<std::result::Result<(), TransactionError>>> {
        self.record_call();
        if self.withhold_statuses.get() {
            return Ok(None);
        }
        Ok(self.statuses.borrow().get(signature).cloned())
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        self.record_call();
        Ok(self.svm.borrow().get_account(address).map(|account| account.data))
    }
}

// ======================== WALLET ========================

/// How a `RecordingWallet` answers a signing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletResponse {
    Signed,
    /// Signs everything, then loses the last transaction
    DropsLast,
    /// Hands the batch back without adding its own signature
    Unsigned,
    /// Signs everything, then swaps the first two fee payer signatures
    SwapsSignatures,
}

/// Keypair wallet that keeps a copy of every batch it is asked to sign
pub struct RecordingWallet {
    inner: KeypairWallet,
    sign_all: bool,
    response: WalletResponse,
    pub batches: RefCell<Vec<Vec<Transaction>>>,
}

impl RecordingWallet {
    pub fn connected(keypair: Keypair) -> Self {
        Self {
            inner: KeypairWallet::connected(keypair),
            sign_all: true,
            response: WalletResponse::Signed,
            batches: RefCell::new(Vec::new()),
        }
    }

    pub fn disconnected(keypair: Keypair) -> Self {
        Self {
            inner: KeypairWallet::new(keypair),
            sign_all: true,
            response: WalletResponse::Signed,
            batches: RefCell::new(Vec::new()),
        }
    }

    /// Connected, but only able to approve one transaction at a time
    pub fn single_sign_only(keypair: Keypair) -> Self {
        Self {
            inner: KeypairWallet::connected(keypair),
            sign_all: false,
            response: WalletResponse::Signed,
            batches: RefCell::new(Vec::new()),
        }
    }

    /// Connected wallet that misbehaves in the given way
    pub fn responding(keypair: Keypair, response: WalletResponse) -> Self {
        Self {
            response,
            ..Self::connected(keypair)
        }
    }

    pub fn sign_all_calls(&self) -> usize {
        self.batches.borrow().len()
    }
}

#[async_trait(?Send)]
impl WalletAdapter for RecordingWallet {
    fn public_key(&self) -> Option<Pubkey> {
        self.inner.public_key()
    }

    async fn connect(&self) -> Result<Pubkey> {
        self.inner.connect().await
    }

    async fn disconnect(&self) -> Result<()> {
        self.inner.disconnect().await
    }

    fn supports_sign_all(&self) -> bool {
        self.sign_all
    }

    async fn sign_all_transactions(&self, transactions: Vec<Transaction>) -> Result<Vec<Transaction>> {
        if !self.sign_all {
            return Err(BootstrapError::Wallet("batch signing unsupported".to_string()));
        }
        self.batches.borrow_mut().push(transactions.clone());
        if self.response == WalletResponse::Unsigned {
            return Ok(transactions);
        }

        let mut signed = self.inner.sign_all_transactions(transactions).await?;
        match self.response {
            WalletResponse::DropsLast => {
                signed.pop();
            }
            WalletResponse::SwapsSignatures if signed.len() > 1 => {
                let first = signed[0].signatures[0];
                signed[0].signatures[0] = signed[1].signatures[0];
                signed[1].signatures[0] = first;
            }
            _ => {}
        }
        Ok(signed)
    }
}

// ======================== HELPERS ========================

// Setup LiteSVM with nothing but the builtin programs
pub fn setup_svm() -> LiteSVM {
    LiteSVM::new()
}

// Create and fund account
pub fn create_funded_account(svm: &mut LiteSVM, lamports: u64) -> Keypair {
    let keypair = Keypair::new();
    svm.airdrop(&keypair.pubkey(), lamports)
        .expect("Airdrop should succeed");
    keypair
}

// Short confirmation window so timeouts resolve quickly
pub fn test_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.submission.confirm_timeout_ms = 200;
    config.submission.poll_interval_ms = 10;
    config
}

pub fn confirm_policy(timeout_ms: u64) -> futarchy_bootstrap::submit::ConfirmPolicy {
    futarchy_bootstrap::submit::ConfirmPolicy {
        timeout: Duration::from_millis(timeout_ms),
        poll_interval: Duration::from_millis(5),
    }
}

/// Serialized Dao account body as the governance program lays it out
pub fn encode_dao(treasury: &Pubkey, base: &Pubkey, quote: &Pubkey, proposal_count: u32) -> Vec<u8> {
    let mut data = account_discriminator("Dao").to_vec();
    data.push(255);
    data.extend_from_slice(treasury.as_ref());
    data.extend_from_slice(base.as_ref());
    data.extend_from_slice(quote.as_ref());
    data.extend_from_slice(&proposal_count.to_le_bytes());
    data.extend_from_slice(&0u64.to_le_bytes()); // last_proposal_slot
    data.extend_from_slice(&300u16.to_le_bytes()); // pass_threshold_bps
    data.extend_from_slice(&1_000_000_000u64.to_le_bytes());
    data.extend_from_slice(&23_150u64.to_le_bytes());
    data.extend_from_slice(&216_000u64.to_le_bytes());
    data.extend_from_slice(&0i64.to_le_bytes());
    data.resize(DAO_ACCOUNT_SPACE, 0);
    data
}

// Place a Dao account at its PDA, owned by the governance program
pub fn install_dao(
    svm: &mut LiteSVM,
    dao: &Pubkey,
    governance_program: &Pubkey,
    data: Vec<u8>,
) {
    let lamports = svm.minimum_balance_for_rent_exemption(data.len());
    svm.set_account(
        *dao,
        Account {
            lamports,
            data,
            owner: *governance_program,
            executable: false,
            rent_epoch: 0,
        },
    )
    .expect("Dao account should be installed");
}
